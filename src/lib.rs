//! Blink-pattern analysis for indicator lights, driven by an external
//! vision oracle.
//!
//! A timed sampling loop pulls frames from a [`FrameSource`], submits
//! every k-th frame to a [`VisionOracle`], and parses the replies into
//! timestamped observations. Aggregation groups those observations into
//! per-light timelines by the oracle's reported color and position, and
//! the frequency analyzer turns each timeline into blink statistics.
//!
//! Camera acquisition and the oracle itself live behind traits; this
//! crate never opens a device or speaks to a service on its own.

pub mod analysis;
pub mod analyzer;
pub mod debug_sink;
pub mod models;
pub mod oracle;
pub mod parser;
pub mod sensing;
pub mod utils;

pub use analysis::{analyze_session, analyze_timeline, build_timelines, LightTimelines};
pub use analyzer::{has_lit_color, LedAnalyzer};
pub use debug_sink::{DebugArtifactSink, FsDebugSink};
pub use models::{
    BlinkReport, BlinkResult, LightObservation, SampleRecord, SessionResult, TimelineEntry,
};
pub use oracle::{
    encode_frame_jpeg, Frame, FrameSource, VisionOracle, LED_ANALYSIS_PROMPT,
};
pub use parser::{parse_oracle_response, ParseError, ParsedDetection};
pub use sensing::{run_sampling_session, LiveController, SamplerConfig};
