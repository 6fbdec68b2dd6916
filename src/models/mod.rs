pub mod blink;
pub mod observation;

pub use blink::{BlinkReport, BlinkResult, TimelineEntry};
pub use observation::{LightObservation, SampleRecord, SessionResult};
