use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::analysis::analyze_session;
use crate::debug_sink::DebugArtifactSink;
use crate::models::{BlinkReport, SessionResult};
use crate::oracle::{FrameSource, VisionOracle};
use crate::parser::ParsedDetection;
use crate::sensing::live::LiveController;
use crate::sensing::loop_worker::{run_sampling_session, submit_frame, SamplerConfig};

/// Front door for the three session operations: analyze one frame now,
/// run a bounded blink-pattern session, or drive an open-ended live
/// session. Owns the frame source; the oracle and debug sink are shared
/// collaborators.
pub struct LedAnalyzer {
    frames: Box<dyn FrameSource>,
    oracle: Arc<dyn VisionOracle>,
    debug_sink: Option<Arc<dyn DebugArtifactSink>>,
    config: SamplerConfig,
}

impl LedAnalyzer {
    pub fn new(frames: Box<dyn FrameSource>, oracle: Arc<dyn VisionOracle>) -> Self {
        Self {
            frames,
            oracle,
            debug_sink: None,
            config: SamplerConfig::default(),
        }
    }

    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugArtifactSink>) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    /// Capture and analyze a single frame right now. Unlike session
    /// sampling, oracle and parse failures are returned to the caller
    /// here, since the caller asked for exactly this sample.
    pub async fn analyze_single_frame(&mut self) -> Result<ParsedDetection> {
        let frame = self
            .frames
            .acquire_frame()
            .context("frame acquisition failed")?;
        submit_frame(
            &frame,
            self.oracle.as_ref(),
            self.debug_sink.as_deref(),
            self.config.oracle_timeout,
        )
        .await
    }

    /// Run one bounded sampling session and hand back the raw records.
    pub async fn collect_session(
        &mut self,
        cancel_token: &CancellationToken,
    ) -> Result<SessionResult> {
        run_sampling_session(
            self.frames.as_mut(),
            self.oracle.as_ref(),
            self.debug_sink.as_deref(),
            &self.config,
            cancel_token,
        )
        .await
    }

    /// Run a bounded blink-pattern session and return per-light blink
    /// statistics, or the no-data sentinel if nothing was collected.
    pub async fn detect_blinking(
        &mut self,
        cancel_token: &CancellationToken,
    ) -> Result<BlinkReport> {
        let session = self.collect_session(cancel_token).await?;
        Ok(analyze_session(&session))
    }

    /// Hand the frame source off to a live-analysis task managed by the
    /// returned controller. Consumes the analyzer: the live loop owns the
    /// frame source until stopped.
    pub fn into_live(
        self,
        on_detection: Box<dyn FnMut(ParsedDetection) + Send>,
    ) -> Result<LiveController> {
        let mut controller = LiveController::new();
        controller.start(
            self.frames,
            self.oracle,
            self.config.oracle_timeout,
            on_detection,
        )?;
        Ok(controller)
    }
}

/// Does this detection contain a light whose color mentions `color` and
/// whose status reads "on"? Color and status matching is case-insensitive
/// here (unlike identity keys) because this is a human-facing check, not
/// a correlation key.
pub fn has_lit_color(detection: &ParsedDetection, color: &str) -> bool {
    let needle = color.to_lowercase();
    detection.lights.iter().any(|light| {
        light.color.to_lowercase().contains(&needle) && light.status.eq_ignore_ascii_case("on")
    })
}
