use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::oracle::{FrameSource, VisionOracle};
use crate::parser::ParsedDetection;

use super::loop_worker::submit_frame;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// How often the live driver actually submits a frame for analysis.
/// Frames are still pulled continuously; most are only keeping the
/// capture cadence alive between analyses.
pub const LIVE_ANALYSIS_INTERVAL: Duration = Duration::from_secs(2);

const LIVE_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Open-ended live driver: pull frames continuously, submit one for
/// analysis every `analysis_interval`, hand each successful detection to
/// the callback. Stops when the token is cancelled; frame-source failure
/// is fatal here just as in bounded sessions, while oracle/parse failures
/// only skip that analysis.
pub async fn live_analysis_loop(
    mut frames: Box<dyn FrameSource>,
    oracle: Arc<dyn VisionOracle>,
    analysis_interval: Duration,
    oracle_timeout: Duration,
    cancel_token: CancellationToken,
    mut on_detection: Box<dyn FnMut(ParsedDetection) + Send>,
) -> Result<()> {
    let mut ticker = tokio::time::interval(LIVE_FRAME_DELAY);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_analysis: Option<Instant> = None;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("live analysis loop shutting down");
                break;
            }
            _ = ticker.tick() => {}
        }

        let frame = frames
            .acquire_frame()
            .context("frame acquisition failed")?;

        let due = last_analysis
            .map(|at| at.elapsed() >= analysis_interval)
            .unwrap_or(true);
        if !due {
            continue;
        }
        last_analysis = Some(Instant::now());

        match submit_frame(&frame, oracle.as_ref(), None, oracle_timeout).await {
            Ok(detection) => on_detection(detection),
            Err(err) => log_warn!("live analysis skipped: {err:#}"),
        }
    }

    Ok(())
}

/// Owns a spawned live-analysis task. Start/stop mirror a bounded
/// session's lifecycle, with the token standing in for the session
/// duration.
pub struct LiveController {
    handle: Option<JoinHandle<Result<()>>>,
    cancel_token: Option<CancellationToken>,
}

impl LiveController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        frames: Box<dyn FrameSource>,
        oracle: Arc<dyn VisionOracle>,
        oracle_timeout: Duration,
        on_detection: Box<dyn FnMut(ParsedDetection) + Send>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("live analysis already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(live_analysis_loop(
            frames,
            oracle,
            LIVE_ANALYSIS_INTERVAL,
            oracle_timeout,
            token_clone,
            on_detection,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it to wind down. Surfaces a fatal
    /// loop error (dead frame source) if one ended the task early.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("live analysis task failed to join")?
        } else {
            Ok(())
        }
    }
}

impl Default for LiveController {
    fn default() -> Self {
        Self::new()
    }
}
