use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::debug_sink::DebugArtifactSink;
use crate::models::{SampleRecord, SessionResult};
use crate::oracle::{encode_frame_jpeg, Frame, FrameSource, VisionOracle, LED_ANALYSIS_PROMPT};
use crate::parser::{parse_oracle_response, ParsedDetection};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Sampling-loop tuning with the reference defaults.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Total session duration `D`. The loop stops once elapsed time
    /// reaches this; with a slow oracle the real wall-clock time can
    /// overshoot it (capture and submission are never overlapped).
    pub duration: Duration,

    /// Submit every k-th captured frame (0-indexed), to keep oracle
    /// traffic well below the capture rate. A value of 0 is treated as
    /// 1: every frame is submitted.
    pub submission_stride: u64,

    /// Fixed delay between loop iterations, bounding the capture rate
    /// independent of oracle latency.
    pub frame_delay: Duration,

    /// A single oracle call exceeding this fails as a dropped sample.
    pub oracle_timeout: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            submission_stride: 5,
            frame_delay: Duration::from_millis(100),
            oracle_timeout: Duration::from_secs(30),
        }
    }
}

/// Run one bounded sampling session.
///
/// Frame-source failures abort the session; oracle and parse failures
/// drop the affected sample and the loop keeps going. Cancellation is
/// observed at iteration boundaries only; an in-flight oracle call is
/// allowed to complete or fail first. The returned SessionResult may
/// legitimately hold zero records.
pub async fn run_sampling_session(
    frames: &mut dyn FrameSource,
    oracle: &dyn VisionOracle,
    debug_sink: Option<&dyn DebugArtifactSink>,
    config: &SamplerConfig,
    cancel_token: &CancellationToken,
) -> Result<SessionResult> {
    let mut session = SessionResult::new();
    log_info!(
        "session {}: sampling for {:.1}s (stride {}, delay {}ms)",
        session.session_id,
        config.duration.as_secs_f64(),
        config.submission_stride,
        config.frame_delay.as_millis()
    );

    let start = Instant::now();
    let mut ticker = tokio::time::interval(config.frame_delay);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let stride = config.submission_stride.max(1);
    let mut frame_count: u64 = 0;

    while start.elapsed() < config.duration {
        tokio::select! {
            // Stop signal wins over a due tick, so cancellation is always
            // observed at the iteration boundary it arrived before.
            biased;
            _ = cancel_token.cancelled() => {
                log_info!(
                    "session {}: cancelled after {} frames",
                    session.session_id,
                    frame_count
                );
                break;
            }
            _ = ticker.tick() => {}
        }

        // Fatal: no frames means no session worth salvaging.
        let frame = frames
            .acquire_frame()
            .context("frame acquisition failed")?;

        if frame_count % stride == 0 {
            let timestamp = start.elapsed().as_secs_f64();
            match submit_frame(&frame, oracle, debug_sink, config.oracle_timeout).await {
                Ok(detection) => {
                    log_info!(
                        "sample {}: {} lights detected at {:.2}s",
                        frame_count / stride,
                        detection.lights.len(),
                        timestamp
                    );
                    session.records.push(SampleRecord {
                        timestamp,
                        lights: detection.lights,
                    });
                }
                Err(err) => {
                    log_warn!("sample at {:.2}s dropped: {err:#}", timestamp);
                }
            }
        }

        frame_count += 1;
    }

    log_info!(
        "session {}: collected {} samples from {} frames in {:.2}s",
        session.session_id,
        session.records.len(),
        frame_count,
        start.elapsed().as_secs_f64()
    );
    Ok(session)
}

/// Encode one frame, submit it to the oracle and decode the reply.
///
/// Persists a debug artifact (frame + prompt + raw reply or error) when a
/// sink is configured, on success and on oracle failure alike; artifact
/// write errors are logged and otherwise ignored.
pub(crate) async fn submit_frame(
    frame: &Frame,
    oracle: &dyn VisionOracle,
    debug_sink: Option<&dyn DebugArtifactSink>,
    oracle_timeout: Duration,
) -> Result<ParsedDetection> {
    let jpeg = encode_frame_jpeg(frame).context("jpeg encoding failed")?;
    let key = Utc::now().format("%Y%m%d_%H%M%S_%3f").to_string();

    let oracle_start = Instant::now();
    let reply = match tokio::time::timeout(
        oracle_timeout,
        oracle.analyze_image(&jpeg, LED_ANALYSIS_PROMPT),
    )
    .await
    {
        Ok(Ok(text)) => {
            log_info!(
                "oracle replied with {} bytes in {}ms",
                text.len(),
                oracle_start.elapsed().as_millis()
            );
            Ok(text)
        }
        Ok(Err(err)) => Err(err.context("oracle call failed")),
        Err(_) => Err(anyhow!(
            "oracle call timed out after {}s",
            oracle_timeout.as_secs()
        )),
    };

    if let Some(sink) = debug_sink {
        let diagnostics = match &reply {
            Ok(text) => format!(
                "Timestamp: {key}\nPrompt sent to oracle:\n{LED_ANALYSIS_PROMPT}\n\nOracle response:\n{text}\n"
            ),
            Err(err) => format!(
                "Timestamp: {key}\nPrompt sent to oracle:\n{LED_ANALYSIS_PROMPT}\n\nError calling oracle: {err:#}\n"
            ),
        };
        if let Err(err) = sink.persist(&key, &jpeg, &diagnostics) {
            log_warn!("debug artifact write failed for {key}: {err:#}");
        }
    }

    let raw = reply?;
    Ok(parse_oracle_response(&raw)?)
}
