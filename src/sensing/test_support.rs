//! Scripted frame-source and oracle fakes shared by the sensing and
//! analyzer tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::oracle::{Frame, FrameSource, VisionOracle};

/// Wire the log facade to stderr the way an embedding binary would.
/// Safe to call from every test; only the first call wins.
pub(crate) fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Produces solid 4x4 RGB frames, optionally failing once a fixed number
/// of acquisitions has succeeded.
pub(crate) struct SolidFrames {
    produced: usize,
    fail_after: Option<usize>,
}

impl Default for SolidFrames {
    fn default() -> Self {
        Self {
            produced: 0,
            fail_after: None,
        }
    }
}

impl SolidFrames {
    pub(crate) fn failing_after(successes: usize) -> Self {
        Self {
            produced: 0,
            fail_after: Some(successes),
        }
    }
}

impl FrameSource for SolidFrames {
    fn acquire_frame(&mut self) -> Result<Frame> {
        if let Some(limit) = self.fail_after {
            if self.produced >= limit {
                return Err(anyhow!("camera read failed"));
            }
        }
        self.produced += 1;
        Ok(Frame::new(4, 4, vec![0u8; 4 * 4 * 3]))
    }
}

/// Oracle fake replaying scripted replies. A `sequence` oracle errors out
/// once its script is exhausted; a `repeating` oracle serves the same
/// reply forever.
pub(crate) struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, String>>>,
    repeat: Option<String>,
    pub(crate) calls: AtomicUsize,
}

impl ScriptedOracle {
    pub(crate) fn repeating(reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            repeat: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn sequence(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VisionOracle for ScriptedOracle {
    async fn analyze_image(&self, _jpeg: &[u8], _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            return next.map_err(|msg| anyhow!(msg));
        }
        match &self.repeat {
            Some(reply) => Ok(reply.clone()),
            None => Err(anyhow!("scripted replies exhausted")),
        }
    }
}
