use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One light reported by the oracle for a single sampled frame.
///
/// All fields are the oracle's free text. Missing fields are filled with
/// the literal `"unknown"` at parse time, so identity keys and status
/// comparisons never see an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightObservation {
    pub color: String,
    pub brightness: String,
    pub position: String,
    pub status: String,
}

impl LightObservation {
    /// Composite identity key used to correlate observations of presumably
    /// the same physical light across samples. The oracle's text is noisy,
    /// so this is a best-effort correlation, not a stable physical identity.
    pub fn identity_key(&self) -> String {
        format!("{}_{}", self.color, self.position)
    }
}

/// The parsed result of one frame submitted to the oracle.
///
/// `timestamp` is float seconds since session start. Records are appended
/// in capture order, so timestamps are non-decreasing within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub timestamp: f64,
    pub lights: Vec<LightObservation>,
}

/// Everything collected over one bounded sampling session.
///
/// Created empty at session start, appended to by the sampling loop, and
/// read-only once the loop returns. An empty record list is a valid
/// outcome (every sample dropped, or the oracle never saw a light) and is
/// distinguished from "no data" downstream by the analysis sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub records: Vec<SampleRecord>,
}

impl SessionResult {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Span between the first and last collected record, in seconds.
    /// Zero for sessions with fewer than two records.
    pub fn observed_span_secs(&self) -> f64 {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }
}

impl Default for SessionResult {
    fn default() -> Self {
        Self::new()
    }
}
