use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One entry in a per-light timeline: the status and brightness reported
/// at a given point in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: f64,
    pub status: String,
    pub brightness: String,
}

/// Blink statistics for one light identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkResult {
    pub blink_frequency_hz: f64,
    pub total_state_changes: u32,
    pub duration_analyzed: f64,
}

/// Outcome of a full session analysis.
///
/// Serializes untagged so the sentinel renders as `{"error": "..."}` and
/// the normal case as a map keyed by light identity. The sentinel is a
/// distinct shape on purpose: a session that collected nothing is not the
/// same thing as a session that saw no lights blink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlinkReport {
    NoData { error: String },
    PerLight(HashMap<String, BlinkResult>),
}

impl BlinkReport {
    pub fn no_data() -> Self {
        BlinkReport::NoData {
            error: "No LED data collected".to_string(),
        }
    }

    pub fn results(&self) -> Option<&HashMap<String, BlinkResult>> {
        match self {
            BlinkReport::PerLight(results) => Some(results),
            BlinkReport::NoData { .. } => None,
        }
    }
}
