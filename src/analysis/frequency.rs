use std::collections::HashMap;

use crate::models::{BlinkReport, BlinkResult, SessionResult, TimelineEntry};

use super::timeline::build_timelines;

/// Blink statistics for one timeline.
///
/// `duration_analyzed` is the session-wide first-to-last record span, not
/// the per-timeline span, so every light in a run reports the same
/// denominator. One full blink cycle (on→off→on) is two state changes,
/// hence the division by 2. A zero span reports 0 Hz regardless of
/// changes, since a single-record session has no measurable rate.
pub fn analyze_timeline(timeline: &[TimelineEntry], session_span_secs: f64) -> BlinkResult {
    let mut total_state_changes: u32 = 0;
    let mut last_status: Option<&str> = None;

    for entry in timeline {
        if let Some(previous) = last_status {
            // Plain text comparison, no case folding: the estimator makes
            // no claims the oracle's labels don't support.
            if previous != entry.status {
                total_state_changes += 1;
            }
        }
        last_status = Some(&entry.status);
    }

    let blink_frequency_hz = if session_span_secs > 0.0 {
        f64::from(total_state_changes) / (2.0 * session_span_secs)
    } else {
        0.0
    };

    BlinkResult {
        blink_frequency_hz,
        total_state_changes,
        duration_analyzed: session_span_secs,
    }
}

/// Analyze a whole session: group observations into per-light timelines
/// and compute blink statistics for each.
///
/// A session with zero records returns the `NoData` sentinel rather than
/// an empty map: "nothing was collected" must stay distinguishable from
/// "everything was collected and nothing blinked".
pub fn analyze_session(session: &SessionResult) -> BlinkReport {
    if session.is_empty() {
        return BlinkReport::no_data();
    }

    let span = session.observed_span_secs();
    let results: HashMap<String, BlinkResult> = build_timelines(session)
        .iter()
        .map(|(key, timeline)| (key.clone(), analyze_timeline(timeline, span)))
        .collect();

    BlinkReport::PerLight(results)
}
