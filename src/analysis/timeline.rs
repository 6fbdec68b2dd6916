use std::collections::HashMap;

use crate::models::{SessionResult, TimelineEntry};

/// Per-light timelines keyed by the oracle-text identity key.
pub type LightTimelines = HashMap<String, Vec<TimelineEntry>>;

/// Group a session's observations into per-light timelines.
///
/// Records are walked in capture order, so each timeline inherits
/// timestamp order without a separate sort. Duplicate identical
/// observations within one record are preserved as separate entries with
/// the same timestamp, a real oracle behavior the frequency estimator
/// has to tolerate, not something to silently dedupe here.
pub fn build_timelines(session: &SessionResult) -> LightTimelines {
    let mut timelines: LightTimelines = HashMap::new();

    for record in &session.records {
        for light in &record.lights {
            timelines
                .entry(light.identity_key())
                .or_default()
                .push(TimelineEntry {
                    timestamp: record.timestamp,
                    status: light.status.clone(),
                    brightness: light.brightness.clone(),
                });
        }
    }

    timelines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LightObservation, SampleRecord};

    fn light(color: &str, position: &str, status: &str) -> LightObservation {
        LightObservation {
            color: color.to_string(),
            brightness: "medium".to_string(),
            position: position.to_string(),
            status: status.to_string(),
        }
    }

    fn session(records: Vec<SampleRecord>) -> SessionResult {
        let mut session = SessionResult::new();
        session.records = records;
        session
    }

    #[test]
    fn groups_same_identity_across_records_in_timestamp_order() {
        // A dropped sample between 0.5 and 2.0 leaves a gap, not a hole to fill.
        let session = session(vec![
            SampleRecord {
                timestamp: 0.5,
                lights: vec![light("green", "top left", "on")],
            },
            SampleRecord {
                timestamp: 2.0,
                lights: vec![light("green", "top left", "off")],
            },
        ]);

        let timelines = build_timelines(&session);
        assert_eq!(timelines.len(), 1);

        let timeline = &timelines["green_top left"];
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].timestamp, 0.5);
        assert_eq!(timeline[0].status, "on");
        assert_eq!(timeline[1].timestamp, 2.0);
        assert_eq!(timeline[1].status, "off");
    }

    #[test]
    fn distinct_identities_get_distinct_timelines() {
        let session = session(vec![SampleRecord {
            timestamp: 0.0,
            lights: vec![
                light("green", "top left", "on"),
                light("red", "top left", "on"),
                light("green", "bottom right", "off"),
            ],
        }]);

        let timelines = build_timelines(&session);
        assert_eq!(timelines.len(), 3);
        assert!(timelines.contains_key("green_top left"));
        assert!(timelines.contains_key("red_top left"));
        assert!(timelines.contains_key("green_bottom right"));
    }

    #[test]
    fn duplicate_observations_in_one_record_are_both_kept() {
        let session = session(vec![SampleRecord {
            timestamp: 1.0,
            lights: vec![
                light("blue", "center", "on"),
                light("blue", "center", "on"),
            ],
        }]);

        let timeline = &build_timelines(&session)["blue_center"];
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0], timeline[1]);
    }

    #[test]
    fn empty_session_yields_no_timelines() {
        assert!(build_timelines(&SessionResult::new()).is_empty());
    }
}
