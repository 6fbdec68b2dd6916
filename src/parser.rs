use serde::Deserialize;
use thiserror::Error;

use crate::models::LightObservation;

/// Successful decode of one oracle reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDetection {
    pub lights: Vec<LightObservation>,
    pub total: usize,
}

/// Parse failure, carrying the offending raw text so callers can log it
/// and drop the sample. Never fatal to a session.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("oracle response is not the expected JSON shape: {source} (raw response: {raw:?})")]
    Malformed {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    pub fn raw_response(&self) -> &str {
        match self {
            ParseError::Malformed { raw, .. } => raw,
        }
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Wire shape of the oracle reply. `leds_detected` is required (an empty
/// list is fine), `total_leds` is optional. Per-light fields default to
/// the literal "unknown" so identity keys and status comparisons never
/// operate on missing values.
#[derive(Debug, Deserialize)]
struct RawDetection {
    leds_detected: Vec<RawLight>,
    #[serde(default)]
    total_leds: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawLight {
    #[serde(default = "unknown")]
    color: String,
    #[serde(default = "unknown")]
    brightness: String,
    #[serde(default = "unknown")]
    position: String,
    #[serde(default = "unknown")]
    status: String,
}

/// Strip the markdown code-fence wrapper some oracle replies carry.
///
/// Mirrors the oracle prompting convention exactly: trim, drop a leading
/// ```json opener, drop a trailing ``` closer, trim again. Applying it to
/// already-clean text is a no-op.
fn normalize_response(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        text = stripped;
    }
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped;
    }
    text.trim()
}

/// Decode one raw oracle reply into a structured detection.
pub fn parse_oracle_response(raw: &str) -> Result<ParsedDetection, ParseError> {
    let cleaned = normalize_response(raw);

    let detection: RawDetection =
        serde_json::from_str(cleaned).map_err(|source| ParseError::Malformed {
            raw: raw.to_string(),
            source,
        })?;

    let lights: Vec<LightObservation> = detection
        .leds_detected
        .into_iter()
        .map(|led| LightObservation {
            color: led.color,
            brightness: led.brightness,
            position: led.position,
            status: led.status,
        })
        .collect();

    let total = detection.total_leds.unwrap_or(lights.len());
    Ok(ParsedDetection { lights, total })
}
