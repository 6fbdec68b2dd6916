use anyhow::{anyhow, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

/// The fixed instruction sent with every frame. The JSON shape it demands
/// is a compatibility contract with the oracle's prompting convention:
/// the parser depends on `leds_detected` / `total_leds` exactly as named
/// here. Do not alter this casually.
pub const LED_ANALYSIS_PROMPT: &str = r#"Analyze this image and identify any LED lights. For each LED you find, please provide:
1. The color of the LED (red, green, blue, yellow, white, etc.)
2. The brightness level (dim, medium, bright)
3. The approximate position in the image
4. Whether it appears to be on or off

Please format your response as JSON ONLY with the following structure (no markdown formatting):
{
    "leds_detected": [
        {
            "color": "color_name",
            "brightness": "brightness_level",
            "position": "description_of_position",
            "status": "on/off"
        }
    ],
    "total_leds": number
}"#;

/// One captured frame: a tightly-packed RGB8 buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

/// Source of frames for the sampling loop. One call per loop iteration;
/// an error here aborts the whole session (the device is gone, there is
/// nothing left to sample).
pub trait FrameSource: Send {
    fn acquire_frame(&mut self) -> Result<Frame>;
}

/// External image-understanding service. Takes a JPEG-encoded frame and
/// the fixed instruction text, returns the oracle's raw textual reply.
/// Callers must treat the reply as untrusted free-form text and run it
/// through the response parser.
#[async_trait]
pub trait VisionOracle: Send + Sync {
    async fn analyze_image(&self, jpeg: &[u8], prompt: &str) -> Result<String>;
}

/// Encode an RGB frame as JPEG for oracle submission.
pub fn encode_frame_jpeg(frame: &Frame) -> Result<Vec<u8>> {
    let expected_len = frame.width as usize * frame.height as usize * 3;
    if frame.data.len() != expected_len {
        return Err(anyhow!(
            "frame buffer length {} does not match {}x{} rgb8",
            frame.data.len(),
            frame.width,
            frame.height
        ));
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new(&mut jpeg).encode(
        &frame.data,
        frame.width,
        frame.height,
        ExtendedColorType::Rgb8,
    )?;
    Ok(jpeg)
}
