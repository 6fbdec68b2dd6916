use std::path::PathBuf;

use anyhow::{Context, Result};

/// Write capability for per-sample debug artifacts: the submitted frame
/// and a free-form diagnostics text, keyed by a timestamp string. Sink
/// failures are logged by the caller and never affect the session.
pub trait DebugArtifactSink: Send + Sync {
    fn persist(&self, key: &str, frame_jpeg: &[u8], diagnostics: &str) -> Result<()>;
}

/// Filesystem sink: `debug_frame_<key>.jpg` plus `debug_<key>.txt` in a
/// target directory.
pub struct FsDebugSink {
    dir: PathBuf,
}

impl FsDebugSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DebugArtifactSink for FsDebugSink {
    fn persist(&self, key: &str, frame_jpeg: &[u8], diagnostics: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create debug dir {}", self.dir.display()))?;

        let frame_path = self.dir.join(format!("debug_frame_{key}.jpg"));
        std::fs::write(&frame_path, frame_jpeg)
            .with_context(|| format!("failed to write {}", frame_path.display()))?;

        let text_path = self.dir.join(format!("debug_{key}.txt"));
        std::fs::write(&text_path, diagnostics)
            .with_context(|| format!("failed to write {}", text_path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_frame_and_diagnostics_pair() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDebugSink::new(dir.path());

        sink.persist("20250101_120000_000", b"\xFF\xD8jpegdata", "prompt and response")
            .unwrap();

        let frame = dir.path().join("debug_frame_20250101_120000_000.jpg");
        let text = dir.path().join("debug_20250101_120000_000.txt");
        assert_eq!(std::fs::read(frame).unwrap(), b"\xFF\xD8jpegdata");
        assert_eq!(
            std::fs::read_to_string(text).unwrap(),
            "prompt and response"
        );
    }

    #[test]
    fn creates_missing_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsDebugSink::new(dir.path().join("tmp"));
        sink.persist("k", b"j", "d").unwrap();
        assert!(dir.path().join("tmp/debug_k.txt").exists());
    }
}
