//! Persisting rendered-surface snapshots as image artifacts.
//!
//! Captures are a side artifact for human review; the evaluation engine
//! never reads them.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Capture errors.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("image payload is not a base64 data URL")]
    InvalidPayload,
    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes canvas captures as PNG files keyed by question id and timestamp.
pub struct CaptureWriter {
    base_path: PathBuf,
}

impl CaptureWriter {
    /// Create a writer rooted at the given directory, creating it if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    /// Decode a `data:image/...;base64,` payload and write it as
    /// `capture_<questionId>_<timestamp>.png`. Returns the written path.
    pub fn save_capture(&self, question_id: &str, data_url: &str) -> Result<PathBuf, CaptureError> {
        let body = strip_data_url(data_url).ok_or(CaptureError::InvalidPayload)?;
        let bytes = STANDARD.decode(body)?;

        let safe_id: String = question_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let filename = format!("capture_{}_{}.png", safe_id, Utc::now().timestamp_millis());
        let path = self.base_path.join(filename);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Extract the base64 body of a `data:image/<fmt>;base64,` URL.
fn strip_data_url(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix("data:image/")?;
    let (_, body) = rest.split_once(";base64,")?;
    Some(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_capture_writes_png_artifact() {
        let dir = tempdir().unwrap();
        let writer = CaptureWriter::new(dir.path()).unwrap();

        let path = writer
            .save_capture("q-7", "data:image/png;base64,aGVsbG8=")
            .unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("capture_q-7_"));
        assert!(name.ends_with(".png"));
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_rejects_non_data_url() {
        let dir = tempdir().unwrap();
        let writer = CaptureWriter::new(dir.path()).unwrap();

        let result = writer.save_capture("q1", "aGVsbG8=");
        assert!(matches!(result, Err(CaptureError::InvalidPayload)));
    }

    #[test]
    fn test_rejects_bad_base64() {
        let dir = tempdir().unwrap();
        let writer = CaptureWriter::new(dir.path()).unwrap();

        let result = writer.save_capture("q1", "data:image/png;base64,not base64!");
        assert!(matches!(result, Err(CaptureError::Decode(_))));
    }

    #[test]
    fn test_sanitizes_question_id() {
        let dir = tempdir().unwrap();
        let writer = CaptureWriter::new(dir.path()).unwrap();

        let path = writer
            .save_capture("q/1:odd", "data:image/png;base64,aGVsbG8=")
            .unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("capture_q_1_odd_"));
    }
}
