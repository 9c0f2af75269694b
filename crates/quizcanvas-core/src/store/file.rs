//! File-based answer-key store.

use super::{AnswerKeyStore, BoxFuture, StoreError, StoreResult};
use crate::eval::AnswerKey;
use std::fs;
use std::path::PathBuf;

/// File-based store keeping one JSON file per question.
pub struct FileStore {
    /// Base directory for answer-key files.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store rooted at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("Failed to create store directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location under the platform's
    /// local data directory.
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("Could not determine home directory".to_string()))?;

        let path = base.join("quizcanvas").join("answer-keys");
        Self::new(path)
    }

    /// Get the file path for a question id.
    fn key_path(&self, question_id: &str) -> PathBuf {
        // Sanitize the id to be safe for filenames
        let safe_id: String = question_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl AnswerKeyStore for FileStore {
    fn save(&self, question_id: &str, key: &AnswerKey) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.key_path(question_id);
        let json = match key.to_json() {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StoreError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            fs::write(&path, json)
                .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
        })
    }

    fn load(&self, question_id: &str) -> BoxFuture<'_, StoreResult<AnswerKey>> {
        let path = self.key_path(question_id);
        let id_owned = question_id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

            serde_json::from_str(&json).map_err(|e| {
                StoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, question_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let path = self.key_path(question_id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StoreError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StoreError::Io(format!("Failed to read directory: {}", e)))?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                if let Some(name) = entry.path().file_stem() {
                    if let Some(name_str) = name.to_str() {
                        if entry.path().extension().map(|e| e == "json").unwrap_or(false) {
                            ids.push(name_str.to_string());
                        }
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, question_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let path = self.key_path(question_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
