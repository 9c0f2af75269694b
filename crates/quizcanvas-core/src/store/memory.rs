//! In-memory answer-key store.

use super::{AnswerKeyStore, BoxFuture, StoreError, StoreResult};
use crate::eval::AnswerKey;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    keys: RwLock<HashMap<String, AnswerKey>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnswerKeyStore for MemoryStore {
    fn save(&self, question_id: &str, key: &AnswerKey) -> BoxFuture<'_, StoreResult<()>> {
        let question_id = question_id.to_string();
        let key = key.clone();
        Box::pin(async move {
            let mut keys = self
                .keys
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            keys.insert(question_id, key);
            Ok(())
        })
    }

    fn load(&self, question_id: &str) -> BoxFuture<'_, StoreResult<AnswerKey>> {
        let question_id = question_id.to_string();
        Box::pin(async move {
            let keys = self
                .keys
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            keys.get(&question_id)
                .cloned()
                .ok_or(StoreError::NotFound(question_id))
        })
    }

    fn delete(&self, question_id: &str) -> BoxFuture<'_, StoreResult<()>> {
        let question_id = question_id.to_string();
        Box::pin(async move {
            let mut keys = self
                .keys
                .write()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            keys.remove(&question_id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<String>>> {
        Box::pin(async move {
            let keys = self
                .keys
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(keys.keys().cloned().collect())
        })
    }

    fn exists(&self, question_id: &str) -> BoxFuture<'_, StoreResult<bool>> {
        let question_id = question_id.to_string();
        Box::pin(async move {
            let keys = self
                .keys
                .read()
                .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))?;
            Ok(keys.contains_key(&question_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::CircleMark;
    use crate::store::block_on;
    use kurbo::Point;

    fn sample_key(x: f64) -> AnswerKey {
        AnswerKey::from_circles(vec![CircleMark::circle(Point::new(x, 0.0))], 800.0, 400.0)
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let key = sample_key(10.0);

        block_on(store.save("q1", &key)).unwrap();
        let loaded = block_on(store.load("q1")).unwrap();
        assert_eq!(loaded, key);
    }

    #[test]
    fn test_save_replaces_prior_record() {
        let store = MemoryStore::new();
        block_on(store.save("q1", &sample_key(10.0))).unwrap();
        block_on(store.save("q1", &sample_key(99.0))).unwrap();

        let loaded = block_on(store.load("q1")).unwrap();
        assert_eq!(loaded, sample_key(99.0));
        assert_eq!(block_on(store.list()).unwrap().len(), 1);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let result = block_on(store.load("nonexistent"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        block_on(store.save("q1", &sample_key(10.0))).unwrap();
        assert!(block_on(store.exists("q1")).unwrap());

        block_on(store.delete("q1")).unwrap();
        assert!(!block_on(store.exists("q1")).unwrap());
    }
}
