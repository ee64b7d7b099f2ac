use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::{error::StorageError, storage::BlobStorage};

/// Thread-safe in-memory `BlobStorage`.
///
/// Backed by a DashMap so reads are concurrent and lock-free for most cases.
/// Nothing survives a restart; useful for demos and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl BlobStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.get(key).map(|v| v.clone()))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
