use async_trait::async_trait;

use crate::error::StorageError;

/// A string key-value store holding whole serialized values.
///
/// Values are always read and written in full; there are no partial updates.
#[async_trait]
pub trait BlobStorage: Send + Sync + 'static {
    /// Fetch the value stored under `key`, or `None` if nothing was written yet.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
