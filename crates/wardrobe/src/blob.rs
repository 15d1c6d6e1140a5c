use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Error reported by a [`BlobStore`] backend (quota exceeded, I/O failure).
#[derive(Error, Debug)]
#[error("{0}")]
pub struct BlobError(pub String);

impl BlobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Flat key-value persistence collaborator.
///
/// The store reads its key once at load and writes through after every
/// mutation. Write failures are logged by the caller, never surfaced to the
/// end user, so implementations should report honest errors rather than
/// panic.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;
    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError>;
}

/// In-process [`BlobStore`]. Clones share the same underlying map, which is
/// how a reload is simulated in tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let map = self
            .inner
            .lock()
            .map_err(|_| BlobError::new("memory blob store poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| BlobError::new("memory blob store poisoned"))?;
        map.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let store = MemoryBlobStore::new();
        let view = store.clone();

        store.set("closet", b"payload").unwrap();
        assert_eq!(view.get("closet").unwrap(), Some(b"payload".to_vec()));
        assert_eq!(view.get("elsewhere").unwrap(), None);
    }
}
