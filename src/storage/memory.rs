use super::{Snapshot, Storage, StorageError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    snapshot: Option<Snapshot>,
    saves: usize,
    failing: bool,
}

/// In-process storage for tests and local runs.
///
/// Clones share the same record, so a test can keep a handle after giving one to an engine.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let storage = Self::new();
        storage.lock().snapshot = Some(snapshot);
        storage
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last saved (or seeded) snapshot.
    pub fn saved(&self) -> Option<Snapshot> {
        self.lock().snapshot.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Make every subsequent load and save fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Snapshot, StorageError> {
        let inner = self.lock();
        if inner.failing {
            return Err(StorageError::Unavailable("memory storage set to fail".into()));
        }
        Ok(inner.snapshot.clone().unwrap_or_default())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.failing {
            return Err(StorageError::Unavailable("memory storage set to fail".into()));
        }
        inner.snapshot = Some(snapshot.clone());
        inner.saves += 1;
        Ok(())
    }
}
