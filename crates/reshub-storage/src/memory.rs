//! In-memory snapshot store for tests and ephemeral deployments.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reshub_core::result::AppResult;
use reshub_entity::StateSnapshot;

use crate::store::StateStore;

/// Snapshot store that keeps the last saved snapshot in memory.
///
/// Cloning shares the underlying slot, so a test can keep a handle and
/// inspect what the manager persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    /// Last saved snapshot.
    slot: Arc<RwLock<StateSnapshot>>,
    /// Number of successful saves.
    saves: Arc<std::sync::atomic::AtomicU64>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `snapshot`.
    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            slot: Arc::new(RwLock::new(snapshot)),
            saves: Arc::default(),
        }
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> u64 {
        self.saves.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> AppResult<StateSnapshot> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, snapshot: &StateSnapshot) -> AppResult<()> {
        *self.slot.write().await = snapshot.clone();
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}
