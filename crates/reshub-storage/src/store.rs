//! Snapshot store trait.

use async_trait::async_trait;

use reshub_core::result::AppResult;
use reshub_entity::StateSnapshot;

/// Cross-process exclusion for one load/modify/save cycle.
///
/// Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
    file: Option<std::fs::File>,
}

impl StoreLock {
    /// A guard that excludes nothing, for stores private to one process.
    pub fn none() -> Self {
        Self { file: None }
    }

    /// A guard over an already locked file.
    pub fn held(file: std::fs::File) -> Self {
        Self { file: Some(file) }
    }

    /// Whether an OS lock is actually held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

/// Whole-snapshot persistence for reservations.
///
/// Implementations must guarantee that `load` never observes a partially
/// written snapshot, even if a previous `save` was interrupted.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Short backend name for logs (e.g. `"json-file"`).
    fn backend(&self) -> &str;

    /// Blocks until no other process is inside a load/modify/save cycle on
    /// the same snapshot. The default is a no-op.
    async fn lock(&self) -> AppResult<StoreLock> {
        Ok(StoreLock::none())
    }

    /// Returns the last saved snapshot, or an empty one if nothing was ever saved.
    async fn load(&self) -> AppResult<StateSnapshot>;

    /// Atomically replaces the saved snapshot.
    async fn save(&self, snapshot: &StateSnapshot) -> AppResult<()>;
}
