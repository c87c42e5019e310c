//! JSON file snapshot store.
//!
//! Saves write the whole document to a uniquely named temporary file in the
//! same directory, fsync it, and rename it over the canonical path. A crash
//! at any point leaves either the old or the new document in place; stray
//! temporary files are never read.
//!
//! Processes sharing the file serialize their cycles through an advisory
//! lock on a sibling `.{name}.lock` file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use reshub_core::error::{AppError, ErrorKind};
use reshub_core::result::AppResult;
use reshub_entity::StateSnapshot;

use crate::store::{StateStore, StoreLock};

/// Snapshot store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Canonical snapshot location.
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for `path`. Nothing is touched on disk until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store and makes sure the parent directory exists.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let store = Self::new(path);
        store.ensure_parent().await?;
        Ok(store)
    }

    /// Canonical snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create state directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }
        Ok(())
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string())
    }

    /// Sibling path used for one save attempt.
    fn temp_path(&self) -> PathBuf {
        let temp_name = format!(".{}.{}.tmp", self.file_name(), uuid::Uuid::new_v4().simple());
        self.path.with_file_name(temp_name)
    }

    /// Sibling path holding the advisory lock.
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_file_name(format!(".{}.lock", self.file_name()))
    }

    /// Writes and fsyncs `snapshot` to a fresh temporary file without publishing it.
    pub(crate) async fn write_temp(&self, snapshot: &StateSnapshot) -> AppResult<PathBuf> {
        let payload = serde_json::to_vec_pretty(snapshot)?;
        let temp_path = self.temp_path();

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create temporary snapshot: {}", temp_path.display()),
                e,
            )
        })?;

        let written = async {
            file.write_all(&payload).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            discard(&temp_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write temporary snapshot: {}", temp_path.display()),
                e,
            ));
        }

        Ok(temp_path)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    fn backend(&self) -> &str {
        "json-file"
    }

    async fn lock(&self) -> AppResult<StoreLock> {
        self.ensure_parent().await?;
        let lock_path = self.lock_path();
        let locked = tokio::task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;
            FileExt::lock_exclusive(&file)?;
            Ok::<_, std::io::Error>(file)
        })
        .await
        .map_err(|e| AppError::storage(format!("Snapshot lock task failed: {e}")))?;

        let file = locked.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to lock snapshot: {}", self.lock_path().display()),
                e,
            )
        })?;
        Ok(StoreLock::held(file))
    }

    async fn load(&self) -> AppResult<StateSnapshot> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet, starting empty");
                return Ok(StateSnapshot::new());
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read snapshot: {}", self.path.display()),
                    e,
                ));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Corrupt reservation snapshot: {}", self.path.display()),
                e,
            )
        })
    }

    async fn save(&self, snapshot: &StateSnapshot) -> AppResult<()> {
        self.ensure_parent().await?;
        let temp_path = self.write_temp(snapshot).await?;

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            discard(&temp_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to publish snapshot: {}", self.path.display()),
                e,
            ));
        }

        debug!(
            path = %self.path.display(),
            reservations = snapshot.len(),
            "Saved reservation snapshot"
        );
        Ok(())
    }
}

async fn discard(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary snapshot");
    }
}
