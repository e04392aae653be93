//! Collaborator stores: the source-sheet file store and the single-slot
//! run-result store.
//!
//! Both are traits so the local-filesystem implementations used here can be
//! swapped for a blob store or a real datastore without touching the run
//! coordinator's contract.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use badgewatch_core::RunResult;

/// Errors from the file and result stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {name}")]
    NotFound { name: String },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Named-file storage for the master catalogue sheet.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` under `name` and returns a URL for the stored copy.
    async fn upload(&self, name: &str, bytes: &[u8]) -> Result<String, StoreError>;

    /// Makes `name` available as a local file and returns its path.
    async fn download(&self, name: &str) -> Result<PathBuf, StoreError>;
}

/// Single-slot persistence for the latest run outcome.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, result: &RunResult) -> Result<(), StoreError>;

    /// Returns the persisted outcome, or `None` if no run has completed yet.
    async fn load(&self) -> Result<Option<RunResult>, StoreError>;
}

/// [`FileStore`] backed by a directory on the local filesystem.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        // Keep stored files inside the root: use the file name only.
        let name = Path::new(name)
            .file_name()
            .map_or_else(|| name.to_string(), |n| n.to_string_lossy().into_owned());
        self.root.join(name)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn upload(&self, name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Io {
                path: self.root.display().to_string(),
                source: e,
            })?;

        let path = self.entry_path(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::Io {
                path: path.display().to_string(),
                source: e,
            })?;

        tracing::info!(name = %name, bytes = bytes.len(), "catalogue sheet stored");
        Ok(format!("file://{}", path.display()))
    }

    async fn download(&self, name: &str) -> Result<PathBuf, StoreError> {
        let path = self.entry_path(name);
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}

/// [`ResultStore`] persisting one JSON document.
///
/// `save` writes to a sibling temp file and renames it over the target, so
/// a reader never observes a half-written document and the previous result
/// stays visible until the new one is complete.
pub struct JsonFileResultStore {
    path: PathBuf,
}

impl JsonFileResultStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ResultStore for JsonFileResultStore {
    async fn save(&self, result: &RunResult) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io {
                    path: parent.display().to_string(),
                    source: e,
                })?;
        }

        let bytes = serde_json::to_vec_pretty(result)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Io {
                path: tmp.display().to_string(),
                source: e,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io {
                path: self.path.display().to_string(),
                source: e,
            })?;

        Ok(())
    }

    async fn load(&self) -> Result<Option<RunResult>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        let result = serde_json::from_str(&contents)?;
        Ok(Some(result))
    }
}
