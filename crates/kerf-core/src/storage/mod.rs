//! Project persistence.

mod autosave;
mod file;
mod memory;
mod project;

pub use autosave::{
    AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, LAST_PROJECT_KEY, create_autosave_manager,
    create_default_storage,
};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use project::{PROJECT_FORMAT_VERSION, ProjectFile, ProjectState};

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unsupported project version {0} (newest supported is {PROJECT_FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Project storage backend.
///
/// Keys are caller-chosen strings; backends may sanitize them.
pub trait Storage: Send + Sync {
    fn save(&self, id: &str, project: &ProjectFile) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectFile>>;

    /// Delete a project. Deleting a missing key is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
