//! In-memory storage backend.

use super::{BoxFuture, ProjectFile, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and scratch sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    projects: RwLock<HashMap<String, ProjectFile>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, project: &ProjectFile) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let project = project.clone();
        Box::pin(async move {
            self.projects.write().map_err(lock_error)?.insert(id, project);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectFile>> {
        let id = id.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            projects.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.projects.write().map_err(lock_error)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(lock_error)?;
            Ok(projects.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.projects.read().map_err(lock_error)?.contains_key(&id)) })
    }
}
