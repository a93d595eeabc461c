//! Periodic project saving.

use super::{FileStorage, ProjectFile, Storage, StorageResult};
use crate::canvas::Canvas;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key for the most recently saved project.
pub const LAST_PROJECT_KEY: &str = "__last_project__";

/// Saves the open project when it is dirty and the interval has elapsed.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    /// Key and display name of the open project.
    project_id: Option<String>,
    project_name: String,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            project_id: None,
            project_name: "Untitled".to_string(),
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the project as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_project(&mut self, id: Option<String>, name: impl Into<String>) {
        self.project_id = id;
        self.project_name = name.into();
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Dirty and either never saved or the interval has elapsed.
    pub fn should_save(&self) -> bool {
        self.dirty && self.last_save.is_none_or(|last| last.elapsed() >= self.interval)
    }

    /// Save if needed. Returns true if a save happened.
    pub async fn save_if_needed(&mut self, canvas: &Canvas) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(canvas).await?;
        Ok(true)
    }

    /// Save now under the project key and under [`LAST_PROJECT_KEY`].
    pub async fn save(&mut self, canvas: &Canvas) -> StorageResult<ProjectFile> {
        let project = match &self.project_id {
            Some(id) => ProjectFile::capture_with_id(canvas, id.clone(), self.project_name.clone()),
            None => ProjectFile::capture(canvas, self.project_name.clone()),
        };
        self.storage.save(&project.id, &project).await?;
        self.storage.save(LAST_PROJECT_KEY, &project).await?;

        self.project_id = Some(project.id.clone());
        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(project)
    }

    /// Load a project by key and make it the open project.
    pub async fn load(&mut self, id: &str) -> StorageResult<Canvas> {
        let project = self.storage.load(id).await?;
        self.opened(&project);
        Ok(project.to_canvas())
    }

    /// Restore the last saved project, if any.
    pub async fn load_last(&mut self) -> Option<Canvas> {
        match self.storage.load(LAST_PROJECT_KEY).await {
            Ok(project) => {
                self.opened(&project);
                Some(project.to_canvas())
            }
            Err(e) => {
                log::debug!("no last project to restore: {e}");
                None
            }
        }
    }

    fn opened(&mut self, project: &ProjectFile) {
        self.project_id = Some(project.id.clone());
        self.project_name = project.name.clone();
        self.dirty = false;
        self.last_save = Some(Instant::now());
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// All saved project keys, without the last-project alias.
    pub async fn list_projects(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_PROJECT_KEY);
        Ok(ids)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// File storage in the platform data directory.
pub fn create_default_storage() -> StorageResult<Arc<FileStorage>> {
    Ok(Arc::new(FileStorage::default_location()?))
}

/// Auto-save manager over [`create_default_storage`].
pub fn create_autosave_manager() -> StorageResult<AutoSaveManager<FileStorage>> {
    Ok(AutoSaveManager::new(create_default_storage()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use pollster::block_on;

    #[test]
    fn test_autosave_manager_creation() {
        let manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
    }

    #[test]
    fn test_autosave_saves_when_dirty() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        let canvas = Canvas::seeded();

        assert!(!block_on(manager.save_if_needed(&canvas)).unwrap());
        manager.mark_dirty();
        assert!(manager.should_save());
        assert!(block_on(manager.save_if_needed(&canvas)).unwrap());
        assert!(!manager.is_dirty());

        manager.mark_dirty();
        assert!(!manager.should_save(), "interval has not elapsed");
        manager.set_interval(Duration::ZERO);
        assert!(manager.should_save());
    }

    #[test]
    fn test_autosave_keeps_project_id() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        let canvas = Canvas::seeded();
        let first = block_on(manager.save(&canvas)).unwrap();
        let second = block_on(manager.save(&canvas)).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(manager.project_id(), Some(first.id.as_str()));
    }

    #[test]
    fn test_autosave_load_last() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        manager.set_project(None, "Badge");
        let canvas = Canvas::seeded();
        block_on(manager.save(&canvas)).unwrap();

        let mut restored_manager = AutoSaveManager::new(storage);
        let restored = block_on(restored_manager.load_last()).unwrap();
        assert_eq!(restored.document.len(), 1);
        assert_eq!(restored.document.selected_id(), canvas.document.selected_id());
        assert_eq!(restored_manager.project_id(), manager.project_id());
    }

    #[test]
    fn test_load_last_missing() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(block_on(manager.load_last()).is_none());
    }

    #[test]
    fn test_list_excludes_last_key() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        block_on(manager.save(&Canvas::new())).unwrap();
        let list = block_on(manager.list_projects()).unwrap();
        assert_eq!(list.len(), 1);
        assert!(!list.contains(&LAST_PROJECT_KEY.to_string()));
    }
}
