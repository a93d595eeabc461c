//! JSON file storage backend.

use super::{BoxFuture, ProjectFile, Storage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as `<id>.json` in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::Io(format!(
                "Failed to create storage directory {}: {e}",
                base_path.display()
            ))
        })?;
        Ok(Self { base_path })
    }

    /// Storage under the platform data directory, e.g.
    /// `~/.local/share/kerf/projects` on Linux.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine data directory".to_string()))?;
        Self::new(base.join("kerf").join("projects"))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, project: &ProjectFile) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        let json = project.to_json();
        Box::pin(async move {
            let json = json?;
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {e}", path.display()))
            })?;
            log::info!("saved project to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ProjectFile>> {
        let path = self.project_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {e}", path.display()))
            })?;
            let project = ProjectFile::from_json(&json)?;
            log::info!("loaded project {:?} from {}", project.name, path.display());
            Ok(project)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
            Ok(entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}
