//! Kerf application shell.
//!
//! Wires the editing core, the renderer and project storage together behind
//! a handful of commands.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use kerf_core::storage::{FileStorage, LAST_PROJECT_KEY, Storage};
use kerf_core::{Canvas, ProjectFile, ShortcutRegistry, StorageError};
use kerf_render::RendererError;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Parser, Debug)]
#[command(name = "kerf", about = "Kerf laser/CNC layout project tool")]
pub struct Cli {
    /// Project storage directory; defaults to the per-user data directory.
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a new project with the starter rectangle.
    New { name: String, output: PathBuf },
    /// Export the monochrome PNG preview of a project.
    Preview { project: PathBuf, output: PathBuf },
    /// Summarize a project file.
    Info { project: PathBuf },
    /// Copy a project file into local storage.
    Import { project: PathBuf },
    /// List projects in local storage.
    List,
    /// Show keyboard shortcuts.
    Shortcuts,
}

/// Run the parsed command line and return the text to print.
pub fn run(cli: &Cli) -> AppResult<String> {
    match &cli.command {
        Command::New { name, output } => {
            let project = new_project(name, output)?;
            Ok(format!(
                "Created project \"{}\" ({}) at {}",
                project.name,
                project.id,
                output.display()
            ))
        }
        Command::Preview { project, output } => {
            let bytes = write_preview(project, output)?;
            Ok(format!("Wrote {} ({bytes} bytes)", output.display()))
        }
        Command::Info { project } => Ok(project_info(&read_project(project)?)),
        Command::Import { project } => {
            let storage = open_storage(cli.storage.as_deref())?;
            let id = import_project(&storage, project)?;
            Ok(format!(
                "Imported {} as {id} into {}",
                project.display(),
                storage.base_path().display()
            ))
        }
        Command::List => {
            let storage = open_storage(cli.storage.as_deref())?;
            Ok(list_projects(&storage)?.join("\n"))
        }
        Command::Shortcuts => Ok(ShortcutRegistry::help_text()),
    }
}

fn open_storage(dir: Option<&Path>) -> AppResult<FileStorage> {
    match dir {
        Some(dir) => Ok(FileStorage::new(dir.to_path_buf())?),
        None => Ok(FileStorage::default_location()?),
    }
}

/// Write a fresh project containing the starter rectangle.
pub fn new_project(name: &str, output: &Path) -> AppResult<ProjectFile> {
    let canvas = Canvas::seeded();
    let project = ProjectFile::capture(&canvas, name);
    write_file(output, project.to_json()?.as_bytes())?;
    log::info!("created project {} at {}", project.id, output.display());
    Ok(project)
}

/// Render a project file's preview to PNG. Returns the PNG size in bytes.
pub fn write_preview(project: &Path, output: &Path) -> AppResult<usize> {
    let canvas = read_project(project)?.to_canvas();
    let pixmap = kerf_render::render_preview(&canvas.document)?;
    let png_data = kerf_render::encode_png(&pixmap)?;
    write_file(output, &png_data)?;
    Ok(png_data.len())
}

/// Copy a project file into `storage` under its own id.
pub fn import_project<S: Storage>(storage: &S, path: &Path) -> AppResult<String> {
    let project = read_project(path)?;
    pollster::block_on(storage.save(&project.id, &project))?;
    Ok(project.id)
}

/// Stored project ids, sorted, without the autosave restore slot.
pub fn list_projects<S: Storage>(storage: &S) -> AppResult<Vec<String>> {
    let mut ids: Vec<String> = pollster::block_on(storage.list())?
        .into_iter()
        .filter(|id| id != LAST_PROJECT_KEY)
        .collect();
    ids.sort();
    Ok(ids)
}

pub fn project_info(project: &ProjectFile) -> String {
    let state = &project.state;
    let hidden = state.objects.iter().filter(|s| s.is_hidden()).count();
    let stock = state.settings.work_area;
    format!(
        "{} ({})\nsaved: {}\nobjects: {} ({} hidden)\nmode: {:?}\nstock: {} x {} x {} mm",
        project.name,
        project.id,
        project.timestamp,
        state.objects.len(),
        hidden,
        state.settings.mode,
        stock.w,
        stock.h,
        stock.t,
    )
}

pub fn read_project(path: &Path) -> AppResult<ProjectFile> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ProjectFile::from_json(&json)?)
}

fn write_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    fs::write(path, bytes).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}
