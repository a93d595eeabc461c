//! Kerf Core Library
//!
//! Scene model and direct-manipulation editing engine for the Kerf laser/CNC
//! layout editor. Rendering lives in `kerf-render`.

pub mod canvas;
pub mod clipboard;
pub mod factory;
pub mod geometry;
pub mod history;
pub mod input;
pub mod inspector;
pub mod interaction;
pub mod settings;
pub mod shapes;
pub mod shortcuts;
pub mod storage;
pub mod tools;

pub use canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, Canvas, CanvasDocument};
pub use clipboard::Clipboard;
pub use factory::ShapeFactory;
pub use geometry::{compute_path_bounds, hit_resize_handle, hit_test};
pub use history::{History, HistoryEntry};
pub use input::{CanvasViewport, CursorHint, Modifiers, PointerEvent};
pub use inspector::{FieldEdit, InspectorView};
pub use interaction::{EventHandler, GestureState, Response};
pub use settings::{EditorMode, ResolvedTheme, Settings, Theme};
pub use shapes::{Shape, ShapeId, ShapeKind};
pub use shortcuts::{ContextMenuState, EditorCommand, ShortcutRegistry, command_for_key};
pub use storage::{ProjectFile, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager};
