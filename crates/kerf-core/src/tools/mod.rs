//! Toolbar state: the active tool and the defaults applied to new objects.

use crate::shapes::{FillMode, SerializableColor, ShapeKind};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Freehand,
    Shape,
    Text,
    /// Vector import. Not available; selecting it falls back to `Select`.
    Import,
}

impl ToolKind {
    /// Whether pointer-down with this tool creates an object.
    pub fn creates_objects(&self) -> bool {
        matches!(self, ToolKind::Freehand | ToolKind::Shape | ToolKind::Text)
    }
}

/// User-facing notice raised by a tool change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolNotice {
    ImportUnavailable,
}

impl ToolNotice {
    pub fn message(&self) -> &'static str {
        match self {
            ToolNotice::ImportUnavailable => "Import is not available yet.",
        }
    }
}

/// Toolbar-supplied defaults for new objects. Unset values fall back to the
/// factory defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolConfig {
    /// Kind created by the shape tool.
    pub shape: ShapeKind,
    pub color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub fill_mode: Option<FillMode>,
    #[serde(rename = "depthMM")]
    pub depth_mm: Option<f64>,
    pub font_size: Option<f64>,
}

/// Manages the current tool and its configuration.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Defaults applied to new objects.
    pub config: ToolConfig,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Import is stubbed: it reverts to select and
    /// returns a notice for the host to show.
    pub fn set_tool(&mut self, tool: ToolKind) -> Option<ToolNotice> {
        if tool == ToolKind::Import {
            log::warn!("import tool requested but not implemented");
            self.current_tool = ToolKind::Select;
            return Some(ToolNotice::ImportUnavailable);
        }
        self.current_tool = tool;
        None
    }

    /// Return to the select tool after a one-shot creation.
    pub fn revert_to_select(&mut self) {
        self.current_tool = ToolKind::Select;
    }

    /// Set the shape kind. Only toolbar kinds are accepted.
    pub fn set_shape_kind(&mut self, kind: ShapeKind) -> bool {
        if ShapeKind::toolbar_kinds().contains(&kind) {
            self.config.shape = kind;
            true
        } else {
            false
        }
    }
}
