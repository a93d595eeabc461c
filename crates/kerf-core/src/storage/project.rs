//! On-disk project format.

use super::{StorageError, StorageResult};
use crate::canvas::{Canvas, CanvasDocument};
use crate::geometry::resize_frame;
use crate::settings::Settings;
use crate::shapes::{Shape, ShapeId};
use crate::tools::{ToolConfig, ToolKind, ToolManager};
use chrono::Utc;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Newest project format this build reads and writes.
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Editor state persisted inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    /// Objects in paint order.
    pub objects: Vec<Shape>,
    #[serde(default)]
    pub selected_id: Option<ShapeId>,
    #[serde(default)]
    pub tool: ToolKind,
    #[serde(default)]
    pub tool_config: ToolConfig,
    #[serde(default)]
    pub settings: Settings,
}

/// A saved project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: u32,
    /// Storage key.
    #[serde(default = "new_project_id")]
    pub id: String,
    pub name: String,
    pub state: ProjectState,
    /// RFC 3339 save time.
    pub timestamp: String,
}

fn new_project_id() -> String {
    Uuid::new_v4().to_string()
}

impl ProjectFile {
    /// Snapshot a canvas. History and clipboard are session-only.
    pub fn capture(canvas: &Canvas, name: impl Into<String>) -> Self {
        Self::capture_with_id(canvas, new_project_id(), name)
    }

    pub fn capture_with_id(canvas: &Canvas, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            id: id.into(),
            name: name.into(),
            state: ProjectState {
                objects: canvas.document.shapes_ordered().cloned().collect(),
                selected_id: canvas.document.selected_id(),
                tool: canvas.tool_manager.current_tool,
                tool_config: canvas.tool_manager.config.clone(),
                settings: canvas.settings.clone(),
            },
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Rebuild an editing session. A stale `selectedId` is dropped, and
    /// objects and settings are brought back within their invariants.
    pub fn to_canvas(&self) -> Canvas {
        let state = &self.state;
        let objects = state.objects.iter().cloned().filter_map(normalize_loaded);
        let document = CanvasDocument::from_shapes(objects, state.selected_id);
        let mut tool_manager = ToolManager {
            current_tool: ToolKind::Select,
            config: state.tool_config.clone(),
        };
        // Import is never a resting tool.
        tool_manager.set_tool(state.tool);
        let mut settings = state.settings.clone();
        settings.set_drag_sensitivity(settings.drag_sensitivity);
        Canvas {
            document,
            tool_manager,
            settings,
            ..Canvas::default()
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Parse a project, rejecting formats newer than this build.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let project: Self =
            serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
        if project.version > PROJECT_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion(project.version));
        }
        Ok(project)
    }
}

/// Repair a loaded object: paths get bounds recomputed from their points
/// (or are dropped below two points), other kinds get negative extents
/// flipped and floored at [`crate::geometry::MIN_RESIZE_EXTENT`].
fn normalize_loaded(mut shape: Shape) -> Option<Shape> {
    if let Shape::Path(path) = &mut shape {
        if !path.is_committable() {
            log::warn!("dropping path {} with {} point(s)", path.id, path.points.len());
            return None;
        }
        let stored = path.frame;
        path.recompute_bounds();
        if path.frame != stored {
            log::warn!("path {}: frame recomputed from points", path.id);
        }
        return Some(shape);
    }

    let stored = *shape.frame();
    let frame = resize_frame(&stored, Vec2::ZERO).frame;
    if frame != stored {
        log::warn!("object {}: frame {stored:?} normalized to {frame:?}", shape.id());
        *shape.frame_mut() = frame;
    }
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{EditorMode, Theme};
    use crate::geometry::{compute_path_bounds, hit_test};
    use crate::shapes::{Frame, Freehand, Rectangle, Text};
    use kurbo::Point;

    fn sample_canvas() -> Canvas {
        let mut canvas = Canvas::seeded();
        canvas
            .document
            .add_shape(Shape::Path(Freehand::from_points(vec![Point::new(1.0, 2.0), Point::new(30.0, 40.0)])));
        let text = Shape::Text(Text::new(Frame::new(0.0, 0.0, 400.0, 140.0), 32.0));
        let text_id = text.id();
        canvas.document.add_shape(text);
        canvas.select(text_id);
        canvas.settings.mode = EditorMode::Cnc;
        canvas.settings.theme = Theme::Light;
        canvas
    }

    #[test]
    fn test_project_round_trip() {
        let canvas = sample_canvas();
        let project = ProjectFile::capture(&canvas, "Coasters");
        let json = project.to_json().unwrap();
        let loaded = ProjectFile::from_json(&json).unwrap();
        assert_eq!(loaded, project);

        let restored = loaded.to_canvas();
        let original: Vec<_> = canvas.document.shapes_ordered().collect();
        let back: Vec<_> = restored.document.shapes_ordered().collect();
        assert_eq!(original, back);
        assert_eq!(restored.document.selected_id(), canvas.document.selected_id());
        assert_eq!(restored.settings.mode, EditorMode::Cnc);
        assert!(!restored.document.can_undo());
    }

    #[test]
    fn test_json_layout() {
        let project = ProjectFile::capture(&sample_canvas(), "Layout");
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["name"], "Layout");
        assert!(value["state"]["objects"].is_array());
        assert_eq!(value["state"]["objects"][0]["type"], "rect");
        assert_eq!(value["state"]["objects"][2]["fontSize"], 32.0);
        assert!(value["state"]["selectedId"].is_string());
        assert_eq!(value["state"]["tool"], "select");
        assert!(chrono::DateTime::parse_from_rfc3339(value["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_rejects_newer_version() {
        let mut project = ProjectFile::capture(&Canvas::new(), "Future");
        project.version = PROJECT_FORMAT_VERSION + 1;
        let json = serde_json::to_string(&project).unwrap();
        assert!(matches!(
            ProjectFile::from_json(&json),
            Err(StorageError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ProjectFile::from_json("{not json"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_stale_selection_dropped() {
        let mut project = ProjectFile::capture(&Canvas::new(), "Stale");
        project.state.objects.push(Shape::Rect(Rectangle::new(Frame::new(0.0, 0.0, 10.0, 10.0))));
        project.state.selected_id = Some(ShapeId::new_v4());
        project.state.tool = ToolKind::Import;
        let canvas = project.to_canvas();
        assert_eq!(canvas.document.len(), 1);
        assert_eq!(canvas.document.selected_id(), None);
        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Select);
    }

    #[test]
    fn test_load_clamps_drag_sensitivity() {
        let mut project = ProjectFile::capture(&Canvas::new(), "Fast");
        project.state.settings.drag_sensitivity = 5.0;
        let json = project.to_json().unwrap();
        let canvas = ProjectFile::from_json(&json).unwrap().to_canvas();
        assert!((canvas.settings.drag_sensitivity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_flips_negative_extents() {
        let mut project = ProjectFile::capture(&Canvas::new(), "Flipped");
        let rect = Shape::Rect(Rectangle::new(Frame::new(500.0, 500.0, -100.0, -100.0)));
        let id = rect.id();
        project.state.objects.push(rect);
        let canvas = project.to_canvas();

        let frame = *canvas.document.get_shape(id).unwrap().frame();
        assert_eq!(frame, Frame::new(400.0, 400.0, 100.0, 100.0));
        let hit = hit_test(canvas.document.shapes_ordered(), Point::new(450.0, 450.0));
        assert_eq!(hit.map(Shape::id), Some(id));
    }

    #[test]
    fn test_load_repairs_paths() {
        let points = vec![Point::new(10.0, 10.0), Point::new(60.0, 90.0)];
        let mut stale = Freehand::from_points(points.clone());
        stale.frame = Frame::new(0.0, 0.0, 1.0, 1.0);
        let stale_id = stale.id;
        let single = Freehand::from_points(vec![Point::new(5.0, 5.0)]);
        let single_id = single.id;

        let mut project = ProjectFile::capture(&Canvas::new(), "Paths");
        project.state.objects.push(Shape::Path(stale));
        project.state.objects.push(Shape::Path(single));
        project.state.selected_id = Some(single_id);
        let canvas = project.to_canvas();

        assert_eq!(canvas.document.len(), 1);
        assert!(canvas.document.get_shape(single_id).is_none());
        assert_eq!(canvas.document.selected_id(), None);
        let repaired = canvas.document.get_shape(stale_id).unwrap();
        assert_eq!(*repaired.frame(), compute_path_bounds(&points));
    }
}
