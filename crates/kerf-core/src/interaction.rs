//! Pointer gesture state machine.
//!
//! One gesture runs at a time and is bound to the pointer that started it.
//! Object creation happens on pointer-down; dragging, resizing and freehand
//! drawing continue until pointer-up or cancel.

use crate::canvas::Canvas;
use crate::factory::ShapeFactory;
use crate::geometry::{hit_resize_handle, hit_test, resize_frame, scale_points, translate_points};
use crate::history::{GeometrySnapshot, HistoryEntry};
use crate::input::{CanvasViewport, CursorHint, PointerEvent, PointerId};
use crate::shapes::{Shape, ShapeId, ShapeKind};
use crate::shortcuts::{ContextMenuState, EditorCommand};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// What a handler changed, so the host knows what to refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    pub repaint: bool,
    pub selection_changed: bool,
    pub geometry_changed: bool,
}

impl Response {
    pub fn none() -> Self {
        Self::default()
    }

    fn selection() -> Self {
        Self {
            repaint: true,
            selection_changed: true,
            geometry_changed: false,
        }
    }

    fn geometry() -> Self {
        Self {
            repaint: true,
            selection_changed: false,
            geometry_changed: true,
        }
    }

    fn all() -> Self {
        Self {
            repaint: true,
            selection_changed: true,
            geometry_changed: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.repaint || self.selection_changed || self.geometry_changed)
    }
}

/// Reference geometry captured when a drag or resize starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationState {
    pub shape_id: ShapeId,
    /// Pointer position at gesture start, in canvas space.
    pub start: Point,
    pub reference: GeometrySnapshot,
}

/// Current gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(ManipulationState),
    Resizing(ManipulationState),
    FreehandDrawing { shape_id: ShapeId },
}

/// Translates pointer events into scene mutations.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    state: GestureState,
    /// Pointer that owns the current gesture.
    active_pointer: Option<PointerId>,
    pub viewport: CanvasViewport,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(viewport: CanvasViewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Feed one pointer event in screen coordinates.
    ///
    /// Events from pointers other than the one that started the current
    /// gesture are ignored.
    pub fn handle_pointer(&mut self, canvas: &mut Canvas, event: PointerEvent) -> Response {
        let pointer_id = event.pointer_id();
        if let Some(active) = self.active_pointer {
            if active != pointer_id {
                log::debug!("ignoring pointer {pointer_id} during gesture of pointer {active}");
                return Response::none();
            }
        }

        match event {
            PointerEvent::Down { position, .. } => {
                if self.is_active() {
                    return Response::none();
                }
                let point = self.viewport.screen_to_canvas(position);
                let response = self.handle_press(canvas, point);
                if self.is_active() {
                    self.active_pointer = Some(pointer_id);
                }
                response
            }
            PointerEvent::Move { position, .. } => {
                let point = self.viewport.screen_to_canvas(position);
                self.handle_drag(canvas, point)
            }
            PointerEvent::Up { position, .. } => {
                let point = self.viewport.screen_to_canvas(position);
                self.handle_release(canvas, point)
            }
            PointerEvent::Cancel { .. } => self.cancel(canvas),
        }
    }

    /// Handle a press at a canvas-space point.
    pub fn handle_press(&mut self, canvas: &mut Canvas, point: Point) -> Response {
        match canvas.tool_manager.current_tool {
            ToolKind::Select => self.press_select(canvas, point),
            ToolKind::Freehand => {
                let shape = ShapeFactory::create_at(
                    ShapeKind::Path,
                    point,
                    &canvas.tool_manager.config,
                    canvas.settings.resolved_theme(),
                );
                let shape_id = shape.id();
                // Selected on commit, not while the stroke is provisional.
                canvas.document.add_shape(shape);
                log::debug!("freehand: begin {shape_id}");
                self.state = GestureState::FreehandDrawing { shape_id };
                Response::all()
            }
            ToolKind::Shape | ToolKind::Text => {
                let kind = match canvas.tool_manager.current_tool {
                    ToolKind::Text => ShapeKind::Text,
                    _ => canvas.tool_manager.config.shape,
                };
                let shape = ShapeFactory::create_at(
                    kind,
                    point,
                    &canvas.tool_manager.config,
                    canvas.settings.resolved_theme(),
                );
                let id = canvas.document.add_shape_recorded(shape);
                log::debug!("created {} {id}", kind.name());
                canvas.tool_manager.revert_to_select();
                Response::all()
            }
            ToolKind::Import => {
                log::warn!("import tool active; treating press as select");
                canvas.tool_manager.revert_to_select();
                self.press_select(canvas, point)
            }
        }
    }

    fn press_select(&mut self, canvas: &mut Canvas, point: Point) -> Response {
        let previous = canvas.document.selected_id();
        let hit = hit_test(canvas.document.shapes_ordered(), point).map(|shape| {
            (
                shape.id(),
                shape.is_locked(),
                hit_resize_handle(shape, point),
                GeometrySnapshot::capture(shape),
            )
        });
        let Some((shape_id, locked, on_handle, reference)) = hit else {
            canvas.document.clear_selection();
            return if previous.is_some() {
                Response::selection()
            } else {
                Response::none()
            };
        };

        canvas.document.select(Some(shape_id));

        if !locked {
            let manipulation = ManipulationState {
                shape_id,
                start: point,
                reference,
            };
            self.state = if on_handle {
                log::debug!("resize: begin {shape_id}");
                GestureState::Resizing(manipulation)
            } else {
                log::debug!("drag: begin {shape_id}");
                GestureState::Dragging(manipulation)
            };
        }

        if previous == Some(shape_id) {
            Response {
                repaint: true,
                ..Response::none()
            }
        } else {
            Response::selection()
        }
    }

    /// Handle pointer motion at a canvas-space point.
    pub fn handle_drag(&mut self, canvas: &mut Canvas, point: Point) -> Response {
        match &self.state {
            GestureState::Idle => Response::none(),
            GestureState::Dragging(manip) => {
                let delta = (point - manip.start) * canvas.settings.drag_sensitivity;
                let reference = &manip.reference;
                canvas
                    .document
                    .mutate(manip.shape_id, |shape| apply_drag(shape, reference, delta))
                    .map_or_else(Response::none, |_| Response::geometry())
            }
            GestureState::Resizing(manip) => {
                let delta = point - manip.start;
                let reference = &manip.reference;
                canvas
                    .document
                    .mutate(manip.shape_id, |shape| apply_resize(shape, reference, delta))
                    .map_or_else(Response::none, |_| Response::geometry())
            }
            GestureState::FreehandDrawing { shape_id } => canvas
                .document
                .mutate(*shape_id, |shape| {
                    if let Shape::Path(path) = shape {
                        path.add_point(point);
                    }
                })
                .map_or_else(Response::none, |_| Response {
                    repaint: true,
                    ..Response::none()
                }),
        }
    }

    /// Handle a release at a canvas-space point, committing the gesture.
    ///
    /// The release position finishes a drag or resize; it is not appended to
    /// a freehand stroke.
    pub fn handle_release(&mut self, canvas: &mut Canvas, point: Point) -> Response {
        if matches!(
            self.state,
            GestureState::Dragging(_) | GestureState::Resizing(_)
        ) {
            self.handle_drag(canvas, point);
        }
        self.active_pointer = None;

        match std::mem::take(&mut self.state) {
            GestureState::Idle => Response::none(),
            GestureState::Dragging(manip) => {
                commit_manipulation(canvas, manip, false);
                Response::geometry()
            }
            GestureState::Resizing(manip) => {
                commit_manipulation(canvas, manip, true);
                Response::geometry()
            }
            GestureState::FreehandDrawing { shape_id } => {
                canvas.tool_manager.revert_to_select();
                commit_freehand(canvas, shape_id)
            }
        }
    }

    /// Abort the current gesture, restoring geometry captured at its start.
    /// Nothing is recorded and the tool is left as it is.
    pub fn cancel(&mut self, canvas: &mut Canvas) -> Response {
        self.active_pointer = None;
        match std::mem::take(&mut self.state) {
            GestureState::Idle => Response::none(),
            GestureState::Dragging(manip) | GestureState::Resizing(manip) => {
                log::debug!("cancel: restoring {}", manip.shape_id);
                canvas
                    .document
                    .mutate(manip.shape_id, |shape| manip.reference.apply(shape));
                Response::geometry()
            }
            GestureState::FreehandDrawing { shape_id } => {
                log::debug!("cancel: discarding stroke {shape_id}");
                canvas.document.remove_shape(shape_id);
                Response::all()
            }
        }
    }

    /// Run a keyboard or menu command. Any gesture in progress is cancelled
    /// first so history never interleaves with a half-finished drag.
    pub fn handle_command(&mut self, canvas: &mut Canvas, command: EditorCommand) -> Response {
        let cancelled = self.cancel(canvas);
        if command == EditorCommand::Cancel {
            return cancelled;
        }
        if canvas.execute(command) {
            Response::all()
        } else {
            cancelled
        }
    }

    /// Cursor to show over `point` (canvas space).
    pub fn cursor_hint(&self, canvas: &Canvas, point: Point) -> CursorHint {
        if canvas.tool_manager.current_tool.creates_objects() {
            return CursorHint::Crosshair;
        }
        let on_handle = canvas.document.selected().is_some_and(|selected| {
            !selected.is_locked() && !selected.is_hidden() && hit_resize_handle(selected, point)
        });
        if on_handle {
            return CursorHint::ResizeNwse;
        }
        match hit_test(canvas.document.shapes_ordered(), point) {
            Some(hit) if !hit.is_locked() => CursorHint::Move,
            _ => CursorHint::Default,
        }
    }

    /// Secondary click at a screen point: select what is under the pointer
    /// and report which context menu entries are enabled.
    pub fn context_click(&mut self, canvas: &mut Canvas, position: Point) -> ContextMenuState {
        let point = self.viewport.screen_to_canvas(position);
        if let Some(id) = hit_test(canvas.document.shapes_ordered(), point).map(Shape::id) {
            canvas.document.select(Some(id));
        }
        ContextMenuState::for_canvas(canvas)
    }
}

fn apply_drag(shape: &mut Shape, reference: &GeometrySnapshot, delta: Vec2) {
    let frame = shape.frame_mut();
    frame.x = reference.frame.x + delta.x;
    frame.y = reference.frame.y + delta.y;
    if let (Some(points), Some(original)) = (shape.points_mut(), &reference.points) {
        points.clone_from(original);
        translate_points(points, delta);
    }
}

fn apply_resize(shape: &mut Shape, reference: &GeometrySnapshot, delta: Vec2) {
    let outcome = resize_frame(&reference.frame, delta);
    *shape.frame_mut() = outcome.frame;
    if let (Some(points), Some(original)) = (shape.points_mut(), &reference.points) {
        points.clone_from(original);
        scale_points(
            points,
            reference.frame.origin(),
            outcome.scale.x,
            outcome.scale.y,
        );
    }
}

/// Record one move/resize entry if the geometry actually changed.
fn commit_manipulation(canvas: &mut Canvas, manip: ManipulationState, resized: bool) {
    let Some(current) = canvas.document.mutate(manip.shape_id, |shape| {
        if let (true, Shape::Path(path)) = (resized, &mut *shape) {
            path.recompute_bounds();
        }
        GeometrySnapshot::capture(shape)
    }) else {
        return;
    };
    if current == manip.reference {
        return;
    }
    let entry = if resized {
        HistoryEntry::Resize {
            id: manip.shape_id,
            previous: manip.reference,
        }
    } else {
        HistoryEntry::Move {
            id: manip.shape_id,
            previous: manip.reference,
        }
    };
    canvas.document.record(entry);
}

fn commit_freehand(canvas: &mut Canvas, shape_id: ShapeId) -> Response {
    let committable = canvas.document.mutate(shape_id, |shape| match shape {
        Shape::Path(path) if path.is_committable() => {
            path.recompute_bounds();
            true
        }
        _ => false,
    });

    match committable {
        Some(true) => {
            if let (Some(shape), Some(index)) = (
                canvas.document.get_shape(shape_id).cloned(),
                canvas.document.z_index(shape_id),
            ) {
                canvas.document.select(Some(shape_id));
                canvas.document.record(HistoryEntry::Create { shape, index });
            }
            log::debug!("freehand: committed {shape_id}");
            Response::all()
        }
        Some(false) => {
            log::debug!("freehand: discarding short stroke {shape_id}");
            canvas.document.remove_shape(shape_id);
            Response::all()
        }
        None => Response::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Frame, Freehand, Rectangle};

    fn canvas_with_rect(frame: Frame) -> (Canvas, ShapeId) {
        let mut canvas = Canvas::new();
        let shape = Shape::Rect(Rectangle::new(frame));
        let id = shape.id();
        canvas.document.add_shape(shape);
        (canvas, id)
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            pointer_id: 1,
            position: Point::new(x, y),
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            pointer_id: 1,
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            pointer_id: 1,
            position: Point::new(x, y),
        }
    }

    #[test]
    fn test_drag_damped_by_sensitivity() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(100.0, 100.0, 200.0, 100.0));
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(150.0, 150.0));
        assert!(matches!(handler.state(), GestureState::Dragging(_)));
        handler.handle_pointer(&mut canvas, moved(250.0, 150.0));
        handler.handle_pointer(&mut canvas, up(250.0, 150.0));

        let frame = *canvas.document.get_shape(id).unwrap().frame();
        assert!((frame.x - 135.0).abs() < 1e-9);
        assert!((frame.y - 100.0).abs() < 1e-9);
        assert_eq!(canvas.document.history().undo_len(), 1);

        assert!(canvas.undo());
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), Frame::new(100.0, 100.0, 200.0, 100.0));
        assert!(canvas.redo());
        assert!((canvas.document.get_shape(id).unwrap().frame().x - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_without_motion_records_nothing() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        let mut handler = EventHandler::new();
        let response = handler.handle_pointer(&mut canvas, down(50.0, 50.0));
        assert!(response.selection_changed);
        handler.handle_pointer(&mut canvas, up(50.0, 50.0));
        assert_eq!(canvas.document.selected_id(), Some(id));
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_miss_clears_selection() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        canvas.select(id);
        let mut handler = EventHandler::new();
        let response = handler.handle_pointer(&mut canvas, down(500.0, 500.0));
        assert!(response.selection_changed);
        assert_eq!(canvas.document.selected_id(), None);
        assert!(!handler.is_active());
    }

    #[test]
    fn test_resize_and_flip() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(100.0, 100.0, 200.0, 100.0));
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(300.0, 200.0));
        assert!(matches!(handler.state(), GestureState::Resizing(_)));
        handler.handle_pointer(&mut canvas, moved(0.0, 250.0));
        handler.handle_pointer(&mut canvas, up(0.0, 250.0));

        let frame = *canvas.document.get_shape(id).unwrap().frame();
        assert_eq!(frame, Frame::new(0.0, 100.0, 100.0, 150.0));

        assert!(canvas.undo());
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), Frame::new(100.0, 100.0, 200.0, 100.0));
        assert!(canvas.redo());
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), frame);
    }

    #[test]
    fn test_resize_scales_path_points_and_recomputes_bounds() {
        let mut canvas = Canvas::new();
        let path = Shape::Path(Freehand::from_points(vec![Point::new(50.0, 50.0), Point::new(150.0, 150.0)]));
        let id = path.id();
        let reference = *path.frame();
        canvas.document.add_shape(path);
        let mut handler = EventHandler::new();

        let corner = reference.corner();
        handler.handle_press(&mut canvas, corner);
        handler.handle_release(&mut canvas, corner + Vec2::new(reference.w, 0.0));

        let shape = canvas.document.get_shape(id).unwrap();
        let points = shape.points().unwrap();
        assert!((points[0].x - (reference.x + 2.0 * (50.0 - reference.x))).abs() < 1e-9);
        assert!((points[1].x - (reference.x + 2.0 * (150.0 - reference.x))).abs() < 1e-9);
        assert!((points[1].y - 150.0).abs() < 1e-9);
        assert_eq!(*shape.frame(), crate::geometry::compute_path_bounds(points));
    }

    #[test]
    fn test_drag_moves_path_points() {
        let mut canvas = Canvas::new();
        let path = Shape::Path(Freehand::from_points(vec![Point::new(50.0, 50.0), Point::new(150.0, 150.0)]));
        let id = path.id();
        canvas.document.add_shape(path);
        canvas.settings.set_drag_sensitivity(1.0);
        let mut handler = EventHandler::new();

        handler.handle_press(&mut canvas, Point::new(100.0, 100.0));
        handler.handle_release(&mut canvas, Point::new(110.0, 80.0));

        let points = canvas.document.get_shape(id).unwrap().points().unwrap();
        assert_eq!(points[0], Point::new(60.0, 30.0));
        assert_eq!(points[1], Point::new(160.0, 130.0));
    }

    #[test]
    fn test_path_resize_and_drag_undo_redo_restores_points() {
        let mut canvas = Canvas::new();
        let original = vec![Point::new(50.0, 50.0), Point::new(150.0, 150.0)];
        let path = Shape::Path(Freehand::from_points(original.clone()));
        let id = path.id();
        let reference = *path.frame();
        canvas.document.add_shape(path);
        canvas.settings.set_drag_sensitivity(1.0);
        let mut handler = EventHandler::new();
        let points_of = |canvas: &Canvas| canvas.document.get_shape(id).unwrap().points().unwrap().to_vec();

        let corner = reference.corner();
        handler.handle_press(&mut canvas, corner);
        handler.handle_release(&mut canvas, corner + Vec2::new(reference.w, 0.0));
        let resized = points_of(&canvas);
        assert_ne!(resized, original);

        let grab = resized[0].midpoint(resized[1]);
        handler.handle_press(&mut canvas, grab);
        handler.handle_release(&mut canvas, grab + Vec2::new(10.0, 20.0));
        let moved = points_of(&canvas);
        assert_eq!(
            moved,
            resized.iter().map(|p| *p + Vec2::new(10.0, 20.0)).collect::<Vec<_>>()
        );

        assert!(canvas.undo());
        assert_eq!(points_of(&canvas), resized);
        assert!(canvas.undo());
        assert_eq!(points_of(&canvas), original);
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), reference);

        assert!(canvas.redo());
        assert_eq!(points_of(&canvas), resized);
        assert!(canvas.redo());
        assert_eq!(points_of(&canvas), moved);
        let shape = canvas.document.get_shape(id).unwrap();
        assert_eq!(*shape.frame(), crate::geometry::compute_path_bounds(&moved));
    }

    #[test]
    fn test_locked_shape_selects_without_gesture() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        canvas.document.mutate(id, |s| s.set_locked(true));
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(50.0, 50.0));
        assert_eq!(canvas.document.selected_id(), Some(id));
        assert!(!handler.is_active());
        handler.handle_pointer(&mut canvas, moved(90.0, 90.0));
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), Frame::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_shape_tool_creates_and_reverts() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Shape);
        canvas.tool_manager.set_shape_kind(ShapeKind::Ellipse);
        let mut handler = EventHandler::new();

        let response = handler.handle_pointer(&mut canvas, down(500.0, 400.0));
        assert!(response.selection_changed);
        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Select);
        let shape = canvas.document.selected().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Ellipse);
        assert_eq!(*shape.frame(), Frame::new(340.0, 310.0, 320.0, 180.0));
        assert!(!handler.is_active());

        assert!(canvas.undo());
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_text_tool_creates_text() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        let mut handler = EventHandler::new();
        handler.handle_press(&mut canvas, Point::new(300.0, 300.0));
        let shape = canvas.document.selected().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Text);
        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Select);
    }

    #[test]
    fn test_freehand_commits_with_two_points() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Freehand);
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(10.0, 10.0));
        handler.handle_pointer(&mut canvas, moved(40.0, 60.0));
        assert_eq!(canvas.document.selected_id(), None);
        handler.handle_pointer(&mut canvas, up(40.0, 60.0));

        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Select);
        assert_eq!(canvas.document.len(), 1);
        let shape = canvas.document.selected().unwrap();
        let points = shape.points().unwrap();
        assert!(points.len() >= 2);
        assert_eq!(*shape.frame(), crate::geometry::compute_path_bounds(points));
        assert_eq!(canvas.document.history().undo_len(), 1);
    }

    #[test]
    fn test_freehand_single_point_discarded() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Freehand);
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(10.0, 10.0));
        assert_eq!(canvas.document.len(), 1);
        assert!(matches!(handler.state(), GestureState::FreehandDrawing { .. }));
        handler.handle_pointer(&mut canvas, up(10.0, 10.0));

        assert!(canvas.document.is_empty());
        assert_eq!(canvas.document.selected_id(), None);
        assert!(!canvas.document.can_undo());
        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Select);
    }

    #[test]
    fn test_other_pointers_ignored() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        canvas.settings.set_drag_sensitivity(1.0);
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(50.0, 50.0));
        let other = PointerEvent::Move {
            pointer_id: 2,
            position: Point::new(400.0, 400.0),
        };
        assert!(handler.handle_pointer(&mut canvas, other).is_empty());
        assert_eq!(canvas.document.get_shape(id).unwrap().frame().x, 0.0);

        let other_up = PointerEvent::Up {
            pointer_id: 2,
            position: Point::new(400.0, 400.0),
        };
        handler.handle_pointer(&mut canvas, other_up);
        assert!(handler.is_active());

        handler.handle_pointer(&mut canvas, moved(60.0, 50.0));
        handler.handle_pointer(&mut canvas, up(60.0, 50.0));
        assert!((canvas.document.get_shape(id).unwrap().frame().x - 10.0).abs() < 1e-9);
        assert!(!handler.is_active());
    }

    #[test]
    fn test_cancel_drag_restores_reference() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        let mut handler = EventHandler::new();

        handler.handle_pointer(&mut canvas, down(50.0, 50.0));
        handler.handle_pointer(&mut canvas, moved(250.0, 250.0));
        assert!(canvas.document.get_shape(id).unwrap().frame().x > 0.0);

        handler.handle_pointer(&mut canvas, PointerEvent::Cancel { pointer_id: 1 });
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), Frame::new(0.0, 0.0, 100.0, 100.0));
        assert!(!canvas.document.can_undo());
        assert!(!handler.is_active());
    }

    #[test]
    fn test_cancel_resize_restores_reference() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        let mut handler = EventHandler::new();
        handler.handle_press(&mut canvas, Point::new(100.0, 100.0));
        handler.handle_drag(&mut canvas, Point::new(300.0, 300.0));
        handler.cancel(&mut canvas);
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), Frame::new(0.0, 0.0, 100.0, 100.0));
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_cancel_freehand_discards_and_keeps_tool() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Freehand);
        let mut handler = EventHandler::new();
        handler.handle_press(&mut canvas, Point::new(10.0, 10.0));
        handler.handle_drag(&mut canvas, Point::new(50.0, 50.0));
        handler.cancel(&mut canvas);
        assert!(canvas.document.is_empty());
        assert_eq!(canvas.document.selected_id(), None);
        assert_eq!(canvas.tool_manager.current_tool, ToolKind::Freehand);
    }

    #[test]
    fn test_viewport_scaling_applies_to_press() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(600.0, 400.0, 100.0, 100.0));
        let mut handler =
            EventHandler::with_viewport(CanvasViewport::new(kurbo::Rect::new(0.0, 0.0, 700.0, 450.0)));
        handler.handle_pointer(&mut canvas, down(325.0, 225.0));
        assert_eq!(canvas.document.selected_id(), Some(id));
    }

    #[test]
    fn test_cursor_hints() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        let handler = EventHandler::new();
        assert_eq!(handler.cursor_hint(&canvas, Point::new(50.0, 50.0)), CursorHint::Move);
        assert_eq!(handler.cursor_hint(&canvas, Point::new(500.0, 500.0)), CursorHint::Default);
        canvas.select(id);
        assert_eq!(handler.cursor_hint(&canvas, Point::new(105.0, 105.0)), CursorHint::ResizeNwse);
        canvas.document.mutate(id, |s| s.set_locked(true));
        assert_eq!(handler.cursor_hint(&canvas, Point::new(50.0, 50.0)), CursorHint::Default);
        canvas.set_tool(ToolKind::Shape);
        assert_eq!(handler.cursor_hint(&canvas, Point::new(50.0, 50.0)), CursorHint::Crosshair);
    }

    #[test]
    fn test_command_cancels_active_gesture() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        let mut handler = EventHandler::new();
        handler.handle_pointer(&mut canvas, down(50.0, 50.0));
        handler.handle_pointer(&mut canvas, moved(150.0, 50.0));

        let response = handler.handle_command(&mut canvas, EditorCommand::Delete);
        assert!(response.geometry_changed);
        assert!(!handler.is_active());
        assert!(canvas.document.get_shape(id).is_none());

        assert!(canvas.undo());
        assert_eq!(*canvas.document.get_shape(id).unwrap().frame(), Frame::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_context_click_selects_hit() {
        let (mut canvas, id) = canvas_with_rect(Frame::new(0.0, 0.0, 100.0, 100.0));
        let mut handler = EventHandler::new();
        let menu = handler.context_click(&mut canvas, Point::new(20.0, 20.0));
        assert_eq!(canvas.document.selected_id(), Some(id));
        assert!(menu.copy && menu.cut && menu.delete);
        assert!(!menu.paste);
    }
}
