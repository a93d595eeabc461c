//! Host-independent pointer and keyboard input.

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Identifier of one pointer (mouse, pen or touch contact).
pub type PointerId = u32;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { pointer_id: PointerId, position: Point },
    Move { pointer_id: PointerId, position: Point },
    Up { pointer_id: PointerId, position: Point },
    /// The host aborted the gesture (pointer capture lost, window blur).
    Cancel { pointer_id: PointerId },
}

impl PointerEvent {
    pub fn pointer_id(&self) -> PointerId {
        match *self {
            PointerEvent::Down { pointer_id, .. }
            | PointerEvent::Move { pointer_id, .. }
            | PointerEvent::Up { pointer_id, .. }
            | PointerEvent::Cancel { pointer_id } => pointer_id,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => Some(position),
            PointerEvent::Cancel { .. } => None,
        }
    }
}

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
    Move,
    ResizeNwse,
}

/// Maps screen coordinates onto the fixed-size canvas bitmap.
///
/// The canvas element may be displayed at any size; `element` is its
/// on-screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    pub element: Rect,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT))
    }
}

impl CanvasViewport {
    pub fn new(element: Rect) -> Self {
        Self {
            element,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }

    /// Convert a screen point to canvas space. A degenerate element rect maps
    /// without scaling.
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        let scale = |canvas: f64, display: f64| {
            if display > f64::EPSILON {
                canvas / display
            } else {
                1.0
            }
        };
        let sx = scale(self.canvas_width, self.element.width());
        let sy = scale(self.canvas_height, self.element.height());
        Point::new(
            (screen.x - self.element.x0) * sx,
            (screen.y - self.element.y0) * sy,
        )
    }
}
