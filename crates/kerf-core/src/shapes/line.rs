//! Straight line shape.

use super::{Frame, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment from the frame origin to `origin + (w, h)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub style: ShapeStyle,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl Line {
    /// Create a new line spanning `frame`.
    pub fn new(frame: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            style: ShapeStyle::default(),
            locked: false,
            hidden: false,
        }
    }

    pub fn start(&self) -> Point {
        self.frame.origin()
    }

    pub fn end(&self) -> Point {
        self.frame.corner()
    }

    pub fn length(&self) -> f64 {
        (self.end() - self.start()).hypot()
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
