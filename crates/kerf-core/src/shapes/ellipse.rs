//! Ellipse shape.

use super::{Frame, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
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

impl Ellipse {
    /// Create a new ellipse filling `frame`.
    pub fn new(frame: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            style: ShapeStyle::default(),
            locked: false,
            hidden: false,
        }
    }

    pub fn center(&self) -> Point {
        self.frame.as_rect().center()
    }

    pub fn radii(&self) -> (f64, f64) {
        (self.frame.w / 2.0, self.frame.h / 2.0)
    }

    fn as_kurbo(&self) -> kurbo::Ellipse {
        kurbo::Ellipse::from_rect(self.frame.as_rect())
    }
}

impl ShapeTrait for Ellipse {
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
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
