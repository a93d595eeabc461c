//! Rectangle shape.

use super::{Frame, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
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

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(frame: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            style: ShapeStyle::default(),
            locked: false,
            hidden: false,
        }
    }
}

impl ShapeTrait for Rectangle {
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
        self.frame.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
