//! Freehand path shape.

use super::{Frame, ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::compute_path_bounds;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum number of points for a stroke to be kept.
pub const MIN_COMMITTED_POINTS: usize = 2;

/// A freehand stroke. The frame is always the padded bounding box of `points`
/// once the stroke is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub style: ShapeStyle,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Points in drawing order.
    pub points: Vec<Point>,
}

impl Freehand {
    /// Start a provisional stroke at `start`, with a zero-size frame.
    pub fn begin(start: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(start.x, start.y, 0.0, 0.0),
            style: ShapeStyle::default(),
            locked: false,
            hidden: false,
            points: vec![start],
        }
    }

    /// Create from existing points, with bounds already computed.
    pub fn from_points(points: Vec<Point>) -> Self {
        let mut path = Self {
            id: Uuid::new_v4(),
            frame: Frame::default(),
            style: ShapeStyle::default(),
            locked: false,
            hidden: false,
            points,
        };
        path.recompute_bounds();
        path
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the stroke has enough points to persist.
    pub fn is_committable(&self) -> bool {
        self.points.len() >= MIN_COMMITTED_POINTS
    }

    /// Reset the frame to the padded bounds of the points.
    pub fn recompute_bounds(&mut self) {
        self.frame = compute_path_bounds(&self.points);
    }
}

impl ShapeTrait for Freehand {
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
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_single_point_zero_frame() {
        let path = Freehand::begin(Point::new(40.0, 60.0));
        assert_eq!(path.len(), 1);
        assert_eq!(path.frame, Frame::new(40.0, 60.0, 0.0, 0.0));
        assert!(!path.is_committable());
    }

    #[test]
    fn test_from_points_pads_bounds() {
        let path = Freehand::from_points(vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0)]);
        assert_eq!(path.frame, Frame::new(-5.0, -5.0, 110.0, 60.0));
        assert!(path.is_committable());
    }
}
