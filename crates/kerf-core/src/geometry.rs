//! Hit-testing and bounding-box helpers.
//!
//! Everything here is a pure function of its inputs.

use crate::shapes::{Frame, Shape};
use kurbo::{Point, Vec2};

/// Radius around the bottom-right corner that grabs the resize handle.
pub const RESIZE_HANDLE_RADIUS: f64 = 14.0;
/// Padding added on every side of a path's point bounds.
pub const PATH_BOUNDS_PADDING: f64 = 5.0;
/// Smallest width/height a path frame can have.
pub const PATH_BOUNDS_MIN_SIZE: f64 = 20.0;
/// Smallest stored extent after a corner resize.
pub const MIN_RESIZE_EXTENT: f64 = 1.0;

/// Topmost visible object whose frame contains `point` (inclusive).
///
/// `shapes` is in paint order, so the search runs back to front.
pub fn hit_test<'a, I>(shapes: I, point: Point) -> Option<&'a Shape>
where
    I: IntoIterator<Item = &'a Shape>,
    I::IntoIter: DoubleEndedIterator,
{
    shapes
        .into_iter()
        .rev()
        .find(|shape| !shape.is_hidden() && shape.frame().contains(point))
}

/// Whether `point` lies within the resize handle of `shape`.
pub fn hit_resize_handle(shape: &Shape, point: Point) -> bool {
    let corner = shape.frame().corner();
    (point - corner).hypot2() <= RESIZE_HANDLE_RADIUS * RESIZE_HANDLE_RADIUS
}

/// Padded bounding box of a point list. Empty input yields a zero frame at the origin.
pub fn compute_path_bounds(points: &[Point]) -> Frame {
    let Some(first) = points.first() else {
        return Frame::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Frame::new(
        min_x - PATH_BOUNDS_PADDING,
        min_y - PATH_BOUNDS_PADDING,
        (max_x - min_x + PATH_BOUNDS_PADDING * 2.0).max(PATH_BOUNDS_MIN_SIZE),
        (max_y - min_y + PATH_BOUNDS_PADDING * 2.0).max(PATH_BOUNDS_MIN_SIZE),
    )
}

/// Translate every point by `delta`.
pub fn translate_points(points: &mut [Point], delta: Vec2) {
    for p in points {
        *p += delta;
    }
}

/// Scale each point's offset from `origin` by `(sx, sy)`.
pub fn scale_points(points: &mut [Point], origin: Point, sx: f64, sy: f64) {
    for p in points {
        p.x = origin.x + (p.x - origin.x) * sx;
        p.y = origin.y + (p.y - origin.y) * sy;
    }
}

/// Frame produced by dragging the bottom-right corner, plus the signed
/// per-axis factor to apply to path points about the reference origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOutcome {
    pub frame: Frame,
    pub scale: Vec2,
}

/// Drag the bottom-right corner of `reference` by `delta`.
///
/// Dragging past the opposite edge flips that axis: the origin moves to the
/// new minimum and the stored extent is the absolute value, floored at
/// [`MIN_RESIZE_EXTENT`].
pub fn resize_frame(reference: &Frame, delta: Vec2) -> ResizeOutcome {
    let (x, w, sx) = resize_axis(reference.x, reference.w, delta.x);
    let (y, h, sy) = resize_axis(reference.y, reference.h, delta.y);
    ResizeOutcome {
        frame: Frame::new(x, y, w, h),
        scale: Vec2::new(sx, sy),
    }
}

fn resize_axis(origin: f64, extent: f64, delta: f64) -> (f64, f64, f64) {
    let signed = extent + delta;
    let new_origin = if signed < 0.0 { origin + signed } else { origin };
    // Zero-width axes have nothing to scale.
    let scale = if extent.abs() > f64::EPSILON {
        signed / extent
    } else {
        1.0
    };
    (new_origin, signed.abs().max(MIN_RESIZE_EXTENT), scale)
}
