//! Drawable object definitions for the layout canvas.

mod ellipse;
mod freehand;
mod line;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use freehand::{Freehand, MIN_COMMITTED_POINTS};
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::{
    DEFAULT_FONT_SIZE, DEFAULT_TEXT, FontFamily, LaidOutLine, Text, TextAlign, TextLayout,
};

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color, stored as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// The default object color (`#4aa3ff`).
    pub const fn accent() -> Self {
        Self::new(0x4a, 0xa3, 0xff)
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive). Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let mut channels = digits.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 16 + v
                });
                Some(Self::new(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
                Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Stroke only.
    #[default]
    Outline,
    /// Stroke and fill with the object color.
    Filled,
}

/// Default stroke width for new objects.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
/// Default cut depth for new objects, in millimetres.
pub const DEFAULT_DEPTH_MM: f64 = 5.0;
/// Material thickness used by the depth-to-opacity rule.
pub const MAX_DEPTH_MM: f64 = 20.0;

/// Style properties shared by every object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Stroke and fill color.
    pub color: SerializableColor,
    #[serde(default)]
    pub fill_mode: FillMode,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Cut depth in millimetres (0..=20).
    #[serde(rename = "depthMM", default = "default_depth")]
    pub depth_mm: f64,
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_depth() -> f64 {
    DEFAULT_DEPTH_MM
}

impl ShapeStyle {
    /// Get the color as a peniko Color.
    pub fn color(&self) -> Color {
        self.color.into()
    }

    /// Whether the interior should be painted.
    pub fn is_filled(&self) -> bool {
        self.fill_mode == FillMode::Filled
    }

    /// Depth clamped to the material thickness.
    pub fn clamped_depth(&self) -> f64 {
        self.depth_mm.clamp(0.0, MAX_DEPTH_MM)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::accent(),
            fill_mode: FillMode::Outline,
            stroke_width: DEFAULT_STROKE_WIDTH,
            depth_mm: DEFAULT_DEPTH_MM,
        }
    }
}

/// Axis-aligned bounding box of an object, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Frame of the given size centered on `center`.
    pub fn centered(center: Point, w: f64, h: f64) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bottom-right corner, where the resize handle sits.
    pub fn corner(&self) -> Point {
        Point::new(self.x + self.w, self.y + self.h)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.x + self.w && point.y >= self.y && point.y <= self.y + self.h
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

/// Common trait for all drawable objects.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box.
    fn frame(&self) -> &Frame;

    /// Get the mutable bounding box.
    fn frame_mut(&mut self) -> &mut Frame;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Get the bounding box as a kurbo Rect.
    fn bounds(&self) -> Rect {
        self.frame().as_rect()
    }
}

/// Object type tag, used by the factory and the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rect,
    Ellipse,
    Line,
    Path,
    Text,
}

impl ShapeKind {
    /// Kinds offered by the shape tool.
    pub fn toolbar_kinds() -> &'static [ShapeKind] {
        &[ShapeKind::Rect, ShapeKind::Ellipse, ShapeKind::Line]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rect => "rect",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Path => "path",
            ShapeKind::Text => "text",
        }
    }
}

/// A drawable object. Z-order lives in the document, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Path(Freehand),
    Text(Text),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Rect($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Line($s) => $body,
            Shape::Path($s) => $body,
            Shape::Text($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        dispatch!(self, s => s.id())
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Path(_) => ShapeKind::Path,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn frame(&self) -> &Frame {
        dispatch!(self, s => s.frame())
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        dispatch!(self, s => s.frame_mut())
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path())
    }

    pub fn style(&self) -> &ShapeStyle {
        dispatch!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        dispatch!(self, s => s.style_mut())
    }

    pub fn is_locked(&self) -> bool {
        dispatch!(self, s => s.locked)
    }

    pub fn set_locked(&mut self, locked: bool) {
        dispatch!(self, s => s.locked = locked)
    }

    pub fn is_hidden(&self) -> bool {
        dispatch!(self, s => s.hidden)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        dispatch!(self, s => s.hidden = hidden)
    }

    /// Points of a freehand path, `None` for other kinds.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Shape::Path(p) => Some(&p.points),
            _ => None,
        }
    }

    pub fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match self {
            Shape::Path(p) => Some(&mut p.points),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Move the object (and any path points) by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.frame_mut().translate(delta);
        if let Some(points) = self.points_mut() {
            for p in points.iter_mut() {
                *p += delta;
            }
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// Used when pasting so the copy never shares an id with its source.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        dispatch!(self, s => s.id = new_id)
    }
}
