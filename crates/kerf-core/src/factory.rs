//! Construction of new objects with per-kind defaults.

use crate::settings::ResolvedTheme;
use crate::shapes::{
    DEFAULT_DEPTH_MM, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, Ellipse, FillMode, Frame, Freehand,
    Line, Rectangle, SerializableColor, Shape, ShapeKind, ShapeStyle, Text,
};
use crate::tools::ToolConfig;
use kurbo::Point;

/// Default rectangle/ellipse size.
pub const DEFAULT_BOX_SIZE: (f64, f64) = (320.0, 180.0);
/// Default line extent, as (dx, dy).
pub const DEFAULT_LINE_EXTENT: (f64, f64) = (200.0, 100.0);
/// Default text box size.
pub const DEFAULT_TEXT_SIZE: (f64, f64) = (400.0, 140.0);
/// Offset from the pointer to a new text box's top-left corner.
pub const TEXT_ANCHOR_OFFSET: (f64, f64) = (200.0, 50.0);

/// The outline rectangle placed on a fresh canvas.
pub const SEED_FRAME: Frame = Frame::new(460.0, 340.0, 520.0, 260.0);

pub struct ShapeFactory;

impl ShapeFactory {
    /// Style for a new object, from the tool configuration with fixed fallbacks.
    pub fn style_from(config: &ToolConfig) -> ShapeStyle {
        ShapeStyle {
            color: config.color.unwrap_or(SerializableColor::accent()),
            fill_mode: config.fill_mode.unwrap_or(FillMode::Outline),
            stroke_width: config
                .stroke_width
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(DEFAULT_STROKE_WIDTH),
            depth_mm: config.depth_mm.unwrap_or(DEFAULT_DEPTH_MM),
        }
    }

    /// Text color that stays legible on the given theme. Text ignores the
    /// toolbar color; the user recolors it from the inspector.
    pub fn text_color(theme: ResolvedTheme) -> SerializableColor {
        match theme {
            ResolvedTheme::Dark => SerializableColor::white(),
            ResolvedTheme::Light => SerializableColor::black(),
        }
    }

    /// Build a new object of `kind` at `point`.
    ///
    /// Boxes and lines are centered on the point, text is anchored up and to
    /// the left of it, and paths start as a single point.
    pub fn create_at(
        kind: ShapeKind,
        point: Point,
        config: &ToolConfig,
        theme: ResolvedTheme,
    ) -> Shape {
        let style = Self::style_from(config);
        match kind {
            ShapeKind::Rect => {
                let mut rect = Rectangle::new(Frame::centered(point, DEFAULT_BOX_SIZE.0, DEFAULT_BOX_SIZE.1));
                rect.style = style;
                Shape::Rect(rect)
            }
            ShapeKind::Ellipse => {
                let mut ellipse =
                    Ellipse::new(Frame::centered(point, DEFAULT_BOX_SIZE.0, DEFAULT_BOX_SIZE.1));
                ellipse.style = style;
                Shape::Ellipse(ellipse)
            }
            ShapeKind::Line => {
                let mut line = Line::new(Frame::centered(
                    point,
                    DEFAULT_LINE_EXTENT.0,
                    DEFAULT_LINE_EXTENT.1,
                ));
                line.style = style;
                Shape::Line(line)
            }
            ShapeKind::Path => {
                let mut path = Freehand::begin(point);
                path.style = style;
                Shape::Path(path)
            }
            ShapeKind::Text => {
                let frame = Frame::new(
                    point.x - TEXT_ANCHOR_OFFSET.0,
                    point.y - TEXT_ANCHOR_OFFSET.1,
                    DEFAULT_TEXT_SIZE.0,
                    DEFAULT_TEXT_SIZE.1,
                );
                let font_size = config
                    .font_size
                    .filter(|s| s.is_finite() && *s > 0.0)
                    .unwrap_or(DEFAULT_FONT_SIZE);
                let mut text = Text::new(frame, font_size);
                text.style = ShapeStyle {
                    color: Self::text_color(theme),
                    ..style
                };
                Shape::Text(text)
            }
        }
    }

    /// The rectangle shown on a brand-new canvas.
    pub fn seed_shape() -> Shape {
        Shape::Rect(Rectangle::new(SEED_FRAME))
    }
}
