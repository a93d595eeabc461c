//! CPU renderer backed by tiny-skia.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError, rgba8};
use crate::text::layout_glyphs;
use kerf_core::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use kerf_core::settings::{EditorMode, depth_opacity};
use kerf_core::shapes::{DEFAULT_STROKE_WIDTH, Frame, Shape, Text};
use kurbo::{BezPath, PathEl};
use peniko::Color;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

/// Grid spacing in canvas units.
const GRID_MINOR: u32 = 25;
/// Every fifth grid line is drawn bold.
const GRID_MAJOR: u32 = 125;
/// Gap between an object's box and its selection outline.
const SELECTION_INSET: f64 = 6.0;
const SELECTION_STROKE_WIDTH: f32 = 2.0;
const HANDLE_RADIUS: f32 = 10.0;
const DECORATION_WIDTH: f64 = 2.0;

/// Rasterizes a canvas into an RGBA pixmap.
pub struct SkiaRenderer {
    pixmap: Pixmap,
}

impl SkiaRenderer {
    /// Create a renderer with a surface of the given size in pixels.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::InitFailed(format!("invalid surface size {width}x{height}"))
        })?;
        Ok(Self { pixmap })
    }

    /// Create a renderer matching the fixed canvas bitmap.
    pub fn for_canvas() -> RenderResult<Self> {
        Self::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = rgba8(color);
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn render_grid(&mut self, ctx: &RenderContext) {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        let color_for = |offset: u32| {
            if offset % GRID_MAJOR == 0 {
                ctx.palette.grid_major
            } else {
                ctx.palette.grid
            }
        };

        for x in (0..=width).step_by(GRID_MINOR as usize) {
            let px = x as f32 + 0.5;
            let path = line_path(px, 0.0, px, height as f32);
            self.stroke(path, color_for(x), 1.0, &stroke);
        }
        for y in (0..=height).step_by(GRID_MINOR as usize) {
            let py = y as f32 + 0.5;
            let path = line_path(0.0, py, width as f32, py);
            self.stroke(path, color_for(y), 1.0, &stroke);
        }
    }

    fn render_shape(&mut self, shape: &Shape, ctx: &RenderContext) {
        let style = shape.style();
        let ink = if ctx.monochrome {
            Color::from_rgba8(0, 0, 0, 255)
        } else {
            style.color()
        };
        let opacity = match ctx.mode {
            EditorMode::Cnc if !ctx.monochrome => depth_opacity(style.depth_mm),
            _ => 1.0,
        };
        let width = effective_stroke_width(style.stroke_width);

        match shape {
            Shape::Rect(_) | Shape::Ellipse(_) => {
                let path = to_skia_path(&shape.to_path());
                if style.is_filled() {
                    self.fill(path.clone(), ink, opacity);
                }
                let stroke = stroke_style(width, LineCap::Butt, LineJoin::Miter);
                self.stroke(path, ink, opacity, &stroke);
            }
            Shape::Line(_) => {
                let path = to_skia_path(&shape.to_path());
                let stroke = stroke_style(width, LineCap::Round, LineJoin::Miter);
                self.stroke(path, ink, opacity, &stroke);
            }
            Shape::Path(freehand) => {
                if freehand.points.len() > 1 {
                    let path = to_skia_path(&shape.to_path());
                    let stroke = stroke_style(width, LineCap::Round, LineJoin::Round);
                    self.stroke(path, ink, opacity, &stroke);
                }
            }
            Shape::Text(text) => self.render_text(text, ink, opacity),
        }
    }

    /// Fill glyph outlines, then underline and strike at the measured width.
    fn render_text(&mut self, text: &Text, ink: Color, opacity: f64) {
        let stroke = stroke_style(DECORATION_WIDTH, LineCap::Butt, LineJoin::Miter);
        for line in layout_glyphs(text) {
            self.fill(line.outline, ink, opacity);
            let left = line.left as f32;
            let right = (line.left + line.width) as f32;
            if text.underline {
                let y = line.underline_y as f32;
                self.stroke(line_path(left, y, right, y), ink, opacity, &stroke);
            }
            if text.strike {
                let y = line.strike_y as f32;
                self.stroke(line_path(left, y, right, y), ink, opacity, &stroke);
            }
        }
    }

    fn render_selection(&mut self, frame: &Frame, color: Color) {
        let outline = tiny_skia::Rect::from_xywh(
            (frame.x - SELECTION_INSET) as f32,
            (frame.y - SELECTION_INSET) as f32,
            (frame.w + SELECTION_INSET * 2.0) as f32,
            (frame.h + SELECTION_INSET * 2.0) as f32,
        )
        .map(PathBuilder::from_rect);
        let stroke = Stroke {
            width: SELECTION_STROKE_WIDTH,
            dash: StrokeDash::new(vec![6.0, 6.0], 0.0),
            ..Stroke::default()
        };
        self.stroke(outline, color, 1.0, &stroke);

        let corner = frame.corner();
        let handle = PathBuilder::from_circle(corner.x as f32, corner.y as f32, HANDLE_RADIUS);
        self.fill(handle, color, 1.0);
    }

    fn fill(&mut self, path: Option<tiny_skia::Path>, color: Color, opacity: f64) {
        let Some(path) = path else {
            return;
        };
        let paint = paint_for(color, opacity);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke(
        &mut self,
        path: Option<tiny_skia::Path>,
        color: Color,
        opacity: f64,
        stroke: &Stroke,
    ) {
        let Some(path) = path else {
            return;
        };
        let paint = paint_for(color, opacity);
        self.pixmap
            .stroke_path(&path, &paint, stroke, Transform::identity(), None);
    }
}

impl Renderer for SkiaRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.clear(self.background_color(ctx));

        if ctx.show_grid {
            self.render_grid(ctx);
        }

        // Selection chrome is painted right after its object, so objects
        // above the selection still cover it.
        for shape in ctx.document.shapes_ordered() {
            if shape.is_hidden() {
                continue;
            }
            self.render_shape(shape, ctx);
            if !ctx.monochrome && ctx.selected == Some(shape.id()) {
                self.render_selection(shape.frame(), ctx.selection_color);
            }
        }
    }
}

/// Stroke widths of zero or less fall back to the default.
fn effective_stroke_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        DEFAULT_STROKE_WIDTH
    }
}

fn stroke_style(width: f64, line_cap: LineCap, line_join: LineJoin) -> Stroke {
    Stroke {
        width: width as f32,
        line_cap,
        line_join,
        ..Stroke::default()
    }
}

fn paint_for(color: Color, opacity: f64) -> Paint<'static> {
    let [r, g, b, a] = rgba8(color);
    let alpha = (f64::from(a) * opacity.clamp(0.0, 1.0)).round() as u8;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, alpha);
    paint.anti_alias = true;
    paint
}

fn line_path(x0: f32, y0: f32, x1: f32, y1: f32) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(x0, y0);
    builder.line_to(x1, y1);
    builder.finish()
}

/// Convert a kurbo path to tiny-skia. Returns `None` for empty or
/// degenerate paths.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    let built = builder.finish();
    if built.is_none() {
        log::debug!("skipping degenerate path with {} elements", path.elements().len());
    }
    built
}
