//! Renderer trait abstraction.

use kerf_core::canvas::{Canvas, CanvasDocument};
use kerf_core::settings::{EditorMode, ResolvedTheme};
use kerf_core::shapes::ShapeId;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Selection outline and handle color, `rgba(74, 163, 255, 0.9)`.
pub const SELECTION_COLOR: Color = Color::from_rgba8(74, 163, 255, 230);

/// Surface colors for one resolved theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    /// Minor grid lines (every 25 units).
    pub grid: Color,
    /// Major grid lines (every 125 units).
    pub grid_major: Color,
}

impl Palette {
    pub fn for_theme(theme: ResolvedTheme) -> Self {
        match theme {
            ResolvedTheme::Dark => Self {
                background: Color::from_rgba8(18, 20, 24, 255),
                grid: Color::from_rgba8(139, 139, 139, 31),
                grid_major: Color::from_rgba8(139, 139, 139, 71),
            },
            ResolvedTheme::Light => Self {
                background: Color::from_rgba8(250, 250, 250, 255),
                grid: Color::from_rgba8(139, 139, 139, 41),
                grid_major: Color::from_rgba8(139, 139, 139, 92),
            },
        }
    }

    /// White paper, used by the monochrome preview.
    pub fn paper() -> Self {
        let white = Color::from_rgba8(255, 255, 255, 255);
        Self {
            background: white,
            grid: white,
            grid_major: white,
        }
    }
}

/// Split a color into 8-bit RGBA channels.
pub(crate) fn rgba8(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

/// Context for a single render pass.
pub struct RenderContext<'a> {
    /// The objects to draw.
    pub document: &'a CanvasDocument,
    pub palette: Palette,
    /// Laser draws everything opaque; CNC maps depth to opacity.
    pub mode: EditorMode,
    pub show_grid: bool,
    /// Object that gets the selection outline and resize handle.
    pub selected: Option<ShapeId>,
    pub selection_color: Color,
    /// Force black ink regardless of object color.
    pub monochrome: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a context for the interactive editor view of `canvas`.
    pub fn new(canvas: &'a Canvas) -> Self {
        let settings = &canvas.settings;
        Self {
            document: &canvas.document,
            palette: Palette::for_theme(settings.resolved_theme()),
            mode: settings.mode,
            show_grid: settings.grid_visible(),
            selected: canvas.document.selected_id(),
            selection_color: SELECTION_COLOR,
            monochrome: false,
        }
    }

    /// Create a context for the flattened export preview.
    pub fn preview(document: &'a CanvasDocument) -> Self {
        Self {
            document,
            palette: Palette::paper(),
            mode: EditorMode::Laser,
            show_grid: false,
            selected: None,
            selection_color: SELECTION_COLOR,
            monochrome: true,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn with_selection(mut self, selected: Option<ShapeId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_mode(mut self, mode: EditorMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Trait for rendering backends.
///
/// A backend redraws the whole surface from the context on every call; it
/// keeps no scene state between frames.
pub trait Renderer: Send + Sync {
    /// Draw one frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.palette.background
    }
}
