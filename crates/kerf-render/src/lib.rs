//! Kerf Render Library
//!
//! Renderer abstraction and a tiny-skia CPU backend for the Kerf canvas,
//! plus the monochrome PNG preview used for export.

pub mod preview;
mod renderer;
mod skia;
mod text;

pub use preview::{encode_png, preview_data_uri, render_preview, to_data_uri};
pub use renderer::{
    Palette, RenderContext, RenderResult, Renderer, RendererError, SELECTION_COLOR,
};
pub use skia::SkiaRenderer;
pub use tiny_skia::Pixmap;
