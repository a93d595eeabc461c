//! Monochrome export preview: black ink on white paper, encoded as PNG.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use crate::skia::SkiaRenderer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kerf_core::canvas::CanvasDocument;
use tiny_skia::Pixmap;

/// Render `document` as the flattened export bitmap.
///
/// Hidden objects and fill modes are honored; colors, theme, grid and
/// selection are not.
pub fn render_preview(document: &CanvasDocument) -> RenderResult<Pixmap> {
    let mut renderer = SkiaRenderer::for_canvas()?;
    renderer.build_scene(&RenderContext::preview(document));
    Ok(renderer.into_pixmap())
}

/// Encode a pixmap as an 8-bit RGBA PNG.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
    let rgba_data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("PNG header: {e}")))?;
        writer
            .write_image_data(&rgba_data)
            .map_err(|e| RendererError::Encode(format!("PNG data: {e}")))?;
    }
    log::debug!(
        "encoded {}x{} preview ({} bytes)",
        pixmap.width(),
        pixmap.height(),
        png_data.len()
    );
    Ok(png_data)
}

/// Wrap PNG bytes in a `data:` URI.
pub fn to_data_uri(png_data: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_data))
}

/// Render, encode and wrap in one step.
pub fn preview_data_uri(document: &CanvasDocument) -> RenderResult<String> {
    let pixmap = render_preview(document)?;
    Ok(to_data_uri(&encode_png(&pixmap)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_core::canvas::Canvas;
    use kerf_core::settings::{EditorMode, Theme};
    use kerf_core::shapes::{FillMode, Frame, Rectangle, Shape, Text};

    const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).unwrap().demultiply();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    fn document_with_rect(fill_mode: FillMode) -> CanvasDocument {
        let mut document = CanvasDocument::new();
        let mut rect = Rectangle::new(Frame::new(100.0, 100.0, 200.0, 100.0));
        rect.style.fill_mode = fill_mode;
        let shape = Shape::Rect(rect);
        let id = shape.id();
        document.add_shape(shape);
        document.select(Some(id));
        document
    }

    #[test]
    fn test_preview_is_black_on_white() {
        let pixmap = render_preview(&document_with_rect(FillMode::Outline)).unwrap();
        assert_eq!(pixel(&pixmap, 5, 5), [255, 255, 255, 255]);
        assert_eq!(pixel(&pixmap, 100, 150), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 200, 150), [255, 255, 255, 255]);
        // No selection handle even though the rect is selected.
        assert_eq!(pixel(&pixmap, 300, 208), [255, 255, 255, 255]);
    }

    #[test]
    fn test_preview_honours_fill_and_hidden() {
        let mut document = document_with_rect(FillMode::Filled);
        let pixmap = render_preview(&document).unwrap();
        assert_eq!(pixel(&pixmap, 200, 150), [0, 0, 0, 255]);

        let id = document.selected_id().unwrap();
        document.mutate(id, |s| s.set_hidden(true));
        let pixmap = render_preview(&document).unwrap();
        assert_eq!(pixel(&pixmap, 200, 150), [255, 255, 255, 255]);
    }

    #[test]
    fn test_preview_ignores_theme_and_mode() {
        let mut canvas = Canvas::with_document(document_with_rect(FillMode::Filled));
        canvas.settings.theme = Theme::Dark;
        canvas.settings.mode = EditorMode::Cnc;
        let pixmap = render_preview(&canvas.document).unwrap();
        assert_eq!(pixel(&pixmap, 200, 150), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 700, 450), [255, 255, 255, 255]);
    }

    #[test]
    fn test_preview_text_is_black() {
        let mut document = CanvasDocument::new();
        let text = Text::new(Frame::new(100.0, 300.0, 400.0, 140.0), 48.0);
        document.add_shape(Shape::Text(text));
        let pixmap = render_preview(&document).unwrap();
        let black = (100..220)
            .flat_map(|x| (300..348).map(move |y| (x, y)))
            .filter(|&(x, y)| pixel(&pixmap, x, y) == [0, 0, 0, 255])
            .count();
        assert!(black > 50);
    }

    #[test]
    fn test_encode_png() {
        let pixmap = render_preview(&CanvasDocument::new()).unwrap();
        let png_data = encode_png(&pixmap).unwrap();
        assert_eq!(&png_data[..8], &PNG_SIGNATURE);

        let uri = to_data_uri(&png_data);
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
