//! Glyph outlines for text objects.
//!
//! Faces come from the system font database when one matches the object's
//! family and style; otherwise the bundled DejaVu Sans is used.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use kerf_core::shapes::{FontFamily, Text, TextAlign};
use rusttype::{Font, GlyphId, OutlineBuilder, Scale, ScaledGlyph, point as rt_point};
use tiny_skia::PathBuilder;

static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FontKey {
    family: FontFamily,
    bold: bool,
    italic: bool,
}

/// One line of text ready to paint.
pub(crate) struct GlyphLine {
    /// Filled glyph outlines, `None` for blank lines.
    pub outline: Option<tiny_skia::Path>,
    pub left: f64,
    /// Measured advance width including letter spacing.
    pub width: f64,
    pub underline_y: f64,
    pub strike_y: f64,
}

/// Lay out `text` line by line and build its glyph outlines.
///
/// Lines keep the box positions from [`Text::layout`]; only the advance
/// widths and horizontal placement come from the font.
pub(crate) fn layout_glyphs(text: &Text) -> Vec<GlyphLine> {
    let layout = text.layout();
    let Some(font) = font_for(text.font, text.bold, text.italic) else {
        return layout
            .lines
            .into_iter()
            .map(|line| GlyphLine {
                outline: None,
                left: line.left,
                width: line.width,
                underline_y: line.underline_y,
                strike_y: line.strike_y,
            })
            .collect();
    };

    let scale = Scale::uniform(text.font_size as f32);
    let ascent = font.v_metrics(scale).ascent;
    let spacing = text.letter_spacing as f32;

    layout
        .lines
        .into_iter()
        .map(|line| {
            let (glyphs, width) = place_glyphs(font, scale, &line.text, spacing);
            let width = f64::from(width);
            let left = match text.align {
                TextAlign::Left => layout.anchor_x,
                TextAlign::Center => layout.anchor_x - width / 2.0,
                TextAlign::Right => layout.anchor_x - width,
            };
            let baseline = line.top as f32 + ascent;

            let mut builder = GlyphPath(PathBuilder::new());
            for (glyph, offset) in glyphs {
                glyph
                    .positioned(rt_point(left as f32 + offset, baseline))
                    .build_outline(&mut builder);
            }

            GlyphLine {
                outline: builder.0.finish(),
                left,
                width,
                underline_y: line.underline_y,
                strike_y: line.strike_y,
            }
        })
        .collect()
}

/// Scale each glyph of `line` and return it with its pen offset, plus the
/// total advance. Letter spacing goes between glyphs, not after the last.
fn place_glyphs(
    font: &Font<'static>,
    scale: Scale,
    line: &str,
    spacing: f32,
) -> (Vec<(ScaledGlyph<'static>, f32)>, f32) {
    let mut glyphs = Vec::new();
    let mut pen = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for ch in line.chars() {
        let glyph = font.glyph(ch).scaled(scale);
        if let Some(prev) = prev {
            pen += font.pair_kerning(scale, prev, glyph.id()) + spacing;
        }
        prev = Some(glyph.id());
        let advance = glyph.h_metrics().advance_width;
        glyphs.push((glyph, pen));
        pen += advance;
    }
    (glyphs, pen)
}

struct GlyphPath(PathBuilder);

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        db
    })
}

fn bundled_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = Font::try_from_bytes(BUNDLED_FONT);
        if font.is_none() {
            log::error!("bundled font could not be parsed");
        }
        font
    })
    .as_ref()
}

/// Resolve the face for a family and style, caching system lookups.
fn font_for(family: FontFamily, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let key = FontKey {
        family,
        bold,
        italic,
    };

    let mut cache = CACHE
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|p| p.into_inner());
    if let Some(cached) = cache.get(&key) {
        return (*cached).or_else(bundled_font);
    }

    let loaded: Option<&'static Font<'static>> =
        load_system_font(key).map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        log::debug!("no system face for {key:?}, using the bundled font");
    }
    cache.insert(key, loaded);
    loaded.or_else(bundled_font)
}

fn load_system_font(key: FontKey) -> Option<Font<'static>> {
    let families: &[Family<'_>] = match key.family {
        FontFamily::System => &[
            Family::SansSerif,
            Family::Name("DejaVu Sans"),
            Family::Name("Liberation Sans"),
        ],
        FontFamily::Serif => &[
            Family::Serif,
            Family::Name("DejaVu Serif"),
            Family::Name("Liberation Serif"),
        ],
        FontFamily::Mono => &[
            Family::Monospace,
            Family::Name("DejaVu Sans Mono"),
            Family::Name("Liberation Mono"),
        ],
    };
    let query = Query {
        families,
        weight: if key.bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if key.italic { Style::Italic } else { Style::Normal },
    };

    let db = db();
    let id = db.query(&query)?;
    db.with_face_data(id, |data, index| {
        Font::try_from_vec_and_index(data.to_vec(), index)
    })
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_core::shapes::Frame;

    fn sample() -> Text {
        Text::new(Frame::new(100.0, 300.0, 400.0, 140.0), 48.0)
    }

    #[test]
    fn test_bundled_font_parses() {
        assert!(bundled_font().is_some());
    }

    #[test]
    fn test_glyph_outline_inside_line_box() {
        let lines = layout_glyphs(&sample());
        assert_eq!(lines.len(), 1);
        let bounds = lines[0].outline.as_ref().unwrap().bounds();
        assert!(bounds.left() >= 99.0);
        assert!(bounds.top() >= 300.0);
        assert!(bounds.bottom() <= 300.0 + 48.0 * 1.2);
        assert!(lines[0].width > 0.0);
    }

    #[test]
    fn test_letter_spacing_widens_line() {
        let mut text = sample();
        let plain = layout_glyphs(&text)[0].width;
        text.letter_spacing = 10.0;
        let spaced = layout_glyphs(&text)[0].width;
        // Four glyphs, three gaps.
        assert!((spaced - plain - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_alignment_uses_measured_width() {
        let mut text = sample();
        text.align = TextAlign::Right;
        let line = &layout_glyphs(&text)[0];
        assert!((line.left + line.width - 500.0).abs() < 1e-3);

        text.align = TextAlign::Center;
        let line = &layout_glyphs(&text)[0];
        assert!((line.left + line.width / 2.0 - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_blank_line_has_no_outline() {
        let mut text = sample();
        text.multiline = true;
        text.content = "A\n".to_string();
        let lines = layout_glyphs(&text);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].outline.is_some());
        assert!(lines[1].outline.is_none());
        assert!(lines[1].width.abs() < f64::EPSILON);
    }
}
