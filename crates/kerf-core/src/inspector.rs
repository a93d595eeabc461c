//! Property panel binding for the selected object.
//!
//! Numeric fields arrive as raw strings from the host's input widgets and are
//! parsed leniently: a leading number is used and trailing junk is ignored.

use crate::canvas::Canvas;
use crate::geometry::{PATH_BOUNDS_PADDING, compute_path_bounds, scale_points};
use crate::shapes::{
    DEFAULT_FONT_SIZE, FillMode, FontFamily, MAX_DEPTH_MM, SerializableColor, Shape, TextAlign,
};
use kurbo::Vec2;

/// Smallest width/height accepted from the panel.
pub const MIN_EDIT_EXTENT: f64 = 20.0;

/// Snapshot of the panel fields for one object.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorView {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub locked: bool,
    pub hidden: bool,
    pub fill_mode: FillMode,
    pub color: String,
    pub depth_mm: f64,
    /// Text fields; neutral values for non-text objects.
    pub is_text: bool,
    pub font: FontFamily,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub align: TextAlign,
    pub multiline: bool,
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl InspectorView {
    pub fn from_shape(shape: &Shape) -> Self {
        let frame = shape.frame();
        let style = shape.style();
        let mut view = Self {
            x: frame.x.round(),
            y: frame.y.round(),
            w: frame.w.round(),
            h: frame.h.round(),
            locked: shape.is_locked(),
            hidden: shape.is_hidden(),
            fill_mode: style.fill_mode,
            color: style.color.to_hex(),
            depth_mm: style.depth_mm,
            is_text: false,
            font: FontFamily::System,
            font_size: DEFAULT_FONT_SIZE,
            letter_spacing: 0.0,
            align: TextAlign::Left,
            multiline: false,
            text: String::new(),
            bold: false,
            italic: false,
            underline: false,
            strike: false,
        };
        if let Some(text) = shape.as_text() {
            view.is_text = true;
            view.font = text.font;
            view.font_size = text.font_size;
            view.letter_spacing = text.letter_spacing;
            view.align = text.align;
            view.multiline = text.multiline;
            view.text = text.content.clone();
            view.bold = text.bold;
            view.italic = text.italic;
            view.underline = text.underline;
            view.strike = text.strike;
        }
        view
    }
}

/// One edit from the property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    X(String),
    Y(String),
    W(String),
    H(String),
    Locked(bool),
    Hidden(bool),
    FillMode(FillMode),
    Color(String),
    Depth(String),
    Font(FontFamily),
    FontSize(String),
    LetterSpacing(String),
    Align(TextAlign),
    Multiline(bool),
    Text(String),
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleStrike,
}

impl Canvas {
    /// Panel contents for the current selection, `None` disables the panel.
    pub fn inspector_view(&self) -> Option<InspectorView> {
        self.document.selected().map(InspectorView::from_shape)
    }

    /// Apply one panel edit to the selection. Returns false when nothing is
    /// selected or the edit does not apply. Not recorded in history.
    pub fn apply_edit(&mut self, edit: FieldEdit) -> bool {
        let Some(shape) = self.document.selected_mut() else {
            return false;
        };
        apply_to_shape(shape, edit)
    }
}

fn apply_to_shape(shape: &mut Shape, edit: FieldEdit) -> bool {
    match edit {
        FieldEdit::X(raw) => {
            let x = parse_float_prefix(&raw).unwrap_or(0.0);
            shape.translate(Vec2::new(x - shape.frame().x, 0.0));
        }
        FieldEdit::Y(raw) => {
            let y = parse_float_prefix(&raw).unwrap_or(0.0);
            shape.translate(Vec2::new(0.0, y - shape.frame().y));
        }
        FieldEdit::W(raw) => set_extent(shape, Axis::X, parse_extent(&raw)),
        FieldEdit::H(raw) => set_extent(shape, Axis::Y, parse_extent(&raw)),
        FieldEdit::Locked(locked) => shape.set_locked(locked),
        FieldEdit::Hidden(hidden) => shape.set_hidden(hidden),
        FieldEdit::FillMode(mode) => shape.style_mut().fill_mode = mode,
        FieldEdit::Color(raw) => match SerializableColor::from_hex(&raw) {
            Some(color) => shape.style_mut().color = color,
            None => {
                log::warn!("ignoring invalid color {raw:?}");
                return false;
            }
        },
        FieldEdit::Depth(raw) => match parse_float_prefix(&raw) {
            Some(depth) => shape.style_mut().depth_mm = depth.clamp(0.0, MAX_DEPTH_MM),
            None => return false,
        },
        edit => return apply_text_edit(shape, edit),
    }
    true
}

fn apply_text_edit(shape: &mut Shape, edit: FieldEdit) -> bool {
    let Some(text) = shape.as_text_mut() else {
        log::debug!("ignoring text edit on {}", shape.kind().name());
        return false;
    };
    match edit {
        FieldEdit::Font(font) => text.font = font,
        FieldEdit::FontSize(raw) => {
            text.font_size = parse_int_prefix(&raw)
                .filter(|size| *size > 0)
                .map_or(DEFAULT_FONT_SIZE, |size| size as f64);
        }
        FieldEdit::LetterSpacing(raw) => {
            text.letter_spacing = parse_int_prefix(&raw).unwrap_or(0) as f64;
        }
        FieldEdit::Align(align) => text.align = align,
        FieldEdit::Multiline(multiline) => text.multiline = multiline,
        FieldEdit::Text(content) => text.content = content,
        FieldEdit::ToggleBold => text.bold = !text.bold,
        FieldEdit::ToggleItalic => text.italic = !text.italic,
        FieldEdit::ToggleUnderline => text.underline = !text.underline,
        FieldEdit::ToggleStrike => text.strike = !text.strike,
        _ => return false,
    }
    true
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn parse_extent(raw: &str) -> f64 {
    parse_float_prefix(raw)
        .filter(|v| *v != 0.0)
        .unwrap_or(MIN_EDIT_EXTENT)
        .max(MIN_EDIT_EXTENT)
}

/// Set one extent. Paths rescale their points so that the padded point
/// bounds come out at the requested size.
fn set_extent(shape: &mut Shape, axis: Axis, extent: f64) {
    let frame = *shape.frame();
    let Some(points) = shape.points_mut() else {
        let frame = shape.frame_mut();
        match axis {
            Axis::X => frame.w = extent,
            Axis::Y => frame.h = extent,
        }
        return;
    };

    let coord = |p: &kurbo::Point| match axis {
        Axis::X => p.x,
        Axis::Y => p.y,
    };
    let lo = points.iter().map(coord).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(coord).fold(f64::NEG_INFINITY, f64::max);
    let inner = hi - lo;
    let target = extent - PATH_BOUNDS_PADDING * 2.0;
    let origin = kurbo::Point::new(lo, lo);
    // A flat path has no span to stretch.
    if inner > f64::EPSILON {
        let factor = target / inner;
        match axis {
            Axis::X => scale_points(points, origin, factor, 1.0),
            Axis::Y => scale_points(points, origin, 1.0, factor),
        }
    }
    let bounds = compute_path_bounds(points);
    *shape.frame_mut() = bounds;
    log::debug!(
        "path extent edit: {:?} {:.1}x{:.1} -> {:.1}x{:.1}",
        axis,
        frame.w,
        frame.h,
        bounds.w,
        bounds.h
    );
}

/// Longest leading decimal number in `raw`, like a browser's `parseFloat`.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || (end == digits_start + 1 && bytes[digits_start] == b'.') {
        return None;
    }
    // Optional exponent, only if followed by digits.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading integer in `raw`, like a browser's `parseInt(raw, 10)`.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}
