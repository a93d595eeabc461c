//! Text shape and its line layout.

use super::{Frame, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default font size for new text objects.
pub const DEFAULT_FONT_SIZE: f64 = 48.0;
/// Placeholder content for new text objects.
pub const DEFAULT_TEXT: &str = "Text";

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    System,
    Serif,
    Mono,
}

/// Horizontal text alignment within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A text object. Line boxes come from [`TextLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ShapeId,
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(flatten)]
    pub style: ShapeStyle,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(rename = "text")]
    pub content: String,
    #[serde(default)]
    pub font: FontFamily,
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strike: bool,
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub multiline: bool,
}

impl Text {
    /// Create a text object with placeholder content.
    pub fn new(frame: Frame, font_size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            style: ShapeStyle::default(),
            locked: false,
            hidden: false,
            content: DEFAULT_TEXT.to_string(),
            font: FontFamily::System,
            font_size,
            bold: false,
            italic: false,
            underline: false,
            strike: false,
            letter_spacing: 0.0,
            align: TextAlign::Left,
            multiline: false,
        }
    }

    /// Lines to draw. Single-line text falls back to the placeholder when empty.
    pub fn lines(&self) -> Vec<&str> {
        if self.multiline {
            self.content.split('\n').collect()
        } else if self.content.is_empty() {
            vec![DEFAULT_TEXT]
        } else {
            vec![self.content.as_str()]
        }
    }

    pub fn layout(&self) -> TextLayout {
        TextLayout::new(self)
    }
}

impl ShapeTrait for Text {
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
        self.frame.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

/// One laid-out line box and where its decorations go.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    pub text: String,
    /// Top of the line box.
    pub top: f64,
    /// Left edge of the line, after alignment.
    pub left: f64,
    /// Approximate advance width including letter spacing.
    pub width: f64,
    pub underline_y: f64,
    pub strike_y: f64,
}

/// Approximate line layout for a text object.
///
/// Advance widths use a fixed em ratio; renderers re-measure with real font
/// metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub line_height: f64,
    /// Alignment anchor on the x axis.
    pub anchor_x: f64,
    pub lines: Vec<LaidOutLine>,
}

impl TextLayout {
    /// Average glyph advance as a fraction of the font size.
    pub const ADVANCE_RATIO: f64 = 0.6;

    pub fn new(text: &Text) -> Self {
        let line_height = (text.font_size * 1.2).round();
        let frame = text.frame;
        let anchor_x = match text.align {
            TextAlign::Left => frame.x,
            TextAlign::Center => frame.x + frame.w / 2.0,
            TextAlign::Right => frame.x + frame.w,
        };

        let lines = text
            .lines()
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let chars = line.chars().count();
                let width = chars as f64 * text.font_size * Self::ADVANCE_RATIO
                    + chars.saturating_sub(1) as f64 * text.letter_spacing;
                let left = match text.align {
                    TextAlign::Left => anchor_x,
                    TextAlign::Center => anchor_x - width / 2.0,
                    TextAlign::Right => anchor_x - width,
                };
                let top = frame.y + i as f64 * line_height;
                LaidOutLine {
                    text: line.to_string(),
                    top,
                    left,
                    width,
                    underline_y: top + text.font_size + 4.0,
                    strike_y: top + text.font_size * 0.55,
                }
            })
            .collect();

        Self {
            line_height,
            anchor_x,
            lines,
        }
    }
}
