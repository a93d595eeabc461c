//! Single-object clipboard.

use crate::shapes::Shape;
use kurbo::Vec2;

/// Offset applied to each pasted copy.
pub const PASTE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Holds at most one deep copy of an object, independent of the scene.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<Shape>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents with a copy of `shape`.
    pub fn store(&mut self, shape: &Shape) {
        self.slot = Some(shape.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn peek(&self) -> Option<&Shape> {
        self.slot.as_ref()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Produce the next paste: a copy with a fresh id, offset from the stored
    /// object. The stored object advances by the same offset so repeated
    /// pastes walk diagonally.
    pub fn next_paste(&mut self) -> Option<Shape> {
        let stored = self.slot.as_mut()?;
        let mut pasted = stored.clone();
        pasted.regenerate_id();
        pasted.translate(PASTE_OFFSET);
        stored.translate(PASTE_OFFSET);
        Some(pasted)
    }
}
