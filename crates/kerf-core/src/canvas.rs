//! Canvas document and editing session.

use crate::clipboard::Clipboard;
use crate::factory::ShapeFactory;
use crate::history::{GeometrySnapshot, History, HistoryEntry};
use crate::settings::Settings;
use crate::shapes::{Shape, ShapeId};
use crate::tools::{ToolKind, ToolManager, ToolNotice};
use kurbo::Rect;
use std::collections::HashMap;

/// Logical canvas bitmap width.
pub const CANVAS_WIDTH: f64 = 1400.0;
/// Logical canvas bitmap height.
pub const CANVAS_HEIGHT: f64 = 900.0;

/// The scene: objects in paint order plus the single selection.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    /// Currently selected shape, always present in `shapes` when set.
    selected_id: Option<ShapeId>,
    history: History,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from objects in paint order. Duplicate ids keep the
    /// first occurrence.
    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>, selected: Option<ShapeId>) -> Self {
        let mut doc = Self::new();
        for shape in shapes {
            if doc.shapes.contains_key(&shape.id()) {
                log::warn!("skipping duplicate shape id {}", shape.id());
                continue;
            }
            doc.add_shape(shape);
        }
        doc.select(selected);
        doc
    }

    /// Append a shape on top of the z-order.
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id();
        self.z_order.push(id);
        self.shapes.insert(id, shape);
    }

    /// Insert a shape at `index` in the z-order (clamped to the end).
    pub fn insert_shape(&mut self, index: usize, shape: Shape) {
        let id = shape.id();
        let index = index.min(self.z_order.len());
        self.z_order.insert(index, id);
        self.shapes.insert(id, shape);
    }

    /// Remove a shape, returning it with its former z-index. Clears the
    /// selection if it pointed at the removed shape.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<(Shape, usize)> {
        let index = self.z_index(id)?;
        self.z_order.remove(index);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.shapes.remove(&id).map(|shape| (shape, index))
    }

    /// Clear all shapes, the selection and the history.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
        self.selected_id = None;
        self.history.clear();
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Apply `f` to one shape. No-op if absent.
    pub fn mutate<R>(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape) -> R) -> Option<R> {
        self.shapes.get_mut(&id).map(f)
    }

    /// Position of a shape in the z-order.
    pub fn z_index(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&shape_id| shape_id == id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Select a shape, or clear the selection with `None`.
    ///
    /// Unknown ids clear the selection and return `false`, so `selected_id`
    /// never dangles.
    pub fn select(&mut self, id: Option<ShapeId>) -> bool {
        match id {
            Some(id) if self.shapes.contains_key(&id) => {
                self.selected_id = Some(id);
                true
            }
            Some(id) => {
                log::debug!("select: unknown shape {id}");
                self.selected_id = None;
                false
            }
            None => {
                self.selected_id = None;
                true
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected_id
    }

    /// The selected shape, if any.
    pub fn selected(&self) -> Option<&Shape> {
        self.selected_id.and_then(|id| self.shapes.get(&id))
    }

    pub fn selected_mut(&mut self) -> Option<&mut Shape> {
        self.selected_id.and_then(|id| self.shapes.get_mut(&id))
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected_id == Some(id)
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes_ordered()
            .map(Shape::bounds)
            .reduce(|acc, r| acc.union(r))
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record a user action on the history.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.record(entry);
    }

    /// Add a shape, select it and record the creation.
    pub fn add_shape_recorded(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        let index = self.z_order.len();
        self.history.record(HistoryEntry::Create {
            shape: shape.clone(),
            index,
        });
        self.add_shape(shape);
        self.selected_id = Some(id);
        id
    }

    /// Remove a shape and record the deletion.
    pub fn remove_shape_recorded(&mut self, id: ShapeId) -> Option<Shape> {
        let (shape, index) = self.remove_shape(id)?;
        self.history.record(HistoryEntry::Delete {
            shape: shape.clone(),
            index,
        });
        Some(shape)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        log::debug!("undo {} {}", entry.label(), entry.shape_id());
        if let Some(inverse) = self.revert(entry, Direction::Undo) {
            self.history.push_redo(inverse);
        }
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        log::debug!("redo {} {}", entry.label(), entry.shape_id());
        if let Some(inverse) = self.revert(entry, Direction::Redo) {
            self.history.push_undo(inverse);
        }
        true
    }

    /// Apply one side of an entry and return the entry for the opposite stack.
    ///
    /// Undoing a create removes the object; redoing it restores it. Deletes
    /// are the mirror image. Geometry entries swap the stored geometry with
    /// the current one.
    fn revert(&mut self, entry: HistoryEntry, direction: Direction) -> Option<HistoryEntry> {
        match (entry, direction) {
            (HistoryEntry::Create { shape, .. }, Direction::Undo) => {
                let (current, index) = self.remove_shape(shape.id())?;
                Some(HistoryEntry::Create {
                    shape: current,
                    index,
                })
            }
            (HistoryEntry::Create { shape, index }, Direction::Redo) => {
                let id = shape.id();
                self.insert_shape(index, shape.clone());
                self.selected_id = Some(id);
                Some(HistoryEntry::Create { shape, index })
            }
            (HistoryEntry::Delete { shape, index }, Direction::Undo) => {
                let id = shape.id();
                self.insert_shape(index, shape.clone());
                self.selected_id = Some(id);
                Some(HistoryEntry::Delete { shape, index })
            }
            (HistoryEntry::Delete { shape, .. }, Direction::Redo) => {
                let (current, index) = self.remove_shape(shape.id())?;
                Some(HistoryEntry::Delete {
                    shape: current,
                    index,
                })
            }
            (HistoryEntry::Move { id, previous }, _) => {
                let current = self.swap_geometry(id, &previous)?;
                Some(HistoryEntry::Move {
                    id,
                    previous: current,
                })
            }
            (HistoryEntry::Resize { id, previous }, _) => {
                let current = self.swap_geometry(id, &previous)?;
                Some(HistoryEntry::Resize {
                    id,
                    previous: current,
                })
            }
        }
    }

    fn swap_geometry(&mut self, id: ShapeId, target: &GeometrySnapshot) -> Option<GeometrySnapshot> {
        let shape = self.shapes.get_mut(&id)?;
        let current = GeometrySnapshot::capture(shape);
        target.apply(shape);
        Some(current)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

/// Runtime editing session: the document plus tools, settings and clipboard.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Editor settings.
    pub settings: Settings,
    /// Single-object clipboard.
    pub clipboard: Clipboard,
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: CanvasDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// A fresh canvas holding the default outline rectangle, selected.
    pub fn seeded() -> Self {
        let mut canvas = Self::new();
        let seed = ShapeFactory::seed_shape();
        let id = seed.id();
        canvas.document.add_shape(seed);
        canvas.document.select(Some(id));
        canvas
    }

    /// Select a shape (clears previous selection).
    pub fn select(&mut self, id: ShapeId) -> bool {
        self.document.select(Some(id))
    }

    /// Clear selection.
    pub fn clear_selection(&mut self) {
        self.document.clear_selection();
    }

    /// Set the current tool. Returns a notice when the tool is unavailable.
    pub fn set_tool(&mut self, tool: ToolKind) -> Option<ToolNotice> {
        self.tool_manager.set_tool(tool)
    }

    /// Copy the selection to the clipboard. Returns false if nothing is selected.
    pub fn copy(&mut self) -> bool {
        match self.document.selected() {
            Some(shape) => {
                self.clipboard.store(shape);
                true
            }
            None => false,
        }
    }

    /// Copy then delete the selection.
    pub fn cut(&mut self) -> bool {
        if !self.can_delete() {
            return false;
        }
        self.copy() && self.delete_selected()
    }

    /// Whether the selection exists and is not locked.
    pub fn can_delete(&self) -> bool {
        self.document.selected().is_some_and(|s| !s.is_locked())
    }

    /// Delete the selected shape, recording it for undo.
    pub fn delete_selected(&mut self) -> bool {
        if !self.can_delete() {
            return false;
        }
        let Some(id) = self.document.selected_id() else {
            return false;
        };
        self.document.remove_shape_recorded(id).is_some()
    }

    /// Paste the clipboard contents as a new, selected shape.
    pub fn paste(&mut self) -> Option<ShapeId> {
        let shape = self.clipboard.next_paste()?;
        Some(self.document.add_shape_recorded(shape))
    }

    pub fn undo(&mut self) -> bool {
        self.document.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }
}
