//! Undo/redo history of reversible object mutations.

use crate::shapes::{Frame, Shape, ShapeId};
use kurbo::Point;
use std::collections::VecDeque;

/// Maximum number of undo entries to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Geometry of one object: its frame plus path points when it has them.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySnapshot {
    pub frame: Frame,
    pub points: Option<Vec<Point>>,
}

impl GeometrySnapshot {
    pub fn capture(shape: &Shape) -> Self {
        Self {
            frame: *shape.frame(),
            points: shape.points().map(<[Point]>::to_vec),
        }
    }

    /// Overwrite `shape`'s geometry with this snapshot.
    pub fn apply(&self, shape: &mut Shape) {
        *shape.frame_mut() = self.frame;
        if let (Some(points), Some(target)) = (&self.points, shape.points_mut()) {
            target.clone_from(points);
        }
    }
}

/// A reversible mutation.
///
/// `Create`/`Delete` carry a full snapshot and the z-index it lived at;
/// `Move`/`Resize` carry the geometry to restore.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    Create { shape: Shape, index: usize },
    Delete { shape: Shape, index: usize },
    Move { id: ShapeId, previous: GeometrySnapshot },
    Resize { id: ShapeId, previous: GeometrySnapshot },
}

impl HistoryEntry {
    pub fn shape_id(&self) -> ShapeId {
        match self {
            HistoryEntry::Create { shape, .. } | HistoryEntry::Delete { shape, .. } => shape.id(),
            HistoryEntry::Move { id, .. } | HistoryEntry::Resize { id, .. } => *id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::Create { .. } => "create",
            HistoryEntry::Delete { .. } => "delete",
            HistoryEntry::Move { .. } => "move",
            HistoryEntry::Resize { .. } => "resize",
        }
    }
}

/// Linear undo/redo stacks with a bounded undo depth.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity.min(MAX_UNDO_HISTORY)),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a new user action. Clears the redo stack.
    pub fn record(&mut self, entry: HistoryEntry) {
        log::debug!("history: record {} {}", entry.label(), entry.shape_id());
        self.redo_stack.clear();
        self.push_undo(entry);
    }

    /// Push onto the undo stack without touching redo, evicting the oldest
    /// entry when full.
    pub(crate) fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    pub(crate) fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo_stack.push(entry);
    }

    pub(crate) fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest entry still on the undo stack.
    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.undo_stack.front()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
