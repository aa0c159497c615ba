//! Bounded undo/redo stack of edit snapshots.
//!
//! Every entry is a complete snapshot, so undo and redo are plain swaps and
//! never re-run any pixel work. The cursor counts the entries that are
//! currently applied; the visible state is `entries[cursor - 1]`.

use std::sync::Arc;

use crate::buffer::PixelBuffer;
use crate::filters::FilterApplication;
use crate::Adjustments;

/// Everything needed to restore an edit state.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// The rendered buffer at this point.
    pub buffer: PixelBuffer,
    /// Transform state the buffer was rendered with.
    pub adjustments: Adjustments,
    /// Filters layered on top of the render, in application order.
    pub filters: Vec<FilterApplication>,
    /// Source image in effect. Shared between entries, never mutated.
    pub source: Arc<PixelBuffer>,
}

/// Linear history with a cursor and a capacity.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Create an empty history holding at most `limit` entries.
    ///
    /// A limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record a new state.
    ///
    /// Anything that was undone is discarded first. When the history is
    /// full, the oldest entry is dropped.
    pub fn commit(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len();
    }

    /// Step back to the previous state.
    ///
    /// Returns `None` when there is nothing before the current state.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward to the next state, if one was undone.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// The currently applied entry.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 1
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of applied entries.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
