//! # History Manager
//!
//! A linear undo/redo stack of rendered-surface snapshots. `position` points
//! at the entry currently on screen. Replaying history moves the pointer and
//! never removes entries; committing a fresh edit drops everything after the
//! pointer first, so there is never more than one future.

use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 256;

/// An immutable (surface, cursor) snapshot.
///
/// `cursor` is a linear character offset into this entry's own surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    surface: String,
    cursor: usize,
}

impl HistoryEntry {
    pub fn new(surface: impl Into<String>, cursor: usize) -> Self {
        Self {
            surface: surface.into(),
            cursor,
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    position: usize,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A stack holding at most `capacity` entries (at least one).
    ///
    /// When full, committing evicts the oldest entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            position: 0,
            capacity,
        }
    }

    /// Record a new edit and make it the current entry.
    ///
    /// Any redo entries are discarded first. Returns the new position.
    pub fn checkpoint(&mut self, surface: impl Into<String>, cursor: usize) -> usize {
        if !self.entries.is_empty() {
            self.truncate_after(self.position);
        }
        self.push(HistoryEntry::new(surface, cursor));
        self.position
    }

    /// Drop every entry after `position`
    pub fn truncate_after(&mut self, position: usize) {
        let dropped = self.entries.len().saturating_sub(position.saturating_add(1));
        if dropped > 0 {
            log::debug!("history: dropping {dropped} redo entries");
        }
        self.entries.truncate(position.saturating_add(1));
        self.position = self.position.min(position);
    }

    fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.position = self.entries.len() - 1;
    }

    /// Step back one entry. `None` at the oldest entry or when empty.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.entries.is_empty() || self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.entries.get(self.position)
    }

    /// Step forward one entry. `None` at the newest entry or when empty.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        self.entries.get(self.position)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.position)
    }

    /// Index of the displayed entry, `None` before the first checkpoint
    pub fn position(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
