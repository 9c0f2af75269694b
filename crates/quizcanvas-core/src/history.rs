//! Bounded undo/redo history of annotation snapshots.

use crate::marks::{CircleMark, ConnectorMark, PlacedShape};

/// Maximum number of undo states to keep.
pub const MAX_HISTORY: usize = 50;

/// An immutable copy of the three mark lists at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub circles: Vec<CircleMark>,
    pub connectors: Vec<ConnectorMark>,
    pub shapes: Vec<PlacedShape>,
}

/// Undo/redo stacks of full annotation-set snapshots.
///
/// The future stack is only ever non-empty immediately after one or more
/// consecutive undos; any new push invalidates it.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state. Clears the redo path and drops the
    /// oldest snapshot once the cap is reached.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        self.future.clear();
        if self.past.len() > MAX_HISTORY {
            self.past.remove(0);
        }
    }

    /// Pop the most recent past snapshot, moving `current` onto the future
    /// stack. Returns `None` (leaving `current` untouched) when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.past.pop()?;
        self.future.push(current);
        Some(restored)
    }

    /// Symmetric to [`undo`](Self::undo): pop the most recent future
    /// snapshot, moving `current` onto the past stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let restored = self.future.pop()?;
        self.past.push(current);
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Drop all history, e.g. when the session advances to another question.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
