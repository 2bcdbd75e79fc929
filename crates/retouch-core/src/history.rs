//! Bounded undo/redo history of working-image snapshots.
//!
//! Every destructive operation pushes the pre-mutation working image onto
//! the undo stack. The stack is a ring of at most [`HISTORY_CAPACITY`]
//! fully-materialized rasters: pushing past capacity silently evicts the
//! oldest entry. The oldest retained entry is the baseline the user can
//! always return to and is never popped by undo.
//!
//! Undo and redo are mutually exclusive branches: any new snapshot clears
//! the redo stack, so history never forks.

use std::collections::VecDeque;

use thiserror::Error;

use crate::raster::RasterBuffer;

/// Maximum number of undo snapshots retained.
pub const HISTORY_CAPACITY: usize = 5;

/// Errors for exhausted history stacks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// No snapshot older than the baseline is available.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// The undo/redo state machine.
#[derive(Debug)]
pub struct HistoryManager {
    undo_stack: VecDeque<RasterBuffer>,
    redo_stack: Vec<RasterBuffer>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty history with an explicit capacity (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the pre-mutation state of the working image.
    ///
    /// Called before every destructive operation. Evicts the oldest
    /// snapshot past capacity and discards any pending redo entries.
    pub fn snapshot(&mut self, working: &RasterBuffer) {
        self.redo_stack.clear();
        if self.undo_stack.len() == self.capacity {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(working.clone());
    }

    /// Step back: push `current` onto redo, pop the last snapshot.
    ///
    /// Fails with [`HistoryError::NothingToUndo`] when only the baseline
    /// remains; the baseline itself is never popped.
    pub fn undo(&mut self, current: &RasterBuffer) -> Result<RasterBuffer, HistoryError> {
        if self.undo_stack.len() < 2 {
            return Err(HistoryError::NothingToUndo);
        }
        let restored = self.undo_stack.pop_back().expect("len checked above");
        self.redo_stack.push(current.clone());
        Ok(restored)
    }

    /// Step forward: push `current` onto undo, pop the last redo entry.
    pub fn redo(&mut self, current: &RasterBuffer) -> Result<RasterBuffer, HistoryError> {
        let restored = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        if self.undo_stack.len() == self.capacity {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(current.clone());
        Ok(restored)
    }

    /// Drop everything and install a new baseline.
    pub fn reset(&mut self, baseline: &RasterBuffer) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push_back(baseline.clone());
    }

    /// True when an undo would succeed.
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    /// True when a redo would succeed.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
