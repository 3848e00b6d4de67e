//! Undo history for the stroke store

use std::sync::Arc;

use tracing::{debug, info};

use crate::types::Stroke;

use super::StrokeStore;

impl StrokeStore {
    /// Record `next` as a new snapshot after the cursor.
    ///
    /// Snapshots beyond the cursor are discarded.
    pub(crate) fn push_snapshot(&mut self, next: Vec<Arc<Stroke>>) {
        self.history.truncate(self.cursor + 1);
        self.history.push(next);
        self.cursor += 1;
        self.revision += 1;
    }

    /// Overwrite the snapshot at the cursor
    pub(crate) fn replace_snapshot(&mut self, next: Vec<Arc<Stroke>>) {
        self.history[self.cursor] = next;
        self.revision += 1;
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Number of snapshots, including the initial empty one
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Index of the visible snapshot
    pub fn history_cursor(&self) -> usize {
        self.cursor
    }

    /// Step back one snapshot
    ///
    /// Returns true if an undo was performed. Any drag in progress ends.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            debug!("Undo: already at initial state");
            return false;
        }

        self.cursor -= 1;
        self.revision += 1;
        self.end_drag();
        debug!(
            "Undo to snapshot {} ({} strokes)",
            self.cursor,
            self.stroke_count()
        );
        true
    }

    /// Remove every stroke and reset history to a single empty snapshot
    pub fn clear_all(&mut self) {
        let removed = self.stroke_count();
        self.history = vec![Vec::new()];
        self.cursor = 0;
        self.revision += 1;
        self.end_drag();
        info!("Cleared {} stroke(s)", removed);
    }
}
