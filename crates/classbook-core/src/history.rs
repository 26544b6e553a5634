//! Versioned snapshot log
//!
//! Holds a full copy of the store at every commit point plus a cursor. Undo
//! and redo move the cursor and reset the live store to the snapshot under
//! it, so every invariant the store held at commit time holds again
//! immediately, with no replay.
//!
//! `transitions[i]` describes the change from `snapshots[i]` to
//! `snapshots[i + 1]`; `0 <= cursor < snapshots.len()` always.

use tracing::debug;

use crate::errors::{ClassbookError, Result};
use crate::ops::Store;

/// Which list a front end should show after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewHint {
    Persons,
    Lessons,
}

/// Human-readable metadata for one committed change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub description: String,
    pub hint: ViewHint,
}

impl Transition {
    pub fn new(description: impl Into<String>, hint: ViewHint) -> Self {
        Self {
            description: description.into(),
            hint,
        }
    }
}

/// Undo/redo log over full store snapshots
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Store>,
    transitions: Vec<Transition>,
    cursor: usize,
}

impl History {
    /// Start a log whose only state is `initial`
    pub fn new(initial: &Store) -> Self {
        Self {
            snapshots: vec![initial.clone()],
            transitions: Vec::new(),
            cursor: 0,
        }
    }

    /// Record `live` as the state after a successful command
    ///
    /// Everything after the cursor is dropped first, so a commit made after
    /// an undo makes the undone states unreachable.
    pub fn commit(&mut self, live: &Store, description: impl Into<String>, hint: ViewHint) {
        let dropped = self.snapshots.len() - self.cursor - 1;
        self.snapshots.truncate(self.cursor + 1);
        self.transitions.truncate(self.cursor);

        self.snapshots.push(live.clone());
        self.transitions.push(Transition::new(description, hint));
        self.cursor += 1;

        debug!(
            cursor = self.cursor,
            snapshot_count = self.snapshots.len(),
            dropped_redo = dropped,
            "snapshot committed"
        );
    }

    /// Step back one commit and reset `live` to that state
    ///
    /// Returns the transition that was reverted.
    ///
    /// # Errors
    ///
    /// Returns `NoPreviousState` when already at the oldest snapshot; `live`
    /// is left untouched.
    pub fn undo(&mut self, live: &mut Store) -> Result<Transition> {
        if !self.can_undo() {
            return Err(ClassbookError::NoPreviousState);
        }
        let reverted = self.transitions[self.cursor - 1].clone();
        self.cursor -= 1;
        live.reset_data(self.snapshots[self.cursor].clone());

        debug!(cursor = self.cursor, "snapshot log moved back");
        Ok(reverted)
    }

    /// Step forward one commit and reset `live` to that state
    ///
    /// Returns the transition that was replayed.
    ///
    /// # Errors
    ///
    /// Returns `NoNextState` when already at the newest snapshot; `live` is
    /// left untouched.
    pub fn redo(&mut self, live: &mut Store) -> Result<Transition> {
        if !self.can_redo() {
            return Err(ClassbookError::NoNextState);
        }
        let replayed = self.transitions[self.cursor].clone();
        self.cursor += 1;
        live.reset_data(self.snapshots[self.cursor].clone());

        debug!(cursor = self.cursor, "snapshot log moved forward");
        Ok(replayed)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The transition an undo would revert
    pub fn last_command_description(&self) -> Option<&Transition> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.transitions.get(i))
    }

    /// The transition a redo would replay
    pub fn redo_command_description(&self) -> Option<&Transition> {
        self.transitions.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots held, including the initial one
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the initial snapshot is always present
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The snapshot under the cursor
    pub fn current(&self) -> &Store {
        &self.snapshots[self.cursor]
    }
}
