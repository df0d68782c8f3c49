// SPDX-FileCopyrightText: 2026 Spindle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, de-duplicating diagnostic notes for a load attempt.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct NoteState {
    order: Vec<String>,
    seen: HashSet<String>,
}

/// Human-readable notes collected while a load runs.
///
/// Each note is also emitted as a `tracing` event. A note that was already
/// recorded is dropped, so the log reads as a list of distinct facts.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    state: Mutex<NoteState>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a routine note ("resource found", "processing entry").
    pub fn debug(&self, note: impl Into<String>) {
        let note = note.into();
        tracing::debug!(target: "spindle::discovery", "{note}");
        self.record(note);
    }

    /// Record a note about something that was skipped.
    pub fn warn(&self, note: impl Into<String>) {
        let note = note.into();
        tracing::warn!(target: "spindle::discovery", "{note}");
        self.record(note);
    }

    /// Append a note without emitting an event. Returns false if it was
    /// already present.
    pub fn record(&self, note: impl Into<String>) -> bool {
        let note = note.into();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.seen.insert(note.clone()) {
            return false;
        }
        state.order.push(note);
        true
    }

    /// Snapshot of the notes in insertion order.
    pub fn entries(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
