//! Undo/redo history over whole-document snapshots.
//!
//! A [`HistorySnapshot`] is a deep copy of every frame plus the page settings.
//! The undo stack is bounded (oldest evicted first); the redo stack is cleared
//! by every new commit. Undo and redo capture the live state onto the opposite
//! stack, then hand the popped snapshot to the [`HistoryTarget`], which
//! replaces its whole frame collection.
//!
//! Restoration runs under a scoped [`RestorePhase`] guard. While it is held,
//! commits are ignored, so setters that fire as a side effect of a restore
//! cannot record history. The guard is released on every exit path, including
//! a panic inside the target.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_HISTORY_LIMIT;
use crate::error::ErrorCode;
use crate::frame::{FrameId, FrameState};
use crate::page::PageLayoutSettings;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    #[error("frame {0} has non-finite or empty geometry")]
    MalformedFrame(FrameId),
    #[error("page settings are not finite")]
    MalformedPages,
}

impl ErrorCode for CaptureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedFrame(_) => "E_CAPTURE_FRAME",
            Self::MalformedPages => "E_CAPTURE_PAGES",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RestoreError {
    #[error("snapshot frame {0} has non-finite or empty geometry")]
    MalformedFrame(FrameId),
    #[error("snapshot holds frame {0} more than once")]
    DuplicateFrame(FrameId),
    #[error("snapshot page settings are invalid")]
    InvalidPages,
    #[error("a restore is already in progress")]
    Busy,
    #[error("could not capture the current state: {0}")]
    Capture(#[from] CaptureError),
}

impl ErrorCode for RestoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedFrame(_) => "E_RESTORE_FRAME",
            Self::DuplicateFrame(_) => "E_RESTORE_DUPLICATE",
            Self::InvalidPages => "E_RESTORE_PAGES",
            Self::Busy => "E_RESTORE_BUSY",
            Self::Capture(e) => e.error_code(),
        }
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Deep copy of the document at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub frames: Vec<FrameState>,
    pub pages: PageLayoutSettings,
    pub timestamp_ms: i64,
}

impl HistorySnapshot {
    /// Build a snapshot, rejecting geometry that could not be restored later.
    pub fn capture(frames: &[FrameState], pages: &PageLayoutSettings) -> Result<Self, CaptureError> {
        if let Some(bad) = frames.iter().find(|f| !f.is_well_formed()) {
            return Err(CaptureError::MalformedFrame(bad.id));
        }
        if !pages_finite(pages) {
            return Err(CaptureError::MalformedPages);
        }
        Ok(Self { frames: frames.to_vec(), pages: pages.clone(), timestamp_ms: now_ms() })
    }

    /// Whether two snapshots describe the same document, ignoring when they were taken.
    #[must_use]
    pub fn same_state(&self, other: &Self) -> bool {
        self.frames == other.frames && self.pages == other.pages
    }

    /// Check that the snapshot can be applied as a whole.
    pub fn validate(&self) -> Result<(), RestoreError> {
        let mut seen = HashSet::with_capacity(self.frames.len());
        for frame in &self.frames {
            if !frame.is_well_formed() {
                return Err(RestoreError::MalformedFrame(frame.id));
            }
            if !seen.insert(frame.id) {
                return Err(RestoreError::DuplicateFrame(frame.id));
            }
        }
        if !pages_finite(&self.pages) || self.pages.count == 0 || self.pages.grid.cols == 0 || self.pages.grid.rows == 0
        {
            return Err(RestoreError::InvalidPages);
        }
        Ok(())
    }
}

fn pages_finite(pages: &PageLayoutSettings) -> bool {
    [pages.width, pages.height, pages.gap, pages.grid.gap, pages.grid.margin]
        .iter()
        .all(|v| v.is_finite())
}

/// One undo or redo stack entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub label: String,
    pub snapshot: HistorySnapshot,
    pub timestamp_ms: i64,
}

/// A pre-operation snapshot waiting to be committed under `label`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub snapshot: HistorySnapshot,
    pub label: &'static str,
}

/// The document the history captures from and restores into.
pub trait HistoryTarget {
    /// Deep-copy the live state.
    fn capture(&self) -> Result<HistorySnapshot, CaptureError>;

    /// Replace the live state wholesale. Must leave the live state untouched on error.
    fn replace_all(&mut self, snapshot: &HistorySnapshot) -> Result<(), RestoreError>;
}

/// Capture from `target`, logging and discarding a failure.
///
/// A `None` means the caller's operation proceeds without history coverage.
pub fn capture_logged(target: &impl HistoryTarget, action: &str) -> Option<HistorySnapshot> {
    match target.capture() {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), action, "history: capture failed; action will not be undoable");
            None
        }
    }
}

// =============================================================================
// RESTORE GUARD
// =============================================================================

/// Whether a restore is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestorePhase {
    #[default]
    Idle,
    Restoring,
}

/// Holds [`RestorePhase::Restoring`] for its lifetime.
struct RestoreGuard<'a> {
    phase: &'a Cell<RestorePhase>,
}

impl<'a> RestoreGuard<'a> {
    fn acquire(phase: &'a Cell<RestorePhase>) -> Option<Self> {
        if phase.get() == RestorePhase::Restoring {
            return None;
        }
        phase.set(RestorePhase::Restoring);
        Some(Self { phase })
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(RestorePhase::Idle);
    }
}

// =============================================================================
// HISTORY
// =============================================================================

#[derive(Clone, Copy)]
enum Direction {
    Undo,
    Redo,
}

/// Bounded undo/redo stacks.
#[derive(Debug)]
pub struct History {
    limit: usize,
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    phase: Cell<RestorePhase>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Empty history keeping at most `limit` undo entries (at least 1).
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit: limit.max(1), undo: VecDeque::new(), redo: Vec::new(), phase: Cell::new(RestorePhase::Idle) }
    }

    // --- Queries ---

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Undo labels, most recent first.
    #[must_use]
    pub fn undo_labels(&self) -> Vec<&str> {
        self.undo.iter().rev().map(|e| e.label.as_str()).collect()
    }

    /// Redo labels, next redo first.
    #[must_use]
    pub fn redo_labels(&self) -> Vec<&str> {
        self.redo.iter().rev().map(|e| e.label.as_str()).collect()
    }

    #[must_use]
    pub fn phase(&self) -> RestorePhase {
        self.phase.get()
    }

    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.phase.get() == RestorePhase::Restoring
    }

    // --- Mutation ---

    /// Change the limit (at least 1), evicting the oldest entries beyond it.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        trim_oldest(&mut self.undo, self.limit);
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Push `snapshot` as the state before `label`. Clears the redo stack.
    ///
    /// Ignored while a restore is in progress. Returns whether it was recorded.
    pub fn commit(&mut self, snapshot: HistorySnapshot, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.is_restoring() {
            tracing::debug!(label = label.as_str(), "history: commit suppressed during restore");
            return false;
        }
        self.undo.push_back(HistoryEntry { label, snapshot, timestamp_ms: now_ms() });
        trim_oldest(&mut self.undo, self.limit);
        self.redo.clear();
        tracing::debug!(undo = self.undo.len(), "history: committed");
        true
    }

    /// Commit a pending snapshot produced by a finished gesture.
    pub fn commit_pending(&mut self, pending: PendingCommit) -> bool {
        self.commit(pending.snapshot, pending.label)
    }

    /// Restore the most recent undo entry.
    ///
    /// `Ok(None)` when there is nothing to undo; otherwise the label undone.
    /// On error both stacks and the live state are unchanged.
    pub fn undo(&mut self, target: &mut impl HistoryTarget) -> Result<Option<String>, RestoreError> {
        self.step(target, Direction::Undo)
    }

    /// Re-apply the most recently undone entry. Mirror of [`History::undo`].
    pub fn redo(&mut self, target: &mut impl HistoryTarget) -> Result<Option<String>, RestoreError> {
        self.step(target, Direction::Redo)
    }

    fn step(&mut self, target: &mut impl HistoryTarget, dir: Direction) -> Result<Option<String>, RestoreError> {
        let source_empty = match dir {
            Direction::Undo => self.undo.is_empty(),
            Direction::Redo => self.redo.is_empty(),
        };
        if source_empty {
            return Ok(None);
        }

        let Some(_guard) = RestoreGuard::acquire(&self.phase) else {
            tracing::warn!("history: restore requested while restoring");
            return Err(RestoreError::Busy);
        };

        let current = match target.capture() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "history: cannot capture current state");
                return Err(e.into());
            }
        };

        let popped = match dir {
            Direction::Undo => self.undo.pop_back(),
            Direction::Redo => self.redo.pop(),
        };
        let Some(entry) = popped else {
            return Ok(None);
        };

        if let Err(e) = target.replace_all(&entry.snapshot) {
            tracing::warn!(error = %e, code = e.error_code(), label = entry.label.as_str(), "history: restore failed");
            match dir {
                Direction::Undo => self.undo.push_back(entry),
                Direction::Redo => self.redo.push(entry),
            }
            return Err(e);
        }

        let label = entry.label;
        let opposite = HistoryEntry { label: label.clone(), snapshot: current, timestamp_ms: now_ms() };
        match dir {
            Direction::Undo => self.redo.push(opposite),
            Direction::Redo => {
                self.undo.push_back(opposite);
                trim_oldest(&mut self.undo, self.limit);
            }
        }
        tracing::debug!(label = label.as_str(), undo = self.undo.len(), redo = self.redo.len(), "history: restored");
        Ok(Some(label))
    }
}

fn trim_oldest(undo: &mut VecDeque<HistoryEntry>, limit: usize) {
    while undo.len() > limit {
        undo.pop_front();
    }
}

/// Wall-clock milliseconds since the Unix epoch, 0 if the clock is unavailable.
///
/// `std::time::SystemTime` has no clock on `wasm32-unknown-unknown`, so the
/// browser build reads `Date.now()` instead.
#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation)]
fn now_ms() -> i64 {
    let now = js_sys::Date::now();
    if now.is_finite() { now as i64 } else { 0 }
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
