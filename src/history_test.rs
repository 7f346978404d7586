#![allow(clippy::float_cmp)]

use std::panic::{AssertUnwindSafe, catch_unwind};

use super::*;

// =============================================================
// Helpers
// =============================================================

#[derive(Default)]
struct TestDoc {
    frames: Vec<FrameState>,
    pages: PageLayoutSettings,
    fail_restore: bool,
    panic_restore: bool,
}

impl HistoryTarget for TestDoc {
    fn capture(&self) -> Result<HistorySnapshot, CaptureError> {
        HistorySnapshot::capture(&self.frames, &self.pages)
    }

    fn replace_all(&mut self, snapshot: &HistorySnapshot) -> Result<(), RestoreError> {
        if self.panic_restore {
            panic!("restore exploded");
        }
        if self.fail_restore {
            return Err(RestoreError::InvalidPages);
        }
        snapshot.validate()?;
        self.frames = snapshot.frames.clone();
        self.pages = snapshot.pages.clone();
        Ok(())
    }
}

fn doc_with_frame() -> TestDoc {
    TestDoc { frames: vec![FrameState::new(0.0, 0.0, 100.0, 100.0)], ..Default::default() }
}

/// Capture, mutate frame 0's x, commit under `label`.
fn move_and_commit(history: &mut History, doc: &mut TestDoc, x: f64, label: &str) -> HistorySnapshot {
    let before = doc.capture().unwrap();
    doc.frames[0].x = x;
    assert!(history.commit(before.clone(), label));
    before
}

// =============================================================
// Commit / undo / redo
// =============================================================

#[test]
fn undo_restores_state_captured_before_mutation() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    let before = move_and_commit(&mut history, &mut doc, 50.0, "move_frame");
    let after = doc.capture().unwrap();

    assert_eq!(history.undo(&mut doc).unwrap().as_deref(), Some("move_frame"));
    assert!(doc.capture().unwrap().same_state(&before));

    assert_eq!(history.redo(&mut doc).unwrap().as_deref(), Some("move_frame"));
    assert!(doc.capture().unwrap().same_state(&after));
    assert_eq!(doc.frames[0].x, 50.0);
}

#[test]
fn undo_on_empty_stack_is_noop() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    assert_eq!(history.undo(&mut doc).unwrap(), None);
    assert_eq!(history.redo(&mut doc).unwrap(), None);
    assert_eq!(doc.frames[0].x, 0.0);
}

#[test]
fn new_commit_clears_redo() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 10.0, "a");
    history.undo(&mut doc).unwrap();
    assert!(history.can_redo());

    move_and_commit(&mut history, &mut doc, 20.0, "b");
    assert!(!history.can_redo());
    assert_eq!(history.redo(&mut doc).unwrap(), None);
    assert_eq!(doc.frames[0].x, 20.0);
}

#[test]
fn multiple_undos_walk_back_in_order() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 1.0, "a");
    move_and_commit(&mut history, &mut doc, 2.0, "b");
    move_and_commit(&mut history, &mut doc, 3.0, "c");
    assert_eq!(history.undo_labels(), vec!["c", "b", "a"]);

    history.undo(&mut doc).unwrap();
    assert_eq!(doc.frames[0].x, 2.0);
    history.undo(&mut doc).unwrap();
    assert_eq!(doc.frames[0].x, 1.0);
    assert_eq!(history.redo_labels(), vec!["b", "c"]);
    history.redo(&mut doc).unwrap();
    assert_eq!(doc.frames[0].x, 2.0);
}

#[test]
fn snapshot_is_independent_of_live_state() {
    let mut doc = doc_with_frame();
    let snap = doc.capture().unwrap();
    doc.frames[0].width = 999.0;
    doc.pages.width = 1.0;
    assert_eq!(snap.frames[0].width, 100.0);
    assert_eq!(snap.pages.width, 1080.0);
}

// =============================================================
// Limit
// =============================================================

#[test]
fn limit_evicts_oldest_first() {
    let mut history = History::new(3);
    let mut doc = doc_with_frame();
    for (x, label) in [(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d"), (5.0, "e")] {
        move_and_commit(&mut history, &mut doc, x, label);
        assert!(history.undo_len() <= 3);
    }
    assert_eq!(history.undo_labels(), vec!["e", "d", "c"]);
}

#[test]
fn redo_respects_limit() {
    let mut history = History::new(2);
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 1.0, "a");
    move_and_commit(&mut history, &mut doc, 2.0, "b");
    history.undo(&mut doc).unwrap();
    move_and_commit(&mut history, &mut doc, 3.0, "c");
    history.undo(&mut doc).unwrap();
    history.redo(&mut doc).unwrap();
    assert!(history.undo_len() <= 2);
}

#[test]
fn shrinking_limit_trims_stack() {
    let mut history = History::new(10);
    let mut doc = doc_with_frame();
    for x in [1.0, 2.0, 3.0, 4.0] {
        move_and_commit(&mut history, &mut doc, x, "m");
    }
    history.set_limit(2);
    assert_eq!(history.undo_len(), 2);
    history.set_limit(0);
    assert_eq!(history.limit(), 1);
    assert_eq!(history.undo_len(), 1);
}

#[test]
fn clear_empties_both_stacks() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 1.0, "a");
    move_and_commit(&mut history, &mut doc, 2.0, "b");
    history.undo(&mut doc).unwrap();
    history.clear();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

// =============================================================
// Failure handling
// =============================================================

#[test]
fn capture_rejects_non_finite_geometry() {
    let mut doc = doc_with_frame();
    doc.frames[0].x = f64::INFINITY;
    let err = doc.capture().unwrap_err();
    assert_eq!(err.error_code(), "E_CAPTURE_FRAME");
    assert!(capture_logged(&doc, "move_frame").is_none());
}

#[test]
fn failed_restore_keeps_stacks_and_state() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 50.0, "move_frame");
    doc.fail_restore = true;

    let err = history.undo(&mut doc).unwrap_err();
    assert_eq!(err, RestoreError::InvalidPages);
    assert_eq!(history.undo_len(), 1);
    assert_eq!(history.redo_len(), 0);
    assert_eq!(doc.frames[0].x, 50.0);
    assert_eq!(history.phase(), RestorePhase::Idle);

    doc.fail_restore = false;
    assert!(history.undo(&mut doc).unwrap().is_some());
    assert_eq!(doc.frames[0].x, 0.0);
}

#[test]
fn corrupt_snapshot_is_rejected_whole() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    let mut bad = doc.capture().unwrap();
    bad.frames.push(bad.frames[0].clone());
    history.commit(bad, "dup");
    doc.frames[0].x = 5.0;

    let err = history.undo(&mut doc).unwrap_err();
    assert_eq!(err.error_code(), "E_RESTORE_DUPLICATE");
    assert_eq!(doc.frames.len(), 1);
    assert_eq!(doc.frames[0].x, 5.0);
}

#[test]
fn panic_during_restore_releases_guard() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 1.0, "a");
    move_and_commit(&mut history, &mut doc, 2.0, "b");
    doc.panic_restore = true;

    let result = catch_unwind(AssertUnwindSafe(|| history.undo(&mut doc)));
    assert!(result.is_err());
    assert!(!history.is_restoring());

    doc.panic_restore = false;
    let snap = doc.capture().unwrap();
    assert!(history.commit(snap, "after"));
}

#[test]
fn commit_is_suppressed_while_restoring() {
    let mut history = History::default();
    let doc = doc_with_frame();
    history.phase.set(RestorePhase::Restoring);
    assert!(!history.commit(doc.capture().unwrap(), "nested"));
    assert_eq!(history.undo_len(), 0);
    history.phase.set(RestorePhase::Idle);
}

#[test]
fn restore_while_restoring_is_busy() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    move_and_commit(&mut history, &mut doc, 1.0, "a");
    history.phase.set(RestorePhase::Restoring);
    assert_eq!(history.undo(&mut doc).unwrap_err(), RestoreError::Busy);
    assert_eq!(history.undo_len(), 1);
    history.phase.set(RestorePhase::Idle);
}

#[test]
fn snapshot_serializes() {
    let doc = doc_with_frame();
    let snap = doc.capture().unwrap();
    let json = serde_json::to_string(&snap).unwrap();
    let back: HistorySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}

// =============================================================
// Timestamps
// =============================================================

#[test]
fn entries_carry_wall_clock_timestamps() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    let before = move_and_commit(&mut history, &mut doc, 10.0, "move_frame");
    move_and_commit(&mut history, &mut doc, 20.0, "move_frame");

    assert!(before.timestamp_ms > 0);
    let stamps: Vec<i64> = history.undo.iter().map(|e| e.timestamp_ms).collect();
    assert!(stamps.iter().all(|&t| t >= before.timestamp_ms));
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn undo_stamps_the_redo_entry() {
    let mut history = History::default();
    let mut doc = doc_with_frame();
    let before = move_and_commit(&mut history, &mut doc, 10.0, "move_frame");

    history.undo(&mut doc).unwrap();
    assert_eq!(history.redo.len(), 1);
    assert!(history.redo[0].timestamp_ms >= before.timestamp_ms);
}
