//! Document model: the live frames, the page layout, and the grid cache.
//!
//! Frames are kept in a `Vec`; later entries are drawn above earlier ones, so
//! hit-testing walks the collection back to front. The store owns the
//! selection invariants: at most one frame is selected, and only the selected
//! frame may be in content edit.
//!
//! [`Document`] bundles the frames with the page settings and is the
//! [`HistoryTarget`] that undo and redo capture from and restore into. Page
//! settings are only reachable mutably through [`Document::update_pages`], so
//! every mutation invalidates the grid line cache.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use crate::frame::{FrameId, FrameMode, FrameState};
use crate::grid::{GridIndex, GridLineSet};
use crate::history::{CaptureError, HistorySnapshot, HistoryTarget, RestoreError};
use crate::page::PageLayoutSettings;

/// In-memory, ordered store of frames.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    frames: Vec<FrameState>,
}

impl FrameStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a frame on top, or replace the frame with the same `id` in place.
    pub fn insert(&mut self, frame: FrameState) {
        match self.position(&frame.id) {
            Some(i) => self.frames[i] = frame,
            None => self.frames.push(frame),
        }
    }

    /// Remove a frame by id, returning it if it was present.
    pub fn remove(&mut self, id: &FrameId) -> Option<FrameState> {
        let i = self.position(id)?;
        Some(self.frames.remove(i))
    }

    /// Remove every frame matching `pred`, returning the removed frames in order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&FrameState) -> bool) -> Vec<FrameState> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.frames).into_iter().partition(|f| pred(f));
        self.frames = kept;
        removed
    }

    #[must_use]
    pub fn get(&self, id: &FrameId) -> Option<&FrameState> {
        self.frames.iter().find(|f| f.id == *id)
    }

    pub fn get_mut(&mut self, id: &FrameId) -> Option<&mut FrameState> {
        self.frames.iter_mut().find(|f| f.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &FrameId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: &FrameId) -> Option<usize> {
        self.frames.iter().position(|f| f.id == *id)
    }

    // --- Selection ---

    /// Select `id` and deselect every other frame.
    ///
    /// Returns the ids whose state changed, or an empty list when `id` is
    /// unknown (the selection is left alone in that case).
    pub fn select(&mut self, id: &FrameId) -> Vec<FrameId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut changed = Vec::new();
        for frame in &mut self.frames {
            if frame.id == *id {
                if !frame.is_selected {
                    frame.is_selected = true;
                    changed.push(frame.id);
                }
            } else if frame.deselect() {
                changed.push(frame.id);
            }
        }
        changed
    }

    /// Deselect everything. Returns the ids whose state changed.
    pub fn deselect_all(&mut self) -> Vec<FrameId> {
        self.frames
            .iter_mut()
            .filter_map(|f| f.deselect().then_some(f.id))
            .collect()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&FrameState> {
        self.frames.iter().find(|f| f.is_selected)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<FrameId> {
        self.selected().map(|f| f.id)
    }

    /// The frame in content edit, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<FrameId> {
        self.frames
            .iter()
            .find(|f| f.mode == FrameMode::ContentEdit)
            .map(|f| f.id)
    }

    // --- Bulk ---

    /// Replace every frame, then restore the selection invariants: only the
    /// topmost selected frame stays selected, and unselected frames leave
    /// content edit.
    pub fn replace_all(&mut self, frames: Vec<FrameState>) {
        self.frames = frames;
        let mut seen_selected = false;
        for frame in self.frames.iter_mut().rev() {
            if frame.is_selected && !seen_selected {
                seen_selected = true;
            } else {
                frame.deselect();
            }
        }
    }

    /// Frames bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FrameState> {
        self.frames.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FrameState> {
        self.frames.iter_mut()
    }

    /// Frames top to bottom, the order hit-testing wants.
    pub fn iter_topmost_first(&self) -> impl Iterator<Item = &FrameState> {
        self.frames.iter().rev()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FrameState] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// =============================================================
// Document
// =============================================================

/// Frames plus page layout: everything undo/redo covers.
#[derive(Debug, Default)]
pub struct Document {
    pub frames: FrameStore,
    pages: PageLayoutSettings,
    grid: GridIndex,
}

impl Document {
    #[must_use]
    pub fn new(pages: PageLayoutSettings) -> Self {
        let mut pages = pages;
        pages.normalize();
        Self { frames: FrameStore::new(), pages, grid: GridIndex::new() }
    }

    #[must_use]
    pub fn pages(&self) -> &PageLayoutSettings {
        &self.pages
    }

    /// Mutate the page settings, then clamp them and invalidate the grid.
    pub fn update_pages<R>(&mut self, f: impl FnOnce(&mut PageLayoutSettings) -> R) -> R {
        let result = f(&mut self.pages);
        self.pages.normalize();
        self.grid.invalidate();
        result
    }

    /// Snap lines for the current page settings.
    pub fn grid_lines(&mut self) -> &GridLineSet {
        self.grid.lines_for(&self.pages)
    }

    #[must_use]
    pub fn grid_version(&self) -> u64 {
        self.grid.version()
    }

    /// Run `f` on frame `id` together with the current snap lines.
    pub fn with_frame_and_lines<R>(
        &mut self,
        id: &FrameId,
        f: impl FnOnce(&mut FrameState, &GridLineSet) -> R,
    ) -> Option<R> {
        let lines = self.grid.lines_for(&self.pages);
        let frame = self.frames.get_mut(id)?;
        Some(f(frame, lines))
    }
}

impl HistoryTarget for Document {
    fn capture(&self) -> Result<HistorySnapshot, CaptureError> {
        HistorySnapshot::capture(self.frames.as_slice(), &self.pages)
    }

    /// Destroy-all-then-recreate. The snapshot is validated first so a bad
    /// snapshot leaves the document untouched.
    fn replace_all(&mut self, snapshot: &HistorySnapshot) -> Result<(), RestoreError> {
        snapshot.validate()?;
        self.frames.replace_all(snapshot.frames.clone());
        self.pages = snapshot.pages.clone();
        self.pages.normalize();
        self.grid.invalidate();
        Ok(())
    }
}
