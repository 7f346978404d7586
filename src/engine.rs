//! Editor controller: routes host input to the viewport, frame gestures,
//! selection, pages, and history.
//!
//! `EditorCore` owns all editor state and never talks to the host directly.
//! Every entry point returns the [`Action`]s the host should react to
//! (re-render, move a DOM node, capture the pointer, ...), so the whole
//! controller can be driven and inspected from plain unit tests.
//!
//! Discrete operations capture a [`HistorySnapshot`] before they mutate and
//! commit it afterwards. Pointer gestures capture at pointer-down and commit
//! at pointer-up only if the frame actually changed.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::EditorConfig;
use crate::consts::{NUDGE_STEP, NUDGE_STEP_LARGE};
use crate::doc::{Document, FrameStore};
use crate::error::ErrorCode;
use crate::frame::{FrameId, FrameMode, FrameState, Size, batch_positions, media_frame_size};
use crate::gesture::{
    ActiveGesture, ContentPanGesture, ContentResizeGesture, DragGesture, FrameGesture, ResizeGesture, SnapContext,
};
use crate::hit::{HitPart, hit_test};
use crate::history::{History, HistorySnapshot, PendingCommit, capture_logged};
use crate::input::{Button, InputState, Key, Modifiers, PointerId, WheelDelta, exceeds_pan_threshold};
use crate::page::{PageLayoutSettings, PageOverride, ProjectSettingsUpdate};
use crate::snap::SnapResolver;
use crate::viewport::{Point, Viewport, ViewportState};

/// Cursor restored when a gesture ends.
pub const DEFAULT_CURSOR: &str = "default";

/// Cursor shown while panning the background.
pub const PAN_CURSOR: &str = "grabbing";

/// Effects returned from controller entry points for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FrameCreated(FrameState),
    FrameUpdated(FrameState),
    FrameDeleted { id: FrameId },
    /// Every frame was replaced (undo/redo); re-read the whole collection.
    FramesReplaced,
    /// Page or grid settings changed; re-read the page layout.
    PagesChanged,
    ViewportChanged(ViewportState),
    HistoryCommitted { label: String },
    CapturePointer(PointerId),
    ReleasePointer(PointerId),
    SetCursor(String),
    RenderNeeded,
}

/// An image handed over by the media library.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    /// Host-side image handle.
    pub source: String,
    /// Decoded pixel size.
    pub natural: Size,
}

impl MediaItem {
    #[must_use]
    pub fn new(source: impl Into<String>, natural: Size) -> Self {
        Self { source: source.into(), natural }
    }
}

/// Arrow-key burst in progress. `before` is `None` if the capture failed.
#[derive(Debug)]
struct NudgeBurst {
    before: Option<HistorySnapshot>,
}

/// Core editor state: document, viewport, snapping, history, and input.
pub struct EditorCore {
    pub doc: Document,
    pub viewport: Viewport,
    pub snap: SnapResolver,
    pub history: History,
    pub input: InputState,
    config: EditorConfig,
    nudge: Option<NudgeBurst>,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorCore {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            doc: Document::default(),
            viewport: Viewport::new(config.zoom_sensitivity),
            snap: SnapResolver::new(config.snap_enabled, config.snap_threshold_px),
            history: History::new(config.history_limit),
            input: InputState::Idle,
            config,
            nudge: None,
        }
    }

    /// Start from the given page layout instead of the defaults.
    #[must_use]
    pub fn with_pages(mut self, pages: PageLayoutSettings) -> Self {
        self.doc = Document::new(pages);
        self
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn frames(&self) -> &FrameStore {
        &self.doc.frames
    }

    #[must_use]
    pub fn frame(&self, id: &FrameId) -> Option<&FrameState> {
        self.doc.frames.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> Option<FrameId> {
        self.doc.frames.selected_id()
    }

    #[must_use]
    pub fn pages(&self) -> &PageLayoutSettings {
        self.doc.pages()
    }

    // =============================================================
    // Pointer input
    // =============================================================

    /// Pointer pressed at `screen` (container pixels).
    ///
    /// On the selected frame this starts a drag, resize, content pan, or
    /// content resize and captures the pointer. Anything else is held as a
    /// press that becomes a background pan once it travels past the threshold,
    /// or a click (select / deselect) if released first.
    pub fn pointer_down(&mut self, screen: Point, pointer_id: PointerId, button: Button) -> Vec<Action> {
        if !screen.is_finite() || !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        match button {
            Button::Secondary => Vec::new(),
            Button::Middle => {
                self.input = InputState::Pressed { pointer_id, button, start: screen, target: None, can_pan: true };
                Vec::new()
            }
            Button::Primary => self.primary_down(screen, pointer_id),
        }
    }

    fn primary_down(&mut self, screen: Point, pointer_id: PointerId) -> Vec<Action> {
        let scale = self.viewport.scale();
        let world = self.viewport.screen_to_world(screen);
        let hit = hit_test(world, &self.doc.frames, scale);

        let gesture = hit.and_then(|hit| {
            let frame = self.doc.frames.get(&hit.frame_id)?;
            match hit.part {
                HitPart::ResizeHandle(c) => ResizeGesture::begin(frame, c, screen, scale).map(FrameGesture::Resize),
                HitPart::ContentHandle(c) => {
                    ContentResizeGesture::begin(frame, c, screen, scale).map(FrameGesture::ContentResize)
                }
                HitPart::Body if frame.mode == FrameMode::ContentEdit => {
                    ContentPanGesture::begin(frame, screen, scale).map(FrameGesture::ContentPan)
                }
                HitPart::Body => DragGesture::begin(frame, screen, scale).map(FrameGesture::Drag),
            }
        });
        if let (Some(hit), Some(gesture)) = (hit, gesture) {
            return self.start_gesture(hit.frame_id, pointer_id, gesture);
        }

        let idle_selection = self.doc.frames.selected_id().is_none() && self.doc.frames.editing_id().is_none();
        self.input = InputState::Pressed {
            pointer_id,
            button: Button::Primary,
            start: screen,
            target: hit.map(|h| h.frame_id),
            can_pan: idle_selection,
        };
        Vec::new()
    }

    fn start_gesture(&mut self, frame_id: FrameId, pointer_id: PointerId, gesture: FrameGesture) -> Vec<Action> {
        let mut actions = self.close_nudge();
        let before = capture_logged(&self.doc, gesture.label());
        let cursor = gesture.cursor();
        tracing::debug!(frame = %frame_id, gesture = gesture.label(), "editor: gesture started");
        self.input = InputState::Frame(ActiveGesture { frame_id, pointer_id, gesture, before });
        actions.extend([Action::CapturePointer(pointer_id), Action::SetCursor(cursor.to_string())]);
        actions
    }

    /// Pointer moved. Events from pointers other than the tracked one, or at a
    /// non-finite position, are ignored.
    pub fn pointer_move(&mut self, screen: Point, pointer_id: PointerId) -> Vec<Action> {
        if !screen.is_finite() || self.input.pointer_id() != Some(pointer_id) {
            return Vec::new();
        }
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Pressed { start, can_pan, .. } => {
                if !can_pan || !exceeds_pan_threshold(start, screen) {
                    return Vec::new();
                }
                // The whole travel so far is applied, not just the part past the threshold.
                self.viewport.queue_pan(screen.x - start.x, screen.y - start.y);
                self.input = InputState::Panning { pointer_id, last: screen };
                vec![
                    Action::CapturePointer(pointer_id),
                    Action::SetCursor(PAN_CURSOR.to_string()),
                    Action::RenderNeeded,
                ]
            }
            InputState::Panning { ref mut last, .. } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.viewport.queue_pan(dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::Frame(ref active) => {
                let resolver = &self.snap;
                let content_threshold = self.config.content_snap_threshold;
                let updated = self.doc.with_frame_and_lines(&active.frame_id, |frame, lines| {
                    let snap = SnapContext { content_threshold, ..SnapContext::new(resolver, lines) };
                    active.gesture.update(frame, screen, &snap);
                    frame.clone()
                });
                match updated {
                    Some(frame) => vec![Action::FrameUpdated(frame), Action::RenderNeeded],
                    None => self.end_gesture(),
                }
            }
        }
    }

    /// Pointer released. A press that never became a pan is a click.
    pub fn pointer_up(&mut self, pointer_id: PointerId) -> Vec<Action> {
        if self.input.pointer_id() != Some(pointer_id) {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            InputState::Pressed { button: Button::Primary, target, .. } => match target {
                Some(id) => self.select_frame(&id),
                None => self.deselect_all(),
            },
            other => {
                self.input = other;
                self.end_gesture()
            }
        }
    }

    /// Pointer capture lost. Ends any gesture without treating it as a click;
    /// geometry stays where the last move left it.
    pub fn pointer_cancel(&mut self, pointer_id: PointerId) -> Vec<Action> {
        if self.input.pointer_id() != Some(pointer_id) {
            return Vec::new();
        }
        self.end_gesture()
    }

    /// Finish whatever the input state holds: release capture and commit a
    /// changed frame gesture.
    fn end_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Pressed { .. } => Vec::new(),
            InputState::Panning { pointer_id, .. } => {
                vec![Action::ReleasePointer(pointer_id), Action::SetCursor(DEFAULT_CURSOR.to_string())]
            }
            InputState::Frame(active) => {
                let frame_id = active.frame_id;
                let pointer_id = active.pointer_id;
                let pending = active.finish(self.doc.frames.get(&frame_id));
                let mut actions =
                    vec![Action::ReleasePointer(pointer_id), Action::SetCursor(DEFAULT_CURSOR.to_string())];
                if let Some(pending) = pending {
                    actions.extend(self.commit_pending(pending));
                }
                actions
            }
        }
    }

    /// End a running frame gesture, leaving background presses and pans alone.
    fn end_frame_gesture(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Frame(_)) {
            return self.end_gesture();
        }
        Vec::new()
    }

    fn gesture_frame(&self) -> Option<FrameId> {
        match &self.input {
            InputState::Frame(active) => Some(active.frame_id),
            _ => None,
        }
    }

    // =============================================================
    // Viewport
    // =============================================================

    /// Queue a wheel zoom anchored at `screen`; applied on the next [`tick`](Self::tick).
    pub fn wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if !screen.is_finite() || !delta.dy.is_finite() {
            return Vec::new();
        }
        self.viewport.queue_zoom(screen, delta.dy);
        vec![Action::RenderNeeded]
    }

    /// Apply coalesced pan and zoom input. Call once per rendering tick.
    pub fn tick(&mut self) -> Vec<Action> {
        if self.viewport.flush() {
            return self.viewport_changed();
        }
        Vec::new()
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport.set_container_size(width, height);
        self.viewport_changed()
    }

    /// Scale and centre the viewport on all pages.
    pub fn fit_to_pages(&mut self) -> Vec<Action> {
        self.viewport.fit_to_pages(self.doc.pages());
        self.viewport_changed()
    }

    pub fn center_viewport(&mut self) -> Vec<Action> {
        self.viewport.center();
        self.viewport_changed()
    }

    fn viewport_changed(&self) -> Vec<Action> {
        vec![Action::ViewportChanged(self.viewport.state()), Action::RenderNeeded]
    }

    // =============================================================
    // Selection and mode
    // =============================================================

    /// Select one frame, deselecting the rest.
    pub fn select_frame(&mut self, id: &FrameId) -> Vec<Action> {
        if !self.doc.frames.contains(id) {
            return Vec::new();
        }
        let mut actions = self.end_frame_gesture();
        let changed = self.doc.frames.select(id);
        actions.extend(self.frames_updated(&changed));
        actions
    }

    pub fn deselect_all(&mut self) -> Vec<Action> {
        let mut actions = self.end_frame_gesture();
        let changed = self.doc.frames.deselect_all();
        actions.extend(self.frames_updated(&changed));
        actions
    }

    /// Put the selected frame `id` into content edit.
    pub fn enter_content_edit(&mut self, id: &FrameId) -> Vec<Action> {
        let mut actions = self.end_frame_gesture();
        let Some(frame) = self.doc.frames.get_mut(id) else {
            return actions;
        };
        if frame.enter_content_edit() {
            actions.extend([Action::FrameUpdated(frame.clone()), Action::RenderNeeded]);
        }
        actions
    }

    /// Leave content edit, ending a content gesture in progress.
    pub fn exit_content_edit(&mut self) -> Vec<Action> {
        let Some(id) = self.doc.frames.editing_id() else {
            return Vec::new();
        };
        let mut actions = self.end_frame_gesture();
        if let Some(frame) = self.doc.frames.get_mut(&id) {
            if frame.exit_content_edit() {
                actions.extend([Action::FrameUpdated(frame.clone()), Action::RenderNeeded]);
            }
        }
        actions
    }

    fn frames_updated(&self, ids: &[FrameId]) -> Vec<Action> {
        let mut actions: Vec<Action> = ids
            .iter()
            .filter_map(|id| self.doc.frames.get(id))
            .map(|f| Action::FrameUpdated(f.clone()))
            .collect();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // =============================================================
    // Frames
    // =============================================================

    /// Remove a frame as one undoable step.
    pub fn delete_frame(&mut self, id: &FrameId) -> Vec<Action> {
        if !self.doc.frames.contains(id) {
            return Vec::new();
        }
        let mut actions = if self.gesture_frame() == Some(*id) { self.end_gesture() } else { Vec::new() };
        actions.extend(self.close_nudge());
        let before = capture_logged(&self.doc, "delete_frame");
        self.doc.frames.remove(id);
        actions.push(Action::FrameDeleted { id: *id });
        actions.extend(self.commit_opt(before, "delete_frame"));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Create a selected frame for a dropped image, centred on the drop point.
    pub fn add_frame_from_media(&mut self, screen: Point, item: MediaItem) -> Vec<Action> {
        if !item.natural.is_usable() {
            tracing::warn!(source = item.source.as_str(), "editor: dropped image has no usable size");
            return Vec::new();
        }
        if !screen.is_finite() {
            tracing::warn!(source = item.source.as_str(), "editor: dropped image at non-finite position");
            return Vec::new();
        }
        let mut actions = self.close_nudge();
        let before = capture_logged(&self.doc, "add_frame");
        let center = self.viewport.screen_to_world(screen);
        let frame = FrameState::from_media(center, item.natural, item.source);
        let id = frame.id;
        self.doc.frames.insert(frame.clone());

        actions.push(Action::FrameCreated(frame));
        actions.extend(self.select_frame(&id));
        actions.extend(self.commit_opt(before, "add_frame"));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Lay out several images in a grid below the world origin as one undoable step.
    ///
    /// Items without a usable size are skipped.
    pub fn add_frames_batch(&mut self, items: Vec<MediaItem>) -> Vec<Action> {
        let items: Vec<MediaItem> = items
            .into_iter()
            .filter(|item| {
                let usable = item.natural.is_usable();
                if !usable {
                    tracing::warn!(source = item.source.as_str(), "editor: skipping image without usable size");
                }
                usable
            })
            .collect();
        if items.is_empty() {
            return Vec::new();
        }

        let mut actions = self.close_nudge();
        let before = capture_logged(&self.doc, "add_images");
        let positions = batch_positions(items.len());
        for (item, pos) in items.into_iter().zip(positions) {
            let size = media_frame_size(item.natural);
            let mut frame = FrameState::new(pos.x, pos.y, size.width, size.height).with_source(item.source);
            frame.set_natural(item.natural);
            self.doc.frames.insert(frame.clone());
            actions.push(Action::FrameCreated(frame));
        }
        actions.extend(self.commit_opt(before, "add_images"));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The host decoded a frame's image. Runs the pending default fit, if any.
    ///
    /// Not a user action, so nothing is recorded in history.
    pub fn content_loaded(&mut self, id: &FrameId, natural_width: f64, natural_height: f64) -> Vec<Action> {
        let Some(frame) = self.doc.frames.get_mut(id) else {
            return Vec::new();
        };
        let previous = frame.clone();
        frame.set_natural(Size::new(natural_width, natural_height));
        if *frame == previous {
            return Vec::new();
        }
        vec![Action::FrameUpdated(frame.clone()), Action::RenderNeeded]
    }

    /// Replace a frame's image. Placement resets and refits once the new image decodes.
    pub fn swap_image(&mut self, id: &FrameId, source: impl Into<String>) -> Vec<Action> {
        if !self.doc.frames.contains(id) {
            return Vec::new();
        }
        let mut actions = if self.gesture_frame() == Some(*id) { self.end_gesture() } else { Vec::new() };
        actions.extend(self.close_nudge());
        let before = capture_logged(&self.doc, "swap_frame_image");
        let Some(frame) = self.doc.frames.get_mut(id) else {
            return actions;
        };
        frame.swap_source(source);
        actions.push(Action::FrameUpdated(frame.clone()));
        actions.extend(self.commit_opt(before, "swap_frame_image"));
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // Keyboard
    // =============================================================

    /// Shortcuts: undo, redo, delete, nudge, leave content edit.
    pub fn key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            if key.is_letter('z') && !modifiers.shift {
                return self.undo();
            }
            if key.is_letter('z') || key.is_letter('y') {
                return self.redo();
            }
            return Vec::new();
        }
        if key.is("Escape") {
            return self.exit_content_edit();
        }
        if key.is("Delete") || key.is("Backspace") {
            return match self.doc.frames.selected_id() {
                Some(id) => self.delete_frame(&id),
                None => Vec::new(),
            };
        }
        if let Some((dx, dy)) = key.arrow_direction() {
            let step = if modifiers.shift { NUDGE_STEP_LARGE } else { NUDGE_STEP };
            return self.nudge(dx * step, dy * step);
        }
        Vec::new()
    }

    /// Releasing an arrow key closes the nudge burst as one history entry.
    pub fn key_up(&mut self, key: &Key) -> Vec<Action> {
        if key.arrow_direction().is_none() {
            return Vec::new();
        }
        self.close_nudge()
    }

    /// Commit an open nudge burst. Runs before any other history entry is
    /// captured, so the burst keeps its place in the undo order.
    fn close_nudge(&mut self) -> Vec<Action> {
        match self.nudge.take().and_then(|burst| burst.before) {
            Some(before) => self.record(before, "nudge_frame"),
            None => Vec::new(),
        }
    }

    fn nudge(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        let Some(id) = self.doc.frames.selected_id() else {
            return Vec::new();
        };
        if self.gesture_frame().is_some() {
            return Vec::new();
        }
        if self.nudge.is_none() {
            self.nudge = Some(NudgeBurst { before: capture_logged(&self.doc, "nudge_frame") });
        }
        let Some(frame) = self.doc.frames.get_mut(&id) else {
            return Vec::new();
        };
        frame.translate(dx, dy);
        vec![Action::FrameUpdated(frame.clone()), Action::RenderNeeded]
    }

    // =============================================================
    // Pages
    // =============================================================

    /// Apply a project-wide page/grid settings change as one undoable step.
    pub fn update_settings(&mut self, update: &ProjectSettingsUpdate) -> Vec<Action> {
        self.change_pages("update_project_settings", |pages| pages.apply_update(update))
    }

    /// Merge an override into page `index` as one undoable step.
    pub fn update_page_settings(&mut self, index: usize, update: &PageOverride) -> Vec<Action> {
        if index >= self.doc.pages().count {
            return Vec::new();
        }
        self.change_pages("update_page_settings", |pages| pages.apply_page_override(index, update))
    }

    fn change_pages(&mut self, label: &'static str, f: impl FnOnce(&mut PageLayoutSettings)) -> Vec<Action> {
        let mut actions = self.close_nudge();
        let before = capture_logged(&self.doc, label);
        let old = self.doc.pages().clone();
        self.doc.update_pages(f);
        if *self.doc.pages() == old {
            return actions;
        }
        actions.push(Action::PagesChanged);
        actions.extend(self.commit_opt(before, label));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete page `index` and the frames centred on it; frames on later pages
    /// shift left by the page width plus the gap. The last page is never deleted.
    pub fn delete_page(&mut self, index: usize) -> Vec<Action> {
        let placed = self.doc.pages().pages();
        let Some(page) = placed.get(index).copied() else {
            return Vec::new();
        };
        if placed.len() <= 1 {
            return Vec::new();
        }

        let mut actions = self.end_frame_gesture();
        actions.extend(self.close_nudge());
        let before = capture_logged(&self.doc, "delete_page");
        let shift = page.width + self.doc.pages().gap;

        let removed = self.doc.frames.remove_where(|f| page.contains_x(f.center().x));
        actions.extend(removed.iter().map(|f| Action::FrameDeleted { id: f.id }));
        for frame in self.doc.frames.iter_mut() {
            if frame.center().x >= page.right() {
                frame.translate(-shift, 0.0);
                actions.push(Action::FrameUpdated(frame.clone()));
            }
        }
        self.doc.update_pages(|pages| pages.remove_page(index));
        tracing::debug!(index, removed = removed.len(), "editor: page deleted");

        actions.push(Action::PagesChanged);
        actions.extend(self.commit_opt(before, "delete_page"));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Move page `from` to position `to`. Frames travel with the page their
    /// centre lies on and keep their page-local x.
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Vec<Action> {
        let old = self.doc.pages().pages();
        if from == to || from >= old.len() || to >= old.len() {
            return Vec::new();
        }

        let mut actions = self.end_frame_gesture();
        actions.extend(self.close_nudge());
        let before = capture_logged(&self.doc, "reorder_pages");

        let placements: Vec<(FrameId, usize, f64)> = self
            .doc
            .frames
            .iter()
            .filter_map(|f| {
                let cx = f.center().x;
                old.iter().find(|p| p.contains_x(cx)).map(|p| (f.id, p.index, f.x - p.x))
            })
            .collect();

        self.doc.update_pages(|pages| pages.move_page(from, to));
        let new = self.doc.pages().pages();

        // order[new_index] = old_index
        let mut order: Vec<usize> = (0..old.len()).collect();
        let moved = order.remove(from);
        order.insert(to, moved);

        for (id, old_index, local_x) in placements {
            let Some(new_index) = order.iter().position(|&o| o == old_index) else {
                continue;
            };
            if let (Some(page), Some(frame)) = (new.get(new_index), self.doc.frames.get_mut(&id)) {
                frame.x = page.x + local_x;
                actions.push(Action::FrameUpdated(frame.clone()));
            }
        }
        tracing::debug!(from, to, "editor: pages reordered");

        actions.push(Action::PagesChanged);
        actions.extend(self.commit_opt(before, "reorder_pages"));
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // History
    // =============================================================

    /// Snapshot the document for a host-driven operation. `None` (logged) if
    /// the state cannot be captured.
    #[must_use]
    pub fn capture_snapshot(&self) -> Option<HistorySnapshot> {
        capture_logged(&self.doc, "host")
    }

    /// Record `snapshot` as the state before `label`. An open nudge burst is
    /// committed first.
    pub fn commit(&mut self, snapshot: HistorySnapshot, label: &str) -> Vec<Action> {
        let mut actions = self.close_nudge();
        actions.extend(self.record(snapshot, label));
        actions
    }

    fn record(&mut self, snapshot: HistorySnapshot, label: &str) -> Vec<Action> {
        if self.history.commit(snapshot, label) {
            return vec![Action::HistoryCommitted { label: label.to_string() }];
        }
        Vec::new()
    }

    fn commit_opt(&mut self, snapshot: Option<HistorySnapshot>, label: &str) -> Vec<Action> {
        match snapshot {
            Some(snapshot) => self.commit(snapshot, label),
            None => Vec::new(),
        }
    }

    fn commit_pending(&mut self, pending: PendingCommit) -> Vec<Action> {
        let label = pending.label;
        if self.history.commit_pending(pending) {
            return vec![Action::HistoryCommitted { label: label.to_string() }];
        }
        Vec::new()
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.step_history(false)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.step_history(true)
    }

    /// A running frame gesture or nudge burst is committed first, so it is
    /// what gets undone.
    fn step_history(&mut self, redo: bool) -> Vec<Action> {
        let mut actions = self.end_frame_gesture();
        actions.extend(self.close_nudge());
        let result = if redo { self.history.redo(&mut self.doc) } else { self.history.undo(&mut self.doc) };
        match result {
            Ok(Some(_)) => actions.extend([Action::FramesReplaced, Action::PagesChanged, Action::RenderNeeded]),
            Ok(None) => {}
            Err(e) => tracing::debug!(code = e.error_code(), redo, "editor: history step skipped"),
        }
        actions
    }
}
