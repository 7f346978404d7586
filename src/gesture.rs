//! Frame gestures: drag, resize, content pan, content resize.
//!
//! Each gesture is a plain struct created by `begin` (which checks the frame's
//! selection and mode and returns `None` when the gesture is not allowed),
//! driven by `update` with the current screen pointer position, and closed by
//! the controller, which asks `changed` whether a history entry is due.
//!
//! Every gesture records the viewport scale at `begin`; screen deltas are
//! divided by that scale so movement tracks the pointer at any zoom. Updates
//! are computed from the initial geometry and the total pointer delta, never
//! accumulated, so dropped move events cannot drift the result.

// Exact comparisons detect "geometry unchanged" at gesture end.
#![allow(clippy::float_cmp)]

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::{CONTENT_SNAP_THRESHOLD, MIN_FRAME_SIZE};
use crate::frame::{Corner, FrameId, FrameMode, FrameState, Rect, Size, cover_scale};
use crate::grid::GridLineSet;
use crate::history::{HistorySnapshot, PendingCommit};
use crate::input::PointerId;
use crate::snap::SnapResolver;
use crate::viewport::Point;

/// Snapping inputs for one pointer update.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    /// Grid snapping for frame drag and resize.
    pub resolver: &'a SnapResolver,
    pub lines: &'a GridLineSet,
    /// Frame-relative snap distance for content pan and resize, in frame-local units.
    pub content_threshold: f64,
}

impl<'a> SnapContext<'a> {
    #[must_use]
    pub fn new(resolver: &'a SnapResolver, lines: &'a GridLineSet) -> Self {
        Self { resolver, lines, content_threshold: CONTENT_SNAP_THRESHOLD }
    }
}

fn world_delta(start: Point, pointer: Point, scale: f64) -> (f64, f64) {
    ((pointer.x - start.x) / scale, (pointer.y - start.y) / scale)
}

// =============================================================
// Drag
// =============================================================

/// Move a selected frame, snapping the best corner onto the grid.
#[derive(Debug, Clone)]
pub struct DragGesture {
    start: Point,
    scale: f64,
    initial_x: f64,
    initial_y: f64,
}

impl DragGesture {
    #[must_use]
    pub fn begin(frame: &FrameState, start: Point, scale: f64) -> Option<Self> {
        if !frame.is_selected || frame.mode != FrameMode::Normal {
            return None;
        }
        Some(Self { start, scale, initial_x: frame.x, initial_y: frame.y })
    }

    pub fn update(&self, frame: &mut FrameState, pointer: Point, snap: &SnapContext<'_>) {
        let (dx, dy) = world_delta(self.start, pointer, self.scale);
        let x = self.initial_x + dx;
        let y = self.initial_y + dy;
        let offset = snap
            .resolver
            .snap_translation(snap.lines, x, y, frame.width, frame.height, self.scale);
        frame.x = x + offset.dx;
        frame.y = y + offset.dy;
    }

    #[must_use]
    pub fn changed(&self, frame: &FrameState) -> bool {
        frame.x != self.initial_x || frame.y != self.initial_y
    }
}

// =============================================================
// Resize
// =============================================================

/// Resize a selected frame from one corner, holding the opposite corner fixed.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    corner: Corner,
    start: Point,
    scale: f64,
    initial: Rect,
    anchor: Point,
    /// Image centre minus frame centre at begin, frame-local. `None` without decoded content.
    content_offset: Option<Point>,
}

impl ResizeGesture {
    #[must_use]
    pub fn begin(frame: &FrameState, corner: Corner, start: Point, scale: f64) -> Option<Self> {
        if !frame.is_selected || frame.mode != FrameMode::Normal {
            return None;
        }
        let initial = frame.rect();
        let content_offset = frame.content_rect().map(|c| {
            let img = c.center();
            Point::new(img.x - initial.width / 2.0, img.y - initial.height / 2.0)
        });
        Some(Self {
            corner,
            start,
            scale,
            initial,
            anchor: initial.corner(corner.opposite()),
            content_offset,
        })
    }

    #[must_use]
    pub fn corner(&self) -> Corner {
        self.corner
    }

    pub fn update(&self, frame: &mut FrameState, pointer: Point, snap: &SnapContext<'_>) {
        let (dx, dy) = world_delta(self.start, pointer, self.scale);
        let moving = self.initial.corner(self.corner);
        let moving_x = snap.resolver.snap_axis(&snap.lines.x_lines, moving.x + dx, self.scale);
        let moving_y = snap.resolver.snap_axis(&snap.lines.y_lines, moving.y + dy, self.scale);

        let (x, width) = if self.corner.is_west() {
            let w = (self.anchor.x - moving_x).max(MIN_FRAME_SIZE);
            (self.anchor.x - w, w)
        } else {
            (self.anchor.x, (moving_x - self.anchor.x).max(MIN_FRAME_SIZE))
        };
        let (y, height) = if self.corner.is_north() {
            let h = (self.anchor.y - moving_y).max(MIN_FRAME_SIZE);
            (self.anchor.y - h, h)
        } else {
            (self.anchor.y, (moving_y - self.anchor.y).max(MIN_FRAME_SIZE))
        };

        frame.x = x;
        frame.y = y;
        frame.width = width;
        frame.height = height;

        if let (Some(natural), Some(offset)) = (frame.natural(), self.content_offset) {
            refit_content(frame, natural, offset, self.initial);
        }
    }

    #[must_use]
    pub fn changed(&self, frame: &FrameState) -> bool {
        frame.rect() != self.initial
    }
}

/// Re-cover the frame and keep the image centre at the same relative offset.
fn refit_content(frame: &mut FrameState, natural: Size, offset: Point, initial: Rect) {
    let scale = cover_scale(natural, frame.width, frame.height);
    let off_x = offset.x * (frame.width / initial.width);
    let off_y = offset.y * (frame.height / initial.height);
    frame.content_scale = scale;
    frame.content_x = frame.width / 2.0 + off_x - natural.width * scale / 2.0;
    frame.content_y = frame.height / 2.0 + off_y - natural.height * scale / 2.0;
}

// =============================================================
// Content pan
// =============================================================

/// Move the image inside a frame in content edit.
#[derive(Debug, Clone)]
pub struct ContentPanGesture {
    start: Point,
    scale: f64,
    initial_x: f64,
    initial_y: f64,
}

impl ContentPanGesture {
    /// Requires content edit and a decoded image.
    #[must_use]
    pub fn begin(frame: &FrameState, start: Point, scale: f64) -> Option<Self> {
        if frame.mode != FrameMode::ContentEdit || frame.natural().is_none() {
            return None;
        }
        Some(Self { start, scale, initial_x: frame.content_x, initial_y: frame.content_y })
    }

    pub fn update(&self, frame: &mut FrameState, pointer: Point, snap: &SnapContext<'_>) {
        let Some(size) = frame.content_size() else {
            return;
        };
        let (dx, dy) = world_delta(self.start, pointer, self.scale);
        let t = snap.content_threshold;
        frame.content_x = snap_content_axis(self.initial_x + dx, size.width, frame.width, t);
        frame.content_y = snap_content_axis(self.initial_y + dy, size.height, frame.height, t);
    }

    #[must_use]
    pub fn changed(&self, frame: &FrameState) -> bool {
        frame.content_x != self.initial_x || frame.content_y != self.initial_y
    }
}

/// Snap one axis of the image against the frame's own edges and centre.
///
/// Checked in order: near edges, far edges, centres, image near edge on the
/// frame's far edge, image far edge on the frame's near edge. The first match
/// within `threshold` wins.
#[must_use]
pub fn snap_content_axis(pos: f64, size: f64, frame_len: f64, threshold: f64) -> f64 {
    if pos.abs() < threshold {
        0.0
    } else if (pos + size - frame_len).abs() < threshold {
        frame_len - size
    } else if (pos + size / 2.0 - frame_len / 2.0).abs() < threshold {
        frame_len / 2.0 - size / 2.0
    } else if (pos - frame_len).abs() < threshold {
        frame_len
    } else if (pos + size).abs() < threshold {
        -size
    } else {
        pos
    }
}

// =============================================================
// Content resize
// =============================================================

/// Scale the image from one content corner, aspect locked to the natural size.
#[derive(Debug, Clone)]
pub struct ContentResizeGesture {
    corner: Corner,
    start: Point,
    scale: f64,
    initial: Rect,
    initial_scale: f64,
    natural: Size,
    anchor: Point,
}

impl ContentResizeGesture {
    /// Requires content edit and a decoded image.
    #[must_use]
    pub fn begin(frame: &FrameState, corner: Corner, start: Point, scale: f64) -> Option<Self> {
        if frame.mode != FrameMode::ContentEdit {
            return None;
        }
        let natural = frame.natural()?;
        let initial = frame.content_rect()?;
        Some(Self {
            corner,
            start,
            scale,
            initial,
            initial_scale: frame.content_scale,
            natural,
            anchor: initial.corner(corner.opposite()),
        })
    }

    #[must_use]
    pub fn corner(&self) -> Corner {
        self.corner
    }

    /// Only the horizontal pointer delta drives the size; height follows the aspect.
    pub fn update(&self, frame: &mut FrameState, pointer: Point, snap: &SnapContext<'_>) {
        let (dx, _) = world_delta(self.start, pointer, self.scale);
        let aspect = self.natural.aspect();
        let width = if self.corner.is_west() {
            (self.initial.width - dx).max(MIN_FRAME_SIZE)
        } else {
            (self.initial.width + dx).max(MIN_FRAME_SIZE)
        };
        let proposed = self.placed(width, width / aspect);

        let scale = self
            .snapped_scale(proposed, frame.width, frame.height, snap.content_threshold)
            .unwrap_or(width / self.natural.width);
        let placed = self.placed(self.natural.width * scale, self.natural.height * scale);

        frame.content_scale = scale;
        frame.content_x = placed.x;
        frame.content_y = placed.y;
    }

    #[must_use]
    pub fn changed(&self, frame: &FrameState) -> bool {
        frame.content_x != self.initial.x
            || frame.content_y != self.initial.y
            || frame.content_scale != self.initial_scale
    }

    /// The content rectangle of the given size with the anchor corner fixed.
    fn placed(&self, width: f64, height: f64) -> Rect {
        let x = if self.corner.is_west() { self.anchor.x - width } else { self.anchor.x };
        let y = if self.corner.is_north() { self.anchor.y - height } else { self.anchor.y };
        Rect { x, y, width, height }
    }

    /// Scale that puts the dragged edge flush with the frame, if one is close enough.
    ///
    /// The horizontal edge is considered first; the vertical edge replaces it
    /// only when strictly closer. A snap that would shrink the image below the
    /// minimum size is skipped.
    fn snapped_scale(&self, proposed: Rect, frame_w: f64, frame_h: f64, threshold: f64) -> Option<f64> {
        let (dist_x, snapped_w) = if self.corner.is_west() {
            (proposed.x.abs(), self.anchor.x)
        } else {
            ((proposed.x + proposed.width - frame_w).abs(), frame_w - self.anchor.x)
        };
        let (dist_y, snapped_h) = if self.corner.is_north() {
            (proposed.y.abs(), self.anchor.y)
        } else {
            ((proposed.y + proposed.height - frame_h).abs(), frame_h - self.anchor.y)
        };

        let mut best: Option<(f64, f64)> = None;
        if dist_x < threshold && snapped_w >= MIN_FRAME_SIZE {
            best = Some((dist_x, snapped_w / self.natural.width));
        }
        if dist_y < threshold && snapped_h >= MIN_FRAME_SIZE && best.is_none_or(|(d, _)| dist_y < d) {
            best = Some((dist_y, snapped_h / self.natural.height));
        }
        best.map(|(_, scale)| scale)
    }
}

// =============================================================
// Dispatch
// =============================================================

/// One of the four frame gestures.
#[derive(Debug, Clone)]
pub enum FrameGesture {
    Drag(DragGesture),
    Resize(ResizeGesture),
    ContentPan(ContentPanGesture),
    ContentResize(ContentResizeGesture),
}

impl FrameGesture {
    pub fn update(&self, frame: &mut FrameState, pointer: Point, snap: &SnapContext<'_>) {
        match self {
            Self::Drag(g) => g.update(frame, pointer, snap),
            Self::Resize(g) => g.update(frame, pointer, snap),
            Self::ContentPan(g) => g.update(frame, pointer, snap),
            Self::ContentResize(g) => g.update(frame, pointer, snap),
        }
    }

    #[must_use]
    pub fn changed(&self, frame: &FrameState) -> bool {
        match self {
            Self::Drag(g) => g.changed(frame),
            Self::Resize(g) => g.changed(frame),
            Self::ContentPan(g) => g.changed(frame),
            Self::ContentResize(g) => g.changed(frame),
        }
    }

    /// History label committed when the gesture changed something.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Drag(_) => "move_frame",
            Self::Resize(_) => "resize_frame",
            Self::ContentPan(_) => "pan_content",
            Self::ContentResize(_) => "resize_content",
        }
    }

    /// Cursor shown while the gesture runs.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match self {
            Self::Drag(_) | Self::ContentPan(_) => "grabbing",
            Self::Resize(g) => g.corner().cursor(),
            Self::ContentResize(g) => g.corner().cursor(),
        }
    }
}

/// A running frame gesture with its captured pointer and pre-gesture snapshot.
#[derive(Debug, Clone)]
pub struct ActiveGesture {
    pub frame_id: FrameId,
    pub pointer_id: PointerId,
    pub gesture: FrameGesture,
    /// State before the first mutation. `None` if capture failed.
    pub before: Option<HistorySnapshot>,
}

impl ActiveGesture {
    /// Close the gesture. Yields the pre-gesture snapshot under the gesture's
    /// label when `frame` changed; a missing frame or snapshot yields nothing.
    #[must_use]
    pub fn finish(self, frame: Option<&FrameState>) -> Option<PendingCommit> {
        let frame = frame?;
        if !self.gesture.changed(frame) {
            return None;
        }
        let snapshot = self.before?;
        Some(PendingCommit { snapshot, label: self.gesture.label() })
    }
}
