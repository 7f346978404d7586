//! Shared numeric constants for the collage engine.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed viewport scale.
pub const MAX_SCALE: f64 = 5.0;

/// Scale change per unit of raw wheel delta.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

/// Screen distance a background drag must travel before it becomes a pan.
pub const PAN_START_THRESHOLD_PX: f64 = 3.0;

/// Padding kept around the pages when fitting them into the container.
pub const FIT_PADDING_PX: f64 = 100.0;

// ── Snapping ────────────────────────────────────────────────────

/// Default grid snap distance in screen pixels.
pub const SNAP_THRESHOLD_PX: f64 = 10.0;

/// Frame-relative snap distance for content pan/resize, in frame-local units.
///
/// Unlike [`SNAP_THRESHOLD_PX`] this is not divided by the viewport scale.
pub const CONTENT_SNAP_THRESHOLD: f64 = 10.0;

// ── Frames ──────────────────────────────────────────────────────

/// Minimum frame (and content) edge length in world units.
pub const MIN_FRAME_SIZE: f64 = 10.0;

/// Long-side length of a frame created from a dropped image.
pub const NEW_FRAME_BASE_SIZE: f64 = 300.0;

/// Spacing between frames laid out from a batch of images.
pub const BATCH_SPACING: f64 = 50.0;

/// Keyboard nudge step in world units.
pub const NUDGE_STEP: f64 = 1.0;

/// Keyboard nudge step with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for corner handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── History ─────────────────────────────────────────────────────

/// Default number of undo entries retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
