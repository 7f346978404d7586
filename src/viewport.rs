//! Viewport transform: the single pan/zoom mapping between screen and world.
//!
//! `screen = world * scale + origin`. Pan moves `origin` 1:1 in screen pixels;
//! zoom changes `scale` while keeping the world point under the cursor fixed.
//! High-frequency wheel and pan input is accumulated with [`Viewport::queue_zoom`]
//! / [`Viewport::queue_pan`] and applied once per rendering tick by
//! [`Viewport::flush`].

// Exact comparisons detect "no change" after clamping.
#![allow(clippy::float_cmp)]

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{FIT_PADDING_PX, MAX_SCALE, MIN_SCALE, ZOOM_SENSITIVITY};
use crate::page::PageLayoutSettings;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned world-space bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl WorldBounds {
    /// Whether the rectangle `(x, y, w, h)` overlaps these bounds (touching counts).
    #[must_use]
    pub fn intersects(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        !(x + w < self.left || x > self.right || y + h < self.top || y > self.bottom)
    }
}

/// Pan/zoom state. `scale` is always within `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { scale: 1.0, origin_x: 0.0, origin_y: 0.0 }
    }
}

impl ViewportState {
    /// Convert a screen-space point (container pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin_x) / self.scale,
            y: (screen.y - self.origin_y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.origin_x,
            y: world.y * self.scale + self.origin_y,
        }
    }

    /// Convert a screen-space distance to a world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }
}

/// Callback invoked with the new visible bounds after every transform change.
pub type TransformObserver = Box<dyn FnMut(WorldBounds)>;

#[derive(Debug, Clone, Copy)]
struct PendingZoom {
    delta: f64,
    anchor: Point,
}

/// The viewport: transform state, container size, coalescing buffers, observer.
pub struct Viewport {
    state: ViewportState,
    container_width: f64,
    container_height: f64,
    zoom_sensitivity: f64,
    pending_zoom: Option<PendingZoom>,
    pending_pan: Option<Point>,
    observer: Option<TransformObserver>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZOOM_SENSITIVITY)
    }
}

impl Viewport {
    #[must_use]
    pub fn new(zoom_sensitivity: f64) -> Self {
        Self {
            state: ViewportState::default(),
            container_width: 0.0,
            container_height: 0.0,
            zoom_sensitivity,
            pending_zoom: None,
            pending_pan: None,
            observer: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Register the transform-changed observer, replacing any previous one.
    pub fn on_transform_change(&mut self, observer: TransformObserver) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Set the container (visible area) size in screen pixels.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container_width = width.max(0.0);
        self.container_height = height.max(0.0);
        self.notify();
    }

    /// Replace the whole transform, clamping the scale.
    pub fn set_state(&mut self, state: ViewportState) {
        self.state = ViewportState { scale: clamp_scale(state.scale), ..state };
        self.notify();
    }

    // --- Direct gestures ---

    /// Move the origin by a screen-space delta. Independent of scale.
    pub fn pan_by(&mut self, dx_screen: f64, dy_screen: f64) {
        if dx_screen == 0.0 && dy_screen == 0.0 {
            return;
        }
        self.state.origin_x += dx_screen;
        self.state.origin_y += dy_screen;
        self.notify();
    }

    /// Zoom by a raw wheel delta while keeping the world point under
    /// `(screen_x, screen_y)` at that screen position.
    ///
    /// Positive deltas zoom out. Returns `false` when the scale did not change
    /// (zero delta, or already at the clamp boundary).
    pub fn zoom_at_point(&mut self, screen_x: f64, screen_y: f64, raw_delta: f64) -> bool {
        let changed = self.apply_zoom(Point::new(screen_x, screen_y), raw_delta);
        if changed {
            self.notify();
        }
        changed
    }

    // --- Coalesced input ---

    /// Accumulate a wheel delta; the latest pointer position is the zoom anchor.
    pub fn queue_zoom(&mut self, screen: Point, raw_delta: f64) {
        let delta = self.pending_zoom.map_or(0.0, |p| p.delta) + raw_delta;
        self.pending_zoom = Some(PendingZoom { delta, anchor: screen });
    }

    /// Accumulate a screen-space pan delta.
    pub fn queue_pan(&mut self, dx_screen: f64, dy_screen: f64) {
        let prev = self.pending_pan.unwrap_or(Point::new(0.0, 0.0));
        self.pending_pan = Some(Point::new(prev.x + dx_screen, prev.y + dy_screen));
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_zoom.is_some() || self.pending_pan.is_some()
    }

    /// Apply accumulated pan then zoom exactly once. Call once per rendering tick.
    ///
    /// Returns `true` if the transform changed.
    pub fn flush(&mut self) -> bool {
        let mut changed = false;
        if let Some(pan) = self.pending_pan.take() {
            if pan.x != 0.0 || pan.y != 0.0 {
                self.state.origin_x += pan.x;
                self.state.origin_y += pan.y;
                changed = true;
            }
        }
        if let Some(zoom) = self.pending_zoom.take() {
            changed |= self.apply_zoom(zoom.anchor, zoom.delta);
        }
        if changed {
            self.notify();
        }
        changed
    }

    /// Drop any accumulated, not yet applied input.
    pub fn discard_pending(&mut self) {
        self.pending_zoom = None;
        self.pending_pan = None;
    }

    // --- Queries ---

    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.state.screen_to_world(screen)
    }

    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.state.world_to_screen(world)
    }

    /// World-space rectangle currently covered by the container.
    #[must_use]
    pub fn visible_world_bounds(&self) -> WorldBounds {
        let top_left = self.state.screen_to_world(Point::new(0.0, 0.0));
        let bottom_right = self
            .state
            .screen_to_world(Point::new(self.container_width, self.container_height));
        WorldBounds { left: top_left.x, right: bottom_right.x, top: top_left.y, bottom: bottom_right.y }
    }

    /// Inverse scale applied to on-screen handles so they keep a constant size.
    #[must_use]
    pub fn handle_scale(&self) -> f64 {
        1.0 / self.state.scale
    }

    // --- Framing ---

    /// Put the world origin at the container centre.
    pub fn center(&mut self) {
        self.state.origin_x = self.container_width / 2.0;
        self.state.origin_y = self.container_height / 2.0;
        self.notify();
    }

    /// Scale and centre so every page fits inside the padded container.
    /// Never zooms in past 1:1.
    pub fn fit_to_pages(&mut self, pages: &PageLayoutSettings) {
        let placed = pages.pages();
        let (Some(first), Some(last)) = (placed.first(), placed.last()) else {
            self.center();
            return;
        };
        let left = first.x;
        let right = last.right();
        let top = placed.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let bottom = placed.iter().map(|p| p.bottom()).fold(f64::NEG_INFINITY, f64::max);
        let total_w = right - left;
        let total_h = bottom - top;

        let avail_w = self.container_width - FIT_PADDING_PX * 2.0;
        let avail_h = self.container_height - FIT_PADDING_PX * 2.0;
        let scale = clamp_scale((avail_w / total_w).min(avail_h / total_h).min(1.0));

        let center_x = (left + right) / 2.0;
        let center_y = (top + bottom) / 2.0;
        self.state = ViewportState {
            scale,
            origin_x: self.container_width / 2.0 - center_x * scale,
            origin_y: self.container_height / 2.0 - center_y * scale,
        };
        self.notify();
    }

    fn apply_zoom(&mut self, anchor: Point, raw_delta: f64) -> bool {
        let new_scale = clamp_scale(self.state.scale - raw_delta * self.zoom_sensitivity);
        if new_scale == self.state.scale {
            return false;
        }
        let world = self.state.screen_to_world(anchor);
        self.state.scale = new_scale;
        self.state.origin_x = anchor.x - world.x * new_scale;
        self.state.origin_y = anchor.y - world.y * new_scale;
        true
    }

    fn notify(&mut self) {
        let bounds = self.visible_world_bounds();
        if let Some(observer) = self.observer.as_mut() {
            observer(bounds);
        }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
