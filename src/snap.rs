//! Snap resolver: pulls world coordinates onto nearby grid lines.
//!
//! The resolver holds only its two knobs (`enabled`, `threshold`). Line sets
//! come from the [`crate::grid::GridIndex`] and are passed in per call. The
//! threshold is a screen distance; every query converts it to world units with
//! the caller's current viewport scale.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::SNAP_THRESHOLD_PX;
use crate::grid::GridLineSet;

/// Result of snapping a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedPoint {
    pub x: f64,
    pub y: f64,
    /// Whether either axis moved onto a line.
    pub snapped: bool,
}

/// Result of snapping both corners of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub snapped: bool,
}

/// Per-axis offset to add to a whole rectangle so one of its corners lands on a line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapOffset {
    pub dx: f64,
    pub dy: f64,
}

/// Grid snapping configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResolver {
    enabled: bool,
    threshold: f64,
}

impl Default for SnapResolver {
    fn default() -> Self {
        Self { enabled: true, threshold: SNAP_THRESHOLD_PX }
    }
}

impl SnapResolver {
    #[must_use]
    pub fn new(enabled: bool, threshold: f64) -> Self {
        let mut resolver = Self { enabled, ..Self::default() };
        resolver.set_threshold(threshold);
        resolver
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Snap distance in screen pixels.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Set the snap distance. Non-positive or non-finite values are ignored.
    pub fn set_threshold(&mut self, threshold: f64) {
        if threshold.is_finite() && threshold > 0.0 {
            self.threshold = threshold;
        } else {
            tracing::warn!(threshold, "snap: ignoring invalid threshold");
        }
    }

    /// The threshold converted to world units at `scale`.
    #[must_use]
    pub fn threshold_world(&self, scale: f64) -> f64 {
        self.threshold / scale
    }

    /// Snap each axis of `(x, y)` independently to its nearest line.
    #[must_use]
    pub fn snap_point(&self, lines: &GridLineSet, x: f64, y: f64, scale: f64) -> SnappedPoint {
        if !self.enabled {
            return SnappedPoint { x, y, snapped: false };
        }
        let limit = self.threshold_world(scale);
        let sx = nearest_line(&lines.x_lines, x, limit);
        let sy = nearest_line(&lines.y_lines, y, limit);
        SnappedPoint {
            x: sx.unwrap_or(x),
            y: sy.unwrap_or(y),
            snapped: sx.is_some() || sy.is_some(),
        }
    }

    /// Snap a single coordinate on one axis. Used for the moving corner of a resize.
    #[must_use]
    pub fn snap_axis(&self, axis_lines: &[f64], coord: f64, scale: f64) -> f64 {
        if !self.enabled {
            return coord;
        }
        nearest_line(axis_lines, coord, self.threshold_world(scale)).unwrap_or(coord)
    }

    /// Snap the top-left and bottom-right corners independently.
    ///
    /// Width and height are rebuilt from the snapped corners, so the size can
    /// change as well as the position.
    #[must_use]
    pub fn snap_rect(&self, lines: &GridLineSet, x: f64, y: f64, width: f64, height: f64, scale: f64) -> SnappedRect {
        if !self.enabled {
            return SnappedRect { x, y, width, height, snapped: false };
        }
        let top_left = self.snap_point(lines, x, y, scale);
        let bottom_right = self.snap_point(lines, x + width, y + height, scale);
        SnappedRect {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x - top_left.x,
            height: bottom_right.y - top_left.y,
            snapped: top_left.snapped || bottom_right.snapped,
        }
    }

    /// Best translation per axis over all four corners of a rectangle.
    ///
    /// Corners are scanned top-left, top-right, bottom-left, bottom-right; on
    /// each axis the single closest corner/line pair wins and the earlier pair
    /// keeps an exact tie. The size never changes.
    #[must_use]
    pub fn snap_translation(&self, lines: &GridLineSet, x: f64, y: f64, width: f64, height: f64, scale: f64) -> SnapOffset {
        if !self.enabled {
            return SnapOffset::default();
        }
        let limit = self.threshold_world(scale);
        let xs = [x, x + width, x, x + width];
        let ys = [y, y, y + height, y + height];
        SnapOffset {
            dx: best_offset(&lines.x_lines, &xs, limit),
            dy: best_offset(&lines.y_lines, &ys, limit),
        }
    }
}

/// The line closest to `coord` with distance strictly below `limit`.
///
/// Lines are scanned in order; a later line must be strictly closer to win,
/// so the smallest coordinate keeps an exact tie.
#[must_use]
pub fn nearest_line(lines: &[f64], coord: f64, limit: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &line in lines {
        let dist = (coord - line).abs();
        if dist < limit && best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, line));
        }
    }
    best.map(|(_, line)| line)
}

fn best_offset(lines: &[f64], coords: &[f64], limit: f64) -> f64 {
    let mut best: Option<(f64, f64)> = None;
    for &coord in coords {
        for &line in lines {
            let dist = (coord - line).abs();
            if dist < limit && best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, line - coord));
            }
        }
    }
    best.map_or(0.0, |(_, offset)| offset)
}
