#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::doc::FrameStore;
use crate::frame::{Corner, FrameId, FrameMode, FrameState, Rect};
use crate::viewport::Point;

/// Which part of a frame was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// Frame corner handle of the selected frame.
    ResizeHandle(Corner),
    /// Image corner handle of the frame in content edit.
    ContentHandle(Corner),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub frame_id: FrameId,
    pub part: HitPart,
}

/// Test which frame (if any) is under `world_pt`, checking the selected
/// frame's handles first and then frame bodies from the top down.
///
/// Handles are circles of [`HANDLE_RADIUS_PX`] screen pixels, so their world
/// radius shrinks as `scale` grows.
#[must_use]
pub fn hit_test(world_pt: Point, frames: &FrameStore, scale: f64) -> Option<Hit> {
    let radius = HANDLE_RADIUS_PX / scale;
    if let Some(hit) = frames.selected().and_then(|f| handle_hit(world_pt, f, radius)) {
        return Some(hit);
    }
    frames
        .iter_topmost_first()
        .find(|f| f.rect().contains(world_pt))
        .map(|f| Hit { frame_id: f.id, part: HitPart::Body })
}

fn handle_hit(world_pt: Point, frame: &FrameState, radius: f64) -> Option<Hit> {
    let (rect, part): (Rect, fn(Corner) -> HitPart) = match frame.mode {
        FrameMode::Normal => (frame.rect(), HitPart::ResizeHandle),
        FrameMode::ContentEdit => (frame.content_world_rect()?, HitPart::ContentHandle),
    };
    Corner::ALL
        .into_iter()
        .find(|&c| {
            let p = rect.corner(c);
            (world_pt.x - p.x).hypot(world_pt.y - p.y) <= radius
        })
        .map(|c| Hit { frame_id: frame.id, part: part(c) })
}
