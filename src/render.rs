//! Rendering: builds a screen-space display list of the visible scene.
//!
//! This module receives read-only views of the frames, the page layout, and
//! the viewport and produces plain data. It does not mutate any editor state
//! and does not draw; the host paints the [`Scene`] with whatever backend it
//! has (DOM nodes, a 2D canvas, ...).
//!
//! Pages and frames outside [`Viewport::visible_world_bounds`] are culled.
//! The frame in content edit is always kept because its image may overhang
//! the visible area even when the frame box does not.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::doc::FrameStore;
use crate::frame::{Corner, FrameId, FrameMode, FrameState, Rect};
use crate::grid::cell_spans;
use crate::page::{PageGeometry, PageLayoutSettings};
use crate::viewport::{Point, Viewport, ViewportState};

/// Everything the host needs to paint one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: ViewportState,
    /// Inverse scale for handles and outlines so they keep their screen size.
    pub handle_scale: f64,
    pub pages: Vec<PageView>,
    /// Bottom to top.
    pub frames: Vec<FrameView>,
}

/// A visible page in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub index: usize,
    pub screen: Rect,
    /// Grid cells to draw. Empty when the page's grid is hidden.
    pub cells: Vec<Rect>,
}

/// A visible frame in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub id: FrameId,
    pub screen: Rect,
    /// Displayed image, clipped to `screen` by the host except in content edit.
    pub content: Option<Rect>,
    pub source: Option<String>,
    pub selected: bool,
    pub mode: FrameMode,
    /// Corner handles in [`Corner::ALL`] order: frame corners when selected,
    /// image corners in content edit, none otherwise.
    pub handles: Vec<Point>,
}

/// Build the display list for the current viewport.
#[must_use]
pub fn scene(frames: &FrameStore, pages: &PageLayoutSettings, viewport: &Viewport) -> Scene {
    let bounds = viewport.visible_world_bounds();
    let state = viewport.state();

    let pages = pages
        .pages()
        .into_iter()
        .filter(|p| bounds.intersects(p.x, p.y, p.width, p.height))
        .map(|p| page_view(&p, &state))
        .collect();

    let frames = frames
        .iter()
        .filter(|f| f.mode == FrameMode::ContentEdit || bounds.intersects(f.x, f.y, f.width, f.height))
        .map(|f| frame_view(f, &state))
        .collect();

    Scene { viewport: state, handle_scale: viewport.handle_scale(), pages, frames }
}

fn page_view(page: &PageGeometry, state: &ViewportState) -> PageView {
    let grid = page.grid;
    let cells = if grid.visible {
        let cols = cell_spans(page.x, page.width, grid.cols, grid.gap, grid.margin);
        let rows = cell_spans(page.y, page.height, grid.rows, grid.gap, grid.margin);
        rows.iter()
            .flat_map(|&(top, bottom)| {
                cols.iter().map(move |&(left, right)| Rect { x: left, y: top, width: right - left, height: bottom - top })
            })
            .map(|cell| to_screen(cell, state))
            .collect()
    } else {
        Vec::new()
    };
    PageView {
        index: page.index,
        screen: to_screen(Rect { x: page.x, y: page.y, width: page.width, height: page.height }, state),
        cells,
    }
}

fn frame_view(frame: &FrameState, state: &ViewportState) -> FrameView {
    let screen = to_screen(frame.rect(), state);
    let content = frame.content_world_rect().map(|r| to_screen(r, state));
    let handle_rect = match frame.mode {
        FrameMode::ContentEdit => content,
        FrameMode::Normal if frame.is_selected => Some(screen),
        FrameMode::Normal => None,
    };
    FrameView {
        id: frame.id,
        screen,
        content,
        source: frame.content.as_ref().map(|c| c.source.clone()),
        selected: frame.is_selected,
        mode: frame.mode,
        handles: handle_rect.map_or_else(Vec::new, |r| Corner::ALL.iter().map(|&c| r.corner(c)).collect()),
    }
}

fn to_screen(world: Rect, state: &ViewportState) -> Rect {
    let top_left = state.world_to_screen(Point::new(world.x, world.y));
    Rect { x: top_left.x, y: top_left.y, width: world.width * state.scale, height: world.height * state.scale }
}
