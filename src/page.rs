//! Page layout settings: project defaults, per-page overrides, and world placement.
//!
//! The collage is a horizontal strip of pages. Each page has a size and a grid
//! of cells used as snap guides. The project carries defaults; a page may carry
//! a partial override that is overlaid on those defaults. This module is the
//! read side consumed by the grid index and the viewport, plus the small set of
//! mutations the settings owner applies (all of which clamp to the invariants
//! `count >= 1` and `cols, rows >= 1`).

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use serde::{Deserialize, Serialize};

/// Grid of snap cells drawn inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Number of columns, at least 1.
    pub cols: u32,
    /// Number of rows, at least 1.
    pub rows: u32,
    /// Gap between neighbouring cells in world units.
    pub gap: f64,
    /// Inset between the page edge and the outermost cells.
    pub margin: f64,
    /// Whether the grid is drawn. Snapping ignores this flag.
    pub visible: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { cols: 2, rows: 2, gap: 20.0, margin: 40.0, visible: true }
    }
}

/// Sparse grid update. Only present fields are applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl GridOverride {
    /// Overlay `self` on `base`.
    #[must_use]
    pub fn apply_to(&self, base: GridSettings) -> GridSettings {
        GridSettings {
            cols: self.cols.unwrap_or(base.cols).max(1),
            rows: self.rows.unwrap_or(base.rows).max(1),
            gap: self.gap.unwrap_or(base.gap).max(0.0),
            margin: self.margin.unwrap_or(base.margin).max(0.0),
            visible: self.visible.unwrap_or(base.visible),
        }
    }

    /// Merge `newer` on top of `self`; fields present in `newer` win.
    #[must_use]
    pub fn merged(&self, newer: &GridOverride) -> GridOverride {
        GridOverride {
            cols: newer.cols.or(self.cols),
            rows: newer.rows.or(self.rows),
            gap: newer.gap.or(self.gap),
            margin: newer.margin.or(self.margin),
            visible: newer.visible.or(self.visible),
        }
    }
}

/// Per-page partial override of the project settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub grid: GridOverride,
}

impl PageOverride {
    /// Merge `newer` on top of `self`.
    #[must_use]
    pub fn merged(&self, newer: &PageOverride) -> PageOverride {
        PageOverride {
            width: newer.width.or(self.width),
            height: newer.height.or(self.height),
            grid: self.grid.merged(&newer.grid),
        }
    }
}

/// Sparse update of the project-wide defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectSettingsUpdate {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub count: Option<usize>,
    pub gap: Option<f64>,
    pub grid: GridOverride,
}

/// Effective settings of one page after overlaying its override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSettings {
    pub width: f64,
    pub height: f64,
    pub grid: GridSettings,
}

/// A page placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub grid: GridSettings,
}

impl PageGeometry {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether a world x coordinate falls on this page's horizontal span.
    ///
    /// Half-open: the right edge belongs to the next page.
    #[must_use]
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x && x < self.right()
    }
}

/// Project page settings plus per-page overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayoutSettings {
    /// Default page width.
    pub width: f64,
    /// Default page height.
    pub height: f64,
    /// Number of pages, at least 1.
    pub count: usize,
    /// Horizontal gap between consecutive pages.
    pub gap: f64,
    /// Default grid for every page.
    pub grid: GridSettings,
    /// Optional override per page index. May be shorter than `count`.
    #[serde(default)]
    pub overrides: Vec<Option<PageOverride>>,
}

impl Default for PageLayoutSettings {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1350.0,
            count: 3,
            gap: 0.0,
            grid: GridSettings::default(),
            overrides: Vec::new(),
        }
    }
}

impl PageLayoutSettings {
    /// The override stored for page `index`, if any.
    #[must_use]
    pub fn page_override(&self, index: usize) -> Option<&PageOverride> {
        self.overrides.get(index).and_then(Option::as_ref)
    }

    /// Effective settings for page `index`: defaults overlaid by its override.
    #[must_use]
    pub fn page_settings(&self, index: usize) -> PageSettings {
        let defaults = PageSettings { width: self.width, height: self.height, grid: self.grid };
        let Some(ov) = self.page_override(index) else {
            return defaults;
        };
        PageSettings {
            width: ov.width.unwrap_or(defaults.width),
            height: ov.height.unwrap_or(defaults.height),
            grid: ov.grid.apply_to(defaults.grid),
        }
    }

    /// Place every page in world space.
    ///
    /// Page 0 is horizontally centred on the world origin; every page is
    /// vertically centred on `y = 0`; pages follow each other left to right
    /// separated by `gap`.
    #[must_use]
    pub fn pages(&self) -> Vec<PageGeometry> {
        let mut pages = Vec::with_capacity(self.count);
        let mut cursor_x = -(self.page_settings(0).width / 2.0);
        for index in 0..self.count {
            let settings = self.page_settings(index);
            pages.push(PageGeometry {
                index,
                x: cursor_x,
                y: -(settings.height / 2.0),
                width: settings.width,
                height: settings.height,
                grid: settings.grid,
            });
            cursor_x += settings.width + self.gap;
        }
        pages
    }

    /// Apply a sparse project-level update, clamping to the invariants.
    pub fn apply_update(&mut self, update: &ProjectSettingsUpdate) {
        if let Some(w) = update.width {
            self.width = w;
        }
        if let Some(h) = update.height {
            self.height = h;
        }
        if let Some(c) = update.count {
            self.count = c;
        }
        if let Some(g) = update.gap {
            self.gap = g;
        }
        self.grid = update.grid.apply_to(self.grid);
        self.normalize();
    }

    /// Merge a partial override into page `index`'s existing override.
    pub fn apply_page_override(&mut self, index: usize, update: &PageOverride) {
        if self.overrides.len() <= index {
            self.overrides.resize(index + 1, None);
        }
        let merged = self.overrides[index].unwrap_or_default().merged(update);
        self.overrides[index] = Some(merged);
        self.normalize();
    }

    /// Remove page `index` together with its override.
    ///
    /// Returns `false` (and changes nothing) for the last remaining page or an
    /// out-of-range index.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.count <= 1 || index >= self.count {
            return false;
        }
        if index < self.overrides.len() {
            self.overrides.remove(index);
        }
        self.count -= 1;
        true
    }

    /// Move page `from` to position `to`, carrying its override along.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.count || to >= self.count {
            return false;
        }
        if self.overrides.len() < self.count {
            self.overrides.resize(self.count, None);
        }
        let moved = self.overrides.remove(from);
        self.overrides.insert(to, moved);
        true
    }

    /// Clamp fields to their invariants.
    pub fn normalize(&mut self) {
        self.count = self.count.max(1);
        self.width = self.width.max(1.0);
        self.height = self.height.max(1.0);
        self.gap = self.gap.max(0.0);
        self.grid.cols = self.grid.cols.max(1);
        self.grid.rows = self.grid.rows.max(1);
        for ov in self.overrides.iter_mut().flatten() {
            if let Some(w) = ov.width.as_mut() {
                *w = w.max(1.0);
            }
            if let Some(h) = ov.height.as_mut() {
                *h = h.max(1.0);
            }
        }
    }
}
