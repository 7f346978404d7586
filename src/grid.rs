//! Grid index: snap-candidate lines derived from page and grid-cell layout.
//!
//! The line set is rebuilt lazily after [`GridIndex::invalidate`] and reused
//! until the next invalidation. The settings owner must invalidate on every
//! page/grid mutation; the index never compares against live settings itself.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::page::{PageGeometry, PageLayoutSettings};

/// Sorted, deduplicated world-space snap lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLineSet {
    /// Vertical lines (x coordinates), ascending.
    pub x_lines: Vec<f64>,
    /// Horizontal lines (y coordinates), ascending.
    pub y_lines: Vec<f64>,
}

impl GridLineSet {
    /// Build the line set for a list of placed pages.
    #[must_use]
    pub fn from_pages(pages: &[PageGeometry]) -> Self {
        let mut x_lines = Vec::new();
        let mut y_lines = Vec::new();
        for page in pages {
            push_axis_lines(&mut x_lines, page.x, page.width, page.grid.cols, page.grid.gap, page.grid.margin);
            push_axis_lines(&mut y_lines, page.y, page.height, page.grid.rows, page.grid.gap, page.grid.margin);
        }
        sort_dedup(&mut x_lines);
        sort_dedup(&mut y_lines);
        Self { x_lines, y_lines }
    }
}

/// Page edges plus the near and far edge of each of `cells` cells along one axis.
fn push_axis_lines(out: &mut Vec<f64>, start: f64, length: f64, cells: u32, gap: f64, margin: f64) {
    out.push(start);
    for (near, far) in cell_spans(start, length, cells, gap, margin) {
        out.push(near);
        out.push(far);
    }
    out.push(start + length);
}

/// Near and far edge of each grid cell along one axis of a page.
///
/// `cells` below 1 is treated as 1.
#[must_use]
pub fn cell_spans(start: f64, length: f64, cells: u32, gap: f64, margin: f64) -> Vec<(f64, f64)> {
    let n = f64::from(cells.max(1));
    let cell = (length - margin * 2.0 - gap * (n - 1.0)) / n;
    (0..cells.max(1))
        .map(|i| {
            let near = start + margin + f64::from(i) * (cell + gap);
            (near, near + cell)
        })
        .collect()
}

fn sort_dedup(lines: &mut Vec<f64>) {
    lines.retain(|v| v.is_finite());
    lines.sort_by(f64::total_cmp);
    lines.dedup_by(|a, b| a.total_cmp(b).is_eq());
}

/// Version-keyed cache of the current [`GridLineSet`].
#[derive(Debug, Default)]
pub struct GridIndex {
    version: u64,
    cached: Option<(u64, GridLineSet)>,
}

impl GridIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached line set. Call on every page/grid settings mutation.
    pub fn invalidate(&mut self) {
        self.version += 1;
        self.cached = None;
    }

    /// Current cache version. Increases by one per invalidation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a line set for the current version is cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(&self.cached, Some((v, _)) if *v == self.version)
    }

    /// Lines for `settings`, rebuilt only if the version moved since the last call.
    pub fn lines_for(&mut self, settings: &PageLayoutSettings) -> &GridLineSet {
        if !self.is_cached() {
            self.cached = None;
        }
        let version = self.version;
        let (_, lines) = self.cached.get_or_insert_with(|| {
            let lines = GridLineSet::from_pages(&settings.pages());
            tracing::debug!(
                version,
                x_lines = lines.x_lines.len(),
                y_lines = lines.y_lines.len(),
                "grid: rebuilt snap lines"
            );
            (version, lines)
        });
        lines
    }
}
