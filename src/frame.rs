//! Frame model: a world-space rectangle holding an independently placed image.
//!
//! Geometry lives in three nested spaces. The frame rectangle (`x`, `y`,
//! `width`, `height`) is in world units. The content offset (`content_x`,
//! `content_y`) is frame-local: the image's top-left corner relative to the
//! frame's top-left. The image is drawn at `natural * content_scale`, so a
//! content-space point `p` lands at frame-local `content + p * content_scale`.
//!
//! Pointer gestures that mutate a frame live in [`crate::gesture`]; this module
//! holds the state, the cover-fit math, and the constructors used when frames
//! are created from media.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{BATCH_SPACING, NEW_FRAME_BASE_SIZE};
use crate::viewport::Point;

/// Unique identifier for a frame.
pub type FrameId = Uuid;

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Whether both sides are finite and positive.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    #[must_use]
    pub fn corner(&self, corner: Corner) -> Point {
        let x = if corner.is_west() { self.x } else { self.x + self.width };
        let y = if corner.is_north() { self.y } else { self.y + self.height };
        Point::new(x, y)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One of the four resize corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    /// All corners in hit-test priority order.
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    /// The corner held fixed while this one is dragged.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Nw => Self::Se,
            Self::Ne => Self::Sw,
            Self::Sw => Self::Ne,
            Self::Se => Self::Nw,
        }
    }

    #[must_use]
    pub fn is_west(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    #[must_use]
    pub fn is_north(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }

    /// CSS resize cursor for this corner.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw => "nw-resize",
            Self::Ne => "ne-resize",
            Self::Sw => "sw-resize",
            Self::Se => "se-resize",
        }
    }
}

/// Interaction mode of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    /// Frame handles active; drag and resize move the frame.
    #[default]
    Normal,
    /// Content handles active; drag and resize move the image inside the frame.
    ContentEdit,
}

/// Reference to a frame's image. Pixel data is owned by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRef {
    /// Host-side image handle (object URL, asset key, ...).
    pub source: String,
    /// Natural pixel size, known once the host has decoded the image.
    pub natural: Option<Size>,
}

/// Geometry and content placement of one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    pub id: FrameId,
    /// Left edge in world units.
    pub x: f64,
    /// Top edge in world units.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Image top-left, frame-local.
    pub content_x: f64,
    pub content_y: f64,
    /// Image pixels to frame-local units.
    pub content_scale: f64,
    pub is_selected: bool,
    pub mode: FrameMode,
    pub content: Option<ContentRef>,
    /// Apply the default cover fit once the image decodes.
    #[serde(default)]
    pub fit_pending: bool,
}

impl FrameState {
    /// An empty, unselected frame.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            content_x: 0.0,
            content_y: 0.0,
            content_scale: 1.0,
            is_selected: false,
            mode: FrameMode::Normal,
            content: None,
            fit_pending: false,
        }
    }

    /// Attach an image that still has to be decoded. The default fit runs on decode.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.content = Some(ContentRef { source: source.into(), natural: None });
        self.fit_pending = true;
        self
    }

    /// A frame sized for an image whose natural size is already known,
    /// centred on `center` and cover-fitted.
    #[must_use]
    pub fn from_media(center: Point, natural: Size, source: impl Into<String>) -> Self {
        let size = media_frame_size(natural);
        let mut frame = Self::new(center.x - size.width / 2.0, center.y - size.height / 2.0, size.width, size.height)
            .with_source(source);
        frame.set_natural(natural);
        frame
    }

    // --- Geometry ---

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Natural image size, if the image has been decoded.
    #[must_use]
    pub fn natural(&self) -> Option<Size> {
        self.content.as_ref().and_then(|c| c.natural).filter(Size::is_usable)
    }

    /// Displayed image size in frame-local units.
    #[must_use]
    pub fn content_size(&self) -> Option<Size> {
        self.natural()
            .map(|n| Size::new(n.width * self.content_scale, n.height * self.content_scale))
    }

    /// Displayed image rectangle, frame-local.
    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.content_size().map(|s| Rect {
            x: self.content_x,
            y: self.content_y,
            width: s.width,
            height: s.height,
        })
    }

    /// Displayed image rectangle in world space.
    #[must_use]
    pub fn content_world_rect(&self) -> Option<Rect> {
        self.content_rect().map(|r| Rect { x: self.x + r.x, y: self.y + r.y, ..r })
    }

    /// Whether every numeric field is finite and sizes are positive.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.content_x, self.content_y, self.content_scale]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
            && self.content_scale > 0.0
    }

    // --- Mode ---

    /// Switch to content edit. Requires the frame to be selected.
    pub fn enter_content_edit(&mut self) -> bool {
        if !self.is_selected || self.mode == FrameMode::ContentEdit {
            return false;
        }
        self.mode = FrameMode::ContentEdit;
        true
    }

    pub fn exit_content_edit(&mut self) -> bool {
        if self.mode == FrameMode::Normal {
            return false;
        }
        self.mode = FrameMode::Normal;
        true
    }

    /// Clear the selection, leaving content edit first.
    pub fn deselect(&mut self) -> bool {
        let was = self.is_selected || self.mode != FrameMode::Normal;
        self.mode = FrameMode::Normal;
        self.is_selected = false;
        was
    }

    // --- Content ---

    /// Record the decoded natural size. Runs the pending default fit, if any.
    ///
    /// Returns `true` when geometry changed.
    pub fn set_natural(&mut self, natural: Size) -> bool {
        if !natural.is_usable() {
            tracing::warn!(frame = %self.id, width = natural.width, height = natural.height, "frame: ignoring unusable natural size");
            return false;
        }
        let Some(content) = self.content.as_mut() else {
            return false;
        };
        content.natural = Some(natural);
        if self.fit_pending {
            self.fit_pending = false;
            return self.apply_cover_fit();
        }
        false
    }

    /// Replace the image. Content placement resets and refits once decoded.
    pub fn swap_source(&mut self, source: impl Into<String>) {
        self.content = Some(ContentRef { source: source.into(), natural: None });
        self.content_x = 0.0;
        self.content_y = 0.0;
        self.fit_pending = true;
    }

    /// Cover-fit the image and centre it in the frame.
    ///
    /// Returns `false` if the natural size is not known yet.
    pub fn apply_cover_fit(&mut self) -> bool {
        let Some(natural) = self.natural() else {
            return false;
        };
        let scale = cover_scale(natural, self.width, self.height);
        self.content_scale = scale;
        self.content_x = (self.width - natural.width * scale) / 2.0;
        self.content_y = (self.height - natural.height * scale) / 2.0;
        true
    }
}

/// Scale that makes `natural` fill a `width` x `height` box, cropping the overflow.
///
/// A wider image than the box fits its height; otherwise it fits its width.
/// At equal aspects both branches give the same scale; the width branch is used.
#[must_use]
pub fn cover_scale(natural: Size, width: f64, height: f64) -> f64 {
    if natural.aspect() > width / height {
        height / natural.height
    } else {
        width / natural.width
    }
}

/// Frame size for a new image: the long side is [`NEW_FRAME_BASE_SIZE`],
/// the short side follows the image aspect.
#[must_use]
pub fn media_frame_size(natural: Size) -> Size {
    if !natural.is_usable() {
        return Size::new(NEW_FRAME_BASE_SIZE, NEW_FRAME_BASE_SIZE);
    }
    let aspect = natural.aspect();
    if aspect > 1.0 {
        Size::new(NEW_FRAME_BASE_SIZE, NEW_FRAME_BASE_SIZE / aspect)
    } else {
        Size::new(NEW_FRAME_BASE_SIZE * aspect, NEW_FRAME_BASE_SIZE)
    }
}

/// Top-left positions for laying out `count` new frames in a grid.
///
/// `ceil(sqrt(count))` columns on a [`NEW_FRAME_BASE_SIZE`] + [`BATCH_SPACING`]
/// pitch, horizontally centred on `x = 0`, rows growing down from `y = 0`.
#[must_use]
pub fn batch_positions(count: usize) -> Vec<Point> {
    let mut cols = 1_usize;
    while cols * cols < count {
        cols += 1;
    }
    let pitch = NEW_FRAME_BASE_SIZE + BATCH_SPACING;
    #[allow(clippy::cast_precision_loss)]
    let row_width = cols as f64 * pitch;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (col, row) = ((i % cols) as f64, (i / cols) as f64);
            Point::new(col * pitch - row_width / 2.0, row * pitch)
        })
        .collect()
}
