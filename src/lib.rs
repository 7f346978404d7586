//! Direct-manipulation geometry engine for a multi-page collage editor.
//!
//! The crate owns the editing model of the collage: a pan/zoom viewport over
//! an infinite world, a horizontal strip of pages with snap grids, image frames
//! that can be moved, resized, and have their content panned and scaled inside
//! them, and whole-document undo/redo. It does no drawing and no I/O; the host
//! feeds pointer, wheel, and keyboard events into [`engine::EditorCore`] and
//! applies the returned [`engine::Action`]s, painting from [`render::scene`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor controller [`engine::EditorCore`] and its host actions |
//! | [`doc`] | Frame store and the document undo/redo operates on |
//! | [`viewport`] | Pan/zoom transform, coordinate conversions, input coalescing |
//! | [`page`] | Page layout settings, per-page overrides, world placement |
//! | [`grid`] | Cached snap lines derived from the page grids |
//! | [`snap`] | Snap resolver for points, rectangles, and translations |
//! | [`frame`] | Frame geometry, content placement, cover fit |
//! | [`gesture`] | Drag, resize, content pan, and content resize gestures |
//! | [`input`] | Input event types and the pointer state machine |
//! | [`hit`] | Hit-testing frames and their corner handles |
//! | [`history`] | Snapshot-based undo/redo with a restore guard |
//! | [`render`] | Screen-space display list with viewport culling |
//! | [`config`] | Environment-driven editor configuration |
//! | [`error`] | Error-code trait shared by the error enums |
//! | [`consts`] | Shared numeric constants (zoom limits, snap distances, sizes) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod grid;
pub mod hit;
pub mod history;
pub mod input;
pub mod page;
pub mod render;
pub mod snap;
pub mod viewport;
