//! Shared error-code trait.
//!
//! Each module owns its own `thiserror` enum; this trait gives every variant a
//! stable, grepable code for logs and host-side reporting.

/// Grepable error code for structured diagnostics.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
