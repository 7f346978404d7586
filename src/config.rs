//! Editor configuration loaded from environment variables.
//!
//! Every knob has a default matching the constants in [`crate::consts`].
//! Unset variables fall back to the default; set but unparsable or
//! out-of-range values are rejected so a typo never silently changes
//! editing behaviour.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use thiserror::Error;

use crate::consts::{
    CONTENT_SNAP_THRESHOLD, DEFAULT_HISTORY_LIMIT, SNAP_THRESHOLD_PX, ZOOM_SENSITIVITY,
};
use crate::error::ErrorCode;

pub const HISTORY_LIMIT_VAR: &str = "COLLAGE_HISTORY_LIMIT";
pub const SNAP_ENABLED_VAR: &str = "COLLAGE_SNAP_ENABLED";
pub const SNAP_THRESHOLD_VAR: &str = "COLLAGE_SNAP_THRESHOLD_PX";
pub const ZOOM_SENSITIVITY_VAR: &str = "COLLAGE_ZOOM_SENSITIVITY";
pub const CONTENT_SNAP_THRESHOLD_VAR: &str = "COLLAGE_CONTENT_SNAP_THRESHOLD";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Parse { var: &'static str, value: String },
    #[error("{var}: {value:?} is out of range ({expected})")]
    OutOfRange { var: &'static str, value: String, expected: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "E_CONFIG_PARSE",
            Self::OutOfRange { .. } => "E_CONFIG_RANGE",
        }
    }
}

/// Tuning knobs for one editor instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Maximum undo depth, at least 1.
    pub history_limit: usize,
    pub snap_enabled: bool,
    /// Grid snap distance in screen pixels.
    pub snap_threshold_px: f64,
    /// Scale change per raw wheel delta unit.
    pub zoom_sensitivity: f64,
    /// Content pan/resize snap distance in frame-local units.
    pub content_snap_threshold: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            snap_enabled: true,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            content_snap_threshold: CONTENT_SNAP_THRESHOLD,
        }
    }
}

impl EditorConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Load from any key lookup. Missing keys take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let history_limit = parse_var(&lookup, HISTORY_LIMIT_VAR, defaults.history_limit)?;
        if history_limit == 0 {
            return Err(out_of_range(HISTORY_LIMIT_VAR, history_limit.to_string(), ">= 1"));
        }
        let snap_enabled = match lookup(SNAP_ENABLED_VAR) {
            None => defaults.snap_enabled,
            Some(raw) => parse_bool(SNAP_ENABLED_VAR, &raw)?,
        };
        Ok(Self {
            history_limit,
            snap_enabled,
            snap_threshold_px: positive(&lookup, SNAP_THRESHOLD_VAR, defaults.snap_threshold_px)?,
            zoom_sensitivity: positive(&lookup, ZOOM_SENSITIVITY_VAR, defaults.zoom_sensitivity)?,
            content_snap_threshold: positive(&lookup, CONTENT_SNAP_THRESHOLD_VAR, defaults.content_snap_threshold)?,
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Parse { var, value: raw.clone() })
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value: f64 = parse_var(lookup, var, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(out_of_range(var, value.to_string(), "finite and > 0"));
    }
    Ok(value)
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Parse { var, value: raw.to_string() }),
    }
}

fn out_of_range(var: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange { var, value, expected }
}
