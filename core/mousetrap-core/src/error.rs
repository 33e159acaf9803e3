//! The controller itself never fails: ineligible areas pass through and stale
//! subscriptions end quietly. Errors come from loading configuration and from
//! building in-memory layouts.

use crate::types::AreaId;
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// Foreign hosts
// ═══════════════════════════════════════════════════════════════════════════════

/// What a Python or Swift caller sees when the engine refuses a request.
/// Only the rendered [`TrapError`] text crosses the boundary.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TrapFfiError {
    #[error("{message}")]
    General { message: String },
}

impl From<TrapError> for TrapFfiError {
    fn from(err: TrapError) -> Self {
        TrapFfiError::General {
            message: err.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Library errors
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum TrapError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    // ─────────────────────────────────────────────────────────────────────
    // Layout Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Unknown area: {0}")]
    UnknownArea(AreaId),

    #[error("Duplicate area id in layout: {0}")]
    DuplicateArea(AreaId),

    #[error("Area {area} has a negative size ({width}x{height})")]
    InvalidAreaSize {
        area: AreaId,
        width: i32,
        height: i32,
    },
}

pub type Result<T> = std::result::Result<T, TrapError>;

impl From<TrapError> for String {
    fn from(err: TrapError) -> String {
        err.to_string()
    }
}
