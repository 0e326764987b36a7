//! Core error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `CoreError` via `From` impls or wrap it as one variant.  Both patterns
//! are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::WaypointId;

/// The common base error for `waynav-*` crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("waypoint {0} not found")]
    WaypointNotFound(WaypointId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type.
pub type CoreResult<T> = Result<T, CoreError>;
