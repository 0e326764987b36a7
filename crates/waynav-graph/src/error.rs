//! Graph-subsystem error type.

use thiserror::Error;

use waynav_core::WaypointId;

/// Errors produced by `waynav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("waypoint {0} not found in graph")]
    WaypointNotFound(WaypointId),
}

pub type GraphResult<T> = Result<T, GraphError>;
