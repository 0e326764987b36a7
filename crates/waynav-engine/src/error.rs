//! Engine error type.

use thiserror::Error;

use waynav_core::{ObstacleId, QueryId};
use waynav_graph::GraphError;

/// Errors surfaced by [`NavEngine`][crate::NavEngine] API calls.
///
/// Scheduler-internal work never errors: a stale ID drained from a queue
/// is silently skipped.  These variants only fire when the host passes a
/// bad handle into the public API.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("path query {0} not found")]
    QueryNotFound(QueryId),

    #[error("obstacle {0} not found")]
    ObstacleNotFound(ObstacleId),
}

/// Shorthand result type.
pub type EngineResult<T> = Result<T, EngineError>;
