//! `waynav-graph` — waypoint storage and incremental edge maintenance.
//!
//! # Crate layout
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`waypoint`] | `Waypoint` record, `WaypointParams`                  |
//! | [`pool`]     | `EdgePool` freelist arena of neighbour-edge records   |
//! | [`graph`]    | `WaypointGraph`: rebuild / refresh / detach / remove  |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                        |
//!
//! # Invariants
//!
//! After any rebuild or refresh, a waypoint's edge list is sorted ascending
//! by distance and contains no self-edge and no duplicate target.  Edges are
//! directed; symmetry emerges from both endpoints applying the same
//! deterministic query-and-visibility rule, it is never enforced.

pub mod error;
pub mod graph;
pub mod pool;
pub mod waypoint;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::WaypointGraph;
pub use pool::{Edge, EdgePool, EdgeSlot};
pub use waypoint::{Waypoint, WaypointParams};
