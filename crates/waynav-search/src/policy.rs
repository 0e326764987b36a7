//! Pluggable per-query search policies.
//!
//! A policy customizes one search without touching the engine: reject
//! waypoints outright, redirect the goal, or reshape traversal costs.
//! Implementations see the candidate [`Waypoint`] record and nothing else,
//! so they stay side-effect-free by construction.

use waynav_graph::Waypoint;

/// Strategy hooks evaluated during a search run.
///
/// All methods have defaults matching [`DefaultPolicy`], so implementors
/// only override what they care about.
pub trait SearchPolicy {
    /// `true` excludes the waypoint from this search.  Evaluated at most
    /// once per waypoint per run — the engine memoizes rejections.
    fn ignore(&self, _waypoint: &Waypoint) -> bool {
        false
    }

    /// `true` makes the waypoint the goal: the search adopts it and
    /// terminates immediately.
    fn is_goal(&self, _waypoint: &Waypoint) -> bool {
        false
    }

    /// Traversal-cost surcharge for entering the waypoint.  Negative
    /// returns are clamped to zero by the engine.
    fn penalty(&self, waypoint: &Waypoint) -> f32 {
        waypoint.penalty
    }
}

/// The do-nothing policy: never ignores, never redirects the goal, charges
/// each waypoint's stored penalty.
pub struct DefaultPolicy;

impl SearchPolicy for DefaultPolicy {}
