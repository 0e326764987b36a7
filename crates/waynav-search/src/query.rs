//! Per-agent path state.

use waynav_core::Vec3;

use crate::policy::{DefaultPolicy, SearchPolicy};

/// A persistent path query belonging to one moving agent.
///
/// The owner updates `current_position` and `goal_position` as the agent
/// and its target move; the scheduler recomputes `path` once per tick while
/// the query is registered.  Between recomputations consumers steer via
/// [`next_position`](Self::next_position) against the (possibly stale)
/// stored path.
pub struct PathQuery {
    /// Where the agent currently is.  Written by the owner each frame.
    pub current_position: Vec3,
    /// Where the agent wants to go.
    pub goal_position: Vec3,

    /// Snap threshold: ends closer than this to a path point are not
    /// duplicated into the polyline, and start/goal pairs closer than this
    /// skip graph search entirely.
    pub min_waypoint_distance: f32,

    /// Abort threshold: when the best-so-far node's accumulated cost
    /// exceeds this, the search stops and returns its partial path.
    pub max_pathing_distance: f32,

    /// The computed polyline, start-to-goal order.  Cleared and rewritten
    /// by every recomputation.
    pub path: Vec<Vec3>,

    /// Frontier-expansion iterations spent on the last recomputation.
    /// Diagnostic only.
    pub node_traversal_count: usize,

    /// Policy hooks for this query.
    pub policy: Box<dyn SearchPolicy>,
}

impl PathQuery {
    pub fn new(current: Vec3, goal: Vec3) -> Self {
        Self {
            current_position: current,
            goal_position: goal,
            min_waypoint_distance: 0.1,
            max_pathing_distance: 20.0,
            path: Vec::new(),
            node_traversal_count: 0,
            policy: Box::new(DefaultPolicy),
        }
    }

    /// Replace the policy hooks.
    pub fn with_policy(mut self, policy: impl SearchPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// The point the agent should steer toward right now.
    ///
    /// With at least two path points: normally the second point; but when
    /// the agent has fallen behind the lookahead window — farther from
    /// `path[1]` than `path[0]` is, beyond the snap threshold — steer back
    /// to `path[0]` first.  Shorter paths head straight for the goal.
    pub fn next_position(&self) -> Vec3 {
        if self.path.len() >= 2 {
            let lookahead = self.path[1];
            if lookahead.distance(self.current_position)
                > lookahead.distance(self.path[0]) + self.min_waypoint_distance
            {
                return self.path[0];
            }
            return lookahead;
        }
        self.goal_position
    }

    /// Normalized direction from the agent to [`next_position`](Self::next_position)
    /// (`Vec3::ZERO` when already there).
    pub fn direction_to_next(&self) -> Vec3 {
        (self.next_position() - self.current_position).normalized()
    }
}
