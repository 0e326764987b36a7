//! The path search loop.
//!
//! # Shape of the algorithm
//!
//! Greedy best-first over the waypoint graph with three deliberate
//! departures from textbook A*:
//!
//! - The frontier is an unordered `Vec` popped from the tail; after each
//!   expansion round the whole list is re-sorted **descending** by
//!   heuristic so the cheapest node sits at the tail for a cheap pop.
//!   The iteration bound (`max_node_traversal`), not per-iteration cost,
//!   is what bounds a query's work.
//! - Visited nodes are never re-relaxed, even when a cheaper route through
//!   the current node is discovered later.
//! - The run tracks a best-so-far node and degrades to a partial path when
//!   the frontier exhausts, the iteration bound hits, or the best node's
//!   accumulated cost exceeds the query's `max_pathing_distance`.  Search
//!   failure is never an error.
//!
//! Scratch state (`dist_travelled`, `dist_to_target`, `previous`) lives on
//! the waypoints themselves; only the start node's scratch is re-seeded per
//! run, so leftover values from earlier runs can steer best-so-far
//! tracking.  Reproduced as-is.

use rustc_hash::FxHashSet;

use waynav_core::{BodyHandle, NavConfig, Vec3, WaypointId};
use waynav_graph::WaypointGraph;
use waynav_world::SpatialQuery;

use crate::query::PathQuery;

/// The search engine.  Holds reusable scratch collections so repeated
/// queries allocate nothing in steady state; one instance serves any number
/// of sequential searches.
#[derive(Default)]
pub struct PathSearch {
    visited: FxHashSet<WaypointId>,
    /// Waypoints rejected by the ignore policy this run — memoized so the
    /// predicate fires at most once per waypoint per search.
    ignored: FxHashSet<WaypointId>,
    frontier: Vec<WaypointId>,
    /// Reconstruction stack: positions pushed goal-first, popped into
    /// forward order.
    reverse: Vec<Vec3>,
    overlap_buf: Vec<BodyHandle>,
}

impl PathSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute `query.path` from `query.current_position` to
    /// `query.goal_position` over the graph.
    ///
    /// Always produces a non-empty polyline: a two-point `[start, goal]`
    /// when graph routing cannot help, otherwise the (possibly partial)
    /// best route found within the iteration budget.
    pub fn find_path<W: SpatialQuery>(
        &mut self,
        graph: &mut WaypointGraph,
        world: &W,
        config: &NavConfig,
        query: &mut PathQuery,
    ) {
        query.node_traversal_count = 0;
        query.path.clear();
        self.overlap_buf
            .resize(config.overlap_buffer_len.max(1), BodyHandle::INVALID);

        let start = query.current_position;
        let goal = query.goal_position;

        // ── Trivial-path shortcuts ────────────────────────────────────────
        let Some(start_node) =
            graph.closest_waypoint(world, config, start, &mut self.overlap_buf)
        else {
            // No graph coverage here: head straight for the goal.
            query.path.extend([start, goal]);
            return;
        };
        if start.distance(goal) < query.min_waypoint_distance {
            query.path.extend([start, goal]);
            return;
        }

        let end_node = graph.closest_waypoint(world, config, goal, &mut self.overlap_buf);
        if let Some(end) = end_node {
            let end_pos = graph.get(end).map_or(goal, |wp| wp.position);
            // Going direct beats routing via the goal-side node, or both
            // ends snap to the same node.
            if start.distance_sq(goal) < end_pos.distance_sq(goal) || start_node == end {
                query.path.extend([start, goal]);
                return;
            }
        }

        // ── Search loop ───────────────────────────────────────────────────
        self.visited.clear();
        self.ignored.clear();
        self.frontier.clear();

        if let Some(wp) = graph.get_mut(start_node) {
            wp.dist_travelled = 0.0;
            wp.previous = None;
        }
        self.frontier.push(start_node);

        let mut best = start_node;
        let mut loops = 0;

        while !self.frontier.is_empty() && loops < config.max_node_traversal {
            loops += 1;
            let Some(current) = self.frontier.pop() else { break };
            let Some(cur) = graph.get(current) else { continue };
            let (cur_travelled, cur_to_target) = (cur.dist_travelled, cur.dist_to_target);

            if graph.get(best).map_or(f32::INFINITY, |wp| wp.dist_to_target) > cur_to_target {
                best = current;
                if cur_travelled > query.max_pathing_distance {
                    break; // past the abort distance: settle for best-effort
                }
            }

            self.visited.insert(current);
            let mut found_goal = false;

            for k in 0..graph.edge_count(current) {
                let Some((neighbour, edge_dist)) = graph.edge_at(current, k) else { continue };
                if self.ignored.contains(&neighbour) || self.visited.contains(&neighbour) {
                    continue;
                }
                let Some(candidate) = graph.get(neighbour) else { continue };

                if query.policy.ignore(candidate) {
                    self.ignored.insert(neighbour);
                    continue;
                }
                let surcharge = query.policy.penalty(candidate).max(0.0);
                let travelled = cur_travelled + edge_dist + surcharge;
                let to_target = goal.distance(candidate.position) + surcharge;
                let goal_hit = Some(neighbour) == end_node || query.policy.is_goal(candidate);

                if let Some(wp) = graph.get_mut(neighbour) {
                    wp.dist_travelled = travelled;
                    wp.dist_to_target = to_target;
                    wp.previous = Some(current);
                }

                if goal_hit {
                    best = neighbour;
                    found_goal = true;
                    break;
                }
                self.visited.insert(neighbour);
                self.frontier.push(neighbour);
            }

            if found_goal {
                break;
            }

            // Descending re-sort: cheapest heuristic ends up at the tail,
            // where the next pop is O(1).
            let graph_ref = &*graph;
            self.frontier.sort_by(|&x, &y| {
                let hx = graph_ref.get(x).map_or(f32::INFINITY, |wp| wp.heuristic());
                let hy = graph_ref.get(y).map_or(f32::INFINITY, |wp| wp.heuristic());
                hy.total_cmp(&hx)
            });
        }

        self.reconstruct(graph, query, best, start, goal);
        query.node_traversal_count = loops;
    }

    /// Walk `previous` links back from `best`, emitting the polyline in
    /// forward order with start/goal prepended/appended when they sit
    /// farther than the snap threshold from the graph ends.
    fn reconstruct(
        &mut self,
        graph: &WaypointGraph,
        query: &mut PathQuery,
        best: WaypointId,
        start: Vec3,
        goal: Vec3,
    ) {
        self.reverse.clear();

        if let Some(wp) = graph.get(best) {
            if goal.distance(wp.position) > query.min_waypoint_distance {
                self.reverse.push(goal);
            }
        }

        let mut current = best;
        while let Some(wp) = graph.get(current) {
            let Some(prev) = wp.previous else { break };
            self.reverse.push(wp.position);
            current = prev;
        }

        if let Some(terminal) = graph.get(current) {
            if terminal.position.distance(start) > query.min_waypoint_distance {
                self.reverse.push(terminal.position);
            }
        }

        while let Some(point) = self.reverse.pop() {
            query.path.push(point);
        }
    }
}
