//! `WaypointGraph` — the node arena and its repair operations.
//!
//! # Storage
//!
//! Nodes live in a slot arena (`Vec<Option<Waypoint>>` plus an index
//! freelist); `WaypointId` is the slot index.  Edge records live in the
//! shared [`EdgePool`] and waypoints hold only slot indices into it.
//!
//! # Repair model
//!
//! Edge lists are never diffed incrementally: every repair clears the list
//! and re-derives it from a fresh proximity query plus line-of-sight tests.
//! A full [`rebuild`](WaypointGraph::rebuild) additionally reports every
//! kept candidate as *touched* so the scheduler can refresh the reciprocal
//! side; a [`refresh_neighbours`](WaypointGraph::refresh_neighbours) does
//! not propagate.  Stale IDs (a candidate removed between enqueue and
//! processing) are skipped, never an error.

use waynav_core::{BodyHandle, NavConfig, CastMode, Vec3, WaypointId};
use waynav_world::{Shape, SpatialQuery};

use crate::error::{GraphError, GraphResult};
use crate::pool::EdgePool;
use crate::waypoint::{Waypoint, WaypointParams};

/// The waypoint arena plus the shared edge pool.
#[derive(Default)]
pub struct WaypointGraph {
    slots: Vec<Option<Waypoint>>,
    free: Vec<u32>,
    /// Shared neighbour-edge arena.  Public for diagnostics; repair methods
    /// own all mutation.
    pub pool: EdgePool,
}

impl WaypointGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Node lifecycle ────────────────────────────────────────────────────

    /// Insert a waypoint, clamping `max_path` and `radius` against the
    /// configured ceilings.  The new node starts active with no edges.
    pub fn insert(&mut self, params: WaypointParams, config: &NavConfig) -> WaypointId {
        let wp = Waypoint::new(
            params,
            config.clamp_max_path(params.max_path),
            config.clamp_radius(params.radius),
        );
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(wp);
                WaypointId(slot)
            }
            None => {
                self.slots.push(Some(wp));
                WaypointId((self.slots.len() - 1) as u32)
            }
        }
    }

    /// Remove a waypoint: detach all of its edges reciprocally (reporting
    /// touched neighbours), free the slot, and return the node's collision
    /// body for the caller to unregister.  Stale IDs return `None`.
    pub fn remove(&mut self, id: WaypointId, touched: &mut Vec<WaypointId>) -> Option<BodyHandle> {
        self.detach(id, touched);
        let slot = self.slots.get_mut(id.index())?;
        let wp = slot.take()?;
        self.free.push(id.0);
        Some(wp.body)
    }

    /// Number of live waypoints.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Like [`get`](Self::get) but with a typed error for API surfaces.
    pub fn waypoint(&self, id: WaypointId) -> GraphResult<&Waypoint> {
        self.get(id).ok_or(GraphError::WaypointNotFound(id))
    }

    /// Iterate live waypoints.
    pub fn iter(&self) -> impl Iterator<Item = (WaypointId, &Waypoint)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|wp| (WaypointId(i as u32), wp)))
    }

    /// Number of outgoing edges at `id` (0 for stale IDs).
    #[inline]
    pub fn edge_count(&self, id: WaypointId) -> usize {
        self.get(id).map_or(0, |wp| wp.edges.len())
    }

    /// The `k`-th outgoing edge of `id` as `(target, distance)`.
    #[inline]
    pub fn edge_at(&self, id: WaypointId, k: usize) -> Option<(WaypointId, f32)> {
        let slot = *self.get(id)?.edges.get(k)?;
        let edge = self.pool.get(slot);
        Some((edge.target, edge.distance))
    }

    /// Iterate `(target, distance)` pairs of the outgoing edges at `id`.
    pub fn edges(&self, id: WaypointId) -> impl Iterator<Item = (WaypointId, f32)> + '_ {
        self.get(id)
            .into_iter()
            .flat_map(|wp| wp.edges.iter())
            .map(|&slot| {
                let edge = self.pool.get(slot);
                (edge.target, edge.distance)
            })
    }

    // ── Repair operations ─────────────────────────────────────────────────

    /// Full rebuild: re-derive the node's edge list from a proximity query
    /// and line-of-sight tests, reporting every kept candidate in `touched`
    /// (its own list may now need the reciprocal edge).  Clears both
    /// pending flags on completion.
    pub fn rebuild<W: SpatialQuery>(
        &mut self,
        id: WaypointId,
        world: &W,
        config: &NavConfig,
        overlap_buf: &mut [BodyHandle],
        touched: &mut Vec<WaypointId>,
    ) {
        self.derive_edges(id, world, config, overlap_buf, Some(touched));
        if let Some(wp) = self.get_mut(id) {
            wp.pending_full = false;
            wp.pending_neighbour = false;
        }
    }

    /// Neighbour-only refresh: identical edge derivation, but no
    /// propagation to candidates.  Clears only the neighbour-pending flag.
    pub fn refresh_neighbours<W: SpatialQuery>(
        &mut self,
        id: WaypointId,
        world: &W,
        config: &NavConfig,
        overlap_buf: &mut [BodyHandle],
    ) {
        self.derive_edges(id, world, config, overlap_buf, None);
        if let Some(wp) = self.get_mut(id) {
            wp.pending_neighbour = false;
        }
    }

    /// Remove every edge held by `id` together with its reciprocal on the
    /// neighbour (both records back to the pool), reporting each former
    /// neighbour in `touched`.  The node itself stays in the arena — this
    /// is both the first half of [`remove`](Self::remove) and the edge
    /// surgery behind obstacle suppression.
    pub fn detach(&mut self, id: WaypointId, touched: &mut Vec<WaypointId>) {
        let Some(mut edges) = self.get_mut(id).map(|wp| std::mem::take(&mut wp.edges)) else {
            return;
        };
        let pool = &mut self.pool;
        let slots = &mut self.slots;

        for slot in edges.drain(..) {
            let target = pool.get(slot).target;
            pool.release(slot);

            let Some(Some(neighbour)) = slots.get_mut(target.index()) else {
                continue; // neighbour already removed
            };
            if let Some(k) = neighbour.edges.iter().position(|&s| pool.get(s).target == id) {
                let reciprocal = neighbour.edges.remove(k);
                pool.release(reciprocal);
            }
            touched.push(target);
        }
        // Hand the (now empty) Vec back so its capacity is reused.
        if let Some(wp) = self.get_mut(id) {
            wp.edges = edges;
        }
    }

    /// Nearest live, active waypoint to `point` within the configured query
    /// range, or `None` when the graph has no reachable node there.
    pub fn closest_waypoint<W: SpatialQuery>(
        &self,
        world: &W,
        config: &NavConfig,
        point: Vec3,
        overlap_buf: &mut [BodyHandle],
    ) -> Option<WaypointId> {
        let count = world.query_overlap(
            point,
            Shape::Sphere { radius: config.max_path_length },
            config.waypoint_layers,
            overlap_buf,
        );
        let mut best = None;
        let mut best_dist = f32::INFINITY;
        for &handle in &overlap_buf[..count] {
            let Some(id) = world.body_waypoint(handle) else { continue };
            let Some(wp) = self.get(id) else { continue };
            if !wp.active {
                continue;
            }
            let dist = point.distance_sq(wp.position);
            if dist < best_dist {
                best_dist = dist;
                best = Some(id);
            }
        }
        best
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Shared edge derivation for rebuild and refresh.  `touched` is `Some`
    /// only for full rebuilds.
    fn derive_edges<W: SpatialQuery>(
        &mut self,
        id: WaypointId,
        world: &W,
        config: &NavConfig,
        overlap_buf: &mut [BodyHandle],
        mut touched: Option<&mut Vec<WaypointId>>,
    ) {
        self.clear_edges(id);

        let Some(wp) = self.get(id) else { return };
        let (position, max_path, thickness) = (
            wp.position,
            wp.max_path,
            match config.cast_mode {
                CastMode::Ray => 0.0,
                CastMode::Thickness => wp.radius,
            },
        );

        let count = world.query_overlap(
            position,
            Shape::Sphere { radius: config.max_path_length },
            config.waypoint_layers,
            overlap_buf,
        );

        for i in 0..count {
            let Some(other) = world.body_waypoint(overlap_buf[i]) else { continue };
            if other == id {
                continue;
            }
            let Some(candidate) = self.get(other) else { continue };
            if !candidate.active {
                continue;
            }
            let distance = position.distance(candidate.position);
            if distance > max_path || distance == 0.0 {
                continue;
            }
            if self.has_edge_to(id, other) {
                continue; // two bodies tagging one waypoint must not duplicate
            }
            if world.line_of_sight_blocked(
                position,
                candidate.position,
                thickness,
                config.blocking_layers,
            ) {
                continue;
            }

            let slot = self.pool.alloc(other, distance);
            if let Some(wp) = self.get_mut(id) {
                wp.edges.push(slot);
            }
            if let Some(touched) = touched.as_deref_mut() {
                touched.push(other);
            }
        }

        self.sort_edges(id);
    }

    /// Release all of `id`'s edge slots back to the pool, keeping the Vec's
    /// capacity.
    fn clear_edges(&mut self, id: WaypointId) {
        let Some(mut edges) = self.get_mut(id).map(|wp| std::mem::take(&mut wp.edges)) else {
            return;
        };
        for slot in edges.drain(..) {
            self.pool.release(slot);
        }
        if let Some(wp) = self.get_mut(id) {
            wp.edges = edges;
        }
    }

    fn sort_edges(&mut self, id: WaypointId) {
        let Some(mut edges) = self.get_mut(id).map(|wp| std::mem::take(&mut wp.edges)) else {
            return;
        };
        edges.sort_by(|&a, &b| {
            self.pool
                .get(a)
                .distance
                .total_cmp(&self.pool.get(b).distance)
        });
        if let Some(wp) = self.get_mut(id) {
            wp.edges = edges;
        }
    }

    fn has_edge_to(&self, id: WaypointId, target: WaypointId) -> bool {
        self.get(id).is_some_and(|wp| {
            wp.edges.iter().any(|&slot| self.pool.get(slot).target == target)
        })
    }
}
