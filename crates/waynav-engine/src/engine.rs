//! `NavEngine` — the frame-budgeted scheduler.
//!
//! # Tick phases
//!
//! [`NavEngine::tick`] runs four phases in a fixed order:
//!
//! 1. **Obstacle monitor**: every tracked volume that moved (or was
//!    forced) re-evaluates its coverage, suppressing enclosed waypoints
//!    and restoring ones it no longer covers.
//! 2. **Neighbour refreshes**: up to `neighbour_updates_per_tick` entries
//!    drained; entries superseded by a pending full rebuild are skipped
//!    without consuming budget.
//! 3. **Full rebuilds**: up to `waypoint_updates_per_tick` entries
//!    drained; each rebuild's kept candidates are enqueued for a
//!    neighbour refresh so their reciprocal edges follow.
//! 4. **Path recomputes**: up to `pathing_updates_per_tick` dequeues;
//!    *every* dequeue consumes budget, registered queries are recomputed
//!    and re-appended in processing order, unregistered entries drop out.
//!
//! # Queue discipline
//!
//! Dedupe lives on the waypoints themselves (`pending_full` /
//! `pending_neighbour` flags), not in the queues: enqueueing is a no-op
//! when a covering entry is already pending, and a full rebuild absorbs a
//! pending neighbour refresh by clearing its flag — the orphaned queue
//! entry is skipped for free at drain time.  Path registration is weak:
//! the queue holds IDs, membership in the registration set is what keeps
//! an entry alive.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use waynav_core::{BodyHandle, Layers, NavConfig, ObstacleId, QueryId, Tick, Vec3, WaypointId};
use waynav_graph::{WaypointGraph, WaypointParams};
use waynav_search::{PathQuery, PathSearch};
use waynav_world::{CollisionWorld, Shape};

use crate::error::{EngineError, EngineResult};
use crate::observer::{NavObserver, TickReport};
use crate::obstacle::ObstacleVolume;

/// Snapshot of the scheduler's queue depths.  Diagnostic only; includes
/// stale entries that will be skipped at drain time.
#[derive(Copy, Clone, Default, Debug)]
pub struct PendingCounts {
    pub neighbour: usize,
    pub rebuild: usize,
    pub path: usize,
}

/// The navigation engine: waypoint graph, collision world, search engine
/// and the scheduler tying them together.
///
/// Generic over the collision backend so hosts can adapt their own physics
/// engine through [`CollisionWorld`]; [`StaticWorld`][waynav_world::StaticWorld]
/// is the built-in default.
pub struct NavEngine<W: CollisionWorld> {
    config: NavConfig,

    /// Collision backend.  Public read access for diagnostics; body
    /// lifecycle is owned by the engine.
    pub world: W,

    /// The waypoint graph.  Public read access for diagnostics and search
    /// helpers; structural repair is owned by the scheduler.
    pub graph: WaypointGraph,

    search: PathSearch,

    neighbour_queue: VecDeque<WaypointId>,
    rebuild_queue: VecDeque<WaypointId>,
    path_queue: VecDeque<QueryId>,
    /// Queries that survive a drain and go back to the tail, in order.
    requeue: Vec<QueryId>,
    /// Registered query IDs.  Queue entries not in here drop at dequeue.
    registrations: FxHashSet<QueryId>,

    queries: Vec<Option<PathQuery>>,
    query_free: Vec<u32>,
    obstacles: Vec<Option<ObstacleVolume>>,
    obstacle_free: Vec<u32>,

    overlap_buf: Vec<BodyHandle>,
    touched: Vec<WaypointId>,
    tick: Tick,
}

impl<W: CollisionWorld> NavEngine<W> {
    pub fn new(config: NavConfig, world: W) -> Self {
        let config = config.sanitized();
        let overlap_buf = vec![BodyHandle::INVALID; config.overlap_buffer_len];
        Self {
            config,
            world,
            graph: WaypointGraph::new(),
            search: PathSearch::new(),
            neighbour_queue: VecDeque::new(),
            rebuild_queue: VecDeque::new(),
            path_queue: VecDeque::new(),
            requeue: Vec::new(),
            registrations: FxHashSet::default(),
            queries: Vec::new(),
            query_free: Vec::new(),
            obstacles: Vec::new(),
            obstacle_free: Vec::new(),
            overlap_buf,
            touched: Vec::new(),
            tick: Tick::ZERO,
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn pending(&self) -> PendingCounts {
        PendingCounts {
            neighbour: self.neighbour_queue.len(),
            rebuild: self.rebuild_queue.len(),
            path: self.path_queue.len(),
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run one scheduler frame.  See the module docs for the phase order.
    pub fn tick<O: NavObserver>(&mut self, observer: &mut O) {
        let now = self.tick;
        observer.on_tick_start(now);

        let mut report = TickReport::default();
        self.monitor_obstacles(&mut report, observer);
        self.drain_neighbour_queue(&mut report);
        self.drain_rebuild_queue(&mut report);
        self.drain_path_queue(&mut report, observer);

        observer.on_tick_end(now, &report);
        self.tick.advance();
    }

    fn monitor_obstacles<O: NavObserver>(&mut self, report: &mut TickReport, observer: &mut O) {
        for i in 0..self.obstacles.len() {
            let (position, query_shape, layers, body, mut previously, moved) = {
                let Some(ob) = self.obstacles[i].as_mut() else { continue };
                let moved = ob.position != ob.last_position;
                if !moved && !ob.forced {
                    continue;
                }
                ob.last_position = ob.position;
                ob.forced = false;
                (
                    ob.position,
                    ob.influence_shape(),
                    ob.layers,
                    ob.body,
                    std::mem::take(&mut ob.suppressed),
                    moved,
                )
            };
            if moved {
                self.world.set_body_position(body, position);
            }

            // Coverage pass: waypoints whose cast sphere cannot leave the
            // volume go inactive; overlapped-but-free ones only need their
            // edges re-derived around the blocker.
            let count = self.world.query_overlap(
                position,
                query_shape,
                self.config.waypoint_layers,
                &mut self.overlap_buf,
            );
            let mut now_suppressed = Vec::with_capacity(count);
            for k in 0..count {
                let handle = self.overlap_buf[k];
                let Some(id) = self.world.body_waypoint(handle) else { continue };
                let Some((wp_pos, wp_radius, wp_active)) =
                    self.graph.get(id).map(|wp| (wp.position, wp.radius, wp.active))
                else {
                    continue;
                };

                let dir = (position - wp_pos).normalized();
                let enclosed = dir == Vec3::ZERO
                    || self
                        .world
                        .line_of_sight_blocked(wp_pos, wp_pos + dir * wp_radius, 0.0, layers);

                if enclosed {
                    now_suppressed.push(id);
                    if wp_active {
                        self.suppress_waypoint(id);
                        report.suppressed += 1;
                        observer.on_waypoint_suppressed(self.tick, id);
                    }
                } else {
                    self.enqueue_neighbour_refresh(id);
                }
            }

            // Restore pass: every tracked waypoint gets its own enclosure
            // cast — the overlap buffer is bounded and may not surface all
            // of them, so absence from it proves nothing.  Only a clear
            // cast hands a waypoint back; the rest stay tracked.
            for id in previously.drain(..) {
                if now_suppressed.contains(&id) {
                    continue;
                }
                let Some((wp_pos, wp_radius, wp_active)) =
                    self.graph.get(id).map(|wp| (wp.position, wp.radius, wp.active))
                else {
                    continue;
                };

                let dir = (position - wp_pos).normalized();
                let enclosed = dir == Vec3::ZERO
                    || self
                        .world
                        .line_of_sight_blocked(wp_pos, wp_pos + dir * wp_radius, 0.0, layers);
                if enclosed {
                    now_suppressed.push(id);
                    continue;
                }

                if !wp_active {
                    if let Some(wp) = self.graph.get_mut(id) {
                        wp.active = true;
                    }
                    self.enqueue_rebuild(id);
                    report.restored += 1;
                    observer.on_waypoint_restored(self.tick, id);
                }
            }

            if let Some(ob) = self.obstacles[i].as_mut() {
                ob.suppressed = now_suppressed;
            }
        }
    }

    fn drain_neighbour_queue(&mut self, report: &mut TickReport) {
        let mut budget = self.config.neighbour_updates_per_tick;
        while budget > 0 {
            let Some(id) = self.neighbour_queue.pop_front() else { break };
            let Some(wp) = self.graph.get(id) else { continue };
            // Superseded by a full rebuild, or suppressed since enqueue:
            // skip without consuming budget.
            if wp.pending_full || !wp.pending_neighbour || !wp.active {
                continue;
            }
            self.graph
                .refresh_neighbours(id, &self.world, &self.config, &mut self.overlap_buf);
            report.neighbour_refreshes += 1;
            budget -= 1;
        }
    }

    fn drain_rebuild_queue(&mut self, report: &mut TickReport) {
        let mut budget = self.config.waypoint_updates_per_tick;
        while budget > 0 {
            let Some(id) = self.rebuild_queue.pop_front() else { break };
            let Some(wp) = self.graph.get(id) else { continue };
            if !wp.pending_full || !wp.active {
                continue;
            }
            let mut touched = std::mem::take(&mut self.touched);
            self.graph
                .rebuild(id, &self.world, &self.config, &mut self.overlap_buf, &mut touched);
            for t in touched.drain(..) {
                self.enqueue_neighbour_refresh(t);
            }
            self.touched = touched;
            report.rebuilds += 1;
            budget -= 1;
        }
    }

    fn drain_path_queue<O: NavObserver>(&mut self, report: &mut TickReport, observer: &mut O) {
        let mut budget = self.config.pathing_updates_per_tick;
        while budget > 0 {
            let Some(qid) = self.path_queue.pop_front() else { break };
            budget -= 1; // every dequeue counts, registered or not
            if !self.registrations.contains(&qid) {
                continue;
            }
            let Some(query) = self.queries.get_mut(qid.index()).and_then(|s| s.as_mut()) else {
                self.registrations.remove(&qid);
                continue;
            };
            self.search
                .find_path(&mut self.graph, &self.world, &self.config, query);
            report.path_recomputes += 1;
            observer.on_path_recomputed(self.tick, qid, query);
            self.requeue.push(qid);
        }
        for qid in self.requeue.drain(..) {
            self.path_queue.push_back(qid);
        }
    }

    // ── Waypoint lifecycle ────────────────────────────────────────────────

    /// Insert a waypoint, register its collision body and schedule its
    /// first edge rebuild.
    pub fn add_waypoint(&mut self, params: WaypointParams) -> WaypointId {
        let id = self.graph.insert(params, &self.config);
        if let Some(wp) = self.graph.get(id) {
            let body = self.world.add_body(
                wp.position,
                Shape::Sphere { radius: wp.radius },
                self.config.waypoint_layers,
                Some(id),
            );
            if let Some(wp) = self.graph.get_mut(id) {
                wp.body = body;
            }
        }
        self.enqueue_rebuild(id);
        id
    }

    /// Remove a waypoint, its collision body and all of its edges.  Former
    /// neighbours are scheduled for a neighbour refresh.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> EngineResult<()> {
        let mut touched = std::mem::take(&mut self.touched);
        let body = self.graph.remove(id, &mut touched);
        for t in touched.drain(..) {
            self.enqueue_neighbour_refresh(t);
        }
        self.touched = touched;

        match body {
            Some(body) => {
                self.world.remove_body(body);
                Ok(())
            }
            None => Err(EngineError::Graph(waynav_graph::GraphError::WaypointNotFound(id))),
        }
    }

    /// Move a waypoint.  Neighbours around the *old* position get a
    /// refresh (their edge to this node may no longer hold) and the node
    /// itself gets a full rebuild at the new position.
    pub fn set_waypoint_position(&mut self, id: WaypointId, position: Vec3) -> EngineResult<()> {
        let (old, body) = {
            let wp = self.graph.waypoint(id)?;
            (wp.position, wp.body)
        };

        let count = self.world.query_overlap(
            old,
            Shape::Sphere { radius: self.config.max_path_length },
            self.config.waypoint_layers,
            &mut self.overlap_buf,
        );
        for k in 0..count {
            let handle = self.overlap_buf[k];
            let Some(near) = self.world.body_waypoint(handle) else { continue };
            if near != id {
                self.enqueue_neighbour_refresh(near);
            }
        }

        if let Some(wp) = self.graph.get_mut(id) {
            wp.position = position;
        }
        self.world.set_body_position(body, position);
        self.enqueue_rebuild(id);
        Ok(())
    }

    // ── Obstacle lifecycle ────────────────────────────────────────────────

    /// Register a dynamic obstacle volume.  Its body lands on `layers`
    /// immediately; the coverage evaluation runs on the next tick.
    pub fn add_obstacle(
        &mut self,
        position: Vec3,
        shape: Shape,
        influence: f32,
        layers: Layers,
    ) -> ObstacleId {
        let body = self.world.add_body(position, shape, layers, None);
        let volume = ObstacleVolume {
            position,
            shape,
            influence,
            layers,
            forced: true,
            last_position: position,
            body,
            suppressed: Vec::new(),
        };
        match self.obstacle_free.pop() {
            Some(slot) => {
                self.obstacles[slot as usize] = Some(volume);
                ObstacleId(slot)
            }
            None => {
                self.obstacles.push(Some(volume));
                ObstacleId((self.obstacles.len() - 1) as u32)
            }
        }
    }

    /// Stage a new obstacle position.  The monitor applies it (body move
    /// and coverage re-evaluation) on the next tick.
    pub fn set_obstacle_position(&mut self, id: ObstacleId, position: Vec3) -> EngineResult<()> {
        let ob = self.obstacle_mut(id)?;
        ob.position = position;
        Ok(())
    }

    /// Force a coverage re-evaluation next tick even without movement.
    /// Use after external geometry near the volume changes.
    pub fn force_obstacle_refresh(&mut self, id: ObstacleId) -> EngineResult<()> {
        let ob = self.obstacle_mut(id)?;
        ob.forced = true;
        Ok(())
    }

    /// Remove an obstacle, restoring every waypoint it held inactive.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> EngineResult<()> {
        let slot = self
            .obstacles
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(EngineError::ObstacleNotFound(id))?;
        self.obstacle_free.push(id.0);
        self.world.remove_body(slot.body);

        for wp_id in slot.suppressed {
            let Some(wp) = self.graph.get_mut(wp_id) else { continue };
            if !wp.active {
                wp.active = true;
                self.enqueue_rebuild(wp_id);
            }
        }
        Ok(())
    }

    pub fn obstacle(&self, id: ObstacleId) -> EngineResult<&ObstacleVolume> {
        self.obstacles
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(EngineError::ObstacleNotFound(id))
    }

    fn obstacle_mut(&mut self, id: ObstacleId) -> EngineResult<&mut ObstacleVolume> {
        self.obstacles
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(EngineError::ObstacleNotFound(id))
    }

    // ── Path queries ──────────────────────────────────────────────────────

    /// Take ownership of a query.  It stays inert until
    /// [`start_updates`](Self::start_updates).
    pub fn add_query(&mut self, query: PathQuery) -> QueryId {
        match self.query_free.pop() {
            Some(slot) => {
                self.queries[slot as usize] = Some(query);
                QueryId(slot)
            }
            None => {
                self.queries.push(Some(query));
                QueryId((self.queries.len() - 1) as u32)
            }
        }
    }

    pub fn query(&self, id: QueryId) -> EngineResult<&PathQuery> {
        self.queries
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(EngineError::QueryNotFound(id))
    }

    /// Mutable access, for the host to move `current_position` and
    /// `goal_position` between recomputations.
    pub fn query_mut(&mut self, id: QueryId) -> EngineResult<&mut PathQuery> {
        self.queries
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(EngineError::QueryNotFound(id))
    }

    /// Remove a query, returning its final state.
    pub fn destroy_query(&mut self, id: QueryId) -> EngineResult<PathQuery> {
        let query = self
            .queries
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(EngineError::QueryNotFound(id))?;
        self.query_free.push(id.0);
        self.registrations.remove(&id);
        Ok(query)
    }

    /// Register a query for per-tick recomputation.  Idempotent: a query
    /// holds at most one queue entry no matter how often this is called.
    pub fn start_updates(&mut self, id: QueryId) -> EngineResult<()> {
        self.query(id)?;
        if self.registrations.insert(id) {
            self.path_queue.push_back(id);
        }
        Ok(())
    }

    /// Unregister a query.  Its stale queue entry drops out (consuming
    /// budget) at the next dequeue.  Idempotent.
    pub fn stop_updates(&mut self, id: QueryId) -> EngineResult<()> {
        self.query(id)?;
        self.registrations.remove(&id);
        Ok(())
    }

    /// Recompute a query immediately, outside the per-tick budget.
    pub fn recompute(&mut self, id: QueryId) -> EngineResult<()> {
        let query = self
            .queries
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(EngineError::QueryNotFound(id))?;
        self.search
            .find_path(&mut self.graph, &self.world, &self.config, query);
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Deactivate a waypoint and detach its edges; touched neighbours are
    /// scheduled for a refresh.  Pending repair flags are cleared — a
    /// detached node has nothing to repair until it is restored.
    fn suppress_waypoint(&mut self, id: WaypointId) {
        let mut touched = std::mem::take(&mut self.touched);
        self.graph.detach(id, &mut touched);
        for t in touched.drain(..) {
            self.enqueue_neighbour_refresh(t);
        }
        self.touched = touched;

        if let Some(wp) = self.graph.get_mut(id) {
            wp.active = false;
            wp.pending_full = false;
            wp.pending_neighbour = false;
        }
    }

    /// Schedule a neighbour-only refresh.  No-op while any repair is
    /// already pending or the waypoint is inactive.
    fn enqueue_neighbour_refresh(&mut self, id: WaypointId) {
        let Some(wp) = self.graph.get_mut(id) else { return };
        if !wp.active || wp.pending_any() {
            return;
        }
        wp.pending_neighbour = true;
        self.neighbour_queue.push_back(id);
    }

    /// Schedule a full rebuild.  Absorbs a pending neighbour refresh by
    /// clearing its flag; the orphaned queue entry is skipped at drain.
    fn enqueue_rebuild(&mut self, id: WaypointId) {
        let Some(wp) = self.graph.get_mut(id) else { return };
        if !wp.active || wp.pending_full {
            return;
        }
        wp.pending_full = true;
        wp.pending_neighbour = false;
        self.rebuild_queue.push_back(id);
    }
}
