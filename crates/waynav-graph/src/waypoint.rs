//! The waypoint record.

use waynav_core::{BodyHandle, Vec3, WaypointId};

use crate::pool::EdgeSlot;

/// Construction parameters for a waypoint.  `max_path` and `radius` are
/// clamped against the engine configuration on insert.
#[derive(Copy, Clone, Debug)]
pub struct WaypointParams {
    pub position: Vec3,
    /// Maximum edge length originating at this waypoint.
    pub max_path: f32,
    /// Thickness used by line-of-sight casts and the obstacle enclosure
    /// probe.  Units smaller than this radius can traverse the waypoint's
    /// edges.
    pub radius: f32,
    /// Traversal-cost surcharge; higher values make the waypoint less
    /// desirable.
    pub penalty: f32,
}

impl WaypointParams {
    /// Defaults matching a mid-sized ground waypoint.
    pub fn at(position: Vec3) -> Self {
        Self { position, max_path: 5.0, radius: 1.0, penalty: 0.0 }
    }

    pub fn max_path(mut self, value: f32) -> Self {
        self.max_path = value;
        self
    }

    pub fn radius(mut self, value: f32) -> Self {
        self.radius = value;
        self
    }

    pub fn penalty(mut self, value: f32) -> Self {
        self.penalty = value;
        self
    }
}

/// A navigable graph node.
///
/// Fields are `pub` for direct access on hot paths; the scratch and pending
/// fields are owned by the search engine and scheduler respectively and
/// must not be interpreted outside a run.
#[derive(Debug)]
pub struct Waypoint {
    pub position: Vec3,
    /// Clamped to the configured global ceiling on insert.
    pub max_path: f32,
    /// Clamped into `[MIN_RADIUS, max_radius_check]` on insert.
    pub radius: f32,
    pub penalty: f32,

    /// `false` while suppressed by an obstacle volume.  Inactive waypoints
    /// are skipped by rebuilds and nearest-waypoint selection.
    pub active: bool,

    /// Collision body representing this waypoint in the spatial world.
    pub body: BodyHandle,

    /// Pool slots of outgoing edges, sorted ascending by distance.
    pub edges: Vec<EdgeSlot>,

    // ── Search scratch (persists between runs) ────────────────────────────
    /// Accumulated traversal cost to reach this node in the current search.
    pub dist_travelled: f32,
    /// Straight-line-plus-penalty estimate to the current goal.
    pub dist_to_target: f32,
    /// Back-pointer for path reconstruction.
    pub previous: Option<WaypointId>,

    // ── Scheduler pending flags (mutually exclusive) ──────────────────────
    /// Queued for a full rebuild.  Subsumes a neighbour-only refresh.
    pub pending_full: bool,
    /// Queued for a neighbour-only refresh.
    pub pending_neighbour: bool,
}

impl Waypoint {
    pub(crate) fn new(params: WaypointParams, max_path: f32, radius: f32) -> Self {
        Self {
            position: params.position,
            max_path,
            radius,
            penalty: params.penalty,
            active: true,
            body: BodyHandle::INVALID,
            edges: Vec::new(),
            dist_travelled: 0.0,
            dist_to_target: f32::INFINITY,
            previous: None,
            pending_full: false,
            pending_neighbour: false,
        }
    }

    /// Frontier ranking key: accumulated cost plus the goal estimate.
    #[inline]
    pub fn heuristic(&self) -> f32 {
        self.dist_travelled + self.dist_to_target
    }

    /// `true` when queued for any kind of repair.
    #[inline]
    pub fn pending_any(&self) -> bool {
        self.pending_full || self.pending_neighbour
    }
}
