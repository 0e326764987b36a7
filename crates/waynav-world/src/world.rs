//! `StaticWorld` — the default spatial query implementation.
//!
//! # Data layout
//!
//! Bodies live in a slot arena (`Vec<Option<BodyRecord>>` plus an index
//! freelist) so handles stay stable across removals.  An `rstar` R-tree
//! over body envelopes provides the broad phase; every candidate is then
//! confirmed with the exact narrow-phase tests in [`crate::shape`].
//!
//! # Index maintenance
//!
//! R-tree removal locates entries by envelope, so each record caches the
//! envelope it was inserted with; moving a body removes the old entry and
//! inserts a fresh one.

use rstar::{RTree, RTreeObject, AABB};

use waynav_core::{BodyHandle, Layers, Vec3, WaypointId};

use crate::port::{CollisionWorld, SpatialQuery};
use crate::shape::{self, Shape};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a body envelope with its handle.  Equality
/// is by handle so stale-envelope removals cannot drop the wrong body.
#[derive(Clone)]
struct BodyEntry {
    min: [f32; 3],
    max: [f32; 3],
    handle: BodyHandle,
}

impl PartialEq for BodyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl RTreeObject for BodyEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

// ── Body storage ──────────────────────────────────────────────────────────────

struct BodyRecord {
    position: Vec3,
    shape: Shape,
    layers: Layers,
    waypoint: Option<WaypointId>,
    /// Envelope corners currently stored in the R-tree for this body.
    indexed: (Vec3, Vec3),
}

fn entry_for(handle: BodyHandle, corners: (Vec3, Vec3)) -> BodyEntry {
    BodyEntry {
        min: [corners.0.x, corners.0.y, corners.0.z],
        max: [corners.1.x, corners.1.y, corners.1.z],
        handle,
    }
}

// ── StaticWorld ───────────────────────────────────────────────────────────────

/// Sphere/box collision world with an R-tree broad phase.
#[derive(Default)]
pub struct StaticWorld {
    bodies: Vec<Option<BodyRecord>>,
    free: Vec<u32>,
    index: RTree<BodyEntry>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    /// Current position of a body, or `None` for stale handles.
    pub fn body_position(&self, body: BodyHandle) -> Option<Vec3> {
        self.record(body).map(|r| r.position)
    }

    fn record(&self, body: BodyHandle) -> Option<&BodyRecord> {
        self.bodies.get(body.index())?.as_ref()
    }
}

impl SpatialQuery for StaticWorld {
    fn query_overlap(
        &self,
        center: Vec3,
        query: Shape,
        filter: Layers,
        out: &mut [BodyHandle],
    ) -> usize {
        if out.is_empty() {
            return 0;
        }
        let (min, max) = query.corners(center);
        let envelope = AABB::from_corners([min.x, min.y, min.z], [max.x, max.y, max.z]);

        let mut count = 0;
        for entry in self.index.locate_in_envelope_intersecting(&envelope) {
            let Some(body) = self.record(entry.handle) else { continue };
            if !body.layers.intersects(filter) {
                continue;
            }
            if !shape::overlaps(center, query, body.position, body.shape) {
                continue;
            }
            out[count] = entry.handle;
            count += 1;
            if count == out.len() {
                break;
            }
        }
        count
    }

    fn line_of_sight_blocked(&self, from: Vec3, to: Vec3, thickness: f32, filter: Layers) -> bool {
        let pad = thickness.max(0.0);
        let min = [
            from.x.min(to.x) - pad,
            from.y.min(to.y) - pad,
            from.z.min(to.z) - pad,
        ];
        let max = [
            from.x.max(to.x) + pad,
            from.y.max(to.y) + pad,
            from.z.max(to.z) + pad,
        ];
        let envelope = AABB::from_corners(min, max);

        for entry in self.index.locate_in_envelope_intersecting(&envelope) {
            let Some(body) = self.record(entry.handle) else { continue };
            if !body.layers.intersects(filter) {
                continue;
            }
            if shape::segment_hits(from, to, pad, body.position, body.shape) {
                return true;
            }
        }
        false
    }

    fn closest_point_on(&self, body: BodyHandle, point: Vec3) -> Option<Vec3> {
        let record = self.record(body)?;
        Some(shape::closest_point(point, record.position, record.shape))
    }

    fn body_waypoint(&self, body: BodyHandle) -> Option<WaypointId> {
        self.record(body)?.waypoint
    }
}

impl CollisionWorld for StaticWorld {
    fn add_body(
        &mut self,
        position: Vec3,
        shape: Shape,
        layers: Layers,
        waypoint: Option<WaypointId>,
    ) -> BodyHandle {
        let corners = shape.corners(position);
        let record = BodyRecord { position, shape, layers, waypoint, indexed: corners };

        let handle = match self.free.pop() {
            Some(slot) => {
                self.bodies[slot as usize] = Some(record);
                BodyHandle(slot)
            }
            None => {
                self.bodies.push(Some(record));
                BodyHandle((self.bodies.len() - 1) as u32)
            }
        };
        self.index.insert(entry_for(handle, corners));
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(slot) = self.bodies.get_mut(body.index()) else { return };
        let Some(record) = slot.take() else { return };
        self.index.remove(&entry_for(body, record.indexed));
        self.free.push(body.0);
    }

    fn set_body_position(&mut self, body: BodyHandle, position: Vec3) {
        let Some(Some(record)) = self.bodies.get_mut(body.index()) else { return };
        let old = record.indexed;
        let corners = record.shape.corners(position);
        record.position = position;
        record.indexed = corners;

        self.index.remove(&entry_for(body, old));
        self.index.insert(entry_for(body, corners));
    }
}
