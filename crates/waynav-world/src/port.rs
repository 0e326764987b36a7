//! The spatial query port.
//!
//! The navigation core never owns a scene representation; it consumes one
//! through these traits.  [`SpatialQuery`] is the read side used by graph
//! rebuilds, path searches, and the obstacle monitor.  [`CollisionWorld`]
//! adds the body-lifecycle writes that only the engine's waypoint/obstacle
//! add-remove-move entry points need.

use waynav_core::{BodyHandle, Layers, Vec3, WaypointId};

use crate::shape::Shape;

/// Read-only proximity and line-of-sight queries against a world.
pub trait SpatialQuery {
    /// Collect handles of bodies on `filter` layers overlapping `shape`
    /// placed at `center`.
    ///
    /// Results are written into the caller-owned `out` buffer (reused, not
    /// reallocated, across calls) and silently truncated at its length.
    /// Returns the number of handles written.
    fn query_overlap(
        &self,
        center: Vec3,
        shape: Shape,
        filter: Layers,
        out: &mut [BodyHandle],
    ) -> usize;

    /// `true` if any body on `filter` layers blocks the segment
    /// `from → to` swept with the given `thickness` (`0.0` = raycast).
    fn line_of_sight_blocked(&self, from: Vec3, to: Vec3, thickness: f32, filter: Layers) -> bool;

    /// Closest point to `point` on (or inside) the given body, or `None`
    /// if the handle is stale.
    fn closest_point_on(&self, body: BodyHandle, point: Vec3) -> Option<Vec3>;

    /// The waypoint tagged on a body, if any.  Overlap consumers use this
    /// to map candidate handles back to graph nodes.
    fn body_waypoint(&self, body: BodyHandle) -> Option<WaypointId>;
}

/// Body lifecycle extension consumed by the engine.
pub trait CollisionWorld: SpatialQuery {
    /// Register a body and return its handle.  `waypoint` tags bodies that
    /// represent graph nodes so overlap queries can resolve them.
    fn add_body(
        &mut self,
        position: Vec3,
        shape: Shape,
        layers: Layers,
        waypoint: Option<WaypointId>,
    ) -> BodyHandle;

    /// Remove a body.  Stale handles are ignored.
    fn remove_body(&mut self, body: BodyHandle);

    /// Move a body, keeping the spatial index consistent.  Stale handles
    /// are ignored.
    fn set_body_position(&mut self, body: BodyHandle, position: Vec3);
}
