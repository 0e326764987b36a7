//! Dynamic obstacle volumes.

use waynav_core::{BodyHandle, Layers, Vec3, WaypointId};
use waynav_world::Shape;

/// A moving blocker tracked by the obstacle monitor.
///
/// The volume owns a collision body on its blocking layers (so edge
/// rebuilds and enclosure probes hit it) and remembers which waypoints it
/// has deactivated so it can hand them back when it moves away.
///
/// Position changes are staged: the host writes the new position through
/// [`NavEngine::set_obstacle_position`][crate::NavEngine::set_obstacle_position]
/// and the monitor picks up the move — body relocation included — on the
/// next tick by comparing against `last_position`.
pub struct ObstacleVolume {
    /// Centre of the volume.  Staged; applied by the next tick.
    pub position: Vec3,
    /// Solid extent of the blocker.
    pub shape: Shape,
    /// Margin added to `shape` when querying for affected waypoints.
    pub influence: f32,
    /// Layers the body occupies, normally the blocking layers.
    pub layers: Layers,

    /// Re-evaluate coverage next tick even without movement.
    pub(crate) forced: bool,
    /// Position at the last evaluation, for movement detection.
    pub(crate) last_position: Vec3,
    /// The volume's collision body.
    pub(crate) body: BodyHandle,
    /// Waypoints this volume currently holds inactive.
    pub(crate) suppressed: Vec<WaypointId>,
}

impl ObstacleVolume {
    /// The query shape for the coverage pass: `shape` grown by `influence`
    /// on every side.
    pub(crate) fn influence_shape(&self) -> Shape {
        let m = self.influence.max(0.0);
        match self.shape {
            Shape::Sphere { radius } => Shape::Sphere { radius: radius + m },
            Shape::Box { half_extents } => Shape::Box {
                half_extents: half_extents + Vec3::new(m, m, m),
            },
        }
    }

    /// Waypoints currently held inactive by this volume.
    pub fn suppressed(&self) -> &[WaypointId] {
        &self.suppressed
    }
}
