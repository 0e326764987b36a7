//! Collision shapes and the narrow-phase intersection tests.
//!
//! Two primitives cover everything the engine needs: spheres (waypoints,
//! round obstacles) and axis-aligned boxes (walls, block obstacles).
//! Thickness casts against boxes use the inflated-box approximation: the
//! true swept-sphere volume has rounded corners, so the test is slightly
//! conservative near box corners.

use waynav_core::Vec3;

/// A collision primitive, positioned by the owning body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Sphere of the given radius.
    Sphere { radius: f32 },
    /// Axis-aligned box with the given half extents.
    Box { half_extents: Vec3 },
}

impl Shape {
    /// Axis-aligned bounding corners `(min, max)` of the shape at `center`.
    pub fn corners(self, center: Vec3) -> (Vec3, Vec3) {
        let h = match self {
            Shape::Sphere { radius } => Vec3::new(radius, radius, radius),
            Shape::Box { half_extents } => half_extents,
        };
        (center - h, center + h)
    }
}

/// Closest point to `point` on (or inside) the shape at `center`.
///
/// Points inside the shape map to themselves — matching the convention the
/// obstacle enclosure test relies on: a fully-swallowed waypoint reports
/// zero separation.
pub fn closest_point(point: Vec3, center: Vec3, shape: Shape) -> Vec3 {
    match shape {
        Shape::Sphere { radius } => {
            let offset = point - center;
            let dist = offset.length();
            if dist <= radius {
                point
            } else {
                center + offset * (radius / dist)
            }
        }
        Shape::Box { half_extents } => {
            point.clamp(center - half_extents, center + half_extents)
        }
    }
}

/// Do the query shape at `q_center` and the body shape at `b_center` overlap?
pub fn overlaps(q_center: Vec3, query: Shape, b_center: Vec3, body: Shape) -> bool {
    match (query, body) {
        (Shape::Sphere { radius: rq }, Shape::Sphere { radius: rb }) => {
            q_center.distance_sq(b_center) <= (rq + rb) * (rq + rb)
        }
        (Shape::Sphere { radius }, Shape::Box { .. }) => {
            let p = closest_point(q_center, b_center, body);
            q_center.distance_sq(p) <= radius * radius
        }
        (Shape::Box { .. }, Shape::Sphere { radius }) => {
            let p = closest_point(b_center, q_center, query);
            b_center.distance_sq(p) <= radius * radius
        }
        (Shape::Box { half_extents: hq }, Shape::Box { half_extents: hb }) => {
            (q_center.x - b_center.x).abs() <= hq.x + hb.x
                && (q_center.y - b_center.y).abs() <= hq.y + hb.y
                && (q_center.z - b_center.z).abs() <= hq.z + hb.z
        }
    }
}

/// Does the swept segment `from → to` (inflated by `thickness`) hit the
/// shape at `center`?  `thickness == 0` is a plain raycast.
pub fn segment_hits(from: Vec3, to: Vec3, thickness: f32, center: Vec3, shape: Shape) -> bool {
    match shape {
        Shape::Sphere { radius } => {
            let reach = radius + thickness;
            segment_point_distance_sq(from, to, center) <= reach * reach
        }
        Shape::Box { half_extents } => {
            let inflated = half_extents + Vec3::new(thickness, thickness, thickness);
            segment_intersects_aabb(from, to, center - inflated, center + inflated)
        }
    }
}

/// Squared distance from the segment `a → b` to `point`.
fn segment_point_distance_sq(a: Vec3, b: Vec3, point: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return a.distance_sq(point);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance_sq(point)
}

/// Slab test: does the segment `from → to` pass through `[min, max]`?
fn segment_intersects_aabb(from: Vec3, to: Vec3, min: Vec3, max: Vec3) -> bool {
    let dir = to - from;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for axis in 0..3 {
        let (o, d, lo, hi) = match axis {
            0 => (from.x, dir.x, min.x, max.x),
            1 => (from.y, dir.y, min.y, max.y),
            _ => (from.z, dir.z, min.z, max.z),
        };
        if d.abs() <= f32::EPSILON {
            // Parallel to the slab: miss unless the origin lies inside it.
            if o < lo || o > hi {
                return false;
            }
        } else {
            let mut t0 = (lo - o) / d;
            let mut t1 = (hi - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }
    }
    true
}
