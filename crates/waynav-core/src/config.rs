//! Engine configuration.
//!
//! A plain struct with documented defaults.  Applications typically build
//! one in code or deserialize it from TOML/JSON (enable the `serde`
//! feature) and hand it to `NavEngine::new`.  Out-of-range values are
//! clamped by [`NavConfig::sanitized`], never rejected: a misconfigured
//! host gets a degraded-but-valid engine rather than a startup failure.

use crate::Layers;

/// Smallest allowed waypoint cast radius.  A zero radius would make
/// thickness casts degenerate to rays and the obstacle enclosure probe
/// always pass.
pub const MIN_RADIUS: f32 = 0.1;

/// How line-of-sight between waypoints is validated during edge rebuilds.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastMode {
    /// Zero-thickness raycast between waypoint centres.
    #[default]
    Ray,
    /// Thickness cast using the source waypoint's radius: units smaller
    /// than the radius can traverse any surviving edge.
    Thickness,
}

/// Top-level engine configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    /// Maximum length of any edge between waypoints.  Also the radius of the
    /// proximity query used to find edge candidates and nearest waypoints.
    pub max_path_length: f32,

    /// Ceiling on per-waypoint cast radii.
    pub max_radius_check: f32,

    /// Maximum frontier-expansion iterations per path search.
    pub max_node_traversal: usize,

    /// Full waypoint rebuilds processed per tick.
    pub waypoint_updates_per_tick: usize,

    /// Neighbour-only refreshes processed per tick.
    pub neighbour_updates_per_tick: usize,

    /// Path recomputations processed per tick.
    pub pathing_updates_per_tick: usize,

    /// Capacity of the reused overlap-query candidate buffer.  Queries
    /// returning more bodies than this are silently truncated.
    pub overlap_buffer_len: usize,

    /// Line-of-sight validation mode for edge rebuilds.
    pub cast_mode: CastMode,

    /// Layer(s) waypoint bodies are registered on.
    pub waypoint_layers: Layers,

    /// Layers whose bodies block waypoint edges and path line-of-sight.
    pub blocking_layers: Layers,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            max_path_length: 5.0,
            max_radius_check: 1.0,
            max_node_traversal: 50,
            waypoint_updates_per_tick: 10,
            neighbour_updates_per_tick: 10,
            pathing_updates_per_tick: 5,
            overlap_buffer_len: 64,
            cast_mode: CastMode::Ray,
            waypoint_layers: Layers::bit(0),
            blocking_layers: Layers::bit(1),
        }
    }
}

impl NavConfig {
    /// Return a copy with every field clamped into its valid range.
    ///
    /// Zero budgets would stall the scheduler forever and negative lengths
    /// are meaningless, so both are raised to their minimums.
    pub fn sanitized(&self) -> NavConfig {
        let mut c = self.clone();
        c.max_path_length = c.max_path_length.max(0.0);
        c.max_radius_check = c.max_radius_check.max(MIN_RADIUS);
        c.max_node_traversal = c.max_node_traversal.max(1);
        c.waypoint_updates_per_tick = c.waypoint_updates_per_tick.max(1);
        c.neighbour_updates_per_tick = c.neighbour_updates_per_tick.max(1);
        c.pathing_updates_per_tick = c.pathing_updates_per_tick.max(1);
        c.overlap_buffer_len = c.overlap_buffer_len.max(1);
        c
    }

    /// Clamp a per-waypoint `max_path` into `[0, max_path_length]`.
    #[inline]
    pub fn clamp_max_path(&self, value: f32) -> f32 {
        value.clamp(0.0, self.max_path_length)
    }

    /// Clamp a per-waypoint cast radius into `[MIN_RADIUS, max_radius_check]`.
    #[inline]
    pub fn clamp_radius(&self, value: f32) -> f32 {
        value.clamp(MIN_RADIUS, self.max_radius_check.max(MIN_RADIUS))
    }
}
