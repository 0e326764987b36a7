//! Engine observer trait for diagnostics and instrumentation.

use waynav_core::{QueryId, Tick, WaypointId};
use waynav_search::PathQuery;

/// Work performed during one [`NavEngine::tick`][crate::NavEngine::tick].
#[derive(Copy, Clone, Default, Debug)]
pub struct TickReport {
    /// Neighbour-only edge refreshes processed.
    pub neighbour_refreshes: usize,
    /// Full edge rebuilds processed.
    pub rebuilds: usize,
    /// Path queries recomputed.
    pub path_recomputes: usize,
    /// Waypoints deactivated by the obstacle monitor.
    pub suppressed: usize,
    /// Waypoints reactivated by the obstacle monitor.
    pub restored: usize,
}

/// Callbacks invoked by [`NavEngine::tick`][crate::NavEngine::tick] at key
/// points in the frame.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — budget logger
///
/// ```rust,ignore
/// struct BudgetLogger;
///
/// impl NavObserver for BudgetLogger {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
///         if report.rebuilds > 0 {
///             println!("{tick}: rebuilt {} waypoints", report.rebuilds);
///         }
///     }
/// }
/// ```
pub trait NavObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the work tally.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called after a registered query's path is recomputed, with the
    /// fresh result still in place.
    fn on_path_recomputed(&mut self, _tick: Tick, _query: QueryId, _state: &PathQuery) {}

    /// Called when the obstacle monitor deactivates a waypoint.
    fn on_waypoint_suppressed(&mut self, _tick: Tick, _waypoint: WaypointId) {}

    /// Called when the obstacle monitor reactivates a waypoint.
    fn on_waypoint_restored(&mut self, _tick: Tick, _waypoint: WaypointId) {}
}

/// A [`NavObserver`] that does nothing.  Use when you need to call `tick`
/// but don't want callbacks.
pub struct NoopObserver;

impl NavObserver for NoopObserver {}
