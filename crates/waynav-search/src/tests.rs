//! Unit tests for waynav-search.
//!
//! Graphs are built against a real `StaticWorld` and rebuilt directly (no
//! scheduler) so each test controls exactly what the search sees.

mod helpers {
    use waynav_core::{NavConfig, Vec3, WaypointId};
    use waynav_graph::{WaypointGraph, WaypointParams};
    use waynav_world::{CollisionWorld, Shape, StaticWorld};

    pub struct Fixture {
        pub graph: WaypointGraph,
        pub world: StaticWorld,
        pub config: NavConfig,
    }

    impl Fixture {
        pub fn new(config: NavConfig) -> Self {
            Self { graph: WaypointGraph::new(), world: StaticWorld::new(), config }
        }

        pub fn add(&mut self, position: Vec3) -> WaypointId {
            self.add_params(WaypointParams::at(position).max_path(self.config.max_path_length))
        }

        pub fn add_params(&mut self, params: WaypointParams) -> WaypointId {
            let id = self.graph.insert(params, &self.config);
            let wp = self.graph.get(id).expect("just inserted");
            let body = self.world.add_body(
                wp.position,
                Shape::Sphere { radius: wp.radius },
                self.config.waypoint_layers,
                Some(id),
            );
            self.graph.get_mut(id).expect("just inserted").body = body;
            id
        }

        pub fn rebuild_all(&mut self) {
            let ids: Vec<WaypointId> = self.graph.iter().map(|(id, _)| id).collect();
            let mut buf = vec![Default::default(); self.config.overlap_buffer_len];
            let mut touched = Vec::new();
            for id in ids {
                self.graph.rebuild(id, &self.world, &self.config, &mut buf, &mut touched);
            }
        }
    }

    /// A(0) — B(5) — C(10) on the x axis, adjacent pairs linked.
    pub fn collinear() -> (Fixture, [WaypointId; 3]) {
        let mut f = Fixture::new(NavConfig { max_path_length: 6.0, ..NavConfig::default() });
        let a = f.add(Vec3::ZERO);
        let b = f.add(Vec3::new(5.0, 0.0, 0.0));
        let c = f.add(Vec3::new(10.0, 0.0, 0.0));
        f.rebuild_all();
        (f, [a, b, c])
    }

    /// A chain of `n` waypoints spaced 4 apart on the x axis.
    pub fn chain(n: usize) -> Fixture {
        let mut f = Fixture::new(NavConfig::default());
        for i in 0..n {
            f.add(Vec3::new(i as f32 * 4.0, 0.0, 0.0));
        }
        f.rebuild_all();
        f
    }
}

mod trivial_paths {
    use waynav_core::Vec3;

    use super::helpers::{collinear, Fixture};
    use crate::{PathQuery, PathSearch};
    use waynav_core::NavConfig;

    #[test]
    fn no_waypoint_in_range_goes_direct() {
        let mut f = Fixture::new(NavConfig::default());
        let start = Vec3::new(500.0, 0.0, 0.0);
        let goal = Vec3::new(510.0, 0.0, 0.0);
        let mut query = PathQuery::new(start, goal);
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);
        assert_eq!(query.path, vec![start, goal]);
        assert_eq!(query.node_traversal_count, 0);
    }

    #[test]
    fn start_already_at_goal_goes_direct() {
        let (mut f, _) = collinear();
        let start = Vec3::new(1.0, 0.0, 0.0);
        let goal = Vec3::new(1.05, 0.0, 0.0);
        let mut query = PathQuery::new(start, goal);
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);
        assert_eq!(query.path, vec![start, goal]);
    }

    #[test]
    fn shared_nearest_node_goes_direct() {
        let (mut f, _) = collinear();
        // Both ends snap to B.
        let start = Vec3::new(4.0, 0.0, 0.0);
        let goal = Vec3::new(6.0, 0.0, 0.0);
        let mut query = PathQuery::new(start, goal);
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);
        assert_eq!(query.path, vec![start, goal]);
    }

    #[test]
    fn direct_beats_graph_detour() {
        let (mut f, _) = collinear();
        // Start snaps to B, goal snaps to C, but the straight line between
        // them is shorter than C's distance to the goal.
        let start = Vec3::new(6.5, 0.0, 0.0);
        let goal = Vec3::new(7.6, 0.0, 0.0);
        let mut query = PathQuery::new(start, goal);
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);
        assert_eq!(query.path, vec![start, goal]);
    }
}

mod search {
    use std::cell::Cell;
    use std::rc::Rc;

    use waynav_core::{NavConfig, Vec3};
    use waynav_graph::Waypoint;

    use super::helpers::{chain, collinear, Fixture};
    use crate::{PathQuery, PathSearch, SearchPolicy};

    #[test]
    fn collinear_route_visits_middle_waypoint() {
        let (mut f, [_a, b, c]) = collinear();
        let b_pos = f.graph.get(b).unwrap().position;
        let c_pos = f.graph.get(c).unwrap().position;

        let mut query = PathQuery::new(Vec3::ZERO, c_pos);
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);

        assert_eq!(query.path, vec![b_pos, c_pos], "route must pass through B");
        assert!(query.node_traversal_count >= 1);
    }

    #[test]
    fn iteration_budget_is_respected() {
        let mut f = chain(12);
        f.config.max_node_traversal = 2;
        let goal = Vec3::new(44.0, 0.0, 0.0);
        let mut query = PathQuery::new(Vec3::ZERO, goal);
        query.max_pathing_distance = 1_000.0;

        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);
        assert!(query.node_traversal_count <= 2);
        assert!(!query.path.is_empty(), "budget exhaustion still yields a path");
    }

    #[test]
    fn pathing_distance_abort_returns_partial_path() {
        let mut f = chain(10);
        let goal = Vec3::new(36.0, 0.0, 0.0);
        let mut query = PathQuery::new(Vec3::ZERO, goal);
        query.max_pathing_distance = 6.0;

        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);

        assert!(
            query.node_traversal_count < f.config.max_node_traversal,
            "abort must fire well before the iteration bound"
        );
        // Best-effort: a prefix of the chain, closed out with the goal.
        assert_eq!(query.path.last(), Some(&goal));
        assert!(query.path.len() < 10, "full chain must not be traversed");
        assert!(query.path.contains(&Vec3::new(4.0, 0.0, 0.0)));
    }

    struct IgnorePosition {
        position: Vec3,
        calls: Rc<Cell<usize>>,
    }

    impl SearchPolicy for IgnorePosition {
        fn ignore(&self, waypoint: &Waypoint) -> bool {
            if waypoint.position == self.position {
                self.calls.set(self.calls.get() + 1);
                return true;
            }
            false
        }
    }

    #[test]
    fn ignore_predicate_is_memoized_per_search() {
        // Diamond: D is reachable from both B and C, so an unmemoized
        // predicate would fire twice for it.
        let mut f = Fixture::new(NavConfig::default());
        let _a = f.add(Vec3::ZERO);
        let _b = f.add(Vec3::new(4.0, 1.0, 0.0));
        let _c = f.add(Vec3::new(4.0, -1.0, 0.0));
        let d_pos = Vec3::new(8.0, 0.0, 0.0);
        let _d = f.add(d_pos);
        f.rebuild_all();

        let calls = Rc::new(Cell::new(0));
        // Goal far outside graph coverage: no end node, exhaustive search.
        let mut query = PathQuery::new(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0))
            .with_policy(IgnorePosition { position: d_pos, calls: Rc::clone(&calls) });

        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);
        assert_eq!(calls.get(), 1, "ignore predicate must fire once per node per run");
    }

    struct GoalAtPosition(Vec3);

    impl SearchPolicy for GoalAtPosition {
        fn is_goal(&self, waypoint: &Waypoint) -> bool {
            waypoint.position == self.0
        }
    }

    #[test]
    fn goal_predicate_terminates_the_search() {
        let (mut f, [_a, b, c]) = collinear();
        let b_pos = f.graph.get(b).unwrap().position;
        let c_pos = f.graph.get(c).unwrap().position;

        let mut query = PathQuery::new(Vec3::ZERO, c_pos).with_policy(GoalAtPosition(b_pos));
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);

        // Accepted at B: the polyline stops there (plus the original goal
        // appended, which is farther than the snap threshold from B).
        assert_eq!(query.path, vec![b_pos, c_pos]);
    }

    struct PenaltyAtPosition {
        position: Vec3,
        surcharge: f32,
    }

    impl SearchPolicy for PenaltyAtPosition {
        fn penalty(&self, waypoint: &Waypoint) -> f32 {
            if waypoint.position == self.position {
                self.surcharge
            } else {
                waypoint.penalty
            }
        }
    }

    #[test]
    fn penalty_steers_between_equal_routes() {
        // Two symmetric routes A→B→D / A→C→D; a heavy surcharge on B makes
        // the frontier prefer C.
        let mut f = Fixture::new(NavConfig::default());
        let a_pos = Vec3::ZERO;
        let b_pos = Vec3::new(4.0, 1.0, 0.0);
        let c_pos = Vec3::new(4.0, -1.0, 0.0);
        let d_pos = Vec3::new(8.0, 0.0, 0.0);
        for p in [a_pos, b_pos, c_pos, d_pos] {
            f.add(p);
        }
        f.rebuild_all();

        let mut query = PathQuery::new(a_pos, d_pos)
            .with_policy(PenaltyAtPosition { position: b_pos, surcharge: 50.0 });
        PathSearch::new().find_path(&mut f.graph, &f.world, &f.config, &mut query);

        assert!(query.path.contains(&c_pos), "cheap route must win: {:?}", query.path);
        assert!(!query.path.contains(&b_pos));
        assert_eq!(query.path.last(), Some(&d_pos));
    }
}

mod next_position {
    use waynav_core::Vec3;

    use crate::PathQuery;

    #[test]
    fn advances_to_the_lookahead_point() {
        let mut query = PathQuery::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        query.path = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)];
        // |path[1] - current| = 5 ≤ |path[1] - path[0]| + 0.1 = 4.1?  No:
        // 5 > 4.1, so the agent has fallen behind and steers to path[0].
        assert_eq!(query.next_position(), Vec3::new(1.0, 0.0, 0.0));

        // Once alongside path[0], the lookahead point takes over.
        query.current_position = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(query.next_position(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn short_paths_head_for_the_goal() {
        let goal = Vec3::new(3.0, 0.0, 0.0);
        let mut query = PathQuery::new(Vec3::ZERO, goal);
        assert_eq!(query.next_position(), goal);
        query.path = vec![goal];
        assert_eq!(query.next_position(), goal);
    }

    #[test]
    fn direction_is_normalized_and_total() {
        let mut query = PathQuery::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 9.0));
        let dir = query.direction_to_next();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(dir, Vec3::new(0.0, 0.0, 1.0));

        // Agent standing on its target: no NaN, just zero.
        query.goal_position = Vec3::ZERO;
        assert_eq!(query.direction_to_next(), Vec3::ZERO);
    }
}
