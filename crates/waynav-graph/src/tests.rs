//! Unit tests for waynav-graph.
//!
//! All tests drive the graph against a hand-built `StaticWorld` so the
//! query port is exercised for real, without the scheduler.

mod helpers {
    use waynav_core::{NavConfig, Vec3, WaypointId};
    use waynav_world::{CollisionWorld, Shape, StaticWorld};

    use crate::{WaypointGraph, WaypointParams};

    pub fn config() -> NavConfig {
        NavConfig { max_path_length: 6.0, ..NavConfig::default() }.sanitized()
    }

    /// Insert a waypoint and register its collision body, the way the
    /// engine's add-waypoint entry point does.
    pub fn add_wp(
        graph: &mut WaypointGraph,
        world: &mut StaticWorld,
        config: &NavConfig,
        params: WaypointParams,
    ) -> WaypointId {
        let id = graph.insert(params, config);
        let wp = graph.get(id).expect("just inserted");
        let body = world.add_body(
            wp.position,
            Shape::Sphere { radius: wp.radius },
            config.waypoint_layers,
            Some(id),
        );
        graph.get_mut(id).expect("just inserted").body = body;
        id
    }

    /// Three collinear waypoints A(0) — B(5) — C(10), pairwise reachable
    /// only between adjacent pairs (max_path_length = 6).
    pub fn collinear() -> (WaypointGraph, StaticWorld, NavConfig, [WaypointId; 3]) {
        let config = config();
        let mut graph = WaypointGraph::new();
        let mut world = StaticWorld::new();
        let a = add_wp(&mut graph, &mut world, &config, WaypointParams::at(Vec3::ZERO).max_path(6.0));
        let b = add_wp(
            &mut graph,
            &mut world,
            &config,
            WaypointParams::at(Vec3::new(5.0, 0.0, 0.0)).max_path(6.0),
        );
        let c = add_wp(
            &mut graph,
            &mut world,
            &config,
            WaypointParams::at(Vec3::new(10.0, 0.0, 0.0)).max_path(6.0),
        );
        (graph, world, config, [a, b, c])
    }

    pub fn rebuild_all(graph: &mut WaypointGraph, world: &StaticWorld, config: &NavConfig) {
        let ids: Vec<WaypointId> = graph.iter().map(|(id, _)| id).collect();
        let mut buf = vec![Default::default(); config.overlap_buffer_len];
        let mut touched = Vec::new();
        for id in ids {
            graph.rebuild(id, world, config, &mut buf, &mut touched);
        }
    }
}

mod pool {
    use waynav_core::WaypointId;

    use crate::EdgePool;

    #[test]
    fn reuse_overwrites_both_fields() {
        let mut pool = EdgePool::new();
        let slot = pool.alloc(WaypointId(1), 4.0);
        pool.release(slot);
        assert_eq!(pool.free_count(), 1);

        let reused = pool.alloc(WaypointId(9), 0.25);
        assert_eq!(reused, slot, "freelist must recycle the released slot");
        assert_eq!(pool.get(reused).target, WaypointId(9));
        assert_eq!(pool.get(reused).distance, 0.25);
        assert_eq!(pool.capacity(), 1, "no new record allocated");
    }
}

mod rebuild {
    use waynav_core::{BodyHandle, Vec3, WaypointId};
    use waynav_world::{CollisionWorld, Shape, StaticWorld};

    use super::helpers::{add_wp, collinear, config, rebuild_all};
    use crate::{WaypointGraph, WaypointParams};

    /// Sorted ascending, no self-edge, no duplicate target — the §rebuild
    /// invariant, checked for every node.
    fn assert_edge_invariant(graph: &WaypointGraph) {
        for (id, _) in graph.iter() {
            let edges: Vec<(WaypointId, f32)> = graph.edges(id).collect();
            let mut seen = Vec::new();
            let mut last = 0.0f32;
            for (target, dist) in edges {
                assert_ne!(target, id, "self-edge at {id}");
                assert!(!seen.contains(&target), "duplicate edge {id} -> {target}");
                assert!(dist >= last, "edges at {id} not sorted ascending");
                seen.push(target);
                last = dist;
            }
        }
    }

    #[test]
    fn collinear_connectivity() {
        let (mut graph, world, config, [a, b, c]) = collinear();
        rebuild_all(&mut graph, &world, &config);

        assert_edge_invariant(&graph);
        let a_targets: Vec<WaypointId> = graph.edges(a).map(|(t, _)| t).collect();
        let b_targets: Vec<WaypointId> = graph.edges(b).map(|(t, _)| t).collect();
        assert_eq!(a_targets, vec![b], "A reaches only B (C is out of range)");
        assert_eq!(b_targets.len(), 2, "B reaches both A and C");
        assert!(b_targets.contains(&a) && b_targets.contains(&c));
    }

    #[test]
    fn max_path_filters_reachable_candidates() {
        let config = config();
        let mut graph = WaypointGraph::new();
        let mut world = StaticWorld::new();
        // B is within the global query range of A but beyond A's own max_path.
        let a = add_wp(&mut graph, &mut world, &config, WaypointParams::at(Vec3::ZERO).max_path(2.0));
        let _b = add_wp(
            &mut graph,
            &mut world,
            &config,
            WaypointParams::at(Vec3::new(4.0, 0.0, 0.0)),
        );
        rebuild_all(&mut graph, &world, &config);
        assert_eq!(graph.edge_count(a), 0);
    }

    #[test]
    fn blocking_geometry_cuts_edges() {
        let (mut graph, mut world, config, [a, b, _c]) = collinear();
        // Wall between A and B on the blocking layer.
        world.add_body(
            Vec3::new(2.5, 0.0, 0.0),
            Shape::Box { half_extents: Vec3::new(0.25, 2.0, 2.0) },
            config.blocking_layers,
            None,
        );
        rebuild_all(&mut graph, &world, &config);

        assert_eq!(graph.edge_count(a), 0, "wall severs A-B");
        let b_targets: Vec<WaypointId> = graph.edges(b).map(|(t, _)| t).collect();
        assert!(!b_targets.contains(&a), "reciprocal side severed too");
        assert_eq!(b_targets.len(), 1, "B-C survives");
    }

    #[test]
    fn rebuild_reports_kept_candidates_as_touched() {
        let (mut graph, world, config, [a, b, _c]) = collinear();
        let mut buf = vec![BodyHandle::INVALID; config.overlap_buffer_len];
        let mut touched = Vec::new();
        graph.rebuild(a, &world, &config, &mut buf, &mut touched);
        assert_eq!(touched, vec![b]);

        // A neighbour-only refresh never propagates and re-derives the
        // same edges.
        graph.refresh_neighbours(a, &world, &config, &mut buf);
        assert_eq!(graph.edges(a).map(|(t, _)| t).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn inactive_candidates_are_invisible() {
        let (mut graph, world, config, [a, b, _c]) = collinear();
        graph.get_mut(b).unwrap().active = false;
        rebuild_all(&mut graph, &world, &config);
        assert_eq!(graph.edge_count(a), 0, "suppressed B must not be linked");
    }

    #[test]
    fn insert_clamps_against_config() {
        let config = config();
        let mut graph = WaypointGraph::new();
        let id = graph.insert(
            WaypointParams::at(Vec3::ZERO).max_path(1000.0).radius(50.0),
            &config,
        );
        let wp = graph.get(id).unwrap();
        assert_eq!(wp.max_path, config.max_path_length);
        assert_eq!(wp.radius, config.max_radius_check);
    }
}

mod removal {
    use super::helpers::{collinear, rebuild_all};

    #[test]
    fn remove_leaves_no_dangling_edges() {
        let (mut graph, world, config, [a, b, c]) = collinear();
        rebuild_all(&mut graph, &world, &config);
        let pool_free_before = graph.pool.free_count();

        let mut touched = Vec::new();
        let body = graph.remove(b, &mut touched);
        assert!(body.is_some());
        assert!(touched.contains(&a) && touched.contains(&c));
        assert!(graph.get(b).is_none());

        for (id, _) in graph.iter() {
            assert!(
                graph.edges(id).all(|(t, _)| t != b),
                "dangling edge to removed waypoint at {id}"
            );
        }
        // B held 2 edges and A/C each held a reciprocal: 4 records freed.
        assert_eq!(graph.pool.free_count(), pool_free_before + 4);
    }

    #[test]
    fn detach_keeps_the_node() {
        let (mut graph, world, config, [a, b, _c]) = collinear();
        rebuild_all(&mut graph, &world, &config);

        let mut touched = Vec::new();
        graph.detach(b, &mut touched);
        assert!(graph.get(b).is_some());
        assert_eq!(graph.edge_count(b), 0);
        assert!(graph.edges(a).all(|(t, _)| t != b));
    }

    #[test]
    fn stale_ids_are_skipped() {
        let (mut graph, world, config, [_a, b, _c]) = collinear();
        let mut touched = Vec::new();
        graph.remove(b, &mut touched);
        touched.clear();

        // Second removal and repairs on the stale ID are all no-ops.
        assert!(graph.remove(b, &mut touched).is_none());
        let mut buf = vec![Default::default(); config.overlap_buffer_len];
        graph.rebuild(b, &world, &config, &mut buf, &mut touched);
        graph.refresh_neighbours(b, &world, &config, &mut buf);
        assert!(graph.get(b).is_none());
        assert!(matches!(
            graph.waypoint(b),
            Err(crate::GraphError::WaypointNotFound(id)) if id == b
        ));
        assert!(touched.is_empty());
    }
}

mod closest {
    use waynav_core::{BodyHandle, Vec3};

    use super::helpers::collinear;

    #[test]
    fn picks_nearest_active_waypoint() {
        let (mut graph, world, config, [a, b, _c]) = collinear();
        let mut buf = vec![BodyHandle::INVALID; config.overlap_buffer_len];

        let near_a = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(graph.closest_waypoint(&world, &config, near_a, &mut buf), Some(a));

        // Suppressing A shifts the result to B.
        graph.get_mut(a).unwrap().active = false;
        assert_eq!(graph.closest_waypoint(&world, &config, near_a, &mut buf), Some(b));

        // Far away from every waypoint: no candidate in query range.
        let far = Vec3::new(1000.0, 0.0, 0.0);
        assert_eq!(graph.closest_waypoint(&world, &config, far, &mut buf), None);
    }
}
