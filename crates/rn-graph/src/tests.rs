//! Unit tests for rn-graph.
//!
//! The `graph_contract!` macro instantiates one behavioural suite per backing
//! so `ListGraph` and `TableGraph` are held to exactly the same contract.

#[cfg(test)]
mod helpers {
    use rn_core::Point;

    use crate::Graph;

    pub const A: Point = Point::new(0.0, 0.0);
    pub const B: Point = Point::new(10.0, 0.0);
    pub const C: Point = Point::new(15.0, 15.0);
    pub const D: Point = Point::new(15.0, 20.0);
    pub const E: Point = Point::new(22.0, 0.0);
    pub const F: Point = Point::new(8.0, 20.0);
    pub const G: Point = Point::new(0.0, 12.0);

    /// Seven-node directed network used by the routing tests.
    ///
    /// ```text
    ///   a→b a→c  b→a b→c  c→d c→e  d→c d→f  e→b  f→g  g→a
    /// ```
    pub fn seven_node<T: Graph + Default>() -> T {
        let mut g = T::default();
        for (from, to) in [
            (A, B), (A, C),
            (B, A), (B, C),
            (C, D), (C, E),
            (D, C), (D, F),
            (E, B),
            (F, G),
            (G, A),
        ] {
            g.add_connection(from, to).unwrap();
        }
        g
    }

    /// Connection count of `g` recomputed from `connections_from`.
    pub fn counted_connections(g: &dyn Graph) -> usize {
        g.nodes().map(|n| g.connections_from(n).count()).sum()
    }
}

// ── Shared Graph contract ─────────────────────────────────────────────────────

macro_rules! graph_contract {
    ($suite:ident, $graph:ty) => {
        #[cfg(test)]
        mod $suite {
            use rn_core::Point;

            use crate::tests::helpers::*;
            use crate::{Graph, GraphError};

            fn graph() -> $graph {
                <$graph>::default()
            }

            #[test]
            fn empty_graph() {
                let g = graph();
                assert!(g.is_empty());
                assert_eq!(g.node_count(), 0);
                assert_eq!(g.connection_count(), 0);
                assert_eq!(g.nodes().count(), 0);
                assert!(g.nearest_node(A).is_none());
            }

            #[test]
            fn add_creates_both_nodes() {
                let mut g = graph();
                g.add_connection(A, B).unwrap();
                assert!(g.contains_node(A));
                assert!(g.contains_node(B));
                assert!(!g.contains_node(C));
                assert_eq!(g.node_count(), 2);
                assert_eq!(g.connection_count(), 1);
            }

            #[test]
            fn connections_are_directed() {
                let mut g = graph();
                g.add_connection(A, B).unwrap();
                assert!(g.has_connection(A, B));
                assert!(!g.has_connection(B, A));
                assert!(matches!(
                    g.length(B, A),
                    Err(GraphError::NoSuchConnection { from, to }) if from == B && to == A
                ));
            }

            #[test]
            fn default_length_is_euclidean() {
                let mut g = graph();
                let p = Point::new(3.0, 4.0);
                g.add_connection(A, p).unwrap();
                assert_eq!(g.length(A, p).unwrap(), 5.0);
                assert!(!g.connection(A, p).unwrap().has_custom_length());
            }

            #[test]
            fn override_length() {
                let mut g = graph();
                g.add_connection_with_length(A, B, 42.0).unwrap();
                assert_eq!(g.length(A, B).unwrap(), 42.0);
                assert!(g.connection(A, B).unwrap().has_custom_length());
            }

            #[test]
            fn zero_length_allowed() {
                let mut g = graph();
                g.add_connection_with_length(A, B, 0.0).unwrap();
                assert_eq!(g.length(A, B).unwrap(), 0.0);
            }

            #[test]
            fn negative_length_rejected() {
                let mut g = graph();
                let result = g.add_connection_with_length(A, B, -1.0);
                assert!(matches!(result, Err(GraphError::InvalidArgument(_))));
                assert!(g.is_empty(), "failed insert must not create nodes");
            }

            #[test]
            fn non_finite_input_rejected() {
                let mut g = graph();
                assert!(g.add_connection_with_length(A, B, f64::NAN).is_err());
                assert!(g.add_connection(Point::new(f64::NAN, 0.0), B).is_err());
                assert!(g.add_connection(A, Point::new(0.0, f64::INFINITY)).is_err());
                assert!(g.is_empty());
            }

            #[test]
            fn re_add_overwrites_without_duplicating() {
                let mut g = graph();
                g.add_connection(A, B).unwrap();
                g.add_connection(A, C).unwrap();
                g.add_connection_with_length(A, B, 99.0).unwrap();

                assert_eq!(g.connection_count(), 2);
                assert_eq!(g.length(A, B).unwrap(), 99.0);
                // Position in iteration order is kept.
                let targets: Vec<Point> = g.connections_from(A).map(|c| c.to).collect();
                assert_eq!(targets, vec![B, C]);
            }

            #[test]
            fn connections_from_in_insertion_order() {
                let mut g = graph();
                g.add_connection(A, D).unwrap();
                g.add_connection(A, B).unwrap();
                g.add_connection(A, C).unwrap();
                let targets: Vec<Point> = g.connections_from(A).map(|c| c.to).collect();
                assert_eq!(targets, vec![D, B, C]);
                for c in g.connections_from(A) {
                    assert_eq!(c.from, A);
                }
            }

            #[test]
            fn connections_from_unknown_node_is_empty() {
                let g: $graph = seven_node();
                assert_eq!(g.connections_from(Point::new(-1.0, -1.0)).count(), 0);
                assert_eq!(g.connections_to(Point::new(-1.0, -1.0)).count(), 0);
            }

            #[test]
            fn connections_to_lists_incoming() {
                let g: $graph = seven_node();
                let sources: Vec<Point> = g.connections_to(C).map(|c| c.from).collect();
                assert_eq!(sources, vec![A, B, D]);
                for c in g.connections_to(C) {
                    assert_eq!(c.to, C);
                    assert_eq!(c.length, g.length(c.from, C).unwrap());
                }
            }

            #[test]
            fn node_with_no_outgoing_connections() {
                let mut g = graph();
                g.add_connection(A, B).unwrap();
                assert!(g.contains_node(B));
                assert_eq!(g.connections_from(B).count(), 0);
            }

            #[test]
            fn nodes_in_first_seen_order() {
                let g: $graph = seven_node();
                let nodes: Vec<Point> = g.nodes().collect();
                assert_eq!(nodes, vec![A, B, C, D, E, F, G]);
            }

            #[test]
            fn connection_count_consistent() {
                let g: $graph = seven_node();
                assert_eq!(g.connection_count(), 11);
                assert_eq!(counted_connections(&g), 11);
                assert_eq!(g.connections().count(), 11);
            }

            #[test]
            fn every_connection_endpoint_is_node() {
                let g: $graph = seven_node();
                for c in g.connections() {
                    assert!(g.contains_node(c.from));
                    assert!(g.contains_node(c.to));
                    assert!(g.has_connection(c.from, c.to));
                }
            }

            #[test]
            fn bidirectional_adds_two() {
                let mut g = graph();
                g.add_bidirectional(A, B).unwrap();
                assert!(g.has_connection(A, B));
                assert!(g.has_connection(B, A));
                assert_eq!(g.connection_count(), 2);
            }

            #[test]
            fn path_length_sums_connections() {
                let mut g = graph();
                g.add_connection(A, B).unwrap();
                g.add_connection_with_length(B, E, 3.0).unwrap();
                assert_eq!(g.path_length(&[A, B, E]).unwrap(), 13.0);
                assert_eq!(g.path_length(&[A]).unwrap(), 0.0);
                assert_eq!(g.path_length(&[]).unwrap(), 0.0);
                assert!(matches!(
                    g.path_length(&[A, E]),
                    Err(GraphError::NoSuchConnection { .. })
                ));
            }

            #[test]
            fn merge_copies_connections() {
                let mut g = graph();
                g.add_connection_with_length(A, B, 1.0).unwrap();
                let mut other = crate::ListGraph::new();
                other.add_connection_with_length(A, B, 7.0).unwrap();
                other.add_connection(B, C).unwrap();

                g.merge(&other).unwrap();
                assert_eq!(g.connection_count(), 2);
                assert_eq!(g.length(A, B).unwrap(), 7.0);
                assert!(g.has_connection(B, C));
            }

            #[test]
            fn nearest_node_snaps() {
                let g: $graph = seven_node();
                assert_eq!(g.nearest_node(Point::new(1.0, 1.0)), Some(A));
                assert_eq!(g.nearest_node(Point::new(21.0, 1.0)), Some(E));
                assert_eq!(g.nearest_node(D), Some(D));
            }

            #[test]
            fn nearest_nodes_sorted() {
                let g: $graph = seven_node();
                let near = g.nearest_nodes(Point::new(9.0, 0.0), 3);
                assert_eq!(near.len(), 3);
                assert_eq!(near[0], B);
                let ref_pt = Point::new(9.0, 0.0);
                for w in near.windows(2) {
                    assert!(ref_pt.distance(w[0]) <= ref_pt.distance(w[1]));
                }
                assert_eq!(g.nearest_nodes(ref_pt, 100).len(), 7);
            }
        }
    };
}

graph_contract!(list_graph_contract, crate::ListGraph);
graph_contract!(table_graph_contract, crate::TableGraph);

// ── Dijkstra routing ──────────────────────────────────────────────────────────

macro_rules! routing_suite {
    ($suite:ident, $graph:ty) => {
        #[cfg(test)]
        mod $suite {
            use rn_core::Point;

            use crate::tests::helpers::*;
            use crate::{DijkstraPathFinder, Graph, GraphError, PathFinder, path_length, shortest_path};

            fn net() -> $graph {
                seven_node()
            }

            #[test]
            fn seven_node_routes() {
                let g = net();
                assert_eq!(shortest_path(&g, A, D).unwrap(), vec![A, C, D]);
                assert_eq!(shortest_path(&g, D, A).unwrap(), vec![D, F, G, A]);
                assert_eq!(shortest_path(&g, G, E).unwrap(), vec![G, A, C, E]);
                assert_eq!(shortest_path(&g, A, E).unwrap(), vec![A, C, E]);
                assert_eq!(shortest_path(&g, A, C).unwrap(), vec![A, C]);
                assert_eq!(shortest_path(&g, E, G).unwrap(), vec![E, B, C, D, F, G]);
            }

            #[test]
            fn route_length_matches_path_length() {
                let g = net();
                let route = DijkstraPathFinder.route(&g, E, G).unwrap();
                assert!((route.length - path_length(&route.points)).abs() < 1e-9);
                assert!((route.length - g.path_length(&route.points).unwrap()).abs() < 1e-9);
                assert_eq!(route.hops(), 5);
            }

            #[test]
            fn trivial_same_node() {
                let g = net();
                let route = DijkstraPathFinder.route(&g, C, C).unwrap();
                assert!(route.is_trivial());
                assert_eq!(route.points, vec![C]);
                assert_eq!(route.length, 0.0);
            }

            #[test]
            fn unreachable_destination() {
                let mut g = <$graph>::default();
                g.add_connection(A, B).unwrap();
                g.add_connection(B, C).unwrap();
                for _ in 0..3 {
                    assert!(matches!(
                        shortest_path(&g, B, A),
                        Err(GraphError::UnreachableDestination { from, to }) if from == B && to == A
                    ));
                }
            }

            #[test]
            fn unknown_endpoints_unreachable() {
                let g = net();
                let outside = Point::new(100.0, 100.0);
                assert!(matches!(
                    shortest_path(&g, A, outside),
                    Err(GraphError::UnreachableDestination { .. })
                ));
                assert!(matches!(
                    shortest_path(&g, outside, A),
                    Err(GraphError::UnreachableDestination { .. })
                ));
            }

            #[test]
            fn non_finite_endpoint_rejected() {
                let g = net();
                assert!(matches!(
                    shortest_path(&g, Point::new(f64::NAN, 0.0), A),
                    Err(GraphError::InvalidArgument(_))
                ));
            }

            #[test]
            fn dead_end_branch_does_not_fail_search() {
                // q→r is a dead end; q→s→t is the only way to t.
                let q = Point::new(0.0, 10.0);
                let r = Point::new(10.0, 15.0);
                let s = Point::new(10.0, 5.0);
                let t = Point::new(20.0, 10.0);
                let mut g = <$graph>::default();
                g.add_connection(q, r).unwrap();
                g.add_connection(q, s).unwrap();
                g.add_connection(s, t).unwrap();
                assert_eq!(shortest_path(&g, q, t).unwrap(), vec![q, s, t]);
            }

            #[test]
            fn override_length_changes_route() {
                let mut g = net();
                // Make the direct a→c hop very expensive; a→b→c wins instead.
                g.add_connection_with_length(A, C, 1_000.0).unwrap();
                assert_eq!(shortest_path(&g, A, D).unwrap(), vec![A, B, C, D]);
            }

            #[test]
            fn equal_cost_tie_prefers_first_discovered() {
                // Diamond with two equal-length routes: s→l→t and s→r→t.
                let s = Point::new(0.0, 0.0);
                let l = Point::new(1.0, 1.0);
                let r = Point::new(1.0, -1.0);
                let t = Point::new(2.0, 0.0);

                let mut g = <$graph>::default();
                g.add_connection(s, l).unwrap();
                g.add_connection(s, r).unwrap();
                g.add_connection(l, t).unwrap();
                g.add_connection(r, t).unwrap();
                assert_eq!(shortest_path(&g, s, t).unwrap(), vec![s, l, t]);

                let mut g = <$graph>::default();
                g.add_connection(s, r).unwrap();
                g.add_connection(s, l).unwrap();
                g.add_connection(r, t).unwrap();
                g.add_connection(l, t).unwrap();
                assert_eq!(shortest_path(&g, s, t).unwrap(), vec![s, r, t]);
            }

            #[test]
            fn graph_unchanged_by_search() {
                let g = net();
                let before: Vec<_> = g.connections().collect();
                let _ = shortest_path(&g, E, G).unwrap();
                let _ = shortest_path(&g, B, Point::new(-5.0, -5.0));
                let after: Vec<_> = g.connections().collect();
                assert_eq!(before, after);
            }
        }
    };
}

routing_suite!(list_graph_routing, crate::ListGraph);
routing_suite!(table_graph_routing, crate::TableGraph);

// ── NodeSet ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod node_set {
    use rn_core::{NodeId, Point};

    use crate::nodes::id_for_slot;
    use crate::tests::helpers::*;
    use crate::{GraphError, NodeSet};

    #[test]
    fn intern_is_idempotent() {
        let mut set = NodeSet::new();
        assert_eq!(set.intern(A).unwrap(), (NodeId(0), true));
        assert_eq!(set.intern(B).unwrap(), (NodeId(1), true));
        assert_eq!(set.intern(A).unwrap(), (NodeId(0), false));
        assert_eq!(set.len(), 2);
        assert_eq!(set.point(NodeId(1)), B);
    }

    #[test]
    fn ensure_room_counts_distinct_new_points() {
        let mut set = NodeSet::new();
        set.intern(A).unwrap();
        assert!(set.ensure_room(&[A, A]).is_ok());
        assert!(set.ensure_room(&[B, B]).is_ok());
        assert!(set.ensure_room(&[Point::new(1.0, 1.0), C]).is_ok());
        assert_eq!(set.len(), 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn ids_past_u32_are_rejected() {
        let last = u32::MAX as usize;
        assert_eq!(id_for_slot(last).unwrap(), NodeId(u32::MAX));
        assert!(matches!(id_for_slot(last + 1), Err(GraphError::InvalidArgument(_))));
    }
}

// ── Randomised properties ─────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use rn_core::Point;

    use crate::{Graph, GraphError, ListGraph, TableGraph, shortest_path};

    /// Random sparse directed graph on a small integer grid.  Some connections
    /// carry an override length no shorter than the straight line.
    fn random_graph<G: Graph + Default>(seed: u64) -> (G, Vec<Point>) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let points: Vec<Point> = (0..12)
            .map(|_| Point::new(rng.gen_range(0..20) as f64, rng.gen_range(0..20) as f64))
            .collect();
        let mut g = G::default();
        for _ in 0..30 {
            let from = points[rng.gen_range(0..points.len())];
            let to = points[rng.gen_range(0..points.len())];
            if rng.gen_bool(0.3) {
                let length = from.distance(to) * rng.gen_range(1.0..3.0);
                g.add_connection_with_length(from, to, length).unwrap();
            } else {
                g.add_connection(from, to).unwrap();
            }
        }
        (g, points)
    }

    /// Bellman-Ford style relaxation; slow but obviously correct.
    fn reference_distance(g: &dyn Graph, from: Point, to: Point) -> Option<f64> {
        let nodes: Vec<Point> = g.nodes().collect();
        let mut dist: std::collections::HashMap<Point, f64> =
            nodes.iter().map(|&n| (n, f64::INFINITY)).collect();
        if !dist.contains_key(&from) {
            return None;
        }
        dist.insert(from, 0.0);
        for _ in 0..nodes.len() {
            for c in g.connections() {
                let via = dist[&c.from] + c.length;
                if via < dist[&c.to] {
                    dist.insert(c.to, via);
                }
            }
        }
        dist.get(&to).copied().filter(|d| d.is_finite())
    }

    fn check_optimal<G: Graph + Default>() {
        for seed in 0..40 {
            let (g, points) = random_graph::<G>(seed);
            for &u in &points {
                for &v in &points {
                    if !g.contains_node(u) || !g.contains_node(v) || u == v {
                        continue;
                    }
                    match (shortest_path(&g, u, v), reference_distance(&g, u, v)) {
                        (Ok(path), Some(best)) => {
                            assert_eq!(path.first(), Some(&u));
                            assert_eq!(path.last(), Some(&v));
                            let len = g.path_length(&path).expect("consecutive pairs are connections");
                            assert!((len - best).abs() < 1e-9, "seed {seed}: {len} vs {best}");
                        }
                        (Err(GraphError::UnreachableDestination { .. }), None) => {}
                        (got, want) => panic!("seed {seed}: {u}->{v} got {got:?}, reference {want:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn list_graph_routes_are_optimal() {
        check_optimal::<ListGraph>();
    }

    #[test]
    fn table_graph_routes_are_optimal() {
        check_optimal::<TableGraph>();
    }

    #[test]
    fn backings_agree() {
        for seed in 0..40 {
            let (list, points) = random_graph::<ListGraph>(seed);
            let (table, _) = random_graph::<TableGraph>(seed);

            assert_eq!(list.nodes().collect::<Vec<_>>(), table.nodes().collect::<Vec<_>>());
            assert_eq!(list.connection_count(), table.connection_count());
            for c in list.connections() {
                assert_eq!(table.length(c.from, c.to).unwrap(), c.length);
            }
            for &u in &points {
                let a: Vec<_> = list.connections_from(u).collect();
                let b: Vec<_> = table.connections_from(u).collect();
                assert_eq!(a, b);
                for &v in &points {
                    let a = shortest_path(&list, u, v).ok();
                    let b = shortest_path(&table, u, v).ok();
                    assert_eq!(a, b, "seed {seed}: {u}->{v}");
                }
            }
        }
    }
}
