//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`PathFinder`] trait, so an application can swap
//! in A* or a contraction hierarchy without touching the road model.  The
//! default [`DijkstraPathFinder`] is sufficient for networks of a few hundred
//! thousand nodes.
//!
//! # Determinism
//!
//! Heap entries are keyed by `(tentative distance, discovery index)`.  When
//! two nodes are equally far, the one discovered first is expanded first, so
//! symmetric graphs always produce the same route regardless of hashing.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tracing::debug;

use rn_core::Point;

use crate::{Graph, GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Nodes to visit in order, source and destination included.
    pub points: Vec<Point>,
    /// Sum of connection lengths along `points`.
    pub length: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.points.len() <= 1
    }

    /// Number of connections traversed.
    pub fn hops(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must never mutate the graph and must be `Send + Sync` so a
/// single instance can serve several simulation threads.
pub trait PathFinder: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields the single-point route `[from]` with length 0.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidArgument`] if either endpoint is not finite.
    /// - [`GraphError::UnreachableDestination`] if no directed path exists.
    fn route(&self, graph: &dyn Graph, from: Point, to: Point) -> GraphResult<Route>;
}

/// Dijkstra's algorithm using connection length as edge cost.
///
/// O((V + E) log V) with a binary heap.  The search stops as soon as the
/// destination is settled.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPathFinder;

impl PathFinder for DijkstraPathFinder {
    fn route(&self, graph: &dyn Graph, from: Point, to: Point) -> GraphResult<Route> {
        dijkstra(graph, from, to)
    }
}

/// Shortest route from `from` to `to` as a point sequence, both ends
/// included.  Shorthand for `DijkstraPathFinder.route(..).points`.
pub fn shortest_path(graph: &dyn Graph, from: Point, to: Point) -> GraphResult<Vec<Point>> {
    DijkstraPathFinder.route(graph, from, to).map(|r| r.points)
}

/// Euclidean length of a polyline: the sum of straight-line distances
/// between consecutive points.  Ignores any length overrides in a graph; use
/// [`Graph::path_length`] for those.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Per-node search state.
struct Label {
    dist: f64,
    /// Order in which the node was first reached.  Secondary heap key.
    discovered: usize,
    prev: Option<Point>,
    settled: bool,
}

/// Heap entry.  Ordered by distance, then discovery index.
struct Candidate {
    dist: f64,
    discovered: usize,
    node: Point,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then(self.discovered.cmp(&other.discovered))
    }
}

fn dijkstra(graph: &dyn Graph, from: Point, to: Point) -> GraphResult<Route> {
    if !from.is_finite() || !to.is_finite() {
        return Err(GraphError::InvalidArgument(format!(
            "route endpoints must be finite, got {from} -> {to}"
        )));
    }
    if from == to {
        return Ok(Route { points: vec![from], length: 0.0 });
    }

    let mut labels: FxHashMap<Point, Label> = FxHashMap::default();
    labels.insert(from, Label { dist: 0.0, discovered: 0, prev: None, settled: false });

    // Reverse makes BinaryHeap (max) behave as a min-heap.
    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
    heap.push(Reverse(Candidate { dist: 0.0, discovered: 0, node: from }));

    while let Some(Reverse(Candidate { dist, node, .. })) = heap.pop() {
        if node == to {
            let route = reconstruct(&labels, to, dist);
            debug!(%from, %to, length = route.length, hops = route.hops(), "route found");
            return Ok(route);
        }

        // Skip stale heap entries.
        match labels.get_mut(&node) {
            Some(label) if !label.settled && dist <= label.dist => label.settled = true,
            _ => continue,
        }

        for conn in graph.connections_from(node) {
            let new_dist = dist + conn.length;
            let next_discovered = labels.len();
            match labels.entry(conn.to) {
                Entry::Vacant(slot) => {
                    slot.insert(Label {
                        dist: new_dist,
                        discovered: next_discovered,
                        prev: Some(node),
                        settled: false,
                    });
                    heap.push(Reverse(Candidate {
                        dist: new_dist,
                        discovered: next_discovered,
                        node: conn.to,
                    }));
                }
                Entry::Occupied(mut slot) => {
                    let label = slot.get_mut();
                    if !label.settled && new_dist < label.dist {
                        label.dist = new_dist;
                        label.prev = Some(node);
                        heap.push(Reverse(Candidate {
                            dist: new_dist,
                            discovered: label.discovered,
                            node: conn.to,
                        }));
                    }
                }
            }
        }
    }

    debug!(%from, %to, explored = labels.len(), "destination unreachable");
    Err(GraphError::UnreachableDestination { from, to })
}

fn reconstruct(labels: &FxHashMap<Point, Label>, to: Point, length: f64) -> Route {
    let mut points = vec![to];
    let mut cur = to;
    while let Some(prev) = labels.get(&cur).and_then(|l| l.prev) {
        points.push(prev);
        cur = prev;
    }
    points.reverse();
    Route { points, length }
}
