//! The `Graph` capability set shared by every backing.
//!
//! Nodes are not added on their own: a node exists because it is an endpoint
//! of at least one connection.  Connections are directed, so `a → b` says
//! nothing about `b → a`.

use rn_core::Point;

use crate::{GraphError, GraphResult};

// ── Connection ────────────────────────────────────────────────────────────────

/// A directed, weighted edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub from: Point,
    pub to: Point,
    /// Traversal length.  Euclidean distance between the endpoints unless an
    /// override was supplied when the connection was added.
    pub length: f64,
}

impl Connection {
    /// `true` if `length` differs from the straight-line distance.
    pub fn has_custom_length(&self) -> bool {
        self.length != self.from.distance(self.to)
    }
}

// ── Graph trait ───────────────────────────────────────────────────────────────

/// Directed weighted graph over [`Point`] nodes.
///
/// The trait is object safe; routing and the road model take `&dyn Graph` so
/// that [`ListGraph`](crate::ListGraph) and [`TableGraph`](crate::TableGraph)
/// can be swapped without touching callers.
///
/// Iteration order is part of the contract: `nodes()` yields nodes in the
/// order they were first seen and `connections_from()` yields connections in
/// the order they were first added.  Shortest-path tie-breaking relies on it.
pub trait Graph {
    /// Add `from → to` with an explicit length.
    ///
    /// Re-adding an existing connection overwrites its length; it does not
    /// create a duplicate or move the connection in iteration order.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidArgument`] if either point is not finite or
    /// `length` is negative or not finite.
    fn add_connection_with_length(&mut self, from: Point, to: Point, length: f64) -> GraphResult<()>;

    /// Connection data for `from → to`, if present.
    fn connection(&self, from: Point, to: Point) -> Option<Connection>;

    /// `true` if `p` is an endpoint of any connection.
    fn contains_node(&self, p: Point) -> bool;

    /// Outgoing connections of `node` in insertion order.  Empty for points
    /// that are not nodes.
    fn connections_from(&self, node: Point) -> Box<dyn Iterator<Item = Connection> + '_>;

    /// Incoming connections of `node`, in the order they were added.
    fn connections_to(&self, node: Point) -> Box<dyn Iterator<Item = Connection> + '_>;

    /// All nodes, in the order they were first seen.
    fn nodes(&self) -> Box<dyn Iterator<Item = Point> + '_>;

    fn node_count(&self) -> usize;

    fn connection_count(&self) -> usize;

    /// The node closest to `p`, or `None` for an empty graph.
    ///
    /// Equidistant candidates are resolved by the spatial index, not by
    /// insertion order.
    fn nearest_node(&self, p: Point) -> Option<Point>;

    /// Up to `k` nodes sorted by ascending distance to `p`.
    fn nearest_nodes(&self, p: Point, k: usize) -> Vec<Point>;

    // ── Provided ──────────────────────────────────────────────────────────

    /// Add `from → to` with its Euclidean length.
    fn add_connection(&mut self, from: Point, to: Point) -> GraphResult<()> {
        check_points(from, to)?;
        self.add_connection_with_length(from, to, from.distance(to))
    }

    /// Add `a → b` and `b → a`, both with Euclidean length.
    fn add_bidirectional(&mut self, a: Point, b: Point) -> GraphResult<()> {
        self.add_connection(a, b)?;
        self.add_connection(b, a)
    }

    fn has_connection(&self, from: Point, to: Point) -> bool {
        self.connection(from, to).is_some()
    }

    /// Length of `from → to`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchConnection`] if the connection is absent.
    fn length(&self, from: Point, to: Point) -> GraphResult<f64> {
        self.connection(from, to)
            .map(|c| c.length)
            .ok_or(GraphError::NoSuchConnection { from, to })
    }

    /// Every connection, grouped by source node.
    fn connections(&self) -> Box<dyn Iterator<Item = Connection> + '_> {
        Box::new(self.nodes().flat_map(move |n| self.connections_from(n)))
    }

    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Sum of connection lengths along `path`.  A path of zero or one point
    /// has length 0.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchConnection`] for the first consecutive pair that is
    /// not a connection.
    fn path_length(&self, path: &[Point]) -> GraphResult<f64> {
        path.windows(2)
            .map(|w| self.length(w[0], w[1]))
            .sum()
    }

    /// Copy every connection of `other` into `self`, overwriting lengths of
    /// connections both graphs share.
    fn merge(&mut self, other: &dyn Graph) -> GraphResult<()> {
        for c in other.connections() {
            self.add_connection_with_length(c.from, c.to, c.length)?;
        }
        Ok(())
    }
}

/// Shared argument check for connection insertion.
pub(crate) fn check_points(from: Point, to: Point) -> GraphResult<()> {
    if !from.is_finite() || !to.is_finite() {
        return Err(GraphError::InvalidArgument(format!(
            "connection endpoints must be finite, got {from} -> {to}"
        )));
    }
    Ok(())
}

/// Shared argument check for connection insertion with an explicit length.
pub(crate) fn check_connection(from: Point, to: Point, length: f64) -> GraphResult<()> {
    check_points(from, to)?;
    if !length.is_finite() || length < 0.0 {
        return Err(GraphError::InvalidArgument(format!(
            "connection length must be finite and non-negative, got {length}"
        )));
    }
    Ok(())
}
