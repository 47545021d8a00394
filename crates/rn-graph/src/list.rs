//! Adjacency-list graph backing.
//!
//! Each node owns a `Vec` of outgoing edges (in insertion order) and a `Vec`
//! of incoming source ids.  Membership checks scan the source node's edge
//! list, which is short for road networks (out-degree rarely exceeds 4).

use tracing::trace;

use rn_core::{NodeId, Point};

use crate::graph::check_connection;
use crate::{Connection, Graph, GraphResult, NodeSet};

#[derive(Copy, Clone, Debug)]
struct Edge {
    to: NodeId,
    length: f64,
}

/// [`Graph`] backed by per-node adjacency lists.
///
/// # Example
///
/// ```
/// use rn_core::Point;
/// use rn_graph::{Graph, ListGraph};
///
/// let mut g = ListGraph::new();
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// g.add_connection(a, b).unwrap();
/// assert_eq!(g.length(a, b).unwrap(), 5.0);
/// assert!(!g.has_connection(b, a)); // directed
/// ```
#[derive(Debug, Default)]
pub struct ListGraph {
    nodes: NodeSet,
    /// Outgoing edges, indexed by `NodeId`.
    outgoing: Vec<Vec<Edge>>,
    /// Sources of incoming edges, indexed by `NodeId`.
    incoming: Vec<Vec<NodeId>>,
    connection_count: usize,
}

impl ListGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, p: Point) -> GraphResult<NodeId> {
        let (id, fresh) = self.nodes.intern(p)?;
        if fresh {
            self.outgoing.push(Vec::new());
            self.incoming.push(Vec::new());
        }
        Ok(id)
    }

    fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.outgoing[from.index()].iter().find(|e| e.to == to)
    }
}

impl Graph for ListGraph {
    fn add_connection_with_length(&mut self, from: Point, to: Point, length: f64) -> GraphResult<()> {
        check_connection(from, to, length)?;
        self.nodes.ensure_room(&[from, to])?;
        let f = self.intern(from)?;
        let t = self.intern(to)?;

        if let Some(edge) = self.outgoing[f.index()].iter_mut().find(|e| e.to == t) {
            trace!(%from, %to, length, "connection length overwritten");
            edge.length = length;
            return Ok(());
        }
        self.outgoing[f.index()].push(Edge { to: t, length });
        self.incoming[t.index()].push(f);
        self.connection_count += 1;
        Ok(())
    }

    fn connection(&self, from: Point, to: Point) -> Option<Connection> {
        let f = self.nodes.id(from)?;
        let t = self.nodes.id(to)?;
        self.edge(f, t).map(|e| Connection { from, to, length: e.length })
    }

    fn contains_node(&self, p: Point) -> bool {
        self.nodes.contains(p)
    }

    fn connections_from(&self, node: Point) -> Box<dyn Iterator<Item = Connection> + '_> {
        let Some(f) = self.nodes.id(node) else {
            return Box::new(std::iter::empty());
        };
        Box::new(self.outgoing[f.index()].iter().map(move |e| Connection {
            from: node,
            to: self.nodes.point(e.to),
            length: e.length,
        }))
    }

    fn connections_to(&self, node: Point) -> Box<dyn Iterator<Item = Connection> + '_> {
        let Some(t) = self.nodes.id(node) else {
            return Box::new(std::iter::empty());
        };
        Box::new(self.incoming[t.index()].iter().filter_map(move |&f| {
            self.edge(f, t).map(|e| Connection {
                from: self.nodes.point(f),
                to: node,
                length: e.length,
            })
        }))
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(self.nodes.iter())
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn connection_count(&self) -> usize {
        self.connection_count
    }

    fn nearest_node(&self, p: Point) -> Option<Point> {
        self.nodes.nearest(p)
    }

    fn nearest_nodes(&self, p: Point, k: usize) -> Vec<Point> {
        self.nodes.k_nearest(p, k)
    }
}
