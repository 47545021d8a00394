//! Adjacency-table graph backing.
//!
//! Conceptually a sparse `node × node` matrix: occupied cells live in a hash
//! map keyed by `(from, to)`, so membership and length lookups are O(1).  Row
//! and column occupancy lists remember the order cells were filled, which
//! keeps `connections_from` / `connections_to` in insertion order.

use rustc_hash::FxHashMap;
use tracing::trace;

use rn_core::{NodeId, Point};

use crate::graph::check_connection;
use crate::{Connection, Graph, GraphResult, NodeSet};

/// [`Graph`] backed by a sparse adjacency table.
#[derive(Debug, Default)]
pub struct TableGraph {
    nodes: NodeSet,
    /// `(from, to) → length` for every connection.
    cells: FxHashMap<(NodeId, NodeId), f64>,
    /// Occupied columns of each row, in fill order.  Indexed by `NodeId`.
    rows: Vec<Vec<NodeId>>,
    /// Occupied rows of each column, in fill order.  Indexed by `NodeId`.
    columns: Vec<Vec<NodeId>>,
}

impl TableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, p: Point) -> GraphResult<NodeId> {
        let (id, fresh) = self.nodes.intern(p)?;
        if fresh {
            self.rows.push(Vec::new());
            self.columns.push(Vec::new());
        }
        Ok(id)
    }

    fn cell(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.cells.get(&(from, to)).copied()
    }
}

impl Graph for TableGraph {
    fn add_connection_with_length(&mut self, from: Point, to: Point, length: f64) -> GraphResult<()> {
        check_connection(from, to, length)?;
        self.nodes.ensure_room(&[from, to])?;
        let f = self.intern(from)?;
        let t = self.intern(to)?;

        if self.cells.insert((f, t), length).is_some() {
            trace!(%from, %to, length, "connection length overwritten");
        } else {
            self.rows[f.index()].push(t);
            self.columns[t.index()].push(f);
        }
        Ok(())
    }

    fn connection(&self, from: Point, to: Point) -> Option<Connection> {
        let f = self.nodes.id(from)?;
        let t = self.nodes.id(to)?;
        self.cell(f, t).map(|length| Connection { from, to, length })
    }

    fn contains_node(&self, p: Point) -> bool {
        self.nodes.contains(p)
    }

    fn connections_from(&self, node: Point) -> Box<dyn Iterator<Item = Connection> + '_> {
        let Some(f) = self.nodes.id(node) else {
            return Box::new(std::iter::empty());
        };
        Box::new(self.rows[f.index()].iter().filter_map(move |&t| {
            self.cell(f, t).map(|length| Connection {
                from: node,
                to: self.nodes.point(t),
                length,
            })
        }))
    }

    fn connections_to(&self, node: Point) -> Box<dyn Iterator<Item = Connection> + '_> {
        let Some(t) = self.nodes.id(node) else {
            return Box::new(std::iter::empty());
        };
        Box::new(self.columns[t.index()].iter().filter_map(move |&f| {
            self.cell(f, t).map(|length| Connection {
                from: self.nodes.point(f),
                to: node,
                length,
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
        self.cells.len()
    }

    fn nearest_node(&self, p: Point) -> Option<Point> {
        self.nodes.nearest(p)
    }

    fn nearest_nodes(&self, p: Point, k: usize) -> Vec<Point> {
        self.nodes.k_nearest(p, k)
    }
}
