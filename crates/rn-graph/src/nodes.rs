//! Node interning and spatial index.
//!
//! # Data layout
//!
//! Every backing keeps its nodes in a `NodeSet`: a dense `Vec<Point>` indexed
//! by `NodeId` (first-seen order), a hash map from `Point` back to `NodeId`,
//! and an R-tree (via `rstar`) used to snap arbitrary coordinates to the
//! nearest node.  The R-tree is grown incrementally because graphs are built
//! connection by connection rather than bulk-loaded.

use std::fmt;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use rn_core::{NodeId, Point};

use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NodeSet ───────────────────────────────────────────────────────────────────

/// Insertion-ordered set of graph nodes with O(1) lookup and nearest-node
/// queries.
pub struct NodeSet {
    points: Vec<Point>,
    ids: FxHashMap<Point, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            ids: FxHashMap::default(),
            spatial_idx: RTree::new(),
        }
    }

    /// Return the id of `p`, interning it first if it is new.
    ///
    /// The boolean is `true` when `p` was inserted by this call.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidArgument`] if the set is out of node ids.
    pub fn intern(&mut self, p: Point) -> GraphResult<(NodeId, bool)> {
        if let Some(&id) = self.ids.get(&p) {
            return Ok((id, false));
        }
        let id = id_for_slot(self.points.len())?;
        self.points.push(p);
        self.ids.insert(p, id);
        self.spatial_idx.insert(NodeEntry { point: [p.x, p.y], id });
        Ok((id, true))
    }

    /// Check that interning every point of `points` would succeed, so a
    /// connection is never left with only one endpoint added.
    pub fn ensure_room(&self, points: &[Point]) -> GraphResult<()> {
        let mut fresh = 0;
        for (i, p) in points.iter().enumerate() {
            if !self.contains(*p) && !points[..i].contains(p) {
                fresh += 1;
            }
        }
        match fresh {
            0 => Ok(()),
            n => id_for_slot(self.points.len() + n - 1).map(|_| ()),
        }
    }

    #[inline]
    pub fn id(&self, p: Point) -> Option<NodeId> {
        self.ids.get(&p).copied()
    }

    /// Position of a node issued by this set.
    #[inline]
    pub fn point(&self, id: NodeId) -> Point {
        self.points[id.index()]
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.ids.contains_key(&p)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nodes in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    /// The node nearest to `p`; `None` only if the set is empty.
    pub fn nearest(&self, p: Point) -> Option<Point> {
        self.spatial_idx
            .nearest_neighbor(&[p.x, p.y])
            .map(|e| self.point(e.id))
    }

    /// Up to `k` nodes sorted by ascending distance to `p`.
    pub fn k_nearest(&self, p: Point, k: usize) -> Vec<Point> {
        self.spatial_idx
            .nearest_neighbor_iter(&[p.x, p.y])
            .take(k)
            .map(|e| self.point(e.id))
            .collect()
    }
}

/// The id for the node stored at `slot`.
pub(crate) fn id_for_slot(slot: usize) -> GraphResult<NodeId> {
    NodeId::try_from(slot).map_err(|_| {
        GraphError::InvalidArgument(format!("graph cannot hold more than {} nodes", u32::MAX as u64 + 1))
    })
}

impl Default for NodeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.points.iter()).finish()
    }
}
