//! Where an object is, and what a movement call achieved.

use rn_core::Point;

/// Location of an object on the graph.
///
/// An object is either exactly on a node or part-way along a connection.  The
/// connection's length is carried along so the point can be interpolated
/// without another graph lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Node(Point),
    OnConnection {
        from: Point,
        to: Point,
        /// Distance already travelled from `from`, in `(0, length)`.
        offset: f64,
        /// Length of the connection `from → to`.
        length: f64,
    },
}

impl Position {
    /// The coordinate of this position.  For a position on a connection this
    /// is the straight-line interpolation at `offset / length`.
    pub fn point(&self) -> Point {
        match *self {
            Position::Node(p) => p,
            Position::OnConnection { from, to, offset, length } => {
                if length <= 0.0 {
                    from
                } else {
                    from.lerp(to, offset / length)
                }
            }
        }
    }

    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, Position::Node(_))
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Position::Node(p)
    }
}

/// Outcome of [`RoadModel::follow_path`](crate::RoadModel::follow_path).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathProgress {
    /// Distance actually travelled.
    pub distance: f64,
    /// Time actually consumed; never more than the budget.
    pub time: f64,
    /// Where the object ended up.
    pub position: Position,
    /// The part of the path still ahead.  Starts with the object's new point
    /// so it can be passed straight back to `follow_path`; empty once the
    /// last point was reached.
    pub remaining: Vec<Point>,
}

impl PathProgress {
    /// `true` if the whole path was travelled.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}
