//! Node and object identifiers.
//!
//! `NodeId` is a dense per-graph index; `ObjectId` is chosen by the caller.
//! Both print as `Name(n)` in error messages and log fields.

use std::fmt;

macro_rules! id_newtype {
    ($(#[$attr:meta])* $name:ident($inner:ty)) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

id_newtype! {
    /// Dense index of a node inside one graph backing, assigned in the order
    /// nodes are first seen.  Only meaningful for the graph that issued it.
    NodeId(u32)
}

id_newtype! {
    /// Identity of a road user.  Chosen by whoever creates the object; the
    /// road model refuses to register the same id twice.
    ObjectId(u64)
}

impl NodeId {
    /// Position in the per-node vectors of the issuing graph.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fails once a graph already holds `u32::MAX + 1` nodes.
impl TryFrom<usize> for NodeId {
    type Error = std::num::TryFromIntError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        u32::try_from(n).map(NodeId)
    }
}
