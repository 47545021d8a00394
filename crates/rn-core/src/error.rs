//! Unified error taxonomy.
//!
//! Sub-crates define their own error enums (`GraphError`, `ModelError`) and
//! convert them into `RoadError` via `From` impls, so an application driving
//! several crates can carry a single error type.

use thiserror::Error;

use crate::{ObjectId, Point};

/// Every way a road network operation can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoadError {
    /// A required parameter is missing, non-finite, or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no route from {from} to {to}")]
    UnreachableDestination { from: Point, to: Point },

    #[error("no connection from {from} to {to}")]
    NoSuchConnection { from: Point, to: Point },

    #[error("object {0} is not registered")]
    UnregisteredObject(ObjectId),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("object {0} is already registered")]
    DuplicateRegistration(ObjectId),
}

/// Shorthand result type for code that mixes several `rn-*` crates.
pub type RoadResult<T> = Result<T, RoadError>;
