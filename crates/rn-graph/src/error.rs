//! Graph-subsystem error type.

use thiserror::Error;

use rn_core::{Point, RoadError};

/// Errors produced by `rn-graph`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no connection from {from} to {to}")]
    NoSuchConnection { from: Point, to: Point },

    #[error("no route from {from} to {to}")]
    UnreachableDestination { from: Point, to: Point },
}

pub type GraphResult<T> = Result<T, GraphError>;

impl From<GraphError> for RoadError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidArgument(msg) => RoadError::InvalidArgument(msg),
            GraphError::NoSuchConnection { from, to } => RoadError::NoSuchConnection { from, to },
            GraphError::UnreachableDestination { from, to } => {
                RoadError::UnreachableDestination { from, to }
            }
        }
    }
}
