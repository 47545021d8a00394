use rn_core::{ObjectId, Point, RoadError};
use rn_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("object {0} is already registered")]
    DuplicateRegistration(ObjectId),

    #[error("object {0} is not registered")]
    UnregisteredObject(ObjectId),

    #[error("no connection from {from} to {to}")]
    NoSuchConnection { from: Point, to: Point },

    #[error("no route from {from} to {to}")]
    UnreachableDestination { from: Point, to: Point },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<GraphError> for ModelError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidArgument(msg) => ModelError::InvalidArgument(msg),
            GraphError::NoSuchConnection { from, to } => ModelError::NoSuchConnection { from, to },
            GraphError::UnreachableDestination { from, to } => {
                ModelError::UnreachableDestination { from, to }
            }
        }
    }
}

impl From<ModelError> for RoadError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidArgument(msg) => RoadError::InvalidArgument(msg),
            ModelError::InvalidPosition(msg) => RoadError::InvalidPosition(msg),
            ModelError::DuplicateRegistration(id) => RoadError::DuplicateRegistration(id),
            ModelError::UnregisteredObject(id) => RoadError::UnregisteredObject(id),
            ModelError::NoSuchConnection { from, to } => RoadError::NoSuchConnection { from, to },
            ModelError::UnreachableDestination { from, to } => {
                RoadError::UnreachableDestination { from, to }
            }
        }
    }
}
