use thiserror::Error;

use crate::ObjectId;

/// Result type for object graph operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while loading or validating an object graph.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse object graph")]
    Json(#[from] serde_json::Error),

    #[error("object {owner} references missing object {target}")]
    DanglingReference { owner: ObjectId, target: ObjectId },

    #[error("root object {0} is not a module")]
    RootNotModule(ObjectId),

    #[error("object graph is empty")]
    Empty,
}
