//! Error types for the spatial subsystem
//!
//! Geometric degeneracies (objects outside the world, exhausted depth) are not
//! errors; they surface through insert/update reports instead. Errors are
//! reserved for misuse: stale handles and invalid construction parameters.

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::collections::ObjectId;

/// Errors returned by octree construction and object mutation
#[derive(Error, Debug)]
pub enum SpatialError {
    /// The handle does not refer to a live object in this tree
    #[error("Unknown object: {0:?}")]
    UnknownObject(ObjectId),

    /// Bounding box corners are non-finite or inverted
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    /// Configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;
