//! Error types for the store client.

use std::time::Duration;

/// Errors that can occur when talking to an object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object exists under the requested key
    #[error("object not found: {0}")]
    NotFound(String),

    /// The request's context was cancelled before it completed
    #[error("request cancelled")]
    Cancelled,

    /// The request did not complete within the context's timeout
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    /// Object storage error
    #[error("object storage error: {0}")]
    ObjectStore(#[source] object_store::Error),

    /// Failure reported by any other client implementation
    #[error("service error: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Wrap an arbitrary error as a service failure.
    pub fn service<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Service(Box::new(err))
    }
}

impl From<object_store::Error> for StoreError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => StoreError::NotFound(path),
            other => StoreError::ObjectStore(other),
        }
    }
}

/// Result type alias for store client operations.
pub type Result<T> = std::result::Result<T, StoreError>;
