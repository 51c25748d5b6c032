use thiserror::Error;

use crate::storage::StoreError;

/// Fatal server lifecycle errors (startup, bind, storage open)
///
/// Request-level failures use [`crate::utils::AppError`] instead; this
/// type is for errors that stop the process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result alias for server lifecycle code
pub type Result<T> = std::result::Result<T, ServerError>;
