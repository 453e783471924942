//! Maps repository errors to HTTP status codes.
//!
//! Kept here so the binary crate's error type does not need to know the
//! error taxonomy variant by variant. Only `NotFound` is distinguishable to
//! callers; everything else is an opaque internal error.

use super::RepositoryError;

/// Returns the HTTP status code for a repository error.
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::ConnectionFailed(_)
        | RepositoryError::QueryFailed(_)
        | RepositoryError::Serialization(_)
        | RepositoryError::InvalidData(_) => 500,
    }
}
