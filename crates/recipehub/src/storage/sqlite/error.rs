//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `recipehub_core::storage`.

use recipehub_core::recipe::RecipeId;
use recipehub_core::storage::RepositoryError;

fn map_rusqlite_error(err: &rusqlite::Error, id: RecipeId) -> RepositoryError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound { id },

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// `id` names the recipe row the failed query targeted; it only surfaces in
/// the `NotFound` variant.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error, id: RecipeId) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err, id),
        tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rows_maps_to_not_found() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows);
        let result = map_tokio_rusqlite_error(err, 42);
        assert!(matches!(result, RepositoryError::NotFound { id: 42 }));
    }

    #[test]
    fn test_other_error_maps_to_query_failed() {
        let err = tokio_rusqlite::Error::Other(Box::new(std::io::Error::other("test error")));
        let result = map_tokio_rusqlite_error(err, 1);
        assert!(matches!(result, RepositoryError::QueryFailed(_)));
    }
}
