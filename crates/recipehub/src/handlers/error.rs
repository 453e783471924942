use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use recipehub_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::service::CatalogError;

/// Application error type that wraps `anyhow::Error`.
///
/// Allows `?` on functions returning catalog or repository errors; the
/// response status is recovered by downcasting.
pub struct AppError(pub anyhow::Error);

fn status_for(error: &anyhow::Error) -> StatusCode {
    if let Some(catalog_error) = error.downcast_ref::<CatalogError>() {
        return match catalog_error {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Repository(repo_error) => {
                StatusCode::from_u16(repository_error_to_status_code(repo_error))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            CatalogError::Channel(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
    }

    if let Some(repo_error) = error.downcast_ref::<RepositoryError>() {
        return StatusCode::from_u16(repository_error_to_status_code(repo_error))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }

    StatusCode::INTERNAL_SERVER_ERROR
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
