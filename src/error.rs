use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input; rejected before any store interaction.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The ride cannot cover the requested quantity. A final business
    /// rejection, not a transient fault.
    #[error("Only {available} units available")]
    InsufficientCapacity { available: i32 },

    /// The outcome of a write could not be observed (e.g. a timeout while
    /// waiting on the store). The caller must re-read state to reconcile.
    #[error("{0}")]
    Unknown(String),

    #[error(transparent)]
    Store(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InsufficientCapacity { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::Unknown(msg) => (StatusCode::GATEWAY_TIMEOUT, msg.clone()),
            AppError::Store(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_capacity_reports_remaining_units() {
        let err = AppError::InsufficientCapacity { available: 3 };
        assert_eq!(err.to_string(), "Only 3 units available");
    }

    #[test]
    fn store_errors_do_not_leak_details() {
        let err = AppError::Store(DbErr::Custom("connection reset by peer".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
