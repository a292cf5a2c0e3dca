use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UserError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            UserError::NotFound(_) => (StatusCode::NOT_FOUND, "User not found".to_string()),
            UserError::Persistence(_) | UserError::Hashing(_) => {
                // Details stay in the server log.
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error, try again later".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
