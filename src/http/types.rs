use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::todo_service::TodoError;

/// Error returned to clients as a plain-text message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self { Self { status, message: message.into() } }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn not_found(message: impl Into<String>) -> Self { Self::new(StatusCode::NOT_FOUND, message) }
}

/// Validation and missing-todo failures are the caller's fault; anything else is ours.
impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(_) | TodoError::NotFound(_) => Self::bad_request(err.to_string()),
            TodoError::Storage(source) => {
                tracing::error!(error = ?source, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, source.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, self.message).into_response() }
}
