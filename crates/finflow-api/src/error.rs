//! Error types for finflow-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use finflow_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e {
                CoreError::ExpenseNotFound { .. }
                | CoreError::PartyNotFound { .. } => StatusCode::NOT_FOUND,
                e if e.is_client_error() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a user; server-side failures stay generic
    pub fn user_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Something went wrong. Please try again.".to_string()
        } else {
            match self {
                ApiError::Core(e) => e.to_string(),
                other => other.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "success": false,
            "message": self.user_message(),
        });
        if let ApiError::Core(e) = &self {
            body["error"] = serde_json::to_value(e.to_details()).unwrap_or_default();
        }
        (self.status_code(), axum::Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let missing = ApiError::from(CoreError::ExpenseNotFound { id: "9".to_string() });
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let invalid = ApiError::from(CoreError::ValidationError {
            message: "Amount must not be negative".to_string(),
        });
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert!(invalid.user_message().contains("Amount must not be negative"));

        let internal = ApiError::from(CoreError::InternalError {
            message: "lock poisoned".to_string(),
        });
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!internal.user_message().contains("lock"));
    }
}
