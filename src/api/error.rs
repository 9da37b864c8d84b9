use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Wallet address and signature are required")]
    MissingCredentials,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Unauthorized access")]
    Forbidden,
    #[error("API endpoint not found")]
    NotFound,
    #[error("Too many requests, please try again after 15 minutes")]
    RateLimited,
    /// A payment or mint operation failed. `detail` is only filled when the
    /// server is configured to expose internals.
    #[error("{message}")]
    Operation {
        message: &'static str,
        detail: Option<String>,
    },
    #[error("Internal server error")]
    Internal { detail: Option<String> },
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    code: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MissingCredentials | ApiError::Operation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, error) = match self {
            ApiError::Validation(reason) => ("Validation error".to_string(), Some(reason)),
            ApiError::Operation { message, detail } => (message.to_string(), detail),
            ApiError::Internal { detail } => ("Internal server error".to_string(), detail),
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
