use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::openrouter::UpstreamError;

/// Longest slice of upstream text echoed back in an error message
const MAX_UPSTREAM_BODY_CHARS: usize = 512;

/// Custom error type for the application
#[derive(Debug)]
pub enum AppError {
    MissingCredential,
    InvalidRequest(String),
    UpstreamStatus { status: u16, body: String },
    EmptyUpstream,
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MissingCredential
            | AppError::UpstreamStatus { .. }
            | AppError::EmptyUpstream
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the `error` field of the response body
    pub fn message(&self) -> String {
        match self {
            AppError::MissingCredential => {
                "Server configuration error: API key missing".to_string()
            }
            AppError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            AppError::UpstreamStatus { status, body } => {
                format!("OpenRouter API failed: {} {}", status, sanitize_upstream(body))
            }
            AppError::EmptyUpstream => "Empty response from API".to_string(),
            AppError::Internal(msg) => format!("Server error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // the terminal `outcome` event is logged where the error is raised
        let body = Json(ErrorResponse {
            error: self.message(),
        });
        (self.status_code(), body).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => AppError::UpstreamStatus { status, body },
            UpstreamError::Empty => AppError::EmptyUpstream,
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Bounds upstream text and escapes control characters so it can't forge
/// extra log lines or bloat the response.
pub fn sanitize_upstream(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.trim().chars();
    for c in chars.by_ref().take(MAX_UPSTREAM_BODY_CHARS) {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}

/// Result type for application handlers
pub type AppResult<T> = Result<T, AppError>;
