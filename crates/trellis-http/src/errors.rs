//! HTTP layer error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use trellis_core::CoreError;

/// Result type for composition and request handling
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    Composition(#[from] CoreError),

    #[error("Route conflict: '{path}' for controller '{controller}' is already mounted by '{existing}'")]
    RouteConflict {
        path: String,
        controller: String,
        existing: String,
    },

    #[error("Controller '{controller}' registers {method} {path} more than once")]
    DuplicateRoute {
        controller: String,
        method: String,
        path: String,
    },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },
}

impl HttpError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Check if the error came from provider resolution or injection
    pub fn is_composition(&self) -> bool {
        matches!(self, Self::Composition(_))
    }

    /// Borrow the wrapped core error, if any
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Composition(error) => Some(error),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Composition(_) => "COMPOSITION_ERROR",
            Self::RouteConflict { .. } | Self::DuplicateRoute { .. } => "ROUTE_CONFLICT",
            Self::BadRequest { .. } => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });
        (self.status_code(), axum::Json(body)).into_response()
    }
}
