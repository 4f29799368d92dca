use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// API error taxonomy. Every handler failure maps onto one of these, which
/// in turn fixes the HTTP status and the `{"error": "..."}` body the client
/// sees. Database and internal errors are logged server-side and surfaced
/// as generic messages.
#[derive(Debug)]
pub enum ApiError {
    InvalidCountry(String),
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Database(anyhow::Error),
    ExternalApi { service: String, message: String },
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn invalid_country(code: impl Into<String>) -> Self {
        Self::InvalidCountry(code.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalApi {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCountry(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ExternalApi { .. } => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidCountry(code) => format!("Invalid country code: {code}"),
            Self::Validation(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::NotFound(msg) => msg.clone(),
            Self::Database(e) => {
                error!("Database error: {e:#}");
                "A database error occurred".to_string()
            }
            Self::ExternalApi { service, message } => {
                error!("External service '{service}' failed: {message}");
                format!("{service} request failed")
            }
            Self::Internal(e) => {
                error!("Internal error: {e:#}");
                "An internal error occurred".to_string()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCountry(code) => write!(f, "invalid country code: {code}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "forbidden: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Database(e) => write!(f, "database error: {e}"),
            Self::ExternalApi { service, message } => {
                write!(f, "external service {service} failed: {message}")
            }
            Self::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.message() });
        (status, Json(body)).into_response()
    }
}
