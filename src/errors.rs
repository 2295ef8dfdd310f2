use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Request body exceeded the configured limit.
    PayloadTooLarge(String),
    /// Failure reported by, or while reaching, an upstream API.
    Upstream {
        /// Upstream HTTP status, `None` when no response was received.
        status: Option<u16>,
        /// Error text supplied by the upstream, or the transport error message.
        message: String,
        /// Upstream error type. Only reported by APIs that supply one.
        error_type: Option<String>,
    },
    /// The service is live but lacks something it needs for this call.
    Configuration(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::Upstream {
                status: Some(status),
                message,
                ..
            } => write!(f, "Upstream API error ({}): {}", status, message),
            AppError::Upstream { message, .. } => write!(f, "Upstream API error: {}", message),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status and the failure envelope
    /// `{ "success": false, "error": ..., "errorType"?: ... }`.
    fn into_response(self) -> Response {
        let (status, error_message, error_type) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg, None),
            AppError::Upstream {
                status,
                message,
                error_type,
            } => {
                tracing::error!(
                    "Upstream API error: status={:?}, type={:?}, message={}",
                    status,
                    error_type,
                    message
                );
                let status = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, message, error_type)
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    Some("configuration".to_string()),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.into_response();
            }
        };

        let mut body = Map::new();
        body.insert("success".to_string(), json!(false));
        body.insert("error".to_string(), json!(error_message));
        if let Some(error_type) = error_type {
            body.insert("errorType".to_string(), json!(error_type));
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Transport and decoding failures carry whatever status reqwest knows about.
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            error_type: None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::InternalError(format!("Token signing failed: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }
}
