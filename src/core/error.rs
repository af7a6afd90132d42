//! Typed error handling for the bridge
//!
//! Three categories cover everything this crate can fail with:
//!
//! - [`ConfigError`]: registration/configuration problems, raised at setup
//!   time before any request is served
//! - [`HttpQueryError`]: the distinguished query-error outcome of the
//!   executor adapter, rendered directly onto the transport (status code,
//!   message, headers)
//! - [`BridgeError::Internal`]: everything else; falls through to the
//!   generic error path and surfaces as a JSON 500
//!
//! # Example
//!
//! ```rust,ignore
//! use bridge::prelude::*;
//!
//! let err = ServerRegistration::<MySchema>::new().build().unwrap_err();
//! assert!(matches!(err, BridgeError::Config(ConfigError::MissingField { .. })));
//! ```

use async_graphql::ParseRequestError;
use axum::Json;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the bridge
#[derive(Debug)]
pub enum BridgeError {
    /// Configuration and registration errors
    Config(ConfigError),

    /// Query errors from the executor adapter, rendered locally
    Query(HttpQueryError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Config(e) => write!(f, "{}", e),
            BridgeError::Query(e) => write!(f, "{}", e),
            BridgeError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Config(e) => Some(e),
            BridgeError::Query(e) => Some(e),
            BridgeError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl BridgeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::Query(e) => e.status,
            BridgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BridgeError::Config(_) => "CONFIG_ERROR",
            BridgeError::Query(_) => "QUERY_ERROR",
            BridgeError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration and registration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        BridgeError::Config(err)
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// A query error carrying everything the transport needs to render it
///
/// This is the one failure kind the executor adapter handles locally: the
/// binding layer copies `status`, `headers` and `message` straight onto the
/// outbound response. Any other failure propagates through [`BridgeError`]
/// to the generic error path.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HttpQueryError {
    pub status: StatusCode,
    pub message: String,
    pub headers: HeaderMap,
}

impl HttpQueryError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 405 response advertising the supported methods
    pub fn method_not_allowed() -> Self {
        let mut err = Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "GraphQL only supports GET and POST requests.",
        );
        err.headers
            .insert(header::ALLOW, HeaderValue::from_static("GET, POST"));
        err
    }

    /// Attach a header to the rendered response
    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl From<HttpQueryError> for BridgeError {
    fn from(err: HttpQueryError) -> Self {
        BridgeError::Query(err)
    }
}

impl From<ParseRequestError> for HttpQueryError {
    fn from(err: ParseRequestError) -> Self {
        match err {
            ParseRequestError::PayloadTooLarge => {
                HttpQueryError::payload_too_large("Request payload is too large")
            }
            other => HttpQueryError::bad_request(other.to_string()),
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BridgeError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

// =============================================================================
// Tests
// =============================================================================
