//! Error types and handling.

use reqwest::StatusCode;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}")]
    Status {
        status: StatusCode,
        /// Response body, parsed as JSON when possible, otherwise a JSON string.
        body: serde_json::Value,
    },

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Persisted key-value storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a decode error with message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a storage error with message
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Diagnostic detail for logs: the server's error body when one was
    /// returned, otherwise the error's display text.
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.is_null() => body.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_prefers_server_body() {
        let err = AppError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: json!({ "message": "jam_masuk tidak valid" }),
        };
        assert_eq!(err.detail(), r#"{"message":"jam_masuk tidak valid"}"#);
    }

    #[test]
    fn test_detail_falls_back_to_display() {
        let err = AppError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: serde_json::Value::Null,
        };
        assert_eq!(err.detail(), "Server returned 500 Internal Server Error");

        let err = AppError::decode("missing data");
        assert_eq!(err.detail(), "Decode error: missing data");
    }
}
