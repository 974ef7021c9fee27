use serde_json::Value;
use thiserror::Error;

/// Main error type for portal API operations.
///
/// The backend reports failures in three distinct body shapes (structured
/// Eve-style envelope, arbitrary body, no body at all); each gets its own
/// variant so callers can match exhaustively instead of shape-sniffing.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Structured error envelope: `{"_status":"ERR","_error":{"message":...}}`.
    /// The message is kept verbatim; it may be a plain string or a structured
    /// object (e.g. a list of validation errors).
    #[error("{}", render_message(.message))]
    Server { message: Value, status: u16 },

    /// A response body was received but did not match the structured shape.
    #[error("{body}")]
    Opaque { body: String, status: u16 },

    /// Non-2xx response with an empty body; falls back to the status line.
    #[error("HTTP error {status}: {reason}")]
    Http { status: u16, reason: String },

    /// HTTP 404 on a single-item fetch.
    #[error("not found (HTTP 404)")]
    NotFound,

    /// HTTP 412: the supplied etag is stale. Callers should fetch a fresh
    /// etag and re-attempt; this crate never retries on its own.
    #[error("etag mismatch (HTTP 412): resource was modified concurrently")]
    PreconditionFailed,

    /// A collection response lacked the `_items` field. Contract violation
    /// against the backend; not recoverable by the caller.
    #[error("malformed collection envelope: missing _items field")]
    MalformedEnvelope,

    /// No response reached us (connection, TLS, timeout) or the success body
    /// could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The bearer token did not contain a decodable payload segment.
    #[error("malformed bearer token")]
    InvalidToken,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

fn render_message(message: &Value) -> String {
    match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ApiError {
    /// Get the origin HTTP status code, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. }
            | ApiError::Opaque { status, .. }
            | ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound => Some(404),
            ApiError::PreconditionFailed => Some(412),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if this error is an etag conflict (412)
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::PreconditionFailed)
    }

    /// Extract a nested `errors` string array from a structured server error.
    ///
    /// One observed backend failure mode embeds manifest validation errors
    /// inside a 403 error envelope: `{"_error":{"message":{"errors":[...]}}}`.
    pub fn validation_errors(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Server { message, .. } => {
                let errors = message.get("errors")?.as_array()?;
                errors
                    .iter()
                    .map(|e| e.as_str().map(|s| s.to_string()))
                    .collect()
            }
            _ => None,
        }
    }
}

/// Result type for portal API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_error_preserves_string_message() {
        let error = ApiError::Server {
            message: json!("blah"),
            status: 401,
        };
        assert_eq!(error.to_string(), "blah");
        assert_eq!(error.status_code(), Some(401));
    }

    #[test]
    fn test_server_error_renders_object_message() {
        let error = ApiError::Server {
            message: json!({"errors": ["x", "y"]}),
            status: 403,
        };
        assert_eq!(error.to_string(), r#"{"errors":["x","y"]}"#);
    }

    #[test]
    fn test_error_not_found() {
        assert!(ApiError::NotFound.is_not_found());
        assert_eq!(ApiError::NotFound.status_code(), Some(404));
    }

    #[test]
    fn test_error_conflict() {
        assert!(ApiError::PreconditionFailed.is_conflict());
        assert_eq!(ApiError::PreconditionFailed.status_code(), Some(412));
    }

    #[test]
    fn test_validation_errors_extraction() {
        let error = ApiError::Server {
            message: json!({"errors": ["x", "y"]}),
            status: 403,
        };
        assert_eq!(
            error.validation_errors(),
            Some(vec!["x".to_string(), "y".to_string()])
        );

        let plain = ApiError::Server {
            message: json!("nope"),
            status: 403,
        };
        assert_eq!(plain.validation_errors(), None);

        let mixed = ApiError::Server {
            message: json!({"errors": ["x", 3]}),
            status: 403,
        };
        assert_eq!(mixed.validation_errors(), None);
    }
}
