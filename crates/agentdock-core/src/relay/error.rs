//! Relay error taxonomy.

use std::fmt;

use serde_json::Value;

/// Failure category for one relay call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayErrorKind {
    /// The client-side timer fired before a response arrived.
    Timeout,
    /// The endpoint could not be reached.
    Connectivity,
    /// A response arrived with a non-success status.
    HttpStatus,
    /// Anything else (bad body, unexpected transport failure, panic).
    Generic,
}

impl fmt::Display for RelayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayErrorKind::Timeout => write!(f, "timeout"),
            RelayErrorKind::Connectivity => write!(f, "connectivity"),
            RelayErrorKind::HttpStatus => write!(f, "http_status"),
            RelayErrorKind::Generic => write!(f, "generic"),
        }
    }
}

/// Structured relay error with kind and details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayError {
    pub kind: RelayErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
    /// Optional extra detail (raw response body, etc.).
    pub details: Option<String>,
    /// HTTP status for `HttpStatus` errors.
    pub status: Option<u16>,
}

impl RelayError {
    pub fn new(kind: RelayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            status: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Timeout, message)
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Connectivity, message)
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Generic, message)
    }

    /// Creates an HTTP status error, pulling a cleaner message out of a
    /// `{"detail": ...}` or `{"error": {"message": ...}}` body when present.
    pub fn http_status(status: u16, body: &str) -> Self {
        let details = (!body.is_empty()).then(|| body.to_string());
        let message = match serde_json::from_str::<Value>(body) {
            Ok(json) => json
                .get("detail")
                .and_then(Value::as_str)
                .or_else(|| {
                    json.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(Value::as_str)
                })
                .map_or_else(
                    || format!("HTTP {status}"),
                    |msg| format!("HTTP {status}: {msg}"),
                ),
            Err(_) => format!("HTTP {status}"),
        };
        Self {
            kind: RelayErrorKind::HttpStatus,
            message,
            details,
            status: Some(status),
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RelayError {}

/// Result type for relay operations.
pub type RelayResult<T> = std::result::Result<T, RelayError>;
