//! Error types for the casebook API client.
//!
//! # Design
//! Every non-2xx response lands in `Backend`, whatever its status. The
//! payload is already normalized: the backend's `detail` field when present,
//! otherwise the whole parsed body. The status rides along so callers that
//! care about 401 vs 500 can look, but nothing else branches on it.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by `parse_response`, `Transport::execute`, and the
/// `Casebook` facade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {payload}")]
    Backend { status: u16, payload: Value },

    /// A response body was not valid JSON.
    #[error("HTTP {status}: response body is not JSON: {message}")]
    Decode { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Normalized backend payload (`detail` or full body), if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Backend { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// HTTP status, for errors that came with a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ureq::Error> for ApiError {
    fn from(value: ureq::Error) -> Self {
        ApiError::Transport(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_error_exposes_payload_and_status() {
        let err = ApiError::Backend {
            status: 404,
            payload: json!("Case not found"),
        };
        assert_eq!(err.payload(), Some(&json!("Case not found")));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404: \"Case not found\"");
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::Transport("connection refused".to_string());
        assert!(err.payload().is_none());
        assert!(err.status().is_none());
        assert!(!err.is_not_found());
    }

    #[test]
    fn decode_error_keeps_status() {
        let err = ApiError::Decode {
            status: 502,
            message: "expected value".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert!(err.payload().is_none());
    }
}
