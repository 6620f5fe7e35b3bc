//! Error types for the remote campaign API.
//!
//! Every failure of a call to the API is folded into [`ApiError`]. The UI
//! only needs the coarse [`ErrorKind`] to decide how to surface it.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the campaign API client.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never reached the API (offline, DNS, connection refused).
    #[error("Network error: {0}")]
    Network(String),

    /// The API did not answer within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The API rejected the payload.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The targeted resource does not exist (any more).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or expired credential on a protected action.
    #[error("Not authenticated - please sign in ({0})")]
    Auth(String),

    /// Any other non-2xx response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The request could not be built (bad base URL, bad part metadata).
    #[error("Invalid request: {0}")]
    Request(String),
}

/// How an error should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transient notice; prior state is kept.
    Network,
    /// Shown next to the action that triggered it.
    Validation,
    /// Non-fatal; local state is reconciled by dropping the stale entry.
    NotFound,
    /// Redirect to sign-in; never retried silently.
    Auth,
    /// Unexpected server or client failure.
    Other,
}

impl ApiError {
    /// Classify an error response by status code and body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth(message),
            StatusCode::NOT_FOUND | StatusCode::GONE => ApiError::NotFound(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::Timeout,
            _ => ApiError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Error raised before dispatch when a protected action has no identity.
    pub fn signed_out() -> Self {
        ApiError::Auth("no signed-in user".to_string())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout => ErrorKind::Network,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Auth(_) => ErrorKind::Auth,
            ApiError::Api { .. } | ApiError::Decode(_) | ApiError::Request(_) => ErrorKind::Other,
        }
    }

    /// Returns true if this error indicates the user must sign in.
    #[must_use]
    pub fn needs_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Returns true if the same request may succeed later unchanged.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::Request(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Request(err.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ".."}`, `{"error": ".."}`, `{"error": {"message": ".."}}`
/// and `{"errors": [..]}` shapes, falling back to the raw text.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return Some(body.to_string());
    };

    let from_value = |v: &serde_json::Value| -> Option<String> {
        match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        }
    };

    if let Some(msg) = json.get("message").and_then(from_value) {
        return Some(msg);
    }
    if let Some(msg) = json.get("error").and_then(from_value) {
        return Some(msg);
    }
    if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
        let joined: Vec<String> = errors.iter().filter_map(from_value).collect();
        if !joined.is_empty() {
            return Some(joined.join("; "));
        }
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, ErrorKind::Validation)]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, ErrorKind::Validation)]
    #[case(StatusCode::UNAUTHORIZED, ErrorKind::Auth)]
    #[case(StatusCode::FORBIDDEN, ErrorKind::Auth)]
    #[case(StatusCode::NOT_FOUND, ErrorKind::NotFound)]
    #[case(StatusCode::GATEWAY_TIMEOUT, ErrorKind::Network)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::Other)]
    fn test_status_classification(#[case] status: StatusCode, #[case] kind: ErrorKind) {
        assert_eq!(ApiError::from_status(status, "").kind(), kind);
    }

    #[test]
    fn test_message_extraction() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":"title is required"}"#);
        assert_eq!(err.to_string(), "Validation error: title is required");

        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"error":{"message":"no such campaign"}}"#);
        assert!(err.to_string().contains("no such campaign"));

        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":["target must be positive","duration missing"]}"#,
        );
        assert!(err.to_string().contains("target must be positive; duration missing"));
    }

    #[test]
    fn test_plain_text_and_empty_bodies() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, ApiError::Api { status: 502, ref message } if message == "upstream down"));

        let err = ApiError::from_status(StatusCode::NOT_FOUND, "  ");
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_transient_errors() {
        assert!(ApiError::Timeout.is_transient());
        assert!(ApiError::Network("offline".into()).is_transient());
        assert!(ApiError::Api { status: 503, message: String::new() }.is_transient());
        assert!(!ApiError::Validation("bad".into()).is_transient());
        assert!(!ApiError::signed_out().is_transient());
        assert!(ApiError::signed_out().needs_auth());
    }
}
