//! HTTP client error types.

use thiserror::Error;

/// Message shown when the server gives nothing better.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur before a server response is available.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The owning view went away before the response arrived.
    #[error("Request cancelled")]
    Cancelled,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Token persistence failed.
    #[error("Token storage error: {0}")]
    StorageError(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

/// Error returned by every API call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Non-2xx response.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or(GENERIC_MESSAGE))]
    Status {
        status: u16,
        /// The body's `message` field, if there was one.
        message: Option<String>,
    },

    /// Transport, parsing or cancellation failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ApiError {
    /// Text to show the user: the server's message verbatim, or a generic
    /// fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Fetch(FetchError::Timeout) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Fetch(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Fetch(FetchError::Cancelled))
    }
}

/// Pull the `message` field out of an error body.
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Product not found".to_string()),
        };
        assert_eq!(err.user_message(), "Product not found");
        assert_eq!(err.to_string(), "HTTP 400: Product not found");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_MESSAGE);

        let err = ApiError::from(FetchError::RequestError("connection refused".to_string()));
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert!(err.status().is_none());
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(br#"{"message":"Invalid email or password"}"#).as_deref(),
            Some("Invalid email or password")
        );
        assert_eq!(
            extract_message(br#"{"message":" Only 2 left. "}"#).as_deref(),
            Some(" Only 2 left. ")
        );
        assert_eq!(extract_message(br#"{"message":""}"#), None);
        assert_eq!(extract_message(br#"{"error":"x"}"#), None);
        assert_eq!(extract_message(b"<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_classification() {
        let unauthorized = ApiError::Status {
            status: 401,
            message: None,
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_not_found());
        assert!(ApiError::from(FetchError::Cancelled).is_cancelled());
    }
}
