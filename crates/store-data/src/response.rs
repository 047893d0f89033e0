//! API responses.

use crate::error::extract_message;
use crate::{ApiError, FetchError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// A raw reply from the storefront API.
///
/// Header names are stored lowercased.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Decode the body. An empty body decodes as JSON `null`, which lets
    /// `DELETE` replies deserialize into `()` or `Option<_>`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Turn a non-2xx reply into [`ApiError::Status`], keeping the server's
    /// `message` field when the body has one.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(ApiError::Status {
            status: self.status,
            message: extract_message(&self.body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn reply(status: u16, body: &str) -> Response {
        Response::new(status, HashMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let resp = Response::new(200, headers, Vec::new());
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(resp.header("x-request-id"), None);
    }

    #[test]
    fn test_json_decodes_body() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Count {
            count: i64,
        }

        let count: Count = reply(200, r#"{"count": 3}"#).json().unwrap();
        assert_eq!(count, Count { count: 3 });
        assert!(matches!(
            reply(200, "<html>").json::<Count>(),
            Err(FetchError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_body_is_null() {
        assert_eq!(reply(204, "").json::<Option<i64>>().unwrap(), None);
        reply(200, "  ").json::<()>().unwrap();
    }

    #[test]
    fn test_error_for_status_keeps_server_message() {
        assert!(reply(201, "{}").error_for_status().is_ok());

        let err = reply(500, r#"{"message":"Order validation failed"}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "Order validation failed");

        let err = reply(404, "Not Found").error_for_status().unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: None
            }
        );
    }
}
