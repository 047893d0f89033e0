//! HTTP request builder.

use crate::FetchError;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API request under construction.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL path without the query string.
    pub fn path(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let path = without_scheme
            .find('/')
            .map(|i| &without_scheme[i..])
            .unwrap_or("/");
        path.split('?').next().unwrap_or(path)
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append query parameters, percent-encoded.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, FetchError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = Url::parse(&self.url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key.as_ref(), value.as_ref());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        self.url = url.into();
        Ok(self)
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_encoding() {
        let req = RequestBuilder::new(Method::Get, "http://localhost:5000/api/products")
            .query([("keyword", "red shirt"), ("page", "2")])
            .unwrap();
        assert_eq!(
            req.url(),
            "http://localhost:5000/api/products?keyword=red+shirt&page=2"
        );
        assert_eq!(req.path(), "/api/products");
    }

    #[test]
    fn test_empty_query_leaves_url() {
        let req = RequestBuilder::new(Method::Get, "http://localhost:5000/api/products")
            .query(Vec::<(&str, &str)>::new())
            .unwrap();
        assert_eq!(req.url(), "http://localhost:5000/api/products");
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let req = RequestBuilder::new(Method::Post, "http://x/api/cart")
            .json(&serde_json::json!({ "qty": 2 }))
            .unwrap();
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.body_bytes(), Some(br#"{"qty":2}"#.as_slice()));
    }

    #[test]
    fn test_bearer_auth() {
        let req = RequestBuilder::new(Method::Get, "http://x/api/users/profile").bearer_auth("abc");
        assert_eq!(req.header_value("Authorization"), Some("Bearer abc"));
        assert_eq!(req.method().to_string(), "GET");
    }
}
