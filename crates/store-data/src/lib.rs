//! HTTP client plumbing for the storefront API.
//!
//! [`ApiClient`] is the one shared client every resource module goes through.
//! It resolves paths against the configured base URL, attaches the bearer
//! token from its [`TokenStore`], logs each exchange, and turns non-2xx
//! responses into [`ApiError`] carrying the server's `message`.
//!
//! # Example
//!
//! ```rust,ignore
//! use store_data::{ApiClient, ClientConfig, MemoryTokenStore};
//! use std::sync::Arc;
//!
//! let client = ApiClient::new(&ClientConfig::default(), Arc::new(MemoryTokenStore::new()))?;
//!
//! let products: serde_json::Value = client
//!     .execute(client.get("/products").query([("keyword", "shirt")])?)
//!     .await?;
//! ```

mod config;
mod error;
mod request;
mod response;
mod scope;
mod token;
mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::{ClientConfig, API_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ApiError, FetchError, GENERIC_MESSAGE};
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use scope::{cancellable, ViewScope};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{ReqwestTransport, Transport};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Shared API client.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.tokens.load().is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client that talks HTTP through `reqwest`.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(&config.base_url, Arc::new(transport), tokens))
    }

    /// Create a client over any transport.
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a token is stored.
    pub fn has_token(&self) -> bool {
        self.tokens.load().is_some()
    }

    /// Persist the session token.
    pub fn set_token(&self, token: SecretString) -> Result<(), FetchError> {
        self.tokens.save(token)
    }

    /// Forget the session token.
    pub fn clear_token(&self) -> Result<(), FetchError> {
        self.tokens.clear()
    }

    /// Create a GET request.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::Get, path)
    }

    /// Create a POST request.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::Post, path)
    }

    /// Create a PUT request.
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::Put, path)
    }

    /// Create a DELETE request.
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::Delete, path)
    }

    /// Create a request with a path relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        RequestBuilder::new(method, url).accept("application/json")
    }

    /// Send a request and return the successful response.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.tokens.load() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let method = request.method();
        let path = request.path().to_string();
        let started = Instant::now();
        debug!(%method, %path, "sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %path, error = %e, "request failed");
                return Err(e.into());
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if response.is_success() {
            debug!(%method, %path, status = response.status, elapsed_ms, "response");
        } else {
            warn!(%method, %path, status = response.status, elapsed_ms, "error response");
        }

        response.error_for_status()
    }

    /// Send a request and parse the JSON body.
    pub async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json()?)
    }

    /// Send a request, ignoring the body.
    pub async fn execute_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiClient, ApiError, FetchError, Method, Response, ViewScope};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use serde_json::json;

    fn client(mock: &MockTransport, tokens: Arc<dyn TokenStore>) -> ApiClient {
        ApiClient::with_transport("http://mock.test/api/", Arc::new(mock.clone()), tokens)
    }

    #[tokio::test]
    async fn test_bearer_attached_when_token_present() {
        let mock = MockTransport::new();
        mock.json(Method::Get, "/users/profile", 200, json!({ "name": "Ada" }));
        let api = client(&mock, Arc::new(MemoryTokenStore::with_token("tok-1")));

        let _: serde_json::Value = api.execute(api.get("/users/profile")).await.unwrap();

        let sent = mock.requests();
        assert_eq!(sent[0].url, "http://mock.test/api/users/profile");
        assert_eq!(sent[0].header("authorization"), Some("Bearer tok-1"));
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let mock = MockTransport::new();
        mock.json(Method::Get, "/products", 200, json!([]));
        let api = client(&mock, Arc::new(MemoryTokenStore::new()));

        let _: Vec<serde_json::Value> = api.execute(api.get("products")).await.unwrap();
        assert_eq!(mock.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_error_message_normalized() {
        let mock = MockTransport::new();
        mock.json(Method::Post, "/orders", 500, json!({ "message": "Database unavailable" }));
        let api = client(&mock, Arc::new(MemoryTokenStore::new()));

        let err = api.execute_unit(api.post("/orders")).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let mock = MockTransport::new();
        let api = client(&mock, Arc::new(MemoryTokenStore::new()));
        assert!(!api.has_token());
        api.set_token(SecretString::from("t")).unwrap();
        assert!(api.has_token());
        api.clear_token().unwrap();
        assert!(!api.has_token());
    }

    #[tokio::test]
    async fn test_scope_cancels_request() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/products/top",
            mock::MockReply::json(200, json!([])).delayed(std::time::Duration::from_secs(30)),
        );
        let api = client(&mock, Arc::new(MemoryTokenStore::new()));
        let scope = ViewScope::new();
        let token = scope.token();

        let task = tokio::spawn(async move {
            cancellable(&token, api.execute::<Vec<serde_json::Value>>(api.get("/products/top"))).await
        });
        tokio::task::yield_now().await;
        drop(scope);

        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
    }
}
