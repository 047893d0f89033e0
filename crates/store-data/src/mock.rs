//! In-memory transport for tests.
//!
//! Routes match on method and URL path suffix. Each route holds a queue of
//! replies; the last reply repeats once the queue is down to one.

use crate::{FetchError, Method, RequestBuilder, Response, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A canned reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: serde_json::Value,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body,
            delay: None,
        }
    }

    /// Hold the reply back for `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the mock has seen.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct Route {
    method: Method,
    path: String,
    replies: VecDeque<MockReply>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

/// Transport that answers from registered routes and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a reply for `method path`.
    pub fn on(&self, method: Method, path: &str, reply: MockReply) -> &Self {
        let mut state = self.lock();
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) => route.replies.push_back(reply),
            None => state.routes.push(Route {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// Shorthand for a JSON reply.
    pub fn json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.on(method, path, MockReply::json(status, body))
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests matching `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path.ends_with(path))
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn take_reply(&self, request: &RequestBuilder) -> Option<MockReply> {
        let path = request.path().to_string();
        let mut state = self.lock();

        state.requests.push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            path: path.clone(),
            headers: request.headers.clone(),
            body: request
                .body
                .as_deref()
                .and_then(|b| serde_json::from_slice(b).ok()),
        });

        // Longest suffix wins so `/cart` does not shadow `/cart/:id`.
        let route = state
            .routes
            .iter_mut()
            .filter(|r| r.method == request.method && path.ends_with(&r.path))
            .max_by_key(|r| r.path.len())?;

        if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let reply = self.take_reply(&request).unwrap_or_else(|| {
            MockReply::json(
                404,
                serde_json::json!({
                    "message": format!("No mock for {} {}", request.method, request.path())
                }),
            )
        });

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        let body = serde_json::to_vec(&reply.body)?;
        let headers = HashMap::from([("Content-Type".to_string(), "application/json".to_string())]);
        Ok(Response::new(reply.status, headers, body))
    }
}
