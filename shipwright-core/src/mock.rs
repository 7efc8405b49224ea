//! In-memory [`HttpClient`] for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::{CoreError, CoreResult};

/// Mock HTTP client with canned responses.
///
/// Responses are keyed by `"{METHOD} {path}"`. Queued responses are served in FIFO
/// order; once a key's queue is empty its repeating response (if any) is returned.
///
/// # Example
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.add_response("POST /fba/outbound/2020-07-01/fulfillmentOrders/", Ok(HttpResponse::ok("")));
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    queued: Arc<Mutex<HashMap<String, VecDeque<CoreResult<HttpResponse>>>>>,
    repeating: Arc<Mutex<HashMap<String, HttpResponse>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of a call made to the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<String>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `key`
    pub fn add_response(&self, key: &str, response: CoreResult<HttpResponse>) {
        self.queued
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    /// Response returned for `key` whenever its queue is exhausted
    pub fn set_repeating_response(&self, key: &str, response: HttpResponse) {
        self.repeating.lock().insert(key.to_string(), response);
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of recorded calls with the given method
    pub fn count_method(&self, method: HttpMethod) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> CoreResult<HttpResponse> {
        self.calls.lock().push(MockCall {
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
        });

        let key = format!("{} {}", request.method, request.path);
        let queued = self
            .queued
            .lock()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());

        if let Some(response) = queued {
            return response;
        }

        match self.repeating.lock().get(&key) {
            Some(response) => Ok(response.clone()),
            None => Err(CoreError::Transport(format!(
                "No mock response configured for {}",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_fifo_then_repeating() {
        let mock = MockHttpClient::new();
        mock.add_response("GET /status", Ok(HttpResponse::ok("first")));
        mock.add_response("GET /status", Ok(HttpResponse::ok("second")));
        mock.set_repeating_response("GET /status", HttpResponse::ok("again"));

        let request = HttpRequest::get("/status");
        assert_eq!(mock.execute(&request).await.unwrap().body, "first");
        assert_eq!(mock.execute(&request).await.unwrap().body, "second");
        assert_eq!(mock.execute(&request).await.unwrap().body, "again");
        assert_eq!(mock.execute(&request).await.unwrap().body, "again");

        assert_eq!(mock.call_count(), 4);
        assert_eq!(mock.count_method(HttpMethod::Get), 4);
    }

    #[tokio::test]
    async fn test_mock_client_no_response() {
        let mock = MockHttpClient::new();

        let result = mock
            .execute(&HttpRequest::post_json("/unknown", "{}".to_string()))
            .await;
        assert!(result.is_err());

        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, HttpMethod::Post);
        assert_eq!(calls[0].body.as_deref(), Some("{}"));
    }
}
