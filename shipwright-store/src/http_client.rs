use async_trait::async_trait;
use shipwright_core::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use shipwright_core::{CoreError, CoreResult};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::app_config::FulfillmentApiConfig;

/// Header carrying the Login-with-Amazon access token
const ACCESS_TOKEN_HEADER: &str = "x-amz-access-token";

/// Production HTTP client for the fulfillment API.
///
/// Paths are joined onto `base_url`; the response body is always buffered.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl ReqwestHttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            timeout,
        }
    }

    pub fn from_config(config: &FulfillmentApiConfig) -> Self {
        let mut client = Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        );
        client.access_token = config.access_token.clone().filter(|t| !t.is_empty());
        client
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &HttpRequest) -> CoreResult<HttpResponse> {
        let url = self.url_for(&request.path);
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        debug!(url = %url, timeout_ms = self.timeout.as_millis() as u64, "Executing HTTP request");

        let mut req = self.client.request(method, &url).timeout(self.timeout);

        if let Some(token) = &self.access_token {
            req = req.header(ACCESS_TOKEN_HEADER, token);
        }

        if let Some(body) = &request.body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = req.send().await.map_err(|e| {
            error!(url = %url, error = %e, "HTTP request failed");
            CoreError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Transport(format!("failed to read response body: {}", e)))?;

        info!(status, response_len = body.len(), "HTTP request completed");

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let client = ReqwestHttpClient::new(
            "https://sellingpartnerapi-na.amazon.com/",
            Duration::from_secs(5),
        );
        assert_eq!(
            client.url_for("/fba/outbound/2020-07-01/fulfillmentOrders/"),
            "https://sellingpartnerapi-na.amazon.com/fba/outbound/2020-07-01/fulfillmentOrders/"
        );
    }

    #[test]
    fn test_blank_access_token_is_ignored() {
        let config = FulfillmentApiConfig {
            base_url: "http://localhost:8080".to_string(),
            access_token: Some(String::new()),
            request_timeout_secs: 10,
        };
        let client = ReqwestHttpClient::from_config(&config);
        assert!(client.access_token.is_none());
        assert_eq!(client.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ReqwestHttpClient::new("http://127.0.0.1:9", Duration::from_secs(2));
        let result = client.execute(&HttpRequest::get("/status")).await;
        assert!(matches!(result, Err(CoreError::Transport(_))));
    }
}
