//! HTTP transport abstraction.
//!
//! The shipping service talks to the fulfillment API only through [`HttpClient`], so the
//! production reqwest client and the in-memory mock are interchangeable.

use async_trait::async_trait;
use std::fmt;

use crate::CoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the client's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    /// JSON body, sent with `Content-Type: application/json`
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post_json(path: impl Into<String>, body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Fully buffered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Executes requests against the fulfillment API.
///
/// Any status code is a successful execution; only failures to obtain a response at all
/// (connection refused, request timeout, bad URL) are errors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> CoreResult<HttpResponse>;
}
