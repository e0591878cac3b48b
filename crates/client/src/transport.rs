// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the REST API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

pub use witrack_core::TransportError;

/// Media type of every request and response body.
pub const JSON_API: &str = "application/vnd.api+json";

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One request, relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        HttpRequest {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        HttpRequest {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        HttpRequest {
            method: Method::Patch,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>, body: Value) -> Self {
        HttpRequest {
            method: Method::Delete,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Decoded JSON body; `None` for an empty body such as 204.
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        HttpResponse { status, body }
    }
}

/// Transport trait for request/response communication.
///
/// Implementations report any non-2xx answer as [`TransportError::Status`]
/// so the retry executor can classify it.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> SendFuture<'_>;
}

/// HTTP transport on reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("witrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(HttpTransport {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Absolute URL for a request path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: HttpRequest) -> SendFuture<'_> {
        Box::pin(async move {
            let url = self.url(&request.path);
            let mut builder = self
                .client
                .request(request.method.into(), &url)
                .header(ACCEPT, JSON_API);
            if let Some(token) = &self.token {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = &request.body {
                let bytes = serde_json::to_vec(body)
                    .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
                builder = builder.header(CONTENT_TYPE, JSON_API).body(bytes);
            }

            tracing::debug!(method = request.method.as_str(), %url, "sending request");
            let response = builder.send().await.map_err(from_reqwest)?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await.map_err(from_reqwest)?;

            if !response_is_success(status) {
                return Err(TransportError::Status {
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            let body = if bytes.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                Some(
                    serde_json::from_slice(&bytes)
                        .map_err(|e| TransportError::InvalidResponse(e.to_string()))?,
                )
            };
            Ok(HttpResponse { status, body })
        })
    }
}

fn response_is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn from_reqwest(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
pub(crate) mod tests;
