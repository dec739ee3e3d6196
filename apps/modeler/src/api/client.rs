//! # HTTP Client
//!
//! Thin wrapper around `reqwest` for the Modeler REST API.
//!
//! Every call performs exactly one request: no retry, no client-side
//! validation, a fixed request timeout and connect timeout. Any 2xx answer
//! comes back as an [`ApiResponse`]; everything else is an error.

use crate::config::ApiConfig;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (unreachable, timeout, TLS...).
    #[error("transport error on {method} {url}: {message}")]
    Transport {
        method: String,
        url: String,
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("server returned {status} for {method} {url}: {body}")]
    Server {
        status: u16,
        method: String,
        url: String,
        body: String,
    },

    /// A 2xx body did not have the expected shape.
    #[error("unexpected response body: {message}")]
    Decode { message: String },
}

impl ClientError {
    /// The HTTP status, for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// A successful (2xx) response: status plus decoded body.
///
/// An empty body (e.g. 204) decodes to JSON `null`; a body that is not JSON
/// is kept as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status is one of `statuses`.
    pub fn is(&self, statuses: &[u16]) -> bool {
        statuses.contains(&self.status)
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client from the `[api]` configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Transport {
                method: "-".to_string(),
                url: config.base_url.clone(),
                message: format!("cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and classify the answer.
    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url);
        if let Some(body) = payload {
            req = req.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        let transport = |e: reqwest::Error| ClientError::Transport {
            method: method.to_string(),
            url: url.clone(),
            message: e.to_string(),
        };

        let resp = req.send().await.map_err(transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport)?;

        if !status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                method: method.to_string(),
                url,
                body: text,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body: parse_body(&text),
        })
    }

    /// GET → unwrapped body.
    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        Ok(self.send(Method::GET, path, None).await?.body)
    }

    /// POST → raw response.
    pub async fn post(&self, path: &str, payload: &Value) -> Result<ApiResponse, ClientError> {
        self.send(Method::POST, path, Some(payload)).await
    }

    /// PUT → raw response.
    pub async fn put(&self, path: &str, payload: &Value) -> Result<ApiResponse, ClientError> {
        self.send(Method::PUT, path, Some(payload)).await
    }

    /// DELETE → raw response.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(Method::DELETE, path, None).await
    }
}
