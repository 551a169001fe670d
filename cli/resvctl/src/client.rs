//! HTTP transport for master and agent communication.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::Config;
use crate::error::ResvError;

/// Raw request/response exchange with the cluster.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a path and return the response body.
    async fn get(&self, path: &str) -> Result<Bytes, ResvError>;

    /// POST a JSON body to a path and return the response body.
    async fn post_json(&self, path: &str, body: Bytes) -> Result<Bytes, ResvError>;
}

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new transport from config.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token={}", token))
                    .context("Invalid token format")?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.cluster_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a URL for a path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body and map the status to success or an error kind.
    async fn handle_response(path: &str, response: reqwest::Response) -> Result<Bytes, ResvError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ResvError::transport(path, Some(status.as_u16()), e.to_string()))?;

        debug!(path, status = status.as_u16(), bytes = body.len(), "Received response");

        if status.is_success() {
            return Ok(body);
        }

        let message = String::from_utf8_lossy(&body).trim().to_string();
        let message = if message.is_empty() {
            status.to_string()
        } else {
            message
        };

        if status == StatusCode::BAD_REQUEST {
            Err(ResvError::Validation {
                status: status.as_u16(),
                message,
            })
        } else {
            Err(ResvError::transport(path, Some(status.as_u16()), message))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Bytes, ResvError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ResvError::transport(path, None, e.to_string()))?;

        Self::handle_response(path, response).await
    }

    async fn post_json(&self, path: &str, body: Bytes) -> Result<Bytes, ResvError> {
        debug!(path, bytes = body.len(), "POST");
        let response = self
            .client
            .post(self.url(path))
            .body(body)
            .send()
            .await
            .map_err(|e| ResvError::transport(path, None, e.to_string()))?;

        Self::handle_response(path, response).await
    }
}
