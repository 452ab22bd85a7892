//! HTTP client for planner requests
//!
//! Issues the planning GET requests and hands back the raw body.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Url};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Failed to read response body: {0}")]
    BodyRead(String),
}

/// Raw planner response
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Transport that performs one planning call
#[async_trait]
pub trait PlanTransport {
    async fn fetch(&self, url: &Url) -> Result<HttpResponse, HttpError>;
}

/// reqwest-backed planner transport
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Create client with a per-request timeout
    pub fn with_timeout(timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, timeout_ms })
    }
}

#[async_trait]
impl PlanTransport for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<HttpResponse, HttpError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(self.timeout_ms)
                } else if e.is_connect() {
                    HttpError::ConnectionRefused(url.to_string())
                } else {
                    HttpError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_ms)
            } else {
                HttpError::BodyRead(e.to_string())
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            body,
            duration_ms,
        })
    }
}
