//! The `HttpClient` seam and its default `reqwest` implementation.
//!
//! # Design
//! `RequestState` never talks to the network itself. It builds an
//! `HttpRequest`, awaits `HttpClient::execute`, and interprets the
//! `HttpResponse`. Non-2xx responses come back as data; classifying them is
//! the caller's job, so a stub client and `ReqwestClient` are treated the
//! same way.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, HttpError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes an `HttpRequest`.
///
/// Return `ClientError::Http` for failures that come from the request itself
/// (connection refused, reset, unreadable body) and `ClientError::Other` for
/// anything else.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).execute(request).await
    }
}

/// Settings for the default client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Prefix for relative request URLs.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// `HttpClient` backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    base_url: Option<String>,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: config
                .base_url
                .as_deref()
                .map(|base| base.trim_end_matches('/').to_string()),
        }
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn from_reqwest(inner: reqwest::Client) -> Self {
        Self {
            inner,
            base_url: None,
        }
    }

    fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => {
                format!("{base}/{}", url.trim_start_matches('/'))
            }
            _ => url.to_string(),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Http(HttpError::network(err.to_string()))
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let url = self.resolve(&request.url);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.inner.request(to_reqwest_method(request.method), &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(network)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(network)?;

        debug!(%url, status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
