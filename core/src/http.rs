//! HTTP transport types passed across the `HttpClient` seam.
//!
//! # Design
//! Requests and responses are plain data. `RequestState` builds an
//! `HttpRequest`, hands it to whatever `HttpClient` it was given, and
//! interprets the returned `HttpResponse`. Stub clients in tests only ever
//! see and produce these values, so no network is needed to exercise the
//! state transitions.

use serde::Serialize;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Uppercase wire name, e.g. `"PATCH"`.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A request with no headers and no body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach `payload` as a JSON body and set the matching content type.
    pub fn with_json<B: Serialize + ?Sized>(mut self, payload: &B) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        Ok(self)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
