//! Error types for HTTP calls and request state.
//!
//! # Design
//! `HttpError` is the structured, transport-classified failure: either the
//! server answered with a non-2xx status, or no response arrived at all.
//! `ClientError` is what an `HttpClient` returns and carries the
//! transport/other split. `RequestError` is what ends up in
//! `RequestState::error`: the `HttpError` verbatim, or a fixed message for
//! everything else.

use serde::Serialize;
use thiserror::Error;

/// Message stored for any failure that is not transport-classified.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// A failure originating from the request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HttpError {
    /// The server returned a status outside 2xx.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// No usable response: connect, DNS, I/O or body-read failure.
    #[error("network error: {message}")]
    Network { message: String },
}

impl HttpError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        HttpError::Status {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        HttpError::Network {
            message: message.into(),
        }
    }

    /// Status code of the response, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Network { .. } => None,
        }
    }

    /// Build the error for a non-2xx response. An empty body falls back to
    /// a generic "Request failed" message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("Request failed with status code {status}")
        } else {
            body.to_string()
        };
        HttpError::status(status, message)
    }
}

/// Errors returned by `HttpClient::execute`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-classified failure; kept verbatim by `RequestState`.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Anything else the client failed with.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    pub fn other(message: impl Into<String>) -> Self {
        ClientError::Other(message.into())
    }
}

/// The value held in `RequestState::error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(untagged)]
pub enum RequestError {
    #[error(transparent)]
    Http(HttpError),

    #[error("{0}")]
    Message(String),
}

impl RequestError {
    /// The fixed message used for unrecognized failures.
    pub fn generic() -> Self {
        RequestError::Message(GENERIC_ERROR_MESSAGE.to_string())
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            RequestError::Http(err) => Some(err),
            RequestError::Message(_) => None,
        }
    }
}

impl From<ClientError> for RequestError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(err) => RequestError::Http(err),
            ClientError::Other(_) => RequestError::generic(),
        }
    }
}
