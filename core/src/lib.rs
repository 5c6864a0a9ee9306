//! UI state helpers for HTTP-backed views.
//!
//! # Overview
//! - `BusyFlag` is a boolean "operation in flight" cell.
//! - `RequestState<T>` keeps the last result, the last error and a busy flag
//!   for calls made through an `HttpClient`, with one method per HTTP verb.
//!
//! # Design
//! - State lives in `Observable` cells backed by `tokio::sync::watch`, so a
//!   host re-renders by awaiting a receiver instead of relying on a reactive
//!   UI runtime.
//! - The HTTP client is injected through the `HttpClient` trait. When none is
//!   given, `RequestState` builds a `ReqwestClient` with default settings.
//! - Failures are absorbed into the `error` field and never returned.

pub mod busy;
pub mod client;
pub mod error;
pub mod http;
pub mod observable;
pub mod request;

pub use busy::BusyFlag;
pub use client::{ClientConfig, HttpClient, ReqwestClient};
pub use error::{ClientError, HttpError, RequestError, GENERIC_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use observable::Observable;
pub use request::{RequestSnapshot, RequestState};
