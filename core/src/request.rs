//! Request state: result, error and busy flag around one HTTP client.
//!
//! # Design
//! Each verb method funnels into `perform`, which marks the state busy,
//! executes the request, writes either `data` or `error`, and clears the
//! busy flag last. The field that was not written keeps its prior value.
//!
//! Failures never leave `perform`. Transport-classified failures (a
//! `ClientError::Http` from the client, or a non-2xx response) are stored
//! verbatim; everything else becomes `GENERIC_ERROR_MESSAGE`, including a
//! client that panics. The busy flag is cleared by a drop guard, so it also
//! resets when the caller drops the call before it settles.
//!
//! Calls are not sequenced. Two overlapping calls on one instance both run
//! to completion and the one that settles last owns the final state.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::busy::BusyFlag;
use crate::client::{HttpClient, ReqwestClient};
use crate::error::{HttpError, RequestError};
use crate::http::{HttpMethod, HttpRequest};
use crate::observable::Observable;

/// Stops the busy flag when dropped.
struct StopOnDrop<'a>(&'a BusyFlag);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Point-in-time copy of a `RequestState`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot<T> {
    pub data: Option<T>,
    pub error: Option<RequestError>,
    pub is_loading: bool,
}

/// Result, error and busy state for HTTP calls made through one client.
///
/// Starts out loading with no data and no error.
pub struct RequestState<T> {
    client: Arc<dyn HttpClient>,
    data: Observable<Option<T>>,
    error: Observable<Option<RequestError>>,
    busy: BusyFlag,
}

impl<T> RequestState<T> {
    /// Create a state bound to `client`, or to a fresh `ReqwestClient` with
    /// default settings when `None`.
    pub fn new(client: Option<Arc<dyn HttpClient>>) -> Self {
        let client = client.unwrap_or_else(|| Arc::new(ReqwestClient::new()));
        Self {
            client,
            data: Observable::new(None),
            error: Observable::new(None),
            busy: BusyFlag::new(true),
        }
    }

    pub fn with_client(client: impl HttpClient + 'static) -> Self {
        Self::new(Some(Arc::new(client)))
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_loading()
    }

    pub fn error(&self) -> Option<RequestError> {
        self.error.get()
    }

    pub fn subscribe_data(&self) -> watch::Receiver<Option<T>> {
        self.data.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<RequestError>> {
        self.error.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }
}

impl<T: Clone> RequestState<T> {
    pub fn data(&self) -> Option<T> {
        self.data.get()
    }

    pub fn snapshot(&self) -> RequestSnapshot<T> {
        RequestSnapshot {
            data: self.data(),
            error: self.error(),
            is_loading: self.is_loading(),
        }
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> std::fmt::Debug for RequestState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestState")
            .field("error", &self.error.get())
            .field("is_loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> RequestState<T> {
    pub async fn get(&self, url: &str) {
        self.perform::<()>(HttpMethod::Get, url, None).await;
    }

    pub async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) {
        self.perform(HttpMethod::Post, url, Some(body)).await;
    }

    pub async fn put<B: Serialize + ?Sized>(&self, url: &str, body: &B) {
        self.perform(HttpMethod::Put, url, Some(body)).await;
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, url: &str, body: &B) {
        self.perform(HttpMethod::Patch, url, Some(body)).await;
    }

    pub async fn del(&self, url: &str) {
        self.perform::<()>(HttpMethod::Delete, url, None).await;
    }

    async fn perform<B: Serialize + ?Sized>(&self, method: HttpMethod, url: &str, body: Option<&B>) {
        self.busy.start();
        let _idle = StopOnDrop(&self.busy);
        match self.send(method, url, body).await {
            Ok(payload) => {
                debug!(%method, url, "request succeeded");
                self.data.set(Some(payload));
            }
            Err(err) => self.error.set(Some(err)),
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError> {
        let mut request = HttpRequest::new(method, url);
        if let Some(body) = body {
            request = request.with_json(body).map_err(|err| {
                warn!(%method, url, error = %err, "request body could not be serialized");
                RequestError::generic()
            })?;
        }

        let executed = AssertUnwindSafe(self.client.execute(request))
            .catch_unwind()
            .await;
        let response = match executed {
            Ok(result) => result.map_err(|err| {
                warn!(%method, url, error = %err, "request failed");
                RequestError::from(err)
            })?,
            Err(_) => {
                warn!(%method, url, "http client panicked");
                return Err(RequestError::generic());
            }
        };

        if !response.is_success() {
            warn!(%method, url, status = response.status, "request returned error status");
            return Err(RequestError::Http(HttpError::from_response(
                response.status,
                &response.body,
            )));
        }

        // An empty body decodes as JSON `null`, so `()`, `Option<_>` and
        // `serde_json::Value` all accept a 204.
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|err| {
            warn!(%method, url, error = %err, "response body could not be decoded");
            RequestError::generic()
        })
    }
}
