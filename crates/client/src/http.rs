// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the storefront backend: the single choke point for
//! outbound requests and inbound error normalization.
//!
//! Every request picks up a bearer token from the [`SessionStore`] when one
//! is present. Read operations that need a structured body go out as POST
//! with a method-override marker. A 401 from any endpoint wipes the session
//! and broadcasts [`AuthEvent::SessionExpired`], the reactive counterpart
//! of rehydrating a persisted token without server validation. No request
//! is ever retried; a failed call fails once, fully, to the caller.
//!
//! [`AuthEvent::SessionExpired`]: crate::session::AuthEvent

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult, ErrorKind, FieldError, GENERIC_MESSAGE};
use crate::session::SessionStore;

/// Body code signalling success. Authoritative over the HTTP status: a 2xx
/// response whose envelope carries another code is an error.
pub const SUCCESS_CODE: &str = "200";

/// Marker header telling the server a POST is semantically a GET.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Response envelope used by every backend endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl Envelope {
    /// Deserialize the `data` payload.
    pub fn data_as<T: DeserializeOwned>(&self) -> ApiResult<T> {
        decode_payload(self.data.clone())
    }

    /// Deserialize the `metadata` payload.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> ApiResult<T> {
        decode_payload(self.metadata.clone())
    }
}

fn decode_payload<T: DeserializeOwned>(value: Option<Value>) -> ApiResult<T> {
    serde_json::from_value(value.unwrap_or(Value::Null))
        .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("malformed response payload: {e}")))
}

/// Client for the backend API. Cheap to share behind an [`Arc`]; one
/// instance serves the whole process.
pub struct ApiClient {
    base_url: String,
    session: Arc<SessionStore>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Self {
        Self::with_timeout(base_url, session, Duration::from_secs(10))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder().timeout(timeout).build().unwrap_or_default();
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, session, http }
    }

    /// The session this client reads tokens from and wipes on 401.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Envelope> {
        let mut req = self.http.get(self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        self.execute(req).await
    }

    /// GET semantics with a structured body: sent as POST carrying the
    /// method-override marker so the body survives intermediaries. Callers
    /// get a result identical in shape to a plain GET.
    pub async fn get_with_body<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Envelope> {
        let req = self.http.post(self.url(path)).header(METHOD_OVERRIDE_HEADER, "GET").json(body);
        self.execute(req).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Envelope> {
        self.execute(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> ApiResult<Envelope> {
        self.execute(self.http.post(self.url(path))).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> ApiResult<Envelope> {
        self.execute(self.http.post(self.url(path)).multipart(form)).await
    }

    /// PUT with query parameters and no body (quantity updates, ratings,
    /// activation toggles).
    pub async fn put(&self, path: &str, query: &[(String, String)]) -> ApiResult<Envelope> {
        let mut req = self.http.put(self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        self.execute(req).await
    }

    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Envelope> {
        self.execute(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn put_multipart(&self, path: &str, form: Form) -> ApiResult<Envelope> {
        self.execute(self.http.put(self.url(path)).multipart(form)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Envelope> {
        self.execute(self.http.delete(self.url(path))).await
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> ApiResult<Envelope> {
        let req = self.apply_auth(req).await;
        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("request failed without a response: {e}");
                return Err(ApiError::connectivity());
            }
        };
        self.normalize(resp).await
    }

    /// Map a raw response into an [`Envelope`] or an [`ApiError`] per the
    /// error taxonomy. The one side effect lives here: 401 wipes the session
    /// and notifies subscribers, regardless of which resource was hit.
    async fn normalize(&self, resp: reqwest::Response) -> ApiResult<Envelope> {
        let status = resp.status();
        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("response body read failed: {e}");
                return Err(ApiError::connectivity());
            }
        };

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.session.expire().await;
            let message = server_message(&body)
                .unwrap_or_else(|| "Session expired. Please log in again.".to_owned());
            return Err(ApiError::new(ErrorKind::Auth, message));
        }

        if !status.is_success() {
            let err = error_from_body(status.as_u16(), &body);
            match err.kind {
                ErrorKind::Forbidden => {
                    warn!(status = status.as_u16(), "access forbidden, check permissions");
                }
                ErrorKind::NotFound => {
                    warn!(status = status.as_u16(), "resource not found, check the endpoint path");
                }
                _ => debug!(status = status.as_u16(), "request failed: {}", err.message),
            }
            return Err(err);
        }

        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("malformed response body: {e}")))?;

        // The body code is authoritative even on HTTP success.
        if envelope.code != SUCCESS_CODE {
            let message = envelope.message.clone().unwrap_or_else(|| GENERIC_MESSAGE.to_owned());
            return Err(ApiError::new(ErrorKind::Unknown, message));
        }

        Ok(envelope)
    }
}

/// Extract the server's human-readable message from an error body, if any.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message").and_then(|m| m.as_str()).map(str::to_owned)
}

/// Build an [`ApiError`] from a non-success response, passing the server
/// payload through verbatim. Field-level messages (an object of strings
/// under `data` or `errors`) make it a validation error; otherwise the kind
/// follows the status.
fn error_from_body(status: u16, body: &str) -> ApiError {
    let value: Option<Value> = serde_json::from_str(body).ok();

    let message = value
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| GENERIC_MESSAGE.to_owned());

    let fields = value
        .as_ref()
        .and_then(|v| v.get("data").or_else(|| v.get("errors")))
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(field, msg)| {
                    msg.as_str().map(|m| FieldError::new(field.clone(), m))
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if !fields.is_empty() {
        let mut err = ApiError::validation(fields);
        err.message = message;
        return err;
    }

    ApiError::new(ErrorKind::from_status(status), message)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
