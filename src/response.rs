use hyper::ext::ReasonPhrase;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use crate::errors::{GrafanaError, Result};

/// Outcome of a single request, with the body buffered up front
///
/// The body is read exactly once when the envelope is built, so
/// [`bind_json`](Response::bind_json), [`message`](Response::message) and
/// [`error`](Response::error) can all be called repeatedly and see the same data.
///
/// A failure to obtain a response at all (DNS, connection refused, TLS, timeout)
/// does not short-circuit: it is captured here and reported by [`error`](Response::error),
/// so callers always have a single value to inspect.
#[derive(Debug, Clone)]
pub struct Response {
    status: Option<StatusCode>,
    reason: Option<String>,
    headers: HeaderMap,
    url: Option<Url>,
    body: Vec<u8>,
    transport_error: Option<Arc<reqwest_middleware::Error>>,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

impl Response {
    /// Build an envelope from the result of dispatching a request
    ///
    /// Reads the whole body. A body that fails to arrive is recorded as a
    /// transport error alongside the status that was received.
    pub async fn from_result(
        result: std::result::Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                return Self {
                    status: None,
                    reason: None,
                    headers: HeaderMap::new(),
                    url: None,
                    body: Vec::new(),
                    transport_error: Some(Arc::new(err)),
                }
            }
        };

        let status = response.status();
        // Only present when the server sent a non-canonical reason phrase.
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned());
        let headers = response.headers().clone();
        let url = response.url().clone();

        let (body, transport_error) = match response.bytes().await {
            Ok(bytes) => (bytes.to_vec(), None),
            Err(err) => (
                Vec::new(),
                Some(Arc::new(reqwest_middleware::Error::Reqwest(err))),
            ),
        };

        Self {
            status: Some(status),
            reason,
            headers,
            url: Some(url),
            body,
            transport_error,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(status: u16, body: &[u8]) -> Self {
        Self {
            status: Some(StatusCode::from_u16(status).unwrap()),
            reason: None,
            headers: HeaderMap::new(),
            url: None,
            body: body.to_vec(),
            transport_error: None,
        }
    }

    /// `true` iff a response arrived and its status is exactly 200
    pub fn ok(&self) -> bool {
        self.error().is_none()
    }

    /// Interpret the outcome
    ///
    /// A captured transport error wins. Otherwise only status 200 counts as
    /// success: 404 maps to [`GrafanaError::NotFound`], 409 to
    /// [`GrafanaError::Conflict`], every other code (201 and 204 included) to
    /// [`GrafanaError::Status`].
    pub fn error(&self) -> Option<GrafanaError> {
        if let Some(err) = &self.transport_error {
            return Some(GrafanaError::Transport(Arc::clone(err)));
        }

        // Only envelopes carrying a transport error lack a status.
        let status = self.status?;

        match status.as_u16() {
            200 => None,
            404 => Some(GrafanaError::NotFound),
            409 => Some(GrafanaError::Conflict),
            code => Some(GrafanaError::Status {
                status: code,
                status_line: self.status_line().unwrap_or_default(),
            }),
        }
    }

    /// Decode the buffered body as JSON
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::Decoding`] if the body does not match `T`,
    /// including when the body is empty.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| GrafanaError::Decoding(Arc::new(e)))
    }

    /// Best-effort `{"message": "..."}` extraction for human-readable errors
    ///
    /// Returns an empty string when the body has no such field or is not JSON.
    /// Decoding failures are intentionally discarded here and nowhere else;
    /// do not branch on the result.
    pub fn message(&self) -> String {
        serde_json::from_slice::<MessageBody>(&self.body)
            .map(|body| body.message)
            .unwrap_or_default()
    }

    /// HTTP status, absent if no response arrived
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Status line text, e.g. `404 Not Found`
    ///
    /// Uses the reason phrase the server sent, falling back to the canonical one.
    pub fn status_line(&self) -> Option<String> {
        let status = self.status?;
        let reason = self.reason.as_deref().or(status.canonical_reason());
        Some(match reason {
            Some(reason) => format!("{} {}", status.as_str(), reason),
            None => status.as_str().to_string(),
        })
    }

    /// Response headers, empty if no response arrived
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL of the response, after redirects
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Buffered body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The failure that prevented a complete response, if any
    pub fn transport_error(&self) -> Option<&reqwest_middleware::Error> {
        self.transport_error.as_deref()
    }
}
