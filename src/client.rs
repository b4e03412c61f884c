use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Request};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Serialize;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

use crate::auth::Auth;
use crate::errors::{GrafanaError, Result};
use crate::response::Response;
use crate::types::AlertSummary;
use crate::wire_log::WireLog;

/// Client for the Grafana HTTP API
///
/// Every request carries the same `Authorization` header, derived once from the
/// credential given at construction, and `Content-Type: application/json`.
///
/// Clones share the underlying HTTP client and the
/// [`last_status_code`](GrafanaClient::last_status_code) cell.
///
/// # Example
///
/// ```rust,no_run
/// use grafana_api::{GrafanaClient, WireLog};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = GrafanaClient::new("admin:admin", "http://localhost:3000")?
///         .with_wire_log(WireLog::from_env());
///
///     for alert in client.alerts().await? {
///         println!("{} is {}", alert.name, alert.state);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GrafanaClient {
    client: ClientWithMiddleware,
    base_url: Url,
    // Paths are appended to the base URL exactly as the caller wrote it.
    base: String,
    auth: Auth,
    auth_header: HeaderValue,
    wire_log: WireLog,
    last_status_code: Arc<AtomicU16>,
}

impl GrafanaClient {
    /// Create a new Grafana client
    ///
    /// # Arguments
    ///
    /// * `auth` - Either `user:password` (basic auth) or an API key / service
    ///   account token (bearer auth)
    /// * `base_url` - Base URL of the Grafana instance (e.g., `http://localhost:3000`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is malformed, the credential cannot be
    /// sent as a header, or the HTTP client cannot be built.
    pub fn new(auth: &str, base_url: &str) -> Result<Self> {
        let api_url = parse_base_url(base_url)?;

        let client = Client::builder()
            .build()
            .map_err(|e| GrafanaError::BuildHttpClient(Arc::new(e)))?;

        let client = ClientBuilder::new(client).build();

        Self::assemble(client, auth, base_url, api_url)
    }

    /// Create a new client with a custom reqwest middleware client
    ///
    /// Timeouts, proxies, retries and pooling are all the concern of the
    /// supplied client; this library adds none of its own.
    pub fn with_client(client: ClientWithMiddleware, auth: &str, base_url: &str) -> Result<Self> {
        let api_url = parse_base_url(base_url)?;
        Self::assemble(client, auth, base_url, api_url)
    }

    fn assemble(
        client: ClientWithMiddleware,
        auth: &str,
        base: &str,
        base_url: Url,
    ) -> Result<Self> {
        let auth = Auth::parse(auth);
        let mut auth_header =
            HeaderValue::from_str(auth.header_value()).map_err(|_| GrafanaError::InvalidCredential)?;
        auth_header.set_sensitive(true);

        debug!(base_url = %base, basic_auth = auth.is_basic(), "Created Grafana client");

        Ok(Self {
            client,
            base_url,
            base: base.to_string(),
            auth,
            auth_header,
            wire_log: WireLog::Off,
            last_status_code: Arc::new(AtomicU16::new(0)),
        })
    }

    /// Set how much of each request/response pair is dumped to the
    /// `grafana_api::wire` tracing target
    pub fn with_wire_log(mut self, wire_log: WireLog) -> Self {
        self.wire_log = wire_log;
        self
    }

    /// Build a request for `path`, appended verbatim to the base URL
    ///
    /// No slash normalization happens: `path` should start with `/` and the base
    /// URL should not end with one.
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::InvalidRequest`] if the resulting URL is invalid.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Request> {
        let url = format!("{}{}", self.base, path);

        let mut builder = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, self.auth_header.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder
            .build()
            .map_err(|e| GrafanaError::InvalidRequest(Arc::new(e)))
    }

    /// Build a request whose body is `value` encoded as JSON
    ///
    /// # Errors
    ///
    /// Returns [`GrafanaError::Serialization`] if `value` cannot be encoded.
    pub fn build_json_request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        value: &T,
    ) -> Result<Request> {
        let body =
            serde_json::to_vec(value).map_err(|e| GrafanaError::Serialization(Arc::new(e)))?;
        self.build_request(method, path, Some(body))
    }

    /// Send a request and buffer its response
    ///
    /// Never fails on its own: network errors are captured in the returned
    /// [`Response`]. No retry is attempted.
    pub async fn execute(&self, request: Request) -> Response {
        self.wire_log.log_request(&request);

        let result = self.client.execute(request).await;
        if let Ok(response) = &result {
            self.last_status_code
                .store(response.status().as_u16(), Ordering::Relaxed);
        }

        let response = Response::from_result(result).await;

        match response.status() {
            Some(status) => {
                debug!(url = ?response.url().map(Url::as_str), %status, "Received response");
                self.wire_log
                    .log_response(Some(status), response.headers(), response.body());
            }
            None => debug!("Request failed before a response arrived"),
        }

        response
    }

    /// Build and send a request
    ///
    /// The outer `Result` only covers building the request; check
    /// [`Response::ok`] for the outcome.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let request = self.build_request(method, path, body)?;
        Ok(self.execute(request).await)
    }

    /// Build and send a request with a JSON body
    pub async fn request_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        value: &T,
    ) -> Result<Response> {
        let request = self.build_json_request(method, path, value)?;
        Ok(self.execute(request).await)
    }

    /// List alert summaries
    ///
    /// # Errors
    ///
    /// Returns the interpreted response error ([`GrafanaError::NotFound`],
    /// [`GrafanaError::Status`], [`GrafanaError::Transport`], ...) or a
    /// [`GrafanaError::Decoding`] error if the body is not a list of alerts.
    /// Use `unwrap_or_default()` to fall back to an empty list.
    #[instrument(name = "GrafanaClient::alerts", skip_all)]
    pub async fn alerts(&self) -> Result<Vec<AlertSummary>> {
        let response = self.request(Method::GET, "/api/alerts", None).await?;

        if let Some(err) = response.error() {
            return Err(err);
        }

        let alerts: Vec<AlertSummary> = response.bind_json()?;

        debug!(alert_count = alerts.len(), "Fetched alerts");
        Ok(alerts)
    }

    /// Get the base API URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the credential classification used for every request
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get the diagnostic dump level
    pub fn wire_log(&self) -> WireLog {
        self.wire_log
    }

    /// Status code of the most recent response received by this client or any
    /// of its clones
    ///
    /// Concurrent requests race on this value; the last one to complete wins.
    /// Requests that failed before a response arrived leave it untouched.
    pub fn last_status_code(&self) -> Option<u16> {
        match self.last_status_code.load(Ordering::Relaxed) {
            0 => None,
            code => Some(code),
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url).map_err(GrafanaError::Configuration)
}
