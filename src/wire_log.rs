//! Opt-in dumps of outgoing requests and incoming responses.
//!
//! The level is fixed when the client is built. Dumps are emitted as
//! `debug` events on the `grafana_api::wire` target, so a subscriber must
//! enable that target for them to show up.

use reqwest::header::HeaderMap;
use reqwest::{Request, StatusCode};
use std::fmt::Write as _;

/// Environment variable read by [`WireLog::from_env`]
pub const WIRE_LOG_ENV: &str = "GF_LOG";

const REDACTED: &str = "<redacted>";

/// How much of each HTTP exchange to dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireLog {
    /// Nothing is rendered
    #[default]
    Off,
    /// Request line and headers, response headers
    Headers,
    /// Everything in `Headers` plus request and response bodies
    HeadersAndBody,
}

impl WireLog {
    /// Read the level from `GF_LOG`
    ///
    /// Unset or empty disables dumps, `2` includes bodies, any other value
    /// dumps headers only.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(WIRE_LOG_ENV).ok().as_deref())
    }

    /// Map a raw toggle value to a level
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") => WireLog::Off,
            Some("2") => WireLog::HeadersAndBody,
            Some(_) => WireLog::Headers,
        }
    }

    /// Check if anything is dumped at this level
    pub fn is_enabled(self) -> bool {
        self != WireLog::Off
    }

    fn includes_body(self) -> bool {
        self == WireLog::HeadersAndBody
    }

    /// Render an outgoing request, or `None` when dumps are off
    pub fn render_request(self, request: &Request) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let mut out = format!("HTTP/1.1 {} {}\n", request.method(), request.url());
        write_headers(&mut out, request.headers());

        if self.includes_body() {
            if let Some(body) = request.body().and_then(|body| body.as_bytes()) {
                out.push_str(&String::from_utf8_lossy(body));
                out.push('\n');
            }
        }

        Some(out)
    }

    /// Render a buffered response, or `None` when dumps are off
    pub fn render_response(
        self,
        status: Option<StatusCode>,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let mut out = String::from("RESPONSE HEADERS:\n");
        if let Some(status) = status {
            let _ = writeln!(out, "HTTP/1.1 {status}");
        }
        write_headers(&mut out, headers);

        if self.includes_body() {
            out.push('\n');
            out.push_str(&String::from_utf8_lossy(body));
            out.push('\n');
        }

        Some(out)
    }

    pub(crate) fn log_request(self, request: &Request) {
        if let Some(dump) = self.render_request(request) {
            tracing::debug!(target: "grafana_api::wire", "\n{dump}");
        }
    }

    pub(crate) fn log_response(self, status: Option<StatusCode>, headers: &HeaderMap, body: &[u8]) {
        if let Some(dump) = self.render_response(status, headers, body) {
            tracing::debug!(target: "grafana_api::wire", "\n{dump}");
        }
    }
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if value.is_sensitive() {
            REDACTED
        } else {
            value.to_str().unwrap_or("<non-utf8>")
        };
        let _ = writeln!(out, "{name}: {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
    use reqwest::Method;

    fn sample_request() -> Request {
        let mut request = Request::new(
            Method::POST,
            "http://localhost:3000/api/dashboards/db".parse().unwrap(),
        );
        let mut auth = HeaderValue::from_static("Bearer secret-key");
        auth.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, auth);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(r#"{"title":"cpu"}"#.into());
        request
    }

    #[test]
    fn test_from_value() {
        assert_eq!(WireLog::from_value(None), WireLog::Off);
        assert_eq!(WireLog::from_value(Some("")), WireLog::Off);
        assert_eq!(WireLog::from_value(Some("1")), WireLog::Headers);
        assert_eq!(WireLog::from_value(Some("true")), WireLog::Headers);
        assert_eq!(WireLog::from_value(Some("2")), WireLog::HeadersAndBody);
    }

    #[test]
    fn test_off_renders_nothing() {
        let request = sample_request();
        assert!(WireLog::Off.render_request(&request).is_none());
        assert!(WireLog::Off
            .render_response(Some(StatusCode::OK), &HeaderMap::new(), b"[]")
            .is_none());
    }

    #[test]
    fn test_headers_level_skips_body() {
        let dump = WireLog::Headers.render_request(&sample_request()).unwrap();
        assert!(dump.starts_with("HTTP/1.1 POST http://localhost:3000/api/dashboards/db\n"));
        assert!(dump.contains("content-type: application/json\n"));
        assert!(!dump.contains("cpu"));
    }

    #[test]
    fn test_body_level_includes_body() {
        let dump = WireLog::HeadersAndBody
            .render_request(&sample_request())
            .unwrap();
        assert!(dump.contains(r#"{"title":"cpu"}"#));
    }

    #[test]
    fn test_authorization_redacted() {
        let dump = WireLog::HeadersAndBody
            .render_request(&sample_request())
            .unwrap();
        assert!(dump.contains("authorization: <redacted>\n"));
        assert!(!dump.contains("secret-key"));
    }

    #[test]
    fn test_response_levels() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = br#"{"message":"not found"}"#;

        let dump = WireLog::Headers
            .render_response(Some(StatusCode::NOT_FOUND), &headers, body)
            .unwrap();
        assert!(dump.starts_with("RESPONSE HEADERS:\n"));
        assert!(dump.contains("HTTP/1.1 404 Not Found\n"));
        assert!(dump.contains("content-type: application/json\n"));
        assert!(!dump.contains("message"));

        let dump = WireLog::HeadersAndBody
            .render_response(Some(StatusCode::NOT_FOUND), &headers, body)
            .unwrap();
        assert!(dump.contains(r#"{"message":"not found"}"#));
    }
}
