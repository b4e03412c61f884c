//! # Grafana API
//!
//! A small Rust client for the [Grafana HTTP API](https://grafana.com/docs/grafana/latest/developers/http_api/).
//!
//! ## Features
//!
//! - Basic auth (`user:password`) or bearer auth (API key / service account
//!   token), picked from the shape of the credential
//! - Buffered [`Response`] envelope with status interpretation, JSON binding and
//!   best-effort error message extraction
//! - Stable [`GrafanaError::NotFound`] / [`GrafanaError::Conflict`] sentinels
//! - Opt-in request/response dumps through `tracing` (see [`WireLog`])
//! - Typed accessors, e.g. [`GrafanaClient::alerts`]
//!
//! Only status 200 counts as success. The client never retries; plug retry or
//! timeout policies into the `reqwest` client passed to
//! [`GrafanaClient::with_client`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use grafana_api::{GrafanaClient, GrafanaError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GrafanaClient::new("glsa_service_account_token", "http://localhost:3000")?;
//!
//!     match client.alerts().await {
//!         Ok(alerts) => println!("{} alerts", alerts.len()),
//!         Err(GrafanaError::NotFound) => println!("legacy alerting is disabled"),
//!         Err(err) => return Err(err.into()),
//!     }
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod errors;
mod response;
mod types;
mod wire_log;

pub use auth::Auth;
pub use client::GrafanaClient;
pub use errors::{GrafanaError, Result};
pub use response::Response;
pub use types::AlertSummary;
pub use wire_log::{WireLog, WIRE_LOG_ENV};

pub use reqwest::Method;
