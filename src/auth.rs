//! Credential classification and `Authorization` header values.

use base64::{engine::general_purpose, Engine as _};
use std::fmt;

/// Authorization scheme inferred from the shape of a credential string
///
/// A credential containing `:` is treated as `user:password` and sent as
/// HTTP basic auth; anything else is an API key sent as a bearer token.
/// Each variant holds the complete header value.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Basic <base64(user:password)>`
    Basic(String),
    /// `Bearer <api key>`
    Bearer(String),
}

impl Auth {
    /// Classify a credential string
    ///
    /// ```rust
    /// use grafana_api::Auth;
    ///
    /// assert_eq!(Auth::parse("admin:admin").header_value(), "Basic YWRtaW46YWRtaW4=");
    /// assert_eq!(Auth::parse("glsa_abc123").header_value(), "Bearer glsa_abc123");
    /// ```
    pub fn parse(credential: &str) -> Self {
        if credential.contains(':') {
            let encoded = general_purpose::STANDARD.encode(credential.as_bytes());
            Auth::Basic(format!("Basic {encoded}"))
        } else {
            Auth::Bearer(format!("Bearer {credential}"))
        }
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> &str {
        match self {
            Auth::Basic(value) | Auth::Bearer(value) => value,
        }
    }

    /// Check if the credential was a `user:password` pair
    pub fn is_basic(&self) -> bool {
        matches!(self, Auth::Basic(_))
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Basic(_) => f.write_str("Basic(<redacted>)"),
            Auth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_selects_basic() {
        let auth = Auth::parse("admin:admin");
        assert!(auth.is_basic());
        assert_eq!(auth.header_value(), "Basic YWRtaW46YWRtaW4=");
    }

    #[test]
    fn test_basic_encodes_whole_credential() {
        let credential = "user:pa:ss";
        let expected = format!(
            "Basic {}",
            general_purpose::STANDARD.encode(credential.as_bytes())
        );
        assert_eq!(Auth::parse(credential).header_value(), expected);
    }

    #[test]
    fn test_no_colon_selects_bearer() {
        let auth = Auth::parse("eyJrIjoiT0tTcG1pUlY2RnVKZTFVaDFsNFZXdE9ZWmNrMkZYbk");
        assert!(!auth.is_basic());
        assert_eq!(
            auth.header_value(),
            "Bearer eyJrIjoiT0tTcG1pUlY2RnVKZTFVaDFsNFZXdE9ZWmNrMkZYbk"
        );
    }

    #[test]
    fn test_empty_credential_is_bearer() {
        assert_eq!(Auth::parse(""), Auth::Bearer("Bearer ".to_string()));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", Auth::parse("admin:secret"));
        assert_eq!(rendered, "Basic(<redacted>)");
        let rendered = format!("{:?}", Auth::parse("token"));
        assert!(!rendered.contains("token"));
    }
}
