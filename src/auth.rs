//! Authentication handling for the JIRA API.
//!
//! JIRA Cloud uses Basic Auth with an email address and an API token.
//! The token is encoded into the authorization header immediately and
//! the raw token is not stored.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Credentials used by the HTTP transport.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The complete authorization header value, if authenticated.
    auth_header: Option<String>,
}

impl Credentials {
    /// Create Basic Auth credentials from an email address and API token.
    pub fn basic(email: &str, token: &str) -> Self {
        Self {
            auth_header: Some(build_auth_header(email, token)),
        }
    }

    /// Access the API anonymously, with no authorization header.
    pub fn anonymous() -> Self {
        Self { auth_header: None }
    }

    /// Get the authorization header value for HTTP requests, if any.
    pub(crate) fn header_value(&self) -> Option<&str> {
        self.auth_header.as_deref()
    }
}

/// Build the Basic Auth header value.
///
/// Encodes "email:token" in Base64 and prepends "Basic ".
fn build_auth_header(email: &str, token: &str) -> String {
    let credentials = format!("{}:{}", email, token);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}
