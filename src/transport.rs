//! HTTP transport for the JIRA REST API.
//!
//! The rest of the crate talks to JIRA exclusively through the
//! [`Transport`] trait: four verbs, each returning parsed JSON.
//! [`HttpTransport`] is the production implementation over a blocking
//! `reqwest` client; tests substitute in-memory fakes.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{header, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::error::{Error, Result};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blocking JSON transport to a JIRA instance.
///
/// Paths are relative to the instance base URL (for example
/// `rest/api/2/issue/PROJ-123`). Each call blocks until the HTTP
/// exchange completes or fails; authentication, timeouts, and
/// connection pooling live here, not in the callers.
pub trait Transport: Send + Sync {
    /// Perform a GET request and parse the response body as JSON.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;

    /// Perform a POST request with a JSON body.
    ///
    /// A `Value::Null` body sends an empty request body.
    fn post(&self, path: &str, body: &Value) -> Result<Value>;

    /// Perform a PUT request with a JSON body.
    fn put(&self, path: &str, body: &Value) -> Result<Value>;

    /// Perform a DELETE request.
    ///
    /// Returns `Value::Null` when the server answers with an empty body.
    fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}

/// Production [`Transport`] backed by `reqwest::blocking`.
pub struct HttpTransport {
    /// The HTTP client.
    http: Client,
    /// The base URL for the JIRA instance.
    base_url: String,
    /// Authentication credentials.
    credentials: Credentials,
}

impl HttpTransport {
    /// Create a transport for the given instance URL and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
            credentials,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for a path and query parameters.
    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, path);
        let mut separator = '?';
        for (name, value) in query {
            url.push(separator);
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }
        url
    }

    fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(path, query);
        debug!(%method, %url, "sending request");

        let mut request = self
            .http
            .request(method, &url)
            .header(header::ACCEPT, "application/json");

        if let Some(value) = self.credentials.header_value() {
            request = request.header(header::AUTHORIZATION, value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        handle_response(request.send()?)
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.execute(Method::GET, path, query, None)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let body = (!body.is_null()).then_some(body);
        self.execute(Method::POST, path, &[], body)
    }

    fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.execute(Method::PUT, path, &[], Some(body))
    }

    fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.execute(Method::DELETE, path, query, None)
    }
}

/// Check the HTTP status and parse the body as a JSON envelope.
fn handle_response(response: Response) -> Result<Value> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text()?;

    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::payload(format!("response was not valid JSON: {}", e)))
    } else {
        debug!(%status, body = %body, "error response");
        Err(error_from_response(status, &url, &body))
    }
}

/// Create an appropriate error from a non-success HTTP response.
///
/// JIRA error bodies usually carry `errorMessages` and/or a keyed
/// `errors` object; both are folded into the error message when present.
fn error_from_response(status: StatusCode, url: &str, body: &str) -> Error {
    let mut message = url.to_string();

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let mut parts: Vec<String> = Vec::new();

        if let Some(messages) = json.get("errorMessages").and_then(Value::as_array) {
            parts.extend(messages.iter().filter_map(Value::as_str).map(str::to_owned));
        }

        if let Some(errors) = json.get("errors").and_then(Value::as_object) {
            parts.extend(errors.iter().map(|(k, v)| {
                format!("{}: {}", k, v.as_str().unwrap_or(&v.to_string()))
            }));
        }

        if !parts.is_empty() {
            message = parts.join(", ");
        }
    }

    Error::Status {
        status: status.as_u16(),
        message,
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!(%url, "URL does not use HTTPS; this is insecure for production use");
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_handles_multiple_slashes() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/jira/"),
            "https://company.atlassian.net/jira"
        );
    }

    #[test]
    fn test_url_encodes_query_values() {
        let transport = HttpTransport::new(
            "https://company.atlassian.net",
            Credentials::anonymous(),
        )
        .unwrap();

        let url = transport.url(
            "rest/api/2/search",
            &[
                ("jql", "project = TEST AND status = \"In Progress\"".to_string()),
                ("maxResults", "50".to_string()),
            ],
        );

        assert_eq!(
            url,
            "https://company.atlassian.net/rest/api/2/search\
             ?jql=project%20%3D%20TEST%20AND%20status%20%3D%20%22In%20Progress%22\
             &maxResults=50"
        );
    }

    #[test]
    fn test_error_from_response_extracts_error_messages() {
        let err = error_from_response(
            StatusCode::NOT_FOUND,
            "https://example.com/rest/api/2/issue/NOPE-1",
            r#"{"errorMessages": ["Issue does not exist"], "errors": {}}"#,
        );

        match err {
            Error::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Issue does not exist");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_response_extracts_keyed_errors() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            "https://example.com/rest/api/2/issue",
            r#"{"errorMessages": [], "errors": {"summary": "Summary is required."}}"#,
        );

        match err {
            Error::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "summary: Summary is required.");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_response_falls_back_to_url() {
        let err = error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "https://example.com/rest/api/2/search",
            "",
        );

        match err {
            Error::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "https://example.com/rest/api/2/search");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
