//! Error types for the JIRA client.
//!
//! Every fallible operation in this crate returns [`Error`]. Failures
//! surface as a single operation-failed condition: a human-readable
//! message naming the attempted action, with the underlying cause (when
//! there is one) reachable through `source()`.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the JIRA API.
#[derive(Debug, Error)]
pub enum Error {
    /// An API operation failed.
    ///
    /// The message identifies the attempted action (for example
    /// "failed to retrieve issue PROJ-123"); the wrapped error carries
    /// the transport- or payload-level detail.
    #[error("{message}")]
    Failed {
        /// Description of the attempted action.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<Error>>,
    },

    /// The HTTP layer failed before a usable response was received.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Detail extracted from the response body, or the request URL.
        message: String,
    },

    /// The response body was not the JSON shape the operation expected.
    #[error("unexpected payload: {0}")]
    Payload(String),

    /// A fluent builder was submitted with no fields or operations.
    #[error("no fields were given for {0}")]
    EmptyRequest(&'static str),

    /// Field metadata was missing or unrecognizable while shaping a
    /// value for a write request.
    #[error("malformed metadata for field '{field}': {detail}")]
    MalformedMetadata {
        /// The field the caller tried to write.
        field: String,
        /// What was wrong with the metadata.
        detail: String,
    },

    /// A connection configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a payload-shape error.
    pub(crate) fn payload(detail: impl Into<String>) -> Self {
        Error::Payload(detail.into())
    }

    /// Wrap this error with a message naming the attempted action.
    pub(crate) fn ctx(self, message: impl Into<String>) -> Self {
        Error::Failed {
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_ctx_preserves_cause() {
        let err = Error::payload("expected object, got array")
            .ctx("failed to retrieve issue PROJ-123");

        assert_eq!(err.to_string(), "failed to retrieve issue PROJ-123");
        let cause = err.source().expect("cause should be preserved");
        assert_eq!(
            cause.to_string(),
            "unexpected payload: expected object, got array"
        );
    }

    #[test]
    fn test_status_display() {
        let err = Error::Status {
            status: 404,
            message: "Issue does not exist".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Issue does not exist");
    }

    #[test]
    fn test_empty_request_display() {
        let err = Error::EmptyRequest("update");
        assert_eq!(err.to_string(), "no fields were given for update");
    }

    #[test]
    fn test_malformed_metadata_display() {
        let err = Error::MalformedMetadata {
            field: "priority".to_string(),
            detail: "field is not present in metadata".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed metadata for field 'priority': field is not present in metadata"
        );
    }
}
