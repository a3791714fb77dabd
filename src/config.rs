//! Connection configuration.
//!
//! A [`ConnectionConfig`] carries the details an application needs to
//! reach one JIRA instance. It derives `Deserialize`, so applications
//! can load it from their own TOML or JSON configuration files and hand
//! it to [`JiraClient::from_config`](crate::JiraClient::from_config).

use serde::{Deserialize, Serialize};

use crate::auth::Credentials;
use crate::error::{Error, Result};

/// Connection details for a JIRA instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// The JIRA instance URL.
    ///
    /// Should be a valid HTTPS URL (e.g., "https://company.atlassian.net").
    pub url: String,

    /// The user's email address, for Basic Auth.
    ///
    /// Leave unset together with `api_token` for anonymous access.
    #[serde(default)]
    pub email: Option<String>,

    /// The API token paired with `email`.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl ConnectionConfig {
    /// Create a configuration for authenticated access.
    pub fn new(url: impl Into<String>, email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            email: Some(email.into()),
            api_token: Some(api_token.into()),
        }
    }

    /// Create a configuration for anonymous access.
    pub fn anonymous(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            email: None,
            api_token: None,
        }
    }

    /// Validate this configuration.
    ///
    /// Checks that:
    /// - The URL is non-empty and has a valid scheme
    /// - The email, when present, has a valid format
    /// - The email and API token are either both present or both absent
    ///
    /// # Errors
    ///
    /// Returns an `Error::Config` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::Config("URL cannot be empty".to_string()));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(Error::Config(format!(
                "URL '{}' must start with http:// or https://",
                self.url
            )));
        }

        match (&self.email, &self.api_token) {
            (Some(email), Some(_)) => {
                if !email.contains('@') {
                    return Err(Error::Config(format!(
                        "'{}' does not appear to be a valid email address",
                        email
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(Error::Config(
                    "email and api_token must be provided together".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Build the transport credentials this configuration describes.
    pub(crate) fn credentials(&self) -> Credentials {
        match (&self.email, &self.api_token) {
            (Some(email), Some(token)) => Credentials::basic(email, token),
            _ => Credentials::anonymous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ConnectionConfig::new(
            "https://company.atlassian.net",
            "user@company.com",
            "api_token_here",
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_anonymous_config_is_valid() {
        let config = ConnectionConfig::anonymous("https://jira.example.com");
        assert!(config.validate().is_ok());
        assert!(config.credentials().header_value().is_none());
    }

    #[test]
    fn test_empty_url_fails() {
        let config = ConnectionConfig::anonymous("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_scheme_fails() {
        let config = ConnectionConfig::anonymous("company.atlassian.net");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_bad_email_fails() {
        let config =
            ConnectionConfig::new("https://company.atlassian.net", "not-an-email", "token");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("not-an-email"));
    }

    #[test]
    fn test_token_without_email_fails() {
        let config = ConnectionConfig {
            url: "https://company.atlassian.net".to_string(),
            email: None,
            api_token: Some("token".to_string()),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn test_loads_from_toml() {
        let config: ConnectionConfig = toml::from_str(
            r#"
            url = "https://company.atlassian.net"
            email = "user@company.com"
            api_token = "api_token_here"
            "#,
        )
        .unwrap();

        assert_eq!(config.url, "https://company.atlassian.net");
        assert_eq!(config.email.as_deref(), Some("user@company.com"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_loads_anonymous_from_toml() {
        let config: ConnectionConfig =
            toml::from_str(r#"url = "https://jira.example.com""#).unwrap();
        assert!(config.email.is_none());
        assert!(config.api_token.is_none());
    }
}
