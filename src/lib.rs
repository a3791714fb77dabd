//! A typed client for the JIRA REST API.
//!
//! This crate maps JIRA's JSON resources (issues, projects, users,
//! sprints, boards, comments, worklogs) to typed entities and issues
//! blocking HTTP calls to the versioned REST endpoints. Reads are
//! lenient: absent or wrongly-typed fields deserialize to `None`
//! rather than failing the whole entity. Writes go through fluent
//! builders that shape values against the server's own field metadata.
//!
//! # Example
//!
//! ```no_run
//! use jira_client::{Credentials, JiraClient};
//!
//! # fn main() -> jira_client::Result<()> {
//! let jira = JiraClient::new(
//!     "https://company.atlassian.net",
//!     Credentials::basic("user@company.com", "api-token"),
//! )?;
//!
//! let issue = jira.issue("PROJ-123")?;
//! println!("{}: {:?}", issue.issue_key(), issue.status_name());
//!
//! // searches iterate lazily, fetching pages as needed
//! for result in jira.search("project = PROJ AND status = Open").max_results(50) {
//!     let issue = result?;
//!     println!("{}", issue);
//! }
//!
//! jira.create_issue("PROJ", "Bug")?
//!     .field("summary", "Collector loses samples under load")
//!     .field("priority", "High")
//!     .submit()?;
//! # Ok(())
//! # }
//! ```

pub mod agile;
mod auth;
mod builders;
mod client;
mod config;
mod error;
pub mod fields;
pub mod models;
mod search;
mod transport;

pub use auth::Credentials;
pub use builders::{CreateIssue, TransitionIssue, UpdateIssue};
pub use client::JiraClient;
pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use models::Issue;
pub use search::{Search, SearchIter, SearchPage};
pub use transport::{HttpTransport, Transport};
