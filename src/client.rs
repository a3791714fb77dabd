//! The JIRA client: a thin context binding a transport to the
//! versioned REST endpoints.
//!
//! Every operation is synchronous and issues at most a couple of HTTP
//! calls through the shared [`Transport`]. The client is cheap to
//! clone; instances share one transport.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::auth::Credentials;
use crate::builders::{CreateIssue, TransitionIssue, UpdateIssue};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::fields;
use crate::models::{
    Comment, CommentPage, Component, Filter, Issue, IssueLink, Project, Transition, User, Version,
    WorkLog, WorklogPage,
};
use crate::search::Search;
use crate::transport::{HttpTransport, Transport};

/// Versioned base path for the core REST API.
pub(crate) const API_PATH: &str = "rest/api/2/";

/// A client for one JIRA instance.
#[derive(Clone)]
pub struct JiraClient {
    transport: Arc<dyn Transport>,
}

impl JiraClient {
    /// Create a client for the given instance URL and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be built.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(base_url, credentials)?),
        })
    }

    /// Create a client from a validated [`ConnectionConfig`].
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Self::new(&config.url, config.credentials())
    }

    /// Create a client over a caller-supplied transport.
    ///
    /// The seam for tests and for callers that need their own retry or
    /// instrumentation policy around the HTTP layer.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    fn get_entity<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        action: impl Fn() -> String,
    ) -> Result<T> {
        let value = self
            .transport
            .get(path, query)
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    // -- current user --------------------------------------------------

    /// Retrieve the authenticated user.
    #[instrument(skip(self))]
    pub fn current_user(&self) -> Result<User> {
        self.get_entity(&format!("{}myself", API_PATH), &[], || {
            "failed to retrieve current user".to_string()
        })
    }

    /// Retrieve a user by username.
    #[instrument(skip(self))]
    pub fn user(&self, username: &str) -> Result<User> {
        self.get_entity(
            &format!("{}user", API_PATH),
            &[("username", username.to_string())],
            || format!("failed to retrieve user {}", username),
        )
    }

    // -- issues --------------------------------------------------------

    /// Retrieve an issue by key, with all navigable fields.
    #[instrument(skip(self))]
    pub fn issue(&self, key: &str) -> Result<Issue> {
        self.get_entity(&issue_path(key), &[], || {
            format!("failed to retrieve issue {}", key)
        })
    }

    /// Retrieve an issue by key, restricting the included fields and
    /// optionally expanding linked data.
    ///
    /// `fields` uses the server's field-list syntax (`"*all"`,
    /// `"summary,comment"`, ...).
    #[instrument(skip(self))]
    pub fn issue_with(&self, key: &str, fields: &str, expand: Option<&str>) -> Result<Issue> {
        let mut query = vec![("fields", fields.to_string())];
        if let Some(expand) = expand {
            query.push(("expand", expand.to_string()));
        }
        self.get_entity(&issue_path(key), &query, || {
            format!("failed to retrieve issue {}", key)
        })
    }

    /// Delete an issue.
    #[instrument(skip(self))]
    pub fn delete_issue(&self, key: &str, delete_subtasks: bool) -> Result<()> {
        self.transport
            .delete(
                &issue_path(key),
                &[("deleteSubtasks", delete_subtasks.to_string())],
            )
            .map_err(|e| e.ctx(format!("failed to delete issue {}", key)))?;
        Ok(())
    }

    /// Begin a JQL search.
    ///
    /// The returned [`Search`] fetches nothing until [`Search::page`]
    /// is called or the search is iterated.
    pub fn search(&self, jql: impl Into<String>) -> Search {
        Search::new(self.transport(), jql)
    }

    /// Count the issues matching a JQL query without retrieving them.
    #[instrument(skip(self))]
    pub fn count(&self, jql: &str) -> Result<u64> {
        let value = self
            .transport
            .get(
                &format!("{}search", API_PATH),
                &[("jql", jql.to_string()), ("maxResults", "1".to_string())],
            )
            .map_err(|e| e.ctx("failed to search issues"))?;

        value
            .get("total")
            .and_then(fields::integer_of)
            .ok_or_else(|| {
                Error::payload("search result has no total").ctx("failed to search issues")
            })
            .map(|total| total.max(0) as u64)
    }

    /// Begin creating an issue in a project.
    ///
    /// Fetches the create metadata for the project and issue type, and
    /// seeds both fields on the returned builder.
    #[instrument(skip(self))]
    pub fn create_issue(&self, project: &str, issue_type: &str) -> Result<CreateIssue> {
        let metadata = self.create_metadata(project, issue_type)?;
        Ok(CreateIssue::new(self.transport(), metadata)
            .field(fields::PROJECT, project)
            .field(fields::ISSUE_TYPE, issue_type))
    }

    /// Begin updating an issue. Fetches the issue's edit metadata.
    #[instrument(skip(self))]
    pub fn update_issue(&self, key: &str) -> Result<UpdateIssue> {
        let metadata = self.edit_metadata(key)?;
        Ok(UpdateIssue::new(self.transport(), key.to_string(), metadata))
    }

    /// Begin transitioning an issue. Fetches the transitions currently
    /// available on it.
    #[instrument(skip(self))]
    pub fn transition_issue(&self, key: &str) -> Result<TransitionIssue> {
        let transitions = self.transitions(key)?;
        Ok(TransitionIssue::new(
            self.transport(),
            key.to_string(),
            transitions,
        ))
    }

    /// List the workflow transitions currently available on an issue.
    #[instrument(skip(self))]
    pub fn transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let action = || format!("failed to retrieve transitions for issue {}", key);
        let value = self
            .transport
            .get(
                &format!("{}/transitions", issue_path(key)),
                &[("expand", "transitions.fields".to_string())],
            )
            .map_err(|e| e.ctx(action()))?;

        let transitions = value
            .get("transitions")
            .cloned()
            .ok_or_else(|| Error::payload("transition metadata is missing").ctx(action()))?;
        parse(transitions, action)
    }

    /// Fetch the writable-field metadata for creating an issue of the
    /// given type in the given project.
    fn create_metadata(&self, project: &str, issue_type: &str) -> Result<Value> {
        let action = || "failed to retrieve create metadata".to_string();
        let value = self
            .transport
            .get(
                &format!("{}issue/createmeta", API_PATH),
                &[
                    ("expand", "projects.issuetypes.fields".to_string()),
                    ("projectKeys", project.to_string()),
                    ("issuetypeNames", issue_type.to_string()),
                ],
            )
            .map_err(|e| e.ctx(action()))?;

        let projects: Vec<Project> = value
            .get("projects")
            .cloned()
            .ok_or_else(|| Error::payload("create metadata is malformed").ctx(action()))
            .and_then(|projects| parse(projects, &action))?;

        projects
            .first()
            .and_then(|p| p.issue_types.first())
            .and_then(|t| t.fields.clone())
            .ok_or_else(|| {
                Error::payload(format!(
                    "project '{}' or issue type '{}' missing from create metadata",
                    project, issue_type
                ))
                .ctx(action())
            })
    }

    /// Fetch the writable-field metadata for editing an issue.
    fn edit_metadata(&self, key: &str) -> Result<Value> {
        let action = || format!("failed to retrieve edit metadata for issue {}", key);
        let value = self
            .transport
            .get(&format!("{}/editmeta", issue_path(key)), &[])
            .map_err(|e| e.ctx(action()))?;

        value
            .get("fields")
            .filter(|fields| fields.is_object())
            .cloned()
            .ok_or_else(|| Error::payload("edit metadata is malformed").ctx(action()))
    }

    // -- comments ------------------------------------------------------

    /// Retrieve the comments on an issue.
    #[instrument(skip(self))]
    pub fn comments(&self, key: &str) -> Result<CommentPage> {
        self.get_entity(&format!("{}/comment", issue_path(key)), &[], || {
            format!("failed to retrieve comments for issue {}", key)
        })
    }

    /// Retrieve one comment on an issue.
    #[instrument(skip(self))]
    pub fn comment(&self, key: &str, id: &str) -> Result<Comment> {
        self.get_entity(&format!("{}/comment/{}", issue_path(key), id), &[], || {
            format!("failed to retrieve comment {} on issue {}", id, key)
        })
    }

    /// Add a comment to an issue.
    #[instrument(skip(self, body))]
    pub fn add_comment(&self, key: &str, body: &str) -> Result<Comment> {
        self.post_comment(key, json!({ "body": body }))
    }

    /// Add a comment visible only to one role or group.
    ///
    /// `kind` is the audience type, "role" or "group"; `value` names
    /// the role or group.
    #[instrument(skip(self, body))]
    pub fn add_comment_with_visibility(
        &self,
        key: &str,
        body: &str,
        kind: &str,
        value: &str,
    ) -> Result<Comment> {
        self.post_comment(
            key,
            json!({
                "body": body,
                "visibility": { "type": kind, "value": value },
            }),
        )
    }

    fn post_comment(&self, key: &str, request: Value) -> Result<Comment> {
        let action = || format!("failed to add comment to issue {}", key);
        let value = self
            .transport
            .post(&format!("{}/comment", issue_path(key)), &request)
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    // -- worklogs ------------------------------------------------------

    /// Retrieve the worklog entries on an issue.
    #[instrument(skip(self))]
    pub fn worklogs(&self, key: &str) -> Result<WorklogPage> {
        self.get_entity(&format!("{}/worklog", issue_path(key)), &[], || {
            format!("failed to retrieve worklog for issue {}", key)
        })
    }

    /// Retrieve one worklog entry on an issue.
    #[instrument(skip(self))]
    pub fn worklog(&self, key: &str, id: &str) -> Result<WorkLog> {
        self.get_entity(&format!("{}/worklog/{}", issue_path(key), id), &[], || {
            format!("failed to retrieve worklog {} on issue {}", id, key)
        })
    }

    /// Log work against an issue.
    ///
    /// JIRA rejects durations under one minute, so entries shorter than
    /// sixty seconds fail before any call is made. The duration is sent
    /// in the server's `"2h 30m"` form with seconds discarded.
    #[instrument(skip(self, comment))]
    pub fn add_worklog(
        &self,
        key: &str,
        comment: &str,
        started: chrono::DateTime<chrono::FixedOffset>,
        time_spent_seconds: i64,
    ) -> Result<WorkLog> {
        let action = || format!("failed to add worklog to issue {}", key);

        if time_spent_seconds < 60 {
            return Err(Error::payload("time spent cannot be lower than 1 minute").ctx(action()));
        }

        let request = json!({
            "comment": comment,
            "started": started.format(fields::DATETIME_FORMAT).to_string(),
            "timeSpent": format_duration(time_spent_seconds),
        });

        let value = self
            .transport
            .post(&format!("{}/worklog", issue_path(key)), &request)
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    // -- votes and watchers --------------------------------------------

    /// Cast a vote in favour of an issue.
    #[instrument(skip(self))]
    pub fn vote(&self, key: &str) -> Result<()> {
        self.transport
            .post(&format!("{}/votes", issue_path(key)), &Value::Null)
            .map_err(|e| e.ctx(format!("failed to vote on issue {}", key)))?;
        Ok(())
    }

    /// Remove the current user's vote from an issue.
    #[instrument(skip(self))]
    pub fn unvote(&self, key: &str) -> Result<()> {
        self.transport
            .delete(&format!("{}/votes", issue_path(key)), &[])
            .map_err(|e| e.ctx(format!("failed to unvote on issue {}", key)))?;
        Ok(())
    }

    /// Add a watcher to an issue.
    #[instrument(skip(self))]
    pub fn add_watcher(&self, key: &str, username: &str) -> Result<()> {
        // the watchers endpoint takes a bare JSON string as its body
        self.transport
            .post(&format!("{}/watchers", issue_path(key)), &json!(username))
            .map_err(|e| {
                e.ctx(format!(
                    "failed to add watcher ({}) to issue {}",
                    username, key
                ))
            })?;
        Ok(())
    }

    /// Remove a watcher from an issue.
    #[instrument(skip(self))]
    pub fn remove_watcher(&self, key: &str, username: &str) -> Result<()> {
        self.transport
            .delete(
                &format!("{}/watchers", issue_path(key)),
                &[("username", username.to_string())],
            )
            .map_err(|e| {
                e.ctx(format!(
                    "failed to remove watcher ({}) from issue {}",
                    username, key
                ))
            })?;
        Ok(())
    }

    // -- attachments ---------------------------------------------------

    /// Delete an attachment.
    #[instrument(skip(self))]
    pub fn delete_attachment(&self, id: &str) -> Result<()> {
        self.transport
            .delete(&format!("{}attachment/{}", API_PATH, id), &[])
            .map_err(|e| e.ctx(format!("failed to remove attachment {}", id)))?;
        Ok(())
    }

    // -- issue links ---------------------------------------------------

    /// Link two issues.
    ///
    /// `inward` and `outward` are issue keys; `link_type` is the link
    /// type name (e.g. "Blocks"). An optional comment is posted with
    /// the link.
    #[instrument(skip(self, comment))]
    pub fn link_issues(
        &self,
        inward: &str,
        outward: &str,
        link_type: &str,
        comment: Option<&str>,
    ) -> Result<()> {
        let mut request = json!({
            "type": { "name": link_type },
            "inwardIssue": { "key": inward },
            "outwardIssue": { "key": outward },
        });
        if let Some(body) = comment {
            request["comment"] = json!({ "body": body });
        }

        debug!(inward, outward, link_type, "linking issues");

        self.transport
            .post(&format!("{}issueLink", API_PATH), &request)
            .map_err(|e| {
                e.ctx(format!(
                    "failed to link issue {} with issue {}",
                    inward, outward
                ))
            })?;
        Ok(())
    }

    /// Retrieve an issue link by ID.
    #[instrument(skip(self))]
    pub fn issue_link(&self, id: &str) -> Result<IssueLink> {
        self.get_entity(&format!("{}issueLink/{}", API_PATH, id), &[], || {
            format!("failed to retrieve issue link {}", id)
        })
    }

    // -- projects ------------------------------------------------------

    /// Retrieve a project by key.
    #[instrument(skip(self))]
    pub fn project(&self, key: &str) -> Result<Project> {
        self.get_entity(&format!("{}project/{}", API_PATH, key), &[], || {
            format!("failed to retrieve project {}", key)
        })
    }

    /// List all projects visible to the session user.
    #[instrument(skip(self))]
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.get_entity(&format!("{}project", API_PATH), &[], || {
            "failed to retrieve projects".to_string()
        })
    }

    /// Retrieve a project component by ID.
    #[instrument(skip(self))]
    pub fn component(&self, id: &str) -> Result<Component> {
        self.get_entity(&format!("{}component/{}", API_PATH, id), &[], || {
            format!("failed to retrieve component {}", id)
        })
    }

    /// Retrieve a project version by ID.
    #[instrument(skip(self))]
    pub fn version(&self, id: &str) -> Result<Version> {
        self.get_entity(&format!("{}version/{}", API_PATH, id), &[], || {
            format!("failed to retrieve version {}", id)
        })
    }

    // -- filters -------------------------------------------------------

    /// Retrieve a saved filter by ID.
    #[instrument(skip(self))]
    pub fn filter(&self, id: &str) -> Result<Filter> {
        self.get_entity(&format!("{}filter/{}", API_PATH, id), &[], || {
            format!("failed to retrieve filter {}", id)
        })
    }
}

fn issue_path(key: &str) -> String {
    format!("{}issue/{}", API_PATH, key)
}

/// Deserialize a response value, mapping shape mismatches to an
/// operation-failed error.
pub(crate) fn parse<T: DeserializeOwned>(value: Value, action: impl Fn() -> String) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::payload(format!("payload is malformed: {}", e)).ctx(action()))
}

/// Render a duration the way JIRA expects worklog durations: whole
/// minutes, with an hour component once sixty minutes are reached.
/// Seconds are discarded; anything under a minute renders as "0m".
fn format_duration(seconds: i64) -> String {
    let minutes = (seconds.max(0)) / 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
