//! Typed entities for JIRA REST API resources.
//!
//! Each entity is an immutable snapshot of one JSON resource, produced
//! at deserialization time. Reads are lenient: a missing or
//! wrongly-typed field deserializes to `None` (or an empty list), never
//! to an error, so a partial server response still yields a usable
//! entity. Writes go through the fluent builders instead of
//! re-serializing these types.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields;

/// A JIRA issue.
///
/// Returned by `GET /rest/api/2/issue/{key}` or as part of search
/// results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// The internal issue ID.
    #[serde(default, deserialize_with = "fields::lenient_string")]
    pub id: Option<String>,
    /// The issue key (e.g., "PROJ-123").
    #[serde(default, deserialize_with = "fields::lenient_string")]
    pub key: Option<String>,
    /// Canonical URL of the issue resource.
    #[serde(rename = "self", default, deserialize_with = "fields::lenient_string")]
    pub self_url: Option<String>,
    /// The issue fields.
    #[serde(default)]
    pub fields: IssueFields,
}

impl Issue {
    /// Get the issue key, or an empty string if absent.
    pub fn issue_key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    /// Get the issue summary, or an empty string if absent.
    pub fn summary(&self) -> &str {
        self.fields.summary.as_deref().unwrap_or("")
    }

    /// Get the issue status name, if set.
    pub fn status_name(&self) -> Option<&str> {
        self.fields.status.as_ref().and_then(|s| s.name.as_deref())
    }

    /// Get the issue type name, if set.
    pub fn issue_type_name(&self) -> Option<&str> {
        self.fields.issue_type.as_ref().and_then(|t| t.name.as_deref())
    }

    /// Get the issue priority name, if set.
    pub fn priority_name(&self) -> Option<&str> {
        self.fields.priority.as_ref().and_then(|p| p.name.as_deref())
    }

    /// Get the assignee display name, if assigned.
    pub fn assignee_name(&self) -> Option<&str> {
        self.fields.assignee.as_ref().and_then(|u| u.display_name.as_deref())
    }

    /// Get the project key, if available.
    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref().and_then(|p| p.key.as_deref())
    }

    /// Get an arbitrary field by its name.
    ///
    /// Covers custom fields (`customfield_*`) and any standard field
    /// not mapped to a typed accessor. Returns the raw JSON value, or
    /// `None` if the field was not part of the response.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.extra.get(name)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.issue_key(), self.summary())
    }
}

/// Issue fields.
///
/// Every member is optional: JIRA omits fields that are unset, hidden,
/// or excluded by a `fields=` filter, and a missing value is not the
/// same as a zero value (`time_spent` of `None` means "not tracked",
/// not "zero seconds").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue summary/title.
    #[serde(default, deserialize_with = "fields::lenient_string")]
    pub summary: Option<String>,
    /// The issue description.
    #[serde(default, deserialize_with = "fields::lenient_string")]
    pub description: Option<String>,
    /// The issue assignee.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub assignee: Option<User>,
    /// The issue reporter.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub reporter: Option<User>,
    /// The issue type (Bug, Story, Task, etc.).
    #[serde(rename = "issuetype", default, deserialize_with = "fields::lenient_entity")]
    pub issue_type: Option<IssueType>,
    /// The issue status.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub status: Option<Status>,
    /// The issue priority.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub priority: Option<Priority>,
    /// The resolution, once the issue is resolved.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub resolution: Option<Resolution>,
    /// The project this issue belongs to.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub project: Option<Project>,
    /// The parent issue, for sub-tasks.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub parent: Option<Box<Issue>>,
    /// Sub-tasks of this issue.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub subtasks: Vec<Issue>,
    /// Components the issue is associated with.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub components: Vec<Component>,
    /// Affected versions.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub versions: Vec<Version>,
    /// Fix versions.
    #[serde(rename = "fixVersions", default, deserialize_with = "fields::lenient_entities")]
    pub fix_versions: Vec<Version>,
    /// Links to other issues.
    #[serde(rename = "issuelinks", default, deserialize_with = "fields::lenient_entities")]
    pub issue_links: Vec<IssueLink>,
    /// Attachments on the issue.
    #[serde(rename = "attachment", default, deserialize_with = "fields::lenient_entities")]
    pub attachments: Vec<Attachment>,
    /// Labels attached to the issue.
    #[serde(default, deserialize_with = "fields::lenient_strings")]
    pub labels: Vec<String>,
    /// When the issue is due.
    #[serde(rename = "duedate", default, deserialize_with = "fields::lenient_date")]
    pub due_date: Option<NaiveDate>,
    /// When the issue was created.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub created: Option<DateTime<FixedOffset>>,
    /// When the issue was last updated.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub updated: Option<DateTime<FixedOffset>>,
    /// When the issue was resolved.
    #[serde(rename = "resolutiondate", default, deserialize_with = "fields::lenient_datetime")]
    pub resolution_date: Option<DateTime<FixedOffset>>,
    /// Seconds logged against the issue. `None` when time is not tracked.
    #[serde(rename = "timespent", default, deserialize_with = "fields::lenient_i64")]
    pub time_spent: Option<i64>,
    /// Seconds remaining on the estimate.
    #[serde(rename = "timeestimate", default, deserialize_with = "fields::lenient_i64")]
    pub time_estimate: Option<i64>,
    /// Aggregated time tracking values.
    #[serde(rename = "timetracking", default, deserialize_with = "fields::lenient_entity")]
    pub time_tracking: Option<TimeTracking>,
    /// The comment page embedded in the issue, when expanded.
    #[serde(rename = "comment", default, deserialize_with = "fields::lenient_entity")]
    pub comments: Option<CommentPage>,
    /// The worklog page embedded in the issue, when expanded.
    #[serde(rename = "worklog", default, deserialize_with = "fields::lenient_entity")]
    pub worklogs: Option<WorklogPage>,
    /// Vote summary.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub votes: Option<Votes>,
    /// Watcher summary.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub watches: Option<Watches>,
    /// The security level restricting the issue.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub security: Option<Security>,
    /// Any field not mapped above, custom fields included.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A JIRA user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Canonical URL of the user resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The internal user ID.
    #[serde(default)]
    pub id: Option<String>,
    /// The username used for assignment and mentions.
    #[serde(default)]
    pub name: Option<String>,
    /// The user's display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// The user's email address (may be hidden).
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the user is active.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub active: bool,
    /// URLs for the user's avatar images.
    #[serde(default)]
    pub avatar_urls: Option<AvatarUrls>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name.as_deref().unwrap_or(""))
    }
}

/// Avatar URLs for a user or project, by pixel size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarUrls {
    /// 48x48 pixel avatar.
    #[serde(rename = "48x48", default)]
    pub size_48: Option<String>,
    /// 32x32 pixel avatar.
    #[serde(rename = "32x32", default)]
    pub size_32: Option<String>,
    /// 24x24 pixel avatar.
    #[serde(rename = "24x24", default)]
    pub size_24: Option<String>,
    /// 16x16 pixel avatar.
    #[serde(rename = "16x16", default)]
    pub size_16: Option<String>,
}

/// Issue status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// The status ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the status resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The status name (e.g., "To Do", "In Progress", "Done").
    #[serde(default)]
    pub name: Option<String>,
    /// The status description.
    #[serde(default)]
    pub description: Option<String>,
    /// URL to the status icon.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// The status category.
    #[serde(default)]
    pub status_category: Option<StatusCategory>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or(""))
    }
}

/// Status category (groups statuses into to-do, in-progress, done).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCategory {
    /// The category ID. Unlike most identifiers this one is numeric.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub id: Option<i64>,
    /// The category key.
    #[serde(default)]
    pub key: Option<String>,
    /// The category name.
    #[serde(default)]
    pub name: Option<String>,
    /// The category color.
    #[serde(default)]
    pub color_name: Option<String>,
}

/// Issue type (Bug, Story, Task, Epic, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    /// The issue type ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the issue type resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The issue type name.
    #[serde(default)]
    pub name: Option<String>,
    /// The issue type description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether this is a subtask type.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub subtask: bool,
    /// URL to the issue type icon.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Writable fields for this type, present in create metadata.
    #[serde(default)]
    pub fields: Option<Value>,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or(""))
    }
}

/// Issue priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    /// The priority ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the priority resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The priority name (e.g., "Highest", "High", "Medium").
    #[serde(default)]
    pub name: Option<String>,
    /// URL to the priority icon.
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or(""))
    }
}

/// Issue resolution (e.g., "Fixed", "Won't Fix").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// The resolution ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the resolution resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The resolution name.
    #[serde(default)]
    pub name: Option<String>,
    /// The resolution description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A JIRA project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The project ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the project resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The project key (e.g., "PROJ").
    #[serde(default)]
    pub key: Option<String>,
    /// The project name.
    #[serde(default)]
    pub name: Option<String>,
    /// The project description.
    #[serde(default)]
    pub description: Option<String>,
    /// The project lead.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub lead: Option<User>,
    /// The default assignee policy ("PROJECT_LEAD" or "UNASSIGNED").
    #[serde(default)]
    pub assignee_type: Option<String>,
    /// Components defined in the project.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub components: Vec<Component>,
    /// Issue types available in the project.
    #[serde(rename = "issueTypes", default, deserialize_with = "fields::lenient_entities")]
    pub issue_types: Vec<IssueType>,
    /// Versions defined in the project.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub versions: Vec<Version>,
    /// Role name to role resource URL.
    #[serde(default)]
    pub roles: HashMap<String, String>,
    /// The project category.
    #[serde(rename = "projectCategory", default)]
    pub category: Option<ProjectCategory>,
    /// The project contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// URLs for the project's avatar images.
    #[serde(default)]
    pub avatar_urls: Option<AvatarUrls>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key.as_deref().unwrap_or(""))
    }
}

/// A project category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCategory {
    /// The category ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the category resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The category name.
    #[serde(default)]
    pub name: Option<String>,
    /// The category description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A project component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// The component ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the component resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The component name.
    #[serde(default)]
    pub name: Option<String>,
    /// The component description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A project version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// The version ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the version resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The version name (e.g., "2.1.0").
    #[serde(default)]
    pub name: Option<String>,
    /// The version description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the version has been archived.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub archived: bool,
    /// Whether the version has been released.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub released: bool,
    /// The release date, once scheduled.
    #[serde(default, deserialize_with = "fields::lenient_date")]
    pub release_date: Option<NaiveDate>,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or(""))
    }
}

/// Vote summary for an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Votes {
    /// Canonical URL of the votes resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// Number of votes cast.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub votes: Option<i64>,
    /// Whether the session user has voted.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub has_voted: bool,
}

/// Watcher summary for an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watches {
    /// Canonical URL of the watchers resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// Number of watchers.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub watch_count: Option<i64>,
    /// Whether the session user is watching.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub is_watching: bool,
}

/// Time tracking values for an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    /// The original estimate, in JIRA duration form ("2h 30m").
    #[serde(default)]
    pub original_estimate: Option<String>,
    /// The remaining estimate.
    #[serde(default)]
    pub remaining_estimate: Option<String>,
    /// Time spent so far.
    #[serde(default)]
    pub time_spent: Option<String>,
    /// The original estimate in seconds.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub original_estimate_seconds: Option<i64>,
    /// The remaining estimate in seconds.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub remaining_estimate_seconds: Option<i64>,
    /// Time spent in seconds.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub time_spent_seconds: Option<i64>,
}

/// The security level restricting who can see an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    /// The security level ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the security level resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The security level name.
    #[serde(default)]
    pub name: Option<String>,
    /// The security level description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Visibility restriction on a comment or worklog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visibility {
    /// The audience type: "role" or "group".
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// The role or group name.
    #[serde(default)]
    pub value: Option<String>,
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// The comment ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the comment resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The user who authored the comment.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub author: Option<User>,
    /// The comment text.
    #[serde(default, deserialize_with = "fields::lenient_string")]
    pub body: Option<String>,
    /// When the comment was created.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub created: Option<DateTime<FixedOffset>>,
    /// When the comment was last updated.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub updated: Option<DateTime<FixedOffset>>,
    /// The user who last updated the comment.
    #[serde(rename = "updatedAuthor", default, deserialize_with = "fields::lenient_entity")]
    pub updated_author: Option<User>,
    /// Visibility restriction, if the comment is not public.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub visibility: Option<Visibility>,
}

/// One page of comments, as returned by `issue/{key}/comment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    /// The index of the first comment in this page.
    #[serde(default)]
    pub start_at: u64,
    /// Maximum results the server used for this page.
    #[serde(default)]
    pub max_results: u32,
    /// Total number of comments on the issue.
    #[serde(default)]
    pub total: u64,
    /// The comments in this page.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub comments: Vec<Comment>,
}

/// A worklog entry on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkLog {
    /// The worklog ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the worklog resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The user who logged the work.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub author: Option<User>,
    /// The worklog comment.
    #[serde(default, deserialize_with = "fields::lenient_string")]
    pub comment: Option<String>,
    /// When the entry was created.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub created: Option<DateTime<FixedOffset>>,
    /// When the entry was last updated.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub updated: Option<DateTime<FixedOffset>>,
    /// The user who last updated the entry.
    #[serde(rename = "updateAuthor", default, deserialize_with = "fields::lenient_entity")]
    pub update_author: Option<User>,
    /// When the logged work started.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub started: Option<DateTime<FixedOffset>>,
    /// The logged duration in JIRA form ("1h 30m").
    #[serde(rename = "timeSpent", default)]
    pub time_spent: Option<String>,
    /// The logged duration in seconds. `None` when absent, which is
    /// not the same as zero.
    #[serde(rename = "timeSpentSeconds", default, deserialize_with = "fields::lenient_i64")]
    pub time_spent_seconds: Option<i64>,
}

/// One page of worklogs, as returned by `issue/{key}/worklog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPage {
    /// The index of the first worklog in this page.
    #[serde(default)]
    pub start_at: u64,
    /// Maximum results the server used for this page.
    #[serde(default)]
    pub max_results: u32,
    /// Total number of worklogs on the issue.
    #[serde(default)]
    pub total: u64,
    /// The worklogs in this page.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub worklogs: Vec<WorkLog>,
}

/// An attachment on an issue. Metadata only; content lives at the
/// `content` URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// The attachment ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the attachment resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The file name.
    #[serde(default)]
    pub filename: Option<String>,
    /// The user who attached the file.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub author: Option<User>,
    /// When the file was attached.
    #[serde(default, deserialize_with = "fields::lenient_datetime")]
    pub created: Option<DateTime<FixedOffset>>,
    /// The file size in bytes.
    #[serde(default, deserialize_with = "fields::lenient_i64")]
    pub size: Option<i64>,
    /// The file MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Download URL for the file content.
    #[serde(default)]
    pub content: Option<String>,
}

/// The type of a link between two issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkType {
    /// The link type ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the link type resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The link type name (e.g., "Blocks").
    #[serde(default)]
    pub name: Option<String>,
    /// Description of the inward direction ("is blocked by").
    #[serde(default)]
    pub inward: Option<String>,
    /// Description of the outward direction ("blocks").
    #[serde(default)]
    pub outward: Option<String>,
}

/// A link between two issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    /// The link ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the link resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The link type.
    #[serde(rename = "type", default, deserialize_with = "fields::lenient_entity")]
    pub link_type: Option<LinkType>,
    /// The inward end of the link.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub inward_issue: Option<Box<Issue>>,
    /// The outward end of the link.
    #[serde(default, deserialize_with = "fields::lenient_entity")]
    pub outward_issue: Option<Box<Issue>>,
}

/// A workflow transition available on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    /// The transition ID.
    #[serde(default)]
    pub id: Option<String>,
    /// The transition name (e.g., "Start Progress").
    #[serde(default)]
    pub name: Option<String>,
    /// The status the transition leads to.
    #[serde(rename = "to", default, deserialize_with = "fields::lenient_entity")]
    pub to_status: Option<Status>,
    /// Field metadata for fields that may be set during the transition.
    #[serde(default)]
    pub fields: Option<Value>,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or(""))
    }
}

/// A saved search filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    /// The filter ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical URL of the filter resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The filter name.
    #[serde(default)]
    pub name: Option<String>,
    /// The JQL the filter runs.
    #[serde(default)]
    pub jql: Option<String>,
    /// Whether the session user has favourited the filter.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub favourite: bool,
}
