//! Fluent builders for issue create, update, and transition requests.
//!
//! Each builder accumulates field edits without touching the network,
//! then issues exactly one write call from `submit`. Field values are
//! shaped for the server with [`fields::to_json`] against the metadata
//! fetched when the builder was constructed. Builders are single-use:
//! `submit` consumes the builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::client::API_PATH;
use crate::error::{Error, Result};
use crate::fields::{self, Operation};
use crate::models::{Issue, Transition};
use crate::transport::Transport;

/// Accumulates fields for a new issue, then creates it with one POST.
///
/// Built by [`JiraClient::create_issue`](crate::JiraClient::create_issue),
/// which fetches the create metadata for the target project and issue
/// type and seeds both fields.
pub struct CreateIssue {
    transport: Arc<dyn Transport>,
    metadata: Value,
    fields: BTreeMap<String, Value>,
}

impl std::fmt::Debug for CreateIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateIssue")
            .field("metadata", &self.metadata)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl CreateIssue {
    pub(crate) fn new(transport: Arc<dyn Transport>, metadata: Value) -> Self {
        Self {
            transport,
            metadata,
            fields: BTreeMap::new(),
        }
    }

    /// Append a field to the create request.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Create the issue.
    ///
    /// The create endpoint answers with only the new issue's identity,
    /// so on success the issue is fetched again and returned fully
    /// populated.
    ///
    /// # Errors
    ///
    /// Fails with `Error::EmptyRequest` if no fields were accumulated,
    /// before any network call is made.
    pub fn submit(self) -> Result<Issue> {
        if self.fields.is_empty() {
            return Err(Error::EmptyRequest("create"));
        }

        let mut field_map = Map::new();
        for (name, value) in &self.fields {
            let shaped = fields::to_json(name, value, &self.metadata)
                .map_err(|e| e.ctx("failed to create issue"))?;
            field_map.insert(name.clone(), shaped);
        }

        debug!(fields = field_map.len(), "creating issue");

        let result = self
            .transport
            .post(&format!("{}issue", API_PATH), &json!({ "fields": field_map }))
            .map_err(|e| e.ctx("failed to create issue"))?;

        let key = result
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::payload("create response has no issue key").ctx("failed to create issue")
            })?
            .to_string();

        let value = self
            .transport
            .get(&format!("{}issue/{}", API_PATH, key), &[])
            .map_err(|e| e.ctx(format!("failed to retrieve issue {}", key)))?;

        serde_json::from_value(value).map_err(|e| {
            Error::payload(format!("issue is malformed: {}", e))
                .ctx(format!("failed to retrieve issue {}", key))
        })
    }
}

/// Accumulates field edits for an existing issue, then applies them
/// with one PUT.
///
/// Plain `field` calls replace a field's value; `field_add` and
/// `field_remove` append verb operations that edit multi-valued fields
/// in place. Built by
/// [`JiraClient::update_issue`](crate::JiraClient::update_issue), which
/// fetches the issue's edit metadata.
pub struct UpdateIssue {
    transport: Arc<dyn Transport>,
    key: String,
    metadata: Value,
    fields: BTreeMap<String, Value>,
    operations: BTreeMap<String, Vec<Operation>>,
}

impl UpdateIssue {
    pub(crate) fn new(transport: Arc<dyn Transport>, key: String, metadata: Value) -> Self {
        Self {
            transport,
            key,
            metadata,
            fields: BTreeMap::new(),
            operations: BTreeMap::new(),
        }
    }

    /// Set a field to a new value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a value to a multi-valued field's existing set.
    pub fn field_add(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.operation("add", name, value)
    }

    /// Remove a value from a multi-valued field's existing set.
    pub fn field_remove(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.operation("remove", name, value)
    }

    fn operation(
        mut self,
        verb: &'static str,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.operations.entry(name.into()).or_default().push(Operation {
            verb,
            value: value.into(),
        });
        self
    }

    /// Apply the accumulated edits.
    ///
    /// # Errors
    ///
    /// Fails with `Error::EmptyRequest` if neither fields nor
    /// operations were accumulated, before any network call is made.
    pub fn submit(self) -> Result<()> {
        if self.fields.is_empty() && self.operations.is_empty() {
            return Err(Error::EmptyRequest("update"));
        }

        let action = format!("failed to update issue {}", self.key);

        let mut field_map = Map::new();
        for (name, value) in &self.fields {
            let shaped = fields::to_json(name, value, &self.metadata)
                .map_err(|e| e.ctx(action.clone()))?;
            field_map.insert(name.clone(), shaped);
        }

        let mut update_map = Map::new();
        for (name, operations) in &self.operations {
            let shaped = fields::operations_to_json(name, operations, &self.metadata)
                .map_err(|e| e.ctx(action.clone()))?;
            update_map.insert(name.clone(), shaped);
        }

        let mut request = Map::new();
        if !field_map.is_empty() {
            request.insert("fields".to_string(), Value::Object(field_map));
        }
        if !update_map.is_empty() {
            request.insert("update".to_string(), Value::Object(update_map));
        }

        debug!(key = %self.key, "updating issue");

        self.transport
            .put(&format!("{}issue/{}", API_PATH, self.key), &Value::Object(request))
            .map_err(|e| e.ctx(action))?;
        Ok(())
    }
}

/// Accumulates fields for a workflow transition, then performs it with
/// one POST.
///
/// Built by
/// [`JiraClient::transition_issue`](crate::JiraClient::transition_issue),
/// which fetches the transitions currently available on the issue. The
/// transition to perform is chosen at submit time, by name or by ID;
/// an unknown choice fails with an error listing the known transitions.
pub struct TransitionIssue {
    transport: Arc<dyn Transport>,
    key: String,
    transitions: Vec<Transition>,
    fields: BTreeMap<String, Value>,
}

impl TransitionIssue {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        key: String,
        transitions: Vec<Transition>,
    ) -> Self {
        Self {
            transport,
            key,
            transitions,
            fields: BTreeMap::new(),
        }
    }

    /// The transitions available on the issue.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Append a field to set during the transition.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Perform the transition with the given name.
    pub fn submit_by_name(self, name: &str) -> Result<()> {
        let transition = self.resolve(|t| t.name.as_deref() == Some(name), name)?;
        self.execute(transition)
    }

    /// Perform the transition with the given ID.
    pub fn submit_by_id(self, id: &str) -> Result<()> {
        let transition = self.resolve(|t| t.id.as_deref() == Some(id), id)?;
        self.execute(transition)
    }

    fn resolve(&self, matches: impl Fn(&Transition) -> bool, wanted: &str) -> Result<String> {
        let found = self
            .transitions
            .iter()
            .find(|transition| matches(transition))
            .and_then(|transition| transition.id.clone());

        found.ok_or_else(|| {
            let known = self
                .transitions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Error::payload(format!(
                "transition '{}' was not found; known transitions are: {}",
                wanted, known
            ))
            .ctx(format!("failed to transition issue {}", self.key))
        })
    }

    fn execute(self, transition_id: String) -> Result<()> {
        let mut request = Map::new();
        request.insert("transition".to_string(), json!({ "id": transition_id }));
        if !self.fields.is_empty() {
            let field_map: Map<String, Value> = self.fields.into_iter().collect();
            request.insert("fields".to_string(), Value::Object(field_map));
        }

        debug!(key = %self.key, transition = %transition_id, "transitioning issue");

        self.transport
            .post(
                &format!("{}issue/{}/transitions", API_PATH, self.key),
                &Value::Object(request),
            )
            .map_err(|e| e.ctx(format!("failed to transition issue {}", self.key)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    /// Records every write and serves scripted responses.
    struct RecordingTransport {
        requests: Mutex<Vec<(String, String, Value)>>,
        post_response: Value,
        get_response: Value,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                post_response: json!({"id": "10000", "key": "PROJ-24",
                    "self": "https://example.com/rest/api/2/issue/10000"}),
                get_response: json!({"id": "10000", "key": "PROJ-24",
                    "fields": {"summary": "A new issue"}}),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> (String, String, Value) {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    impl Transport for RecordingTransport {
        fn get(&self, path: &str, _query: &[(&str, String)]) -> Result<Value> {
            self.requests
                .lock()
                .unwrap()
                .push(("GET".to_string(), path.to_string(), Value::Null));
            Ok(self.get_response.clone())
        }

        fn post(&self, path: &str, body: &Value) -> Result<Value> {
            self.requests
                .lock()
                .unwrap()
                .push(("POST".to_string(), path.to_string(), body.clone()));
            Ok(self.post_response.clone())
        }

        fn put(&self, path: &str, body: &Value) -> Result<Value> {
            self.requests
                .lock()
                .unwrap()
                .push(("PUT".to_string(), path.to_string(), body.clone()));
            Ok(Value::Null)
        }

        fn delete(&self, _path: &str, _query: &[(&str, String)]) -> Result<Value> {
            unimplemented!("builders never delete")
        }
    }

    fn metadata() -> Value {
        json!({
            "summary": { "schema": { "type": "string", "system": "summary" } },
            "project": { "schema": { "type": "project", "system": "project" } },
            "issuetype": { "schema": { "type": "issuetype", "system": "issuetype" } },
            "priority": { "schema": { "type": "priority", "system": "priority" } },
            "labels": { "schema": { "type": "array", "items": "string", "system": "labels" } },
            "fixVersions": { "schema": { "type": "array", "items": "version", "system": "fixVersions" } }
        })
    }

    #[test]
    fn test_create_submit_posts_then_refetches() {
        let transport = Arc::new(RecordingTransport::new());
        let issue = CreateIssue::new(transport.clone(), metadata())
            .field("project", "PROJ")
            .field("issuetype", "Bug")
            .field("summary", "A new issue")
            .submit()
            .unwrap();

        assert_eq!(issue.issue_key(), "PROJ-24");
        assert_eq!(transport.request_count(), 2);

        let (method, path, body) = transport.request(0);
        assert_eq!(method, "POST");
        assert_eq!(path, "rest/api/2/issue");
        assert_eq!(
            body,
            json!({"fields": {
                "issuetype": {"name": "Bug"},
                "project": {"name": "PROJ"},
                "summary": "A new issue"
            }})
        );

        let (method, path, _) = transport.request(1);
        assert_eq!(method, "GET");
        assert_eq!(path, "rest/api/2/issue/PROJ-24");
    }

    #[test]
    fn test_create_submit_with_no_fields_makes_no_call() {
        let transport = Arc::new(RecordingTransport::new());
        let err = CreateIssue::new(transport.clone(), metadata())
            .submit()
            .unwrap_err();

        assert!(matches!(err, Error::EmptyRequest("create")));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_create_unknown_field_fails_before_posting() {
        let transport = Arc::new(RecordingTransport::new());
        let err = CreateIssue::new(transport.clone(), metadata())
            .field("storyPoints", 5)
            .submit()
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to create issue");
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_update_submit_shapes_fields_and_operations() {
        let transport = Arc::new(RecordingTransport::new());
        UpdateIssue::new(transport.clone(), "PROJ-7".to_string(), metadata())
            .field("priority", "High")
            .field_add("labels", "triage")
            .field_remove("labels", "backlog")
            .field_add("fixVersions", "2.0")
            .submit()
            .unwrap();

        assert_eq!(transport.request_count(), 1);
        let (method, path, body) = transport.request(0);
        assert_eq!(method, "PUT");
        assert_eq!(path, "rest/api/2/issue/PROJ-7");
        assert_eq!(
            body,
            json!({
                "fields": {"priority": {"name": "High"}},
                "update": {
                    "fixVersions": [{"add": {"name": "2.0"}}],
                    "labels": [{"add": "triage"}, {"remove": "backlog"}]
                }
            })
        );
    }

    #[test]
    fn test_update_submit_with_nothing_makes_no_call() {
        let transport = Arc::new(RecordingTransport::new());
        let err = UpdateIssue::new(transport.clone(), "PROJ-7".to_string(), metadata())
            .submit()
            .unwrap_err();

        assert!(matches!(err, Error::EmptyRequest("update")));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_update_operations_preserve_order() {
        let transport = Arc::new(RecordingTransport::new());
        UpdateIssue::new(transport.clone(), "PROJ-7".to_string(), metadata())
            .field_remove("labels", "old")
            .field_add("labels", "new")
            .submit()
            .unwrap();

        let (_, _, body) = transport.request(0);
        assert_eq!(
            body["update"]["labels"],
            json!([{"remove": "old"}, {"add": "new"}])
        );
    }

    fn transitions() -> Vec<Transition> {
        serde_json::from_value(json!([
            {"id": "21", "name": "Start Progress", "to": {"id": "3", "name": "In Progress"}},
            {"id": "31", "name": "Done", "to": {"id": "5", "name": "Done"}}
        ]))
        .unwrap()
    }

    #[test]
    fn test_transition_by_name() {
        let transport = Arc::new(RecordingTransport::new());
        TransitionIssue::new(transport.clone(), "PROJ-7".to_string(), transitions())
            .submit_by_name("Done")
            .unwrap();

        let (method, path, body) = transport.request(0);
        assert_eq!(method, "POST");
        assert_eq!(path, "rest/api/2/issue/PROJ-7/transitions");
        assert_eq!(body, json!({"transition": {"id": "31"}}));
    }

    #[test]
    fn test_transition_by_id_with_fields() {
        let transport = Arc::new(RecordingTransport::new());
        TransitionIssue::new(transport.clone(), "PROJ-7".to_string(), transitions())
            .field("resolution", json!({"name": "Fixed"}))
            .submit_by_id("31")
            .unwrap();

        let (_, _, body) = transport.request(0);
        assert_eq!(
            body,
            json!({
                "transition": {"id": "31"},
                "fields": {"resolution": {"name": "Fixed"}}
            })
        );
    }

    #[test]
    fn test_transition_unknown_name_lists_known_transitions() {
        let transport = Arc::new(RecordingTransport::new());
        let err = TransitionIssue::new(transport.clone(), "PROJ-7".to_string(), transitions())
            .submit_by_name("Reopen")
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to transition issue PROJ-7");
        let cause = std::error::Error::source(&err).unwrap().to_string();
        assert!(cause.contains("Reopen"));
        assert!(cause.contains("Start Progress"));
        assert!(cause.contains("Done"));
        assert_eq!(transport.request_count(), 0);
    }
}
