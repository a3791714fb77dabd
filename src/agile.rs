//! Boards and sprints from the JIRA Agile API.
//!
//! The agile endpoints live under their own base path and use numeric
//! resource IDs and a `values`-keyed page envelope, unlike the core
//! API. Issue payloads are the same [`Issue`](crate::models::Issue)
//! shape as everywhere else.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::{parse, JiraClient};
use crate::error::Result;
use crate::fields;
use crate::search::SearchPage;

/// Versioned base path for the agile REST API.
const AGILE_PATH: &str = "rest/agile/1.0/";

/// A scrum or kanban board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// The board ID.
    pub id: u64,
    /// Canonical URL of the board resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The board name.
    #[serde(default)]
    pub name: Option<String>,
    /// The board type: "scrum" or "kanban".
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A sprint on a scrum board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// The sprint ID.
    pub id: u64,
    /// Canonical URL of the sprint resource.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
    /// The sprint name.
    #[serde(default)]
    pub name: Option<String>,
    /// The sprint state: "future", "active", or "closed".
    #[serde(default)]
    pub state: Option<String>,
    /// When the sprint started.
    #[serde(default, deserialize_with = "fields::lenient_iso_datetime")]
    pub start_date: Option<DateTime<FixedOffset>>,
    /// When the sprint is scheduled to end.
    #[serde(default, deserialize_with = "fields::lenient_iso_datetime")]
    pub end_date: Option<DateTime<FixedOffset>>,
    /// When the sprint was completed.
    #[serde(default, deserialize_with = "fields::lenient_iso_datetime")]
    pub complete_date: Option<DateTime<FixedOffset>>,
    /// The board the sprint was created on.
    #[serde(default)]
    pub origin_board_id: Option<u64>,
    /// The sprint goal.
    #[serde(default)]
    pub goal: Option<String>,
}

/// The agile API's page envelope: one bounded slice of boards or
/// sprints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesPage<T> {
    /// The zero-based offset of this page.
    #[serde(default)]
    pub start_at: u64,
    /// The page size the server actually used.
    #[serde(default)]
    pub max_results: u32,
    /// Whether this is the final page.
    #[serde(default, deserialize_with = "fields::strict_bool")]
    pub is_last: bool,
    /// The resources in this page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

impl JiraClient {
    /// Retrieve a board by ID.
    #[instrument(skip(self))]
    pub fn board(&self, id: u64) -> Result<Board> {
        let action = || format!("failed to retrieve board {}", id);
        let value = self
            .transport()
            .get(&format!("{}board/{}", AGILE_PATH, id), &[])
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    /// Retrieve one page of the boards visible to the session user.
    #[instrument(skip(self))]
    pub fn boards(&self, start_at: u64) -> Result<ValuesPage<Board>> {
        let action = || "failed to retrieve boards".to_string();
        let value = self
            .transport()
            .get(
                &format!("{}board", AGILE_PATH),
                &[("startAt", start_at.to_string())],
            )
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    /// Retrieve a sprint by ID.
    #[instrument(skip(self))]
    pub fn sprint(&self, id: u64) -> Result<Sprint> {
        let action = || format!("failed to retrieve sprint {}", id);
        let value = self
            .transport()
            .get(&format!("{}sprint/{}", AGILE_PATH, id), &[])
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    /// Retrieve one page of the sprints on a board.
    #[instrument(skip(self))]
    pub fn sprints(&self, board_id: u64, start_at: u64) -> Result<ValuesPage<Sprint>> {
        let action = || format!("failed to retrieve sprints for board {}", board_id);
        let value = self
            .transport()
            .get(
                &format!("{}board/{}/sprint", AGILE_PATH, board_id),
                &[("startAt", start_at.to_string())],
            )
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    /// Retrieve one page of the issues on a board's backlog and sprints.
    #[instrument(skip(self))]
    pub fn board_issues(&self, board_id: u64, start_at: u64) -> Result<SearchPage> {
        let action = || format!("failed to retrieve issues for board {}", board_id);
        let value = self
            .transport()
            .get(
                &format!("{}board/{}/issue", AGILE_PATH, board_id),
                &[("startAt", start_at.to_string())],
            )
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }

    /// Retrieve one page of the issues assigned to a sprint.
    #[instrument(skip(self))]
    pub fn sprint_issues(&self, sprint_id: u64, start_at: u64) -> Result<SearchPage> {
        let action = || format!("failed to retrieve issues for sprint {}", sprint_id);
        let value = self
            .transport()
            .get(
                &format!("{}sprint/{}/issue", AGILE_PATH, sprint_id),
                &[("startAt", start_at.to_string())],
            )
            .map_err(|e| e.ctx(action()))?;
        parse(value, action)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use super::*;
    use crate::transport::Transport;

    struct SingleResponse {
        response: Value,
        paths: Mutex<Vec<String>>,
    }

    impl Transport for SingleResponse {
        fn get(&self, path: &str, _query: &[(&str, String)]) -> Result<Value> {
            self.paths.lock().unwrap().push(path.to_string());
            Ok(self.response.clone())
        }

        fn post(&self, _path: &str, _body: &Value) -> Result<Value> {
            unimplemented!()
        }

        fn put(&self, _path: &str, _body: &Value) -> Result<Value> {
            unimplemented!()
        }

        fn delete(&self, _path: &str, _query: &[(&str, String)]) -> Result<Value> {
            unimplemented!()
        }
    }

    fn client_returning(response: Value) -> (JiraClient, Arc<SingleResponse>) {
        let transport = Arc::new(SingleResponse {
            response,
            paths: Mutex::new(Vec::new()),
        });
        (JiraClient::with_transport(transport.clone()), transport)
    }

    #[test]
    fn test_board_path_and_parse() {
        let (client, transport) = client_returning(json!({
            "id": 84,
            "self": "https://example.com/rest/agile/1.0/board/84",
            "name": "scrum board",
            "type": "scrum"
        }));

        let board = client.board(84).unwrap();
        assert_eq!(board.id, 84);
        assert_eq!(board.kind.as_deref(), Some("scrum"));
        assert_eq!(transport.paths.lock().unwrap()[0], "rest/agile/1.0/board/84");
    }

    #[test]
    fn test_boards_page_envelope() {
        let (client, _) = client_returning(json!({
            "maxResults": 50,
            "startAt": 0,
            "isLast": true,
            "values": [
                {"id": 84, "name": "scrum board", "type": "scrum"},
                {"id": 92, "name": "kanban board", "type": "kanban"}
            ]
        }));

        let page = client.boards(0).unwrap();
        assert!(page.is_last);
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[1].name.as_deref(), Some("kanban board"));
    }

    #[test]
    fn test_sprint_dates_accept_rfc3339_offsets() {
        let (client, _) = client_returning(json!({
            "id": 37,
            "name": "sprint 1",
            "state": "closed",
            "startDate": "2015-04-11T15:22:00.000+10:00",
            "endDate": "2015-04-20T01:22:00.000+10:00",
            "completeDate": "2015-04-20T11:04:00.000+10:00",
            "originBoardId": 84,
            "goal": "sprint 1 goal"
        }));

        let sprint = client.sprint(37).unwrap();
        assert_eq!(sprint.state.as_deref(), Some("closed"));
        assert_eq!(sprint.origin_board_id, Some(84));
        assert!(sprint.start_date.is_some());
        assert!(sprint.complete_date.is_some());
    }

    #[test]
    fn test_sprint_issues_reuse_search_page() {
        let (client, transport) = client_returning(json!({
            "startAt": 0,
            "maxResults": 50,
            "total": 1,
            "issues": [{"id": "1", "key": "PROJ-1", "fields": {"summary": "sprint work"}}]
        }));

        let page = client.sprint_issues(37, 0).unwrap();
        assert_eq!(page.issues[0].issue_key(), "PROJ-1");
        assert_eq!(
            transport.paths.lock().unwrap()[0],
            "rest/agile/1.0/sprint/37/issue"
        );
    }
}
