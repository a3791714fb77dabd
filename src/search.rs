//! JQL search with lazy, page-by-page iteration.
//!
//! A [`Search`] is built once (query string plus optional field filter,
//! expand directives, page size, and start offset) and is immutable from
//! the moment fetching begins. One page can be fetched directly with
//! [`Search::page`], or the whole logical result sequence can be walked
//! with the iterator returned by `into_iter()`, which fetches pages on
//! demand and discards each page once its issues have been consumed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::API_PATH;
use crate::error::{Error, Result};
use crate::fields;
use crate::models::Issue;
use crate::transport::Transport;

/// A JQL search, ready to fetch one page or iterate every result.
pub struct Search {
    transport: Arc<dyn Transport>,
    jql: String,
    fields: Option<String>,
    expand: Option<String>,
    max_results: Option<u32>,
    start_at: Option<u64>,
}

impl Search {
    pub(crate) fn new(transport: Arc<dyn Transport>, jql: impl Into<String>) -> Self {
        Self {
            transport,
            jql: jql.into(),
            fields: None,
            expand: None,
            max_results: None,
            start_at: None,
        }
    }

    /// Restrict which issue fields the server includes.
    ///
    /// Accepts the server's field-list syntax, e.g. `"*all"`,
    /// `"*navigable"`, or `"summary,comment"`.
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Set the expand directives for returned issues.
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Cap the number of results per page. The server may cap lower.
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Set the zero-based offset of the first result.
    pub fn start_at(mut self, start_at: u64) -> Self {
        self.start_at = Some(start_at);
        self
    }

    /// Fetch a single page at the configured offset.
    pub fn page(&self) -> Result<SearchPage> {
        self.fetch(self.start_at)
            .map_err(|e| e.ctx("failed to search issues"))
    }

    fn fetch(&self, start_at: Option<u64>) -> Result<SearchPage> {
        let mut query: Vec<(&str, String)> = vec![("jql", self.jql.clone())];
        if let Some(fields) = &self.fields {
            query.push(("fields", fields.clone()));
        }
        if let Some(expand) = &self.expand {
            query.push(("expand", expand.clone()));
        }
        if let Some(max_results) = self.max_results {
            query.push(("maxResults", max_results.to_string()));
        }
        if let Some(start_at) = start_at {
            query.push(("startAt", start_at.to_string()));
        }

        let value = self.transport.get(&format!("{}search", API_PATH), &query)?;
        let page: SearchPage = serde_json::from_value(value)
            .map_err(|e| Error::payload(format!("search result is malformed: {}", e)))?;

        debug!(
            start_at = page.start_at,
            returned = page.issues.len(),
            total = page.total,
            "fetched search page"
        );
        Ok(page)
    }
}

/// One bounded slice of a search result set, as returned by one call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// The zero-based offset of this page.
    #[serde(default)]
    pub start_at: u64,
    /// The page size the server actually used; may be lower than
    /// requested.
    #[serde(default)]
    pub max_results: u32,
    /// The full result count at the time of the call. May drift between
    /// pages if the underlying data set changes.
    #[serde(default)]
    pub total: u64,
    /// The issues in this page, in server order.
    #[serde(default, deserialize_with = "fields::lenient_entities")]
    pub issues: Vec<Issue>,
}

impl SearchPage {
    /// Whether the server reported further results past this page.
    pub fn has_more(&self) -> bool {
        self.start_at + (self.issues.len() as u64) < self.total
    }

    /// The offset of the page after this one: this page's offset plus
    /// the number of issues actually returned (the server may
    /// short-page, so the requested page size must not be used here).
    pub fn next_start(&self) -> u64 {
        self.start_at + self.issues.len() as u64
    }
}

impl IntoIterator for Search {
    type Item = Result<Issue>;
    type IntoIter = SearchIter;

    /// Consume the query and iterate every result, fetching pages
    /// lazily. The search is not restartable; build a new [`Search`] to
    /// run the query again.
    fn into_iter(self) -> SearchIter {
        SearchIter {
            search: self,
            page: Vec::new().into_iter(),
            next_start: None,
            done: false,
        }
    }
}

/// Single-pass iterator over every issue matched by a [`Search`].
///
/// Issues are yielded in exactly the server-returned order, page after
/// page, with no reordering or deduplication. If the underlying data
/// set changes between page fetches, issues may be skipped or repeated;
/// that is inherent to offset pagination and not corrected here.
///
/// A fetch failure is yielded as `Some(Err(_))` without advancing the
/// page offset, so calling `next()` again retries the same page.
pub struct SearchIter {
    search: Search,
    page: std::vec::IntoIter<Issue>,
    next_start: Option<u64>,
    done: bool,
}

impl Iterator for SearchIter {
    type Item = Result<Issue>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(issue) = self.page.next() {
            return Some(Ok(issue));
        }
        if self.done {
            return None;
        }

        let start_at = self.next_start.or(self.search.start_at);
        let page = match self.search.fetch(start_at) {
            Ok(page) => page,
            Err(e) => return Some(Err(e.ctx("failed to search issues"))),
        };

        if page.issues.is_empty() {
            self.done = true;
            return None;
        }

        self.next_start = Some(page.next_start());
        self.page = page.issues.into_iter();
        self.page.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Only the buffered remainder of the current page is certain.
        (self.page.len(), None)
    }
}
