//! Ranked free-text search
//!
//! Wraps the rows of a full-text SELECT query into lightweight result
//! entries. The store ranks the rows; their order is kept as returned.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::ResolveError;
use crate::id::{self, classify, ResourceKind};
use crate::query::{build_search_query, required_terms};
use crate::store::{Binding, Row, Store};

/// Result count used when the caller gives none
pub const DEFAULT_LIMIT: usize = 20;

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub identifier: String,
    pub label: String,
    /// Local name of the matched class, e.g. "CreativeWork"
    pub type_tag: String,
}

impl SearchResult {
    fn from_row(row: &Row) -> Option<Self> {
        let identifier = match row.get("s")? {
            Binding::Iri { value } => value.clone(),
            _ => return None,
        };
        let label = row
            .get("label")
            .map(|b| b.value().to_string())
            .unwrap_or_else(|| format!("<{}>", identifier));
        let type_tag = row
            .get("type")
            .map(|b| id::local_name(b.value()).to_string())
            .unwrap_or_default();

        Some(Self {
            identifier,
            label,
            type_tag,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        classify(&self.identifier)
    }

    pub fn path(&self) -> Option<String> {
        id::to_path(&self.identifier)
    }
}

/// Results of one search, in store ranking order
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub limit: usize,
    results: Vec<SearchResult>,
}

impl SearchResults {
    /// Number of entries actually returned, at most the limit
    pub fn total_results(&self) -> usize {
        self.results.len()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.results.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Run a ranked search requiring every token of `text` to match
pub fn search<S: Store + ?Sized>(
    store: &S,
    text: &str,
    limit: usize,
) -> Result<SearchResults, ResolveError> {
    if limit == 0 {
        return Err(ResolveError::InvalidLimit(limit));
    }

    if required_terms(text).is_empty() {
        return Ok(SearchResults {
            query: text.to_string(),
            limit,
            results: Vec::new(),
        });
    }

    let query = build_search_query(text, limit);
    debug!(%text, limit, "running search");
    let rows = store.select(&query)?;

    // first occurrence of a subject keeps its rank
    let mut seen = HashSet::new();
    let results: Vec<SearchResult> = rows
        .iter()
        .filter_map(SearchResult::from_row)
        .filter(|hit| seen.insert(hit.identifier.clone()))
        .take(limit)
        .collect();
    debug!(hits = results.len(), "search finished");

    Ok(SearchResults {
        query: text.to_string(),
        limit,
        results,
    })
}
