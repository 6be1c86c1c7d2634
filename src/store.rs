//! Store client
//!
//! The remote triple store is reached through the [`Store`] trait: one call
//! for CONSTRUCT queries returning a graph, one for SELECT queries returning
//! rows. [`HttpStore`] speaks the SPARQL protocol over blocking HTTP.

use std::collections::HashMap;
use std::time::Duration;

use oxigraph::model::Graph;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::ResolveError;
use crate::graph::parse_ntriples;

/// A value bound to a variable in one result row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Binding {
    #[serde(rename = "uri")]
    Iri { value: String },
    #[serde(rename = "bnode")]
    Blank { value: String },
    #[serde(alias = "typed-literal")]
    Literal {
        value: String,
        #[serde(rename = "xml:lang", default)]
        language: Option<String>,
        #[serde(default)]
        datatype: Option<String>,
    },
}

impl Binding {
    /// The lexical value regardless of binding type
    pub fn value(&self) -> &str {
        match self {
            Binding::Iri { value } | Binding::Blank { value } | Binding::Literal { value, .. } => {
                value
            }
        }
    }
}

/// One row of a tabular result: variable name -> bound value
pub type Row = HashMap<String, Binding>;

/// Access to a remote triple store
pub trait Store {
    /// Run a CONSTRUCT query. An empty graph is a successful answer.
    fn construct(&self, query: &str) -> Result<Graph, ResolveError>;

    /// Run a SELECT query, returning rows in store order
    fn select(&self, query: &str) -> Result<Vec<Row>, ResolveError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn construct(&self, query: &str) -> Result<Graph, ResolveError> {
        (**self).construct(query)
    }

    fn select(&self, query: &str) -> Result<Vec<Row>, ResolveError> {
        (**self).select(query)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn construct(&self, query: &str) -> Result<Graph, ResolveError> {
        (**self).construct(query)
    }

    fn select(&self, query: &str) -> Result<Vec<Row>, ResolveError> {
        (**self).select(query)
    }
}

const NTRIPLES: &str = "application/n-triples";
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Deserialize)]
struct SelectResponse {
    results: SelectResults,
}

#[derive(Debug, Deserialize)]
struct SelectResults {
    bindings: Vec<Row>,
}

/// Parse a SPARQL JSON results document into rows
pub fn parse_select_results(body: &str, source: &str) -> Result<Vec<Row>, ResolveError> {
    let response: SelectResponse =
        serde_json::from_str(body).map_err(|e| ResolveError::StoreUnavailable {
            endpoint: source.to_string(),
            reason: format!("Invalid SPARQL results: {}", e),
        })?;
    Ok(response.results.bindings)
}

/// SPARQL protocol client over blocking HTTP
#[derive(Debug, Clone)]
pub struct HttpStore {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl HttpStore {
    pub fn new(endpoint: &str) -> Result<Self, ResolveError> {
        Self::with_timeout(endpoint, None)
    }

    /// Create a client; `timeout` bounds each request when given
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ResolveError> {
        let endpoint = Url::parse(endpoint).map_err(|e| ResolveError::StoreUnavailable {
            endpoint: endpoint.to_string(),
            reason: format!("Invalid endpoint URL: {}", e),
        })?;

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ResolveError::StoreUnavailable {
            endpoint: endpoint.to_string(),
            reason: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn unavailable(&self, reason: String) -> ResolveError {
        warn!(endpoint = %self.endpoint, %reason, "store request failed");
        ResolveError::StoreUnavailable {
            endpoint: self.endpoint.to_string(),
            reason,
        }
    }

    /// POST a query and return the response body
    fn post(&self, query: &str, accept: &str) -> Result<Vec<u8>, ResolveError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, accept)
            .form(&[("query", query)])
            .send()
            .map_err(|e| self.unavailable(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.unavailable(format!("HTTP status {}", status)));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| self.unavailable(format!("Failed to read response: {}", e)))
    }
}

impl Store for HttpStore {
    fn construct(&self, query: &str) -> Result<Graph, ResolveError> {
        let body = self.post(query, NTRIPLES)?;
        let graph = parse_ntriples(&body, self.endpoint.as_str())?;
        debug!(triples = graph.len(), "construct query answered");
        Ok(graph)
    }

    fn select(&self, query: &str) -> Result<Vec<Row>, ResolveError> {
        let body = self.post(query, SPARQL_RESULTS_JSON)?;
        let text = String::from_utf8_lossy(&body);
        let rows = parse_select_results(&text, self.endpoint.as_str())?;
        debug!(rows = rows.len(), "select query answered");
        Ok(rows)
    }
}
