//! In-memory store used by unit tests

use std::cell::{Cell, RefCell};

use oxigraph::model::Graph;

use crate::error::ResolveError;
use crate::graph::parse_ntriples;
use crate::store::{Binding, Row, Store};

/// Parse N-Triples fixture text, panicking on bad fixtures
pub fn fixture_graph(data: &str) -> Graph {
    parse_ntriples(data.as_bytes(), "fixture").expect("valid fixture")
}

/// Answers every CONSTRUCT with the same graph and every SELECT with the
/// same rows, recording how often and with what it was called
pub struct FixtureStore {
    data: String,
    rows: Vec<Row>,
    constructs: Cell<usize>,
    selects: Cell<usize>,
    last_query: RefCell<Option<String>>,
}

impl FixtureStore {
    pub fn new(data: &str) -> Self {
        Self {
            data: data.to_string(),
            rows: Vec::new(),
            constructs: Cell::new(0),
            selects: Cell::new(0),
            last_query: RefCell::new(None),
        }
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::new("")
        }
    }

    pub fn construct_calls(&self) -> usize {
        self.constructs.get()
    }

    pub fn select_calls(&self) -> usize {
        self.selects.get()
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.borrow().clone()
    }
}

impl Store for FixtureStore {
    fn construct(&self, query: &str) -> Result<Graph, ResolveError> {
        self.constructs.set(self.constructs.get() + 1);
        *self.last_query.borrow_mut() = Some(query.to_string());
        Ok(fixture_graph(&self.data))
    }

    fn select(&self, query: &str) -> Result<Vec<Row>, ResolveError> {
        self.selects.set(self.selects.get() + 1);
        *self.last_query.borrow_mut() = Some(query.to_string());
        Ok(self.rows.clone())
    }
}

/// Always fails, as an unreachable endpoint would
pub struct DownStore;

impl Store for DownStore {
    fn construct(&self, _query: &str) -> Result<Graph, ResolveError> {
        Err(ResolveError::StoreUnavailable {
            endpoint: "down".to_string(),
            reason: "connection refused".to_string(),
        })
    }

    fn select(&self, _query: &str) -> Result<Vec<Row>, ResolveError> {
        Err(ResolveError::StoreUnavailable {
            endpoint: "down".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

/// A search result row binding `s`, `label` and `type`
pub fn search_row(identifier: &str, label: &str, type_iri: &str) -> Row {
    let mut row = Row::new();
    row.insert(
        "s".to_string(),
        Binding::Iri {
            value: identifier.to_string(),
        },
    );
    row.insert(
        "label".to_string(),
        Binding::Literal {
            value: label.to_string(),
            language: None,
            datatype: None,
        },
    );
    row.insert(
        "type".to_string(),
        Binding::Iri {
            value: type_iri.to_string(),
        },
    );
    row
}
