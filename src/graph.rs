//! Graph helpers
//!
//! A fetched graph is wrapped in an `Arc` and shared read-only by every
//! record derived from the same fetch. The helpers here answer the
//! subject/predicate/object lookups the resource layer needs using plain
//! identifier strings.

use std::fmt;
use std::sync::Arc;

use oxigraph::io::{GraphFormat, GraphParser};
use oxigraph::model::{
    BlankNode, Graph, LiteralRef, NamedNode, NamedNodeRef, SubjectRef, TermRef,
};

use crate::error::ResolveError;

/// Read-only graph shared between a record and the records derived from it
pub type SharedGraph = Arc<Graph>;

/// The subject a record describes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Absolute identifier
    Iri(NamedNode),
    /// Anonymous node scoped to one fetch
    Blank(BlankNode),
}

impl Node {
    /// Build an identifier node without validating the IRI
    pub fn iri(identifier: &str) -> Self {
        Node::Iri(NamedNode::new_unchecked(identifier))
    }

    pub fn as_subject(&self) -> SubjectRef<'_> {
        match self {
            Node::Iri(n) => SubjectRef::NamedNode(n.as_ref()),
            Node::Blank(b) => SubjectRef::BlankNode(b.as_ref()),
        }
    }

    pub fn as_term(&self) -> TermRef<'_> {
        match self {
            Node::Iri(n) => TermRef::NamedNode(n.as_ref()),
            Node::Blank(b) => TermRef::BlankNode(b.as_ref()),
        }
    }

    /// Identifier string; blank nodes render as "_:id"
    pub fn as_str(&self) -> String {
        match self {
            Node::Iri(n) => n.as_str().to_string(),
            Node::Blank(b) => format!("_:{}", b.as_str()),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    /// Convert an object term into a node, if it is one
    pub fn from_term(term: TermRef<'_>) -> Option<Self> {
        match term {
            TermRef::NamedNode(n) => Some(Node::Iri(n.into_owned())),
            TermRef::BlankNode(b) => Some(Node::Blank(b.into_owned())),
            _ => None,
        }
    }

    /// Convert a subject into a node, if it is one
    pub fn from_subject(subject: SubjectRef<'_>) -> Option<Self> {
        match subject {
            SubjectRef::NamedNode(n) => Some(Node::Iri(n.into_owned())),
            SubjectRef::BlankNode(b) => Some(Node::Blank(b.into_owned())),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// A literal value with its optional language tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralValue {
    pub value: String,
    pub language: Option<String>,
}

impl From<LiteralRef<'_>> for LiteralValue {
    fn from(lit: LiteralRef<'_>) -> Self {
        Self {
            value: lit.value().to_string(),
            language: lit.language().map(String::from),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn predicate(iri: &str) -> NamedNodeRef<'_> {
    NamedNodeRef::new_unchecked(iri)
}

/// All objects of (subject, predicate, ?)
pub fn objects<'a>(graph: &'a Graph, subject: &'a Node, pred: &'a str) -> Vec<TermRef<'a>> {
    graph
        .objects_for_subject_predicate(subject.as_subject(), predicate(pred))
        .collect()
}

/// First object of (subject, predicate, ?)
pub fn object<'a>(graph: &'a Graph, subject: &'a Node, pred: &'a str) -> Option<TermRef<'a>> {
    graph.object_for_subject_predicate(subject.as_subject(), predicate(pred))
}

/// Objects of (subject, predicate, ?) that are nodes
pub fn object_nodes(graph: &Graph, subject: &Node, pred: &str) -> Vec<Node> {
    objects(graph, subject, pred)
        .into_iter()
        .filter_map(Node::from_term)
        .collect()
}

/// Subjects of (?, predicate, object)
pub fn subjects(graph: &Graph, pred: &str, object: &Node) -> Vec<Node> {
    graph
        .subjects_for_predicate_object(predicate(pred), object.as_term())
        .filter_map(Node::from_subject)
        .collect()
}

/// Whether any triple (?, predicate, object) exists
pub fn has_subject(graph: &Graph, pred: &str, object: &Node) -> bool {
    graph
        .subject_for_predicate_object(predicate(pred), object.as_term())
        .is_some()
}

/// Whether any triple (subject, predicate, ?) exists
pub fn has_object(graph: &Graph, subject: &Node, pred: &str) -> bool {
    object(graph, subject, pred).is_some()
}

/// Whether the triple (subject, predicate, object-iri) is present
pub fn contains_iri(graph: &Graph, subject: &Node, pred: &str, object_iri: &str) -> bool {
    objects(graph, subject, pred)
        .into_iter()
        .any(|o| matches!(o, TermRef::NamedNode(n) if n.as_str() == object_iri))
}

/// Literal objects of (subject, predicate, ?)
pub fn literals(graph: &Graph, subject: &Node, pred: &str) -> Vec<LiteralValue> {
    objects(graph, subject, pred)
        .into_iter()
        .filter_map(|o| match o {
            TermRef::Literal(lit) => Some(LiteralValue::from(lit)),
            _ => None,
        })
        .collect()
}

/// Distinct predicates used with a subject
pub fn predicates(graph: &Graph, subject: &Node) -> Vec<String> {
    let mut preds: Vec<String> = graph
        .triples_for_subject(subject.as_subject())
        .map(|t| t.predicate.as_str().to_string())
        .collect();
    preds.sort();
    preds.dedup();
    preds
}

/// Plain string form of a term, used for sorting and display
pub fn term_string(term: TermRef<'_>) -> String {
    match term {
        TermRef::NamedNode(n) => n.as_str().to_string(),
        TermRef::BlankNode(b) => format!("_:{}", b.as_str()),
        TermRef::Literal(l) => l.value().to_string(),
        _ => term.to_string(),
    }
}

/// Local name of a predicate, after the final '/' or '#'
pub fn predicate_local_name(iri: &str) -> &str {
    iri.rsplit(|c: char| c == '/' || c == '#')
        .next()
        .unwrap_or(iri)
}

/// Parse an N-Triples document into a graph
pub fn parse_ntriples(data: &[u8], source: &str) -> Result<Graph, ResolveError> {
    let parser = GraphParser::from_format(GraphFormat::NTriples);
    let triples = parser.read_triples(data);

    let mut graph = Graph::new();
    for triple in triples {
        let triple = triple.map_err(|e| ResolveError::StoreUnavailable {
            endpoint: source.to_string(),
            reason: format!("Failed to parse graph: {}", e),
        })?;
        graph.insert(&triple);
    }
    Ok(graph)
}
