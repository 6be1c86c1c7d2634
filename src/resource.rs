//! Resource records
//!
//! A [`Resource`] is a typed, read-only view over one fetched graph. Records
//! derived from it (instances of a work, works about a concept, entities
//! referenced from properties) share the same graph and never fetch.

use std::fmt;
use std::sync::Arc;

use oxigraph::model::TermRef;
use tracing::debug;

use crate::error::ResolveError;
use crate::graph::{self, Node, SharedGraph};
use crate::id::{self, classify, ResourceKind};
use crate::properties::{property_map, PropertyMap};
use crate::query::{build_query, encode_iri};
use crate::serialize::{serialize, Format};
use crate::store::Store;
use crate::vocab::{
    LABEL_PREDICATES, MELINDA_CODE, MELINDA_RECORD_BASE, SCHEMA_ABOUT, SCHEMA_AUTHOR,
    SCHEMA_BOOK_FORMAT, SCHEMA_CONTRIBUTOR, SCHEMA_DATE_PUBLISHED, SCHEMA_EBOOK,
    SCHEMA_EXAMPLE_OF_WORK, SCHEMA_IDENTIFIER, SCHEMA_PROPERTY_ID, SCHEMA_PUBLISHER,
    SCHEMA_VALUE, SCHEMA_WORK_EXAMPLE,
};

/// Default preferred language for display labels
pub const DEFAULT_LANGUAGE: &str = "en";

/// A typed record backed by a shared graph
#[derive(Debug, Clone)]
pub struct Resource {
    node: Node,
    kind: ResourceKind,
    graph: SharedGraph,
    language: Arc<str>,
}

impl Resource {
    /// Fetch a record from the store with exactly one CONSTRUCT query
    pub fn fetch<S: Store + ?Sized>(
        store: &S,
        identifier: &str,
        language: &str,
    ) -> Result<Self, ResolveError> {
        let identifier = encode_iri(identifier);
        let kind = classify(&identifier);
        debug!(%identifier, %kind, "fetching resource");
        let graph = store.construct(&build_query(kind, &identifier))?;
        debug!(%identifier, triples = graph.len(), "resource fetched");

        Ok(Self::with_graph(
            Node::iri(&identifier),
            kind,
            Arc::new(graph),
            language,
        ))
    }

    /// Build a record over a graph the caller already holds
    pub fn with_graph(
        node: Node,
        kind: ResourceKind,
        graph: SharedGraph,
        language: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            node,
            kind,
            graph,
            language: language.into(),
        }
    }

    /// Derive a record for another node of the same graph
    pub fn derive(&self, node: Node, kind: ResourceKind) -> Self {
        Self {
            node,
            kind,
            graph: Arc::clone(&self.graph),
            language: Arc::clone(&self.language),
        }
    }

    /// Derive a record whose kind follows from its identifier
    pub(crate) fn derive_classified(&self, node: Node) -> Self {
        let kind = match &node {
            Node::Iri(n) => classify(n.as_str()),
            Node::Blank(_) => ResourceKind::Generic,
        };
        self.derive(node, kind)
    }

    /// Derive a work record; unclassified identifiers still count as works
    fn derive_work(&self, node: Node) -> Self {
        let record = self.derive_classified(node);
        if record.kind.is_work() {
            record
        } else {
            Self {
                kind: ResourceKind::Work,
                ..record
            }
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn identifier(&self) -> String {
        self.node.as_str()
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn typename(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Relative path this record is served under, if its namespace is known
    pub fn path(&self) -> Option<String> {
        match &self.node {
            Node::Iri(n) => id::to_path(n.as_str()),
            Node::Blank(_) => None,
        }
    }

    pub fn local_name(&self) -> String {
        match &self.node {
            Node::Iri(n) => id::local_name(n.as_str()).to_string(),
            Node::Blank(b) => b.as_str().to_string(),
        }
    }

    /// An empty graph means the resource does not exist
    pub fn exists(&self) -> bool {
        !self.graph.is_empty()
    }

    /// Display name. Instances are named by their edition description.
    pub fn name(&self) -> String {
        if self.kind == ResourceKind::Instance {
            return self.edition_info();
        }
        self.label()
    }

    /// Label from the name predicates, preferring the configured language,
    /// then any literal, then the bracketed identifier
    pub fn label(&self) -> String {
        self.find_label(true)
            .or_else(|| self.find_label(false))
            .unwrap_or_else(|| format!("<{}>", self.identifier()))
    }

    fn find_label(&self, language_only: bool) -> Option<String> {
        LABEL_PREDICATES.iter().find_map(|pred| {
            let mut labels: Vec<String> = graph::literals(&self.graph, &self.node, pred)
                .into_iter()
                .filter(|lit| !language_only || self.matches_language(lit.language.as_deref()))
                .map(|lit| lit.value)
                .collect();
            labels.sort();
            labels.into_iter().next()
        })
    }

    fn matches_language(&self, tag: Option<&str>) -> bool {
        match tag {
            Some(tag) => {
                let wanted: &str = &self.language;
                tag.eq_ignore_ascii_case(wanted)
                    || (tag.as_bytes().get(wanted.len()) == Some(&b'-')
                        && tag
                            .get(..wanted.len())
                            .is_some_and(|primary| primary.eq_ignore_ascii_case(wanted)))
            }
            None => false,
        }
    }

    /// Whether any name predicate carries a literal for this node
    pub(crate) fn has_label(&self) -> bool {
        self.find_label(false).is_some()
    }

    pub fn sort_key(&self) -> String {
        self.name().to_lowercase()
    }

    /// Properties grouped by local name, sorted case-insensitively
    pub fn properties(&self) -> PropertyMap {
        property_map(self)
    }

    pub fn has_instances(&self) -> bool {
        self.kind.is_work() && graph::has_object(&self.graph, &self.node, SCHEMA_WORK_EXAMPLE)
    }

    /// Instances of a work, ordered by edition description
    pub fn instances(&self) -> Vec<Resource> {
        if !self.kind.is_work() {
            return Vec::new();
        }
        let instances = graph::object_nodes(&self.graph, &self.node, SCHEMA_WORK_EXAMPLE)
            .into_iter()
            .map(|node| self.derive(node, ResourceKind::Instance))
            .collect();
        sorted(instances)
    }

    pub fn has_works_about(&self) -> bool {
        graph::has_subject(&self.graph, SCHEMA_ABOUT, &self.node)
    }

    /// Works whose subject is this resource
    pub fn works_about(&self) -> Vec<Resource> {
        self.related_works(SCHEMA_ABOUT)
    }

    pub fn has_authored_works(&self) -> bool {
        self.kind.is_agent() && graph::has_subject(&self.graph, SCHEMA_AUTHOR, &self.node)
    }

    pub fn authored_works(&self) -> Vec<Resource> {
        if !self.kind.is_agent() {
            return Vec::new();
        }
        self.related_works(SCHEMA_AUTHOR)
    }

    pub fn has_contributed_works(&self) -> bool {
        self.kind.is_agent() && graph::has_subject(&self.graph, SCHEMA_CONTRIBUTOR, &self.node)
    }

    pub fn contributed_works(&self) -> Vec<Resource> {
        if !self.kind.is_agent() {
            return Vec::new();
        }
        self.related_works(SCHEMA_CONTRIBUTOR)
    }

    fn related_works(&self, pred: &str) -> Vec<Resource> {
        let works = graph::subjects(&self.graph, pred, &self.node)
            .into_iter()
            .map(|node| self.derive_work(node))
            .collect();
        sorted(works)
    }

    /// "<date> : <publisher>" description of an edition
    ///
    /// The date falls back to "-", the publisher part is omitted when no
    /// publisher is linked, and ", e-book" marks electronic editions.
    pub fn edition_info(&self) -> String {
        let date = graph::object(&self.graph, &self.node, SCHEMA_DATE_PUBLISHED)
            .map(graph::term_string)
            .unwrap_or_else(|| "-".to_string());

        let publisher = graph::object(&self.graph, &self.node, SCHEMA_PUBLISHER).map(|term| {
            match Node::from_term(term) {
                Some(node) => self.derive_classified(node).label(),
                None => graph::term_string(term),
            }
        });

        let mut info = match publisher {
            Some(publisher) => format!("{} : {}", date, publisher),
            None => date,
        };
        if graph::contains_iri(&self.graph, &self.node, SCHEMA_BOOK_FORMAT, SCHEMA_EBOOK) {
            info.push_str(", e-book");
        }
        info
    }

    /// The work this instance exemplifies, found in the same graph
    pub fn get_work(&self) -> Option<Resource> {
        graph::object_nodes(&self.graph, &self.node, SCHEMA_EXAMPLE_OF_WORK)
            .into_iter()
            .next()
            .or_else(|| {
                graph::subjects(&self.graph, SCHEMA_WORK_EXAMPLE, &self.node)
                    .into_iter()
                    .next()
            })
            .map(|node| self.derive_work(node))
    }

    /// Link to the union catalogue record of this instance, if it carries
    /// an identifier issued by that catalogue
    pub fn external_record_url(&self) -> Option<String> {
        graph::object_nodes(&self.graph, &self.node, SCHEMA_IDENTIFIER)
            .into_iter()
            .filter(|id_node| {
                graph::literals(&self.graph, id_node, SCHEMA_PROPERTY_ID)
                    .iter()
                    .any(|lit| lit.value == MELINDA_CODE)
            })
            .find_map(|id_node| {
                let value = graph::object(&self.graph, &id_node, SCHEMA_VALUE).map(|term| match term {
                    TermRef::Literal(lit) => lit.value().to_string(),
                    other => graph::term_string(other),
                })?;
                let record_id = value
                    .trim()
                    .trim_start_matches(&format!("({})", MELINDA_CODE))
                    .trim();
                if record_id.is_empty() {
                    None
                } else {
                    Some(format!("{}{}", MELINDA_RECORD_BASE, record_id))
                }
            })
    }

    /// Project the backing graph into a wire format
    pub fn serialize(&self, format: Format) -> Result<String, ResolveError> {
        serialize(self, format)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn sorted(mut records: Vec<Resource>) -> Vec<Resource> {
    records.sort_by_cached_key(|r| r.sort_key());
    records
}
