//! Property maps
//!
//! Groups a record's outgoing triples by the local name of their predicate
//! for generic display. Anonymous nodes without a name are expanded into
//! nested maps, guarded against cycles and bounded in depth.

use std::collections::HashSet;
use std::fmt;

use oxigraph::model::TermRef;

use crate::graph::{self, LiteralValue, Node};
use crate::resource::Resource;
use crate::vocab::HIDDEN_PREDICATES;

/// Maximum number of anonymous hops expanded into nested maps
pub const MAX_DEPTH: usize = 8;

/// One value of a property
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Literal(LiteralValue),
    /// Identifier, or anonymous node carrying a name
    Resource(Resource),
    /// Anonymous node without a name
    Nested(PropertyMap),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Literal(lit) => write!(f, "{}", lit),
            PropertyValue::Resource(res) => write!(f, "{}", res),
            PropertyValue::Nested(map) => write!(f, "{}", map),
        }
    }
}

/// Ordered mapping from property local name to sorted values
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: Vec<(String, Vec<PropertyValue>)>,
}

impl PropertyMap {
    pub fn get(&self, key: &str) -> Option<&[PropertyValue]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PropertyValue])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, values)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: ", key)?;
            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", value)?;
            }
        }
        Ok(())
    }
}

/// Build the property map of a record
pub fn property_map(resource: &Resource) -> PropertyMap {
    let mut path = HashSet::new();
    path.insert(resource.node().clone());
    build(resource, &mut path, 0)
}

fn build(resource: &Resource, path: &mut HashSet<Node>, depth: usize) -> PropertyMap {
    let graph = resource.graph();
    let node = resource.node();

    let mut preds: Vec<String> = graph::predicates(graph, node)
        .into_iter()
        .filter(|p| !HIDDEN_PREDICATES.contains(&p.as_str()))
        .collect();
    preds.sort_by_cached_key(|p| {
        (
            graph::predicate_local_name(p).to_lowercase(),
            p.to_string(),
        )
    });

    let mut entries: Vec<(String, Vec<PropertyValue>)> = Vec::new();
    for pred in &preds {
        let key = graph::predicate_local_name(pred).to_string();
        let values: Vec<PropertyValue> = graph::objects(graph, node, pred)
            .into_iter()
            .map(|term| to_value(resource, term, path, depth))
            .collect();

        // predicates from different namespaces may share a local name
        match entries.last_mut() {
            Some((last, existing)) if *last == key => existing.extend(values),
            _ => entries.push((key, values)),
        }
    }

    for (_, values) in entries.iter_mut() {
        values.sort_by_cached_key(|v| v.to_string().to_lowercase());
    }

    PropertyMap { entries }
}

fn to_value(
    resource: &Resource,
    term: TermRef<'_>,
    path: &mut HashSet<Node>,
    depth: usize,
) -> PropertyValue {
    let node = match Node::from_term(term) {
        Some(node) => node,
        None => {
            return match term {
                TermRef::Literal(lit) => PropertyValue::Literal(LiteralValue::from(lit)),
                other => PropertyValue::Literal(LiteralValue {
                    value: graph::term_string(other),
                    language: None,
                }),
            }
        }
    };

    let related = resource.derive_classified(node.clone());
    if !node.is_blank() || related.has_label() {
        return PropertyValue::Resource(related);
    }

    // a revisited anonymous node or one past the depth bound stops here
    if depth + 1 >= MAX_DEPTH || path.contains(&node) {
        return PropertyValue::Resource(related);
    }

    path.insert(node.clone());
    let nested = build(&related, path, depth + 1);
    path.remove(&node);
    PropertyValue::Nested(nested)
}
