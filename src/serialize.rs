//! Output formats
//!
//! Projects a record's backing graph into RDF/XML, Turtle, N-Triples or
//! JSON-LD, or renders it as HTML. Every machine format carries the same
//! triple set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use oxigraph::io::{GraphFormat, GraphSerializer};
use oxigraph::model::{Graph, LiteralRef, SubjectRef, TermRef};
use serde_json::{json, Map, Value};

use crate::error::ResolveError;
use crate::render::record_html;
use crate::resource::Resource;
use crate::vocab::{jsonld_context, CONTEXT_PREFIXES, RDF_TYPE, SCHEMA_NS, XSD_NS};

/// Closed set of output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    RdfXml,
    Turtle,
    NTriples,
    JsonLd,
    Html,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::RdfXml,
        Format::Turtle,
        Format::NTriples,
        Format::JsonLd,
        Format::Html,
    ];

    pub fn content_type(self) -> &'static str {
        match self {
            Format::RdfXml => "application/rdf+xml",
            Format::Turtle => "text/turtle",
            Format::NTriples => "application/n-triples",
            Format::JsonLd => "application/json",
            Format::Html => "text/html",
        }
    }

    /// Short token used in URLs and on the command line
    pub fn token(self) -> &'static str {
        match self {
            Format::RdfXml => "rdf",
            Format::Turtle => "ttl",
            Format::NTriples => "nt",
            Format::JsonLd => "json",
            Format::Html => "html",
        }
    }

    /// Parse an explicit format token
    pub fn from_token(token: &str) -> Result<Self, ResolveError> {
        match token.trim().to_ascii_lowercase().as_str() {
            "rdf" | "xml" | "rdfxml" => Ok(Format::RdfXml),
            "ttl" | "turtle" => Ok(Format::Turtle),
            "nt" | "ntriples" => Ok(Format::NTriples),
            "json" | "jsonld" => Ok(Format::JsonLd),
            "html" | "htm" => Ok(Format::Html),
            _ => Err(ResolveError::UnsupportedFormat(token.to_string())),
        }
    }

    fn from_media_type(media: &str) -> Option<Self> {
        match media {
            "application/rdf+xml" => Some(Format::RdfXml),
            "text/turtle" | "application/x-turtle" => Some(Format::Turtle),
            "application/n-triples" | "text/plain" => Some(Format::NTriples),
            "application/ld+json" | "application/json" => Some(Format::JsonLd),
            "text/html" | "application/xhtml+xml" => Some(Format::Html),
            _ => None,
        }
    }

    fn graph_format(self) -> Option<GraphFormat> {
        match self {
            Format::RdfXml => Some(GraphFormat::RdfXml),
            Format::Turtle => Some(GraphFormat::Turtle),
            Format::NTriples => Some(GraphFormat::NTriples),
            Format::JsonLd | Format::Html => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Format {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_token(s)
    }
}

/// Choose a format from an Accept header
///
/// Media ranges are ranked by q-value (ties keep header order). The best
/// ranked range naming a known type wins; wildcards, unknown types and a
/// missing header all mean HTML.
pub fn negotiate(accept: Option<&str>) -> Format {
    let accept = match accept {
        Some(a) => a,
        None => return Format::Html,
    };

    let mut ranges: Vec<(f32, &str)> = accept
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';');
            let media = params.next()?.trim();
            if media.is_empty() {
                return None;
            }
            let q = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|v| v.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((q, media))
        })
        .filter(|(q, _)| *q > 0.0)
        .collect();
    ranges.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    ranges
        .iter()
        .find_map(|(_, media)| Format::from_media_type(&media.to_ascii_lowercase()))
        .unwrap_or(Format::Html)
}

/// Serialize a record in the requested format
pub fn serialize(resource: &Resource, format: Format) -> Result<String, ResolveError> {
    match format.graph_format() {
        Some(graph_format) => serialize_graph(resource.graph(), graph_format),
        None => match format {
            Format::JsonLd => Ok(serde_json::to_string_pretty(&to_jsonld(resource.graph()))?),
            _ => Ok(record_html(resource)),
        },
    }
}

fn serialize_graph(graph: &Graph, format: GraphFormat) -> Result<String, ResolveError> {
    let mut buffer = Vec::new();
    let mut writer = GraphSerializer::from_format(format).triple_writer(&mut buffer);
    for triple in graph.iter() {
        writer.write(triple)?;
    }
    writer.finish()?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Compact a predicate or class IRI against the fixed context
///
/// schema.org terms become bare names, terms of a declared prefix become
/// CURIEs, anything else stays a full IRI. Bare names never contain ':',
/// so distinct IRIs always compact to distinct keys.
pub fn compact_iri(iri: &str) -> String {
    if let Some(local) = iri.strip_prefix(SCHEMA_NS) {
        if !local.is_empty() && !local.contains([':', '/', '#']) {
            return local.to_string();
        }
    }
    for (prefix, ns) in CONTEXT_PREFIXES {
        if let Some(local) = iri.strip_prefix(ns) {
            if !local.is_empty() && !local.contains([':', '/', '#']) {
                return format!("{}:{}", prefix, local);
            }
        }
    }
    iri.to_string()
}

fn subject_id(subject: SubjectRef<'_>) -> String {
    match subject {
        SubjectRef::NamedNode(n) => n.as_str().to_string(),
        SubjectRef::BlankNode(b) => format!("_:{}", b.as_str()),
        other => other.to_string(),
    }
}

fn literal_value(lit: LiteralRef<'_>) -> Value {
    if let Some(lang) = lit.language() {
        return json!({"@value": lit.value(), "@language": lang});
    }
    let datatype = lit.datatype().as_str();
    if datatype == format!("{}string", XSD_NS) {
        json!(lit.value())
    } else {
        json!({"@value": lit.value(), "@type": compact_iri(datatype)})
    }
}

fn term_value(term: TermRef<'_>) -> Value {
    match term {
        TermRef::NamedNode(n) => json!({"@id": n.as_str()}),
        TermRef::BlankNode(b) => json!({"@id": format!("_:{}", b.as_str())}),
        TermRef::Literal(lit) => literal_value(lit),
        other => json!(other.to_string()),
    }
}

/// Build a JSON-LD document from a graph
pub fn to_jsonld(graph: &Graph) -> Value {
    let mut nodes: BTreeMap<String, Map<String, Value>> = BTreeMap::new();

    for triple in graph.iter() {
        let id = subject_id(triple.subject);
        let node = nodes.entry(id.clone()).or_insert_with(|| {
            let mut m = Map::new();
            m.insert("@id".to_string(), json!(id));
            m
        });

        // @type only holds IRIs; other rdf:type objects stay plain values
        let (key, value) = match triple.object {
            TermRef::NamedNode(class) if triple.predicate.as_str() == RDF_TYPE => {
                ("@type".to_string(), json!(compact_iri(class.as_str())))
            }
            object => (compact_iri(triple.predicate.as_str()), term_value(object)),
        };

        match node.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = json!([first, value]);
            }
            None => {
                node.insert(key, value);
            }
        }
    }

    // stable output regardless of graph iteration order
    let graph_nodes: Vec<Value> = nodes
        .into_values()
        .map(|mut node| {
            for value in node.values_mut() {
                if let Value::Array(values) = value {
                    values.sort_by_key(|v| v.to_string());
                }
            }
            Value::Object(node)
        })
        .collect();

    json!({
        "@context": jsonld_context(),
        "@graph": graph_nodes
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{parse_ntriples, Node};
    use crate::id::ResourceKind;
    use crate::resource::DEFAULT_LANGUAGE;
    use crate::testutil::fixture_graph;
    use std::sync::Arc;

    const DATA: &str = r#"
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/CreativeWork> .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/name> "Seven Brothers"@en .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/name> "Seitsemän veljestä" .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://www.w3.org/2004/02/skos/core#prefLabel> "pref" .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://example.org/vocab/name> "other name" .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/datePublished> "1870"^^<http://www.w3.org/2001/XMLSchema#gYear> .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/author> <http://urn.fi/URN:NBN:fi:au:pn:1> .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/identifier> _:b0 .
_:b0 <http://schema.org/value> "x" .
"#;

    fn resource() -> Resource {
        Resource::with_graph(
            Node::iri("http://urn.fi/URN:NBN:fi:bib:me:W1"),
            ResourceKind::Work,
            Arc::new(fixture_graph(DATA)),
            DEFAULT_LANGUAGE,
        )
    }

    #[test]
    fn test_from_token() {
        assert_eq!(Format::from_token("ttl").unwrap(), Format::Turtle);
        assert_eq!(Format::from_token("RDF").unwrap(), Format::RdfXml);
        assert_eq!(Format::from_token("nt").unwrap(), Format::NTriples);
        assert_eq!("json".parse::<Format>().unwrap(), Format::JsonLd);
        assert!(matches!(
            Format::from_token("pdf"),
            Err(ResolveError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_token_round_trip() {
        for format in Format::ALL {
            assert_eq!(Format::from_token(format.token()).unwrap(), format);
        }
    }

    #[test]
    fn test_content_types() {
        assert_eq!(Format::RdfXml.content_type(), "application/rdf+xml");
        assert_eq!(Format::Turtle.content_type(), "text/turtle");
        assert_eq!(Format::NTriples.content_type(), "application/n-triples");
        assert_eq!(Format::JsonLd.content_type(), "application/json");
    }

    #[test]
    fn test_negotiate() {
        assert_eq!(negotiate(None), Format::Html);
        assert_eq!(negotiate(Some("*/*")), Format::Html);
        assert_eq!(
            negotiate(Some("text/html,application/xhtml+xml,*/*;q=0.8")),
            Format::Html
        );
        assert_eq!(negotiate(Some("text/turtle")), Format::Turtle);
        assert_eq!(
            negotiate(Some("text/html;q=0.5, application/rdf+xml")),
            Format::RdfXml
        );
        assert_eq!(negotiate(Some("application/ld+json")), Format::JsonLd);
        assert_eq!(negotiate(Some("image/png")), Format::Html);
        assert_eq!(negotiate(Some("text/turtle;q=0")), Format::Html);
    }

    fn reparse(text: &str, format: GraphFormat) -> Graph {
        let parser = oxigraph::io::GraphParser::from_format(format);
        let mut graph = Graph::new();
        for triple in parser.read_triples(text.as_bytes()) {
            graph.insert(&triple.unwrap());
        }
        graph
    }

    #[test]
    fn test_rdf_formats_carry_same_triples() {
        let res = resource();
        for (format, graph_format) in [
            (Format::NTriples, GraphFormat::NTriples),
            (Format::Turtle, GraphFormat::Turtle),
            (Format::RdfXml, GraphFormat::RdfXml),
        ] {
            let text = res.serialize(format).unwrap();
            let back = reparse(&text, graph_format);
            assert_eq!(back.len(), res.graph().len(), "{:?}", format);
        }
    }

    #[test]
    fn test_ntriples_matches_source() {
        let text = resource().serialize(Format::NTriples).unwrap();
        let back = parse_ntriples(text.as_bytes(), "test").unwrap();
        let source = fixture_graph(DATA);
        for triple in source.iter().filter(|t| !t.subject.is_blank_node() && !t.object.is_blank_node()) {
            assert!(back.contains(triple), "missing {}", triple);
        }
    }

    #[test]
    fn test_compact_iri() {
        assert_eq!(compact_iri("http://schema.org/name"), "name");
        assert_eq!(
            compact_iri("http://www.w3.org/2004/02/skos/core#prefLabel"),
            "skos:prefLabel"
        );
        assert_eq!(
            compact_iri("http://example.org/vocab/name"),
            "http://example.org/vocab/name"
        );
    }

    #[test]
    fn test_jsonld_document() {
        let doc = to_jsonld(resource().graph());
        assert_eq!(doc["@context"]["@vocab"], "http://schema.org/");

        let nodes = doc["@graph"].as_array().unwrap();
        let work = nodes
            .iter()
            .find(|n| n["@id"] == "http://urn.fi/URN:NBN:fi:bib:me:W1")
            .unwrap();
        assert_eq!(work["@type"], "CreativeWork");
        assert_eq!(work["author"]["@id"], "http://urn.fi/URN:NBN:fi:au:pn:1");
        assert_eq!(work["skos:prefLabel"], "pref");
        assert_eq!(work["http://example.org/vocab/name"], "other name");
        assert_eq!(work["datePublished"]["@type"], "xsd:gYear");

        let names = work["name"].as_array().unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&json!({"@value": "Seven Brothers", "@language": "en"})));
        assert!(names.contains(&json!("Seitsemän veljestä")));

        // one node object per subject
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_jsonld_predicate_count_preserved() {
        let doc = to_jsonld(resource().graph());
        let values: usize = doc["@graph"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|n| n.as_object().unwrap().iter())
            .filter(|(k, _)| k.as_str() != "@id")
            .map(|(_, v)| v.as_array().map(|a| a.len()).unwrap_or(1))
            .sum();
        assert_eq!(values, resource().graph().len());
    }

    #[test]
    fn test_jsonld_non_iri_type_kept_as_value() {
        let graph = fixture_graph(
            r#"
<http://ex.org/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Book> .
<http://ex.org/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> "Book" .
<http://ex.org/b> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> _:cls .
"#,
        );
        let doc = to_jsonld(&graph);
        let nodes = doc["@graph"].as_array().unwrap();

        let a = nodes.iter().find(|n| n["@id"] == "http://ex.org/a").unwrap();
        assert_eq!(a["@type"], "Book");
        assert_eq!(a["rdf:type"], "Book");

        let b = nodes.iter().find(|n| n["@id"] == "http://ex.org/b").unwrap();
        assert!(b.get("@type").is_none());
        assert!(b["rdf:type"]["@id"].as_str().unwrap().starts_with("_:"));
    }

    #[test]
    fn test_html_format() {
        let html = resource().serialize(Format::Html).unwrap();
        assert!(html.contains("<h1>Seven Brothers</h1>"));
    }
}
