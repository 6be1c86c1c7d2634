//! Query templates
//!
//! Each resource kind owns one CONSTRUCT query shape: a base pattern
//! shared by every kind plus kind-specific one-hop expansions. The fetched
//! graph is enough to answer every accessor of that kind without another
//! round trip. Building a query performs no I/O.

use crate::id::ResourceKind;
use crate::vocab::SEARCH_TYPES;

const PREFIXES: &str = "PREFIX schema: <http://schema.org/>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX text: <http://jena.apache.org/text#>
";

/// Template parts contributed by one expansion
struct Expansion {
    construct: &'static str,
    pattern: &'static str,
}

const BASE: Expansion = Expansion {
    construct: "
  <{uri}> ?p ?o .
  ?o schema:name ?oname ;
     skos:prefLabel ?olabel .
  ?wab schema:about <{uri}> ;
       schema:name ?wabname .",
    pattern: "
  {
    <{uri}> ?p ?o .
    OPTIONAL {
      { ?o schema:name ?oname }
      UNION
      { ?o skos:prefLabel ?olabel }
    }
  }
  UNION
  { # works about
    ?wab schema:about <{uri}> ;
         schema:name ?wabname .
  }",
};

const INSTANCES: Expansion = Expansion {
    construct: "
  ?inst ?instprop ?instval .
  ?instval schema:name ?instvalName .
  ?instId ?idprop ?idval .",
    pattern: "
  UNION
  { # instances
    <{uri}> schema:workExample ?inst .
    ?inst ?instprop ?instval .
    OPTIONAL {
      ?instval schema:name ?instvalName
    }
  }
  UNION
  { # instance identifiers
    <{uri}> schema:workExample ?inst .
    ?inst schema:identifier ?instId .
    ?instId ?idprop ?idval .
  }",
};

const PUBLICATION_EVENTS: Expansion = Expansion {
    construct: "
  ?pubEvent schema:location ?pubPlace ;
            schema:organizer ?org .
  ?pubPlace schema:name ?pubPlaceName .
  ?org schema:name ?orgName .",
    pattern: "
  UNION
  { # publication events
    <{uri}> schema:publication ?pubEvent .
    OPTIONAL {
      ?pubEvent schema:location ?pubPlace .
      OPTIONAL { ?pubPlace schema:name ?pubPlaceName }
    }
    OPTIONAL {
      ?pubEvent schema:organizer ?org .
      ?org schema:name ?orgName .
    }
  }",
};

const AGENT_WORKS: Expansion = Expansion {
    construct: "
  ?wau schema:author <{uri}> ;
       schema:name ?wauname .
  ?wco schema:contributor <{uri}> ;
       schema:name ?wconame .",
    pattern: "
  UNION
  { # authored works
    ?wau schema:author <{uri}> ;
         schema:name ?wauname .
  }
  UNION
  { # contributed works
    ?wco schema:contributor <{uri}> ;
         schema:name ?wconame .
  }",
};

fn expansions(kind: ResourceKind) -> Vec<&'static Expansion> {
    match kind {
        ResourceKind::Work | ResourceKind::Collection => {
            vec![&BASE, &INSTANCES, &PUBLICATION_EVENTS]
        }
        ResourceKind::Person | ResourceKind::Organization => vec![&BASE, &AGENT_WORKS],
        ResourceKind::Instance
        | ResourceKind::Concept
        | ResourceKind::ConceptScheme
        | ResourceKind::Generic => vec![&BASE],
    }
}

/// Percent-encode the characters an IRI reference may not contain
///
/// Already encoded input passes through unchanged, so the result names the
/// same subject whether it comes from the user or from the store.
pub fn encode_iri(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for c in identifier.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Build the CONSTRUCT query fetching a resource's projection of the store
pub fn build_query(kind: ResourceKind, identifier: &str) -> String {
    let parts = expansions(kind);
    let construct: String = parts.iter().map(|e| e.construct).collect();
    let pattern: String = parts.iter().map(|e| e.pattern).collect();

    let query = format!(
        "{}\nCONSTRUCT {{{}\n}}\nWHERE {{{}\n}}\n",
        PREFIXES, construct, pattern
    );
    query.replace("{uri}", &encode_iri(identifier))
}

/// Mark every whitespace-separated token as required
///
/// "foo bar" -> "+foo +bar"
pub fn required_terms(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            if token.starts_with('+') {
                token.to_string()
            } else {
                format!("+{}", token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape a string for use inside a double-quoted SPARQL literal
fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the ranked full-text SELECT query
///
/// Binds `?s`, `?label`, `?type` and `?score`, one row per subject,
/// highest score first. The label is the literal the index matched.
pub fn build_search_query(text: &str, limit: usize) -> String {
    let types = SEARCH_TYPES
        .iter()
        .map(|t| format!("<{}>", t))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{prefixes}
SELECT ?s (SAMPLE(?matched) AS ?label) (SAMPLE(?class) AS ?type) (MAX(?hit) AS ?score)
WHERE {{
  (?s ?hit ?matched) text:query (schema:name \"{terms}\") .
  ?s a ?class .
  VALUES ?class {{ {types} }}
}}
GROUP BY ?s
ORDER BY DESC(MAX(?hit))
LIMIT {limit}
",
        prefixes = PREFIXES,
        terms = escape_literal(&required_terms(text)),
        limit = limit,
        types = types,
    )
}
