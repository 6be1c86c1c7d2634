//! Vocabulary definitions
//!
//! Namespaces and predicates the resolver navigates, the identifier
//! namespace table shared by classification and path mapping, and the
//! fixed JSON-LD context.

/// schema.org namespace
pub const SCHEMA_NS: &str = "http://schema.org/";

/// SKOS namespace
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";

/// RDFS namespace
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// RDF namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// XML Schema datatypes namespace
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";

pub const SCHEMA_NAME: &str = "http://schema.org/name";
pub const SCHEMA_TITLE: &str = "http://schema.org/title";
pub const SCHEMA_ABOUT: &str = "http://schema.org/about";
pub const SCHEMA_AUTHOR: &str = "http://schema.org/author";
pub const SCHEMA_CONTRIBUTOR: &str = "http://schema.org/contributor";
pub const SCHEMA_WORK_EXAMPLE: &str = "http://schema.org/workExample";
pub const SCHEMA_EXAMPLE_OF_WORK: &str = "http://schema.org/exampleOfWork";
pub const SCHEMA_DATE_PUBLISHED: &str = "http://schema.org/datePublished";
pub const SCHEMA_PUBLISHER: &str = "http://schema.org/publisher";
pub const SCHEMA_BOOK_FORMAT: &str = "http://schema.org/bookFormat";
pub const SCHEMA_EBOOK: &str = "http://schema.org/EBook";
pub const SCHEMA_IDENTIFIER: &str = "http://schema.org/identifier";
pub const SCHEMA_PROPERTY_ID: &str = "http://schema.org/propertyID";
pub const SCHEMA_VALUE: &str = "http://schema.org/value";
pub const SCHEMA_PUBLICATION: &str = "http://schema.org/publication";
pub const SCHEMA_LOCATION: &str = "http://schema.org/location";
pub const SCHEMA_ORGANIZER: &str = "http://schema.org/organizer";

pub const SCHEMA_CREATIVE_WORK: &str = "http://schema.org/CreativeWork";
pub const SCHEMA_COLLECTION: &str = "http://schema.org/Collection";
pub const SCHEMA_PERSON: &str = "http://schema.org/Person";
pub const SCHEMA_ORGANIZATION: &str = "http://schema.org/Organization";

/// Label predicates in resolution priority order
pub const LABEL_PREDICATES: [&str; 4] = [SCHEMA_NAME, SKOS_PREF_LABEL, SCHEMA_TITLE, RDFS_LABEL];

/// Predicates that drive kind dispatch and instance navigation and are
/// never listed as generic properties
pub const HIDDEN_PREDICATES: [&str; 3] = [RDF_TYPE, SCHEMA_WORK_EXAMPLE, SCHEMA_EXAMPLE_OF_WORK];

/// Classes accepted as free-text search hits
pub const SEARCH_TYPES: [&str; 5] = [
    SCHEMA_CREATIVE_WORK,
    SCHEMA_COLLECTION,
    SCHEMA_PERSON,
    SCHEMA_ORGANIZATION,
    SKOS_CONCEPT,
];

/// Bibliographic metadata namespace (works, instances, collections, agents)
pub const BIB_ME_NS: &str = "http://urn.fi/URN:NBN:fi:bib:me:";

/// Personal name authority namespace
pub const AU_PN_NS: &str = "http://urn.fi/URN:NBN:fi:au:pn:";

/// Corporate name authority namespace
pub const AU_CN_NS: &str = "http://urn.fi/URN:NBN:fi:au:cn:";

/// General subject ontology namespace
pub const YSO_NS: &str = "http://www.yso.fi/onto/yso/";

/// Places scheme root inside the subject ontology namespace
pub const YSO_PLACES: &str = "http://www.yso.fi/onto/yso/places";

/// Identifier namespaces and the relative path each one is served under.
///
/// Classification rules are written against these namespaces and path
/// mapping substitutes them, so both stay in agreement.
pub const NAMESPACE_PATHS: [(&str, &str); 4] = [
    (BIB_ME_NS, "/bib/me/"),
    (AU_PN_NS, "/au/pn/"),
    (AU_CN_NS, "/au/cn/"),
    (YSO_NS, "/yso/"),
];

/// Authority code tagging identifiers that link to the union catalogue
pub const MELINDA_CODE: &str = "FI-MELINDA";

/// Base of external union catalogue record links
pub const MELINDA_RECORD_BASE: &str = "https://melinda.kansalliskirjasto.fi/byid/";

/// Prefixes declared in the JSON-LD context, besides the schema.org vocab
pub const CONTEXT_PREFIXES: [(&str, &str); 4] = [
    ("skos", SKOS_NS),
    ("rdfs", RDFS_NS),
    ("rdf", RDF_NS),
    ("xsd", XSD_NS),
];

/// Fixed JSON-LD context: plain terms resolve into schema.org
pub fn jsonld_context() -> serde_json::Value {
    let mut ctx = serde_json::Map::new();
    ctx.insert("@vocab".to_string(), serde_json::json!(SCHEMA_NS));
    for (prefix, ns) in CONTEXT_PREFIXES {
        ctx.insert(prefix.to_string(), serde_json::json!(ns));
    }
    serde_json::Value::Object(ctx)
}
