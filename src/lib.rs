//! Bibliographic Identifier Resolution Library
//!
//! This library resolves opaque identifiers of works, editions, persons,
//! organizations and subject concepts into typed, navigable records backed
//! by a remote SPARQL store, and renders those records in several formats.
//!
//! # Overview
//!
//! Resolving an identifier is a single flow:
//!
//! 1. Classify the identifier into a [`ResourceKind`] by its shape alone
//! 2. Build the kind's CONSTRUCT query (base pattern plus one-hop expansions)
//! 3. Run it against the [`Store`]; an empty graph means "not found"
//! 4. Wrap the graph in a [`Resource`] offering names, grouped properties
//!    and kind-specific views (instances of a work, works by an agent, ...)
//! 5. Serialize the record as RDF/XML, Turtle, N-Triples, JSON-LD or HTML
//!
//! Records derived from a fetched record share its graph and never fetch.
//!
//! # Usage
//!
//! ```ignore
//! use biblio_resolve::{Format, Resolver, ResolverOptions};
//!
//! let resolver = Resolver::connect(ResolverOptions::default())?;
//! let work = resolver.resolve("http://urn.fi/URN:NBN:fi:bib:me:W00009584100")?;
//!
//! println!("{}", work.name());
//! for instance in work.instances() {
//!     println!("  {}", instance.edition_info());
//! }
//! println!("{}", work.serialize(Format::Turtle)?);
//!
//! for hit in resolver.search("seitsemän veljestä", Some(5))?.iter() {
//!     println!("{} <{}>", hit.label, hit.identifier);
//! }
//! ```

pub mod error;
pub mod graph;
pub mod id;
pub mod properties;
pub mod query;
pub mod render;
pub mod resolver;
pub mod resource;
pub mod search;
pub mod serialize;
pub mod store;
pub mod vocab;

#[cfg(test)]
mod testutil;

// Re-export main types for convenience
pub use crate::error::ResolveError;
pub use crate::graph::{Node, SharedGraph};
pub use crate::id::{classify, from_path, to_path, ResourceKind};
pub use crate::properties::{PropertyMap, PropertyValue};
pub use crate::query::{build_query, build_search_query};
pub use crate::resolver::{Resolver, ResolverOptions, DEFAULT_ENDPOINT, DEFAULT_WORK};
pub use crate::resource::Resource;
pub use crate::search::{search, SearchResult, SearchResults, DEFAULT_LIMIT};
pub use crate::serialize::{negotiate, Format};
pub use crate::store::{Binding, HttpStore, Row, Store};
