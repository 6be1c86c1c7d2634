//! Resolution entry point
//!
//! Ties classification, query building and the store together: one call
//! per request, no state kept between calls.

use std::time::Duration;

use tracing::info;

use crate::error::ResolveError;
use crate::id;
use crate::resource::{Resource, DEFAULT_LANGUAGE};
use crate::search::{self, SearchResults, DEFAULT_LIMIT};
use crate::store::{HttpStore, Store};

/// Public SPARQL endpoint of the national bibliography
pub const DEFAULT_ENDPOINT: &str = "http://data.nationallibrary.fi/bib/sparql";

/// Work shown when no identifier is requested
pub const DEFAULT_WORK: &str = "http://urn.fi/URN:NBN:fi:bib:me:W00009584100";

/// Options for resolution
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// SPARQL endpoint URL
    pub endpoint: String,
    /// Preferred language tag for display labels
    pub language: String,
    /// Result count for searches that give none
    pub default_limit: usize,
    /// Per-request timeout; none means the caller decides
    pub timeout: Option<Duration>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            default_limit: DEFAULT_LIMIT,
            timeout: None,
        }
    }
}

/// Resolves identifiers and runs searches against one store
pub struct Resolver<S: Store> {
    store: S,
    options: ResolverOptions,
}

impl Resolver<HttpStore> {
    /// Connect to the endpoint named in the options
    pub fn connect(options: ResolverOptions) -> Result<Self, ResolveError> {
        let store = HttpStore::with_timeout(&options.endpoint, options.timeout)?;
        Ok(Self::new(store, options))
    }
}

impl<S: Store> Resolver<S> {
    pub fn new(store: S, options: ResolverOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch a record; it may not exist
    pub fn fetch(&self, identifier: &str) -> Result<Resource, ResolveError> {
        Resource::fetch(&self.store, identifier, &self.options.language)
    }

    /// Fetch a record, treating an empty result as `NotFound`
    pub fn resolve(&self, identifier: &str) -> Result<Resource, ResolveError> {
        let resource = self.fetch(identifier)?;
        if !resource.exists() {
            info!(%identifier, "resource not found");
            return Err(ResolveError::NotFound(identifier.to_string()));
        }
        Ok(resource)
    }

    /// Resolve a served path such as "/bib/me/W00009584100"
    pub fn resolve_path(&self, path: &str) -> Result<Resource, ResolveError> {
        let identifier =
            id::from_path(path).ok_or_else(|| ResolveError::NotFound(path.to_string()))?;
        self.resolve(&identifier)
    }

    /// Ranked search; `limit` falls back to the configured default
    pub fn search(&self, text: &str, limit: Option<usize>) -> Result<SearchResults, ResolveError> {
        search::search(&self.store, text, limit.unwrap_or(self.options.default_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ResourceKind;
    use crate::testutil::{search_row, DownStore, FixtureStore};

    const DATA: &str = r#"
<http://urn.fi/URN:NBN:fi:au:pn:000047367> <http://schema.org/name> "Kivi, Aleksis" .
"#;

    #[test]
    fn test_resolve_existing() {
        let resolver = Resolver::new(FixtureStore::new(DATA), ResolverOptions::default());
        let res = resolver.resolve("http://urn.fi/URN:NBN:fi:au:pn:000047367").unwrap();
        assert_eq!(res.kind(), ResourceKind::Person);
        assert_eq!(res.name(), "Kivi, Aleksis");
        assert!(resolver
            .store()
            .last_query()
            .unwrap()
            .contains("schema:author <http://urn.fi/URN:NBN:fi:au:pn:000047367>"));
    }

    #[test]
    fn test_resolve_missing_is_not_found() {
        let resolver = Resolver::new(FixtureStore::new(""), ResolverOptions::default());
        let err = resolver.resolve(DEFAULT_WORK).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
        assert!(err.is_client_error());

        // fetch still hands back the empty record
        assert!(!resolver.fetch(DEFAULT_WORK).unwrap().exists());
    }

    #[test]
    fn test_resolve_path() {
        let resolver = Resolver::new(FixtureStore::new(DATA), ResolverOptions::default());
        let res = resolver.resolve_path("/au/pn/000047367").unwrap();
        assert_eq!(res.identifier(), "http://urn.fi/URN:NBN:fi:au:pn:000047367");

        assert!(matches!(
            resolver.resolve_path("/nowhere/1"),
            Err(ResolveError::NotFound(_))
        ));
    }

    #[test]
    fn test_store_failure_is_hard_error() {
        let resolver = Resolver::new(DownStore, ResolverOptions::default());
        let err = resolver.resolve(DEFAULT_WORK).unwrap_err();
        assert!(matches!(err, ResolveError::StoreUnavailable { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_search_default_limit() {
        let options = ResolverOptions {
            default_limit: 7,
            ..ResolverOptions::default()
        };
        let store = FixtureStore::with_rows(vec![search_row(
            DEFAULT_WORK,
            "Seven Brothers",
            "http://schema.org/CreativeWork",
        )]);
        let resolver = Resolver::new(store, options);
        let results = resolver.search("seven", None).unwrap();
        assert_eq!(results.limit, 7);
        assert!(resolver.store().last_query().unwrap().contains("LIMIT 7"));
    }

    #[test]
    fn test_language_option_reaches_records() {
        let data = r#"
<http://urn.fi/URN:NBN:fi:au:pn:1> <http://schema.org/name> "Finnish"@fi .
<http://urn.fi/URN:NBN:fi:au:pn:1> <http://schema.org/name> "English"@en .
"#;
        let options = ResolverOptions {
            language: "fi".to_string(),
            ..ResolverOptions::default()
        };
        let resolver = Resolver::new(FixtureStore::new(data), options);
        assert_eq!(
            resolver.resolve("http://urn.fi/URN:NBN:fi:au:pn:1").unwrap().name(),
            "Finnish"
        );
    }

    #[test]
    fn test_records_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resource>();
    }
}
