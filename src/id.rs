//! Identifier classification and path mapping
//!
//! Derives a resource kind from the shape of an identifier alone and maps
//! identifiers to and from the relative paths they are served under.

use std::fmt;

use crate::vocab::{AU_CN_NS, AU_PN_NS, NAMESPACE_PATHS, YSO_NS, YSO_PLACES};

/// Semantic kind of a resource, derived from its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Abstract work
    Work,
    /// Collection of works; behaves as a Work
    Collection,
    /// Edition / manifestation of a work
    Instance,
    Person,
    Organization,
    /// Subject concept
    Concept,
    /// Root of a concept or authority namespace
    ConceptScheme,
    /// Unrecognised identifier
    Generic,
}

impl ResourceKind {
    /// Works and collections share queries and accessors
    pub fn is_work(self) -> bool {
        matches!(self, ResourceKind::Work | ResourceKind::Collection)
    }

    /// Persons and organizations can author and contribute to works
    pub fn is_agent(self) -> bool {
        matches!(self, ResourceKind::Person | ResourceKind::Organization)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Work => "Work",
            ResourceKind::Collection => "Collection",
            ResourceKind::Instance => "Instance",
            ResourceKind::Person => "Person",
            ResourceKind::Organization => "Organization",
            ResourceKind::Concept => "Concept",
            ResourceKind::ConceptScheme => "ConceptScheme",
            ResourceKind::Generic => "Resource",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a classification rule matches an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Identifier equals the pattern
    Exact(&'static str),
    /// Identifier starts with the pattern
    Prefix(&'static str),
}

/// Classification rules. Exact entries win over any prefix entry, and among
/// prefix entries the longest matching one wins, so table order is not
/// significant.
pub const RULES: [(Match, ResourceKind); 11] = [
    (Match::Exact(AU_CN_NS), ResourceKind::ConceptScheme),
    (Match::Exact(YSO_NS), ResourceKind::ConceptScheme),
    (Match::Exact(YSO_PLACES), ResourceKind::ConceptScheme),
    (Match::Prefix("http://urn.fi/URN:NBN:fi:bib:me:W"), ResourceKind::Work),
    (Match::Prefix("http://urn.fi/URN:NBN:fi:bib:me:C"), ResourceKind::Collection),
    (Match::Prefix("http://urn.fi/URN:NBN:fi:bib:me:I"), ResourceKind::Instance),
    (Match::Prefix("http://urn.fi/URN:NBN:fi:bib:me:P"), ResourceKind::Person),
    (Match::Prefix("http://urn.fi/URN:NBN:fi:bib:me:O"), ResourceKind::Organization),
    (Match::Prefix(AU_PN_NS), ResourceKind::Person),
    (Match::Prefix(AU_CN_NS), ResourceKind::Organization),
    (Match::Prefix(YSO_NS), ResourceKind::Concept),
];

/// Classify an identifier string
pub fn classify(identifier: &str) -> ResourceKind {
    let exact = RULES.iter().find_map(|(rule, kind)| match rule {
        Match::Exact(pattern) if *pattern == identifier => Some(*kind),
        _ => None,
    });
    if let Some(kind) = exact {
        return kind;
    }

    RULES
        .iter()
        .filter_map(|(rule, kind)| match rule {
            Match::Prefix(pattern) if identifier.starts_with(pattern) => {
                Some((pattern.len(), *kind))
            }
            _ => None,
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, kind)| kind)
        .unwrap_or(ResourceKind::Generic)
}

/// Map an identifier to its relative path
///
/// "http://urn.fi/URN:NBN:fi:bib:me:W001" -> "/bib/me/W001"
pub fn to_path(identifier: &str) -> Option<String> {
    NAMESPACE_PATHS
        .iter()
        .filter(|(ns, _)| identifier.starts_with(ns))
        .max_by_key(|(ns, _)| ns.len())
        .map(|(ns, path)| format!("{}{}", path, &identifier[ns.len()..]))
}

/// Map a relative path back to the identifier it serves
pub fn from_path(path: &str) -> Option<String> {
    NAMESPACE_PATHS
        .iter()
        .filter(|(_, prefix)| path.starts_with(prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(ns, prefix)| format!("{}{}", ns, &path[prefix.len()..]))
}

/// Last segment of an identifier, after the final ':' '/' or '#'
pub fn local_name(identifier: &str) -> &str {
    identifier
        .rsplit(|c: char| c == ':' || c == '/' || c == '#')
        .next()
        .unwrap_or(identifier)
}

/// Whether an identifier lives in one of the served namespaces
pub fn is_served(identifier: &str) -> bool {
    to_path(identifier).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bibliographic() {
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:bib:me:W00009584100"), ResourceKind::Work);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:bib:me:C00001"), ResourceKind::Collection);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:bib:me:I00009584101"), ResourceKind::Instance);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:bib:me:P00012"), ResourceKind::Person);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:bib:me:O00034"), ResourceKind::Organization);
    }

    #[test]
    fn test_classify_authorities() {
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:au:pn:000047367"), ResourceKind::Person);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:au:cn:123A"), ResourceKind::Organization);
        assert_eq!(classify("http://www.yso.fi/onto/yso/p123"), ResourceKind::Concept);
    }

    #[test]
    fn test_exact_roots_win_over_prefix() {
        assert_eq!(classify("http://www.yso.fi/onto/yso/"), ResourceKind::ConceptScheme);
        assert_eq!(classify("http://www.yso.fi/onto/yso/places"), ResourceKind::ConceptScheme);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:au:cn:"), ResourceKind::ConceptScheme);
        // members of the places scheme are still concepts
        assert_eq!(classify("http://www.yso.fi/onto/yso/places/p94"), ResourceKind::Concept);
    }

    #[test]
    fn test_exact_rules_precede_prefix_rules_in_table() {
        // a first-match-wins scan must agree with classify()
        for (rule, kind) in RULES.iter() {
            if let Match::Exact(pattern) = rule {
                let first = RULES
                    .iter()
                    .find(|(r, _)| match r {
                        Match::Exact(p) => *p == *pattern,
                        Match::Prefix(p) => pattern.starts_with(p),
                    })
                    .map(|(_, k)| *k);
                assert_eq!(first, Some(*kind));
                assert_eq!(classify(pattern), *kind);
            }
        }
    }

    #[test]
    fn test_classify_generic() {
        assert_eq!(classify("https://example.org/thing"), ResourceKind::Generic);
        assert_eq!(classify(""), ResourceKind::Generic);
        assert_eq!(classify("not a uri"), ResourceKind::Generic);
        assert_eq!(classify("http://urn.fi/URN:NBN:fi:bib:me:X1"), ResourceKind::Generic);
    }

    #[test]
    fn test_path_round_trip() {
        for (ns, path) in NAMESPACE_PATHS {
            let id = format!("{}X42", ns);
            let p = to_path(&id).unwrap();
            assert_eq!(p, format!("{}X42", path));
            assert_eq!(from_path(&p).unwrap(), id);
        }
    }

    #[test]
    fn test_path_examples() {
        assert_eq!(
            to_path("http://urn.fi/URN:NBN:fi:bib:me:W00009584100").as_deref(),
            Some("/bib/me/W00009584100")
        );
        assert_eq!(
            from_path("/au/pn/000047367").as_deref(),
            Some("http://urn.fi/URN:NBN:fi:au:pn:000047367")
        );
        assert_eq!(to_path("https://example.org/thing"), None);
        assert_eq!(from_path("/static/app.js"), None);
    }

    #[test]
    fn test_every_rule_namespace_has_a_path() {
        for (rule, _) in RULES.iter() {
            let pattern = match rule {
                Match::Exact(p) | Match::Prefix(p) => *p,
            };
            assert!(is_served(pattern), "no path for {}", pattern);
        }
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("http://urn.fi/URN:NBN:fi:bib:me:W001"), "W001");
        assert_eq!(local_name("http://schema.org/name"), "name");
        assert_eq!(local_name("http://www.w3.org/2004/02/skos/core#prefLabel"), "prefLabel");
    }

    #[test]
    fn test_kind_capabilities() {
        assert!(ResourceKind::Collection.is_work());
        assert!(ResourceKind::Organization.is_agent());
        assert!(!ResourceKind::Concept.is_agent());
        assert_eq!(ResourceKind::Generic.to_string(), "Resource");
    }
}
