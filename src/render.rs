//! HTML and feed rendering
//!
//! Plain string rendering of records and search results. Pages are
//! self-contained fragments a presentation layer can wrap or serve as is.

use std::fmt::Write;

use crate::properties::{PropertyMap, PropertyValue};
use crate::resource::Resource;
use crate::search::SearchResults;

/// Escape text for HTML and XML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link target for a record: its served path, or the identifier itself
fn href(resource: &Resource) -> Option<String> {
    if resource.node().is_blank() {
        return None;
    }
    Some(resource.path().unwrap_or_else(|| resource.identifier()))
}

fn link(resource: &Resource) -> String {
    match href(resource) {
        Some(target) => format!(
            "<a href=\"{}\">{}</a>",
            escape(&target),
            escape(&resource.name())
        ),
        None => escape(&resource.name()),
    }
}

fn property_list(out: &mut String, map: &PropertyMap) {
    out.push_str("<dl>\n");
    for (key, values) in map.iter() {
        let _ = writeln!(out, "<dt>{}</dt>", escape(key));
        for value in values {
            out.push_str("<dd>");
            match value {
                PropertyValue::Literal(lit) => match &lit.language {
                    Some(lang) => {
                        let _ = write!(out, "{} <small>@{}</small>", escape(&lit.value), escape(lang));
                    }
                    None => out.push_str(&escape(&lit.value)),
                },
                PropertyValue::Resource(res) => out.push_str(&link(res)),
                PropertyValue::Nested(nested) => property_list(out, nested),
            }
            out.push_str("</dd>\n");
        }
    }
    out.push_str("</dl>\n");
}

fn record_list(out: &mut String, heading: &str, records: &[Resource]) {
    if records.is_empty() {
        return;
    }
    let _ = writeln!(out, "<h2>{}</h2>\n<ul>", escape(heading));
    for record in records {
        let _ = writeln!(out, "<li>{}</li>", link(record));
    }
    out.push_str("</ul>\n");
}

/// Render a record page
pub fn record_html(resource: &Resource) -> String {
    let name = resource.name();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>",
        escape(&name)
    );
    let _ = writeln!(out, "<h1>{}</h1>", escape(&name));
    let _ = writeln!(
        out,
        "<p class=\"type\">{} <code>{}</code></p>",
        escape(resource.typename()),
        escape(&resource.identifier())
    );

    if let Some(url) = resource.external_record_url() {
        let _ = writeln!(
            out,
            "<p><a href=\"{}\">Union catalogue record</a></p>",
            escape(&url)
        );
    }

    property_list(&mut out, &resource.properties());

    if resource.has_instances() {
        let _ = writeln!(out, "<h2>Instances</h2>\n<ul>");
        for instance in resource.instances() {
            let _ = write!(out, "<li>{}", link(&instance));
            if let Some(url) = instance.external_record_url() {
                let _ = write!(out, " (<a href=\"{}\">record</a>)", escape(&url));
            }
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
    }

    if resource.has_authored_works() {
        record_list(&mut out, "Authored works", &resource.authored_works());
    }
    if resource.has_contributed_works() {
        record_list(&mut out, "Contributed works", &resource.contributed_works());
    }
    if resource.has_works_about() {
        record_list(&mut out, "Works about", &resource.works_about());
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Render search results as an HTML listing
pub fn search_html(results: &SearchResults) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Search: {}</title>\n</head>\n<body>",
        escape(&results.query)
    );
    let _ = writeln!(
        out,
        "<h1>Search: {}</h1>\n<p>{} results</p>\n<ol>",
        escape(&results.query),
        results.total_results()
    );
    for hit in results.iter() {
        let target = hit.path().unwrap_or_else(|| hit.identifier.clone());
        let _ = writeln!(
            out,
            "<li><a href=\"{}\">{}</a> <small>{}</small></li>",
            escape(&target),
            escape(&hit.label),
            escape(&hit.type_tag)
        );
    }
    out.push_str("</ol>\n</body>\n</html>\n");
    out
}

/// Render search results as an RSS 2.0 feed
///
/// `base_url` is prefixed to served paths to form item links.
pub fn search_rss(results: &SearchResults, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n<channel>\n");
    let _ = writeln!(out, "<title>Search: {}</title>", escape(&results.query));
    let _ = writeln!(out, "<link>{}/</link>", escape(base));
    let _ = writeln!(
        out,
        "<description>{} results for {}</description>",
        results.total_results(),
        escape(&results.query)
    );
    for hit in results.iter() {
        let link = match hit.path() {
            Some(path) => format!("{}{}", base, path),
            None => hit.identifier.clone(),
        };
        let _ = writeln!(
            out,
            "<item>\n<title>{}</title>\n<link>{}</link>\n<guid isPermaLink=\"false\">{}</guid>\n<category>{}</category>\n</item>",
            escape(&hit.label),
            escape(&link),
            escape(&hit.identifier),
            escape(&hit.type_tag)
        );
    }
    out.push_str("</channel>\n</rss>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::id::ResourceKind;
    use crate::resource::DEFAULT_LANGUAGE;
    use crate::search::search;
    use crate::testutil::{fixture_graph, search_row, FixtureStore};
    use std::sync::Arc;

    const DATA: &str = r#"
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/name> "Tom & Jerry <3>"@en .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/author> <http://urn.fi/URN:NBN:fi:au:pn:7> .
<http://urn.fi/URN:NBN:fi:au:pn:7> <http://schema.org/name> "Hanna" .
<http://urn.fi/URN:NBN:fi:bib:me:W1> <http://schema.org/workExample> <http://urn.fi/URN:NBN:fi:bib:me:I1> .
<http://urn.fi/URN:NBN:fi:bib:me:I1> <http://schema.org/datePublished> "1940" .
"#;

    fn work() -> Resource {
        Resource::with_graph(
            Node::iri("http://urn.fi/URN:NBN:fi:bib:me:W1"),
            ResourceKind::Work,
            Arc::new(fixture_graph(DATA)),
            DEFAULT_LANGUAGE,
        )
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }

    #[test]
    fn test_record_html() {
        let html = record_html(&work());
        assert!(html.contains("<h1>Tom &amp; Jerry &lt;3&gt;</h1>"));
        assert!(html.contains("<a href=\"/au/pn/7\">Hanna</a>"));
        assert!(html.contains("<h2>Instances</h2>"));
        assert!(html.contains("<a href=\"/bib/me/I1\">1940</a>"));
        assert!(!html.contains("workExample"));
    }

    #[test]
    fn test_search_html_and_rss() {
        let store = FixtureStore::with_rows(vec![search_row(
            "http://urn.fi/URN:NBN:fi:bib:me:W1",
            "Tom & Jerry",
            "http://schema.org/CreativeWork",
        )]);
        let results = search(&store, "tom", 20).unwrap();

        let html = search_html(&results);
        assert!(html.contains("<a href=\"/bib/me/W1\">Tom &amp; Jerry</a>"));
        assert!(html.contains("<p>1 results</p>"));

        let rss = search_rss(&results, "https://example.org/");
        assert!(rss.starts_with("<?xml"));
        assert!(rss.contains("<link>https://example.org/bib/me/W1</link>"));
        assert!(rss.contains("<category>CreativeWork</category>"));
    }
}
