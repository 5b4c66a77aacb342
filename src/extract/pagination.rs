//! Next-page resolution for listing pages.
//!
//! Job boards rarely expose a stable pagination API, so resolution is a
//! cascade: an explicit next link relation, then a marked next control, then
//! numeric page links, then a synthesized page-parameter increment. A URL is
//! always produced unless construction itself fails; stopping is the crawl
//! controller's job (result target, revisit set, page ceiling).

use scraper::{Html, Selector};
use url::Url;

/// Query parameters recognized as page numbers.
const PAGE_PARAMS: &[&str] = &["page", "p", "pg"];

/// Explicit next-page controls, in priority order. The document-level link
/// relation outranks anchors.
const NEXT_LINK_SELECTORS: &[&str] = &[
    "link[rel='next']",
    "a[rel='next']",
    "a[aria-label='Next']",
    "a[aria-label='Next Page']",
    "a[title='Next Page']",
    ".pager-next a",
    "a.next",
];

/// Resolve the next listing page URL. Returns `None` only when the base URL
/// does not parse.
pub fn find_next_page(document: &Html, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;

    for selector_str in NEXT_LINK_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(element) = document.select(&selector).next() {
            if let Some(href) = element.value().attr("href") {
                if let Ok(next) = base.join(href) {
                    return Some(next.to_string());
                }
            }
        }
    }

    if let Some(next) = numeric_next_page(document, &base) {
        return Some(next.to_string());
    }

    Some(synthesized_next_page(&base).to_string())
}

/// Page number carried by a URL's query, with the parameter that carried it.
fn page_number(url: &Url) -> Option<(String, u32)> {
    url.query_pairs().find_map(|(key, value)| {
        if PAGE_PARAMS.contains(&key.as_ref()) {
            value.parse().ok().map(|n| (key.to_string(), n))
        } else {
            None
        }
    })
}

/// Among anchors carrying a page-number parameter greater than the current
/// page, pick the closest one.
fn numeric_next_page(document: &Html, base: &Url) -> Option<Url> {
    let current = page_number(base).map(|(_, n)| n).unwrap_or(1);
    let selector = Selector::parse("a[href]").ok()?;

    let mut best: Option<(u32, Url)> = None;
    for anchor in document.select(&selector) {
        let href = match anchor.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let resolved = match base.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };
        let number = match page_number(&resolved) {
            Some((_, number)) => number,
            None => continue,
        };
        if number > current && best.as_ref().map_or(true, |(b, _)| number < *b) {
            best = Some((number, resolved));
        }
    }

    best.map(|(_, url)| url)
}

/// Last resort: bump the page parameter on the base URL itself (2 when
/// absent), keeping every other query pair.
fn synthesized_next_page(base: &Url) -> Url {
    let (param, current) = page_number(base).unwrap_or_else(|| ("page".to_string(), 1));
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key.as_ref() != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut next = base.clone();
    next.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(&param, &(current + 1).to_string());
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://jobs.example.com/jobs-search?search=welder&page=2";

    fn next(html: &str, base: &str) -> Option<String> {
        let document = Html::parse_document(html);
        find_next_page(&document, base)
    }

    #[test]
    fn test_link_rel_next_wins() {
        let html = r#"<html><head>
            <link rel="next" href="/jobs-search?search=welder&page=3">
        </head><body>
            <a rel="next" href="/jobs-search?search=welder&page=9">next</a>
        </body></html>"#;
        assert_eq!(
            next(html, BASE).unwrap(),
            "https://jobs.example.com/jobs-search?search=welder&page=3"
        );
    }

    #[test]
    fn test_anchor_next_control() {
        let html = r#"<a rel="next" href="?search=welder&page=3">Next</a>"#;
        assert_eq!(
            next(html, BASE).unwrap(),
            "https://jobs.example.com/jobs-search?search=welder&page=3"
        );

        let html = r#"<a aria-label="Next" href="?search=welder&page=3">&raquo;</a>"#;
        assert_eq!(
            next(html, BASE).unwrap(),
            "https://jobs.example.com/jobs-search?search=welder&page=3"
        );
    }

    #[test]
    fn test_numeric_pagination_picks_closest_greater() {
        let html = r#"
            <a href="?search=welder&page=1">1</a>
            <a href="?search=welder&page=7">7</a>
            <a href="?search=welder&page=4">4</a>
        "#;
        // current page is 2; 4 is the smallest greater page
        assert_eq!(
            next(html, BASE).unwrap(),
            "https://jobs.example.com/jobs-search?search=welder&page=4"
        );
    }

    #[test]
    fn test_synthesized_increment() {
        assert_eq!(
            next("<p>no pagination</p>", BASE).unwrap(),
            "https://jobs.example.com/jobs-search?search=welder&page=3"
        );
    }

    #[test]
    fn test_synthesized_sets_two_when_absent() {
        assert_eq!(
            next("<p></p>", "https://jobs.example.com/jobs-search?search=welder").unwrap(),
            "https://jobs.example.com/jobs-search?search=welder&page=2"
        );
    }

    #[test]
    fn test_synthesized_keeps_parameter_name() {
        assert_eq!(
            next("<p></p>", "https://jobs.example.com/l/search?p=5").unwrap(),
            "https://jobs.example.com/l/search?p=6"
        );
    }

    #[test]
    fn test_unparseable_base_is_none() {
        assert!(next("<p></p>", "not a url").is_none());
    }
}
