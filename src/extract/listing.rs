//! Listing-page card extraction.
//!
//! Listing markup on job boards is loosely structured; everything here works
//! from prioritized selector lists and regex fallbacks over a bounded text
//! window around each link, so a missing field degrades to `None`.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::select_text_in;
use super::text::{clean, find_posted, find_salary, parse_posted, parse_salary};
use crate::models::JobCard;

/// Anchor shapes that look like job links, in priority order.
const JOB_LINK_SELECTORS: &[&str] = &[
    "a.job_link",
    "a.job-link",
    "a[class*='job_link']",
    "a[href*='/c/'][href*='/Job/']",
    "a[href*='/job/']",
    "a[href*='/jobs/'][href*='jid=']",
];

/// Path markers a resolved job URL must contain to be kept.
const JOB_PATH_MARKERS: &[&str] = &["/c/", "/job/", "/jobs/"];

/// Heading elements used when an anchor has no text of its own.
const TITLE_FALLBACK_SELECTORS: &[&str] = &["h1", "h2", "h3", "h4"];

/// Card-scoped sub-selectors per field.
const COMPANY_SELECTORS: &[&str] = &[
    "[class*='company_name']",
    "[class*='company-name']",
    "[class*='companyName']",
    "[class*='hiring_company']",
    "[class*='company']",
];
const LOCATION_SELECTORS: &[&str] = &[
    "[class*='job_location']",
    "[class*='job-location']",
    "[class*='location']",
];
const EMPLOYMENT_SELECTORS: &[&str] = &[
    "[class*='employment_type']",
    "[class*='employment-type']",
    "[class*='jobType']",
    "[class*='job-type']",
];

/// Elements treated as the card boundary when walking up from an anchor.
const CARD_CONTAINERS: &[&str] = &["article", "li", "section", "div"];

/// How much card text to scan for regex fallbacks.
const CARD_TEXT_WINDOW: usize = 800;

/// "City, ST" shaped substring for the location fallback. City names are a
/// short run of capitalized words so surrounding prose doesn't get swallowed.
const CITY_STATE_PATTERN: &str = r"\b([A-Z][a-zA-Z.'\-]*(?:\s[A-Z][a-zA-Z.'\-]*){0,2},\s*[A-Z]{2})\b";

/// Extract job cards from a listing page, in document order, deduplicated by
/// URL within the page (first occurrence wins).
pub fn parse_listing(document: &Html, base_url: &str) -> Vec<JobCard> {
    let mut cards = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for selector_str in JOB_LINK_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for anchor in document.select(&selector) {
            let card = match card_from_anchor(anchor, base_url) {
                Some(card) => card,
                None => continue,
            };
            if seen.insert(card.url.clone()) {
                cards.push(card);
            }
        }
    }

    cards
}

fn card_from_anchor(anchor: ElementRef, base_url: &str) -> Option<JobCard> {
    let href = anchor.value().attr("href")?;
    let url = resolve_job_url(base_url, href)?;

    let mut card = JobCard {
        url,
        title: anchor_title(anchor),
        ..Default::default()
    };

    let container = card_container(anchor);
    if let Some(container) = container {
        card.company = select_text_in(container, COMPANY_SELECTORS);
        card.location = select_text_in(container, LOCATION_SELECTORS);
        card.employment_type = select_text_in(container, EMPLOYMENT_SELECTORS);

        let buffer = card_text_window(container);
        if card.location.is_none() {
            card.location = city_state_in(&buffer);
        }
        if let Some(posted) = find_posted(&buffer) {
            card.posted = parse_posted(&posted);
            card.posted_text = Some(posted);
        }
        if let Some(salary) = find_salary(&buffer) {
            card.salary = parse_salary(&salary);
        }
    }

    Some(card)
}

/// Resolve an href against the page URL and keep it only when the resulting
/// path still looks like a job page. A failed join drops the candidate.
fn resolve_job_url(base_url: &str, href: &str) -> Option<String> {
    let resolved = Url::parse(base_url).ok()?.join(href).ok()?;
    let path = resolved.path();
    if JOB_PATH_MARKERS.iter().any(|marker| path.contains(marker)) {
        Some(resolved.to_string())
    } else {
        None
    }
}

/// Title from the anchor's own text, falling back to a nested heading.
fn anchor_title(anchor: ElementRef) -> Option<String> {
    let own = clean(&anchor.text().collect::<String>());
    if !own.is_empty() {
        return Some(own);
    }
    select_text_in(anchor, TITLE_FALLBACK_SELECTORS)
}

/// Nearest enclosing card-shaped container.
fn card_container(anchor: ElementRef) -> Option<ElementRef> {
    for node in anchor.ancestors() {
        let element = match ElementRef::wrap(node) {
            Some(element) => element,
            None => continue,
        };
        if CARD_CONTAINERS.contains(&element.value().name()) {
            return Some(element);
        }
    }
    None
}

/// Bounded, cleaned text window of the card, for regex scans.
fn card_text_window(container: ElementRef) -> String {
    let text = clean(&container.text().collect::<String>());
    text.chars().take(CARD_TEXT_WINDOW).collect()
}

fn city_state_in(buffer: &str) -> Option<String> {
    Regex::new(CITY_STATE_PATTERN)
        .ok()?
        .captures(buffer)
        .map(|caps| clean(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
    <html><body>
      <ul>
        <li>
          <article>
            <a class="job_link" href="/c/Acme-Corp/Job/Welder/-in-Duluth,MN?jid=111">
              Welder II
            </a>
            <span class="company_name">Acme Corp</span>
            <span class="job_location">Duluth, MN</span>
            <span class="employment_type">Full-time</span>
            <p>$25 - $32 / hr &middot; 2 days ago</p>
          </article>
        </li>
        <li>
          <article>
            <a class="job_link" href="/c/Borealis/Job/Machinist/?jid=222"><h2>Machinist</h2></a>
            <p>Borealis staffing is hiring in Hibbing, MN. Posted 1 week ago.</p>
          </article>
        </li>
        <li>
          <a class="job_link" href="/c/Acme-Corp/Job/Welder/-in-Duluth,MN?jid=111">Welder II (repeat)</a>
        </li>
        <li>
          <a class="job_link" href="/about/team">Not a job</a>
        </li>
      </ul>
    </body></html>
    "#;

    fn cards() -> Vec<JobCard> {
        let document = Html::parse_document(LISTING);
        parse_listing(&document, "https://jobs.example.com/jobs-search?search=welder")
    }

    #[test]
    fn test_extracts_cards_in_order_with_page_dedup() {
        let cards = cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title.as_deref(), Some("Welder II"));
        assert_eq!(cards[1].title.as_deref(), Some("Machinist"));
    }

    #[test]
    fn test_resolves_absolute_urls() {
        let cards = cards();
        assert_eq!(
            cards[0].url,
            "https://jobs.example.com/c/Acme-Corp/Job/Welder/-in-Duluth,MN?jid=111"
        );
    }

    #[test]
    fn test_drops_links_outside_job_paths() {
        let cards = cards();
        assert!(cards.iter().all(|c| !c.url.contains("/about/")));
    }

    #[test]
    fn test_card_scoped_fields() {
        let card = &cards()[0];
        assert_eq!(card.company.as_deref(), Some("Acme Corp"));
        assert_eq!(card.location.as_deref(), Some("Duluth, MN"));
        assert_eq!(card.employment_type.as_deref(), Some("Full-time"));

        let salary = card.salary.as_ref().unwrap();
        assert_eq!(salary.min, Some(25.0));
        assert_eq!(salary.max, Some(32.0));
        assert_eq!(salary.period.as_deref(), Some("hr"));

        assert_eq!(card.posted_text.as_deref(), Some("2 days ago"));
        let posted = card.posted.as_ref().unwrap();
        assert_eq!(posted.relative.as_deref(), Some("2 days ago"));
    }

    #[test]
    fn test_title_from_nested_heading_and_location_fallback() {
        let card = &cards()[1];
        assert_eq!(card.title.as_deref(), Some("Machinist"));
        // no location sub-element: falls back to the City, ST regex
        assert_eq!(card.location.as_deref(), Some("Hibbing, MN"));
        assert_eq!(card.posted_text.as_deref(), Some("1 week ago"));
    }

    #[test]
    fn test_unresolvable_base_yields_nothing() {
        let document = Html::parse_document(LISTING);
        assert!(parse_listing(&document, "not a url").is_empty());
    }
}
