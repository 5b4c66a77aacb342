//! HTML field extraction: listing cards, detail pages, pagination, and the
//! text normalization they share.
//!
//! Selector lists are data-driven and tried in priority order; a selector
//! that fails to parse or match is skipped, never an error.

pub mod detail;
pub mod listing;
pub mod pagination;
pub mod structured;
pub mod text;

use scraper::{ElementRef, Html, Selector};

use text::clean;

/// First element in the document matching any selector, in priority order.
pub(crate) fn first_match<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for selector_str in selectors {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(element) = document.select(&selector).next() {
            return Some(element);
        }
    }
    None
}

/// Cleaned text of the first non-empty match across the selector list.
pub(crate) fn select_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            let text = clean(&element.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Same as [`select_text`], scoped to one element's subtree.
pub(crate) fn select_text_in(scope: ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for element in scope.select(&selector) {
            let text = clean(&element.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}
