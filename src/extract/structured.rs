//! Embedded JSON-LD extraction for JobPosting metadata.
//!
//! Structured blocks are an enrichment source only: they fill fields the DOM
//! did not provide and never override an explicitly-scraped value.

use scraper::{Html, Selector};
use serde_json::Value;

/// Find the first JobPosting object embedded in the document's
/// `application/ld+json` script blocks. Malformed blocks are skipped.
pub fn find_job_posting(document: &Html) -> Option<Value> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    for script in document.select(&selector) {
        let text: String = script.text().collect();
        let parsed: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => continue,
        };
        if let Some(posting) = job_posting_in(&parsed) {
            return Some(posting.clone());
        }
    }
    None
}

fn job_posting_in(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(obj) => {
            if obj.get("@type").and_then(Value::as_str) == Some("JobPosting") {
                return Some(value);
            }
            // JSON-LD commonly nests entities under @graph
            obj.get("@graph").and_then(job_posting_in)
        }
        Value::Array(items) => items.iter().find_map(job_posting_in),
        _ => None,
    }
}

/// Non-empty string field of the posting.
pub fn text_field(posting: &Value, key: &str) -> Option<String> {
    posting
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Company name from `hiringOrganization.name`.
pub fn hiring_organization(posting: &Value) -> Option<String> {
    posting
        .get("hiringOrganization")
        .and_then(|org| org.get("name"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Location synthesized from `jobLocation` address components.
/// `jobLocation` may be one place or an array of places; the first is used.
pub fn job_location(posting: &Value) -> Option<String> {
    let location = posting.get("jobLocation")?;
    let location = match location.as_array() {
        Some(items) => items.first()?,
        None => location,
    };
    let address = location.get("address")?;

    let parts: Vec<&str> = ["addressLocality", "addressRegion", "addressCountry"]
        .iter()
        .filter_map(|key| address.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// `employmentType` may be a string or an array of strings.
pub fn employment_type(posting: &Value) -> Option<String> {
    match posting.get("employmentType")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(String::from),
        _ => None,
    }
}
