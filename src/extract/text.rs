//! Text cleanup and salary/date normalization.

use regex::Regex;

use crate::models::{PostedInfo, SalaryInfo};

/// Salary range like "$162K - $215K / yr". Tolerates missing dollar signs,
/// thousands separators, K/M suffixes, and a trailing period word.
const SALARY_PATTERN: &str =
    r"(?i)\$?\s*(\d[\d,]*(?:\.\d+)?)\s*([KM])?\s*-\s*\$?\s*(\d[\d,]*(?:\.\d+)?)\s*([KM])?(?:\s*/\s*(yr|hr|year|hour|annually|monthly))?";

/// Relative dates like "8 days ago".
const POSTED_PATTERN: &str = r"(?i)(\d+)\s+(minutes?|hours?|days?|weeks?|months?)\s+ago";

/// Collapse internal whitespace runs to single spaces and trim.
/// Idempotent: cleaning already-clean text returns it unchanged.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse salary text. Returns `None` for empty input, a raw-only
/// [`SalaryInfo`] when nothing numeric matched, and a full range otherwise.
pub fn parse_salary(text: &str) -> Option<SalaryInfo> {
    let raw = clean(text);
    if raw.is_empty() {
        return None;
    }

    let re = match Regex::new(SALARY_PATTERN) {
        Ok(re) => re,
        Err(_) => return Some(SalaryInfo::raw_only(raw)),
    };
    let caps = match re.captures(&raw) {
        Some(caps) => caps,
        None => return Some(SalaryInfo::raw_only(raw)),
    };

    let min = amount(caps.get(1), caps.get(2));
    let max = amount(caps.get(3), caps.get(4));
    let period = caps.get(5).map(|m| m.as_str().to_lowercase());

    Some(SalaryInfo {
        raw,
        min,
        max,
        period,
    })
}

fn amount(number: Option<regex::Match>, suffix: Option<regex::Match>) -> Option<f64> {
    let digits = number?.as_str().replace(',', "");
    let value: f64 = digits.parse().ok()?;
    let multiplier = match suffix.map(|m| m.as_str().to_ascii_uppercase()) {
        Some(s) if s == "K" => 1_000.0,
        Some(s) if s == "M" => 1_000_000.0,
        _ => 1.0,
    };
    Some(value * multiplier)
}

/// Parse posting-date text. Returns `None` for empty input; `relative` is set
/// only when a "<N> <unit> ago" phrase was found.
pub fn parse_posted(text: &str) -> Option<PostedInfo> {
    let raw = clean(text);
    if raw.is_empty() {
        return None;
    }

    let relative = Regex::new(POSTED_PATTERN)
        .ok()
        .and_then(|re| re.captures(&raw).map(|c| format!("{} {} ago", &c[1], c[2].to_lowercase())));

    Some(PostedInfo { raw, relative })
}

/// Find a salary-shaped substring inside a larger text buffer.
pub fn find_salary(buffer: &str) -> Option<String> {
    Regex::new(SALARY_PATTERN)
        .ok()?
        .find(buffer)
        .map(|m| clean(m.as_str()))
}

/// Find a "<N> <unit> ago" phrase inside a larger text buffer.
pub fn find_posted(buffer: &str) -> Option<String> {
    Regex::new(POSTED_PATTERN)
        .ok()?
        .find(buffer)
        .map(|m| clean(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean("  Senior\n\tEngineer   II "), "Senior Engineer II");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean("  a   b\nc ");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_parse_salary_range_with_period() {
        let salary = parse_salary("$162K - $215K / yr").unwrap();
        assert_eq!(salary.raw, "$162K - $215K / yr");
        assert_eq!(salary.min, Some(162_000.0));
        assert_eq!(salary.max, Some(215_000.0));
        assert_eq!(salary.period.as_deref(), Some("yr"));
    }

    #[test]
    fn test_parse_salary_millions_and_plain() {
        let salary = parse_salary("1M - 1.5M").unwrap();
        assert_eq!(salary.min, Some(1_000_000.0));
        assert_eq!(salary.max, Some(1_500_000.0));
        assert!(salary.period.is_none());

        let salary = parse_salary("$55,000 - $70,000 / year").unwrap();
        assert_eq!(salary.min, Some(55_000.0));
        assert_eq!(salary.max, Some(70_000.0));
        assert_eq!(salary.period.as_deref(), Some("year"));
    }

    #[test]
    fn test_parse_salary_no_numeric_match_keeps_raw() {
        let salary = parse_salary("Competitive pay").unwrap();
        assert_eq!(salary.raw, "Competitive pay");
        assert!(salary.min.is_none());
        assert!(salary.max.is_none());
        assert!(salary.period.is_none());
    }

    #[test]
    fn test_parse_salary_empty_is_none() {
        assert!(parse_salary("").is_none());
        assert!(parse_salary("   ").is_none());
    }

    #[test]
    fn test_parse_posted_relative() {
        let posted = parse_posted("Posted 8 days ago").unwrap();
        assert_eq!(posted.raw, "Posted 8 days ago");
        assert_eq!(posted.relative.as_deref(), Some("8 days ago"));
    }

    #[test]
    fn test_parse_posted_no_match_keeps_raw() {
        let posted = parse_posted("Yesterday").unwrap();
        assert_eq!(posted.raw, "Yesterday");
        assert!(posted.relative.is_none());
    }

    #[test]
    fn test_parse_posted_empty_is_none() {
        assert!(parse_posted("").is_none());
    }

    #[test]
    fn test_find_posted_in_buffer() {
        let buffer = "Acme Corp Duluth, MN Full-time 3 hours ago Apply now";
        assert_eq!(find_posted(buffer).as_deref(), Some("3 hours ago"));
        assert!(find_posted("no dates here").is_none());
    }

    #[test]
    fn test_find_salary_in_buffer() {
        let buffer = "Acme Corp $80K - $95K / yr Duluth, MN";
        assert_eq!(find_salary(buffer).as_deref(), Some("$80K - $95K / yr"));
    }
}
