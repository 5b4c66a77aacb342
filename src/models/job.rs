//! Job record models shared by the listing and detail extraction paths.
//!
//! A `JobCard` is what a listing page knows about a job; a `JobDetail` is
//! what its own page adds. The sink only ever sees the merged `JobRecord`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Salary information parsed from free-form listing text.
///
/// `min`/`max`/`period` are present only when the text matched the numeric
/// range pattern; `raw` is always kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryInfo {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl SalaryInfo {
    /// Text that did not match the numeric pattern but is still worth keeping.
    pub fn raw_only(raw: String) -> Self {
        Self {
            raw,
            min: None,
            max: None,
            period: None,
        }
    }
}

/// Relative posting date parsed from text like "Posted 8 days ago".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedInfo {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
}

/// Lightweight record scraped from one card on a listing page.
///
/// `url` is the natural key; every other field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobCard {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted: Option<PostedInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<SalaryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
}

/// Full record scraped from a job detail page, including fields only the
/// embedded structured-data block can provide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_through: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<serde_json::Value>,
    /// The raw JobPosting block, when the page embedded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<serde_json::Value>,
    pub detail_url: String,
}

/// Final sink-bound record: card merged with detail plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted: Option<PostedInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<SalaryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_through: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
    pub search_url: String,
}

impl JobRecord {
    /// Build a record from a card alone (no-detail mode).
    pub fn from_card(card: JobCard, source: &str, search_url: &str) -> Self {
        Self {
            url: card.url,
            title: card.title,
            company: card.company,
            location: card.location,
            posted_text: card.posted_text,
            posted: card.posted,
            salary: card.salary,
            employment_type: card.employment_type,
            description_html: None,
            description_text: None,
            date_posted: None,
            valid_through: None,
            base_salary: None,
            detail_url: None,
            source: source.to_string(),
            scraped_at: Utc::now(),
            search_url: search_url.to_string(),
        }
    }

    /// Merge a card with the detail scraped from its own page. Detail fields
    /// win whenever they are present.
    pub fn merged(card: JobCard, detail: JobDetail, source: &str, search_url: &str) -> Self {
        let mut record = Self::from_card(card, source, search_url);
        record.title = detail.title.or(record.title);
        record.company = detail.company.or(record.company);
        record.location = detail.location.or(record.location);
        record.posted_text = detail.posted_text.or(record.posted_text);
        record.employment_type = detail.employment_type.or(record.employment_type);
        record.description_html = detail.description_html;
        record.description_text = detail.description_text;
        record.date_posted = detail.date_posted;
        record.valid_through = detail.valid_through;
        record.base_salary = detail.base_salary;
        record.detail_url = Some(detail.detail_url);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> JobCard {
        JobCard {
            url: "https://example.com/job/1".to_string(),
            title: Some("Card Title".to_string()),
            company: Some("Card Co".to_string()),
            location: Some("Duluth, MN".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_card_carries_provenance() {
        let record = JobRecord::from_card(card(), "example.com", "https://example.com/jobs?page=1");
        assert_eq!(record.url, "https://example.com/job/1");
        assert_eq!(record.source, "example.com");
        assert_eq!(record.search_url, "https://example.com/jobs?page=1");
        assert!(record.detail_url.is_none());
    }

    #[test]
    fn test_merged_detail_fields_win() {
        let detail = JobDetail {
            title: Some("Detail Title".to_string()),
            description_text: Some("Long description".to_string()),
            detail_url: "https://example.com/job/1?final".to_string(),
            ..Default::default()
        };
        let record = JobRecord::merged(card(), detail, "example.com", "https://example.com/jobs");
        assert_eq!(record.title.as_deref(), Some("Detail Title"));
        // detail had no company, card value survives
        assert_eq!(record.company.as_deref(), Some("Card Co"));
        assert_eq!(record.description_text.as_deref(), Some("Long description"));
        assert_eq!(
            record.detail_url.as_deref(),
            Some("https://example.com/job/1?final")
        );
    }
}
