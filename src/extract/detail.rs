//! Detail-page extraction with structured-data fallback.
//!
//! DOM extraction runs first; the embedded JobPosting block then fills only
//! the fields the DOM left empty. A non-empty DOM value is never overwritten.

use scraper::Html;

use super::text::clean;
use super::{first_match, select_text, structured};
use crate::models::JobDetail;

/// Semantic markup attributes are preferred over class-name heuristics.
const TITLE_SELECTORS: &[&str] = &[
    "[itemprop='title']",
    "h1[class*='job_title']",
    "h1[class*='title']",
    "[class*='job_title']",
    "h1",
];
const COMPANY_SELECTORS: &[&str] = &[
    "[itemprop='hiringOrganization']",
    "[class*='hiring_company']",
    "[class*='company_name']",
    "[class*='company-name']",
    "[class*='companyName']",
];
const LOCATION_SELECTORS: &[&str] = &[
    "[itemprop='jobLocation']",
    "[class*='job_location']",
    "[class*='job-location']",
    "[class*='location']",
];
const DESCRIPTION_SELECTORS: &[&str] = &[
    "[itemprop='description']",
    "[class*='job_description']",
    "[class*='jobDescription']",
    "#job-description",
    "[class*='description']",
    "article",
    "main",
];
const POSTED_SELECTORS: &[&str] = &["[class*='posted']", "time"];
const EMPLOYMENT_SELECTORS: &[&str] = &[
    "[itemprop='employmentType']",
    "[class*='employment_type']",
    "[class*='employment-type']",
    "[class*='jobType']",
    "[class*='job-type']",
];

/// Extract a full job record from a detail page. `page_url` is the final
/// post-redirect URL the page was fetched from.
pub fn parse_detail(document: &Html, page_url: &str) -> JobDetail {
    let mut detail = JobDetail {
        detail_url: page_url.to_string(),
        ..Default::default()
    };

    detail.title = select_text(document, TITLE_SELECTORS);
    detail.company = select_text(document, COMPANY_SELECTORS);
    detail.location = select_text(document, LOCATION_SELECTORS);
    detail.posted_text = select_text(document, POSTED_SELECTORS);
    detail.employment_type = select_text(document, EMPLOYMENT_SELECTORS);

    if let Some(container) = first_match(document, DESCRIPTION_SELECTORS) {
        let text = clean(&container.text().collect::<String>());
        if !text.is_empty() {
            detail.description_html = Some(container.html());
            detail.description_text = Some(text);
        }
    }

    if let Some(posting) = structured::find_job_posting(document) {
        detail.title = detail.title.or_else(|| structured::text_field(&posting, "title"));
        detail.company = detail.company.or_else(|| structured::hiring_organization(&posting));
        detail.location = detail.location.or_else(|| structured::job_location(&posting));
        detail.employment_type = detail
            .employment_type
            .or_else(|| structured::employment_type(&posting));
        if detail.description_text.is_none() {
            if let Some(description) = structured::text_field(&posting, "description") {
                // structured descriptions are frequently HTML themselves
                let fragment = Html::parse_fragment(&description);
                let text = clean(&fragment.root_element().text().collect::<String>());
                if !text.is_empty() {
                    detail.description_text = Some(text);
                    detail.description_html = Some(description);
                }
            }
        }
        // these have no DOM equivalent
        detail.date_posted = structured::text_field(&posting, "datePosted");
        detail.valid_through = structured::text_field(&posting, "validThrough");
        detail.base_salary = posting.get("baseSalary").filter(|v| !v.is_null()).cloned();
        detail.structured = Some(posting);
    }

    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"
    <html><head>
      <script type="application/ld+json">{
        "@type": "JobPosting",
        "title": "Structured Title",
        "hiringOrganization": {"name": "Structured Co"},
        "employmentType": "FULL_TIME",
        "datePosted": "2024-11-02",
        "validThrough": "2024-12-02",
        "baseSalary": {"@type": "MonetaryAmount", "currency": "USD"},
        "jobLocation": {"address": {"addressLocality": "Duluth", "addressRegion": "MN"}}
      }</script>
    </head><body>
      <h1 class="job_title">Welder II</h1>
      <div class="hiring_company">Acme Corp</div>
      <div class="job_description"><p>Join our fabrication team.</p></div>
    </body></html>
    "#;

    fn detail() -> JobDetail {
        let document = Html::parse_document(DETAIL);
        parse_detail(&document, "https://jobs.example.com/c/Acme-Corp/Job/Welder/?jid=111")
    }

    #[test]
    fn test_dom_fields_win_over_structured() {
        let detail = detail();
        assert_eq!(detail.title.as_deref(), Some("Welder II"));
        assert_eq!(detail.company.as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn test_structured_fills_missing_fields() {
        let detail = detail();
        // no DOM location or employment type in the fixture
        assert_eq!(detail.location.as_deref(), Some("Duluth, MN"));
        assert_eq!(detail.employment_type.as_deref(), Some("FULL_TIME"));
        assert_eq!(detail.date_posted.as_deref(), Some("2024-11-02"));
        assert_eq!(detail.valid_through.as_deref(), Some("2024-12-02"));
        assert!(detail.base_salary.is_some());
        assert!(detail.structured.is_some());
    }

    #[test]
    fn test_description_html_and_text() {
        let detail = detail();
        assert_eq!(
            detail.description_text.as_deref(),
            Some("Join our fabrication team.")
        );
        assert!(detail
            .description_html
            .as_deref()
            .unwrap()
            .contains("<p>Join our fabrication team.</p>"));
    }

    #[test]
    fn test_detail_url_is_kept() {
        assert_eq!(
            detail().detail_url,
            "https://jobs.example.com/c/Acme-Corp/Job/Welder/?jid=111"
        );
    }

    #[test]
    fn test_bare_page_degrades_to_nulls() {
        let document = Html::parse_document("<html><body><p>gone</p></body></html>");
        let detail = parse_detail(&document, "https://jobs.example.com/job/1");
        assert!(detail.title.is_none());
        assert!(detail.company.is_none());
        assert!(detail.structured.is_none());
    }
}
