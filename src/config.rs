//! Crawl run configuration.
//!
//! Options come from an optional TOML file with CLI flags layered on top;
//! every field has a serde default so a partial file or bare flags both work.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;

/// Search URL used when no explicit start URL is configured. `{keyword}` and
/// `{location}` are replaced with the URL-encoded config values.
const DEFAULT_SEARCH_URL_TEMPLATE: &str =
    "https://www.ziprecruiter.com/jobs-search?search={keyword}&location={location}";

/// Options controlling one crawl run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Explicit listing URL seeding the frontier. When absent, one is
    /// synthesized from `keyword`/`location`.
    #[serde(default)]
    pub start_url: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Stop producing records once this many have been emitted.
    #[serde(default = "default_results_wanted")]
    pub results_wanted: usize,
    /// Fetch each card's detail page instead of emitting cards directly.
    #[serde(default)]
    pub collect_details: bool,
    /// Worker pool bound.
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
    /// Retries per task after the first attempt.
    #[serde(default = "default_retries")]
    pub max_request_retries: u32,
    /// Per-fetch timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Proxy URL handed opaquely to the HTTP client.
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Politeness delay after each fetch, per worker.
    #[serde(default)]
    pub download_interval_ms: u64,
    /// Ceiling on distinct listing pages followed in one run. Guards the
    /// synthesized-pagination fallback against sites that answer every page
    /// number with content.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// User agent: `None` for the default, `"impersonate"` for a random real
    /// browser, anything else verbatim.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Provenance tag on emitted records; defaults to the start URL's host.
    #[serde(default)]
    pub source: Option<String>,
    /// Override for the synthesized search URL shape.
    #[serde(default)]
    pub search_url_template: Option<String>,
}

fn default_results_wanted() -> usize {
    20
}

fn default_concurrency() -> usize {
    4
}

fn default_retries() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_pages() -> usize {
    50
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: None,
            keyword: None,
            location: None,
            results_wanted: default_results_wanted(),
            collect_details: false,
            max_concurrency: default_concurrency(),
            max_request_retries: default_retries(),
            request_timeout_secs: default_timeout_secs(),
            proxy_url: None,
            download_interval_ms: 0,
            max_pages: default_max_pages(),
            user_agent: None,
            source: None,
            search_url_template: None,
        }
    }
}

impl CrawlConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// The listing URL this run starts from: the configured one, validated,
    /// or one synthesized from keyword/location.
    pub fn resolve_start_url(&self) -> Result<String, FetchError> {
        if let Some(start_url) = &self.start_url {
            Url::parse(start_url)?;
            return Ok(start_url.clone());
        }

        let template = self
            .search_url_template
            .as_deref()
            .unwrap_or(DEFAULT_SEARCH_URL_TEMPLATE);
        let url = template
            .replace(
                "{keyword}",
                &urlencoding::encode(self.keyword.as_deref().unwrap_or("")),
            )
            .replace(
                "{location}",
                &urlencoding::encode(self.location.as_deref().unwrap_or("")),
            );
        Url::parse(&url)?;
        Ok(url)
    }

    /// Provenance tag for emitted records.
    pub fn source_tag(&self, search_url: &str) -> String {
        self.source
            .clone()
            .or_else(|| {
                Url::parse(search_url)
                    .ok()
                    .and_then(|u| u.host_str().map(String::from))
            })
            .unwrap_or_else(|| "jobharvest".to_string())
    }
}
