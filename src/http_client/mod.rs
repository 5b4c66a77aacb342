//! Session-scoped HTTP fetching for crawl tasks.
//!
//! Each worker owns a [`Session`]: a resolved user agent plus a reqwest
//! client holding its own cookie jar, so a sequence of fetches presents one
//! consistent fingerprint. Fetching goes through the [`PageFetcher`] trait so
//! tests can script responses without a network.

mod user_agent;

pub use user_agent::{random_user_agent, resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;
use crate::models::CrawlTask;

/// A fetched page: the delivered HTML plus the final post-redirect URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// Per-worker request identity. Mutated (rotated) only by the worker holding
/// it; never shared across workers.
#[derive(Debug, Clone)]
pub struct Session {
    user_agent: String,
    client: Client,
}

impl Session {
    /// Build a session with a fresh cookie jar.
    ///
    /// `user_agent` follows the config contract: `None` for the default,
    /// `"impersonate"` for a random real browser, anything else verbatim.
    pub fn new(
        user_agent: Option<&str>,
        timeout: Duration,
        proxy_url: Option<&str>,
    ) -> Result<Self, FetchError> {
        let user_agent = resolve_user_agent(user_agent);

        let mut builder = Client::builder()
            .user_agent(user_agent.as_str())
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true);

        if let Some(proxy) = proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            user_agent,
            client: builder.build()?,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Headers for one request, computed from the task and session alone so the
/// stage stays a pure function.
pub fn request_headers(task: &CrawlTask, session: &Session) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "Accept".to_string(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
    );
    headers.insert("Accept-Language".to_string(), "en-US,en;q=0.9".to_string());
    headers.insert("User-Agent".to_string(), session.user_agent.clone());
    if let Some(referer) = &task.referer {
        headers.insert("Referer".to_string(), referer.clone());
    }
    headers
}

/// Fetch collaborator: given a task and session, produce the page body and
/// the final URL, or fail with a retryable error.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, task: &CrawlTask, session: &Session) -> Result<FetchedPage, FetchError>;
}

/// Production fetcher over the session's reqwest client.
pub struct HttpFetcher;

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, task: &CrawlTask, session: &Session) -> Result<FetchedPage, FetchError> {
        let mut request = session.client.get(&task.url);
        for (name, value) in request_headers(task, session) {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrawlTask, JobCard};

    fn session() -> Session {
        Session::new(Some("TestAgent/1.0"), Duration::from_secs(5), None).unwrap()
    }

    #[test]
    fn test_session_resolves_user_agent() {
        assert_eq!(session().user_agent(), "TestAgent/1.0");
    }

    #[test]
    fn test_request_headers_for_list_task() {
        let task = CrawlTask::list("https://jobs.example.com/jobs-search");
        let headers = request_headers(&task, &session());
        assert_eq!(headers.get("User-Agent").unwrap(), "TestAgent/1.0");
        assert!(headers.contains_key("Accept"));
        assert!(!headers.contains_key("Referer"));
    }

    #[test]
    fn test_request_headers_detail_carries_referer() {
        let card = JobCard {
            url: "https://jobs.example.com/job/1".to_string(),
            ..Default::default()
        };
        let task = CrawlTask::detail(card, "https://jobs.example.com/jobs-search?page=1");
        let headers = request_headers(&task, &session());
        assert_eq!(
            headers.get("Referer").unwrap(),
            "https://jobs.example.com/jobs-search?page=1"
        );
    }

    #[test]
    fn test_invalid_proxy_is_an_error() {
        let result = Session::new(None, Duration::from_secs(5), Some("::not a proxy::"));
        assert!(result.is_err());
    }
}
