//! Crawl task and failure models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JobCard;

/// Role of a crawl task: listing pages yield cards and a next page, detail
/// pages yield one full record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskRole {
    List,
    Detail,
}

impl TaskRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

/// One unit of crawl work. Consumed exactly once per attempt and re-enqueued
/// with a bumped attempt count on retryable failure.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlTask {
    pub url: String,
    pub role: TaskRole,
    /// Card that spawned this task; present only for detail tasks.
    pub card: Option<JobCard>,
    /// Listing page this task was discovered on, sent as the Referer.
    pub referer: Option<String>,
    pub attempt: u32,
}

impl CrawlTask {
    pub fn list(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            role: TaskRole::List,
            card: None,
            referer: None,
            attempt: 0,
        }
    }

    pub fn detail(card: JobCard, referer: impl Into<String>) -> Self {
        Self {
            url: card.url.clone(),
            role: TaskRole::Detail,
            card: Some(card),
            referer: Some(referer.into()),
            attempt: 0,
        }
    }

    /// The same task, one attempt later.
    pub fn retried(mut self) -> Self {
        self.attempt += 1;
        self
    }
}

/// Emitted when a task exhausts its retries. Kept strictly out of the job
/// record stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub url: String,
    pub role: TaskRole,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(url: &str, role: TaskRole, message: String) -> Self {
        Self {
            url: url.to_string(),
            role,
            message,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retried_bumps_attempt() {
        let task = CrawlTask::list("https://example.com/jobs");
        assert_eq!(task.attempt, 0);
        let task = task.retried();
        assert_eq!(task.attempt, 1);
        assert_eq!(task.role, TaskRole::List);
    }

    #[test]
    fn test_detail_task_carries_card_and_referer() {
        let card = JobCard {
            url: "https://example.com/job/9".to_string(),
            ..Default::default()
        };
        let task = CrawlTask::detail(card, "https://example.com/jobs?page=1");
        assert_eq!(task.url, "https://example.com/job/9");
        assert_eq!(task.role, TaskRole::Detail);
        assert!(task.card.is_some());
        assert_eq!(
            task.referer.as_deref(),
            Some("https://example.com/jobs?page=1")
        );
    }
}
