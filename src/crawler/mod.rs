//! Crawl controller: frontier management, worker pool, role dispatch,
//! retries, and the stopping condition.
//!
//! A bounded pool of workers pulls tasks from a shared [`Frontier`]. LIST
//! tasks produce cards and at most one follow-up LIST task; DETAIL tasks
//! produce one merged record. The run ends when the frontier drains or the
//! produced-count target is met and in-flight tasks have completed.

mod frontier;
mod ledger;
mod sink;

pub use frontier::Frontier;
pub use ledger::RecordLedger;
pub use sink::{JsonlSink, MemorySink, RecordSink};

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use scraper::Html;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::error::FetchError;
use crate::extract::{detail, listing, pagination};
use crate::http_client::{FetchedPage, PageFetcher, Session};
use crate::models::{CrawlTask, ErrorRecord, JobCard, JobRecord, TaskRole};

/// Totals reported after a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlStats {
    /// Job records emitted to the sink.
    pub produced: usize,
    /// Tasks that exhausted their retries.
    pub failed: usize,
    /// Distinct listing pages enqueued (including the seed).
    pub listing_pages: usize,
}

/// One crawl run over a job-listing site.
pub struct Crawler {
    inner: Arc<CrawlerInner>,
}

struct CrawlerInner {
    config: CrawlConfig,
    search_url: String,
    source: String,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn RecordSink>,
    frontier: Frontier,
    ledger: Arc<RecordLedger>,
    visited_listings: Mutex<HashSet<String>>,
    failures: AtomicUsize,
}

impl Crawler {
    /// Build a crawler. Fails when no valid start URL can be resolved or the
    /// HTTP client configuration is unusable.
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn PageFetcher>,
        sink: Arc<dyn RecordSink>,
    ) -> Result<Self, FetchError> {
        let search_url = config.resolve_start_url()?;
        let source = config.source_tag(&search_url);
        let ledger = Arc::new(RecordLedger::new(config.results_wanted));

        // surface an invalid proxy or client config before spawning workers
        Session::new(
            config.user_agent.as_deref(),
            Duration::from_secs(config.request_timeout_secs),
            config.proxy_url.as_deref(),
        )?;

        Ok(Self {
            inner: Arc::new(CrawlerInner {
                config,
                search_url,
                source,
                fetcher,
                sink,
                frontier: Frontier::new(),
                ledger,
                visited_listings: Mutex::new(HashSet::new()),
                failures: AtomicUsize::new(0),
            }),
        })
    }

    /// The shared produced-count ledger, for live progress reporting.
    pub fn ledger(&self) -> Arc<RecordLedger> {
        Arc::clone(&self.inner.ledger)
    }

    /// The listing URL this run starts from.
    pub fn search_url(&self) -> &str {
        &self.inner.search_url
    }

    /// Run the crawl to completion and report totals.
    pub async fn run(&self) -> CrawlStats {
        let seed = CrawlTask::list(self.inner.search_url.clone());
        self.inner
            .visited_listings
            .lock()
            .await
            .insert(seed.url.clone());
        self.inner.frontier.push(seed).await;

        let workers = self.inner.config.max_concurrency.max(1);
        info!(
            "starting crawl of {} with {} workers, target {} records",
            self.inner.search_url,
            workers,
            self.inner.ledger.target()
        );

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let inner = Arc::clone(&self.inner);
            handles.push(tokio::spawn(async move {
                inner.worker_loop(worker_id).await;
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }

        let stats = CrawlStats {
            produced: self.inner.ledger.produced().await,
            failed: self.inner.failures.load(Ordering::Relaxed),
            listing_pages: self.inner.visited_listings.lock().await.len(),
        };
        info!(
            "crawl finished: {} records, {} failures, {} listing pages",
            stats.produced, stats.failed, stats.listing_pages
        );
        stats
    }
}

impl CrawlerInner {
    async fn worker_loop(&self, worker_id: usize) {
        let mut session = match self.new_session() {
            Ok(session) => session,
            Err(e) => {
                warn!("worker {} could not build a session: {}", worker_id, e);
                return;
            }
        };

        while let Some(task) = self.frontier.next().await {
            self.process(task, &mut session, worker_id).await;
            self.frontier.task_done().await;
        }
        debug!("worker {} drained", worker_id);
    }

    fn new_session(&self) -> Result<Session, FetchError> {
        Session::new(
            self.config.user_agent.as_deref(),
            Duration::from_secs(self.config.request_timeout_secs),
            self.config.proxy_url.as_deref(),
        )
    }

    async fn process(&self, task: CrawlTask, session: &mut Session, worker_id: usize) {
        // once the target is met no queued task can add anything; only tasks
        // already past their fetch are allowed to finish
        if self.ledger.target_reached().await {
            debug!("target reached, discarding {}", task.url);
            return;
        }

        debug!(
            "worker {}: {} {} (attempt {})",
            worker_id,
            task.role.as_str(),
            task.url,
            task.attempt
        );

        let fetched = self.fetcher.fetch(&task, session).await;
        if self.config.download_interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.download_interval_ms)).await;
        }

        match fetched {
            Ok(page) => match task.role {
                TaskRole::List => self.handle_listing(&task, page).await,
                TaskRole::Detail => self.handle_detail(&task, page).await,
            },
            Err(error) => self.handle_failure(task, session, error).await,
        }
    }

    async fn handle_listing(&self, task: &CrawlTask, page: FetchedPage) {
        // Html is not Send; parse and extract before the first await
        let (cards, next_url) = {
            let document = Html::parse_document(&page.body);
            let cards = listing::parse_listing(&document, &page.final_url);
            let next_url = pagination::find_next_page(&document, &page.final_url);
            (cards, next_url)
        };
        info!("{}: {} cards", task.url, cards.len());

        let card_count = cards.len();
        for card in cards {
            if self.ledger.target_reached().await {
                debug!("target reached, skipping remaining cards on {}", task.url);
                break;
            }
            if self.config.collect_details {
                self.frontier
                    .push(CrawlTask::detail(card, task.url.clone()))
                    .await;
            } else {
                self.emit_card(card).await;
            }
        }

        if self.ledger.target_reached().await {
            return;
        }
        // a cardless listing page means we ran off the end of the results;
        // following a synthesized next link from here would never terminate
        if card_count == 0 {
            debug!("{} had no cards, stopping this branch", task.url);
            return;
        }

        let next_url = match next_url {
            Some(next_url) => next_url,
            None => return,
        };
        if next_url == page.final_url || next_url == task.url {
            debug!("pagination settled on the current page, stopping this branch");
            return;
        }

        {
            let mut visited = self.visited_listings.lock().await;
            if visited.len() >= self.config.max_pages {
                warn!(
                    "listing page ceiling ({}) reached, not following {}",
                    self.config.max_pages, next_url
                );
                return;
            }
            if !visited.insert(next_url.clone()) {
                debug!("already visited {}, stopping this branch", next_url);
                return;
            }
        }
        self.frontier.push(CrawlTask::list(next_url)).await;
    }

    async fn handle_detail(&self, task: &CrawlTask, page: FetchedPage) {
        let detail = {
            let document = Html::parse_document(&page.body);
            detail::parse_detail(&document, &page.final_url)
        };

        let card = task.card.clone().unwrap_or_else(|| JobCard {
            url: task.url.clone(),
            ..Default::default()
        });

        if !self.ledger.try_claim(&card.url).await {
            debug!("duplicate job {}, discarding", card.url);
            return;
        }
        let record = JobRecord::merged(card, detail, &self.source, &self.search_url);
        self.sink.push(record).await;
    }

    async fn emit_card(&self, card: JobCard) {
        if !self.ledger.try_claim(&card.url).await {
            debug!("duplicate job {}, discarding", card.url);
            return;
        }
        let record = JobRecord::from_card(card, &self.source, &self.search_url);
        self.sink.push(record).await;
    }

    async fn handle_failure(&self, task: CrawlTask, session: &mut Session, error: FetchError) {
        warn!(
            "{} {} failed on attempt {}: {}",
            task.role.as_str(),
            task.url,
            task.attempt + 1,
            error
        );

        if task.attempt < self.config.max_request_retries {
            // fresh cookie jar and user agent before the next attempt
            match self.new_session() {
                Ok(fresh) => *session = fresh,
                Err(e) => warn!("session rotation failed, keeping current session: {}", e),
            }
            self.frontier.push(task.retried()).await;
            return;
        }

        self.failures.fetch_add(1, Ordering::Relaxed);
        self.sink
            .push_error(ErrorRecord::new(&task.url, task.role, error.to_string()))
            .await;
    }
}
