//! CLI commands implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::CrawlConfig;
use crate::crawler::{Crawler, JsonlSink};
use crate::http_client::HttpFetcher;

#[derive(Parser)]
#[command(name = "jobharvest")]
#[command(about = "Job-listing crawler that emits deduplicated, normalized job records")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a job-listing site and write records as JSONL
    Crawl {
        /// Explicit listing URL to seed the crawl
        #[arg(long)]
        start_url: Option<String>,
        /// Search keyword used when no start URL is given
        #[arg(short, long)]
        keyword: Option<String>,
        /// Search location used when no start URL is given
        #[arg(short, long)]
        location: Option<String>,
        /// Stop once this many records have been produced
        #[arg(short, long)]
        results: Option<usize>,
        /// Fetch each job's detail page instead of emitting cards directly
        #[arg(short, long)]
        details: bool,
        /// Number of crawl workers
        #[arg(short, long)]
        workers: Option<usize>,
        /// Retries per task after the first attempt
        #[arg(long)]
        retries: Option<u32>,
        /// Per-fetch timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Proxy URL handed to the HTTP client
        #[arg(long)]
        proxy: Option<String>,
        /// Politeness delay between fetches, per worker (milliseconds)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Ceiling on listing pages followed in one run
        #[arg(long)]
        max_pages: Option<usize>,
        /// Config file (TOML); flags override file values
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output JSONL file for job records
        #[arg(short, long, default_value = "jobs.jsonl")]
        output: PathBuf,
        /// Output JSONL file for failure records
        #[arg(long, default_value = "errors.jsonl")]
        error_output: PathBuf,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            start_url,
            keyword,
            location,
            results,
            details,
            workers,
            retries,
            timeout,
            proxy,
            delay_ms,
            max_pages,
            config,
            output,
            error_output,
        } => {
            let mut crawl_config = match config {
                Some(path) => CrawlConfig::from_toml_file(&path)?,
                None => CrawlConfig::default(),
            };

            if start_url.is_some() {
                crawl_config.start_url = start_url;
            }
            if keyword.is_some() {
                crawl_config.keyword = keyword;
            }
            if location.is_some() {
                crawl_config.location = location;
            }
            if let Some(results) = results {
                crawl_config.results_wanted = results;
            }
            if details {
                crawl_config.collect_details = true;
            }
            if let Some(workers) = workers {
                crawl_config.max_concurrency = workers;
            }
            if let Some(retries) = retries {
                crawl_config.max_request_retries = retries;
            }
            if let Some(timeout) = timeout {
                crawl_config.request_timeout_secs = timeout;
            }
            if proxy.is_some() {
                crawl_config.proxy_url = proxy;
            }
            if let Some(delay_ms) = delay_ms {
                crawl_config.download_interval_ms = delay_ms;
            }
            if let Some(max_pages) = max_pages {
                crawl_config.max_pages = max_pages;
            }

            run_crawl(crawl_config, &output, &error_output).await
        }
    }
}

async fn run_crawl(
    config: CrawlConfig,
    output: &PathBuf,
    error_output: &PathBuf,
) -> anyhow::Result<()> {
    let sink = Arc::new(JsonlSink::create(output, error_output).await?);
    let crawler = Crawler::new(config, Arc::new(HttpFetcher), sink)?;

    println!(
        "Crawling {} (target: {} records)",
        style(crawler.search_url()).cyan(),
        crawler.ledger().target()
    );

    let bar = ProgressBar::new(crawler.ledger().target() as u64);
    if let Ok(bar_style) =
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} records ({elapsed})")
    {
        bar.set_style(bar_style);
    }

    let progress = {
        let bar = bar.clone();
        let ledger = crawler.ledger();
        tokio::spawn(async move {
            loop {
                bar.set_position(ledger.produced().await as u64);
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        })
    };

    let stats = crawler.run().await;
    progress.abort();
    bar.finish_and_clear();

    println!(
        "{} {} records, {} failures, {} listing pages -> {}",
        style("Done:").green().bold(),
        stats.produced,
        stats.failed,
        stats.listing_pages,
        output.display()
    );

    Ok(())
}
