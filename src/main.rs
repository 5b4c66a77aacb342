//! jobharvest - job-listing crawler.
//!
//! Crawls a paginated job-listing site, follows job cards to their detail
//! pages, and emits deduplicated, normalized records as JSONL.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if jobharvest::cli::is_verbose() {
        "jobharvest=info"
    } else {
        "jobharvest=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    jobharvest::cli::run().await
}
