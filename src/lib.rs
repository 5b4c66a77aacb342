//! Crawl engine for paginated job-listing sites.
//!
//! Fetches listing pages, extracts job cards, optionally follows each card to
//! its detail page, and emits one deduplicated, normalized record per job.
//! Pages are plain server-delivered HTML; extraction is best-effort and
//! degrades to null fields rather than failing a task.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod models;
