//! Record sinks: where finished job records and failures land.
//!
//! Sinks are append-only. Job records and error records travel as two
//! separate streams and are never interleaved into one file.

use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::models::{ErrorRecord, JobRecord};

/// Append-only output for a crawl run: one JobRecord per successful job, one
/// ErrorRecord per terminal task failure. Write problems are logged, not
/// propagated; losing one record must not take the run down.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn push(&self, record: JobRecord);
    async fn push_error(&self, error: ErrorRecord);
}

/// JSONL files on disk, one line per record.
pub struct JsonlSink {
    records: Mutex<tokio::fs::File>,
    errors: Mutex<tokio::fs::File>,
}

impl JsonlSink {
    /// Create (or truncate) the two output files.
    pub async fn create(records_path: &Path, errors_path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            records: Mutex::new(tokio::fs::File::create(records_path).await?),
            errors: Mutex::new(tokio::fs::File::create(errors_path).await?),
        })
    }

    async fn write_line<T: serde::Serialize>(file: &Mutex<tokio::fs::File>, value: &T) {
        let mut line = match serde_json::to_string(value) {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to serialize record: {}", e);
                return;
            }
        };
        line.push('\n');

        let mut file = file.lock().await;
        if let Err(e) = file.write_all(line.as_bytes()).await {
            warn!("failed to write record: {}", e);
        }
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn push(&self, record: JobRecord) {
        Self::write_line(&self.records, &record).await;
    }

    async fn push_error(&self, error: ErrorRecord) {
        Self::write_line(&self.errors, &error).await;
    }
}

/// In-memory sink for tests and library callers that want the records back.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<JobRecord>>,
    errors: Mutex<Vec<ErrorRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<JobRecord> {
        self.records.lock().await.clone()
    }

    pub async fn errors(&self) -> Vec<ErrorRecord> {
        self.errors.lock().await.clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn push(&self, record: JobRecord) {
        self.records.lock().await.push(record);
    }

    async fn push_error(&self, error: ErrorRecord) {
        self.errors.lock().await.push(error);
    }
}
