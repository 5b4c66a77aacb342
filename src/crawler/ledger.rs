//! Shared dedup and produced-count ledger.

use std::collections::HashSet;

use tokio::sync::Mutex;

/// The only state shared by every worker: URLs already emitted this run plus
/// the produced-record count, behind one lock so check-and-insert is a single
/// atomic step under concurrent completions.
pub struct RecordLedger {
    target: usize,
    inner: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    seen: HashSet<String>,
    produced: usize,
}

impl RecordLedger {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            inner: Mutex::new(LedgerState::default()),
        }
    }

    /// Claim a URL for emission. Returns false when a record for this URL was
    /// already emitted this run.
    pub async fn try_claim(&self, url: &str) -> bool {
        let mut state = self.inner.lock().await;
        if !state.seen.insert(url.to_string()) {
            return false;
        }
        state.produced += 1;
        true
    }

    pub async fn produced(&self) -> usize {
        self.inner.lock().await.produced
    }

    pub async fn target_reached(&self) -> bool {
        self.inner.lock().await.produced >= self.target
    }

    pub fn target(&self) -> usize {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claims_count_distinct_urls_once() {
        let ledger = RecordLedger::new(10);
        let urls = [
            "https://example.com/job/1",
            "https://example.com/job/2",
            "https://example.com/job/1",
            "https://example.com/job/3",
            "https://example.com/job/2",
        ];

        let claimed = {
            let mut n = 0;
            for url in urls {
                if ledger.try_claim(url).await {
                    n += 1;
                }
            }
            n
        };

        assert_eq!(claimed, 3);
        assert_eq!(ledger.produced().await, 3);
    }

    #[tokio::test]
    async fn test_target_reached() {
        let ledger = RecordLedger::new(2);
        assert!(!ledger.target_reached().await);
        ledger.try_claim("https://example.com/job/1").await;
        assert!(!ledger.target_reached().await);
        ledger.try_claim("https://example.com/job/2").await;
        assert!(ledger.target_reached().await);
    }
}
