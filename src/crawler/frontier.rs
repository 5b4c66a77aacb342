//! Work frontier shared by the crawl workers.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};

use crate::models::CrawlTask;

/// Queue of not-yet-completed tasks plus the in-flight count, so a parked
/// worker can tell "momentarily empty" apart from "drained".
///
/// Workers must pair every successful [`Frontier::next`] with exactly one
/// [`Frontier::task_done`], and push any retry before calling it.
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
}

struct FrontierState {
    queue: VecDeque<CrawlTask>,
    in_flight: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FrontierState {
                queue: VecDeque::new(),
                in_flight: 0,
            }),
            notify: Notify::new(),
        }
    }

    pub async fn push(&self, task: CrawlTask) {
        self.state.lock().await.queue.push_back(task);
        self.notify.notify_one();
    }

    /// Next task to work on, or `None` once the queue is empty and nothing is
    /// in flight. Parks while other workers might still enqueue.
    pub async fn next(&self) -> Option<CrawlTask> {
        loop {
            // register for wakeups before checking, so a push between the
            // check and the await is not lost
            let notified = self.notify.notified();
            {
                let mut state = self.state.lock().await;
                if let Some(task) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(task);
                }
                if state.in_flight == 0 {
                    // drained: release every other parked worker too
                    self.notify.notify_waiters();
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Mark a previously-dequeued task as finished, success or terminal
    /// failure alike.
    pub async fn task_done(&self) {
        let mut state = self.state.lock().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.queue.is_empty() {
            drop(state);
            self.notify.notify_waiters();
        }
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
