//! Frontier and visited set
//!
//! The frontier is the FIFO of URLs waiting to be fetched; the visited set is
//! every URL ever claimed (queued, in flight, or done). Both live behind one
//! lock so that "claim" is a single check-and-insert, and so that the drain
//! check sees the queue and the in-flight count at the same instant.
//!
//! # Drain protocol
//!
//! [`Frontier::dequeue`] returns `None` only when the queue is empty *and* no
//! lease is outstanding. A worker holding a [`Lease`] may still enqueue more
//! work, so idle workers wait instead of exiting until the last lease drops.

use std::collections::{HashSet, VecDeque};
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;

/// A URL waiting to be fetched, with the bookkeeping captured at discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL to fetch
    pub url: Url,

    /// Depth the fetched page will have
    pub depth: u32,

    /// Page the link was found on; `None` for seeds
    pub referer: Option<Url>,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<Url>,
    in_flight: usize,
    stopped: bool,
}

/// Shared work queue and dedup authority for one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    changed: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` and queues it for fetching
    ///
    /// Returns false without doing anything if the URL was claimed before or
    /// the crawl has been stopped.
    pub fn claim_and_enqueue(&self, url: Url, depth: u32, referer: Option<Url>) -> bool {
        {
            let mut state = self.lock();
            if state.stopped || !state.visited.insert(url.clone()) {
                return false;
            }
            tracing::trace!("Enqueued {} at depth {}", url, depth);
            state.queue.push_back(FrontierEntry {
                url,
                depth,
                referer,
            });
        }
        self.changed.notify_waiters();
        true
    }

    /// Claims `url` without queueing it
    ///
    /// Used for redirect targets, which the claiming worker fetches itself.
    pub fn claim(&self, url: &Url) -> bool {
        let mut state = self.lock();
        !state.stopped && state.visited.insert(url.clone())
    }

    /// Waits for the next entry
    ///
    /// Returns `None` once the crawl has drained or been stopped. The returned
    /// lease counts as in flight until it is dropped.
    pub async fn dequeue(&self) -> Option<Lease<'_>> {
        loop {
            // Registered before the check so a wakeup between the check and
            // the await is not lost.
            let notified = self.changed.notified();
            {
                let mut state = self.lock();
                if state.stopped {
                    return None;
                }
                if let Some(entry) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(Lease {
                        entry,
                        frontier: self,
                    });
                }
                if state.in_flight == 0 {
                    return None;
                }
            }
            notified.await;
        }
    }

    /// Stops the crawl: waiting and future `dequeue` calls return `None`
    ///
    /// Leases already handed out are unaffected.
    pub fn stop(&self) {
        self.lock().stopped = true;
        self.changed.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Number of URLs ever claimed
    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.lock().visited.contains(url)
    }

    /// Number of leases not yet dropped
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// True when nothing is queued and nothing is in flight
    pub fn is_drained(&self) -> bool {
        let state = self.lock();
        state.queue.is_empty() && state.in_flight == 0
    }

    fn complete(&self) {
        let drained = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && state.queue.is_empty()
        };
        if drained {
            tracing::trace!("Frontier drained");
            self.changed.notify_waiters();
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A dequeued entry that is in flight until dropped
#[derive(Debug)]
pub struct Lease<'a> {
    entry: FrontierEntry,
    frontier: &'a Frontier,
}

impl Lease<'_> {
    pub fn entry(&self) -> &FrontierEntry {
        &self.entry
    }
}

impl Deref for Lease<'_> {
    type Target = FrontierEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.frontier.complete();
    }
}
