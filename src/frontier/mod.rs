//! Crawl frontier: the pending-work queue shared by all fetch workers
//!
//! The frontier is a bounded FIFO queue of `(url, depth)` pairs with a
//! visited set used for deduplication. Breadth-first order is an invariant:
//! entries are admitted at the tail and claimed from the head, so shallower
//! depths are explored exhaustively before deeper ones.
//!
//! Everything that has to be atomic lives under one mutex: the queue, the
//! visited set, the claimed count (page cap) and the in-flight count. A
//! check-and-insert on the visited set therefore cannot race with another
//! worker's enqueue, and a claim cannot race with a quiescence check.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use url::Url;

/// A single unit of pending work: a URL and its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Outcome of a claim attempt
#[derive(Debug)]
pub enum Claim {
    /// An entry was claimed; dropping the guard releases the in-flight slot
    Entry(ClaimedEntry),

    /// The queue is momentarily empty but other workers are still in flight
    /// and may enqueue more work; poll again after a short sleep
    Pending,

    /// The crawl is over: either the page cap was reached or the frontier is
    /// quiescent (empty queue and zero in-flight workers)
    Exhausted,
}

/// A claimed frontier entry holding an in-flight slot
///
/// The in-flight slot is released when this guard is dropped, so a panicking
/// worker cannot wedge the quiescence check.
#[derive(Debug)]
pub struct ClaimedEntry {
    pub entry: FrontierEntry,
    frontier: Arc<Frontier>,
}

impl Drop for ClaimedEntry {
    fn drop(&mut self) {
        self.frontier.release_in_flight();
    }
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<FrontierEntry>,
    admitted: HashSet<String>,
    claimed: usize,
    in_flight: usize,
}

/// Thread-safe breadth-first frontier with deduplication and caps
#[derive(Debug)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    max_depth: u32,
    max_pages: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given depth and page caps
    pub fn new(max_depth: u32, max_pages: usize) -> Self {
        Self {
            inner: Mutex::new(FrontierInner::default()),
            max_depth,
            max_pages,
        }
    }

    /// Admits a URL at the given depth
    ///
    /// This is a no-op (returning `false`) when:
    /// - the depth exceeds the depth cap,
    /// - the URL was already admitted earlier in the run, or
    /// - the page cap has already been reached.
    ///
    /// The visited-set check and the insert happen under the same lock as the
    /// queue append, so two workers discovering the same URL concurrently
    /// admit it exactly once.
    pub fn enqueue(&self, url: Url, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let mut inner = self.inner.lock().unwrap();

        if inner.claimed >= self.max_pages {
            return false;
        }

        if !inner.admitted.insert(url.as_str().to_string()) {
            return false;
        }

        inner.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Attempts to claim the next entry for processing
    ///
    /// Claiming increments the claimed count (which enforces the page cap)
    /// and the in-flight count in the same critical section as the dequeue,
    /// so no two workers ever receive the same entry and the quiescence
    /// check can never observe a half-claimed state.
    pub fn claim(self: &Arc<Self>) -> Claim {
        let mut inner = self.inner.lock().unwrap();

        if inner.claimed >= self.max_pages {
            return Claim::Exhausted;
        }

        match inner.queue.pop_front() {
            Some(entry) => {
                inner.claimed += 1;
                inner.in_flight += 1;
                Claim::Entry(ClaimedEntry {
                    entry,
                    frontier: Arc::clone(self),
                })
            }
            None => {
                if inner.in_flight == 0 {
                    Claim::Exhausted
                } else {
                    Claim::Pending
                }
            }
        }
    }

    fn release_in_flight(&self) {
        let mut inner = self.inner.lock().unwrap();
        debug_assert!(inner.in_flight > 0);
        inner.in_flight -= 1;
    }

    /// Number of entries waiting in the queue
    pub fn queued_len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Number of entries claimed so far (bounded by the page cap)
    pub fn claimed(&self) -> usize {
        self.inner.lock().unwrap().claimed
    }

    /// Number of distinct URLs admitted over the run's lifetime
    pub fn admitted_len(&self) -> usize {
        self.inner.lock().unwrap().admitted.len()
    }
}
