//! Shared crawl frontier
//!
//! The frontier is the only mutable state shared between workers. It holds:
//! - `pending`: locators waiting to be fetched (FIFO)
//! - `visited`: every locator handed out by [`Frontier::take`], in order
//! - `rejected`: locators whose depth reached the depth budget
//! - the number of workers currently idle inside [`Frontier::take`]
//!
//! There is no de-duplication: the same URL reached along two paths is queued,
//! fetched and reported twice.
//!
//! # Termination
//!
//! New pending work only comes from a worker calling [`Frontier::admit`]. Once
//! every worker is idle in `take` and nothing is pending, nobody can admit
//! anything again, so the crawl is finished. [`Frontier::wait_quiescent`]
//! waits for exactly that state, woken on each idle count change.

use crate::locator::Locator;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Point-in-time copy of the frontier's reporting sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontierSnapshot {
    /// Locators handed to workers, in hand-out order
    pub visited: Vec<Locator>,

    /// Locators rejected for reaching the depth budget, in admission order
    pub rejected: Vec<Locator>,

    /// Locators still waiting when the snapshot was taken
    pub pending: Vec<Locator>,
}

#[derive(Debug, Default)]
struct FrontierState {
    pending: VecDeque<Locator>,
    visited: Vec<Locator>,
    rejected: Vec<Locator>,
    /// Waiting takers that have not been handed work by an admit
    idle_workers: usize,
    /// Wakeups promised by admit that no waiting taker has claimed yet
    handoffs: usize,
    closed: bool,
}

/// Monitor-protected frontier shared by all workers of one crawl
#[derive(Debug)]
pub struct Frontier {
    depth_budget: u32,
    state: Mutex<FrontierState>,
    work_available: Notify,
    idle_changed: Notify,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// Locators with `depth < depth_budget` are queued; the rest are rejected.
    pub fn new(depth_budget: u32) -> Self {
        Self {
            depth_budget,
            state: Mutex::new(FrontierState::default()),
            work_available: Notify::new(),
            idle_changed: Notify::new(),
        }
    }

    /// The exclusive depth bound of this crawl
    pub fn depth_budget(&self) -> u32 {
        self.depth_budget
    }

    fn lock_state(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues the crawl's starting locator without a depth check
    pub fn seed(&self, locator: Locator) {
        let mut state = self.lock_state();
        state.pending.push_back(locator);
        drop(state);
        self.work_available.notify_one();
    }

    /// Offers a discovered locator to the frontier
    ///
    /// Returns `true` if it was queued, `false` if its depth reached the budget
    /// and it was recorded as rejected instead. Never blocks.
    pub fn admit(&self, locator: Locator) -> bool {
        let mut state = self.lock_state();

        if locator.depth() >= self.depth_budget {
            state.rejected.push(locator);
            return false;
        }

        state.pending.push_back(locator);

        // One waiting worker is about to receive work
        if state.idle_workers > 0 {
            state.idle_workers -= 1;
            state.handoffs += 1;
            self.idle_changed.notify_waiters();
        }

        drop(state);
        self.work_available.notify_one();
        true
    }

    /// Hands out the oldest pending locator, waiting while none is pending
    ///
    /// The returned locator is appended to `visited`. While waiting, the
    /// caller counts as idle. Returns `None` once the frontier is closed.
    ///
    /// Dropping the future while it waits leaves the caller counted as idle,
    /// so workers should always await it to completion.
    pub async fn take(&self) -> Option<Locator> {
        let mut counted_idle = false;

        loop {
            let notified = self.work_available.notified();
            tokio::pin!(notified);
            // Register before checking so an admit between the check and the
            // await is not missed
            notified.as_mut().enable();

            {
                let mut state = self.lock_state();

                if counted_idle && state.handoffs > 0 {
                    state.handoffs -= 1;
                    counted_idle = false;
                }

                if state.closed {
                    if counted_idle {
                        state.idle_workers = state.idle_workers.saturating_sub(1);
                        self.idle_changed.notify_waiters();
                    }
                    return None;
                }

                if let Some(locator) = state.pending.pop_front() {
                    if counted_idle {
                        state.idle_workers -= 1;
                        self.idle_changed.notify_waiters();
                    }
                    state.visited.push(locator.clone());
                    return Some(locator);
                }

                if !counted_idle {
                    state.idle_workers += 1;
                    counted_idle = true;
                    self.idle_changed.notify_waiters();
                }
            }

            notified.await;
        }
    }

    /// Number of workers idle in `take`
    pub fn idle_count(&self) -> usize {
        self.lock_state().idle_workers
    }

    /// Number of locators waiting to be taken
    pub fn pending_count(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// Returns true when all `workers` are idle and nothing is pending
    pub fn is_quiescent(&self, workers: usize) -> bool {
        let state = self.lock_state();
        state.idle_workers == workers && state.pending.is_empty()
    }

    /// Waits until [`Frontier::is_quiescent`] holds for `workers`
    pub async fn wait_quiescent(&self, workers: usize) {
        loop {
            let notified = self.idle_changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_quiescent(workers) {
                return;
            }

            notified.await;
        }
    }

    /// Stops handing out work and wakes every waiting taker
    pub fn close(&self) {
        let mut state = self.lock_state();
        state.closed = true;
        drop(state);
        self.work_available.notify_waiters();
    }

    /// Returns true once [`Frontier::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.lock_state().closed
    }

    /// Copies the reporting sequences under the lock
    pub fn snapshot(&self) -> FrontierSnapshot {
        let state = self.lock_state();
        FrontierSnapshot {
            visited: state.visited.clone(),
            rejected: state.rejected.clone(),
            pending: state.pending.iter().cloned().collect(),
        }
    }
}
