// src/crawl/dispatcher.rs
// =============================================================================
// The Dispatcher decides when the next crawl step may start.
//
// Two limits are enforced:
// - concurrency: at most `limit` tasks in flight at once
// - rate: at least `interval` between two dispatches, no matter how many
//   tasks are currently running
//
// dispatch() pops the next URL, spawns the task onto a JoinSet and returns
// right away. Finished tasks are collected with settle(): failures are
// logged and dropped there, successes are handed back to the caller. A task
// leaves the in-flight count only when it is settled, so the crawl loop can
// never overshoot the limit.
//
// Everything here is owned by the crawl loop, so no locks are needed. The
// in-flight count and the last dispatch time change inside dispatch(),
// before the spawned task gets a chance to run.
//
// Rust concepts:
// - Generics: Dispatcher<T> does not care what a task returns
// - Trait bounds: the task future must be Send + 'static to be spawned
// =============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error};

use super::queue::Queue;
use crate::error::{CrawlError, Result};

pub struct Dispatcher<T> {
    queue: Queue,
    limit: usize,
    interval: Duration,
    last_dispatch: Option<Instant>,
    // Each task yields the URL it was started with plus its outcome, so
    // failures can be reported against the right page
    tasks: JoinSet<(String, Result<T>)>,
}

impl<T: Send + 'static> Dispatcher<T> {
    // Creates a dispatcher
    //
    // Parameters:
    //   initial: URLs to start the queue with
    //   limit: maximum number of tasks in flight (must be > 0)
    //   interval_ms: minimum milliseconds between dispatches (must be >= 0)
    pub fn new(initial: Vec<String>, limit: i64, interval_ms: i64) -> Result<Self> {
        let limit = usize::try_from(limit)
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| {
                CrawlError::InvalidConfig(format!("task limit must be positive, got {}", limit))
            })?;

        let interval_ms = u64::try_from(interval_ms).map_err(|_| {
            CrawlError::InvalidConfig(format!(
                "interval must be non-negative, got {}ms",
                interval_ms
            ))
        })?;

        Ok(Self {
            queue: Queue::from(initial),
            limit,
            interval: Duration::from_millis(interval_ms),
            last_dispatch: None,
            tasks: JoinSet::new(),
        })
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_dispatch(&self) -> Option<Instant> {
        self.last_dispatch
    }

    /// Number of dispatched tasks that have not been settled yet
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn capacity_available(&self) -> bool {
        self.in_flight() < self.limit
    }

    // Starts `task` on the next queued URL without waiting for it
    //
    // Returns false (and does nothing) when the queue is empty or the
    // concurrency limit is reached.
    #[must_use]
    pub fn dispatch<F, Fut>(&mut self, task: F) -> bool
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if !self.capacity_available() {
            return false;
        }
        let Some(message) = self.queue.pop() else {
            return false;
        };

        self.last_dispatch = Some(Instant::now());

        let future = task(message.clone());
        self.tasks.spawn(async move { (message, future.await) });
        true
    }

    // Collects every task that has finished since the last call
    //
    // Failed tasks are logged here and never reach the caller.
    pub fn settle(&mut self) -> Vec<T> {
        let mut settled = Vec::new();

        while let Some(joined) = self.tasks.try_join_next() {
            match joined {
                Ok((_, Ok(value))) => settled.push(value),
                Ok((url, Err(e))) => error!(%url, error = %e, "error crawling"),
                Err(e) => error!(error = %e, "crawl task panicked"),
            }
        }

        settled
    }

    // Sleeps for whatever is left of the interval since the last dispatch
    //
    // Returns immediately if nothing has been dispatched yet or the interval
    // has already passed.
    pub async fn wait_for_interval(&self, now: Instant) {
        let Some(last) = self.last_dispatch else {
            return;
        };

        let remaining = self.interval.saturating_sub(now.duration_since(last));
        if !remaining.is_zero() {
            debug!(
                "delaying by remaining {}ms of {}ms interval",
                remaining.as_millis(),
                self.interval.as_millis()
            );
            self.delay(remaining).await;
        }
    }

    pub async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a JoinSet?
//    - A collection of spawned tokio tasks that you can wait on together
//    - try_join_next() hands back one finished task without waiting
//    - Dropping the JoinSet aborts whatever is still running
//
// 2. Why is the task a closure (FnOnce(String) -> Fut)?
//    - dispatch() owns the queue, so it is the one that pops the URL
//    - The caller only says what to do with it
//    - FnOnce because each closure is used for exactly one URL
//
// 3. Why tokio::time::Instant instead of std::time::Instant?
//    - Tests can pause and fast-forward tokio's clock
//    - That makes the interval tests instant and exact
// -----------------------------------------------------------------------------
