// src/crawl/queue.rs
// =============================================================================
// FIFO queue of URLs waiting to be crawled.
//
// This is plain data: no dedup (the DomainRegistry decides what gets in) and
// no locking (only the crawl loop touches it).
//
// Rust concepts:
// - VecDeque: push_back / pop_front are both O(1)
// - Option<String>: pop() on an empty queue is None, not an error
// =============================================================================

use std::collections::VecDeque;

#[derive(Debug, Default, Clone)]
pub struct Queue {
    items: VecDeque<String>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL to the back of the queue
    pub fn push(&mut self, url: String) {
        self.items.push_back(url);
    }

    /// Removes the URL at the front, or None when the queue is empty
    pub fn pop(&mut self) -> Option<String> {
        self.items.pop_front()
    }

    // Takes one specific URL out of the queue, wherever it is.
    // Returns false if it was not queued.
    pub fn remove(&mut self, url: &str) -> bool {
        match self.items.iter().position(|item| item == url) {
            Some(index) => self.items.remove(index).is_some(),
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an owned copy of the pending URLs, front first
    pub fn snapshot(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }
}

// The initial contents are copied in, so the caller's Vec stays independent
impl From<Vec<String>> for Queue {
    fn from(initial: Vec<String>) -> Self {
        Self {
            items: initial.into(),
        }
    }
}
