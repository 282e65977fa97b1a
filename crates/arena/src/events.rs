//! Bounded, most-recent-first notification log.

use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a message at the front, dropping the oldest beyond capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(event = %message, "Arena event");
        self.entries.push_front(message);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Messages, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_capped() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(format!("event {i}"));
        }
        let entries: Vec<&str> = log.iter().collect();
        assert_eq!(entries, vec!["event 4", "event 3", "event 2"]);
        assert_eq!(log.latest(), Some("event 4"));
    }
}
