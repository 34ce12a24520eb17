//! Transient notifications (toasts).
//!
//! The core only queues them; the TUI renders the newest few and calls
//! [`Notifications::prune`] every tick so expired ones disappear.

use std::time::{Duration, Instant};

/// Errors stay on screen this much longer than info and success notices.
const ERROR_EXTRA: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.duration
    }
}

#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    base_duration: Duration,
}

impl Notifications {
    pub fn new(base_duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            base_duration,
        }
    }

    /// Queue a notice with the default lifetime for its level.
    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        let duration = match level {
            Level::Error => self.base_duration.saturating_add(ERROR_EXTRA),
            Level::Info | Level::Success => self.base_duration,
        };
        self.push_for(level, message, duration);
    }

    pub fn push_for(&mut self, level: Level, message: impl Into<String>, duration: Duration) {
        let message = message.into();
        log::debug!("notify {:?}: {}", level, message);
        self.items.push(Notification {
            level,
            message,
            created_at: Instant::now(),
            duration,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message);
    }

    /// Drop expired notices. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        self.items.len() != before
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_lives_longer_than_info() {
        let mut n = Notifications::new(Duration::from_secs(5));
        n.info("hello");
        n.error("boom");
        let items: Vec<_> = n.iter().collect();
        assert_eq!(items[0].duration, Duration::from_secs(5));
        assert_eq!(items[1].duration, Duration::from_secs(7));
    }

    #[test]
    fn test_error_lifetime_saturates() {
        let mut n = Notifications::new(Duration::MAX);
        n.error("boom");
        assert_eq!(n.last().unwrap().duration, Duration::MAX);
        assert!(!n.prune(Instant::now()));
    }

    #[test]
    fn test_prune_removes_only_expired() {
        let mut n = Notifications::new(Duration::from_secs(5));
        n.push_for(Level::Info, "short", Duration::ZERO);
        n.info("long");
        assert!(n.prune(Instant::now()));
        assert_eq!(n.len(), 1);
        assert_eq!(n.last().unwrap().message, "long");
        assert!(!n.prune(Instant::now()));
    }
}
