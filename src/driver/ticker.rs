use std::time::Duration;
use std::time::Instant;

/// A repeating timer that only fires when asked.
///
/// Nothing runs in the background: the owner polls it from its event loop, and a cancelled
/// ticker simply never reports being due again until it is re-armed.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,

    /// `None` while cancelled
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Schedule the next firing one interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Returns whether the ticker is due at `now`. A due ticker is rescheduled one interval
    /// after `now`, so a slow caller skips missed firings instead of bursting through them.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// How long the owner may block before the next firing, at most `idle`.
    pub fn timeout(&self, now: Instant, idle: Duration) -> Duration {
        match self.next {
            Some(next) => next.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }
}
