use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

pub type DynRateLimiter = Arc<dyn RateLimiterTrait + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

pub trait RateLimiterTrait {
    fn check(&self, key: &str) -> RateDecision;
}

/// In-process sliding-window limiter. Each key keeps the timestamps of its
/// requests inside the window; anything older is dropped on the next check.
pub struct SlidingWindowRateLimiter {
    max_requests: u32,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut hits = self.hits.lock().unwrap();
        let entries = hits.entry(key.to_string()).or_default();

        entries.retain(|stamp| now.duration_since(*stamp) < self.window);

        if entries.len() >= self.max_requests as usize {
            let oldest = entries[0];
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(oldest))
                .as_secs()
                .max(1);
            return RateDecision::Limited {
                retry_after_secs: retry_after,
            };
        }

        entries.push(now);
        RateDecision::Allowed
    }
}

impl RateLimiterTrait for SlidingWindowRateLimiter {
    fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }
}
