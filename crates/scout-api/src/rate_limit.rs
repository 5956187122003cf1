use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Fixed-window request counter keyed by client identity.
///
/// Created once at process start and injected into the request path; the
/// per-key check-then-increment is atomic under the map lock.
#[derive(Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Arc<Mutex<HashMap<String, Window>>>,
}

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns false when the key has exhausted its quota for the current
    /// window. `now` is a parameter so window expiry is testable without
    /// sleeping.
    pub async fn check_and_increment(&self, key: &str, now: Instant) -> bool {
        let mut state = self.state.lock().await;
        match state.get_mut(key) {
            Some(window) if now < window.reset_at => {
                if window.count >= self.limit {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                state.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn eleventh_request_in_window_is_blocked() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_and_increment("1.2.3.4", now).await);
        }
        assert!(!limiter.check_and_increment("1.2.3.4", now).await);
    }

    #[tokio::test]
    async fn window_expiry_resets_the_count() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_and_increment("1.2.3.4", now).await);
        }
        assert!(!limiter.check_and_increment("1.2.3.4", now).await);

        let later = now + Duration::from_secs(61);
        assert!(limiter.check_and_increment("1.2.3.4", later).await);
    }

    #[tokio::test]
    async fn keys_are_counted_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_and_increment("a", now).await);
        assert!(!limiter.check_and_increment("a", now).await);
        assert!(limiter.check_and_increment("b", now).await);
    }
}
