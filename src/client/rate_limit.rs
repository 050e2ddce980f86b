use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Sliding-window limit on command calls per user, independent of the
/// per-command cooldowns.
pub(super) struct RateLimiter {
    calls: Mutex<HashMap<u64, Vec<Instant>>>,
    max_calls: usize,
    window_secs: u64,
}

impl RateLimiter {
    pub(super) fn new(max_calls: usize, window_secs: u64) -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
            max_calls,
            window_secs,
        }
    }

    pub(super) fn check(&self, user_id: u64) -> bool {
        if self.max_calls == 0 {
            return true;
        }
        let mut map = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let window = Duration::from_secs(self.window_secs);

        let timestamps = map.entry(user_id).or_default();
        timestamps.retain(|t| now.duration_since(*t) < window);

        if timestamps.len() >= self.max_calls {
            false
        } else {
            timestamps.push(now);
            true
        }
    }

    /// Forget users with no call inside the window. Returns how many were
    /// dropped.
    pub(super) fn clean(&self) -> usize {
        let mut map = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let window = Duration::from_secs(self.window_secs);
        let before = map.len();
        map.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < window);
            !timestamps.is_empty()
        });
        before - map.len()
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
