use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Cooldown expiry times keyed by `"<command>|<scope>"`.
pub struct Cooldowns {
    entries: Mutex<HashMap<String, Instant>>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Whole seconds left on `key`, rounded up. An expired entry is removed.
    pub fn remaining(&self, key: &str) -> u64 {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        match entries.get(key) {
            Some(&expiry) if expiry > now => {
                let left = expiry - now;
                left.as_secs() + u64::from(left.subsec_nanos() > 0)
            }
            Some(_) => {
                entries.remove(key);
                0
            }
            None => 0,
        }
    }

    pub fn apply(&self, key: &str, seconds: u64) {
        let expiry = Instant::now() + Duration::from_secs(seconds);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), expiry);
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn clean(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, expiry| *expiry > now);
        before - entries.len()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_rounds_up() {
        let cooldowns = Cooldowns::new();
        assert_eq!(cooldowns.remaining("ping|U:1"), 0);

        cooldowns.apply("ping|U:1", 30);
        let left = cooldowns.remaining("ping|U:1");
        assert!(left == 30 || left == 29, "left = {}", left);
        assert_eq!(cooldowns.remaining("ping|U:2"), 0);
    }

    #[test]
    fn test_expired_entry_removed_on_lookup() {
        let cooldowns = Cooldowns::new();
        cooldowns.apply("ping|U:1", 0);
        assert_eq!(cooldowns.len(), 1);
        assert_eq!(cooldowns.remaining("ping|U:1"), 0);
        assert_eq!(cooldowns.len(), 0);
    }

    #[test]
    fn test_clean_keeps_active_entries() {
        let cooldowns = Cooldowns::new();
        cooldowns.apply("a", 0);
        cooldowns.apply("b", 0);
        cooldowns.apply("c", 60);
        assert_eq!(cooldowns.clean(), 2);
        assert_eq!(cooldowns.len(), 1);
        assert!(cooldowns.remaining("c") > 0);
    }
}
