use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::command::CommandIndex;
use crate::config::Config;
use crate::db::Db;

mod call_cache;
mod cooldown;
mod dispatch;
mod event;
mod mode;
mod rate_limit;
mod role_persist;
mod starboard;
mod welcome;

#[cfg(test)]
mod tests;

pub use cooldown::Cooldowns;
pub use event::CommandEvent;
pub use mode::ClientMode;
pub use starboard::{StarredMessage, STAR};

use call_cache::{CallCache, CALL_CACHE_SIZE};
use rate_limit::RateLimiter;

pub struct Client {
    config: Arc<Config>,
    db: Arc<Db>,
    commands: CommandIndex,
    cooldowns: Cooldowns,
    /// Successful and terminated runs per command full name
    uses: Mutex<HashMap<String, u64>>,
    rate_limiter: RateLimiter,
    calls: CallCache,
    mode: Mutex<ClientMode>,
    started: Instant,
    guild_count: AtomicUsize,
}

impl Client {
    pub fn new(config: Arc<Config>, db: Arc<Db>, commands: CommandIndex) -> Self {
        let rate_limiter = RateLimiter::new(
            config.bot.rate_limit_commands,
            config.bot.rate_limit_window_secs,
        );
        Self {
            config,
            db,
            commands,
            cooldowns: Cooldowns::new(),
            uses: Mutex::new(HashMap::new()),
            rate_limiter,
            calls: CallCache::new(CALL_CACHE_SIZE),
            mode: Mutex::new(ClientMode::Service),
            started: Instant::now(),
            guild_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn commands(&self) -> &CommandIndex {
        &self.commands
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn mode(&self) -> ClientMode {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_mode(&self, mode: ClientMode) {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner) = mode;
        log::info!("Client mode set to {}", mode.name());
    }

    pub fn is_dev(&self, user_id: u64) -> bool {
        user_id == self.config.bot.dev_id
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn guild_count(&self) -> usize {
        self.guild_count.load(Ordering::Relaxed)
    }

    pub fn set_guild_count(&self, count: usize) {
        self.guild_count.store(count, Ordering::Relaxed);
    }

    pub fn uses(&self, fullname: &str) -> u64 {
        self.uses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(fullname)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_uses(&self) -> u64 {
        self.uses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    fn increment_uses(&self, fullname: &str) {
        *self
            .uses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(fullname.to_string())
            .or_insert(0) += 1;
    }

    /// Record a reply the bot sent for the call message `call_id`.
    pub fn link_reply(&self, call_id: u64, reply_id: u64) {
        self.calls.link(call_id, reply_id);
    }

    /// Replies to delete now that the message `message_id` is gone.
    pub fn on_message_delete(&self, message_id: u64) -> Vec<u64> {
        self.calls.take(message_id)
    }

    /// Drop every expired cooldown and idle rate limit record. Run
    /// periodically.
    pub fn clean_cooldowns(&self) {
        let removed = self.cooldowns.clean();
        if removed > 0 {
            log::debug!("Cleaned {} expired cooldown(s)", removed);
        }
        let idle = self.rate_limiter.clean();
        if idle > 0 {
            log::debug!("Forgot {} idle user(s) in the rate limiter", idle);
        }
    }
}
