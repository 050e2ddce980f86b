use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub commands: HashMap<String, GroupConfig>,
}

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    pub token: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub dev_id: u64,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_success_emoji")]
    pub success_emoji: String,
    #[serde(default = "default_warning_emoji")]
    pub warning_emoji: String,
    #[serde(default = "default_error_emoji")]
    pub error_emoji: String,
    #[serde(default)]
    pub support_server: String,
    #[serde(default = "default_rate_limit_commands")]
    pub rate_limit_commands: usize,
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
}

fn default_prefix() -> String {
    "|".to_string()
}

fn default_db_path() -> String {
    "nightfury.db".to_string()
}

fn default_success_emoji() -> String {
    "\u{1F432}".to_string()
}

fn default_warning_emoji() -> String {
    "\u{1F422}".to_string()
}

fn default_error_emoji() -> String {
    "\u{1F525}".to_string()
}

fn default_rate_limit_commands() -> usize {
    5
}

fn default_rate_limit_window() -> u64 {
    10
}

/// A command group toggle under `[commands]`.
#[derive(Debug, Deserialize)]
pub struct GroupConfig {
    pub enabled: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        if config.bot.token.trim().is_empty() {
            return Err(ConfigError::Invalid("bot.token is empty".to_string()));
        }
        if config.bot.prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("bot.prefix is empty".to_string()));
        }
        Ok(config)
    }

    /// Groups missing from `[commands]` are enabled.
    pub fn is_group_enabled(&self, name: &str) -> bool {
        self.commands
            .get(name)
            .map(|g| g.enabled)
            .unwrap_or(true)
    }
}
