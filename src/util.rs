use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::message::{GuildContext, RoleInfo};

pub const MAX_MESSAGE_LEN: usize = 2000;
pub const MAX_MESSAGES: usize = 2;

/// Milliseconds between the Unix epoch and the first second of 2015.
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Format a duration in seconds as a human-readable uptime string.
pub fn format_duration(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

static RE_SNOWFLAKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<(?:@!?|@&|#)(\d+)>|(\d+))$").unwrap());

/// Parse an id from a string. Accepts:
/// - Raw ids: "123456789012345678"
/// - User mentions: "<@123>" or "<@!123>"
/// - Role mentions: "<@&123>"
/// - Channel mentions: "<#123>"
pub fn parse_snowflake(s: &str) -> Option<u64> {
    let caps = RE_SNOWFLAKE.captures(s.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Creation time encoded in a Discord id.
pub fn snowflake_time(id: u64) -> DateTime<Utc> {
    let millis = (id >> 22) + DISCORD_EPOCH_MS;
    DateTime::from_timestamp_millis(millis as i64).unwrap_or_else(Utc::now)
}

/// Resolve a role query against a guild: by id or mention first, then by
/// exact name (case-insensitive), then by partial name.
pub fn find_roles<'a>(guild: &'a GuildContext, query: &str) -> Vec<&'a RoleInfo> {
    let query = query.trim();
    if let Some(id) = parse_snowflake(query) {
        if let Some(role) = guild.role(id) {
            return vec![role];
        }
    }

    let lower = query.to_lowercase();
    let exact: Vec<&RoleInfo> = guild
        .roles
        .iter()
        .filter(|r| r.name.to_lowercase() == lower)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    guild
        .roles
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&lower))
        .collect()
}

/// Neutralise `@everyone` and `@here` so replies never ping a whole guild.
pub fn defuse_mentions(text: &str) -> String {
    text.replace("@everyone", "@\u{200B}everyone")
        .replace("@here", "@\u{200B}here")
}

/// Split outgoing text into at most [`MAX_MESSAGES`] chunks of at most
/// [`MAX_MESSAGE_LEN`] characters, cutting at the last newline, else the last
/// space, else hard at the limit. Anything past the last chunk is dropped.
pub fn split_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() && chunks.len() < MAX_MESSAGES {
        let limit = match rest.char_indices().nth(MAX_MESSAGE_LEN) {
            Some((idx, _)) => idx,
            None => {
                chunks.push(rest.to_string());
                break;
            }
        };

        let window = &rest[..limit];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&i| i > 0)
            .unwrap_or(limit);

        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start_matches(|c: char| c == '\n' || c == ' ');
    }

    chunks
}
