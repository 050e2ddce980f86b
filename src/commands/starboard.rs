use std::ops::RangeInclusive;

use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{ArgsRequired, Category, Command, CommandResult};
use crate::db::ChannelType;
use crate::message::Response;
use crate::util::parse_snowflake;

const THRESHOLD_RANGE: RangeInclusive<u32> = 1..=25;
const MAX_AGE_RANGE: RangeInclusive<u32> = 1..=336;
const NOT_SET_UP: &str = "The starboard is not set up on this server!";

pub struct StarboardCommand {
    children: Vec<Box<dyn Command>>,
}

impl StarboardCommand {
    pub fn new() -> Self {
        Self {
            children: vec![
                Box::new(SetStarboard),
                Box::new(StarboardThreshold),
                Box::new(StarboardMaxAge),
                Box::new(RemoveStarboard),
            ],
        }
    }
}

#[async_trait]
impl Command for StarboardCommand {
    fn name(&self) -> &str {
        "Starboard"
    }

    fn arguments(&self) -> &str {
        "<Function>"
    }

    fn help(&self) -> &str {
        "Shows the starboard settings of this server."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let channel = event.db().get_channel(guild.id, ChannelType::Starboard)?;
        let settings = event.db().get_starboard_settings(guild.id)?;
        let response = match (channel, settings) {
            (Some(channel), Some(settings)) => event.reply_success(format!(
                "Starboard: <#{}>\nThreshold: **{}** stars\nMax age: **{}** hours",
                channel, settings.threshold, settings.max_age
            )),
            _ => event.reply_warning(NOT_SET_UP),
        };
        Ok(Some(vec![response]))
    }
}

/// Parse a numeric setting, or the error reply for it.
fn parse_in_range(
    event: &CommandEvent<'_>,
    what: &str,
    range: RangeInclusive<u32>,
) -> Result<u32, Response> {
    event
        .args
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| range.contains(n))
        .ok_or_else(|| {
            event.reply_error(format!(
                "The {} must be a number between {} and {}!",
                what,
                range.start(),
                range.end()
            ))
        })
}

struct SetStarboard;

#[async_trait]
impl Command for SetStarboard {
    fn name(&self) -> &str {
        "Set"
    }

    fn arguments(&self) -> &str {
        "[#Channel]"
    }

    fn help(&self) -> &str {
        "Sets the channel starred messages are posted to."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let channel_id = match parse_snowflake(&event.args) {
            Some(id) => id,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "\"{}\" is not a valid channel!",
                    event.args
                ))]))
            }
        };
        event.db().set_channel(guild.id, channel_id, ChannelType::Starboard)?;
        event.db().ensure_starboard_settings(guild.id)?;
        Ok(Some(vec![event.reply_success(format!(
            "Starred messages will be posted in <#{}>!",
            channel_id
        ))]))
    }
}

struct StarboardThreshold;

#[async_trait]
impl Command for StarboardThreshold {
    fn name(&self) -> &str {
        "Threshold"
    }

    fn arguments(&self) -> &str {
        "[Stars]"
    }

    fn help(&self) -> &str {
        "Sets how many stars a message needs to be posted."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let threshold = match parse_in_range(event, "threshold", THRESHOLD_RANGE) {
            Ok(n) => n,
            Err(reply) => return Ok(Some(vec![reply])),
        };
        if !event.db().set_starboard_threshold(guild.id, threshold)? {
            return Ok(Some(vec![event.reply_error(NOT_SET_UP)]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Messages now need **{}** stars to be posted.",
            threshold
        ))]))
    }
}

struct StarboardMaxAge;

#[async_trait]
impl Command for StarboardMaxAge {
    fn name(&self) -> &str {
        "MaxAge"
    }

    fn arguments(&self) -> &str {
        "[Hours]"
    }

    fn help(&self) -> &str {
        "Sets how old a message may be and still be posted."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let hours = match parse_in_range(event, "max age", MAX_AGE_RANGE) {
            Ok(n) => n,
            Err(reply) => return Ok(Some(vec![reply])),
        };
        if !event.db().set_starboard_max_age(guild.id, hours)? {
            return Ok(Some(vec![event.reply_error(NOT_SET_UP)]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Messages older than **{}** hours will no longer be posted.",
            hours
        ))]))
    }
}

struct RemoveStarboard;

#[async_trait]
impl Command for RemoveStarboard {
    fn name(&self) -> &str {
        "Remove"
    }

    fn help(&self) -> &str {
        "Removes the starboard and its settings."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let had_channel = event.db().remove_channel(guild.id, ChannelType::Starboard)?;
        let had_settings = event.db().remove_starboard(guild.id)?;
        if !had_channel && !had_settings {
            return Ok(Some(vec![event.reply_error(NOT_SET_UP)]));
        }
        Ok(Some(vec![event.reply_success("Removed the starboard.")]))
    }
}
