use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{Category, Command, CommandResult};
use crate::message::Response;
use crate::util::parse_snowflake;

pub struct WhitelistCommand {
    children: Vec<Box<dyn Command>>,
}

impl WhitelistCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(AddWhitelist), Box::new(RemoveWhitelist)],
        }
    }
}

#[async_trait]
impl Command for WhitelistCommand {
    fn name(&self) -> &str {
        "Whitelist"
    }

    fn arguments(&self) -> &str {
        "<Guild ID>"
    }

    fn help(&self) -> &str {
        "Shows whether a guild may use music commands."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Developer)
    }

    fn dev_only(&self) -> bool {
        true
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn has_adjustable_level(&self) -> bool {
        false
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild_id = match target_guild(event) {
            Ok(id) => id,
            Err(reply) => return Ok(Some(vec![reply])),
        };
        let text = if event.db().is_music_whitelisted(guild_id)? {
            format!("Guild `{}` is whitelisted for music.", guild_id)
        } else {
            format!("Guild `{}` is not whitelisted for music.", guild_id)
        };
        Ok(Some(vec![event.reply_success(text)]))
    }
}

/// The guild named in the arguments, else the guild the command ran in.
fn target_guild(event: &CommandEvent<'_>) -> Result<u64, Response> {
    if event.args.is_empty() {
        return event
            .ctx
            .guild_id()
            .ok_or_else(|| event.reply_error("Specify a guild ID."));
    }
    parse_snowflake(&event.args)
        .ok_or_else(|| event.reply_error(format!("\"{}\" is not a valid guild ID!", event.args)))
}

struct AddWhitelist;

#[async_trait]
impl Command for AddWhitelist {
    fn name(&self) -> &str {
        "Add"
    }

    fn arguments(&self) -> &str {
        "<Guild ID>"
    }

    fn help(&self) -> &str {
        "Allows a guild to use music commands."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Developer)
    }

    fn dev_only(&self) -> bool {
        true
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn has_adjustable_level(&self) -> bool {
        false
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild_id = match target_guild(event) {
            Ok(id) => id,
            Err(reply) => return Ok(Some(vec![reply])),
        };
        if !event.db().add_music_whitelist(guild_id)? {
            return Ok(Some(vec![event.reply_warning(format!(
                "Guild `{}` is already whitelisted for music.",
                guild_id
            ))]));
        }
        log::info!("Guild {} whitelisted for music", guild_id);
        Ok(Some(vec![event.reply_success(format!(
            "Whitelisted guild `{}` for music.",
            guild_id
        ))]))
    }
}

struct RemoveWhitelist;

#[async_trait]
impl Command for RemoveWhitelist {
    fn name(&self) -> &str {
        "Remove"
    }

    fn arguments(&self) -> &str {
        "<Guild ID>"
    }

    fn help(&self) -> &str {
        "Stops a guild from using music commands."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Developer)
    }

    fn dev_only(&self) -> bool {
        true
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn has_adjustable_level(&self) -> bool {
        false
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild_id = match target_guild(event) {
            Ok(id) => id,
            Err(reply) => return Ok(Some(vec![reply])),
        };
        if !event.db().remove_music_whitelist(guild_id)? {
            return Ok(Some(vec![event.reply_warning(format!(
                "Guild `{}` is not whitelisted for music.",
                guild_id
            ))]));
        }
        log::info!("Guild {} removed from the music whitelist", guild_id);
        Ok(Some(vec![event.reply_success(format!(
            "Removed guild `{}` from the music whitelist.",
            guild_id
        ))]))
    }
}
