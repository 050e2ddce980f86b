use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{ArgsRequired, Category, Command, CommandResult};

const MAX_PREFIX_LEN: usize = 50;

pub struct PrefixCommand {
    children: Vec<Box<dyn Command>>,
}

impl PrefixCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(AddPrefix), Box::new(RemovePrefix), Box::new(ListPrefixes)],
        }
    }
}

#[async_trait]
impl Command for PrefixCommand {
    fn name(&self) -> &str {
        "Prefix"
    }

    fn arguments(&self) -> &str {
        "[Function]"
    }

    fn help(&self) -> &str {
        "Manages the custom prefixes of this server."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        Ok(Some(vec![event.reply_error(format!(
            "\"{}\" is not a valid function! Use `{}{} help` for more information on this command!",
            event.args,
            event.prefix(),
            event.fullname
        ))]))
    }
}

struct AddPrefix;

#[async_trait]
impl Command for AddPrefix {
    fn name(&self) -> &str {
        "Add"
    }

    fn arguments(&self) -> &str {
        "[Prefix]"
    }

    fn help(&self) -> &str {
        "Adds a custom prefix for this server."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let prefix = event.args.as_str();
        if prefix.chars().count() > MAX_PREFIX_LEN {
            return Ok(Some(vec![event.reply_error(format!(
                "Prefixes cannot be longer than {} characters!",
                MAX_PREFIX_LEN
            ))]));
        }
        if prefix.eq_ignore_ascii_case(event.prefix()) {
            return Ok(Some(vec![event.reply_error(format!(
                "`{}` is already the default prefix!",
                event.prefix()
            ))]));
        }
        if !event.db().add_prefix(guild.id, prefix)? {
            return Ok(Some(vec![event.reply_error(format!(
                "`{}` is already a custom prefix for this server!",
                prefix
            ))]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Added `{}` as a custom prefix!",
            prefix
        ))]))
    }
}

struct RemovePrefix;

#[async_trait]
impl Command for RemovePrefix {
    fn name(&self) -> &str {
        "Remove"
    }

    fn arguments(&self) -> &str {
        "[Prefix]"
    }

    fn help(&self) -> &str {
        "Removes a custom prefix from this server."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let prefix = event.args.as_str();
        if prefix.eq_ignore_ascii_case(event.prefix()) {
            return Ok(Some(vec![
                event.reply_error("The default prefix cannot be removed!"),
            ]));
        }
        if !event.db().remove_prefix(guild.id, prefix)? {
            return Ok(Some(vec![event.reply_error(format!(
                "`{}` is not a custom prefix for this server!",
                prefix
            ))]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Removed `{}` from the custom prefixes!",
            prefix
        ))]))
    }
}

struct ListPrefixes;

#[async_trait]
impl Command for ListPrefixes {
    fn name(&self) -> &str {
        "List"
    }

    fn help(&self) -> &str {
        "Lists the prefixes usable on this server."
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let mut text = format!("Prefixes on **{}**:\n`{}` (default)", guild.name, event.prefix());
        for prefix in event.db().get_prefixes(guild.id)? {
            text.push_str(&format!("\n`{}`", prefix));
        }
        Ok(Some(vec![event.reply_success(text)]))
    }
}
