use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{ArgsRequired, Category, Command, CommandLevel, CommandResult};

pub struct LevelCommand {
    children: Vec<Box<dyn Command>>,
}

impl LevelCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(SetLevel), Box::new(ResetLevel)],
        }
    }
}

#[async_trait]
impl Command for LevelCommand {
    fn name(&self) -> &str {
        "Level"
    }

    fn arguments(&self) -> &str {
        "[Command]"
    }

    fn help(&self) -> &str {
        "Shows the level a command runs at on this server."
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
        let guild = event.require_guild()?;
        let (command, fullname) = match event.client.commands().search(&event.args) {
            Some(found) => found,
            None => return Ok(Some(vec![no_command(event)])),
        };
        let level = event.client.effective_level(command, guild.id, &fullname);
        Ok(Some(vec![event.reply_success(format!(
            "**{}** runs at the **{}** level on this server.",
            fullname,
            level.title()
        ))]))
    }
}

fn no_command(event: &CommandEvent<'_>) -> crate::message::Response {
    event.reply_error(format!("No command found matching \"{}\"!", event.args))
}

struct SetLevel;

#[async_trait]
impl Command for SetLevel {
    fn name(&self) -> &str {
        "Set"
    }

    fn arguments(&self) -> &str {
        "[Command] [Level]"
    }

    fn help(&self) -> &str {
        "Sets the level of a command. Levels: owner, admin, mod, all."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Message("Specify a command and a level.")
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let (query, level) = match event.args.rsplit_once(char::is_whitespace) {
            Some((query, level)) => (query.trim(), level),
            None => {
                return Ok(Some(vec![event.reply_error("Specify a command and a level.")]));
            }
        };
        let level = match CommandLevel::from_arguments(level) {
            Some(level) => level,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "\"{}\" is not a valid level! Valid levels are: owner, admin, mod, all.",
                    level
                ))]))
            }
        };
        let (command, fullname) = match event.client.commands().search(query) {
            Some(found) => found,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "No command found matching \"{}\"!",
                    query
                ))]))
            }
        };
        if !command.has_adjustable_level() {
            return Ok(Some(vec![event.reply_error(format!(
                "The level of **{}** cannot be changed!",
                fullname
            ))]));
        }

        let default = command.default_level();
        if level.rank() > default.rank() {
            return Ok(Some(vec![event.reply_error(format!(
                "The level of **{}** cannot be set lower than **{}**!",
                fullname,
                default.title()
            ))]));
        }

        let stored = if level == default { None } else { Some(level) };
        event.db().set_command_level(guild.id, &fullname, stored)?;
        Ok(Some(vec![event.reply_success(format!(
            "Set the level of **{}** to **{}**.",
            fullname,
            level.title()
        ))]))
    }
}

struct ResetLevel;

#[async_trait]
impl Command for ResetLevel {
    fn name(&self) -> &str {
        "Reset"
    }

    fn arguments(&self) -> &str {
        "[Command]"
    }

    fn help(&self) -> &str {
        "Resets a command to its default level."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let (command, fullname) = match event.client.commands().search(&event.args) {
            Some(found) => found,
            None => return Ok(Some(vec![no_command(event)])),
        };
        if !command.has_adjustable_level() {
            return Ok(Some(vec![event.reply_error(format!(
                "The level of **{}** cannot be changed!",
                fullname
            ))]));
        }
        event.db().set_command_level(guild.id, &fullname, None)?;
        Ok(Some(vec![event.reply_success(format!(
            "Reset the level of **{}** to **{}**.",
            fullname,
            command.default_level().title()
        ))]))
    }
}
