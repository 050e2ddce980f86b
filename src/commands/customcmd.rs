use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{split_first, ArgsRequired, Category, Command, CommandResult};

const MAX_NAME_LEN: usize = 50;
const MAX_CONTENT_LEN: usize = 1900;

pub struct CustomCommandCommand {
    children: Vec<Box<dyn Command>>,
}

impl CustomCommandCommand {
    pub fn new() -> Self {
        Self {
            children: vec![
                Box::new(AddCustomCommand),
                Box::new(RemoveCustomCommand),
                Box::new(ListCustomCommands),
            ],
        }
    }
}

#[async_trait]
impl Command for CustomCommandCommand {
    fn name(&self) -> &str {
        "CustomCmd"
    }

    fn aliases(&self) -> &[&str] {
        &["cc"]
    }

    fn arguments(&self) -> &str {
        "[Function]"
    }

    fn help(&self) -> &str {
        "Manages the custom commands of this server."
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

struct AddCustomCommand;

#[async_trait]
impl Command for AddCustomCommand {
    fn name(&self) -> &str {
        "Add"
    }

    fn aliases(&self) -> &[&str] {
        &["create"]
    }

    fn arguments(&self) -> &str {
        "[Name] [Content]"
    }

    fn help(&self) -> &str {
        "Adds a custom command. The content is rendered like a tag."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Message("Specify a name and the content of the custom command.")
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let (name, content) = split_first(&event.args);
        if content.is_empty() {
            return Ok(Some(vec![
                event.reply_error("Specify the content of the custom command."),
            ]));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Ok(Some(vec![event.reply_error(format!(
                "Custom command names cannot be longer than {} characters!",
                MAX_NAME_LEN
            ))]));
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Ok(Some(vec![event.reply_error(format!(
                "Custom command content cannot be longer than {} characters!",
                MAX_CONTENT_LEN
            ))]));
        }
        if event.client.commands().contains(name) {
            return Ok(Some(vec![event.reply_error(format!(
                "\"{}\" is already the name of a command!",
                name
            ))]));
        }
        if !event.db().add_custom_command(guild.id, name, content)? {
            return Ok(Some(vec![event.reply_error(format!(
                "A custom command named \"{}\" already exists!",
                name
            ))]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Successfully created custom command \"{}\"!",
            name
        ))]))
    }
}

struct RemoveCustomCommand;

#[async_trait]
impl Command for RemoveCustomCommand {
    fn name(&self) -> &str {
        "Remove"
    }

    fn aliases(&self) -> &[&str] {
        &["delete"]
    }

    fn arguments(&self) -> &str {
        "[Name]"
    }

    fn help(&self) -> &str {
        "Removes a custom command."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let name = event.args.as_str();
        if !event.db().remove_custom_command(guild.id, name)? {
            return Ok(Some(vec![event.reply_error(format!(
                "No custom command named \"{}\" exists!",
                name
            ))]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Successfully removed custom command \"{}\"!",
            name
        ))]))
    }
}

struct ListCustomCommands;

#[async_trait]
impl Command for ListCustomCommands {
    fn name(&self) -> &str {
        "List"
    }

    fn help(&self) -> &str {
        "Lists the custom commands of this server."
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let names = event.db().get_custom_command_names(guild.id)?;
        if names.is_empty() {
            return Ok(Some(vec![
                event.reply_warning("There are no custom commands on this server!"),
            ]));
        }
        let list = names
            .iter()
            .map(|n| format!("`{}`", n))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Some(vec![event.reply_success(format!(
            "Custom commands on **{}**:\n{}",
            guild.name, list
        ))]))
    }
}
