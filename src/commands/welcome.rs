use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{split_first, ArgsRequired, Category, Command, CommandResult};
use crate::util::parse_snowflake;

const MAX_MESSAGE_LEN: usize = 1900;

pub struct WelcomeCommand {
    children: Vec<Box<dyn Command>>,
}

impl WelcomeCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(SetWelcome), Box::new(RemoveWelcome)],
        }
    }
}

#[async_trait]
impl Command for WelcomeCommand {
    fn name(&self) -> &str {
        "Welcome"
    }

    fn arguments(&self) -> &str {
        "<Function>"
    }

    fn help(&self) -> &str {
        "Shows the welcome message sent when a member joins this server."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let text = match event.db().get_welcome(guild.id)? {
            Some(welcome) => event.reply_success(format!(
                "Welcome messages are sent to <#{}>:\n```\n{}\n```",
                welcome.channel_id, welcome.message
            )),
            None => event.reply_warning("No welcome message is set for this server!"),
        };
        Ok(Some(vec![text]))
    }
}

struct SetWelcome;

#[async_trait]
impl Command for SetWelcome {
    fn name(&self) -> &str {
        "Set"
    }

    fn arguments(&self) -> &str {
        "[#Channel] [Message]"
    }

    fn help(&self) -> &str {
        "Sets the channel and message used to welcome new members."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Message("Specify a channel and a welcome message.")
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let (channel, message) = split_first(&event.args);
        let channel_id = match parse_snowflake(channel) {
            Some(id) => id,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "\"{}\" is not a valid channel!",
                    channel
                ))]))
            }
        };
        if message.is_empty() {
            return Ok(Some(vec![event.reply_error("Specify a welcome message.")]));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Ok(Some(vec![event.reply_error(format!(
                "Welcome messages cannot be longer than {} characters!",
                MAX_MESSAGE_LEN
            ))]));
        }
        event.db().set_welcome(guild.id, channel_id, message)?;
        Ok(Some(vec![event.reply_success(format!(
            "New members will be welcomed in <#{}>!",
            channel_id
        ))]))
    }
}

struct RemoveWelcome;

#[async_trait]
impl Command for RemoveWelcome {
    fn name(&self) -> &str {
        "Remove"
    }

    fn help(&self) -> &str {
        "Stops welcoming new members."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        if !event.db().remove_welcome(guild.id)? {
            return Ok(Some(vec![
                event.reply_error("No welcome message is set for this server!"),
            ]));
        }
        Ok(Some(vec![event.reply_success("Removed the welcome message.")]))
    }
}
