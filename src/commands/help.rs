use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{Category, Command, CommandResult};

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "Help"
    }

    fn help(&self) -> &str {
        "Gets a list of all commands."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn has_adjustable_level(&self) -> bool {
        false
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let client = event.client;
        let prefix = event.prefix();
        let mut text = String::from("**NightFury** Commands:\n");
        let mut current: Option<Option<Category>> = None;

        for command in client.commands().iter() {
            if command.dev_only() && !event.is_dev() {
                continue;
            }
            if let Some(guild) = event.guild() {
                let fullname = command.name().to_lowercase();
                if !client.effective_level(command, guild.id, &fullname).test(event) {
                    continue;
                }
            }
            if current != Some(command.category()) {
                let title = command.category().map(|c| c.title()).unwrap_or("Standard");
                if current.is_some() {
                    text.push('\n');
                }
                text.push_str(&format!("\n__{} Commands__\n", title));
                current = Some(command.category());
            }
            text.push_str(&format!("\n`{}{}", prefix, command.name().to_lowercase()));
            if !command.arguments().is_empty() {
                text.push(' ');
                text.push_str(command.arguments());
            }
            text.push_str(&format!("` - {}", command.help()));
        }

        text.push_str(&format!(
            "\n\nFor more information on a command, use `{}[command] help`",
            prefix
        ));
        if !event.config().bot.support_server.is_empty() {
            text.push_str(&format!(
                "\nFor additional help, join my support server {}",
                event.config().bot.support_server
            ));
        }

        let mut responses = vec![event.reply_in_dm(text)];
        if event.guild().is_some() {
            responses.push(event.react_success());
        }
        Ok(Some(responses))
    }
}
