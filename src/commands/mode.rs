use async_trait::async_trait;

use crate::client::{ClientMode, CommandEvent};
use crate::command::{Category, Command, CommandResult};

pub struct ModeCommand;

#[async_trait]
impl Command for ModeCommand {
    fn name(&self) -> &str {
        "Mode"
    }

    fn arguments(&self) -> &str {
        "<Service|Idle|Debug>"
    }

    fn help(&self) -> &str {
        "Shows or changes the operating mode of the bot."
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
        if event.args.is_empty() {
            return Ok(Some(vec![event.reply_success(format!(
                "Currently running in **{}** mode.",
                event.client.mode().name()
            ))]));
        }
        let mode = match ClientMode::from_str(&event.args) {
            Some(mode) => mode,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "\"{}\" is not a valid mode! Valid modes are: service, idle, debug.",
                    event.args
                ))]))
            }
        };
        if mode == event.client.mode() {
            return Ok(Some(vec![event.reply_warning(format!(
                "Already running in **{}** mode.",
                mode.name()
            ))]));
        }
        event.client.set_mode(mode);
        Ok(Some(vec![event.reply_success(format!(
            "Now running in **{}** mode.",
            mode.name()
        ))]))
    }
}
