use async_trait::async_trait;
use chrono::Utc;

use crate::client::CommandEvent;
use crate::command::{Command, CommandResult};

pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    fn name(&self) -> &str {
        "Ping"
    }

    fn aliases(&self) -> &[&str] {
        &["pong"]
    }

    fn help(&self) -> &str {
        "Checks the bot's latency."
    }

    fn guild_only(&self) -> bool {
        false
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let latency = (Utc::now() - event.ctx.created_at).num_milliseconds().max(0);
        Ok(Some(vec![event.reply(format!("Pong! {}ms", latency))]))
    }
}
