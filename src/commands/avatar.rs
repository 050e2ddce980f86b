use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{Command, CommandResult};

pub struct AvatarCommand;

#[async_trait]
impl Command for AvatarCommand {
    fn name(&self) -> &str {
        "Avatar"
    }

    fn aliases(&self) -> &[&str] {
        &["avy", "pfp"]
    }

    fn arguments(&self) -> &str {
        "<@User>"
    }

    fn help(&self) -> &str {
        "Gets the avatar of a mentioned user, or your own."
    }

    fn guild_only(&self) -> bool {
        false
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let user = event.ctx.mentions.first().unwrap_or(&event.ctx.author);
        Ok(Some(vec![event.reply(format!(
            "Avatar of **{}**: {}",
            user.name, user.avatar_url
        ))]))
    }
}
