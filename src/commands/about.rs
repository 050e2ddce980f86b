use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{AutoCooldown, Command, CommandResult, CooldownScope};
use crate::util::format_duration;

pub struct AboutCommand;

#[async_trait]
impl Command for AboutCommand {
    fn name(&self) -> &str {
        "About"
    }

    fn help(&self) -> &str {
        "Gets info about the bot."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn cooldown(&self) -> u64 {
        10
    }

    fn cooldown_scope(&self) -> CooldownScope {
        CooldownScope::UserChannel
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        AutoCooldown::After
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let client = event.client;
        let mut text = format!(
            "Hello! I am **NightFury**, a bot for guild configuration, tags and self-assignable roles.\n\
             Type `{}help` to see my commands!\n\n\
             **Uptime:** {}\n\
             **Guilds:** {}\n\
             **Commands:** {}\n\
             **Commands run:** {}",
            event.prefix(),
            format_duration(client.uptime_secs()),
            client.guild_count(),
            client.commands().len(),
            client.total_uses()
        );
        if !event.config().bot.support_server.is_empty() {
            text.push_str(&format!(
                "\n\nNeed help? Join my support server: {}",
                event.config().bot.support_server
            ));
        }
        Ok(Some(vec![event.reply(text)]))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{full_client, guild_ctx, texts, WARNING};

    #[tokio::test]
    async fn test_about_reports_counts_and_cools_down() {
        let client = full_client();
        client.set_guild_count(3);
        client.on_message(&guild_ctx(5, "|ping")).await;

        let out = texts(&client.on_message(&guild_ctx(5, "|about")).await);
        assert!(out[0].contains("**Guilds:** 3"));
        assert!(out[0].contains("**Commands run:** 1"));
        assert!(out[0].contains("https://discord.gg/example"));

        let out = texts(&client.on_message(&guild_ctx(5, "|about")).await);
        assert!(out[0].starts_with(WARNING));
        assert!(out[0].ends_with("in this channel!"));
    }
}
