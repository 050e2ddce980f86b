use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{AutoCooldown, Command, CommandResult, CooldownScope};
use crate::message::UserInfo;
use crate::util::snowflake_time;

pub const BULLET: &str = "\u{1F539} ";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct InfoCommand;

#[async_trait]
impl Command for InfoCommand {
    fn name(&self) -> &str {
        "Info"
    }

    fn aliases(&self) -> &[&str] {
        &["i", "information"]
    }

    fn arguments(&self) -> &str {
        "<@User>"
    }

    fn help(&self) -> &str {
        "Gets info on a user."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn cooldown(&self) -> u64 {
        5
    }

    fn cooldown_scope(&self) -> CooldownScope {
        CooldownScope::UserGuild
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        AutoCooldown::After
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let target: &UserInfo = match event.ctx.mentions.first() {
            Some(user) => user,
            None if event.args.is_empty() => &event.ctx.author,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "No users found matching \"{}\"!",
                    event.args
                ))]))
            }
        };

        let icon = if target.bot { "\u{1F916}" } else { "\u{2139}" };
        let mut text = format!("{} __Information on **{}**:__\n", icon, target.name);
        text.push_str(&format!("{}**ID:** {}\n", BULLET, target.id));

        // Member details are only known for the author of the message.
        if let Some(guild) = event.guild().filter(|_| target.id == event.ctx.author.id) {
            if let Some(nickname) = &guild.nickname {
                text.push_str(&format!("{}**Nickname:** {}\n", BULLET, nickname));
            }
            let roles: Vec<String> = guild
                .member_roles
                .iter()
                .filter_map(|id| guild.role(*id))
                .map(|role| format!("`{}`", role.name))
                .collect();
            if !roles.is_empty() {
                let label = if roles.len() > 1 { "Roles" } else { "Role" };
                text.push_str(&format!("{}**{}:** {}\n", BULLET, label, roles.join(", ")));
            }
        }

        text.push_str(&format!(
            "{}**Creation Date:** {}",
            BULLET,
            snowflake_time(target.id).format(DATE_FORMAT)
        ));
        Ok(Some(vec![event.reply(text)]))
    }
}

#[cfg(test)]
mod tests {
    use super::BULLET;
    use crate::testing::{dm_ctx, full_client, guild_ctx, texts, user, BLUE, ERROR, RED, WARNING};

    const ID: u64 = 175928847299117063;

    #[tokio::test]
    async fn test_info_on_author_lists_member_details() {
        let client = full_client();
        let mut ctx = guild_ctx(ID, "|info");
        if let Some(guild) = ctx.guild.as_mut() {
            guild.nickname = Some("Toothless".to_string());
            guild.member_roles = vec![RED, BLUE];
        }
        let out = texts(&client.on_message(&ctx).await);
        assert_eq!(
            out,
            vec![format!(
                "\u{2139} __Information on **user{id}**:__\n\
                 {b}**ID:** {id}\n\
                 {b}**Nickname:** Toothless\n\
                 {b}**Roles:** `Red`, `Blue`\n\
                 {b}**Creation Date:** 2016-04-30",
                id = ID,
                b = BULLET
            )]
        );

        let out = texts(&client.on_message(&ctx).await);
        assert!(out[0].starts_with(WARNING));
    }

    #[tokio::test]
    async fn test_info_on_mentioned_user() {
        let client = full_client();
        let mut ctx = guild_ctx(5, "|i <@9>");
        let mut bot = user(9);
        bot.bot = true;
        ctx.mentions.push(bot);
        let out = texts(&client.on_message(&ctx).await);
        assert!(out[0].starts_with("\u{1F916} __Information on **user9**:__\n"));
        assert!(!out[0].contains("**Role"));

        let out = texts(&client.on_message(&dm_ctx(5, "|information nobody")).await);
        assert_eq!(out, vec![format!("{} No users found matching \"nobody\"!", ERROR)]);
    }
}
