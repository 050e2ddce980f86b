use async_trait::async_trait;

use super::info::BULLET;
use crate::client::CommandEvent;
use crate::command::{AutoCooldown, Category, Command, CommandResult, CooldownScope};
use crate::db::{ChannelType, RoleType};
use crate::util::snowflake_time;

pub struct ServerCommand {
    children: Vec<Box<dyn Command>>,
}

impl ServerCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(ServerSettings)],
        }
    }
}

#[async_trait]
impl Command for ServerCommand {
    fn name(&self) -> &str {
        "Server"
    }

    fn aliases(&self) -> &[&str] {
        &["guild"]
    }

    fn arguments(&self) -> &str {
        "<Info Category>"
    }

    fn help(&self) -> &str {
        "Gets info on the server."
    }

    fn cooldown(&self) -> u64 {
        10
    }

    fn cooldown_scope(&self) -> CooldownScope {
        CooldownScope::UserGuild
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        AutoCooldown::After
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        if !event.args.is_empty() {
            return Ok(Some(vec![event.reply_error(format!(
                "**Invalid Information Category**\nUse `{}{} help` for more information on this command!",
                event.prefix(),
                event.fullname
            ))]));
        }
        let guild = event.require_guild()?;
        let text = format!(
            "\u{2139} __Information on **{name}**:__\n\
             {b}**ID:** {id}\n\
             {b}**Owner:** <@{owner}>\n\
             {b}**Members:** {members}\n\
             {b}**Roles:** {roles}\n\
             {b}**Creation Date:** {created}",
            name = guild.name,
            id = guild.id,
            owner = guild.owner_id,
            members = guild.member_count,
            roles = guild.roles.len(),
            created = snowflake_time(guild.id).format("%Y-%m-%d"),
            b = BULLET
        );
        Ok(Some(vec![event.reply(text)]))
    }
}

struct ServerSettings;

#[async_trait]
impl Command for ServerSettings {
    fn name(&self) -> &str {
        "Settings"
    }

    fn aliases(&self) -> &[&str] {
        &["config", "configurations"]
    }

    fn help(&self) -> &str {
        "Get info on the server's settings."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Moderator)
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let db = event.db();

        let mut prefixes = vec![format!("`{}`", event.prefix())];
        prefixes.extend(db.get_prefixes(guild.id)?.iter().map(|p| format!("`{}`", p)));
        let moderator = db
            .get_single_role(guild.id, RoleType::Moderator)?
            .and_then(|id| guild.role(id))
            .map_or_else(|| "None".to_string(), |role| role.name.clone());
        let welcome = db
            .get_welcome(guild.id)?
            .map_or_else(|| "None".to_string(), |w| format!("<#{}>", w.channel_id));
        let starboard = db
            .get_channel(guild.id, ChannelType::Starboard)?
            .map_or_else(|| "None".to_string(), |id| format!("<#{}>", id));
        let role_persist = if db.is_role_persist(guild.id)? { "ON" } else { "OFF" };

        Ok(Some(vec![event.reply(format!(
            "__Settings for **{}** (ID: {})__\n\
             **Prefixes:** {}\n\
             **Moderator Role:** {}\n\
             **Welcome Channel:** {}\n\
             **Starboard:** {}\n\
             **RolePersist:** {}",
            guild.name,
            guild.id,
            prefixes.join(", "),
            moderator,
            welcome,
            starboard,
            role_persist
        ))]))
    }
}
