use std::collections::HashMap;

use async_trait::async_trait;
use serenity::all::Permissions;

use crate::client::CommandEvent;
use crate::db::{logged_or, RoleType};
use crate::message::{MessageContext, Response};

pub type CommandResult = Result<Option<Vec<Response>>, Box<dyn std::error::Error + Send + Sync>>;

/// Grouping of commands. The first four form a hierarchy where each includes
/// everyone above it; the rest stop a run outright when their check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Developer,
    ServerOwner,
    Administrator,
    Moderator,
    Music,
    Nsfw,
}

impl Category {
    pub fn title(&self) -> &'static str {
        match self {
            Category::Developer => "Developer",
            Category::ServerOwner => "Server Owner",
            Category::Administrator => "Administrator",
            Category::Moderator => "Moderator",
            Category::Music => "Music",
            Category::Nsfw => "NSFW",
        }
    }

    pub fn can_stop_run(&self) -> bool {
        matches!(self, Category::Music | Category::Nsfw)
    }

    pub fn test(&self, event: &CommandEvent<'_>) -> bool {
        match self {
            Category::Music => {
                event.is_dev()
                    || event.ctx.guild_id().is_some_and(|guild_id| {
                        logged_or(
                            event.db().is_music_whitelisted(guild_id),
                            false,
                            "music whitelist lookup",
                        )
                    })
            }
            Category::Nsfw => event.is_dev() || event.ctx.nsfw,
            _ => CommandLevel::from_category(Some(*self)).test(event),
        }
    }
}

/// Who may run a command in a guild. Lower rank is more restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLevel {
    Developer,
    ServerOwner,
    Administrator,
    Moderator,
    Standard,
}

impl CommandLevel {
    pub fn rank(&self) -> u8 {
        match self {
            CommandLevel::Developer => 1,
            CommandLevel::ServerOwner => 2,
            CommandLevel::Administrator => 3,
            CommandLevel::Moderator => 4,
            CommandLevel::Standard => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CommandLevel::Developer => "Developer",
            CommandLevel::ServerOwner => "Server Owner",
            CommandLevel::Administrator => "Administrator",
            CommandLevel::Moderator => "Moderator",
            CommandLevel::Standard => "Standard",
        }
    }

    /// Stored form in `command_settings.level`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandLevel::Developer => "DEVELOPER",
            CommandLevel::ServerOwner => "SERVER_OWNER",
            CommandLevel::Administrator => "ADMINISTRATOR",
            CommandLevel::Moderator => "MODERATOR",
            CommandLevel::Standard => "STANDARD",
        }
    }

    pub fn from_stored(s: &str) -> Option<Self> {
        match s {
            "DEVELOPER" => Some(CommandLevel::Developer),
            "SERVER_OWNER" => Some(CommandLevel::ServerOwner),
            "ADMINISTRATOR" => Some(CommandLevel::Administrator),
            "MODERATOR" => Some(CommandLevel::Moderator),
            "STANDARD" => Some(CommandLevel::Standard),
            _ => None,
        }
    }

    /// Levels a guild may assign. `Developer` is never assignable.
    pub fn from_arguments(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "owner" | "server_owner" => Some(CommandLevel::ServerOwner),
            "admin" | "admins" | "administrator" => Some(CommandLevel::Administrator),
            "mod" | "mods" | "moderator" => Some(CommandLevel::Moderator),
            "all" | "standard" | "public" => Some(CommandLevel::Standard),
            _ => None,
        }
    }

    pub fn from_category(category: Option<Category>) -> Self {
        match category {
            Some(Category::Developer) => CommandLevel::Developer,
            Some(Category::ServerOwner) => CommandLevel::ServerOwner,
            Some(Category::Administrator) => CommandLevel::Administrator,
            Some(Category::Moderator) => CommandLevel::Moderator,
            Some(Category::Music) | Some(Category::Nsfw) | None => CommandLevel::Standard,
        }
    }

    pub fn test(&self, event: &CommandEvent<'_>) -> bool {
        let guild = event.ctx.guild.as_ref();
        match self {
            CommandLevel::Developer => event.is_dev(),
            CommandLevel::ServerOwner => {
                CommandLevel::Developer.test(event)
                    || guild.is_some_and(|g| g.owner_id == event.ctx.author.id)
            }
            CommandLevel::Administrator => {
                CommandLevel::ServerOwner.test(event)
                    || guild.is_some_and(|g| g.member_permissions.contains(Permissions::ADMINISTRATOR))
            }
            CommandLevel::Moderator => {
                CommandLevel::Administrator.test(event)
                    || guild.is_some_and(|g| {
                        logged_or(
                            event.db().get_single_role(g.id, RoleType::Moderator),
                            None,
                            "moderator role lookup",
                        )
                        .is_some_and(|role| g.member_has_role(role))
                    })
            }
            CommandLevel::Standard => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownScope {
    User,
    Channel,
    UserChannel,
    Guild,
    UserGuild,
    Global,
}

impl CooldownScope {
    /// Guild scopes have no meaning in direct messages and fall back to
    /// their channel counterparts.
    pub fn resolve(self, in_guild: bool) -> Self {
        match (self, in_guild) {
            (CooldownScope::UserGuild, false) => CooldownScope::UserChannel,
            (CooldownScope::Guild, false) => CooldownScope::Channel,
            (scope, _) => scope,
        }
    }

    pub fn suffix(self, in_guild: bool) -> &'static str {
        match self.resolve(in_guild) {
            CooldownScope::User => "",
            CooldownScope::Channel | CooldownScope::UserChannel => "in this channel",
            CooldownScope::Guild | CooldownScope::UserGuild => "in this server",
            CooldownScope::Global => "globally",
        }
    }

    pub fn key(self, name: &str, ctx: &MessageContext) -> String {
        let user = ctx.author.id;
        let channel = ctx.channel_id;
        let scope = match (self.resolve(ctx.is_guild()), ctx.guild_id()) {
            (CooldownScope::User, _) => format!("U:{}", user),
            (CooldownScope::Channel, _) => format!("C:{}", channel),
            (CooldownScope::UserChannel, _) => format!("U:{}|C:{}", user, channel),
            (CooldownScope::Guild, Some(guild)) => format!("G:{}", guild),
            (CooldownScope::UserGuild, Some(guild)) => format!("U:{}|G:{}", user, guild),
            (CooldownScope::Global, _) => "Global".to_string(),
            (CooldownScope::Guild, None) => format!("C:{}", channel),
            (CooldownScope::UserGuild, None) => format!("U:{}|C:{}", user, channel),
        };
        format!("{}|{}", name, scope)
    }
}

/// When the pipeline applies a command's cooldown on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoCooldown {
    Off,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgsRequired {
    No,
    Default,
    Message(&'static str),
}

#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn arguments(&self) -> &str {
        ""
    }

    fn help(&self) -> &str {
        "No help available."
    }

    fn category(&self) -> Option<Category> {
        None
    }

    fn dev_only(&self) -> bool {
        false
    }

    fn guild_only(&self) -> bool {
        true
    }

    fn bot_permissions(&self) -> Permissions {
        Permissions::empty()
    }

    fn user_permissions(&self) -> Permissions {
        Permissions::empty()
    }

    fn cooldown(&self) -> u64 {
        0
    }

    fn cooldown_scope(&self) -> CooldownScope {
        CooldownScope::UserGuild
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        AutoCooldown::Off
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::No
    }

    fn has_adjustable_level(&self) -> bool {
        true
    }

    fn default_level(&self) -> CommandLevel {
        CommandLevel::from_category(self.category())
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &[]
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult;
}

pub fn is_for_command(command: &dyn Command, name: &str) -> bool {
    command.name().eq_ignore_ascii_case(name)
        || command.aliases().iter().any(|a| a.eq_ignore_ascii_case(name))
}

/// Split off the first whitespace-delimited token.
pub fn split_first(args: &str) -> (&str, &str) {
    let args = args.trim();
    match args.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (args, ""),
    }
}

/// Resolve `args` down the child tree of `command`, returning the command and
/// its full name. The command itself is returned when it has no children or
/// `args` is empty; `None` when a token names no child.
pub fn find_child<'a>(
    command: &'a dyn Command,
    fullname: &str,
    args: &str,
) -> Option<(&'a dyn Command, String)> {
    if command.children().is_empty() || args.trim().is_empty() {
        return Some((command, fullname.to_string()));
    }
    let (first, rest) = split_first(args);
    let child = command
        .children()
        .iter()
        .find(|c| is_for_command(c.as_ref(), first))?;
    let child_name = format!("{} {}", fullname, child.name().to_lowercase());
    find_child(child.as_ref(), &child_name, rest)
}

/// Case-insensitive name and alias lookup over the registered commands,
/// kept in registration order.
pub struct CommandIndex {
    commands: Vec<Box<dyn Command>>,
    names: HashMap<String, usize>,
}

impl CommandIndex {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn register(&mut self, command: Box<dyn Command>) {
        log::info!("Registered command: {}", command.name());
        let index = self.commands.len();
        let keys = std::iter::once(command.name()).chain(command.aliases().iter().copied());
        for key in keys {
            if self.names.insert(key.to_lowercase(), index).is_some() {
                log::warn!("Command name or alias '{}' registered twice", key);
            }
        }
        self.commands.push(command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.names
            .get(&name.to_lowercase())
            .map(|&i| self.commands[i].as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Resolve a space separated command path such as `tag create`.
    pub fn search(&self, query: &str) -> Option<(&dyn Command, String)> {
        let (first, rest) = split_first(query);
        let command = self.get(first)?;
        find_child(command, &command.name().to_lowercase(), rest)
    }
}
