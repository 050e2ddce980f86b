use chrono::{DateTime, Utc};
use serenity::all::Permissions;

#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: u64,
    pub name: String,
    pub discriminator: Option<u16>,
    pub avatar_url: String,
    pub bot: bool,
}

impl UserInfo {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct RoleInfo {
    pub id: u64,
    pub name: String,
}

/// Guild-side view of an incoming message: the guild itself plus what the
/// author and the bot are allowed to do in the channel.
#[derive(Debug, Clone)]
pub struct GuildContext {
    pub id: u64,
    pub name: String,
    pub owner_id: u64,
    pub member_count: u64,
    pub roles: Vec<RoleInfo>,
    /// Role ids held by the message author
    pub member_roles: Vec<u64>,
    pub nickname: Option<String>,
    pub member_permissions: Permissions,
    pub self_permissions: Permissions,
}

impl GuildContext {
    pub fn role(&self, id: u64) -> Option<&RoleInfo> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn member_has_role(&self, id: u64) -> bool {
        self.member_roles.contains(&id)
    }
}

#[derive(Debug, Clone)]
pub struct MessageContext {
    pub message_id: u64,
    pub author: UserInfo,
    pub channel_id: u64,
    pub channel_name: String,
    pub nsfw: bool,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub mentions: Vec<UserInfo>,
    pub guild: Option<GuildContext>,
}

impl MessageContext {
    pub fn is_guild(&self) -> bool {
        self.guild.is_some()
    }

    pub fn guild_id(&self) -> Option<u64> {
        self.guild.as_ref().map(|g| g.id)
    }
}

/// An action the gateway adapter performs on behalf of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Text sent to the channel the command came from
    Reply(String),
    /// Text sent to the author's direct messages
    Direct(String),
    /// Reaction added to the invoking message
    React(String),
    /// Role granted to the author
    GrantRole(u64),
    /// Role revoked from the author
    RevokeRole(u64),
}

impl Response {
    pub fn text(&self) -> Option<&str> {
        match self {
            Response::Reply(text) | Response::Direct(text) => Some(text),
            _ => None,
        }
    }
}
