//! Fixtures shared by the test modules.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serenity::all::Permissions;

use crate::client::Client;
use crate::command::CommandIndex;
use crate::config::{BotConfig, Config};
use crate::db::Db;
use crate::message::{GuildContext, MessageContext, RoleInfo, UserInfo};

pub const DEV_ID: u64 = 1;
pub const OWNER_ID: u64 = 2;
pub const GUILD_ID: u64 = 500;
pub const CHANNEL_ID: u64 = 600;
pub const DM_CHANNEL_ID: u64 = 700;

pub const RED: u64 = 100;
pub const BLUE: u64 = 101;
pub const GAMER: u64 = 102;
pub const MODS: u64 = 103;

pub const SUCCESS: &str = "\u{1F432}";
pub const WARNING: &str = "\u{1F422}";
pub const ERROR: &str = "\u{1F525}";

pub fn test_config() -> Config {
    Config {
        bot: BotConfig {
            token: "token".to_string(),
            prefix: "|".to_string(),
            dev_id: DEV_ID,
            db_path: ":memory:".to_string(),
            success_emoji: SUCCESS.to_string(),
            warning_emoji: WARNING.to_string(),
            error_emoji: ERROR.to_string(),
            support_server: "https://discord.gg/example".to_string(),
            rate_limit_commands: 0,
            rate_limit_window_secs: 10,
        },
        commands: HashMap::new(),
    }
}

pub fn test_client(commands: CommandIndex) -> Client {
    let db = Arc::new(Db::open(Path::new(":memory:")).unwrap());
    Client::new(Arc::new(test_config()), db, commands)
}

/// Client with every command group registered.
pub fn full_client() -> Client {
    let config = test_config();
    let commands = crate::commands::build_index(&config);
    let db = Arc::new(Db::open(Path::new(":memory:")).unwrap());
    Client::new(Arc::new(config), db, commands)
}

pub fn user(id: u64) -> UserInfo {
    UserInfo {
        id,
        name: format!("user{}", id),
        discriminator: None,
        avatar_url: format!("https://cdn.discordapp.com/avatars/{}/a.png", id),
        bot: false,
    }
}

fn role(id: u64, name: &str) -> RoleInfo {
    RoleInfo {
        id,
        name: name.to_string(),
    }
}

pub fn guild_ctx(author: u64, content: &str) -> MessageContext {
    MessageContext {
        message_id: 9000,
        author: user(author),
        channel_id: CHANNEL_ID,
        channel_name: "general".to_string(),
        nsfw: false,
        created_at: Utc::now(),
        content: content.to_string(),
        mentions: Vec::new(),
        guild: Some(GuildContext {
            id: GUILD_ID,
            name: "Dragons".to_string(),
            owner_id: OWNER_ID,
            member_count: 42,
            roles: vec![
                role(RED, "Red"),
                role(BLUE, "Blue"),
                role(GAMER, "Gamer"),
                role(MODS, "Mods"),
            ],
            member_roles: Vec::new(),
            nickname: None,
            member_permissions: Permissions::empty(),
            self_permissions: Permissions::all(),
        }),
    }
}

/// Guild message from a member holding `ADMINISTRATOR`.
pub fn admin_ctx(author: u64, content: &str) -> MessageContext {
    let mut ctx = guild_ctx(author, content);
    if let Some(guild) = ctx.guild.as_mut() {
        guild.member_permissions = Permissions::ADMINISTRATOR;
    }
    ctx
}

pub fn dm_ctx(author: u64, content: &str) -> MessageContext {
    MessageContext {
        message_id: 9001,
        author: user(author),
        channel_id: DM_CHANNEL_ID,
        channel_name: String::new(),
        nsfw: false,
        created_at: Utc::now(),
        content: content.to_string(),
        mentions: Vec::new(),
        guild: None,
    }
}

/// Text of every reply-like response, in order.
pub fn texts(responses: &[crate::message::Response]) -> Vec<String> {
    responses
        .iter()
        .filter_map(|r| r.text().map(str::to_string))
        .collect()
}
