use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serenity::all::Permissions;

use super::{Client, ClientMode, CommandEvent, StarredMessage, STAR};
use crate::command::{
    ArgsRequired, AutoCooldown, Category, Command, CommandIndex, CommandResult, CooldownScope,
};
use crate::db::{ChannelType, Db};
use crate::message::Response;
use crate::testing::*;

/// Configurable command used to drive the gate chain.
struct Scripted {
    name: &'static str,
    category: Option<Category>,
    dev_only: bool,
    guild_only: bool,
    bot_permissions: Permissions,
    user_permissions: Permissions,
    cooldown: u64,
    scope: CooldownScope,
    auto: AutoCooldown,
    args: ArgsRequired,
    fail: bool,
    children: Vec<Box<dyn Command>>,
}

impl Scripted {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            category: None,
            dev_only: false,
            guild_only: false,
            bot_permissions: Permissions::empty(),
            user_permissions: Permissions::empty(),
            cooldown: 0,
            scope: CooldownScope::User,
            auto: AutoCooldown::Off,
            args: ArgsRequired::No,
            fail: false,
            children: Vec::new(),
        }
    }
}

#[async_trait]
impl Command for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn arguments(&self) -> &str {
        "<Anything>"
    }

    fn help(&self) -> &str {
        "Echoes its arguments."
    }

    fn category(&self) -> Option<Category> {
        self.category
    }

    fn dev_only(&self) -> bool {
        self.dev_only
    }

    fn guild_only(&self) -> bool {
        self.guild_only
    }

    fn bot_permissions(&self) -> Permissions {
        self.bot_permissions
    }

    fn user_permissions(&self) -> Permissions {
        self.user_permissions
    }

    fn cooldown(&self) -> u64 {
        self.cooldown
    }

    fn cooldown_scope(&self) -> CooldownScope {
        self.scope
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        self.auto
    }

    fn args_required(&self) -> ArgsRequired {
        self.args
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        if self.fail {
            return Err("scripted failure".into());
        }
        Ok(Some(vec![event.reply(format!("{}:{}", event.fullname, event.args))]))
    }
}

fn client_with(commands: Vec<Scripted>) -> Client {
    let mut index = CommandIndex::new();
    for command in commands {
        index.register(Box::new(command));
    }
    test_client(index)
}

#[tokio::test]
async fn test_ignores_bots_and_unprefixed_messages() {
    let client = client_with(vec![Scripted::new("Echo")]);
    let mut ctx = guild_ctx(5, "|echo hi");
    ctx.author.bot = true;
    assert!(client.on_message(&ctx).await.is_empty());
    assert!(client.on_message(&guild_ctx(5, "echo hi")).await.is_empty());
    assert!(client.on_message(&guild_ctx(5, "|")).await.is_empty());
    assert!(client.on_message(&guild_ctx(5, "|nothing")).await.is_empty());
}

#[tokio::test]
async fn test_runs_command_with_args() {
    let client = client_with(vec![Scripted::new("Echo")]);
    let out = texts(&client.on_message(&dm_ctx(5, "|ECHO   some words ")).await);
    assert_eq!(out, vec!["echo:some words".to_string()]);
    assert_eq!(client.uses("echo"), 1);
}

#[tokio::test]
async fn test_descends_into_children() {
    let mut parent = Scripted::new("Outer");
    let mut inner = Scripted::new("Inner");
    inner.children.push(Box::new(Scripted::new("Leaf")));
    parent.children.push(Box::new(inner));
    let client = client_with(vec![parent]);

    let out = texts(&client.on_message(&dm_ctx(5, "|outer inner leaf rest")).await);
    assert_eq!(out, vec!["outer inner leaf:rest".to_string()]);
    let out = texts(&client.on_message(&dm_ctx(5, "|outer other")).await);
    assert_eq!(out, vec!["outer:other".to_string()]);
    assert_eq!(client.uses("outer inner leaf"), 1);
    assert_eq!(client.total_uses(), 2);
}

#[tokio::test]
async fn test_dev_only_is_silent() {
    let mut command = Scripted::new("Secret");
    command.dev_only = true;
    let client = client_with(vec![command]);
    assert!(client.on_message(&admin_ctx(OWNER_ID, "|secret")).await.is_empty());
    assert!(client.on_message(&dm_ctx(5, "|secret help")).await.is_empty());
    assert_eq!(client.uses("secret"), 0);

    let out = texts(&client.on_message(&dm_ctx(DEV_ID, "|secret")).await);
    assert_eq!(out, vec!["secret:".to_string()]);
}

#[tokio::test]
async fn test_level_gate_is_silent() {
    let mut command = Scripted::new("Manage");
    command.category = Some(Category::Administrator);
    let client = client_with(vec![command]);

    assert!(client.on_message(&guild_ctx(5, "|manage")).await.is_empty());
    assert!(!client.on_message(&admin_ctx(5, "|manage")).await.is_empty());
    assert!(!client.on_message(&guild_ctx(OWNER_ID, "|manage")).await.is_empty());
    assert!(!client.on_message(&guild_ctx(DEV_ID, "|manage")).await.is_empty());
    // Levels do not apply in direct messages.
    assert!(!client.on_message(&dm_ctx(5, "|manage")).await.is_empty());
}

#[tokio::test]
async fn test_stored_level_override() {
    let client = client_with(vec![Scripted::new("Echo")]);
    client
        .db()
        .set_command_level(GUILD_ID, "echo", Some(crate::command::CommandLevel::ServerOwner))
        .unwrap();
    assert!(client.on_message(&admin_ctx(5, "|echo")).await.is_empty());
    assert!(!client.on_message(&guild_ctx(OWNER_ID, "|echo")).await.is_empty());
}

#[tokio::test]
async fn test_nsfw_and_music_categories_stop_run() {
    let mut nsfw = Scripted::new("Spicy");
    nsfw.category = Some(Category::Nsfw);
    let mut music = Scripted::new("Play");
    music.category = Some(Category::Music);
    let client = client_with(vec![nsfw, music]);

    assert!(client.on_message(&guild_ctx(5, "|spicy")).await.is_empty());
    let mut ctx = guild_ctx(5, "|spicy");
    ctx.nsfw = true;
    assert!(!client.on_message(&ctx).await.is_empty());

    assert!(client.on_message(&guild_ctx(5, "|play")).await.is_empty());
    assert!(!client.on_message(&guild_ctx(DEV_ID, "|play")).await.is_empty());
    client.db().add_music_whitelist(GUILD_ID).unwrap();
    assert!(!client.on_message(&guild_ctx(5, "|play")).await.is_empty());
}

#[tokio::test]
async fn test_sub_help() {
    let mut command = Scripted::new("Outer");
    command.children.push(Box::new(Scripted::new("Inner")));
    let client = client_with(vec![command]);

    let out = client.on_message(&guild_ctx(5, "|outer help")).await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[1], Response::React(SUCCESS.to_string()));
    match &out[0] {
        Response::Direct(text) => {
            assert!(text.starts_with(&format!(
                "Available help for **Outer command** in <#{}>",
                CHANNEL_ID
            )));
            assert!(text.contains("**Usage:** `|outer <Anything>`"));
            assert!(text.contains("**Sub-Commands:**"));
            assert!(text.contains("`|outer inner <Anything>` - Echoes its arguments."));
            assert!(text.ends_with("join my support server https://discord.gg/example"));
        }
        other => panic!("expected a direct message, got {:?}", other),
    }

    let out = client.on_message(&dm_ctx(5, "|outer inner HELP")).await;
    assert_eq!(out.len(), 1);
    assert!(out[0].text().unwrap().contains("**Inner command** in Direct Messages"));
}

#[tokio::test]
async fn test_guild_only_in_dm() {
    let mut command = Scripted::new("Local");
    command.guild_only = true;
    let client = client_with(vec![command]);
    let out = texts(&client.on_message(&dm_ctx(5, "|local")).await);
    assert_eq!(
        out,
        vec![format!("{} This command cannot be used in Direct messages", ERROR)]
    );
    assert_eq!(client.uses("local"), 1);
}

#[tokio::test]
async fn test_missing_permissions() {
    let mut bot = Scripted::new("Pin");
    bot.bot_permissions = Permissions::MANAGE_MESSAGES;
    let mut user = Scripted::new("Kick");
    user.user_permissions = Permissions::KICK_MEMBERS;
    let client = client_with(vec![bot, user]);

    let mut ctx = guild_ctx(5, "|pin");
    ctx.guild.as_mut().unwrap().self_permissions = Permissions::SEND_MESSAGES;
    let out = texts(&client.on_message(&ctx).await);
    assert_eq!(
        out,
        vec![format!("{} I need the Manage Messages permission in this Channel!", ERROR)]
    );

    let out = texts(&client.on_message(&guild_ctx(5, "|kick")).await);
    assert_eq!(
        out,
        vec![format!(
            "{} You must have the Kick Members permission in this Guild to use that!",
            ERROR
        )]
    );

    let mut ctx = guild_ctx(5, "|kick");
    ctx.guild.as_mut().unwrap().member_permissions = Permissions::KICK_MEMBERS;
    assert_eq!(texts(&client.on_message(&ctx).await), vec!["kick:".to_string()]);
}

#[tokio::test]
async fn test_cooldown_after_completion() {
    let mut command = Scripted::new("Slow");
    command.cooldown = 30;
    command.scope = CooldownScope::UserGuild;
    command.auto = AutoCooldown::After;
    let client = client_with(vec![command]);

    assert_eq!(texts(&client.on_message(&guild_ctx(5, "|slow")).await), vec!["slow:"]);
    let out = texts(&client.on_message(&guild_ctx(5, "|slow")).await);
    assert_eq!(
        out,
        vec![format!(
            "{} That command is on cooldown for 30 more seconds in this server!",
            WARNING
        )]
    );
    // Another user and the same user in DMs are unaffected.
    assert_eq!(texts(&client.on_message(&guild_ctx(6, "|slow")).await), vec!["slow:"]);
    assert_eq!(texts(&client.on_message(&dm_ctx(5, "|slow")).await), vec!["slow:"]);
    let out = texts(&client.on_message(&dm_ctx(5, "|slow")).await);
    assert!(out[0].ends_with("more seconds in this channel!"));
}

#[tokio::test]
async fn test_cooldown_before_applies_even_on_error() {
    let mut command = Scripted::new("Flaky");
    command.cooldown = 10;
    command.auto = AutoCooldown::Before;
    command.fail = true;
    let client = client_with(vec![command]);

    let out = texts(&client.on_message(&dm_ctx(5, "|flaky")).await);
    assert_eq!(
        out,
        vec![format!("{} An unexpected error occurred, please try again later!", ERROR)]
    );
    let out = texts(&client.on_message(&dm_ctx(5, "|flaky")).await);
    assert_eq!(
        out,
        vec![format!("{} That command is on cooldown for 10 more seconds!", WARNING)]
    );
}

#[tokio::test]
async fn test_failed_run_counts_as_use() {
    let mut command = Scripted::new("Flaky");
    command.fail = true;
    let client = client_with(vec![command]);
    client.set_mode(ClientMode::Debug);

    let out = texts(&client.on_message(&dm_ctx(5, "|flaky")).await);
    assert_eq!(
        out,
        vec![format!("{} An unexpected error occurred, please try again later!", ERROR)]
    );
    assert_eq!(client.uses("flaky"), 1);

    client.on_message(&dm_ctx(5, "|flaky")).await;
    assert_eq!(client.uses("flaky"), 2);
}

#[tokio::test]
async fn test_args_required() {
    let mut default = Scripted::new("Need");
    default.args = ArgsRequired::Default;
    let mut custom = Scripted::new("Ask");
    custom.args = ArgsRequired::Message("Ask me something.");
    let client = client_with(vec![default, custom]);

    let out = texts(&client.on_message(&dm_ctx(5, "|need")).await);
    assert_eq!(
        out,
        vec![format!(
            "{} **Too Few Arguments!**\nUse `|need help` for more information on this command!",
            ERROR
        )]
    );
    let out = texts(&client.on_message(&dm_ctx(5, "|ask")).await);
    assert_eq!(out, vec![format!("{} **Too Few Arguments!**\nAsk me something.", ERROR)]);
    assert_eq!(texts(&client.on_message(&dm_ctx(5, "|ask why")).await), vec!["ask:why"]);
}

#[tokio::test]
async fn test_idle_mode_serves_only_developer() {
    let client = client_with(vec![Scripted::new("Echo")]);
    client.set_mode(ClientMode::Idle);
    assert!(client.on_message(&dm_ctx(5, "|echo")).await.is_empty());
    assert!(!client.on_message(&dm_ctx(DEV_ID, "|echo")).await.is_empty());

    client.set_mode(ClientMode::Debug);
    assert!(!client.on_message(&dm_ctx(5, "|echo")).await.is_empty());
}

#[tokio::test]
async fn test_rate_limiter() {
    let mut config = test_config();
    config.bot.rate_limit_commands = 2;
    let mut index = CommandIndex::new();
    index.register(Box::new(Scripted::new("Echo")));
    let db = Arc::new(Db::open(Path::new(":memory:")).unwrap());
    let client = Client::new(Arc::new(config), db, index);

    assert!(!client.on_message(&dm_ctx(5, "|echo")).await.is_empty());
    assert!(!client.on_message(&dm_ctx(5, "|echo")).await.is_empty());
    assert!(client.on_message(&dm_ctx(5, "|echo")).await.is_empty());
    assert!(!client.on_message(&dm_ctx(6, "|echo")).await.is_empty());
}

#[tokio::test]
async fn test_custom_command_errors_are_reported() {
    let client = client_with(vec![Scripted::new("Echo")]);
    client
        .db()
        .add_custom_command(GUILD_ID, "broken", "{if:a|b|c}")
        .unwrap();
    client.db().add_custom_command(GUILD_ID, "quiet", "{note:nothing}").unwrap();

    let out = texts(&client.on_message(&guild_ctx(5, "|broken")).await);
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with(&format!("{} Custom command error:", ERROR)));
    assert!(client.on_message(&guild_ctx(5, "|quiet")).await.is_empty());
    assert!(client.on_message(&dm_ctx(5, "|quiet")).await.is_empty());
}

#[tokio::test]
async fn test_guild_prefixes() {
    let client = client_with(vec![Scripted::new("Echo")]);
    client.db().add_prefix(GUILD_ID, "!!").unwrap();
    let out = texts(&client.on_message(&guild_ctx(5, "!!echo x")).await);
    assert_eq!(out, vec!["echo:x".to_string()]);
    assert!(client.on_message(&dm_ctx(5, "!!echo x")).await.is_empty());
}

#[tokio::test]
async fn test_welcome_cooldown() {
    let client = client_with(Vec::new());
    client.db().set_welcome(GUILD_ID, 601, "Hi {user}, see {#channel}").unwrap();
    let guild = crate::template::GuildInfo {
        id: GUILD_ID,
        name: "Dragons".to_string(),
        member_count: 43,
    };

    let sent = client.on_member_join(&guild, &user(9), |_| Some("lobby".to_string()));
    assert_eq!(sent, Some((601, "Hi user9, see <#601>".to_string())));
    assert!(client.on_member_join(&guild, &user(9), |_| None).is_none());
    assert!(client.on_member_join(&guild, &user(10), |_| None).is_some());

    client.db().set_welcome(GUILD_ID, 601, &"x".repeat(2001)).unwrap();
    assert!(client.on_member_join(&guild, &user(11), |_| None).is_none());
}

fn starred(stars: u32, age_hours: i64) -> StarredMessage {
    StarredMessage {
        guild_id: GUILD_ID,
        channel_id: CHANNEL_ID,
        message_id: 4242,
        author: user(9),
        content: "look at this".to_string(),
        created_at: Utc::now() - Duration::hours(age_hours),
        stars,
    }
}

#[tokio::test]
async fn test_starboard_posting() {
    let client = client_with(Vec::new());
    assert!(client.on_star(&starred(10, 0), Utc::now()).is_none());

    client.db().set_channel(GUILD_ID, 650, ChannelType::Starboard).unwrap();
    client.db().ensure_starboard_settings(GUILD_ID).unwrap();

    assert!(client.on_star(&starred(4, 0), Utc::now()).is_none());
    assert!(client.on_star(&starred(5, 73), Utc::now()).is_none());

    let post = client.on_star(&starred(5, 1), Utc::now()).unwrap();
    assert_eq!(post.channel_id, 650);
    assert!(post.text.starts_with(&format!("{} **5** <#{}> ID: 4242", STAR, CHANNEL_ID)));
    assert!(post.text.contains("**user9**: look at this"));

    // Posted once only.
    assert!(client.on_star(&starred(6, 1), Utc::now()).is_none());

    let mut on_board = starred(9, 0);
    on_board.channel_id = 650;
    on_board.message_id = 4343;
    assert!(client.on_star(&on_board, Utc::now()).is_none());
}

#[tokio::test]
async fn test_failed_starboard_post_can_be_retried() {
    let client = client_with(Vec::new());
    client.db().set_channel(GUILD_ID, 650, ChannelType::Starboard).unwrap();
    client.db().ensure_starboard_settings(GUILD_ID).unwrap();

    let message = starred(5, 1);
    assert!(client.on_star(&message, Utc::now()).is_some());
    client.on_star_post_failed(&message);

    let retry = client.on_star(&starred(6, 1), Utc::now()).unwrap();
    assert!(retry.text.starts_with(&format!("{} **6**", STAR)));
    assert!(client.on_star(&starred(7, 1), Utc::now()).is_none());
}

#[tokio::test]
async fn test_deleted_call_takes_its_replies() {
    let client = client_with(Vec::new());
    client.link_reply(9000, 9100);
    client.link_reply(9000, 9101);
    client.link_reply(9001, 9102);

    assert_eq!(client.on_message_delete(9000), vec![9100, 9101]);
    assert!(client.on_message_delete(9000).is_empty());
    assert!(client.on_message_delete(9100).is_empty());
    assert_eq!(client.on_message_delete(9001), vec![9102]);
}

#[tokio::test]
async fn test_roles_return_after_rejoin() {
    let client = client_with(Vec::new());
    client.on_member_leave(GUILD_ID, 9, &[RED, BLUE]);
    assert!(client.roles_to_restore(GUILD_ID, 9).is_empty());

    client.db().set_role_persist(GUILD_ID, true).unwrap();
    client.on_member_leave(GUILD_ID, 9, &[RED, BLUE]);
    client.on_member_leave(GUILD_ID, 10, &[]);
    assert_eq!(client.roles_to_restore(GUILD_ID, 9), vec![RED, BLUE]);
    assert!(client.roles_to_restore(GUILD_ID, 9).is_empty());
    assert!(client.roles_to_restore(GUILD_ID, 10).is_empty());
}

#[tokio::test]
async fn test_saved_roles_dropped_when_role_persist_turned_off() {
    let client = client_with(Vec::new());
    client.db().set_role_persist(GUILD_ID, true).unwrap();
    client.on_member_leave(GUILD_ID, 9, &[GAMER]);
    client.db().set_role_persist(GUILD_ID, false).unwrap();
    client.db().set_role_persist(GUILD_ID, true).unwrap();
    assert!(client.roles_to_restore(GUILD_ID, 9).is_empty());
}
