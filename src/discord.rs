//! Discord gateway for NightFury.
//!
//! Turns serenity events into the client's plain message and member views
//! and carries the resulting responses back to Discord.

use std::sync::Arc;

use chrono::Utc;
use serenity::all::{
    ChannelId, Context, CreateMessage, EventHandler, GatewayIntents, Guild, GuildId, Member,
    Message, MessageId, Reaction, ReactionType, Ready, RoleId, UnavailableGuild, User, UserId,
};
use serenity::async_trait;
use serenity::Client as SerenityClient;

use crate::client::{Client, StarredMessage, STAR};
use crate::message::{GuildContext, MessageContext, Response, RoleInfo, UserInfo};
use crate::template::GuildInfo;
use crate::util::{defuse_mentions, snowflake_time, split_message};

struct Handler {
    client: Arc<Client>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.client.set_guild_count(ready.guilds.len());
        log::info!(
            "Discord bot connected as {} ({} guilds)",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: Option<bool>) {
        log::debug!("Guild available: {} ({})", guild.name, guild.id);
        self.client.set_guild_count(ctx.cache.guild_count());
    }

    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        log::debug!("Guild gone: {}", incomplete.id);
        self.client.set_guild_count(ctx.cache.guild_count());
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let message = match self.message_context(&ctx, &msg).await {
            Some(message) => message,
            None => return,
        };
        let responses = self.client.on_message(&message).await;
        for response in responses {
            match deliver(&ctx, &msg, response).await {
                Ok(sent) if msg.guild_id.is_some() => {
                    for reply in sent {
                        self.client.link_reply(msg.id.get(), reply.get());
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Failed to deliver response in channel {}: {}", msg.channel_id, e)
                }
            }
        }
    }

    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        if guild_id.is_none() {
            return;
        }
        for reply in self.client.on_message_delete(deleted_message_id.get()) {
            if let Err(e) = channel_id.delete_message(&ctx.http, MessageId::new(reply)).await {
                log::debug!("Failed to delete reply {} in channel {}: {}", reply, channel_id, e);
            }
        }
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        user: User,
        member_data_if_available: Option<Member>,
    ) {
        if user.bot {
            return;
        }
        if let Some(member) = member_data_if_available {
            let roles: Vec<u64> = member.roles.iter().map(|r| r.get()).collect();
            self.client.on_member_leave(guild_id.get(), user.id.get(), &roles);
        }
    }

    async fn guild_member_addition(&self, ctx: Context, member: Member) {
        if member.user.bot {
            return;
        }
        let guild_id = member.guild_id;
        let info = match ctx.cache.guild(guild_id).map(|g| GuildInfo {
            id: guild_id.get(),
            name: g.name.clone(),
            member_count: g.member_count,
        }) {
            Some(info) => info,
            None => return,
        };

        let saved = self.client.roles_to_restore(guild_id.get(), member.user.id.get());
        let known: Vec<RoleId> = match ctx.cache.guild(guild_id) {
            Some(guild) => saved
                .into_iter()
                .map(RoleId::new)
                .filter(|id| guild.roles.contains_key(id))
                .collect(),
            None => Vec::new(),
        };
        for role in known {
            if let Err(e) = ctx
                .http
                .add_member_role(guild_id, member.user.id, role, Some("RolePersist"))
                .await
            {
                log::warn!("Failed to restore role {} to {}: {}", role, member.user.name, e);
            }
        }

        let welcome = self.client.on_member_join(&info, &user_info(&member.user), |channel| {
            ctx.cache.guild(guild_id).and_then(|g| {
                g.channels
                    .get(&ChannelId::new(channel))
                    .map(|c| c.name.clone())
            })
        });
        if let Some((channel_id, text)) = welcome {
            if let Err(e) = ChannelId::new(channel_id)
                .say(&ctx.http, defuse_mentions(&text))
                .await
            {
                log::warn!("Failed to welcome {} in guild {}: {}", member.user.name, guild_id, e);
            }
        }
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        if reaction.emoji != ReactionType::Unicode(STAR.to_string()) {
            return;
        }
        let guild_id = match reaction.guild_id {
            Some(id) => id,
            None => return,
        };
        let message = match reaction.message(&ctx).await {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Failed to fetch starred message {}: {}", reaction.message_id, e);
                return;
            }
        };
        let stars = message
            .reactions
            .iter()
            .find(|r| r.reaction_type == reaction.emoji)
            .map(|r| r.count as u32)
            .unwrap_or(0);

        let starred = StarredMessage {
            guild_id: guild_id.get(),
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
            author: user_info(&message.author),
            content: message.content.clone(),
            created_at: snowflake_time(message.id.get()),
            stars,
        };
        let post = match self.client.on_star(&starred, Utc::now()) {
            Some(post) => post,
            None => return,
        };

        match ChannelId::new(post.channel_id)
            .say(&ctx.http, defuse_mentions(&post.text))
            .await
        {
            Ok(posted) => {
                if let Err(e) = self.client.db().set_starboard_message(
                    starred.guild_id,
                    starred.message_id,
                    posted.id.get(),
                ) {
                    log::error!("Failed to record starboard post: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Failed to post to starboard in guild {}: {}", guild_id, e);
                self.client.on_star_post_failed(&starred);
            }
        }
    }
}

impl Handler {
    /// Build the client's view of a message. Guild messages pull the guild,
    /// channel, author and bot member from the cache, fetching members that
    /// are not cached.
    async fn message_context(&self, ctx: &Context, msg: &Message) -> Option<MessageContext> {
        let mut message = MessageContext {
            message_id: msg.id.get(),
            author: user_info(&msg.author),
            channel_id: msg.channel_id.get(),
            channel_name: String::new(),
            nsfw: false,
            created_at: snowflake_time(msg.id.get()),
            content: msg.content.clone(),
            mentions: msg.mentions.iter().map(user_info).collect(),
            guild: None,
        };

        let guild_id = match msg.guild_id {
            Some(id) => id,
            None => return Some(message),
        };

        let bot_id = ctx.cache.current_user().id;
        let author = fetch_member(ctx, guild_id, msg.author.id).await?;
        let bot = fetch_member(ctx, guild_id, bot_id).await?;

        let guild = ctx.cache.guild(guild_id)?;
        let channel = guild.channels.get(&msg.channel_id);
        let (member_permissions, self_permissions) = match channel {
            Some(channel) => (
                guild.user_permissions_in(channel, &author),
                guild.user_permissions_in(channel, &bot),
            ),
            None => (guild.member_permissions(&author), guild.member_permissions(&bot)),
        };
        if let Some(channel) = channel {
            message.channel_name = channel.name.clone();
            message.nsfw = channel.nsfw;
        }

        message.guild = Some(GuildContext {
            id: guild_id.get(),
            name: guild.name.clone(),
            owner_id: guild.owner_id.get(),
            member_count: guild.member_count,
            roles: guild
                .roles
                .values()
                .map(|r| RoleInfo {
                    id: r.id.get(),
                    name: r.name.clone(),
                })
                .collect(),
            member_roles: author.roles.iter().map(|r| r.get()).collect(),
            nickname: author.nick.clone(),
            member_permissions,
            self_permissions,
        });
        Some(message)
    }
}

async fn fetch_member(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<Member> {
    match guild_id.member(ctx, user_id).await {
        Ok(member) => Some(member),
        Err(e) => {
            log::warn!("Failed to fetch member {} of guild {}: {}", user_id, guild_id, e);
            None
        }
    }
}

/// Send one response, returning the ids of the messages it posted in the
/// channel.
async fn deliver(ctx: &Context, msg: &Message, response: Response) -> serenity::Result<Vec<MessageId>> {
    let mut sent = Vec::new();
    match response {
        Response::Reply(text) => {
            for chunk in split_message(&defuse_mentions(&text)) {
                sent.push(msg.channel_id.say(&ctx.http, chunk).await?.id);
            }
        }
        Response::Direct(text) => {
            for chunk in split_message(&defuse_mentions(&text)) {
                msg.author
                    .direct_message(ctx, CreateMessage::new().content(chunk))
                    .await?;
            }
        }
        Response::React(emoji) => {
            msg.react(ctx, ReactionType::Unicode(emoji)).await?;
        }
        Response::GrantRole(role) => {
            if let Some(guild_id) = msg.guild_id {
                ctx.http
                    .add_member_role(guild_id, msg.author.id, RoleId::new(role), Some("Self role"))
                    .await?;
            }
        }
        Response::RevokeRole(role) => {
            if let Some(guild_id) = msg.guild_id {
                ctx.http
                    .remove_member_role(guild_id, msg.author.id, RoleId::new(role), Some("Self role"))
                    .await?;
            }
        }
    }
    Ok(sent)
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.get(),
        name: user.name.clone(),
        discriminator: user.discriminator.map(|d| d.get()),
        avatar_url: user.face(),
        bot: user.bot,
    }
}

/// Discord connection driving a [`Client`].
pub struct DiscordGateway {
    client: Arc<Client>,
}

impl DiscordGateway {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Connect and serve events until the connection ends.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let token = self.client.config().bot.token.clone();
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = Handler {
            client: self.client.clone(),
        };
        let mut client = SerenityClient::builder(&token, intents)
            .event_handler(handler)
            .await?;

        log::info!("Starting Discord gateway");
        if let Err(e) = client.start().await {
            log::error!("Discord client error: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}
