use chrono::{DateTime, Utc};

use super::Client;
use crate::db::{logged_or, ChannelType};
use crate::message::UserInfo;

pub const STAR: &str = "\u{2B50}";

/// A message that just received a star reaction.
#[derive(Debug, Clone)]
pub struct StarredMessage {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub author: UserInfo,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub stars: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarboardPost {
    pub channel_id: u64,
    pub text: String,
}

impl Client {
    /// Decide whether a starred message goes on the guild's starboard. The
    /// entry is recorded here so a message is posted at most once; the
    /// gateway stores the posted message id afterwards.
    pub fn on_star(&self, starred: &StarredMessage, now: DateTime<Utc>) -> Option<StarboardPost> {
        let guild_id = starred.guild_id;
        let settings = logged_or(
            self.db.get_starboard_settings(guild_id),
            None,
            "starboard settings lookup",
        )?;
        let channel_id = logged_or(
            self.db.get_channel(guild_id, ChannelType::Starboard),
            None,
            "starboard channel lookup",
        )?;

        if starred.channel_id == channel_id || starred.stars < settings.threshold {
            return None;
        }
        if now - starred.created_at > chrono::Duration::hours(i64::from(settings.max_age)) {
            return None;
        }
        if !logged_or(
            self.db.add_starboard_entry(guild_id, starred.message_id),
            false,
            "starboard entry insert",
        ) {
            return None;
        }

        let mut text = format!(
            "{} **{}** <#{}> ID: {}\n**{}**",
            STAR, starred.stars, starred.channel_id, starred.message_id, starred.author.name
        );
        if !starred.content.is_empty() {
            text.push_str(": ");
            text.push_str(&starred.content);
        }
        text.push_str(&format!(
            "\nhttps://discord.com/channels/{}/{}/{}",
            guild_id, starred.channel_id, starred.message_id
        ));
        Some(StarboardPost { channel_id, text })
    }

    /// Undo the entry recorded by [`Client::on_star`] when the post could not
    /// be sent, so a later star can try again.
    pub fn on_star_post_failed(&self, starred: &StarredMessage) {
        if let Err(e) = self
            .db
            .remove_starboard_entry(starred.guild_id, starred.message_id)
        {
            log::error!("Failed to drop starboard entry {}: {}", starred.message_id, e);
        }
    }
}
