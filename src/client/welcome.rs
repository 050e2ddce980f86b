use super::Client;
use crate::db::logged_or;
use crate::message::UserInfo;
use crate::template::{self, GuildInfo, TemplateEnv};
use crate::util::MAX_MESSAGE_LEN;

const WELCOME_COOLDOWN_SECS: u64 = 100;

impl Client {
    /// Welcome text for a member who just joined, with the channel to send it
    /// to. `None` when the guild has no welcome, the member was welcomed in
    /// the last 100 seconds, or the rendered text is empty or too long.
    pub fn on_member_join(
        &self,
        guild: &GuildInfo,
        user: &UserInfo,
        channel_name: impl FnOnce(u64) -> Option<String>,
    ) -> Option<(u64, String)> {
        let welcome = logged_or(self.db.get_welcome(guild.id), None, "welcome lookup")?;

        let key = format!("welcomes|U:{}|G:{}", user.id, guild.id);
        if self.cooldowns.remaining(&key) > 0 {
            return None;
        }

        let env = TemplateEnv {
            user: user.clone(),
            nick: None,
            guild: Some(guild.clone()),
            channel_id: welcome.channel_id,
            channel_name: Some(channel_name(welcome.channel_id).unwrap_or_default()),
            args: String::new(),
        };
        let text = match template::render(&welcome.message, &env) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Welcome message for guild {} failed to render: {}", guild.id, e);
                return None;
            }
        };
        if text.trim().is_empty() || text.chars().count() > MAX_MESSAGE_LEN {
            return None;
        }

        self.cooldowns.apply(&key, WELCOME_COOLDOWN_SECS);
        Some((welcome.channel_id, text))
    }
}
