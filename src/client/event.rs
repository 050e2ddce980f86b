use std::fmt::Display;

use super::Client;
use crate::command::Command;
use crate::config::Config;
use crate::db::Db;
use crate::message::{GuildContext, MessageContext, Response};

/// One run of one command: the message it came from, the arguments left
/// after child resolution and the full name of the resolved command.
pub struct CommandEvent<'a> {
    pub ctx: &'a MessageContext,
    pub client: &'a Client,
    pub args: String,
    pub fullname: String,
    command: &'a dyn Command,
}

impl<'a> CommandEvent<'a> {
    pub(crate) fn new(
        ctx: &'a MessageContext,
        client: &'a Client,
        command: &'a dyn Command,
        fullname: String,
        args: String,
    ) -> Self {
        Self {
            ctx,
            client,
            args,
            fullname,
            command,
        }
    }

    pub fn db(&self) -> &Db {
        self.client.db()
    }

    pub fn config(&self) -> &Config {
        self.client.config()
    }

    pub fn prefix(&self) -> &str {
        &self.client.config().bot.prefix
    }

    pub fn is_dev(&self) -> bool {
        self.client.is_dev(self.ctx.author.id)
    }

    pub fn guild(&self) -> Option<&GuildContext> {
        self.ctx.guild.as_ref()
    }

    /// The guild of a guild-only command.
    pub fn require_guild(&self) -> Result<&GuildContext, Box<dyn std::error::Error + Send + Sync>> {
        self.guild()
            .ok_or_else(|| format!("{} ran outside a guild", self.fullname).into())
    }

    pub fn reply(&self, text: impl Into<String>) -> Response {
        Response::Reply(text.into())
    }

    pub fn reply_success(&self, text: impl Display) -> Response {
        Response::Reply(format!("{} {}", self.config().bot.success_emoji, text))
    }

    pub fn reply_warning(&self, text: impl Display) -> Response {
        Response::Reply(format!("{} {}", self.config().bot.warning_emoji, text))
    }

    pub fn reply_error(&self, text: impl Display) -> Response {
        Response::Reply(format!("{} {}", self.config().bot.error_emoji, text))
    }

    pub fn reply_in_dm(&self, text: impl Into<String>) -> Response {
        Response::Direct(text.into())
    }

    pub fn react_success(&self) -> Response {
        Response::React(self.config().bot.success_emoji.clone())
    }

    pub fn cooldown_key(&self) -> String {
        self.command.cooldown_scope().key(&self.fullname, self.ctx)
    }

    /// Start the command's cooldown for this invocation's scope.
    pub fn invoke_cooldown(&self) {
        let seconds = self.command.cooldown();
        if seconds > 0 {
            self.client.cooldowns().apply(&self.cooldown_key(), seconds);
        }
    }
}
