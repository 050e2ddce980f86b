use serenity::all::Permissions;

use super::{Client, CommandEvent};
use crate::command::{is_for_command, split_first, ArgsRequired, AutoCooldown, Command, CommandLevel};
use crate::db::logged_or;
use crate::message::{MessageContext, Response};
use crate::template::{self, TemplateEnv};

pub const GUILD_ONLY: &str = "This command cannot be used in Direct messages";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred, please try again later!";
pub const TOO_FEW_ARGS: &str = "**Too Few Arguments!**";

/// Permissions that Discord evaluates per channel.
const CHANNEL_PERMISSIONS: Permissions = Permissions::VIEW_CHANNEL
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::MANAGE_MESSAGES)
    .union(Permissions::EMBED_LINKS)
    .union(Permissions::ATTACH_FILES)
    .union(Permissions::READ_MESSAGE_HISTORY)
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::USE_EXTERNAL_EMOJIS)
    .union(Permissions::MENTION_EVERYONE);

impl Client {
    /// Run one incoming message through the listener and, when it is a call,
    /// through the gate chain. Returns what should be sent back.
    pub async fn on_message(&self, ctx: &MessageContext) -> Vec<Response> {
        if ctx.author.bot {
            return Vec::new();
        }

        let content = match self.strip_prefix(ctx) {
            Some(content) => content,
            None => return Vec::new(),
        };
        let (name, args) = split_first(content);
        if name.is_empty() {
            return Vec::new();
        }

        if !self.mode().check_call(self.is_dev(ctx.author.id)) {
            return Vec::new();
        }

        if !self.rate_limiter.check(ctx.author.id) {
            log::warn!("Rate limited: {} ({})", ctx.author.name, ctx.author.id);
            return Vec::new();
        }

        match self.commands.get(name) {
            Some(command) => self.run(command, ctx, args).await,
            None => self.run_custom_command(ctx, name, args),
        }
    }

    /// Text after the default prefix or, in a guild, after the first stored
    /// guild prefix. Both are matched case-insensitively.
    fn strip_prefix<'m>(&self, ctx: &'m MessageContext) -> Option<&'m str> {
        let content = ctx.content.trim();
        if let Some(rest) = strip_prefix_ignore_case(content, &self.config.bot.prefix) {
            return Some(rest.trim());
        }

        let guild_id = ctx.guild_id()?;
        let prefixes = logged_or(self.db.get_prefixes(guild_id), Vec::new(), "prefix lookup");
        prefixes
            .iter()
            .find_map(|p| strip_prefix_ignore_case(content, p))
            .map(str::trim)
    }

    fn run_custom_command(&self, ctx: &MessageContext, name: &str, args: &str) -> Vec<Response> {
        let guild_id = match ctx.guild_id() {
            Some(id) => id,
            None => return Vec::new(),
        };
        let content = match logged_or(
            self.db.get_custom_command(guild_id, name),
            None,
            "custom command lookup",
        ) {
            Some(content) => content,
            None => return Vec::new(),
        };

        match template::render(&content, &TemplateEnv::from_message(ctx, args)) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => vec![Response::Reply(text)],
            Err(e) => vec![Response::Reply(format!(
                "{} Custom command error: {}",
                self.config.bot.error_emoji, e
            ))],
        }
    }

    /// The gate chain. Every stop before execution is either silent or a
    /// single terminating reply.
    pub(super) async fn run(
        &self,
        root: &dyn Command,
        ctx: &MessageContext,
        args: &str,
    ) -> Vec<Response> {
        let mut command = root;
        let mut fullname = root.name().to_lowercase();
        let mut args = args.trim().to_string();
        while !command.children().is_empty() && !args.is_empty() {
            let (first, rest) = split_first(&args);
            let child = match command
                .children()
                .iter()
                .find(|c| is_for_command(c.as_ref(), first))
            {
                Some(child) => child.as_ref(),
                None => break,
            };
            fullname = format!("{} {}", fullname, child.name().to_lowercase());
            args = rest.to_string();
            command = child;
        }

        let mode = self.mode();
        let event = CommandEvent::new(ctx, self, command, fullname, args);
        mode.on_call(ctx, &event.fullname);

        if command.dev_only() && !event.is_dev() {
            return Vec::new();
        }

        if let Some(guild) = &ctx.guild {
            if !self.effective_level(command, guild.id, &event.fullname).test(&event) {
                return Vec::new();
            }
        }

        if let Some(category) = command.category() {
            if category.can_stop_run() && !category.test(&event) {
                return Vec::new();
            }
        }

        if split_first(&event.args).0.eq_ignore_ascii_case("help") {
            let mut responses = vec![event.reply_in_dm(self.sub_help(command, &event))];
            if ctx.is_guild() {
                responses.push(event.react_success());
            }
            return responses;
        }

        if command.guild_only() && !ctx.is_guild() {
            return self.terminate(&event, event.reply_error(GUILD_ONLY));
        }

        if let Some(guild) = &ctx.guild {
            let missing = command.bot_permissions().difference(guild.self_permissions);
            if !missing.is_empty() {
                let text = format!(
                    "I need the {} permission in this {}!",
                    missing.get_permission_names().join(", "),
                    permission_scope(missing)
                );
                return self.terminate(&event, event.reply_error(text));
            }

            let missing = command.user_permissions().difference(guild.member_permissions);
            if !missing.is_empty() {
                let text = format!(
                    "You must have the {} permission in this {} to use that!",
                    missing.get_permission_names().join(", "),
                    permission_scope(missing)
                );
                return self.terminate(&event, event.reply_error(text));
            }
        }

        if command.cooldown() > 0 {
            let remaining = self.cooldowns.remaining(&event.cooldown_key());
            if remaining > 0 {
                let suffix = command.cooldown_scope().suffix(ctx.is_guild());
                let text = if suffix.is_empty() {
                    format!("That command is on cooldown for {} more seconds!", remaining)
                } else {
                    format!(
                        "That command is on cooldown for {} more seconds {}!",
                        remaining, suffix
                    )
                };
                return self.terminate(&event, event.reply_warning(text));
            }
        }

        if command.auto_cooldown() == AutoCooldown::Before {
            event.invoke_cooldown();
        }

        if event.args.is_empty() {
            let detail = match command.args_required() {
                ArgsRequired::No => None,
                ArgsRequired::Default => Some(format!(
                    "Use `{}{} help` for more information on this command!",
                    event.prefix(),
                    event.fullname
                )),
                ArgsRequired::Message(message) => Some(message.to_string()),
            };
            if let Some(detail) = detail {
                let text = format!("{}\n{}", TOO_FEW_ARGS, detail);
                return self.terminate(&event, event.reply_error(text));
            }
        }

        let responses = match command.execute(&event).await {
            Ok(responses) => responses.unwrap_or_default(),
            Err(e) => {
                log::error!("Command {} failed: {}", event.fullname, e);
                return self.terminate(&event, event.reply_error(UNEXPECTED_ERROR));
            }
        };

        if command.auto_cooldown() == AutoCooldown::After {
            event.invoke_cooldown();
        }
        mode.on_completed(&event.fullname);
        self.increment_uses(&event.fullname);
        responses
    }

    /// Level a command runs at in a guild: the guild's override when the
    /// command allows one, else its default.
    pub fn effective_level(&self, command: &dyn Command, guild_id: u64, fullname: &str) -> CommandLevel {
        if !command.has_adjustable_level() {
            return command.default_level();
        }
        logged_or(
            self.db.get_command_level(guild_id, fullname),
            None,
            "command level lookup",
        )
        .unwrap_or_else(|| command.default_level())
    }

    fn terminate(&self, event: &CommandEvent<'_>, response: Response) -> Vec<Response> {
        self.mode()
            .on_terminated(&event.fullname, response.text().unwrap_or_default());
        self.increment_uses(&event.fullname);
        vec![response]
    }

    /// Usage text for one command, sent when its arguments start with `help`.
    pub fn sub_help(&self, command: &dyn Command, event: &CommandEvent<'_>) -> String {
        let prefix = event.prefix();
        let location = match event.ctx.guild {
            Some(_) => format!("<#{}>", event.ctx.channel_id),
            None => "Direct Messages".to_string(),
        };

        let mut text = format!(
            "Available help for **{} command** in {}\n\n**Usage:** `{}{}",
            command.name(),
            location,
            prefix,
            event.fullname
        );
        if !command.arguments().is_empty() {
            text.push(' ');
            text.push_str(command.arguments());
        }
        text.push('`');

        if !command.aliases().is_empty() {
            let aliases = command
                .aliases()
                .iter()
                .map(|a| format!("`{}`", a))
                .collect::<Vec<_>>()
                .join(", ");
            text.push_str(&format!("\n**Alias{}:** {}", plural(command.aliases().len(), "es"), aliases));
        }

        text.push_str(&format!("\n\n{}\n", command.help()));

        let children: Vec<&dyn Command> = command
            .children()
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| !c.dev_only() || event.is_dev())
            .collect();
        if !children.is_empty() {
            text.push_str("\n**Sub-Commands:**\n");
            for child in children {
                text.push_str(&format!(
                    "\n`{}{} {}",
                    prefix,
                    event.fullname,
                    child.name().to_lowercase()
                ));
                if !child.arguments().is_empty() {
                    text.push(' ');
                    text.push_str(child.arguments());
                }
                text.push_str(&format!("` - {}", child.help()));
            }
            text.push('\n');
        }

        if !self.config.bot.support_server.is_empty() {
            text.push_str(&format!(
                "\nFor additional help, join my support server {}",
                self.config.bot.support_server
            ));
        }
        text
    }
}

fn strip_prefix_ignore_case<'m>(content: &'m str, prefix: &str) -> Option<&'m str> {
    if prefix.is_empty() {
        return None;
    }
    let head = content.get(..prefix.len())?;
    if head.to_lowercase() == prefix.to_lowercase() {
        Some(&content[prefix.len()..])
    } else {
        None
    }
}

fn permission_scope(missing: Permissions) -> &'static str {
    if CHANNEL_PERMISSIONS.contains(missing) {
        "Channel"
    } else {
        "Guild"
    }
}

fn plural(count: usize, suffix: &'static str) -> &'static str {
    if count == 1 {
        ""
    } else {
        suffix
    }
}
