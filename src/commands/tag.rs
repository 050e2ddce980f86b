use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{split_first, ArgsRequired, AutoCooldown, Command, CommandResult, CooldownScope};
use crate::db::Tag;
use crate::message::Response;
use crate::template::{self, TemplateEnv};

const MAX_NAME_LEN: usize = 30;
const MAX_CONTENT_LEN: usize = 1900;

pub struct TagCommand {
    children: Vec<Box<dyn Command>>,
}

impl TagCommand {
    pub fn new() -> Self {
        Self {
            children: vec![
                Box::new(CreateTag { global: false }),
                Box::new(CreateTag { global: true }),
                Box::new(DeleteTag),
                Box::new(EditTag),
                Box::new(ListTags),
                Box::new(TagOwner),
                Box::new(RawTag),
            ],
        }
    }
}

#[async_trait]
impl Command for TagCommand {
    fn name(&self) -> &str {
        "Tag"
    }

    fn aliases(&self) -> &[&str] {
        &["t"]
    }

    fn arguments(&self) -> &str {
        "[Tag Name] <Tag Args>"
    }

    fn help(&self) -> &str {
        "Calls a tag. Local tags of this server take precedence over global tags."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Message("Specify a tag name.")
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let (name, args) = split_first(&event.args);
        let tag = match event.db().find_tag(event.ctx.guild_id(), name)? {
            Some(tag) => tag,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "No tag named \"{}\" exists. Not everything is a tag!",
                    name
                ))]))
            }
        };

        match template::render(&tag.content, &TemplateEnv::from_message(event.ctx, args)) {
            Ok(text) if text.trim().is_empty() => Ok(Some(vec![
                event.reply_error(format!("Tag \"{}\" produced an empty message!", tag.name)),
            ])),
            Ok(text) => Ok(Some(vec![event.reply(text)])),
            Err(e) => Ok(Some(vec![event.reply_error(e)])),
        }
    }
}

/// Rejects bad names and content, returning the user-facing reason.
fn validate(event: &CommandEvent<'_>, name: &str, content: &str) -> Option<Response> {
    if content.is_empty() {
        return Some(event.reply_error("You must specify content for the tag!"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Some(event.reply_error(format!(
            "Tag names cannot be longer than {} characters!",
            MAX_NAME_LEN
        )));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Some(event.reply_error(format!(
            "Tag content cannot be longer than {} characters!",
            MAX_CONTENT_LEN
        )));
    }
    None
}

/// Looks a tag up for a management command and checks the caller may modify it.
fn owned_tag(event: &CommandEvent<'_>, name: &str) -> Result<Result<Tag, Response>, Box<dyn std::error::Error + Send + Sync>> {
    let tag = match event.db().find_tag(event.ctx.guild_id(), name)? {
        Some(tag) => tag,
        None => {
            return Ok(Err(event.reply_error(format!(
                "No tag named \"{}\" exists.",
                name
            ))))
        }
    };
    if tag.owner_id != event.ctx.author.id && !event.is_dev() {
        return Ok(Err(event.reply_error(format!(
            "You cannot modify the tag \"{}\" because you do not own it!",
            tag.name
        ))));
    }
    Ok(Ok(tag))
}

struct CreateTag {
    global: bool,
}

#[async_trait]
impl Command for CreateTag {
    fn name(&self) -> &str {
        if self.global {
            "CreateGlobal"
        } else {
            "Create"
        }
    }

    fn aliases(&self) -> &[&str] {
        if self.global {
            &["addglobal"]
        } else {
            &["add"]
        }
    }

    fn arguments(&self) -> &str {
        "[Tag Name] [Tag Content]"
    }

    fn help(&self) -> &str {
        if self.global {
            "Creates a global tag, usable in every server and in Direct Messages."
        } else {
            "Creates a local tag for this server."
        }
    }

    fn guild_only(&self) -> bool {
        !self.global
    }

    fn cooldown(&self) -> u64 {
        120
    }

    fn cooldown_scope(&self) -> CooldownScope {
        if self.global {
            CooldownScope::User
        } else {
            CooldownScope::UserGuild
        }
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Message("Specify a tag name and the tag's content.")
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let (name, content) = split_first(&event.args);
        if let Some(error) = validate(event, name, content) {
            return Ok(Some(vec![error]));
        }
        if event.client.commands().contains(name) {
            return Ok(Some(vec![
                event.reply_error("Tags cannot be named after commands!"),
            ]));
        }

        let owner = event.ctx.author.id;
        let created = if self.global {
            event.db().add_global_tag(name, owner, content)?
        } else {
            let guild = event.require_guild()?;
            event.db().get_global_tag(name)?.is_none()
                && event.db().add_local_tag(guild.id, name, owner, content)?
        };
        if !created {
            return Ok(Some(vec![
                event.reply_error(format!("A tag named \"{}\" already exists!", name)),
            ]));
        }

        event.invoke_cooldown();
        let kind = if self.global { "global" } else { "local" };
        Ok(Some(vec![event.reply_success(format!(
            "Successfully created {} tag \"**{}**\"!",
            kind, name
        ))]))
    }
}

struct DeleteTag;

#[async_trait]
impl Command for DeleteTag {
    fn name(&self) -> &str {
        "Delete"
    }

    fn aliases(&self) -> &[&str] {
        &["remove"]
    }

    fn arguments(&self) -> &str {
        "[Tag Name]"
    }

    fn help(&self) -> &str {
        "Deletes a tag you own."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let (name, _) = split_first(&event.args);
        let tag = match owned_tag(event, name)? {
            Ok(tag) => tag,
            Err(response) => return Ok(Some(vec![response])),
        };
        event.db().delete_tag(&tag)?;
        Ok(Some(vec![event.reply_success(format!(
            "Successfully deleted tag \"**{}**\"!",
            tag.name
        ))]))
    }
}

struct EditTag;

#[async_trait]
impl Command for EditTag {
    fn name(&self) -> &str {
        "Edit"
    }

    fn arguments(&self) -> &str {
        "[Tag Name] [New Content]"
    }

    fn help(&self) -> &str {
        "Replaces the content of a tag you own."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn cooldown(&self) -> u64 {
        30
    }

    fn cooldown_scope(&self) -> CooldownScope {
        CooldownScope::User
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Message("Specify a tag name and the new content.")
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let (name, content) = split_first(&event.args);
        if let Some(error) = validate(event, name, content) {
            return Ok(Some(vec![error]));
        }
        let tag = match owned_tag(event, name)? {
            Ok(tag) => tag,
            Err(response) => return Ok(Some(vec![response])),
        };
        event.db().edit_tag(&tag, content)?;
        event.invoke_cooldown();
        Ok(Some(vec![event.reply_success(format!(
            "Successfully edited tag \"**{}**\"!",
            tag.name
        ))]))
    }
}

struct ListTags;

#[async_trait]
impl Command for ListTags {
    fn name(&self) -> &str {
        "List"
    }

    fn arguments(&self) -> &str {
        "<@User>"
    }

    fn help(&self) -> &str {
        "Lists the tags owned by you or a mentioned user."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn cooldown(&self) -> u64 {
        10
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        AutoCooldown::After
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let user = event.ctx.mentions.first().unwrap_or(&event.ctx.author);
        let names = event
            .db()
            .get_tag_names_by_owner(event.ctx.guild_id(), user.id)?;
        if names.is_empty() {
            return Ok(Some(vec![
                event.reply_warning(format!("**{}** does not own any tags!", user.name)),
            ]));
        }
        let listed = names
            .iter()
            .map(|n| format!("`{}`", n))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(Some(vec![event.reply_success(format!(
            "**{}** tag{} owned by **{}**:\n{}",
            names.len(),
            if names.len() == 1 { "" } else { "s" },
            user.name,
            listed
        ))]))
    }
}

struct TagOwner;

#[async_trait]
impl Command for TagOwner {
    fn name(&self) -> &str {
        "Owner"
    }

    fn aliases(&self) -> &[&str] {
        &["creator"]
    }

    fn arguments(&self) -> &str {
        "[Tag Name]"
    }

    fn help(&self) -> &str {
        "Gets the owner of a tag."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let (name, _) = split_first(&event.args);
        let response = match event.db().find_tag(event.ctx.guild_id(), name)? {
            Some(tag) => event.reply_success(format!(
                "The {} tag \"**{}**\" is owned by <@{}>.",
                if tag.is_global() { "global" } else { "local" },
                tag.name,
                tag.owner_id
            )),
            None => event.reply_error(format!("No tag named \"{}\" exists.", name)),
        };
        Ok(Some(vec![response]))
    }
}

struct RawTag;

#[async_trait]
impl Command for RawTag {
    fn name(&self) -> &str {
        "Raw"
    }

    fn arguments(&self) -> &str {
        "[Tag Name]"
    }

    fn help(&self) -> &str {
        "Shows the unrendered content of a tag."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let (name, _) = split_first(&event.args);
        let response = match event.db().find_tag(event.ctx.guild_id(), name)? {
            Some(tag) => event.reply(format!("```\n{}\n```", tag.content)),
            None => event.reply_error(format!("No tag named \"{}\" exists.", name)),
        };
        Ok(Some(vec![response]))
    }
}
