//! Self-assignable roles. RoleMe roles can be stacked up to a per-guild
//! limit; ColorMe roles are exclusive, taking one removes any other.

use async_trait::async_trait;
use serenity::all::Permissions;

use crate::client::CommandEvent;
use crate::command::{ArgsRequired, AutoCooldown, Category, Command, CommandResult};
use crate::db::RoleType;
use crate::message::{GuildContext, Response};
use crate::util::find_roles;

#[derive(Debug, Clone, Copy)]
struct Kind {
    name: &'static str,
    role_type: RoleType,
    exclusive: bool,
}

const ROLE_ME: Kind = Kind {
    name: "RoleMe",
    role_type: RoleType::RoleMe,
    exclusive: false,
};

const COLOR_ME: Kind = Kind {
    name: "ColorMe",
    role_type: RoleType::ColorMe,
    exclusive: true,
};

pub struct SelfRoleCommand {
    kind: Kind,
    children: Vec<Box<dyn Command>>,
}

impl SelfRoleCommand {
    pub fn role_me() -> Self {
        let kind = ROLE_ME;
        Self {
            kind,
            children: vec![
                Box::new(AddSelfRole { kind }),
                Box::new(RemoveSelfRole { kind }),
                Box::new(RoleMeLimit),
                Box::new(ListSelfRoles { kind }),
            ],
        }
    }

    pub fn color_me() -> Self {
        let kind = COLOR_ME;
        Self {
            kind,
            children: vec![
                Box::new(AddSelfRole { kind }),
                Box::new(RemoveSelfRole { kind }),
                Box::new(ListSelfRoles { kind }),
            ],
        }
    }
}

/// Resolve `query` to exactly one role, replying with the reason otherwise.
/// With `only` set, candidates are restricted to those ids.
fn single_role(
    event: &CommandEvent<'_>,
    guild: &GuildContext,
    query: &str,
    only: Option<&[u64]>,
    label: &str,
) -> Result<(u64, String), Response> {
    let found: Vec<_> = find_roles(guild, query)
        .into_iter()
        .filter(|r| only.map_or(true, |ids| ids.contains(&r.id)))
        .collect();
    match found.as_slice() {
        [] => Err(event.reply_error(format!("No {}role matching \"{}\" was found!", label, query))),
        [role] => Ok((role.id, role.name.clone())),
        _ => Err(event.reply_error(format!(
            "Multiple {}roles match \"{}\", please be more specific!",
            label, query
        ))),
    }
}

#[async_trait]
impl Command for SelfRoleCommand {
    fn name(&self) -> &str {
        self.kind.name
    }

    fn arguments(&self) -> &str {
        "[Role]"
    }

    fn help(&self) -> &str {
        if self.kind.exclusive {
            "Gives you a ColorMe role, replacing any other you have, or removes it if you already have it."
        } else {
            "Gives you a RoleMe role, or removes it if you already have it."
        }
    }

    fn bot_permissions(&self) -> Permissions {
        Permissions::MANAGE_ROLES
    }

    fn cooldown(&self) -> u64 {
        10
    }

    fn auto_cooldown(&self) -> AutoCooldown {
        AutoCooldown::After
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let kind = self.kind;
        let available = event.db().get_roles(guild.id, kind.role_type)?;
        if available.is_empty() {
            return Ok(Some(vec![event.reply_error(format!(
                "There are no {} roles on this server!",
                kind.name
            ))]));
        }

        let label = format!("{} ", kind.name);
        let (role_id, role_name) =
            match single_role(event, guild, &event.args, Some(available.as_slice()), &label) {
                Ok(role) => role,
                Err(response) => return Ok(Some(vec![response])),
            };

        if guild.member_has_role(role_id) {
            return Ok(Some(vec![
                Response::RevokeRole(role_id),
                event.reply_success(format!("Removed the **{}** role from you.", role_name)),
            ]));
        }

        let held: Vec<u64> = available
            .iter()
            .copied()
            .filter(|&id| guild.member_has_role(id))
            .collect();

        let mut responses = Vec::new();
        if kind.exclusive {
            responses.extend(held.into_iter().map(Response::RevokeRole));
        } else if let Some(limit) = event.db().get_command_limit(guild.id, "roleme")? {
            if limit > 0 && held.len() >= limit as usize {
                return Ok(Some(vec![event.reply_error(format!(
                    "You can only have {} RoleMe role{} on this server!",
                    limit,
                    if limit == 1 { "" } else { "s" }
                ))]));
            }
        }

        responses.push(Response::GrantRole(role_id));
        responses.push(event.reply_success(format!("Gave you the **{}** role.", role_name)));
        Ok(Some(responses))
    }
}

struct AddSelfRole {
    kind: Kind,
}

#[async_trait]
impl Command for AddSelfRole {
    fn name(&self) -> &str {
        "Add"
    }

    fn arguments(&self) -> &str {
        "[Role]"
    }

    fn help(&self) -> &str {
        "Makes a role self-assignable."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let (role_id, role_name) = match single_role(event, guild, &event.args, None, "") {
            Ok(role) => role,
            Err(response) => return Ok(Some(vec![response])),
        };
        if !event.db().add_role(guild.id, role_id, self.kind.role_type)? {
            return Ok(Some(vec![event.reply_error(format!(
                "**{}** is already a {} role!",
                role_name, self.kind.name
            ))]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "**{}** is now a {} role.",
            role_name, self.kind.name
        ))]))
    }
}

struct RemoveSelfRole {
    kind: Kind,
}

#[async_trait]
impl Command for RemoveSelfRole {
    fn name(&self) -> &str {
        "Remove"
    }

    fn arguments(&self) -> &str {
        "[Role]"
    }

    fn help(&self) -> &str {
        "Stops a role from being self-assignable."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let available = event.db().get_roles(guild.id, self.kind.role_type)?;
        let label = format!("{} ", self.kind.name);
        let (role_id, role_name) =
            match single_role(event, guild, &event.args, Some(available.as_slice()), &label) {
                Ok(role) => role,
                Err(response) => return Ok(Some(vec![response])),
            };
        event.db().remove_role(guild.id, role_id, self.kind.role_type)?;
        Ok(Some(vec![event.reply_success(format!(
            "**{}** is no longer a {} role.",
            role_name, self.kind.name
        ))]))
    }
}

struct RoleMeLimit;

#[async_trait]
impl Command for RoleMeLimit {
    fn name(&self) -> &str {
        "Limit"
    }

    fn arguments(&self) -> &str {
        "<Number>"
    }

    fn help(&self) -> &str {
        "Shows or sets how many RoleMe roles a member may hold. 0 removes the limit."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        if event.args.is_empty() {
            let text = match event.db().get_command_limit(guild.id, "roleme")? {
                Some(limit) => format!("The RoleMe limit on this server is **{}**.", limit),
                None => "There is no RoleMe limit on this server.".to_string(),
            };
            return Ok(Some(vec![event.reply_success(text)]));
        }

        let limit: u32 = match event.args.parse() {
            Ok(limit) => limit,
            Err(_) => {
                return Ok(Some(vec![event.reply_error(format!(
                    "\"{}\" is not a valid number!",
                    event.args
                ))]))
            }
        };
        if limit == 0 {
            event.db().set_command_limit(guild.id, "roleme", None)?;
            return Ok(Some(vec![event.reply_success("Removed the RoleMe limit.")]));
        }
        event.db().set_command_limit(guild.id, "roleme", Some(limit))?;
        Ok(Some(vec![event.reply_success(format!(
            "Set the RoleMe limit to **{}**.",
            limit
        ))]))
    }
}

struct ListSelfRoles {
    kind: Kind,
}

#[async_trait]
impl Command for ListSelfRoles {
    fn name(&self) -> &str {
        "List"
    }

    fn help(&self) -> &str {
        "Lists the self-assignable roles of this server."
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let names: Vec<String> = event
            .db()
            .get_roles(guild.id, self.kind.role_type)?
            .into_iter()
            .filter_map(|id| guild.role(id))
            .map(|r| format!("`{}`", r.name))
            .collect();
        if names.is_empty() {
            return Ok(Some(vec![event.reply_error(format!(
                "There are no {} roles on this server!",
                self.kind.name
            ))]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "{} roles on **{}**:\n{}",
            self.kind.name,
            guild.name,
            names.join(", ")
        ))]))
    }
}
