use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{ArgsRequired, Category, Command, CommandResult};
use crate::db::RoleType;
use crate::util::find_roles;

pub struct ModeratorCommand {
    children: Vec<Box<dyn Command>>,
}

impl ModeratorCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(SetModerator), Box::new(RemoveModerator)],
        }
    }
}

#[async_trait]
impl Command for ModeratorCommand {
    fn name(&self) -> &str {
        "Moderator"
    }

    fn aliases(&self) -> &[&str] {
        &["modrole"]
    }

    fn arguments(&self) -> &str {
        "<Function>"
    }

    fn help(&self) -> &str {
        "Shows the role whose members run moderator level commands."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let role = event
            .db()
            .get_single_role(guild.id, RoleType::Moderator)?
            .and_then(|id| guild.role(id));
        let response = match role {
            Some(role) => event.reply_success(format!("The moderator role is **{}**.", role.name)),
            None => event.reply_warning("No moderator role is set for this server!"),
        };
        Ok(Some(vec![response]))
    }
}

struct SetModerator;

#[async_trait]
impl Command for SetModerator {
    fn name(&self) -> &str {
        "Set"
    }

    fn arguments(&self) -> &str {
        "[Role]"
    }

    fn help(&self) -> &str {
        "Sets the moderator role."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let found = find_roles(guild, &event.args);
        let role = match found.as_slice() {
            [role] => *role,
            [] => {
                return Ok(Some(vec![event.reply_error(format!(
                    "No role matching \"{}\" was found!",
                    event.args
                ))]))
            }
            _ => {
                return Ok(Some(vec![event.reply_error(format!(
                    "Multiple roles match \"{}\", please be more specific!",
                    event.args
                ))]))
            }
        };
        event.db().set_single_role(guild.id, role.id, RoleType::Moderator)?;
        Ok(Some(vec![event.reply_success(format!(
            "**{}** is now the moderator role.",
            role.name
        ))]))
    }
}

struct RemoveModerator;

#[async_trait]
impl Command for RemoveModerator {
    fn name(&self) -> &str {
        "Remove"
    }

    fn help(&self) -> &str {
        "Removes the moderator role."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::Administrator)
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        if !event.db().clear_single_role(guild.id, RoleType::Moderator)? {
            return Ok(Some(vec![
                event.reply_error("No moderator role is set for this server!"),
            ]));
        }
        Ok(Some(vec![event.reply_success("Removed the moderator role.")]))
    }
}

#[cfg(test)]
mod tests {
    use crate::db::RoleType;
    use crate::testing::*;

    #[tokio::test]
    async fn test_set_and_show_moderator_role() {
        let client = full_client();
        let out = texts(&client.on_message(&admin_ctx(5, "|modrole set mods")).await);
        assert_eq!(out, vec![format!("{} **Mods** is now the moderator role.", SUCCESS)]);
        assert_eq!(
            client.db().get_single_role(GUILD_ID, RoleType::Moderator).unwrap(),
            Some(MODS)
        );

        let out = texts(&client.on_message(&admin_ctx(5, "|moderator")).await);
        assert_eq!(out, vec![format!("{} The moderator role is **Mods**.", SUCCESS)]);

        client.on_message(&admin_ctx(5, &format!("|modrole set <@&{}>", RED))).await;
        assert_eq!(
            client.db().get_single_role(GUILD_ID, RoleType::Moderator).unwrap(),
            Some(RED)
        );
    }

    #[tokio::test]
    async fn test_role_lookup_failures() {
        let client = full_client();
        let out = texts(&client.on_message(&admin_ctx(5, "|modrole set purple")).await);
        assert!(out[0].contains("No role matching \"purple\""));

        let out = texts(&client.on_message(&admin_ctx(5, "|modrole set e")).await);
        assert!(out[0].contains("Multiple roles match"));
    }

    #[tokio::test]
    async fn test_remove_moderator_role() {
        let client = full_client();
        let out = texts(&client.on_message(&admin_ctx(5, "|modrole remove")).await);
        assert!(out[0].starts_with(ERROR));

        client.on_message(&admin_ctx(5, "|modrole set gamer")).await;
        let out = texts(&client.on_message(&admin_ctx(5, "|modrole remove")).await);
        assert_eq!(out, vec![format!("{} Removed the moderator role.", SUCCESS)]);

        let out = texts(&client.on_message(&admin_ctx(5, "|modrole")).await);
        assert!(out[0].starts_with(WARNING));
    }
}
