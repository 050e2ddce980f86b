use async_trait::async_trait;

use crate::client::CommandEvent;
use crate::command::{ArgsRequired, Category, Command, CommandResult};

pub struct ToggleCommand {
    children: Vec<Box<dyn Command>>,
}

impl ToggleCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(ToggleRolePersist)],
        }
    }
}

#[async_trait]
impl Command for ToggleCommand {
    fn name(&self) -> &str {
        "Toggle"
    }

    fn arguments(&self) -> &str {
        "[Function]"
    }

    fn help(&self) -> &str {
        "Toggles sensitive server functions."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::ServerOwner)
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        Ok(Some(vec![event.reply_error(format!(
            "\"{}\" is not a valid function! Use `{}{} help` for more information on this command!",
            event.args,
            event.prefix(),
            event.fullname
        ))]))
    }
}

/// Members who leave get their roles back when they rejoin.
struct ToggleRolePersist;

#[async_trait]
impl Command for ToggleRolePersist {
    fn name(&self) -> &str {
        "RolePersist"
    }

    fn help(&self) -> &str {
        "Toggles RolePersist for the server."
    }

    fn category(&self) -> Option<Category> {
        Some(Category::ServerOwner)
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let guild = event.require_guild()?;
        let enabled = !event.db().is_role_persist(guild.id)?;
        event.db().set_role_persist(guild.id, enabled)?;
        log::info!(
            "RolePersist {} in guild {}",
            if enabled { "enabled" } else { "disabled" },
            guild.id
        );
        Ok(Some(vec![event.reply_success(format!(
            "RolePersist has been toggled `{}`!",
            if enabled { "ON" } else { "OFF" }
        ))]))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{admin_ctx, full_client, guild_ctx, texts, ERROR, GUILD_ID, OWNER_ID, SUCCESS};

    #[tokio::test]
    async fn test_toggle_role_persist() {
        let client = full_client();
        let out = texts(&client.on_message(&guild_ctx(OWNER_ID, "|toggle rolepersist")).await);
        assert_eq!(out, vec![format!("{} RolePersist has been toggled `ON`!", SUCCESS)]);
        assert!(client.db().is_role_persist(GUILD_ID).unwrap());

        client.db().save_member_roles(GUILD_ID, 9, &[100]).unwrap();
        let out = texts(&client.on_message(&guild_ctx(OWNER_ID, "|toggle RolePersist")).await);
        assert_eq!(out, vec![format!("{} RolePersist has been toggled `OFF`!", SUCCESS)]);
        assert!(client.db().take_member_roles(GUILD_ID, 9).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_is_for_the_owner_only() {
        let client = full_client();
        let out = client.on_message(&admin_ctx(5, "|toggle rolepersist")).await;
        assert!(out.is_empty());
        assert!(!client.db().is_role_persist(GUILD_ID).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_function() {
        let client = full_client();
        let out = texts(&client.on_message(&guild_ctx(OWNER_ID, "|toggle music")).await);
        assert_eq!(
            out,
            vec![format!(
                "{} \"music\" is not a valid function! Use `|toggle help` for more information on this command!",
                ERROR
            )]
        );
    }
}
