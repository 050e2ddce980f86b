use super::Client;
use crate::db::logged_or;

impl Client {
    /// Remember the roles of a member leaving a guild with RolePersist on.
    pub fn on_member_leave(&self, guild_id: u64, user_id: u64, role_ids: &[u64]) {
        if role_ids.is_empty()
            || !logged_or(self.db.is_role_persist(guild_id), false, "RolePersist lookup")
        {
            return;
        }
        match self.db.save_member_roles(guild_id, user_id, role_ids) {
            Ok(()) => log::debug!(
                "Saved {} role(s) of user {} in guild {}",
                role_ids.len(),
                user_id,
                guild_id
            ),
            Err(e) => log::error!("Failed to save roles of user {}: {}", user_id, e),
        }
    }

    /// Roles to give back to a rejoining member. Empty when RolePersist is
    /// off; saved roles are forgotten once returned.
    pub fn roles_to_restore(&self, guild_id: u64, user_id: u64) -> Vec<u64> {
        if !logged_or(self.db.is_role_persist(guild_id), false, "RolePersist lookup") {
            return Vec::new();
        }
        logged_or(
            self.db.take_member_roles(guild_id, user_id),
            Vec::new(),
            "saved role lookup",
        )
    }
}
