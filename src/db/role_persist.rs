use rusqlite::{params, OptionalExtension};

use super::Db;

impl Db {
    pub fn is_role_persist(&self, guild_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let found = conn
            .query_row(
                "SELECT 1 FROM role_persist_guilds WHERE guild_id = ?1",
                params![guild_id as i64],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Turning RolePersist off forgets every saved member of the guild.
    pub fn set_role_persist(
        &self,
        guild_id: u64,
        enabled: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        if enabled {
            tx.execute(
                "INSERT OR IGNORE INTO role_persist_guilds (guild_id) VALUES (?1)",
                params![guild_id as i64],
            )?;
        } else {
            tx.execute(
                "DELETE FROM role_persist_guilds WHERE guild_id = ?1",
                params![guild_id as i64],
            )?;
            tx.execute(
                "DELETE FROM role_persist WHERE guild_id = ?1",
                params![guild_id as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Roles are stored as a `|` separated id list, replacing any earlier save.
    pub fn save_member_roles(
        &self,
        guild_id: u64,
        user_id: u64,
        role_ids: &[u64],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let joined = role_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let conn = self.conn();
        conn.execute(
            "INSERT INTO role_persist (guild_id, user_id, role_ids) VALUES (?1, ?2, ?3)
             ON CONFLICT(guild_id, user_id) DO UPDATE SET role_ids = ?3",
            params![guild_id as i64, user_id as i64, joined],
        )?;
        Ok(())
    }

    /// Saved roles of a member, removed from storage as they are read.
    pub fn take_member_roles(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Vec<u64>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let stored: Option<String> = conn
            .query_row(
                "SELECT role_ids FROM role_persist WHERE guild_id = ?1 AND user_id = ?2",
                params![guild_id as i64, user_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        let stored = match stored {
            Some(stored) => stored,
            None => return Ok(Vec::new()),
        };
        conn.execute(
            "DELETE FROM role_persist WHERE guild_id = ?1 AND user_id = ?2",
            params![guild_id as i64, user_id as i64],
        )?;
        Ok(stored.split('|').filter_map(|id| id.parse().ok()).collect())
    }
}
