use rusqlite::{params, OptionalExtension};

use super::Db;

/// Kinds of role rows kept per guild. `Moderator` holds at most one role;
/// the self-assignable lists hold any number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleType {
    Moderator,
    RoleMe,
    ColorMe,
}

impl RoleType {
    fn as_str(&self) -> &'static str {
        match self {
            RoleType::Moderator => "moderator",
            RoleType::RoleMe => "role_me",
            RoleType::ColorMe => "color_me",
        }
    }
}

impl Db {
    pub fn get_single_role(
        &self,
        guild_id: u64,
        kind: RoleType,
    ) -> Result<Option<u64>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let role: Option<i64> = conn
            .query_row(
                "SELECT role_id FROM guild_roles WHERE guild_id = ?1 AND type = ?2",
                params![guild_id as i64, kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(role.map(|r| r as u64))
    }

    pub fn set_single_role(
        &self,
        guild_id: u64,
        role_id: u64,
        kind: RoleType,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM guild_roles WHERE guild_id = ?1 AND type = ?2",
            params![guild_id as i64, kind.as_str()],
        )?;
        tx.execute(
            "INSERT INTO guild_roles (guild_id, role_id, type) VALUES (?1, ?2, ?3)",
            params![guild_id as i64, role_id as i64, kind.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn clear_single_role(
        &self,
        guild_id: u64,
        kind: RoleType,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM guild_roles WHERE guild_id = ?1 AND type = ?2",
            params![guild_id as i64, kind.as_str()],
        )?;
        Ok(count > 0)
    }

    pub fn get_roles(
        &self,
        guild_id: u64,
        kind: RoleType,
    ) -> Result<Vec<u64>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT role_id FROM guild_roles WHERE guild_id = ?1 AND type = ?2 ORDER BY rowid ASC",
        )?;
        let roles = stmt
            .query_map(params![guild_id as i64, kind.as_str()], |row| {
                Ok(row.get::<_, i64>(0)? as u64)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(roles)
    }

    pub fn add_role(
        &self,
        guild_id: u64,
        role_id: u64,
        kind: RoleType,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO guild_roles (guild_id, role_id, type) VALUES (?1, ?2, ?3)",
            params![guild_id as i64, role_id as i64, kind.as_str()],
        )?;
        Ok(count > 0)
    }

    pub fn remove_role(
        &self,
        guild_id: u64,
        role_id: u64,
        kind: RoleType,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM guild_roles WHERE guild_id = ?1 AND role_id = ?2 AND type = ?3",
            params![guild_id as i64, role_id as i64, kind.as_str()],
        )?;
        Ok(count > 0)
    }
}
