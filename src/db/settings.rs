use rusqlite::{params, Connection, OptionalExtension};

use super::Db;
use crate::command::CommandLevel;

impl Db {
    /// Guild override of a command's level, keyed by the command's full name.
    pub fn get_command_level(
        &self,
        guild_id: u64,
        command: &str,
    ) -> Result<Option<CommandLevel>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let level: Option<Option<String>> = conn
            .query_row(
                "SELECT level FROM command_settings WHERE guild_id = ?1 AND command = ?2",
                params![guild_id as i64, command.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(level.flatten().and_then(|l| CommandLevel::from_stored(&l)))
    }

    pub fn set_command_level(
        &self,
        guild_id: u64,
        command: &str,
        level: Option<CommandLevel>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO command_settings (guild_id, command, level) VALUES (?1, ?2, ?3)
             ON CONFLICT(guild_id, command) DO UPDATE SET level = ?3",
            params![guild_id as i64, command.to_lowercase(), level.map(|l| l.as_str())],
        )?;
        prune_settings(&conn, guild_id, command)
    }

    pub fn get_command_limit(
        &self,
        guild_id: u64,
        command: &str,
    ) -> Result<Option<u32>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let limit: Option<Option<i64>> = conn
            .query_row(
                "SELECT limit_number FROM command_settings WHERE guild_id = ?1 AND command = ?2",
                params![guild_id as i64, command.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(limit.flatten().map(|l| l as u32))
    }

    pub fn set_command_limit(
        &self,
        guild_id: u64,
        command: &str,
        limit: Option<u32>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO command_settings (guild_id, command, limit_number) VALUES (?1, ?2, ?3)
             ON CONFLICT(guild_id, command) DO UPDATE SET limit_number = ?3",
            params![guild_id as i64, command.to_lowercase(), limit.map(|l| l as i64)],
        )?;
        prune_settings(&conn, guild_id, command)
    }
}

/// A settings row with neither a level nor a limit carries no information.
fn prune_settings(
    conn: &Connection,
    guild_id: u64,
    command: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conn.execute(
        "DELETE FROM command_settings
         WHERE guild_id = ?1 AND command = ?2 AND level IS NULL AND limit_number IS NULL",
        params![guild_id as i64, command.to_lowercase()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_db;

    fn row_count(db: &Db) -> i64 {
        db.conn()
            .query_row("SELECT COUNT(*) FROM command_settings", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_level_round_trip_case_insensitive() {
        let db = setup_db();
        assert_eq!(db.get_command_level(1, "tag create").unwrap(), None);

        db.set_command_level(1, "Tag Create", Some(CommandLevel::Moderator)).unwrap();
        assert_eq!(
            db.get_command_level(1, "tag create").unwrap(),
            Some(CommandLevel::Moderator)
        );
        assert_eq!(db.get_command_level(2, "tag create").unwrap(), None);
    }

    #[test]
    fn test_limit_and_level_share_a_row() {
        let db = setup_db();
        db.set_command_limit(1, "roleme", Some(3)).unwrap();
        db.set_command_level(1, "roleme", Some(CommandLevel::Administrator)).unwrap();
        assert_eq!(row_count(&db), 1);
        assert_eq!(db.get_command_limit(1, "roleme").unwrap(), Some(3));

        db.set_command_level(1, "roleme", None).unwrap();
        assert_eq!(row_count(&db), 1);
        assert_eq!(db.get_command_level(1, "roleme").unwrap(), None);
        assert_eq!(db.get_command_limit(1, "roleme").unwrap(), Some(3));
    }

    #[test]
    fn test_row_removed_when_both_null() {
        let db = setup_db();
        db.set_command_limit(1, "roleme", Some(2)).unwrap();
        db.set_command_limit(1, "roleme", None).unwrap();
        assert_eq!(row_count(&db), 0);

        db.set_command_level(1, "ping", None).unwrap();
        assert_eq!(row_count(&db), 0);
    }
}
