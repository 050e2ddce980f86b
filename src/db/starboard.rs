use rusqlite::{params, OptionalExtension};

use super::Db;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarboardSettings {
    /// Star reactions needed before a message is posted
    pub threshold: u32,
    /// Messages older than this many hours are never posted
    pub max_age: u32,
}

impl Db {
    pub fn get_starboard_settings(
        &self,
        guild_id: u64,
    ) -> Result<Option<StarboardSettings>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let settings = conn
            .query_row(
                "SELECT threshold, max_age FROM starboard_settings WHERE guild_id = ?1",
                params![guild_id as i64],
                |row| {
                    Ok(StarboardSettings {
                        threshold: row.get::<_, i64>(0)? as u32,
                        max_age: row.get::<_, i64>(1)? as u32,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    /// Creates the settings row with defaults if missing.
    pub fn ensure_starboard_settings(
        &self,
        guild_id: u64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO starboard_settings (guild_id) VALUES (?1)",
            params![guild_id as i64],
        )?;
        Ok(())
    }

    pub fn set_starboard_threshold(
        &self,
        guild_id: u64,
        threshold: u32,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "UPDATE starboard_settings SET threshold = ?2 WHERE guild_id = ?1",
            params![guild_id as i64, threshold as i64],
        )?;
        Ok(count > 0)
    }

    pub fn set_starboard_max_age(
        &self,
        guild_id: u64,
        max_age: u32,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "UPDATE starboard_settings SET max_age = ?2 WHERE guild_id = ?1",
            params![guild_id as i64, max_age as i64],
        )?;
        Ok(count > 0)
    }

    /// Drops the settings and every recorded entry of the guild.
    pub fn remove_starboard(&self, guild_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM starboard_settings WHERE guild_id = ?1",
            params![guild_id as i64],
        )?;
        conn.execute(
            "DELETE FROM starboard_entries WHERE guild_id = ?1",
            params![guild_id as i64],
        )?;
        Ok(count > 0)
    }

    /// Returns false when the message was already recorded.
    pub fn add_starboard_entry(
        &self,
        guild_id: u64,
        message_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO starboard_entries (guild_id, message_id) VALUES (?1, ?2)",
            params![guild_id as i64, message_id as i64],
        )?;
        Ok(count > 0)
    }

    /// Forget a recorded message so it can be starred again.
    pub fn remove_starboard_entry(
        &self,
        guild_id: u64,
        message_id: u64,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM starboard_entries WHERE guild_id = ?1 AND message_id = ?2",
            params![guild_id as i64, message_id as i64],
        )?;
        Ok(count > 0)
    }

    pub fn set_starboard_message(
        &self,
        guild_id: u64,
        message_id: u64,
        starboard_message_id: u64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute(
            "UPDATE starboard_entries SET starboard_message_id = ?3 WHERE guild_id = ?1 AND message_id = ?2",
            params![guild_id as i64, message_id as i64, starboard_message_id as i64],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_db;

    #[test]
    fn test_settings_defaults_and_updates() {
        let db = setup_db();
        assert_eq!(db.get_starboard_settings(1).unwrap(), None);
        assert!(!db.set_starboard_threshold(1, 3).unwrap());

        db.ensure_starboard_settings(1).unwrap();
        assert_eq!(
            db.get_starboard_settings(1).unwrap(),
            Some(StarboardSettings {
                threshold: 5,
                max_age: 72
            })
        );

        assert!(db.set_starboard_threshold(1, 3).unwrap());
        assert!(db.set_starboard_max_age(1, 24).unwrap());
        db.ensure_starboard_settings(1).unwrap();
        assert_eq!(
            db.get_starboard_settings(1).unwrap(),
            Some(StarboardSettings {
                threshold: 3,
                max_age: 24
            })
        );
    }

    #[test]
    fn test_entries() {
        let db = setup_db();
        assert!(db.add_starboard_entry(1, 99).unwrap());
        assert!(!db.add_starboard_entry(1, 99).unwrap());
        assert!(db.add_starboard_entry(2, 99).unwrap());

        db.set_starboard_message(1, 99, 1234).unwrap();
        let posted: i64 = db
            .conn()
            .query_row(
                "SELECT starboard_message_id FROM starboard_entries WHERE guild_id = 1 AND message_id = 99",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(posted, 1234);
    }

    #[test]
    fn test_remove_entry_allows_rerecording() {
        let db = setup_db();
        assert!(!db.remove_starboard_entry(1, 99).unwrap());
        db.add_starboard_entry(1, 99).unwrap();
        db.add_starboard_entry(1, 100).unwrap();

        assert!(db.remove_starboard_entry(1, 99).unwrap());
        assert!(db.add_starboard_entry(1, 99).unwrap());
        assert!(!db.add_starboard_entry(1, 100).unwrap());
    }

    #[test]
    fn test_remove_starboard_clears_entries() {
        let db = setup_db();
        db.ensure_starboard_settings(1).unwrap();
        db.add_starboard_entry(1, 99).unwrap();
        assert!(db.remove_starboard(1).unwrap());
        assert!(db.add_starboard_entry(1, 99).unwrap());
        assert!(!db.remove_starboard(1).unwrap());
    }
}
