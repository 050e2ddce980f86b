use rusqlite::{params, OptionalExtension};

use super::Db;

#[derive(Debug, Clone, PartialEq)]
pub struct Welcome {
    pub channel_id: u64,
    pub message: String,
}

impl Db {
    pub fn get_welcome(&self, guild_id: u64) -> Result<Option<Welcome>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let welcome = conn
            .query_row(
                "SELECT channel_id, message FROM welcomes WHERE guild_id = ?1",
                params![guild_id as i64],
                |row| {
                    Ok(Welcome {
                        channel_id: row.get::<_, i64>(0)? as u64,
                        message: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(welcome)
    }

    pub fn set_welcome(
        &self,
        guild_id: u64,
        channel_id: u64,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO welcomes (guild_id, channel_id, message) VALUES (?1, ?2, ?3)
             ON CONFLICT(guild_id) DO UPDATE SET channel_id = ?2, message = ?3",
            params![guild_id as i64, channel_id as i64, message],
        )?;
        Ok(())
    }

    pub fn remove_welcome(&self, guild_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM welcomes WHERE guild_id = ?1",
            params![guild_id as i64],
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_db;

    #[test]
    fn test_welcome_set_overwrites() {
        let db = setup_db();
        assert_eq!(db.get_welcome(1).unwrap(), None);

        db.set_welcome(1, 10, "Hi {user}").unwrap();
        db.set_welcome(1, 11, "Hello {@user}").unwrap();
        assert_eq!(
            db.get_welcome(1).unwrap(),
            Some(Welcome {
                channel_id: 11,
                message: "Hello {@user}".to_string()
            })
        );

        assert!(db.remove_welcome(1).unwrap());
        assert!(!db.remove_welcome(1).unwrap());
        assert_eq!(db.get_welcome(1).unwrap(), None);
    }
}
