use rusqlite::{params, OptionalExtension};

use super::Db;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Starboard,
}

impl ChannelType {
    fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Starboard => "starboard",
        }
    }
}

impl Db {
    pub fn get_channel(
        &self,
        guild_id: u64,
        kind: ChannelType,
    ) -> Result<Option<u64>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let channel: Option<i64> = conn
            .query_row(
                "SELECT channel_id FROM guild_channels WHERE guild_id = ?1 AND type = ?2",
                params![guild_id as i64, kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(channel.map(|c| c as u64))
    }

    pub fn set_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
        kind: ChannelType,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO guild_channels (guild_id, channel_id, type) VALUES (?1, ?2, ?3)
             ON CONFLICT(guild_id, type) DO UPDATE SET channel_id = ?2",
            params![guild_id as i64, channel_id as i64, kind.as_str()],
        )?;
        Ok(())
    }

    pub fn remove_channel(
        &self,
        guild_id: u64,
        kind: ChannelType,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM guild_channels WHERE guild_id = ?1 AND type = ?2",
            params![guild_id as i64, kind.as_str()],
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_db;

    #[test]
    fn test_set_get_remove_channel() {
        let db = setup_db();
        assert_eq!(db.get_channel(1, ChannelType::Starboard).unwrap(), None);

        db.set_channel(1, 50, ChannelType::Starboard).unwrap();
        db.set_channel(1, 51, ChannelType::Starboard).unwrap();
        assert_eq!(db.get_channel(1, ChannelType::Starboard).unwrap(), Some(51));
        assert_eq!(db.get_channel(2, ChannelType::Starboard).unwrap(), None);

        assert!(db.remove_channel(1, ChannelType::Starboard).unwrap());
        assert!(!db.remove_channel(1, ChannelType::Starboard).unwrap());
    }
}
