use rusqlite::params;

use super::Db;

impl Db {
    pub fn is_music_whitelisted(&self, guild_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM music_whitelist WHERE guild_id = ?1",
            params![guild_id as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn add_music_whitelist(&self, guild_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO music_whitelist (guild_id) VALUES (?1)",
            params![guild_id as i64],
        )?;
        Ok(count > 0)
    }

    pub fn remove_music_whitelist(&self, guild_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM music_whitelist WHERE guild_id = ?1",
            params![guild_id as i64],
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::setup_db;

    #[test]
    fn test_whitelist_add_remove() {
        let db = setup_db();
        assert!(!db.is_music_whitelisted(1).unwrap());
        assert!(db.add_music_whitelist(1).unwrap());
        assert!(!db.add_music_whitelist(1).unwrap());
        assert!(db.is_music_whitelisted(1).unwrap());
        assert!(db.remove_music_whitelist(1).unwrap());
        assert!(!db.is_music_whitelisted(1).unwrap());
    }
}
