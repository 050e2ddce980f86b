use rusqlite::params;

use super::Db;

impl Db {
    pub fn get_prefixes(&self, guild_id: u64) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT prefix FROM prefixes WHERE guild_id = ?1 ORDER BY rowid ASC")?;
        let prefixes = stmt
            .query_map(params![guild_id as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(prefixes)
    }

    /// Returns false when the prefix was already present.
    pub fn add_prefix(&self, guild_id: u64, prefix: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO prefixes (guild_id, prefix) VALUES (?1, ?2)",
            params![guild_id as i64, prefix.to_lowercase()],
        )?;
        Ok(count > 0)
    }

    pub fn remove_prefix(&self, guild_id: u64, prefix: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM prefixes WHERE guild_id = ?1 AND prefix = ?2",
            params![guild_id as i64, prefix.to_lowercase()],
        )?;
        Ok(count > 0)
    }
}
