use rusqlite::{params, OptionalExtension};

use super::Db;

impl Db {
    pub fn get_custom_command(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let content = conn
            .query_row(
                "SELECT content FROM custom_commands WHERE guild_id = ?1 AND name = ?2",
                params![guild_id as i64, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(content)
    }

    /// Returns false when a custom command of that name already exists.
    pub fn add_custom_command(
        &self,
        guild_id: u64,
        name: &str,
        content: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO custom_commands (guild_id, name, content) VALUES (?1, ?2, ?3)",
            params![guild_id as i64, name, content],
        )?;
        Ok(count > 0)
    }

    pub fn remove_custom_command(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "DELETE FROM custom_commands WHERE guild_id = ?1 AND name = ?2",
            params![guild_id as i64, name],
        )?;
        Ok(count > 0)
    }

    pub fn get_custom_command_names(
        &self,
        guild_id: u64,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT name FROM custom_commands WHERE guild_id = ?1 ORDER BY name ASC")?;
        let names = stmt
            .query_map(params![guild_id as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::setup_db;

    #[test]
    fn test_custom_command_lookup_ignores_case() {
        let db = setup_db();
        assert!(db.add_custom_command(1, "Rules", "Be nice, {user}").unwrap());
        assert_eq!(
            db.get_custom_command(1, "rules").unwrap().as_deref(),
            Some("Be nice, {user}")
        );
        assert_eq!(db.get_custom_command(2, "rules").unwrap(), None);
    }

    #[test]
    fn test_custom_command_duplicate_rejected() {
        let db = setup_db();
        assert!(db.add_custom_command(1, "rules", "a").unwrap());
        assert!(!db.add_custom_command(1, "RULES", "b").unwrap());
        assert_eq!(db.get_custom_command(1, "rules").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_custom_command_remove_and_list() {
        let db = setup_db();
        db.add_custom_command(1, "zeta", "z").unwrap();
        db.add_custom_command(1, "alpha", "a").unwrap();
        assert_eq!(
            db.get_custom_command_names(1).unwrap(),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
        assert!(db.remove_custom_command(1, "ZETA").unwrap());
        assert!(!db.remove_custom_command(1, "zeta").unwrap());
        assert_eq!(db.get_custom_command_names(1).unwrap().len(), 1);
    }
}
