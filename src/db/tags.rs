use rusqlite::{params, OptionalExtension};

use super::Db;

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub content: String,
    pub owner_id: u64,
    /// `None` for global tags
    pub guild_id: Option<u64>,
}

impl Tag {
    pub fn is_global(&self) -> bool {
        self.guild_id.is_none()
    }
}

impl Db {
    pub fn get_local_tag(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<Tag>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let tag = conn
            .query_row(
                "SELECT name, owner_id, content FROM local_tags WHERE guild_id = ?1 AND name = ?2",
                params![guild_id as i64, name],
                |row| {
                    Ok(Tag {
                        name: row.get(0)?,
                        owner_id: row.get::<_, i64>(1)? as u64,
                        content: row.get(2)?,
                        guild_id: Some(guild_id),
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }

    pub fn get_global_tag(&self, name: &str) -> Result<Option<Tag>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let tag = conn
            .query_row(
                "SELECT name, owner_id, content FROM global_tags WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Tag {
                        name: row.get(0)?,
                        owner_id: row.get::<_, i64>(1)? as u64,
                        content: row.get(2)?,
                        guild_id: None,
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }

    /// Local tag of the guild if any, else the global tag of that name.
    pub fn find_tag(
        &self,
        guild_id: Option<u64>,
        name: &str,
    ) -> Result<Option<Tag>, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(guild_id) = guild_id {
            if let Some(tag) = self.get_local_tag(guild_id, name)? {
                return Ok(Some(tag));
            }
        }
        self.get_global_tag(name)
    }

    /// Returns false when a tag of that name already exists in the guild.
    pub fn add_local_tag(
        &self,
        guild_id: u64,
        name: &str,
        owner_id: u64,
        content: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO local_tags (name, guild_id, owner_id, content) VALUES (?1, ?2, ?3, ?4)",
            params![name, guild_id as i64, owner_id as i64, content],
        )?;
        Ok(count > 0)
    }

    /// Returns false when a global tag of that name already exists.
    pub fn add_global_tag(
        &self,
        name: &str,
        owner_id: u64,
        content: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO global_tags (name, owner_id, content) VALUES (?1, ?2, ?3)",
            params![name, owner_id as i64, content],
        )?;
        Ok(count > 0)
    }

    pub fn edit_tag(&self, tag: &Tag, content: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        match tag.guild_id {
            Some(guild_id) => conn.execute(
                "UPDATE local_tags SET content = ?1 WHERE guild_id = ?2 AND name = ?3",
                params![content, guild_id as i64, tag.name],
            )?,
            None => conn.execute(
                "UPDATE global_tags SET content = ?1 WHERE name = ?2",
                params![content, tag.name],
            )?,
        };
        Ok(())
    }

    pub fn delete_tag(&self, tag: &Tag) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = match tag.guild_id {
            Some(guild_id) => conn.execute(
                "DELETE FROM local_tags WHERE guild_id = ?1 AND name = ?2",
                params![guild_id as i64, tag.name],
            )?,
            None => conn.execute("DELETE FROM global_tags WHERE name = ?1", params![tag.name])?,
        };
        Ok(count > 0)
    }

    /// Names of the tags a user owns: their local tags in the guild followed by
    /// their global tags.
    pub fn get_tag_names_by_owner(
        &self,
        guild_id: Option<u64>,
        owner_id: u64,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let mut names = Vec::new();
        if let Some(guild_id) = guild_id {
            let mut stmt = conn.prepare(
                "SELECT name FROM local_tags WHERE guild_id = ?1 AND owner_id = ?2 ORDER BY name ASC",
            )?;
            let local = stmt
                .query_map(params![guild_id as i64, owner_id as i64], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            names.extend(local);
        }
        let mut stmt =
            conn.prepare("SELECT name FROM global_tags WHERE owner_id = ?1 ORDER BY name ASC")?;
        let global = stmt
            .query_map(params![owner_id as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        names.extend(global);
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::setup_db;

    #[test]
    fn test_local_tag_falls_back_to_global() {
        let db = setup_db();
        db.add_global_tag("hello", 5, "global hi").unwrap();
        assert_eq!(db.find_tag(Some(1), "HELLO").unwrap().unwrap().content, "global hi");

        db.add_local_tag(1, "Hello", 6, "local hi").unwrap();
        let tag = db.find_tag(Some(1), "hello").unwrap().unwrap();
        assert_eq!(tag.content, "local hi");
        assert_eq!(tag.owner_id, 6);
        assert!(!tag.is_global());

        let tag = db.find_tag(None, "hello").unwrap().unwrap();
        assert!(tag.is_global());
        assert!(db.find_tag(Some(1), "missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let db = setup_db();
        assert!(db.add_local_tag(1, "a", 5, "x").unwrap());
        assert!(!db.add_local_tag(1, "A", 6, "y").unwrap());
        assert!(db.add_local_tag(2, "a", 6, "y").unwrap());
        assert!(db.add_global_tag("g", 5, "x").unwrap());
        assert!(!db.add_global_tag("G", 5, "x").unwrap());
    }

    #[test]
    fn test_edit_and_delete() {
        let db = setup_db();
        db.add_local_tag(1, "a", 5, "old").unwrap();
        db.add_global_tag("a", 5, "global").unwrap();

        let local = db.get_local_tag(1, "a").unwrap().unwrap();
        db.edit_tag(&local, "new").unwrap();
        assert_eq!(db.get_local_tag(1, "a").unwrap().unwrap().content, "new");
        assert_eq!(db.get_global_tag("a").unwrap().unwrap().content, "global");

        assert!(db.delete_tag(&local).unwrap());
        assert!(db.get_local_tag(1, "a").unwrap().is_none());
        assert!(db.get_global_tag("a").unwrap().is_some());
    }

    #[test]
    fn test_tag_names_by_owner() {
        let db = setup_db();
        db.add_local_tag(1, "zed", 5, "x").unwrap();
        db.add_local_tag(1, "abc", 5, "x").unwrap();
        db.add_local_tag(2, "other", 5, "x").unwrap();
        db.add_local_tag(1, "notmine", 6, "x").unwrap();
        db.add_global_tag("glob", 5, "x").unwrap();

        assert_eq!(
            db.get_tag_names_by_owner(Some(1), 5).unwrap(),
            vec!["abc".to_string(), "zed".to_string(), "glob".to_string()]
        );
        assert_eq!(db.get_tag_names_by_owner(None, 5).unwrap(), vec!["glob".to_string()]);
    }
}
