use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

mod channels;
mod custom;
mod prefixes;
mod profiles;
mod role_persist;
mod roles;
mod settings;
mod starboard;
mod tags;
mod welcomes;
mod whitelist;

pub use channels::ChannelType;
pub use profiles::{Profile, ProfileField};
pub use roles::RoleType;
pub use starboard::StarboardSettings;
pub use tags::Tag;
pub use welcomes::Welcome;

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prefixes (
                guild_id  INTEGER NOT NULL,
                prefix    TEXT NOT NULL,
                PRIMARY KEY (guild_id, prefix)
            );

            CREATE TABLE IF NOT EXISTS guild_roles (
                guild_id  INTEGER NOT NULL,
                role_id   INTEGER NOT NULL,
                type      TEXT NOT NULL,
                PRIMARY KEY (guild_id, role_id, type)
            );

            CREATE TABLE IF NOT EXISTS guild_channels (
                guild_id    INTEGER NOT NULL,
                channel_id  INTEGER NOT NULL,
                type        TEXT NOT NULL,
                PRIMARY KEY (guild_id, type)
            );

            CREATE TABLE IF NOT EXISTS command_settings (
                guild_id      INTEGER NOT NULL,
                command       TEXT NOT NULL,
                level         TEXT,
                limit_number  INTEGER,
                PRIMARY KEY (guild_id, command)
            );

            CREATE TABLE IF NOT EXISTS custom_commands (
                guild_id  INTEGER NOT NULL,
                name      TEXT NOT NULL COLLATE NOCASE,
                content   TEXT NOT NULL,
                PRIMARY KEY (guild_id, name)
            );

            CREATE TABLE IF NOT EXISTS local_tags (
                name      TEXT NOT NULL COLLATE NOCASE,
                guild_id  INTEGER NOT NULL,
                owner_id  INTEGER NOT NULL,
                content   TEXT NOT NULL,
                PRIMARY KEY (name, guild_id)
            );

            CREATE TABLE IF NOT EXISTS global_tags (
                name      TEXT NOT NULL COLLATE NOCASE PRIMARY KEY,
                owner_id  INTEGER NOT NULL,
                content   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS welcomes (
                guild_id    INTEGER PRIMARY KEY,
                channel_id  INTEGER NOT NULL,
                message     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS starboard_settings (
                guild_id   INTEGER PRIMARY KEY,
                threshold  INTEGER NOT NULL DEFAULT 5,
                max_age    INTEGER NOT NULL DEFAULT 72
            );

            CREATE TABLE IF NOT EXISTS starboard_entries (
                guild_id              INTEGER NOT NULL,
                message_id            INTEGER NOT NULL,
                starboard_message_id  INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (guild_id, message_id)
            );

            CREATE TABLE IF NOT EXISTS music_whitelist (
                guild_id  INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS profiles (
                user_id    INTEGER PRIMARY KEY,
                time_zone  TEXT,
                github     TEXT,
                website    TEXT,
                twitch     TEXT,
                title      TEXT,
                birthday   TEXT,
                about      TEXT
            );

            CREATE TABLE IF NOT EXISTS role_persist_guilds (
                guild_id  INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS role_persist (
                guild_id  INTEGER NOT NULL,
                user_id   INTEGER NOT NULL,
                role_ids  TEXT NOT NULL,
                PRIMARY KEY (guild_id, user_id)
            );",
        )?;
        Ok(())
    }
}

/// Unwrap a persistence result for a caller that has to keep going, logging
/// the failure and falling back to `default`.
pub fn logged_or<T>(
    result: Result<T, Box<dyn std::error::Error + Send + Sync>>,
    default: T,
    what: &str,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::error!("Database error during {}: {}", what, e);
            default
        }
    }
}

#[cfg(test)]
pub(crate) fn setup_db() -> Db {
    Db::open(Path::new(":memory:")).unwrap()
}
