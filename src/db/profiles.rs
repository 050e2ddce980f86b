use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::Db;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One customisable line of a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    TimeZone,
    Github,
    Website,
    Twitch,
    Title,
    Birthday,
    About,
}

impl ProfileField {
    pub const ALL: [ProfileField; 7] = [
        ProfileField::Title,
        ProfileField::TimeZone,
        ProfileField::Birthday,
        ProfileField::Github,
        ProfileField::Website,
        ProfileField::Twitch,
        ProfileField::About,
    ];

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "timezone" | "tz" | "location" => Some(ProfileField::TimeZone),
            "github" => Some(ProfileField::Github),
            "website" | "site" => Some(ProfileField::Website),
            "twitch" => Some(ProfileField::Twitch),
            "title" | "titlecard" => Some(ProfileField::Title),
            "birthday" => Some(ProfileField::Birthday),
            "about" | "information" | "info" => Some(ProfileField::About),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProfileField::TimeZone => "Time Zone",
            ProfileField::Github => "GitHub",
            ProfileField::Website => "Website",
            ProfileField::Twitch => "Twitch",
            ProfileField::Title => "Title",
            ProfileField::Birthday => "Birthday",
            ProfileField::About => "About",
        }
    }

    /// Longest value the field stores.
    pub fn max_len(&self) -> usize {
        match self {
            ProfileField::TimeZone => 75,
            ProfileField::Title => 50,
            ProfileField::About => 1800,
            _ => 100,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            ProfileField::TimeZone => "time_zone",
            ProfileField::Github => "github",
            ProfileField::Website => "website",
            ProfileField::Twitch => "twitch",
            ProfileField::Title => "title",
            ProfileField::Birthday => "birthday",
            ProfileField::About => "about",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub user_id: u64,
    pub time_zone: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub twitch: Option<String>,
    pub title: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub about: Option<String>,
}

impl Profile {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let birthday: Option<String> = row.get(6)?;
        Ok(Profile {
            user_id: row.get::<_, i64>(0)? as u64,
            time_zone: row.get(1)?,
            github: row.get(2)?,
            website: row.get(3)?,
            twitch: row.get(4)?,
            title: row.get(5)?,
            birthday: birthday.and_then(|b| NaiveDate::parse_from_str(&b, DATE_FORMAT).ok()),
            about: row.get(7)?,
        })
    }

    /// Display value of a field, if set.
    pub fn field(&self, field: ProfileField) -> Option<String> {
        match field {
            ProfileField::TimeZone => self.time_zone.clone(),
            ProfileField::Github => self.github.clone(),
            ProfileField::Website => self.website.clone(),
            ProfileField::Twitch => self.twitch.clone(),
            ProfileField::Title => self.title.clone(),
            ProfileField::Birthday => self.birthday.map(|b| b.format(DATE_FORMAT).to_string()),
            ProfileField::About => self.about.clone(),
        }
    }
}

impl Db {
    pub fn get_profile(&self, user_id: u64) -> Result<Option<Profile>, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let profile = conn
            .query_row(
                "SELECT user_id, time_zone, github, website, twitch, title, birthday, about
                 FROM profiles WHERE user_id = ?1",
                params![user_id as i64],
                Profile::from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// Returns false when the user already has a profile.
    pub fn create_profile(&self, user_id: u64) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let count = conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id) VALUES (?1)",
            params![user_id as i64],
        )?;
        Ok(count > 0)
    }

    /// Set or clear one field. Birthdays are stored as `YYYY-MM-DD`. Returns
    /// false when the user has no profile.
    pub fn set_profile_field(
        &self,
        user_id: u64,
        field: ProfileField,
        value: Option<&str>,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let conn = self.conn();
        let sql = format!("UPDATE profiles SET {} = ?2 WHERE user_id = ?1", field.column());
        let count = conn.execute(&sql, params![user_id as i64, value])?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_db;

    #[test]
    fn test_create_profile_once() {
        let db = setup_db();
        assert_eq!(db.get_profile(9).unwrap(), None);
        assert!(db.create_profile(9).unwrap());
        assert!(!db.create_profile(9).unwrap());
        assert_eq!(
            db.get_profile(9).unwrap(),
            Some(Profile {
                user_id: 9,
                ..Profile::default()
            })
        );
    }

    #[test]
    fn test_set_and_clear_fields() {
        let db = setup_db();
        assert!(!db.set_profile_field(9, ProfileField::Title, Some("Nope")).unwrap());

        db.create_profile(9).unwrap();
        db.set_profile_field(9, ProfileField::Title, Some("Dragon Rider")).unwrap();
        db.set_profile_field(9, ProfileField::Birthday, Some("1995-06-15")).unwrap();
        let profile = db.get_profile(9).unwrap().unwrap();
        assert_eq!(profile.title.as_deref(), Some("Dragon Rider"));
        assert_eq!(profile.birthday, NaiveDate::from_ymd_opt(1995, 6, 15));
        assert_eq!(profile.field(ProfileField::Birthday).as_deref(), Some("1995-06-15"));

        db.set_profile_field(9, ProfileField::Title, None).unwrap();
        assert_eq!(db.get_profile(9).unwrap().unwrap().title, None);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ProfileField::from_name("TZ"), Some(ProfileField::TimeZone));
        assert_eq!(ProfileField::from_name("site"), Some(ProfileField::Website));
        assert_eq!(ProfileField::from_name("info"), Some(ProfileField::About));
        assert_eq!(ProfileField::from_name("favorite"), None);
    }
}
