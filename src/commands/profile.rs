use async_trait::async_trait;
use chrono::{Datelike, Month, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::client::CommandEvent;
use crate::command::{split_first, ArgsRequired, Command, CommandResult, CooldownScope};
use crate::db::{Profile, ProfileField};
use crate::message::Response;
use crate::util::parse_snowflake;

static RE_TIME_ZONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:utc|gmt)(?:\s*([+-])\s*(\d{1,2})(?::?(\d{2}))?)?$").unwrap()
});
static RE_GITHUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?github\.com/([a-z0-9](?:[a-z0-9-]{0,38}))/?$").unwrap()
});
static RE_TWITCH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?twitch\.tv/(\w{4,25})/?$").unwrap()
});
static RE_WEBSITE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/]+\.[^\s]+$").unwrap());
static RE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").unwrap());

const EARLIEST_BIRTH_YEAR: i32 = 1930;

pub struct ProfileCommand {
    children: Vec<Box<dyn Command>>,
}

impl ProfileCommand {
    pub fn new() -> Self {
        Self {
            children: vec![Box::new(CreateProfile), Box::new(SetProfile)],
        }
    }
}

#[async_trait]
impl Command for ProfileCommand {
    fn name(&self) -> &str {
        "Profile"
    }

    fn aliases(&self) -> &[&str] {
        &["p"]
    }

    fn arguments(&self) -> &str {
        "<@User>"
    }

    fn help(&self) -> &str {
        "Displays a user's NightFury Profile."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn cooldown(&self) -> u64 {
        10
    }

    fn cooldown_scope(&self) -> CooldownScope {
        CooldownScope::User
    }

    fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let own = event.args.is_empty();
        let (user_id, name) = if own {
            (event.ctx.author.id, event.ctx.author.name.clone())
        } else if let Some(user) = event.ctx.mentions.first() {
            (user.id, user.name.clone())
        } else if let Some(id) = parse_snowflake(&event.args) {
            (id, format!("<@{}>", id))
        } else {
            return Ok(Some(vec![event.reply_error(format!(
                "No users found matching \"{}\"!",
                event.args
            ))]));
        };

        let profile = match event.db().get_profile(user_id)? {
            Some(profile) => profile,
            None if own => {
                return Ok(Some(vec![event.reply_error(format!(
                    "**You have not created a profile!**\nUse `{}profile create` to create a profile!",
                    event.prefix()
                ))]))
            }
            None => {
                return Ok(Some(vec![
                    event.reply_error(format!("**{}** has not created a profile!", name)),
                ]))
            }
        };

        event.invoke_cooldown();
        Ok(Some(vec![event.reply(render_profile(&name, &profile))]))
    }
}

fn render_profile(name: &str, profile: &Profile) -> String {
    let mut text = format!("__**{}**'s NightFury Profile__\n", name);
    let mut any = false;
    for field in ProfileField::ALL {
        if let Some(value) = profile.field(field) {
            any = true;
            if field == ProfileField::About {
                text.push_str(&format!("\n**{}:**\n{}", field.title(), value));
            } else {
                text.push_str(&format!("\n**{}:** {}", field.title(), value));
            }
        }
    }
    if !any {
        text.push_str("\n*Nothing here yet!*");
    }
    text
}

struct CreateProfile;

#[async_trait]
impl Command for CreateProfile {
    fn name(&self) -> &str {
        "Create"
    }

    fn help(&self) -> &str {
        "Creates a NightFury Profile for you."
    }

    fn guild_only(&self) -> bool {
        false
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        if !event.db().create_profile(event.ctx.author.id)? {
            return Ok(Some(vec![
                event.reply_warning("You have already set up a NightFury Profile!"),
            ]));
        }
        Ok(Some(vec![event.reply_success(format!(
            "Successfully created a NightFury Profile! Use `{}profile set` to customize it!",
            event.prefix()
        ))]))
    }
}

struct SetProfile;

#[async_trait]
impl Command for SetProfile {
    fn name(&self) -> &str {
        "Set"
    }

    fn arguments(&self) -> &str {
        "[Field] <Value>"
    }

    fn help(&self) -> &str {
        "Sets a Profile field, or clears it when no value is given."
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn args_required(&self) -> ArgsRequired {
        ArgsRequired::Default
    }

    async fn execute(&self, event: &CommandEvent<'_>) -> CommandResult {
        let user_id = event.ctx.author.id;
        if event.db().get_profile(user_id)?.is_none() {
            return Ok(Some(vec![event.reply_error(format!(
                "**You have not created a NightFury Profile yet!**\nUse `{}profile create` to set one up, then try again!",
                event.prefix()
            ))]));
        }

        let (name, value) = split_first(&event.args);
        let field = match ProfileField::from_name(name) {
            Some(field) => field,
            None => {
                return Ok(Some(vec![event.reply_error(format!(
                    "**\"{}\" is not a profile field!**\nValid fields are: timezone, github, website, twitch, title, birthday, about.",
                    name
                ))]))
            }
        };

        if value.is_empty() {
            event.db().set_profile_field(user_id, field, None)?;
            return Ok(Some(vec![
                event.reply_success(format!("Successfully removed **{}**!", field.title())),
            ]));
        }

        if value.chars().count() > field.max_len() {
            return Ok(Some(vec![event.reply_error(format!(
                "The value to set was too long! The maximum length of **{}** is {} characters!",
                field.title(),
                field.max_len()
            ))]));
        }
        let stored = match validate(event, field, value) {
            Ok(stored) => stored,
            Err(reply) => return Ok(Some(vec![reply])),
        };
        event.db().set_profile_field(user_id, field, Some(&stored))?;
        Ok(Some(vec![
            event.reply_success(format!("Successfully set **{}**!", field.title())),
        ]))
    }
}

/// Check a field value and turn it into its stored form.
fn validate(event: &CommandEvent<'_>, field: ProfileField, value: &str) -> Result<String, Response> {
    match field {
        ProfileField::TimeZone => parse_time_zone(value).ok_or_else(|| {
            event.reply_error(format!(
                "**`{}` is not a valid time zone!**\nUse an offset such as `UTC`, `UTC+2` or `GMT-03:30`.",
                value
            ))
        }),
        ProfileField::Github => RE_GITHUB
            .captures(value)
            .map(|caps| format!("https://github.com/{}", &caps[1]))
            .ok_or_else(|| {
                event.reply_error("Invalid GitHub URL specified! You must provide a valid GitHub User URL!")
            }),
        ProfileField::Twitch => RE_TWITCH
            .captures(value)
            .map(|caps| format!("https://twitch.tv/{}", &caps[1]))
            .ok_or_else(|| {
                event.reply_error("Invalid Twitch URL specified! You must provide a valid Twitch User URL!")
            }),
        ProfileField::Website => {
            if RE_WEBSITE.is_match(value) {
                Ok(value.to_string())
            } else {
                Err(event.reply_error("Invalid website specified! It must start with `http://` or `https://`!"))
            }
        }
        ProfileField::Birthday => parse_birthday(value, Utc::now().year())
            .map(|date| date.format("%Y-%m-%d").to_string())
            .map_err(|e| event.reply_error(e)),
        ProfileField::Title | ProfileField::About => Ok(value.to_string()),
    }
}

/// Normalise a UTC offset such as `gmt+2` to `UTC+02:00`.
fn parse_time_zone(value: &str) -> Option<String> {
    let caps = RE_TIME_ZONE.captures(value.trim())?;
    let sign = match caps.get(1) {
        Some(sign) => sign.as_str(),
        None => return Some("UTC".to_string()),
    };
    let hours: u32 = caps[2].parse().ok()?;
    let minutes: u32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    if hours > 14 || minutes >= 60 || (hours == 14 && minutes > 0) {
        return None;
    }
    Some(format!("UTC{}{:02}:{:02}", sign, hours, minutes))
}

fn parse_birthday(value: &str, this_year: i32) -> Result<NaiveDate, String> {
    let caps = RE_DATE.captures(value.trim()).ok_or_else(|| {
        "The date specified was an invalid format! You must provide a date matching `yyyy/MM/dd` or `yyyy-MM-dd`!"
            .to_string()
    })?;
    let year: i32 = caps[1].parse().map_err(|_| format!("`{}` is not a valid year!", &caps[1]))?;
    if year < EARLIEST_BIRTH_YEAR || year > this_year {
        return Err(format!("`{}` is not a valid year!", year));
    }
    let month = caps[2]
        .parse::<u8>()
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| format!("`{}` is not a valid month!", &caps[2]))?;
    let day: u32 = caps[3].parse().map_err(|_| format!("`{}` is not a valid day!", &caps[3]))?;

    // 2000 is a leap year, so any day that fits the month in some year fits here.
    if NaiveDate::from_ymd_opt(2000, month.number_from_month(), day).is_none() {
        return Err(format!(
            "`{}` is not a valid day for the month of `{}`!",
            &caps[3],
            month.name()
        ));
    }
    NaiveDate::from_ymd_opt(year, month.number_from_month(), day)
        .ok_or_else(|| format!("The specified day and month is not valid for the year `{}`!", year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn test_parse_time_zone() {
        assert_eq!(parse_time_zone("utc"), Some("UTC".to_string()));
        assert_eq!(parse_time_zone("GMT+2"), Some("UTC+02:00".to_string()));
        assert_eq!(parse_time_zone("UTC - 03:30"), Some("UTC-03:30".to_string()));
        assert_eq!(parse_time_zone("UTC+15"), None);
        assert_eq!(parse_time_zone("Europe/Berlin"), None);
    }

    #[test]
    fn test_parse_birthday() {
        assert_eq!(
            parse_birthday("1995/6/15", 2024),
            Ok(NaiveDate::from_ymd_opt(1995, 6, 15).unwrap())
        );
        assert_eq!(
            parse_birthday("2000-02-29", 2024),
            Ok(NaiveDate::from_ymd_opt(2000, 2, 29).unwrap())
        );
        assert!(parse_birthday("1999-02-29", 2024)
            .unwrap_err()
            .contains("not valid for the year `1999`"));
        assert!(parse_birthday("1999-04-31", 2024)
            .unwrap_err()
            .contains("month of `April`"));
        assert_eq!(parse_birthday("1999-13-01", 2024), Err("`13` is not a valid month!".to_string()));
        assert_eq!(parse_birthday("1900-01-01", 2024), Err("`1900` is not a valid year!".to_string()));
        assert!(parse_birthday("15.06.1995", 2024).unwrap_err().contains("invalid format"));
    }

    #[tokio::test]
    async fn test_create_and_show_profile() {
        let client = full_client();
        let out = texts(&client.on_message(&dm_ctx(9, "|profile")).await);
        assert!(out[0].contains("You have not created a profile!"));

        let out = texts(&client.on_message(&dm_ctx(9, "|profile create")).await);
        assert!(out[0].starts_with(&format!("{} Successfully created", SUCCESS)));
        let out = texts(&client.on_message(&dm_ctx(9, "|p create")).await);
        assert!(out[0].starts_with(WARNING));

        let out = texts(&client.on_message(&dm_ctx(9, "|profile")).await);
        assert_eq!(
            out,
            vec!["__**user9**'s NightFury Profile__\n\n*Nothing here yet!*".to_string()]
        );
    }

    #[tokio::test]
    async fn test_set_fields_and_view_other_user() {
        let client = full_client();
        client.on_message(&dm_ctx(9, "|profile create")).await;

        let out = texts(&client.on_message(&dm_ctx(9, "|profile set title Dragon Rider")).await);
        assert_eq!(out, vec![format!("{} Successfully set **Title**!", SUCCESS)]);
        client.on_message(&dm_ctx(9, "|profile set tz gmt+2")).await;
        client.on_message(&dm_ctx(9, "|profile set github github.com/hiccup")).await;
        client.on_message(&dm_ctx(9, "|profile set about Trains dragons.")).await;

        let mut ctx = guild_ctx(5, "|profile <@9>");
        ctx.mentions.push(user(9));
        let out = texts(&client.on_message(&ctx).await);
        assert_eq!(
            out[0],
            "__**user9**'s NightFury Profile__\n\
             \n**Title:** Dragon Rider\
             \n**Time Zone:** UTC+02:00\
             \n**GitHub:** https://github.com/hiccup\
             \n**About:**\nTrains dragons."
        );

        let out = texts(&client.on_message(&dm_ctx(9, "|profile set title")).await);
        assert_eq!(out, vec![format!("{} Successfully removed **Title**!", SUCCESS)]);
    }

    #[tokio::test]
    async fn test_set_rejects_bad_values() {
        let client = full_client();
        let out = texts(&client.on_message(&dm_ctx(9, "|profile set title x")).await);
        assert!(out[0].contains("You have not created a NightFury Profile yet!"));

        client.on_message(&dm_ctx(9, "|profile create")).await;
        let out = texts(&client.on_message(&dm_ctx(9, "|profile set color red")).await);
        assert!(out[0].contains("\"color\" is not a profile field!"));
        let out = texts(&client.on_message(&dm_ctx(9, "|profile set twitch youtube.com/x")).await);
        assert!(out[0].contains("Invalid Twitch URL"));
        let long = format!("|profile set title {}", "x".repeat(51));
        let out = texts(&client.on_message(&dm_ctx(9, &long)).await);
        assert!(out[0].contains("maximum length of **Title** is 50 characters"));
    }

    #[tokio::test]
    async fn test_profile_of_user_without_one() {
        let client = full_client();
        let out = texts(&client.on_message(&dm_ctx(5, "|profile 12345")).await);
        assert_eq!(out, vec![format!("{} **<@12345>** has not created a profile!", ERROR)]);
        let out = texts(&client.on_message(&dm_ctx(5, "|profile somebody")).await);
        assert_eq!(out, vec![format!("{} No users found matching \"somebody\"!", ERROR)]);
    }
}
