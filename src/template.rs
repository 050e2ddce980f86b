//! Substitution language used by tags, custom commands and welcome messages.
//!
//! A block is `{name}` or `{name:arg1|arg2|...}`. Blocks nested inside a
//! block are rendered first, so `{upper:{user}}` works. Unknown names are
//! left in place, as are unbalanced braces.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::message::{MessageContext, UserInfo};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("Tag is only available in a guild!")]
    GuildOnly,
    #[error("Invalid '{0}' statement")]
    InvalidStatement(&'static str),
}

#[derive(Debug, Clone)]
pub struct GuildInfo {
    pub id: u64,
    pub name: String,
    pub member_count: u64,
}

/// Everything a template may refer to. Built fresh for every render.
#[derive(Debug, Clone)]
pub struct TemplateEnv {
    pub user: UserInfo,
    pub nick: Option<String>,
    pub guild: Option<GuildInfo>,
    pub channel_id: u64,
    /// `None` for direct messages
    pub channel_name: Option<String>,
    pub args: String,
}

impl TemplateEnv {
    pub fn from_message(ctx: &MessageContext, args: &str) -> Self {
        Self {
            user: ctx.author.clone(),
            nick: ctx.guild.as_ref().and_then(|g| g.nickname.clone()),
            guild: ctx.guild.as_ref().map(|g| GuildInfo {
                id: g.id,
                name: g.name.clone(),
                member_count: g.member_count,
            }),
            channel_id: ctx.channel_id,
            channel_name: ctx.guild.as_ref().map(|_| ctx.channel_name.clone()),
            args: args.to_string(),
        }
    }
}

pub fn render(input: &str, env: &TemplateEnv) -> Result<String, TemplateError> {
    let chars: Vec<char> = input.chars().collect();
    let (out, _, _) = parse(&chars, 0, env, false)?;
    Ok(out)
}

/// Returns the rendered text, the position after it and whether a closing
/// brace ended it.
fn parse(
    chars: &[char],
    mut pos: usize,
    env: &TemplateEnv,
    nested: bool,
) -> Result<(String, usize, bool), TemplateError> {
    let mut out = String::new();
    while pos < chars.len() {
        match chars[pos] {
            '{' => {
                let (inner, next, closed) = parse(chars, pos + 1, env, true)?;
                if closed {
                    out.push_str(&evaluate(&inner, env)?);
                } else {
                    out.push('{');
                    out.push_str(&inner);
                }
                pos = next;
            }
            '}' if nested => return Ok((out, pos + 1, true)),
            c => {
                out.push(c);
                pos += 1;
            }
        }
    }
    Ok((out, pos, false))
}

fn evaluate(block: &str, env: &TemplateEnv) -> Result<String, TemplateError> {
    let (name, input) = match block.split_once(':') {
        Some((name, input)) => (name, Some(input)),
        None => (block, None),
    };
    let parts: Vec<&str> = input.map(|i| i.split('|').collect()).unwrap_or_default();

    let value = match (name.trim().to_lowercase().as_str(), input) {
        ("user", None) => env.user.name.clone(),
        ("nick", None) => env.nick.clone().unwrap_or_else(|| env.user.name.clone()),
        ("discrim", None) => format!("{:04}", env.user.discriminator.unwrap_or(0)),
        ("@user", None) => env.user.mention(),
        ("userid", None) => env.user.id.to_string(),
        ("avatar", None) => env.user.avatar_url.clone(),
        ("server", None) => guild(env)?.name.clone(),
        ("serverid", None) => guild(env)?.id.to_string(),
        ("servercount", None) => env
            .guild
            .as_ref()
            .map(|g| g.member_count)
            .unwrap_or(1)
            .to_string(),
        ("channel", None) => env
            .channel_name
            .clone()
            .unwrap_or_else(|| "DM".to_string()),
        ("channelid", None) => env.channel_id.to_string(),
        ("#channel", None) => match env.channel_name {
            Some(_) => format!("<#{}>", env.channel_id),
            None => "DM".to_string(),
        },
        ("args", None) => env.args.clone(),
        ("argslen", None) => env.args.split_whitespace().count().to_string(),
        ("arg", Some(index)) => {
            let index: usize = index
                .trim()
                .parse()
                .map_err(|_| TemplateError::InvalidStatement("arg"))?;
            env.args
                .split_whitespace()
                .nth(index)
                .unwrap_or("")
                .to_string()
        }
        ("choose", Some(_)) => parts
            .choose(&mut rand::thread_rng())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        ("range", Some(_)) => {
            let [lo, hi] = parts[..] else {
                return Err(TemplateError::InvalidStatement("range"));
            };
            let lo: i64 = lo
                .trim()
                .parse()
                .map_err(|_| TemplateError::InvalidStatement("range"))?;
            let hi: i64 = hi
                .trim()
                .parse()
                .map_err(|_| TemplateError::InvalidStatement("range"))?;
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            rand::thread_rng().gen_range(lo..=hi).to_string()
        }
        ("upper", Some(text)) => text.to_uppercase(),
        ("lower", Some(text)) => text.to_lowercase(),
        ("length", Some(text)) => text.chars().count().to_string(),
        ("replace", Some(_)) => {
            let [text, from, to] = parts[..] else {
                return Err(TemplateError::InvalidStatement("replace"));
            };
            if from.is_empty() {
                text.to_string()
            } else {
                text.replace(from, to)
            }
        }
        ("if", Some(_)) => conditional(&parts)?,
        ("note", Some(_)) => String::new(),
        _ => format!("{{{}}}", block),
    };
    Ok(value)
}

fn guild(env: &TemplateEnv) -> Result<&GuildInfo, TemplateError> {
    env.guild.as_ref().ok_or(TemplateError::GuildOnly)
}

/// `{if:left|op|right|then|else}`; `else` is optional.
fn conditional(parts: &[&str]) -> Result<String, TemplateError> {
    if parts.len() < 4 || parts.len() > 5 {
        return Err(TemplateError::InvalidStatement("if"));
    }
    let (left, op, right) = (parts[0].trim(), parts[1].trim(), parts[2].trim());
    let numbers = left.parse::<f64>().ok().zip(right.parse::<f64>().ok());

    let result = match (op, numbers) {
        ("=" | "==", _) => left == right,
        ("!=", _) => left != right,
        ("?", _) => left.contains(right),
        ("<", Some((l, r))) => l < r,
        (">", Some((l, r))) => l > r,
        ("<=", Some((l, r))) => l <= r,
        (">=", Some((l, r))) => l >= r,
        ("<", None) => left < right,
        (">", None) => left > right,
        ("<=", None) => left <= right,
        (">=", None) => left >= right,
        _ => return Err(TemplateError::InvalidStatement("if")),
    };

    Ok(if result {
        parts[3].to_string()
    } else {
        parts.get(4).map(|s| s.to_string()).unwrap_or_default()
    })
}
