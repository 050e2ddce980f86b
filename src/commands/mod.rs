mod about;
mod avatar;
mod customcmd;
mod help;
mod info;
mod level;
mod mode;
mod moderator;
mod ping;
mod prefix;
mod profile;
mod selfrole;
mod server;
mod starboard;
mod tag;
mod toggle;
mod welcome;
mod whitelist;

use crate::command::CommandIndex;
use crate::config::Config;

pub fn build_index(config: &Config) -> CommandIndex {
    let mut index = CommandIndex::new();

    if config.is_group_enabled("standard") {
        index.register(Box::new(help::HelpCommand));
        index.register(Box::new(ping::PingCommand));
        index.register(Box::new(about::AboutCommand));
        index.register(Box::new(avatar::AvatarCommand));
        index.register(Box::new(info::InfoCommand));
        index.register(Box::new(server::ServerCommand::new()));
        index.register(Box::new(profile::ProfileCommand::new()));
        index.register(Box::new(tag::TagCommand::new()));
        index.register(Box::new(selfrole::SelfRoleCommand::role_me()));
        index.register(Box::new(selfrole::SelfRoleCommand::color_me()));
    }
    if config.is_group_enabled("administrator") {
        index.register(Box::new(prefix::PrefixCommand::new()));
        index.register(Box::new(level::LevelCommand::new()));
        index.register(Box::new(customcmd::CustomCommandCommand::new()));
        index.register(Box::new(welcome::WelcomeCommand::new()));
        index.register(Box::new(moderator::ModeratorCommand::new()));
        index.register(Box::new(starboard::StarboardCommand::new()));
        index.register(Box::new(toggle::ToggleCommand::new()));
    }
    if config.is_group_enabled("owner") {
        index.register(Box::new(mode::ModeCommand));
        index.register(Box::new(whitelist::WhitelistCommand::new()));
    }

    index
}
