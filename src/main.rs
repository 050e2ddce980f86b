mod client;
mod command;
mod commands;
mod config;
mod db;
mod discord;
mod message;
mod template;
mod util;

#[cfg(test)]
mod testing;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use client::Client;
use config::Config;
use db::Db;
use discord::DiscordGateway;

const COOLDOWN_CLEAN_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,serenity=warn,tracing=warn"),
    )
    .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let path = Path::new(&config_path);
    if !path.exists() {
        eprintln!("Config file not found: {}", config_path);
        eprintln!("Copy the example and edit it:");
        eprintln!("  cp config.example.toml config.toml");
        std::process::exit(1);
    }

    let config = Config::load(path)?;
    log::info!("Loaded config from {}", config_path);

    let db = Db::open(Path::new(&config.bot.db_path))?;
    log::info!("Database opened at {}", config.bot.db_path);

    let commands = commands::build_index(&config);
    log::info!("Registered {} command(s)", commands.len());

    let client = Arc::new(Client::new(Arc::new(config), Arc::new(db), commands));

    let cleaner = client.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(COOLDOWN_CLEAN_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            cleaner.clean_cooldowns();
        }
    });

    DiscordGateway::new(client).run().await
}
