use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use chanpost::{poller, AdminCache, BotConfig, GrantManager, TelegramApi};

/// Relay bot for a Telegram channel with time-boxed self-elevation.
#[derive(Parser, Debug)]
#[command(name = "chanpost", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "chanpost.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with env filter (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let content = std::fs::read_to_string(&cli.config)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", cli.config.display()))?;
    let config = BotConfig::from_toml(&content)?;

    let api = Arc::new(TelegramApi::new(&config.bot_token));
    let cache = AdminCache::new(Arc::clone(&api), config.cache_timeout());
    let grants = GrantManager::new(Arc::clone(&api), cache, config.admin_timer());

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let poll = tokio::spawn(poller::poll_loop(api, config, grants, cancel_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    let _ = cancel_tx.send(true);
    let _ = poll.await;

    Ok(())
}
