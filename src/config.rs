//! Configuration for the relay bot.
//!
//! [`BotConfig`] is loaded from `chanpost.toml` and controls the bot token,
//! broadcast channel, revocation delay, and cache validity window.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BotError;

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Chat id of the broadcast channel messages are relayed into.
    pub channel_id: i64,
    /// How long a granted posting permission lives before revocation, in seconds.
    #[serde(default = "default_admin_timer")]
    pub admin_timer_secs: u64,
    /// Validity window for the cached administrator set, in seconds.
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout_secs: u64,
    /// Long-poll timeout passed to `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

fn default_admin_timer() -> u64 {
    600
}

fn default_cache_timeout() -> u64 {
    1
}

fn default_poll_timeout() -> u64 {
    30
}

impl BotConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, BotError> {
        let config: BotConfig =
            toml::from_str(content).map_err(|e| BotError::Config(e.to_string()))?;
        if config.bot_token.is_empty() {
            return Err(BotError::Config("bot_token must not be empty".into()));
        }
        Ok(config)
    }

    /// Revocation delay as a [`Duration`].
    pub fn admin_timer(&self) -> Duration {
        Duration::from_secs(self.admin_timer_secs)
    }

    /// Cache validity window as a [`Duration`].
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_secs(self.cache_timeout_secs)
    }
}
