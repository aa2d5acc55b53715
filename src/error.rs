//! Error types for the relay bot.

use thiserror::Error;

/// Errors from Bot API calls and configuration loading.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BotError {
    /// Whether this is the Bot API's "cannot modify member" rejection class
    /// (HTTP 400 Bad Request -- user left the chat, insufficient bot rights,
    /// target is not a member, and so on).
    ///
    /// Grant attempts swallow this class; everything else propagates.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BotError::Api { code: 400, .. })
    }
}
