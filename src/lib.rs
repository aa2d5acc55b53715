//! chanpost -- relays submissions from a private intake chat into a public
//! Telegram channel, and lets a submitter self-elevate a time-boxed posting
//! permission via an inline "Post" button so follow-up content appears under
//! their own name.
//!
//! The interesting part is the privilege lifecycle: [`grants::GrantManager`]
//! hands out a single scoped permission, [`scheduler::DelayedJobScheduler`]
//! fires the one-shot revocation, and [`cache::AdminCache`] keeps repeated
//! button presses from hammering `getChatAdministrators`.

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod grants;
pub mod poller;
pub mod relay;
pub mod rights;
pub mod scheduler;
pub mod types;

pub use api::TelegramApi;
pub use cache::AdminCache;
pub use config::BotConfig;
pub use error::BotError;
pub use grants::{GrantManager, PendingRevocation};
pub use relay::PostControl;
pub use rights::AdminRights;
pub use scheduler::DelayedJobScheduler;
