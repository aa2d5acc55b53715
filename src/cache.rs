//! Short-TTL cache over `getChatAdministrators`.
//!
//! Interaction handling checks "is this user already an admin?" on every
//! button press; this cache bounds how often that turns into a remote call.
//! A stale read may under- or over-report membership for at most one TTL.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use crate::api::TelegramApi;
use crate::error::BotError;

struct CachedAdmins {
    fetched_at: Instant,
    admin_ids: HashSet<i64>,
}

/// TTL-memoized view of the administrator set, keyed per chat.
pub struct AdminCache {
    api: Arc<TelegramApi>,
    ttl: Duration,
    entries: Mutex<HashMap<i64, CachedAdmins>>,
}

impl AdminCache {
    pub fn new(api: Arc<TelegramApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the ids of the chat's current administrators.
    ///
    /// Serves the cached set while it is younger than the TTL; otherwise
    /// refetches. A remote failure propagates and leaves the cache untouched.
    /// The lock is not held across the remote call, so two concurrent
    /// refreshes may both fetch; both store the same observed set.
    pub async fn query(&self, chat_id: i64) -> Result<HashSet<i64>, BotError> {
        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(&chat_id) {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.admin_ids.clone());
                }
            }
        }

        debug!("refreshing admin set for chat_id={chat_id}");
        let admins = self.api.get_chat_administrators(chat_id).await?;
        let admin_ids: HashSet<i64> = admins.into_iter().map(|m| m.user.id).collect();

        let mut entries = self.entries.lock().await;
        entries.insert(
            chat_id,
            CachedAdmins {
                fetched_at: Instant::now(),
                admin_ids: admin_ids.clone(),
            },
        );
        Ok(admin_ids)
    }
}
