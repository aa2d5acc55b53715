//! The temporary-privilege lifecycle.
//!
//! A grant elevates a user with the single "may post" permission and
//! schedules a one-shot revocation that clears every permission after the
//! configured window. Already-privileged users are never re-granted. There
//! is no per-user lock: a second grant racing a pending revocation schedules
//! a second revocation, whose fire is a harmless re-clear.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::TelegramApi;
use crate::cache::AdminCache;
use crate::error::BotError;
use crate::rights::AdminRights;
use crate::scheduler::DelayedJobScheduler;

/// A revocation waiting on the timer. Destroyed when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRevocation {
    pub chat_id: i64,
    pub user_id: i64,
}

/// Grants scoped posting permission and schedules its revocation.
pub struct GrantManager {
    api: Arc<TelegramApi>,
    cache: AdminCache,
    scheduler: DelayedJobScheduler,
    revoke_delay: Duration,
}

impl GrantManager {
    pub fn new(api: Arc<TelegramApi>, cache: AdminCache, revoke_delay: Duration) -> Self {
        Self {
            api,
            cache,
            scheduler: DelayedJobScheduler::new(),
            revoke_delay,
        }
    }

    /// Grant `user_id` the posting permission in `chat_id`, time-boxed.
    ///
    /// A user already in the (possibly stale) administrator set is left
    /// alone: no privilege write, no scheduled revocation. A recoverable
    /// rejection from the privilege write (user left the chat, insufficient
    /// bot rights) is swallowed and schedules nothing. On success a
    /// [`PendingRevocation`] is scheduled at now + the configured delay.
    pub async fn grant(&self, chat_id: i64, user_id: i64) -> Result<(), BotError> {
        if self.cache.query(chat_id).await?.contains(&user_id) {
            debug!("user_id={user_id} already an admin, ignoring");
            return Ok(());
        }

        match self
            .api
            .promote_chat_member(chat_id, user_id, AdminRights::post_only())
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                debug!("grant for user_id={user_id} rejected: {e}");
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        info!(
            "granted posting to user_id={user_id} in chat_id={chat_id}, \
             revoking in {:?}",
            self.revoke_delay
        );

        let job = PendingRevocation { chat_id, user_id };
        let api = Arc::clone(&self.api);
        self.scheduler
            .schedule(self.revoke_delay, job, move |job| async move {
                revoke(&api, job).await;
            });
        Ok(())
    }
}

/// Clear every administrator permission for the user named by `job`.
///
/// All flags false demotes the member back to a regular user. Runs on a
/// timer fire with no caller to report to, so a failure is only logged.
pub async fn revoke(api: &TelegramApi, job: PendingRevocation) {
    match api
        .promote_chat_member(job.chat_id, job.user_id, AdminRights::none())
        .await
    {
        Ok(()) => info!(
            "revoked posting for user_id={} in chat_id={}",
            job.user_id, job.chat_id
        ),
        Err(e) => warn!(
            "revocation for user_id={} in chat_id={} failed: {e}",
            job.user_id, job.chat_id
        ),
    }
}
