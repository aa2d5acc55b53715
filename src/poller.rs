//! Long-polling loop for `getUpdates`.
//!
//! Routes plain messages to the relay and callback queries to the callback
//! dispatcher. Edited-post notifications are dropped here so an edit never
//! republishes. Transport failures back off exponentially up to 60s.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::TelegramApi;
use crate::config::BotConfig;
use crate::dispatch;
use crate::grants::GrantManager;
use crate::relay;

/// Run the long-polling loop until the cancellation signal fires.
pub async fn poll_loop(
    api: Arc<TelegramApi>,
    config: BotConfig,
    grants: GrantManager,
    mut cancel: watch::Receiver<bool>,
) {
    let mut offset: Option<i64> = None;
    let mut backoff_secs = 1u64;

    info!(channel_id = config.channel_id, "poller started");

    loop {
        if *cancel.borrow() {
            info!("poller shutting down");
            return;
        }

        let updates = tokio::select! {
            result = api.get_updates(offset, config.poll_timeout_secs) => result,
            _ = cancel.changed() => {
                info!("poller cancelled");
                return;
            }
        };

        match updates {
            Ok(updates) => {
                backoff_secs = 1;

                for update in updates {
                    // Advance offset to acknowledge this update
                    offset = Some(update.update_id + 1);

                    if update.edited_message.is_some() || update.edited_channel_post.is_some() {
                        debug!("ignoring edited-post notification");
                        continue;
                    }

                    // Submissions arrive as direct messages or as channel posts
                    if let Some(msg) = update.message.as_ref().or(update.channel_post.as_ref()) {
                        if let Err(e) =
                            relay::relay_message(&api, config.channel_id, msg).await
                        {
                            warn!("relay of message_id={} failed: {e}", msg.message_id);
                        }
                    }

                    if let Some(cb) = &update.callback_query {
                        dispatch::handle_callback(&api, &grants, config.channel_id, cb).await;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, backoff_secs, "getUpdates failed, backing off");
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                backoff_secs = (backoff_secs * 2).min(60);
            }
        }
    }
}
