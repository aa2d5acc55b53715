//! Relaying submissions into the broadcast channel.
//!
//! An accepted message is republished (copied, or re-forwarded when it
//! already carries an attribution header), the original is deleted, and a
//! silent control message with the "Post" button is appended. The order is
//! fixed: publish, delete original, post control.

use tracing::{debug, warn};

use crate::api::TelegramApi;
use crate::error::BotError;
use crate::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message};

/// The interactive "Post" affordance attached to every relayed message.
///
/// Each relay builds its own markup; no state is shared between messages.
pub struct PostControl;

impl PostControl {
    /// Callback data carried by the button.
    pub const CALLBACK_DATA: &'static str = "P";

    /// Text body of the control message.
    pub const TEXT: &'static str = "\n";

    /// Build the one-button keyboard.
    pub fn markup() -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: "Post".into(),
                callback_data: Self::CALLBACK_DATA.into(),
            }]],
        }
    }
}

/// Relay one inbound message into the broadcast channel.
///
/// Forwarded messages keep the upstream author's attribution; authored
/// messages are copied without one. A failed delete of the original is
/// logged and does not suppress the control post.
pub async fn relay_message(
    api: &TelegramApi,
    channel_id: i64,
    msg: &Message,
) -> Result<(), BotError> {
    match &msg.forward_from {
        Some(upstream) => {
            debug!(
                "forwarding message_id={} from upstream user_id={}",
                msg.message_id, upstream.id
            );
            api.forward_message(channel_id, upstream.id, msg.message_id)
                .await?;
        }
        None => {
            debug!("copying message_id={} from chat_id={}", msg.message_id, msg.chat.id);
            api.copy_message(channel_id, msg.chat.id, msg.message_id)
                .await?;
        }
    }

    if let Err(e) = api.delete_message(msg.chat.id, msg.message_id).await {
        warn!("failed to delete original message_id={}: {e}", msg.message_id);
    }

    api.send_message(channel_id, PostControl::TEXT, Some(PostControl::markup()), true)
        .await?;
    Ok(())
}
