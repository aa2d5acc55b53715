//! Raw HTTP calls to the Telegram Bot API.
//!
//! Wraps reqwest for the handful of methods the relay needs: `getUpdates`,
//! `sendMessage`, `copyMessage`, `forwardMessage`, `deleteMessage`,
//! `getChatAdministrators`, `promoteChatMember`, and `answerCallbackQuery`.
//! All methods return typed responses.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::BotError;
use crate::rights::AdminRights;
use crate::types::{ApiResponse, ChatMember, InlineKeyboardMarkup, SentMessage, Update};

/// Low-level Telegram Bot API client.
pub struct TelegramApi {
    client: Client,
    base_url: String,
}

impl TelegramApi {
    /// Create a new API client for the given bot token.
    pub fn new(bot_token: &str) -> Self {
        Self::with_base_url(bot_token, "https://api.telegram.org")
    }

    /// Create a new API client with a custom base URL (for testing).
    pub fn with_base_url(bot_token: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/bot{}", base_url.trim_end_matches('/'), bot_token),
        }
    }

    /// POST a method call and unwrap the `ApiResponse` envelope.
    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, BotError> {
        let resp = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await?;

        let api_resp: ApiResponse<T> = resp.json().await?;
        if !api_resp.ok {
            let code = api_resp.error_code.unwrap_or(0);
            let description = api_resp.description.unwrap_or_default();
            warn!("{method} failed ({code}): {description}");
            return Err(BotError::Api { code, description });
        }

        api_resp.result.ok_or_else(|| BotError::Api {
            code: 0,
            description: format!("{method}: missing result"),
        })
    }

    /// Long-poll for new updates.
    ///
    /// `offset` should be set to `last_update_id + 1` to acknowledge
    /// previously received updates.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: u64,
    ) -> Result<Vec<Update>, BotError> {
        let mut body = json!({
            "timeout": timeout,
            "allowed_updates": [
                "message", "edited_message",
                "channel_post", "edited_channel_post",
                "callback_query",
            ],
        });

        if let Some(off) = offset {
            body["offset"] = json!(off);
        }

        self.call("getUpdates", &body).await
    }

    /// Send a text message to a chat.
    ///
    /// Returns the sent message's ID on success.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
        disable_notification: bool,
    ) -> Result<i64, BotError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });

        if let Some(markup) = reply_markup {
            body["reply_markup"] = serde_json::to_value(markup).map_err(|e| BotError::Api {
                code: 0,
                description: format!("serialize markup: {e}"),
            })?;
        }
        if disable_notification {
            body["disable_notification"] = json!(true);
        }

        debug!("sendMessage to chat_id={chat_id}");

        let sent: SentMessage = self.call("sendMessage", &body).await?;
        Ok(sent.message_id)
    }

    /// Copy a message into another chat, without the "forwarded from" header.
    pub async fn copy_message(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i64,
    ) -> Result<(), BotError> {
        let body = json!({
            "chat_id": chat_id,
            "from_chat_id": from_chat_id,
            "message_id": message_id,
        });

        debug!("copyMessage {from_chat_id}/{message_id} -> {chat_id}");

        let _: Value = self.call("copyMessage", &body).await?;
        Ok(())
    }

    /// Forward a message into another chat, keeping its attribution header.
    pub async fn forward_message(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i64,
    ) -> Result<(), BotError> {
        let body = json!({
            "chat_id": chat_id,
            "from_chat_id": from_chat_id,
            "message_id": message_id,
        });

        debug!("forwardMessage {from_chat_id}/{message_id} -> {chat_id}");

        let _: Value = self.call("forwardMessage", &body).await?;
        Ok(())
    }

    /// Delete a message.
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), BotError> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        let _: Value = self.call("deleteMessage", &body).await?;
        Ok(())
    }

    /// List the current administrators of a chat.
    pub async fn get_chat_administrators(
        &self,
        chat_id: i64,
    ) -> Result<Vec<ChatMember>, BotError> {
        let body = json!({"chat_id": chat_id});
        self.call("getChatAdministrators", &body).await
    }

    /// Set a member's administrator permissions.
    ///
    /// Every flag in `rights` is sent explicitly; a member promoted with all
    /// flags false is demoted back to a regular member.
    pub async fn promote_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        rights: AdminRights,
    ) -> Result<(), BotError> {
        let mut body = json!({
            "chat_id": chat_id,
            "user_id": user_id,
        });

        let flags = serde_json::to_value(rights).map_err(|e| BotError::Api {
            code: 0,
            description: format!("serialize rights: {e}"),
        })?;
        if let (Some(body_map), Some(flag_map)) = (body.as_object_mut(), flags.as_object()) {
            for (key, value) in flag_map {
                body_map.insert(key.clone(), value.clone());
            }
        }

        debug!("promoteChatMember user_id={user_id} in chat_id={chat_id}");

        let _: Value = self.call("promoteChatMember", &body).await?;
        Ok(())
    }

    /// Acknowledge a callback query (dismisses the loading spinner on the button).
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), BotError> {
        let body = json!({
            "callback_query_id": callback_query_id,
        });

        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn promote_sends_every_flag() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/promoteChatMember"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        api.promote_chat_member(-100123, 789, AdminRights::post_only())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body["chat_id"], -100123);
        assert_eq!(body["user_id"], 789);
        assert_eq!(body["can_post_messages"], true);
        assert_eq!(body["can_promote_members"], false);
        assert_eq!(body["can_manage_voice_chats"], false);
        // 2 addressing fields + 10 permission flags
        assert_eq!(body.as_object().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn api_error_carries_code_and_description() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/promoteChatMember"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: USER_NOT_PARTICIPANT"
            })))
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        let err = api
            .promote_chat_member(-100123, 789, AdminRights::post_only())
            .await
            .unwrap_err();
        match err {
            BotError::Api { code, description } => {
                assert_eq!(code, 400);
                assert!(description.contains("USER_NOT_PARTICIPANT"));
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn get_chat_administrators_parses_users() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/getChatAdministrators"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [
                    {"user": {"id": 1, "first_name": "Owner", "is_bot": false}, "status": "creator"},
                    {"user": {"id": 2, "first_name": "Mod", "is_bot": false}, "status": "administrator"}
                ]
            })))
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        let admins = api.get_chat_administrators(-100123).await.unwrap();
        assert_eq!(admins.len(), 2);
        assert_eq!(admins[0].user.id, 1);
    }

    #[tokio::test]
    async fn send_message_returns_message_id() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/sendMessage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "result": {"message_id": 42}})),
            )
            .mount(&server)
            .await;

        let api = TelegramApi::with_base_url("test-token", &server.uri());
        let id = api.send_message(-100123, "\n", None, true).await.unwrap();
        assert_eq!(id, 42);

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body["disable_notification"], true);
    }
}
