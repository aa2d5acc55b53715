//! Callback-query handling for the "Post" button.
//!
//! Callback queries must be answered even when nothing is granted, or the
//! pressing client keeps showing a loading state. The acknowledgement is
//! therefore unconditional and independent of the grant outcome.

use tracing::{debug, warn};

use crate::api::TelegramApi;
use crate::grants::GrantManager;
use crate::relay::PostControl;
use crate::types::CallbackQuery;

/// Handle one button press: attempt the grant, then always acknowledge.
pub async fn handle_callback(
    api: &TelegramApi,
    grants: &GrantManager,
    channel_id: i64,
    cb: &CallbackQuery,
) {
    if cb.data.as_deref() == Some(PostControl::CALLBACK_DATA) {
        if let Err(e) = grants.grant(channel_id, cb.from.id).await {
            warn!("grant for user_id={} failed: {e}", cb.from.id);
        }
    } else {
        debug!("ignoring callback with unknown data: {:?}", cb.data);
    }

    if let Err(e) = api.answer_callback_query(&cb.id).await {
        warn!("failed to answer callback query {}: {e}", cb.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::AdminCache;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    const CHANNEL: i64 = -100123;

    fn callback(data: Option<&str>) -> CallbackQuery {
        serde_json::from_value(json!({
            "id": "cb-1",
            "from": {"id": 789, "first_name": "Alice", "is_bot": false},
            "data": data,
        }))
        .unwrap()
    }

    async fn mount_answer(server: &MockServer) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/answerCallbackQuery"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    fn fixtures(server: &MockServer) -> (Arc<TelegramApi>, GrantManager) {
        let api = Arc::new(TelegramApi::with_base_url("t", &server.uri()));
        let cache = AdminCache::new(Arc::clone(&api), Duration::from_secs(60));
        let grants = GrantManager::new(Arc::clone(&api), cache, Duration::from_secs(600));
        (api, grants)
    }

    #[tokio::test]
    async fn post_button_grants_and_acknowledges() {
        let server = MockServer::start().await;
        mount_answer(&server).await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/getChatAdministrators"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": []})),
            )
            .mount(&server)
            .await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/promoteChatMember"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (api, grants) = fixtures(&server);
        handle_callback(&api, &grants, CHANNEL, &callback(Some("P"))).await;
    }

    #[tokio::test]
    async fn acknowledgement_is_sent_even_when_the_grant_fails() {
        let server = MockServer::start().await;
        mount_answer(&server).await;
        // Directory read fails, so the grant errors out before any write.
        Mock::given(matchers::method("POST"))
            .and(matchers::path_regex(r"/bot.*/getChatAdministrators"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": false, "error_code": 502, "description": "Bad Gateway"
            })))
            .mount(&server)
            .await;

        let (api, grants) = fixtures(&server);
        handle_callback(&api, &grants, CHANNEL, &callback(Some("P"))).await;
    }

    #[tokio::test]
    async fn unknown_callback_data_is_acknowledged_without_a_grant() {
        let server = MockServer::start().await;
        mount_answer(&server).await;

        let (api, grants) = fixtures(&server);
        handle_callback(&api, &grants, CHANNEL, &callback(Some("X"))).await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.path().ends_with("/answerCallbackQuery"));
    }
}
