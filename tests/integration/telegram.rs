//! Bot API client, chat handlers and the update poller against a mock Bot API

use rsi_signal_bot::alerts::{AlertDispatcher, ParseMode};
use rsi_signal_bot::bot::{BotHandler, UpdatePoller};
use rsi_signal_bot::config::{AppConfig, ConfigStore};
use rsi_signal_bot::core::{restart_channel, RestartReceiver};
use rsi_signal_bot::models::{SignalEvent, SignalKind};
use rsi_signal_bot::services::telegram::Update;
use rsi_signal_bot::services::TelegramClient;
use rsi_signal_bot::subscribers::SubscriberStore;
use rsi_signal_bot::BotError;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:test-token";

fn api_path(method_name: &str) -> String {
    format!("/bot{}/{}", TOKEN, method_name)
}

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": result}))
}

fn sent_message() -> Value {
    json!({"message_id": 1, "chat": {"id": 1}, "date": 0})
}

async fn mock_replies(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ok(sent_message()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("answerCallbackQuery")))
        .respond_with(ok(json!(true)))
        .mount(server)
        .await;
}

/// Bodies of every request made to `method_name`, in order
async fn bodies(server: &MockServer, method_name: &str) -> Vec<Value> {
    let target = api_path(method_name);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|req| req.url.path() == target)
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}

fn callback(update_id: i64, chat_id: i64, data: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb-{}", update_id),
            "from": {"id": chat_id, "is_bot": false, "first_name": "Trader"},
            "message": {"message_id": 7, "chat": {"id": chat_id, "type": "private"}, "date": 0},
            "data": data
        }
    }))
    .unwrap()
}

fn command(update_id: i64, chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "chat": {"id": chat_id, "type": "private"},
            "date": 0,
            "text": text
        }
    })
}

struct Bot {
    handler: BotHandler,
    client: TelegramClient,
    config: ConfigStore,
    subscribers: SubscriberStore,
    restart: RestartReceiver,
}

fn bot(server: &MockServer) -> Bot {
    let client = TelegramClient::with_base_url(&server.uri(), TOKEN);
    let config = ConfigStore::in_memory(AppConfig::default());
    let subscribers = SubscriberStore::in_memory();
    let (handle, restart) = restart_channel();
    let handler = BotHandler::new(client.clone(), config.clone(), subscribers.clone(), handle);
    Bot {
        handler,
        client,
        config,
        subscribers,
        restart,
    }
}

#[tokio::test]
async fn send_text_posts_message_with_parse_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .and(body_partial_json(json!({
            "chat_id": 42,
            "text": "hello",
            "parse_mode": "Markdown"
        })))
        .respond_with(ok(sent_message()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TelegramClient::with_base_url(&server.uri(), TOKEN);
    client
        .send_text(42, "hello", Some(ParseMode::Markdown), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn api_error_carries_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        })))
        .mount(&server)
        .await;

    let client = TelegramClient::with_base_url(&server.uri(), TOKEN);
    let err = client.send_text(42, "hello", None, None).await.unwrap_err();
    match err {
        BotError::Telegram(description) => assert!(description.contains("blocked")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn token_is_not_exposed_by_debug() {
    let client = TelegramClient::with_base_url("http://localhost", TOKEN);
    assert!(!format!("{:?}", client).contains("test-token"));
}

#[tokio::test]
async fn transport_errors_do_not_reveal_token() {
    let client = TelegramClient::with_base_url("http://127.0.0.1:1", TOKEN);
    let err = client.get_updates(0, 0).await.unwrap_err();
    assert!(matches!(err, BotError::Http(_)));
    assert!(!err.to_string().contains("test-token"));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;
    let client = TelegramClient::with_base_url(&server.uri(), TOKEN);
    let err = client.send_text(42, "hello", None, None).await.unwrap_err();
    assert!(matches!(err, BotError::Http(_)));
    assert!(!err.to_string().contains("test-token"));
}

#[tokio::test]
async fn alert_delivery_continues_past_failed_chat() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .and(body_partial_json(json!({"chat_id": 2})))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "description": "Forbidden: user is deactivated"
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("sendMessage")))
        .respond_with(ok(sent_message()))
        .with_priority(2)
        .mount(&server)
        .await;

    let subscribers = SubscriberStore::in_memory();
    for chat_id in [1, 2, 3] {
        subscribers.subscribe(chat_id).await;
    }
    let client = TelegramClient::with_base_url(&server.uri(), TOKEN);
    let dispatcher = AlertDispatcher::new(Arc::new(client), subscribers);

    let event = SignalEvent::new("BTCUSDT", SignalKind::Short, 85.0, "5", 100);
    let report = dispatcher.dispatch(&event).await;
    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);

    let sent = bodies(&server, "sendMessage").await;
    assert_eq!(sent.len(), 3);
    assert!(sent[0]["text"].as_str().unwrap().contains("BTCUSDT"));
    assert_eq!(sent[0]["parse_mode"], "Markdown");
}

#[tokio::test]
async fn timeframe_button_updates_config_and_requests_restart() {
    let server = MockServer::start().await;
    mock_replies(&server).await;
    let mut bot = bot(&server);

    bot.handler.handle_update(callback(1, 77, "tf_15")).await.unwrap();

    assert_eq!(bot.config.run_config().await.timeframe, "15");
    assert!(bot.restart.take_pending());

    let replies = bodies(&server, "sendMessage").await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["chat_id"], 77);
    assert!(replies[0]["text"].as_str().unwrap().contains("Scan restarted"));

    let answers = bodies(&server, "answerCallbackQuery").await;
    assert_eq!(answers, vec![json!({"callback_query_id": "cb-1"})]);
}

#[tokio::test]
async fn threshold_button_does_not_restart_scan() {
    let server = MockServer::start().await;
    mock_replies(&server).await;
    let mut bot = bot(&server);

    bot.handler.handle_update(callback(1, 77, "ob_90")).await.unwrap();
    bot.handler.handle_update(callback(2, 77, "rsi_7")).await.unwrap();

    let config = bot.config.snapshot().await;
    assert_eq!(config.overbought, 90.0);
    assert_eq!(config.rsi_period, 7);
    assert!(!bot.restart.take_pending());
}

#[tokio::test]
async fn unknown_button_is_still_answered() {
    let server = MockServer::start().await;
    mock_replies(&server).await;
    let bot = bot(&server);

    bot.handler.handle_update(callback(1, 77, "limit_abc")).await.unwrap();

    assert_eq!(bot.config.snapshot().await, AppConfig::default());
    assert!(bodies(&server, "sendMessage").await.is_empty());
    assert_eq!(bodies(&server, "answerCallbackQuery").await.len(), 1);
}

#[tokio::test]
async fn subscribe_and_stop_manage_subscription() {
    let server = MockServer::start().await;
    mock_replies(&server).await;
    let bot = bot(&server);

    bot.handler.handle_update(callback(1, 55, "subscribe")).await.unwrap();
    assert!(bot.subscribers.contains(55).await);

    bot.handler.handle_update(callback(2, 55, "subscribe")).await.unwrap();
    let replies = bodies(&server, "sendMessage").await;
    assert!(replies[1]["text"].as_str().unwrap().contains("already subscribed"));

    let stop: Update = serde_json::from_value(command(3, 55, "/stop")).unwrap();
    bot.handler.handle_update(stop).await.unwrap();
    assert!(!bot.subscribers.contains(55).await);
}

#[tokio::test]
async fn poller_handles_batch_and_advances_offset() {
    let server = MockServer::start().await;
    mock_replies(&server).await;
    Mock::given(method("POST"))
        .and(path(api_path("getUpdates")))
        .and(body_partial_json(json!({"offset": 0})))
        .respond_with(ok(json!([
            command(10, 9, "/start"),
            command(11, 9, "/settings@rsi_signal_bot")
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("getUpdates")))
        .and(body_partial_json(json!({"offset": 12})))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let bot = bot(&server);
    let mut poller = UpdatePoller::new(bot.client.clone(), bot.handler);

    poller.poll_once().await;
    assert_eq!(poller.offset(), 12);
    poller.poll_once().await;
    assert_eq!(poller.offset(), 12);

    let replies = bodies(&server, "sendMessage").await;
    assert_eq!(replies.len(), 2);
    assert!(replies[0]["reply_markup"]["inline_keyboard"].is_array());
    assert!(replies[1]["text"].as_str().unwrap().contains("Current settings"));
}
