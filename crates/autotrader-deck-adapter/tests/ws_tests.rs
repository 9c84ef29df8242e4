/*
[INPUT]:  WebSocket test scenarios
[OUTPUT]: Test results for the push channel client
[POS]:    Integration tests - WebSocket
[UPDATE]: When push channel client changes
*/

mod common;

use autotrader_deck_adapter::{ConnectionState, PushChannel, PushMessage};
use common::serve_push_frames;
use std::time::Duration;
use tokio::time::timeout;

#[test]
fn test_push_channel_creation() {
    let mut channel = PushChannel::new();
    assert!(channel.take_receiver().is_some());
    assert_eq!(channel.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn test_push_channel_receiver_take_once() {
    let mut channel: PushChannel = Default::default();
    assert!(channel.take_receiver().is_some());
    assert!(channel.take_receiver().is_none());
}

#[tokio::test]
async fn test_push_channel_forwards_known_messages_in_order() {
    let url = serve_push_frames(vec![
        r#"{"type":"hello"}"#.to_string(),
        r#"{"type":"heartbeat"}"#.to_string(),
        r#"{"type":"update","performance":{"total_pnl":10}}"#.to_string(),
        "garbage".to_string(),
        r#"{"type":"snapshot","positions":[]}"#.to_string(),
    ])
    .await;

    let mut channel = PushChannel::new();
    let mut rx = channel.take_receiver().expect("receiver");
    channel.connect(&url).await.expect("connect");
    let mut health = channel.subscribe_connection_state();

    let mut kinds = Vec::new();
    for _ in 0..3 {
        let message = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("message in time")
            .expect("channel open");
        kinds.push(message.kind());
    }
    assert_eq!(kinds, vec!["hello", "update", "snapshot"]);

    timeout(Duration::from_secs(5), async {
        while *health.borrow_and_update() != ConnectionState::Disconnected {
            if health.changed().await.is_err() {
                break;
            }
        }
    })
    .await
    .expect("disconnect observed");
}

#[tokio::test]
async fn test_push_channel_connect_failure_reports_disconnected() {
    let channel = PushChannel::new();
    let result = channel.connect("ws://127.0.0.1:1").await;
    assert!(result.is_err());
    assert_eq!(channel.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn test_other_message_has_no_payload() {
    assert!(PushMessage::Other.payload().is_none());
}
