/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for autotrader-deck-adapter tests

use autotrader_deck_adapter::{ClientConfig, DeckClient};
use tokio::net::TcpListener;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> DeckClient {
    DeckClient::with_config(ClientConfig::default(), &server.uri()).expect("client init")
}

/// Mock API token for testing
#[allow(dead_code)]
pub fn mock_api_token() -> String {
    "deck-test-token".to_string()
}

/// Start a one-shot WebSocket server that sends `frames` then closes.
///
/// Returns the `ws://` URL to connect to.
#[allow(dead_code)]
pub async fn serve_push_frames(frames: Vec<String>) -> String {
    use futures_util::SinkExt;
    use tokio_tungstenite::tungstenite::Message;

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
            return;
        };
        for frame in frames {
            if ws.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }
        let _ = ws.close(None).await;
    });

    format!("ws://{addr}")
}
