/*
[INPUT]:  Operator actions (strategy toggle, manual cycle, start, stop)
[OUTPUT]: Backend acknowledgments
[POS]:    HTTP layer - mutating endpoints
[UPDATE]: When adding new mutating endpoints or changing their bodies
*/

use crate::http::{DeckClient, DeckError, Result};
use crate::types::{ActionAck, TraderAction};
use reqwest::Method;
use tracing::{info, warn};

impl DeckClient {
    /// Send one mutating call
    ///
    /// POST {action.path()} with an optional JSON body.
    ///
    /// A non-2xx answer whose body is an acknowledgment with a reason is
    /// returned as a rejected [`ActionAck`]; any other error body stays a
    /// [`DeckError::Api`].
    pub async fn perform(&self, action: &TraderAction) -> Result<ActionAck> {
        let mut builder = self.request(Method::POST, &action.path())?;
        if let Some(body) = action.body() {
            builder = builder.json(&body);
        }
        let ack = match self.send_json::<ActionAck>(builder).await {
            Ok(ack) => ack,
            Err(DeckError::Api { code, message }) => match rejection_from_body(&message) {
                Some(ack) => {
                    warn!(action = %action, code, "trader action refused with error status");
                    ack
                }
                None => return Err(DeckError::Api { code, message }),
            },
            Err(err) => return Err(err),
        };
        info!(action = %action, success = ack.success, "trader action acknowledged");
        Ok(ack)
    }

    /// Enable or disable one strategy
    ///
    /// POST /api/trader/strategies/{id}/toggle
    pub async fn toggle_strategy(&self, id: &str, enabled: bool) -> Result<ActionAck> {
        self.perform(&TraderAction::ToggleStrategy {
            id: id.to_string(),
            enabled,
        })
        .await
    }

    /// Trigger one manual decision cycle
    ///
    /// POST /api/trader/execute
    pub async fn execute_cycle(&self) -> Result<ActionAck> {
        self.perform(&TraderAction::ExecuteCycle).await
    }

    /// POST /api/trader/start
    pub async fn start_trader(&self) -> Result<ActionAck> {
        self.perform(&TraderAction::Start).await
    }

    /// POST /api/trader/stop
    pub async fn stop_trader(&self) -> Result<ActionAck> {
        self.perform(&TraderAction::Stop).await
    }
}

/// Decode an error-status body as a rejection, if it names a reason
fn rejection_from_body(body: &str) -> Option<ActionAck> {
    let ack: ActionAck = serde_json::from_str(body).ok()?;
    ack.reason()?;
    Some(ActionAck {
        success: false,
        ..ack
    })
}

#[cfg(test)]
mod tests {
    use super::rejection_from_body;
    use crate::http::{ClientConfig, DeckClient, DeckError};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_toggle_strategy_posts_enabled_flag() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("POST"))
            .and(path("/api/trader/strategies/iron_condor/toggle"))
            .and(body_json(json!({ "enabled": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            DeckClient::with_config(ClientConfig::default(), &server.uri()).expect("client init");
        let ack = client
            .toggle_strategy("iron_condor", false)
            .await
            .expect("toggle failed");

        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_start_rejection_keeps_backend_message() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("POST"))
            .and(path("/api/trader/start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Trader already running"
            })))
            .mount(&server)
            .await;

        let client =
            DeckClient::with_config(ClientConfig::default(), &server.uri()).expect("client init");
        let ack = client.start_trader().await.expect("transport ok");

        assert!(!ack.success);
        assert_eq!(ack.reason(), Some("Trader already running"));
    }

    #[tokio::test]
    async fn test_error_status_with_ack_body_is_a_rejection() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("POST"))
            .and(path("/api/trader/start"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": "Trader already running"
            })))
            .mount(&server)
            .await;

        let client =
            DeckClient::with_config(ClientConfig::default(), &server.uri()).expect("client init");
        let ack = client.start_trader().await.expect("rejection, not transport error");

        assert!(!ack.success);
        assert_eq!(ack.reason(), Some("Trader already running"));
    }

    #[tokio::test]
    async fn test_error_status_with_html_body_stays_api_error() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("POST"))
            .and(path("/api/trader/stop"))
            .respond_with(
                ResponseTemplate::new(502).set_body_string("<html><body>502 Bad Gateway</body></html>"),
            )
            .mount(&server)
            .await;

        let client =
            DeckClient::with_config(ClientConfig::default(), &server.uri()).expect("client init");
        let err = client.stop_trader().await.unwrap_err();

        assert!(matches!(err, DeckError::Api { code: 502, .. }));
    }

    #[test]
    fn test_rejection_body_needs_a_reason() {
        assert!(rejection_from_body(r#"{"success":false}"#).is_none());
        assert!(rejection_from_body("Bad Gateway").is_none());

        let ack = rejection_from_body(r#"{"success":true,"message":"busy"}"#).expect("reason");
        assert!(!ack.success);
        assert_eq!(ack.reason(), Some("busy"));
    }
}
