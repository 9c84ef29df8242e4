/*
[INPUT]:  Endpoint descriptors with bounded counts and day windows
[OUTPUT]: Raw response envelopes for the view layer to decode
[POS]:    HTTP layer - read endpoints
[UPDATE]: When adding new read endpoints or changing response envelopes
*/

use crate::http::{DeckClient, Result};
use crate::types::{ApiEnvelope, Endpoint};
use reqwest::Method;

impl DeckClient {
    /// Fetch one read endpoint
    ///
    /// GET {endpoint.path()}
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<ApiEnvelope> {
        let builder = self.request(Method::GET, &endpoint.path())?;
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, DeckClient, DeckError};
    use crate::types::{Endpoint, HistoryWindow};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DeckClient {
        DeckClient::with_config(ClientConfig::default(), &server.uri()).expect("client init")
    }

    #[tokio::test]
    async fn test_fetch_status() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "success": true,
            "data": {
                "is_active": true,
                "mode": "paper",
                "status": "monitoring",
                "last_check": "2024-11-04T14:30:00Z"
            }
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/trader/status"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mock_response, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server)
            .fetch(Endpoint::Status)
            .await
            .expect("fetch status failed");

        assert!(envelope.success);
        assert_eq!(envelope.data["mode"], json!("paper"));
    }

    #[tokio::test]
    async fn test_fetch_equity_curve_passes_window() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/trader/equity-curve"))
            .and(query_param("days", "90"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "equity_curve": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server)
            .fetch(Endpoint::EquityCurve {
                window: HistoryWindow::Quarter,
            })
            .await
            .expect("fetch equity curve failed");

        assert!(envelope.success);
    }

    #[tokio::test]
    async fn test_fetch_negative_envelope_is_not_an_error() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/ml/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "model not trained"
            })))
            .mount(&server)
            .await;

        let envelope = client_for(&server)
            .fetch(Endpoint::MlStatus)
            .await
            .expect("transport should succeed");

        assert!(!envelope.success);
        assert_eq!(envelope.reason(), Some("model not trained"));
    }

    #[tokio::test]
    async fn test_fetch_server_error_maps_to_api_error() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/trader/diagnostics"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch(Endpoint::Diagnostics)
            .await
            .unwrap_err();

        match err {
            DeckError::Api { code, message } => {
                assert_eq!(code, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/trader/performance"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        client.set_credentials(crate::http::Credentials {
            api_token: "secret-token".to_string(),
        });

        let envelope = client
            .fetch(Endpoint::Performance)
            .await
            .expect("fetch performance failed");
        assert!(envelope.success);
    }
}
