/*
[INPUT]:  Backend response bodies
[OUTPUT]: Envelope structs that tolerate missing fields
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the backend changes its envelope shape
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Common wrapper around every read endpoint's payload.
///
/// A missing `success` flag counts as failure; `data` stays raw JSON so that
/// field interpretation happens in one place above the transport.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiEnvelope {
    /// Successful envelope around `data`
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message: None,
        }
    }

    /// Negative envelope carrying the backend's reason
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(error.into()),
            message: None,
        }
    }

    /// Reason text for a negative envelope, if the backend gave one
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Acknowledgment returned by mutating calls
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionAck {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Backend-supplied reason, preferring `error` over `message`
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_without_success_is_a_failure() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({ "data": { "a": 1 } }))
            .expect("deserialize");
        assert!(!envelope.success);
        assert_eq!(envelope.data, json!({ "a": 1 }));
    }

    #[test]
    fn envelope_reason_prefers_error() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "success": false,
            "error": "db locked",
            "message": "try later"
        }))
        .expect("deserialize");
        assert_eq!(envelope.reason(), Some("db locked"));
    }

    #[test]
    fn ack_falls_back_to_message() {
        let ack: ActionAck =
            serde_json::from_value(json!({ "success": false, "message": "market closed" }))
                .expect("deserialize");
        assert_eq!(ack.reason(), Some("market closed"));
    }
}
