/*
[INPUT]:  Raw push-channel text frames
[OUTPUT]: Parsed PushMessage values with raw sub-objects
[POS]:    WebSocket layer - message parsing and validation
[UPDATE]: When adding new message types or sub-objects
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sub-objects a push message may carry. Absent (or null) means "no change".
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PushPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Value>,
}

impl PushPayload {
    pub fn is_empty(&self) -> bool {
        self.performance.is_none()
            && self.status.is_none()
            && self.positions.is_none()
            && self.logs.is_none()
    }
}

/// Push-channel message envelope, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum PushMessage {
    #[serde(rename = "update")]
    Update(PushPayload),
    #[serde(rename = "snapshot")]
    Snapshot(PushPayload),
    #[serde(rename = "hello")]
    Hello(PushPayload),
    #[serde(other)]
    Other,
}

impl PushMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PushMessage::Update(_) => "update",
            PushMessage::Snapshot(_) => "snapshot",
            PushMessage::Hello(_) => "hello",
            PushMessage::Other => "other",
        }
    }

    /// Payload of an accepted message; `None` for unrecognized types
    pub fn payload(&self) -> Option<&PushPayload> {
        match self {
            PushMessage::Update(payload)
            | PushMessage::Snapshot(payload)
            | PushMessage::Hello(payload) => Some(payload),
            PushMessage::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_update_with_partial_payload() {
        let message: PushMessage = serde_json::from_value(json!({
            "type": "update",
            "performance": { "total_pnl": 120.5 },
            "logs": null
        }))
        .expect("parse");

        let payload = message.payload().expect("accepted type");
        assert_eq!(message.kind(), "update");
        assert_eq!(payload.performance, Some(json!({ "total_pnl": 120.5 })));
        assert!(payload.logs.is_none());
        assert!(payload.positions.is_none());
    }

    #[test]
    fn unknown_type_is_other() {
        let message: PushMessage =
            serde_json::from_value(json!({ "type": "heartbeat" })).expect("parse");
        assert_eq!(message, PushMessage::Other);
        assert!(message.payload().is_none());
    }

    #[test]
    fn hello_without_sub_objects_is_empty() {
        let message: PushMessage = serde_json::from_value(json!({ "type": "hello" })).expect("parse");
        assert!(message.payload().expect("accepted").is_empty());
    }
}
