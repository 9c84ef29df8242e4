/*
[INPUT]:  Parsed push-channel messages
[OUTPUT]: Slice updates for the sub-objects each message carries
[POS]:    Live update layer - push decoding, no state access
[UPDATE]: When the push channel starts carrying another sub-object
*/

use autotrader_deck_adapter::PushMessage;
use tracing::trace;

use crate::decode::keys;
use crate::model::{Decode, Performance, Trade, TradeLogEntry, TraderStatus};
use crate::state::SliceUpdate;

/// Decode the present sub-objects of an accepted message.
///
/// An absent (or null) sub-object produces no update, so the slice keeps its
/// value. Unrecognized message types produce nothing.
pub fn updates_from_push(message: &PushMessage) -> Vec<SliceUpdate> {
    let Some(payload) = message.payload() else {
        trace!("ignoring unrecognized push message");
        return Vec::new();
    };

    let mut updates = Vec::with_capacity(4);
    if let Some(raw) = payload.performance.as_ref().filter(|raw| !raw.is_null()) {
        updates.push(SliceUpdate::Performance(Performance::decode(raw)));
    }
    if let Some(raw) = payload.status.as_ref().filter(|raw| !raw.is_null()) {
        updates.push(SliceUpdate::Status(TraderStatus::decode(raw)));
    }
    if let Some(raw) = payload.positions.as_ref().filter(|raw| !raw.is_null()) {
        updates.push(SliceUpdate::Positions(Trade::decode_list(raw, keys::TRADE_LIST)));
    }
    if let Some(raw) = payload.logs.as_ref().filter(|raw| !raw.is_null()) {
        updates.push(SliceUpdate::ActivityLog(TradeLogEntry::decode_list(raw, keys::LOG_LIST)));
    }
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Slice;
    use serde_json::json;

    fn message(raw: serde_json::Value) -> PushMessage {
        serde_json::from_value(raw).expect("push message")
    }

    fn slices(updates: &[SliceUpdate]) -> Vec<Slice> {
        updates.iter().map(SliceUpdate::slice).collect()
    }

    #[test]
    fn only_present_sub_objects_produce_updates() {
        let updates = updates_from_push(&message(json!({
            "type": "update",
            "performance": { "total_pnl": 120.5 }
        })));
        assert_eq!(slices(&updates), vec![Slice::Performance]);
    }

    #[test]
    fn snapshot_carries_all_four() {
        let updates = updates_from_push(&message(json!({
            "type": "snapshot",
            "performance": {},
            "status": { "is_active": true },
            "positions": [{ "id": "t1" }],
            "logs": { "logs": [{ "action": "SCAN" }] }
        })));
        assert_eq!(
            slices(&updates),
            vec![Slice::Performance, Slice::Status, Slice::Positions, Slice::ActivityLog]
        );
        match &updates[3] {
            SliceUpdate::ActivityLog(entries) => assert_eq!(entries[0].action, "SCAN"),
            other => panic!("unexpected update {other:?}"),
        }
    }

    #[test]
    fn empty_position_list_is_still_an_update() {
        let updates = updates_from_push(&message(json!({ "type": "update", "positions": [] })));
        assert!(matches!(updates.as_slice(), [SliceUpdate::Positions(rows)] if rows.is_empty()));
    }

    #[test]
    fn hello_without_payload_and_unknown_types_are_no_ops() {
        assert!(updates_from_push(&message(json!({ "type": "hello" }))).is_empty());
        assert!(updates_from_push(&message(json!({ "type": "heartbeat" }))).is_empty());
    }
}
