/*
[INPUT]:  Raw position, closed-trade, equity-curve and activity-log records
[OUTPUT]: Trade, ClosedTrade, EquityCurvePoint and TradeLogEntry view copies
[POS]:    Model layer - everything the positions table, curve and feed render
[UPDATE]: When a trade-shaped payload gains fields or a new identity source
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::Decode;
use crate::decode::{self, Keys, keys};

/// Identity of an open-position row.
///
/// `Backend` keys come from the data source and are stable across fetch
/// cycles. `Derived` keys are built from the entry timestamp plus the row's
/// position in its batch: unique within one cycle, not across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum TradeKey {
    Backend(String),
    Derived { timestamp: String, ordinal: usize },
}

impl TradeKey {
    pub fn is_stable(&self) -> bool {
        matches!(self, TradeKey::Backend(_))
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKey::Backend(id) => write!(f, "{id}"),
            TradeKey::Derived { timestamp, ordinal } => write!(f, "{timestamp}#{ordinal}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
    Pending,
    /// Legacy spelling of an open position
    Filled,
    Other(String),
}

impl TradeStatus {
    fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "open" => TradeStatus::Open,
            "closed" => TradeStatus::Closed,
            "pending" => TradeStatus::Pending,
            "filled" => TradeStatus::Filled,
            _ => TradeStatus::Other(text.trim().to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TradeStatus::Open | TradeStatus::Filled)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TradeStatus::Closed)
    }

    pub fn label(&self) -> &str {
        match self {
            TradeStatus::Open => "OPEN",
            TradeStatus::Closed => "CLOSED",
            TradeStatus::Pending => "pending",
            TradeStatus::Filled => "filled",
            TradeStatus::Other(text) => text,
        }
    }
}

/// Greeks as relayed by the backend; absent values stay absent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Greeks {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub theta: Option<f64>,
    pub vega: Option<f64>,
    pub entry_iv: Option<f64>,
    pub current_iv: Option<f64>,
}

impl Decode for Greeks {
    fn decode(raw: &Value) -> Self {
        let raw = decode::section(raw, keys::GREEKS);
        Self {
            delta: decode::opt_number(raw, keys::DELTA),
            gamma: decode::opt_number(raw, keys::GAMMA),
            theta: decode::opt_number(raw, keys::THETA),
            vega: decode::opt_number(raw, keys::VEGA),
            entry_iv: decode::opt_number(raw, keys::ENTRY_IV),
            current_iv: decode::opt_number(raw, keys::CURRENT_IV),
        }
    }
}

/// Market context captured when the position was opened
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegimeContext {
    pub regime: String,
    pub vix_at_entry: Option<f64>,
    pub net_gex: Option<f64>,
    pub flip_point: Option<f64>,
}

impl Decode for RegimeContext {
    fn decode(raw: &Value) -> Self {
        let raw = decode::section(raw, keys::REGIME_BODY);
        Self {
            regime: decode::text(raw, keys::REGIME),
            vix_at_entry: decode::opt_number(raw, keys::VIX_AT_ENTRY),
            net_gex: decode::opt_number(raw, keys::NET_GEX),
            flip_point: decode::opt_number(raw, keys::FLIP_POINT),
        }
    }
}

/// Open-position row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub key: TradeKey,
    pub timestamp: Option<DateTime<Utc>>,
    pub symbol: String,
    pub strike: Decimal,
    pub option_type: String,
    pub expiration: String,
    pub action: String,
    pub quantity: i64,
    pub entry_price: Decimal,
    pub current_price: Option<Decimal>,
    pub spot_price: Decimal,
    pub status: TradeStatus,
    pub realized_pnl: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub pnl_pct: Option<f64>,
    pub strategy: String,
    pub greeks: Greeks,
    pub regime: RegimeContext,
}

impl Trade {
    /// Decode one row, deriving its key from `ordinal` when the record has no id
    pub fn decode_at(raw: &Value, ordinal: usize) -> Self {
        let key = match decode::opt_text(raw, keys::TRADE_ID) {
            Some(id) => TradeKey::Backend(id),
            None => TradeKey::Derived {
                timestamp: decode::opt_text(raw, keys::TRADE_TIMESTAMP)
                    .unwrap_or_else(|| "unknown".to_string()),
                ordinal,
            },
        };

        Self {
            key,
            timestamp: decode::opt_timestamp(raw, keys::TRADE_TIMESTAMP),
            symbol: decode::text(raw, keys::SYMBOL),
            strike: decode::decimal(raw, keys::STRIKE),
            option_type: decode::text(raw, keys::OPTION_TYPE),
            expiration: decode::text(raw, keys::EXPIRATION),
            action: decode::text(raw, keys::ACTION),
            quantity: decode::integer(raw, keys::QUANTITY),
            entry_price: decode::decimal(raw, keys::ENTRY_PRICE),
            current_price: decode::opt_decimal(raw, keys::CURRENT_PRICE),
            spot_price: decode::decimal(raw, keys::SPOT_PRICE),
            status: TradeStatus::from_text(&decode::text(raw, keys::TRADE_STATUS)),
            realized_pnl: decode::opt_decimal(raw, keys::TRADE_REALIZED_PNL),
            unrealized_pnl: decode::opt_decimal(raw, keys::TRADE_UNREALIZED_PNL),
            pnl_pct: decode::opt_number(raw, keys::PNL_PCT),
            strategy: decode::text(raw, keys::STRATEGY),
            greeks: Greeks::decode(raw),
            regime: RegimeContext::decode(raw),
        }
    }

    /// Mark price, or the entry price when the position is un-priced
    pub fn mark_price(&self) -> Decimal {
        self.current_price.unwrap_or(self.entry_price)
    }
}

impl Decode for Trade {
    fn decode(raw: &Value) -> Self {
        Self::decode_at(raw, 0)
    }

    fn decode_list(raw: &Value, keys: Keys) -> Vec<Self> {
        decode::list(raw, keys)
            .iter()
            .enumerate()
            .map(|(ordinal, item)| Self::decode_at(item, ordinal))
            .collect()
    }
}

/// Finished round trip. Immutable once received.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClosedTrade {
    pub id: String,
    pub entry_at: Option<DateTime<Utc>>,
    pub exit_at: Option<DateTime<Utc>>,
    pub strategy: String,
    pub symbol: String,
    pub strike: Decimal,
    pub option_type: String,
    pub expiration: String,
    pub quantity: i64,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub realized_pnl: Decimal,
    pub pnl_pct: Option<f64>,
    pub exit_reason: String,
    pub hold_minutes: Option<i64>,
}

impl Decode for ClosedTrade {
    fn decode(raw: &Value) -> Self {
        let entry_at = decode::opt_date_time(raw, keys::ENTRY_DATE, keys::ENTRY_TIME);
        let exit_at = decode::opt_date_time(raw, keys::EXIT_DATE, keys::EXIT_TIME);
        let hold_minutes = decode::opt_number(raw, keys::HOLD_MINUTES)
            .map(|minutes| minutes.trunc() as i64)
            .or_else(|| match (entry_at, exit_at) {
                (Some(entry), Some(exit)) if exit >= entry => Some((exit - entry).num_minutes()),
                _ => None,
            });

        Self {
            id: decode::text(raw, keys::TRADE_ID),
            entry_at,
            exit_at,
            strategy: decode::text(raw, keys::STRATEGY),
            symbol: decode::text(raw, keys::SYMBOL),
            strike: decode::decimal(raw, keys::STRIKE),
            option_type: decode::text(raw, keys::OPTION_TYPE),
            expiration: decode::text(raw, keys::EXPIRATION),
            quantity: decode::integer(raw, keys::QUANTITY),
            entry_price: decode::decimal(raw, keys::ENTRY_PRICE),
            exit_price: decode::decimal(raw, keys::EXIT_PRICE),
            realized_pnl: decode::decimal(raw, keys::CLOSED_PNL),
            pnl_pct: decode::opt_number(raw, keys::PNL_PCT),
            exit_reason: decode::text(raw, keys::EXIT_REASON),
            hold_minutes,
        }
    }
}

/// One equity-curve sample.
///
/// `timestamp` is kept in whatever unit the backend sent. Charting code must
/// go through the derived normalized curve, never read it directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EquityCurvePoint {
    pub timestamp: i64,
    pub equity: Decimal,
    pub pnl: Decimal,
    pub date_label: String,
}

impl Decode for EquityCurvePoint {
    fn decode(raw: &Value) -> Self {
        Self {
            timestamp: raw_epoch(raw, keys::CURVE_TIMESTAMP),
            equity: decode::decimal(raw, keys::CURVE_EQUITY),
            pnl: decode::decimal(raw, keys::CURVE_PNL),
            date_label: decode::text(raw, keys::DATE_LABEL),
        }
    }
}

/// Unscaled epoch number; date strings are converted to milliseconds
fn raw_epoch(raw: &Value, keys: Keys) -> i64 {
    match decode::lookup(raw, keys) {
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64)
            .unwrap_or(0),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| decode::parse_timestamp_str(text).map(|at| at.timestamp_millis()))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Legacy-shaped activity-feed row
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TradeLogEntry {
    pub date: String,
    pub time: String,
    pub action: String,
    pub details: String,
    pub pnl: Option<Decimal>,
}

impl Decode for TradeLogEntry {
    fn decode(raw: &Value) -> Self {
        Self {
            date: decode::text(raw, keys::LOG_DATE),
            time: decode::text(raw, keys::LOG_TIME),
            action: decode::text(raw, keys::LOG_ACTION),
            details: decode::text(raw, keys::LOG_DETAILS),
            pnl: decode::opt_decimal(raw, keys::LOG_PNL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_id_wins_over_derived_key() {
        let trade = Trade::decode(&json!({ "trade_id": 42, "timestamp": "2024-11-04T15:00:00Z" }));
        assert_eq!(trade.key, TradeKey::Backend("42".to_string()));
        assert!(trade.key.is_stable());
    }

    #[test]
    fn same_second_trades_without_ids_do_not_collide() {
        let raw = json!({ "trades": [
            { "timestamp": "2024-11-04T15:00:00Z", "symbol": "SPY" },
            { "timestamp": "2024-11-04T15:00:00Z", "symbol": "SPY" }
        ]});
        let trades = Trade::decode_list(&raw, keys::TRADE_LIST);
        assert_eq!(trades.len(), 2);
        assert_ne!(trades[0].key, trades[1].key);
        assert_eq!(trades[1].key.to_string(), "2024-11-04T15:00:00Z#1");
        assert!(!trades[0].key.is_stable());
    }

    #[test]
    fn greeks_read_nested_or_flat() {
        let nested = Trade::decode(&json!({ "greeks": { "delta": 0.31, "theta": -0.05 } }));
        let flat = Trade::decode(&json!({ "entry_delta": 0.31, "theta": -0.05 }));
        assert_eq!(nested.greeks, flat.greeks);
        assert_eq!(nested.greeks.delta, Some(0.31));
        assert_eq!(nested.greeks.vega, None);
    }

    #[test]
    fn status_spellings() {
        assert!(TradeStatus::from_text("FILLED").is_open());
        assert!(TradeStatus::from_text("open").is_open());
        assert!(TradeStatus::from_text("CLOSED").is_closed());
        assert_eq!(TradeStatus::from_text("expired"), TradeStatus::Other("expired".to_string()));
    }

    #[test]
    fn unpriced_position_marks_at_entry() {
        let trade = Trade::decode(&json!({ "entry_price": "2.15", "quantity": 3 }));
        assert_eq!(trade.current_price, None);
        assert_eq!(trade.mark_price(), Decimal::new(215, 2));
    }

    #[test]
    fn closed_trade_combines_date_and_time_and_computes_hold() {
        let closed = ClosedTrade::decode(&json!({
            "entry_date": "2024-11-04", "entry_time": "10:00:00",
            "exit_date": "2024-11-04", "exit_time": "11:30:00",
            "pnl": 120
        }));
        assert_eq!(closed.hold_minutes, Some(90));
        assert_eq!(closed.realized_pnl, Decimal::from(120));
    }

    #[test]
    fn curve_point_keeps_raw_unit() {
        let seconds = EquityCurvePoint::decode(&json!({ "timestamp": 1_700_000_000 }));
        let dated = EquityCurvePoint::decode(&json!({ "date": "2023-11-14T22:13:20Z" }));
        assert_eq!(seconds.timestamp, 1_700_000_000);
        assert_eq!(dated.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn log_entry_without_pnl_has_none() {
        let entry = TradeLogEntry::decode(&json!({ "date": "2024-11-04", "action": "SCAN" }));
        assert_eq!(entry.pnl, None);
        assert_eq!(entry.action, "SCAN");
    }
}
