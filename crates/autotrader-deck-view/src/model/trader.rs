/*
[INPUT]:  Raw status and performance records (pull or push)
[OUTPUT]: TraderStatus and Performance view copies
[POS]:    Model layer - push-or-pull slices describing the trader itself
[UPDATE]: When the status or performance schema changes
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::Decode;
use crate::decode::{self, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl TradingMode {
    fn from_text(text: &str) -> Self {
        if text.eq_ignore_ascii_case("live") {
            TradingMode::Live
        } else {
            TradingMode::Paper
        }
    }
}

/// Activity and mode of the autonomous trader
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TraderStatus {
    pub is_active: bool,
    pub mode: TradingMode,
    pub status: String,
    pub current_action: String,
    pub market_analysis: String,
    pub last_check: Option<DateTime<Utc>>,
    pub next_check: Option<DateTime<Utc>>,
}

impl Decode for TraderStatus {
    fn decode(raw: &Value) -> Self {
        let raw = decode::section(raw, keys::STATUS_BODY);
        Self {
            is_active: decode::flag(raw, keys::IS_ACTIVE),
            mode: TradingMode::from_text(&decode::text(raw, keys::MODE)),
            status: decode::text(raw, keys::STATUS_TEXT),
            current_action: decode::text(raw, keys::CURRENT_ACTION),
            market_analysis: decode::text(raw, keys::MARKET_ANALYSIS),
            last_check: decode::opt_timestamp(raw, keys::LAST_CHECK),
            next_check: decode::opt_timestamp(raw, keys::NEXT_CHECK),
        }
    }
}

/// Aggregate account performance, as reported by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Performance {
    pub total_pnl: Decimal,
    pub today_pnl: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub win_rate: f64,
    pub total_trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub starting_capital: Decimal,
    pub current_value: Decimal,
    pub return_pct: f64,
}

impl Performance {
    /// `current_value - (starting_capital + total_pnl)`.
    ///
    /// Advisory only: the backend is the source of truth and nothing here
    /// corrects a non-zero drift.
    pub fn capital_drift(&self) -> Decimal {
        self.current_value
            .saturating_sub(self.starting_capital.saturating_add(self.total_pnl))
    }
}

impl Decode for Performance {
    fn decode(raw: &Value) -> Self {
        let raw = decode::section(raw, keys::PERFORMANCE_BODY);
        Self {
            total_pnl: decode::decimal(raw, keys::TOTAL_PNL),
            today_pnl: decode::decimal(raw, keys::TODAY_PNL),
            realized_pnl: decode::decimal(raw, keys::REALIZED_PNL),
            unrealized_pnl: decode::decimal(raw, keys::UNREALIZED_PNL),
            win_rate: decode::number(raw, keys::WIN_RATE),
            total_trades: decode::count(raw, keys::TOTAL_TRADES),
            winning_trades: decode::count(raw, keys::WINNING_TRADES),
            losing_trades: decode::count(raw, keys::LOSING_TRADES),
            sharpe_ratio: decode::number(raw, keys::SHARPE),
            max_drawdown: decode::number(raw, keys::MAX_DRAWDOWN),
            starting_capital: decode::decimal(raw, keys::STARTING_CAPITAL),
            current_value: decode::decimal(raw, keys::CURRENT_VALUE),
            return_pct: decode::number(raw, keys::RETURN_PCT),
        }
    }
}
