/*
[INPUT]:  Raw VIX, volatility-surface, regime and unified-portfolio records
[OUTPUT]: Market-context snapshots for the hedge and context panels
[POS]:    Model layer - secondary and on-demand batch payloads
[UPDATE]: When a market-context endpoint changes its payload
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::Decode;
use crate::decode::{self, keys};

/// Volatility-hedge recommendation
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VixSignal {
    pub signal: String,
    pub vix_level: f64,
    pub vix_percentile: Option<f64>,
    pub term_structure: String,
    pub hedge_ratio: Option<f64>,
    pub confidence: Option<f64>,
    pub reasoning: String,
}

impl Decode for VixSignal {
    fn decode(raw: &Value) -> Self {
        Self {
            signal: decode::text(raw, keys::SIGNAL),
            vix_level: decode::number(raw, keys::VIX_LEVEL),
            vix_percentile: decode::opt_number(raw, keys::VIX_PERCENTILE),
            term_structure: decode::text(raw, keys::TERM_STRUCTURE),
            hedge_ratio: decode::opt_number(raw, keys::HEDGE_RATIO),
            confidence: decode::opt_number(raw, keys::CONFIDENCE),
            reasoning: decode::text(raw, keys::REASONING),
        }
    }
}

/// Current VIX complex
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VixData {
    pub vix_spot: f64,
    pub vix9d: Option<f64>,
    pub vix3m: Option<f64>,
    pub change_pct: f64,
    pub term_structure_ratio: Option<f64>,
    pub term_structure: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl VixData {
    /// Front below back month
    pub fn is_contango(&self) -> Option<bool> {
        self.vix3m.map(|back| self.vix_spot < back)
    }
}

impl Decode for VixData {
    fn decode(raw: &Value) -> Self {
        Self {
            vix_spot: decode::number(raw, keys::VIX_LEVEL),
            vix9d: decode::opt_number(raw, keys::VIX9D),
            vix3m: decode::opt_number(raw, keys::VIX3M),
            change_pct: decode::number(raw, keys::CHANGE_PCT),
            term_structure_ratio: decode::opt_number(raw, keys::TERM_RATIO),
            term_structure: decode::text(raw, keys::TERM_STRUCTURE),
            updated_at: decode::opt_timestamp(raw, keys::UPDATED_AT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VolSurfaceSignal {
    pub signal: String,
    pub skew: Option<f64>,
    pub term_slope: Option<f64>,
    pub iv_rank: Option<f64>,
    pub atm_iv: Option<f64>,
    pub confidence: Option<f64>,
    pub reasoning: String,
}

impl Decode for VolSurfaceSignal {
    fn decode(raw: &Value) -> Self {
        Self {
            signal: decode::text(raw, keys::SIGNAL),
            skew: decode::opt_number(raw, keys::SKEW),
            term_slope: decode::opt_number(raw, keys::TERM_SLOPE),
            iv_rank: decode::opt_number(raw, keys::IV_RANK),
            atm_iv: decode::opt_number(raw, keys::ATM_IV),
            confidence: decode::opt_number(raw, keys::CONFIDENCE),
            reasoning: decode::text(raw, keys::REASONING),
        }
    }
}

/// Backend-computed results for one market regime
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegimePerformance {
    pub regime: String,
    pub total_trades: u64,
    pub win_rate: f64,
    pub total_pnl: Decimal,
}

impl Decode for RegimePerformance {
    fn decode(raw: &Value) -> Self {
        Self {
            regime: decode::text(raw, keys::REGIME_NAME),
            total_trades: decode::count(raw, keys::STRATEGY_TRADES),
            win_rate: decode::number(raw, keys::WIN_RATE),
            total_pnl: decode::decimal(raw, keys::STRATEGY_PNL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegimeSnapshot {
    pub regime: String,
    pub confidence: Option<f64>,
    pub net_gex: Option<f64>,
    pub flip_point: Option<f64>,
    pub vix: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub performance: Vec<RegimePerformance>,
}

impl Decode for RegimeSnapshot {
    fn decode(raw: &Value) -> Self {
        Self {
            regime: decode::text(raw, keys::REGIME_NAME),
            confidence: decode::opt_number(raw, keys::CONFIDENCE),
            net_gex: decode::opt_number(raw, keys::NET_GEX),
            flip_point: decode::opt_number(raw, keys::FLIP_POINT),
            vix: decode::opt_number(raw, keys::VIX_LEVEL),
            updated_at: decode::opt_timestamp(raw, keys::UPDATED_AT),
            performance: RegimePerformance::decode_list(raw, keys::REGIME_PERFORMANCE_LIST),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub asset_class: String,
    pub quantity: i64,
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
}

impl Decode for PortfolioPosition {
    fn decode(raw: &Value) -> Self {
        Self {
            symbol: decode::text(raw, keys::INSTRUMENT),
            asset_class: decode::text(raw, keys::ASSET_CLASS),
            quantity: decode::integer(raw, keys::QUANTITY),
            market_value: decode::decimal(raw, keys::MARKET_VALUE),
            unrealized_pnl: decode::decimal(raw, keys::TRADE_UNREALIZED_PNL),
        }
    }
}

/// Multi-instrument portfolio: per-instrument rows plus backend totals
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnifiedPortfolio {
    pub total_value: Decimal,
    pub cash: Decimal,
    pub total_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub positions: Vec<PortfolioPosition>,
}

impl UnifiedPortfolio {
    /// Position weight against the reported total, `0` when the total is zero
    pub fn weight_pct(&self, position: &PortfolioPosition) -> Decimal {
        position
            .market_value
            .checked_div(self.total_value)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp(2))
            .unwrap_or(Decimal::ZERO)
    }
}

impl Decode for UnifiedPortfolio {
    fn decode(raw: &Value) -> Self {
        Self {
            total_value: decode::decimal(raw, keys::TOTAL_VALUE),
            cash: decode::decimal(raw, keys::CASH),
            total_pnl: decode::decimal(raw, keys::TOTAL_PNL),
            unrealized_pnl: decode::decimal(raw, keys::UNREALIZED_PNL),
            positions: PortfolioPosition::decode_list(raw, keys::PORTFOLIO_POSITIONS),
        }
    }
}
