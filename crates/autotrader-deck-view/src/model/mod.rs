/*
[INPUT]:  Raw backend records
[OUTPUT]: Typed view copies of trader state
[POS]:    Model layer - internal shapes produced by the tolerant decoder
[UPDATE]: When adding a new entity or slice
*/

pub mod ai_log;
pub mod analytics;
pub mod market;
pub mod strategy;
pub mod trade;
pub mod trader;

pub use ai_log::{AiLogEntry, AiLogKind};
pub use analytics::{
    BacktestResult, BackgroundJob, DiagnosticCheck, Diagnostics, FalseFloorReport, MlModelStatus,
    MlPrediction, RiskMetricPoint, RiskStatus, SignalAccuracy,
};
pub use market::{
    PortfolioPosition, RegimePerformance, RegimeSnapshot, UnifiedPortfolio, VixData, VixSignal,
    VolSurfaceSignal,
};
pub use strategy::{LeaderboardEntry, Strategy, StrategyConfigMap, StrategyStatus};
pub use trade::{
    ClosedTrade, EquityCurvePoint, Greeks, RegimeContext, Trade, TradeKey, TradeLogEntry,
    TradeStatus,
};
pub use trader::{Performance, TraderStatus, TradingMode};

use serde_json::Value;

use crate::decode::{self, Keys};

/// Total conversion from a raw record. Implementations never fail.
pub trait Decode: Sized {
    fn decode(raw: &Value) -> Self;

    /// Decode every element of the list found at `raw` or under `keys`
    fn decode_list(raw: &Value, keys: Keys) -> Vec<Self> {
        decode::list(raw, keys).iter().map(Self::decode).collect()
    }
}
