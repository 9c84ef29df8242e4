/*
[INPUT]:  Dashboard API catalogue and user-tunable query windows
[OUTPUT]: Typed endpoint and window enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the backend adds, renames or re-parameterizes an endpoint
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting window for the equity curve, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum HistoryWindow {
    Week,
    #[default]
    Month,
    Quarter,
}

impl HistoryWindow {
    pub fn days(self) -> u32 {
        match self {
            HistoryWindow::Week => 7,
            HistoryWindow::Month => 30,
            HistoryWindow::Quarter => 90,
        }
    }
}

impl TryFrom<u32> for HistoryWindow {
    type Error = String;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(HistoryWindow::Week),
            30 => Ok(HistoryWindow::Month),
            90 => Ok(HistoryWindow::Quarter),
            other => Err(format!("unsupported history window {other}d (expected 7, 30 or 90)")),
        }
    }
}

impl From<HistoryWindow> for u32 {
    fn from(window: HistoryWindow) -> Self {
        window.days()
    }
}

impl fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days())
    }
}

/// One read endpoint of the dashboard API, carrying its bounded query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Status,
    Performance,
    Trades { limit: u32 },
    Strategies,
    StrategyConfig,
    Decisions { limit: u32 },
    Leaderboard,
    PatternBacktests { days: u32 },
    LiberationAccuracy { days: u32 },
    FalseFloor { days: u32 },
    RiskStatus,
    ActivityLog,
    EquityCurve { window: HistoryWindow },
    ClosedTrades { limit: u32 },
    MlStatus,
    MlPredictions { limit: u32 },
    RiskHistory { days: u32 },
    Diagnostics,
    VixHedgeSignal,
    VixCurrent,
    UnifiedPortfolio,
    MarketRegime,
    VolSurface,
    BackgroundJobs,
}

impl Endpoint {
    /// Stable name used in logs and test fixtures
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Status => "status",
            Endpoint::Performance => "performance",
            Endpoint::Trades { .. } => "trades",
            Endpoint::Strategies => "strategies",
            Endpoint::StrategyConfig => "strategy_config",
            Endpoint::Decisions { .. } => "decisions",
            Endpoint::Leaderboard => "leaderboard",
            Endpoint::PatternBacktests { .. } => "pattern_backtests",
            Endpoint::LiberationAccuracy { .. } => "liberation_accuracy",
            Endpoint::FalseFloor { .. } => "false_floor",
            Endpoint::RiskStatus => "risk_status",
            Endpoint::ActivityLog => "activity_log",
            Endpoint::EquityCurve { .. } => "equity_curve",
            Endpoint::ClosedTrades { .. } => "closed_trades",
            Endpoint::MlStatus => "ml_status",
            Endpoint::MlPredictions { .. } => "ml_predictions",
            Endpoint::RiskHistory { .. } => "risk_history",
            Endpoint::Diagnostics => "diagnostics",
            Endpoint::VixHedgeSignal => "vix_hedge_signal",
            Endpoint::VixCurrent => "vix_current",
            Endpoint::UnifiedPortfolio => "unified_portfolio",
            Endpoint::MarketRegime => "market_regime",
            Endpoint::VolSurface => "vol_surface",
            Endpoint::BackgroundJobs => "background_jobs",
        }
    }

    /// Request path relative to the API base URL, query string included
    pub fn path(&self) -> String {
        match self {
            Endpoint::Status => "/api/trader/status".to_string(),
            Endpoint::Performance => "/api/trader/performance".to_string(),
            Endpoint::Trades { limit } => format!("/api/trader/trades?limit={limit}"),
            Endpoint::Strategies => "/api/trader/strategies".to_string(),
            Endpoint::StrategyConfig => "/api/trader/strategies/config".to_string(),
            Endpoint::Decisions { limit } => format!("/api/trader/decisions?limit={limit}"),
            Endpoint::Leaderboard => "/api/trader/competition/leaderboard".to_string(),
            Endpoint::PatternBacktests { days } => {
                format!("/api/trader/backtests/patterns?days={days}")
            }
            Endpoint::LiberationAccuracy { days } => {
                format!("/api/trader/backtests/liberation-accuracy?days={days}")
            }
            Endpoint::FalseFloor { days } => {
                format!("/api/trader/backtests/false-floor?days={days}")
            }
            Endpoint::RiskStatus => "/api/trader/risk/status".to_string(),
            Endpoint::ActivityLog => "/api/trader/log".to_string(),
            Endpoint::EquityCurve { window } => {
                format!("/api/trader/equity-curve?days={}", window.days())
            }
            Endpoint::ClosedTrades { limit } => format!("/api/trader/closed-trades?limit={limit}"),
            Endpoint::MlStatus => "/api/ml/status".to_string(),
            Endpoint::MlPredictions { limit } => format!("/api/ml/predictions?limit={limit}"),
            Endpoint::RiskHistory { days } => format!("/api/trader/risk/history?days={days}"),
            Endpoint::Diagnostics => "/api/trader/diagnostics".to_string(),
            Endpoint::VixHedgeSignal => "/api/vix/hedge-signal".to_string(),
            Endpoint::VixCurrent => "/api/vix/current".to_string(),
            Endpoint::UnifiedPortfolio => "/api/portfolio/unified".to_string(),
            Endpoint::MarketRegime => "/api/regime/current".to_string(),
            Endpoint::VolSurface => "/api/volatility-surface/signal".to_string(),
            Endpoint::BackgroundJobs => "/api/jobs".to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
