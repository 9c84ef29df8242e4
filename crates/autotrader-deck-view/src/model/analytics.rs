/*
[INPUT]:  Raw risk, ML, backtest, signal-study, diagnostics and job records
[OUTPUT]: Flat read-only snapshots, one per pull-only endpoint
[POS]:    Model layer - analytics panels; no cross-entity invariants
[UPDATE]: When an analytics endpoint changes its payload
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value;

use super::Decode;
use crate::decode::{self, keys};

/// Risk gate state as computed by the backend. Greeks are relayed, not derived.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RiskStatus {
    pub trading_allowed: bool,
    pub risk_level: String,
    pub daily_loss: Decimal,
    pub daily_loss_limit: Decimal,
    pub max_position_size: Decimal,
    pub current_exposure: Decimal,
    pub portfolio_delta: f64,
    pub portfolio_gamma: f64,
    pub portfolio_theta: f64,
    pub portfolio_vega: f64,
    pub warnings: Vec<String>,
}

impl RiskStatus {
    /// Share of the daily loss limit already used, `0.0` when no limit is set
    pub fn loss_limit_used_pct(&self) -> f64 {
        if self.daily_loss_limit.is_zero() {
            return 0.0;
        }
        self.daily_loss
            .abs()
            .checked_div(self.daily_loss_limit.abs())
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|used| used.to_f64())
            .unwrap_or(0.0)
    }
}

impl Decode for RiskStatus {
    fn decode(raw: &Value) -> Self {
        Self {
            trading_allowed: decode::flag(raw, keys::TRADING_ALLOWED),
            risk_level: decode::text(raw, keys::RISK_LEVEL),
            daily_loss: decode::decimal(raw, keys::DAILY_LOSS),
            daily_loss_limit: decode::decimal(raw, keys::DAILY_LOSS_LIMIT),
            max_position_size: decode::decimal(raw, keys::MAX_POSITION_SIZE),
            current_exposure: decode::decimal(raw, keys::EXPOSURE),
            portfolio_delta: decode::number(raw, keys::PORTFOLIO_DELTA),
            portfolio_gamma: decode::number(raw, keys::PORTFOLIO_GAMMA),
            portfolio_theta: decode::number(raw, keys::PORTFOLIO_THETA),
            portfolio_vega: decode::number(raw, keys::PORTFOLIO_VEGA),
            warnings: decode::text_list(raw, keys::WARNINGS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RiskMetricPoint {
    pub timestamp: Option<DateTime<Utc>>,
    pub portfolio_delta: f64,
    pub portfolio_gamma: f64,
    pub portfolio_theta: f64,
    pub portfolio_vega: f64,
    pub var_95: Option<f64>,
    pub daily_pnl: Decimal,
}

impl Decode for RiskMetricPoint {
    fn decode(raw: &Value) -> Self {
        Self {
            timestamp: decode::opt_timestamp(raw, keys::POINT_TIMESTAMP),
            portfolio_delta: decode::number(raw, keys::PORTFOLIO_DELTA),
            portfolio_gamma: decode::number(raw, keys::PORTFOLIO_GAMMA),
            portfolio_theta: decode::number(raw, keys::PORTFOLIO_THETA),
            portfolio_vega: decode::number(raw, keys::PORTFOLIO_VEGA),
            var_95: decode::opt_number(raw, keys::VAR_95),
            daily_pnl: decode::decimal(raw, keys::TODAY_PNL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MlModelStatus {
    pub is_trained: bool,
    pub model_name: String,
    pub model_version: String,
    pub accuracy: Option<f64>,
    pub training_samples: u64,
    pub last_trained: Option<DateTime<Utc>>,
}

impl Decode for MlModelStatus {
    fn decode(raw: &Value) -> Self {
        Self {
            is_trained: decode::flag(raw, keys::IS_TRAINED),
            model_name: decode::text(raw, keys::MODEL_NAME),
            model_version: decode::text(raw, keys::MODEL_VERSION),
            accuracy: decode::opt_number(raw, keys::ACCURACY),
            training_samples: decode::count(raw, keys::SAMPLES),
            last_trained: decode::opt_timestamp(raw, keys::LAST_TRAINED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MlPrediction {
    pub timestamp: Option<DateTime<Utc>>,
    pub pattern: String,
    pub prediction: String,
    pub probability: Option<f64>,
    pub actual: String,
    /// `None` until the outcome is known
    pub correct: Option<bool>,
}

impl Decode for MlPrediction {
    fn decode(raw: &Value) -> Self {
        Self {
            timestamp: decode::opt_timestamp(raw, keys::POINT_TIMESTAMP),
            pattern: decode::text(raw, keys::PATTERN),
            prediction: decode::text(raw, keys::PREDICTION),
            probability: decode::opt_number(raw, keys::PROBABILITY),
            actual: decode::text(raw, keys::ACTUAL),
            correct: decode::opt_flag(raw, keys::CORRECT),
        }
    }
}

/// Pattern backtest row
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BacktestResult {
    pub pattern: String,
    pub total_signals: u64,
    pub win_rate: f64,
    pub avg_return_pct: f64,
    pub expectancy: f64,
    pub sharpe_ratio: f64,
}

impl Decode for BacktestResult {
    fn decode(raw: &Value) -> Self {
        Self {
            pattern: decode::text(raw, keys::PATTERN_NAME),
            total_signals: decode::count(raw, keys::TOTAL_SIGNALS),
            win_rate: decode::number(raw, keys::WIN_RATE),
            avg_return_pct: decode::number(raw, keys::AVG_RETURN_PCT),
            expectancy: decode::number(raw, keys::EXPECTANCY),
            sharpe_ratio: decode::number(raw, keys::SHARPE),
        }
    }
}

/// Liberation-signal accuracy over the study window
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SignalAccuracy {
    pub total_signals: u64,
    pub correct_signals: u64,
    pub accuracy_pct: f64,
    pub avg_move_pct: f64,
}

impl Decode for SignalAccuracy {
    fn decode(raw: &Value) -> Self {
        Self {
            total_signals: decode::count(raw, keys::TOTAL_SIGNALS),
            correct_signals: decode::count(raw, keys::CORRECT_SIGNALS),
            accuracy_pct: decode::number(raw, keys::ACCURACY_PCT),
            avg_move_pct: decode::number(raw, keys::AVG_MOVE_PCT),
        }
    }
}

/// False-floor detection effectiveness over the study window
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FalseFloorReport {
    pub total_detections: u64,
    pub true_positives: u64,
    pub false_positives: u64,
    pub effectiveness_pct: f64,
}

impl Decode for FalseFloorReport {
    fn decode(raw: &Value) -> Self {
        Self {
            total_detections: decode::count(raw, keys::DETECTIONS),
            true_positives: decode::count(raw, keys::TRUE_POSITIVES),
            false_positives: decode::count(raw, keys::FALSE_POSITIVES),
            effectiveness_pct: decode::number(raw, keys::EFFECTIVENESS_PCT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DiagnosticCheck {
    pub name: String,
    pub ok: bool,
    pub message: String,
}

impl Decode for DiagnosticCheck {
    fn decode(raw: &Value) -> Self {
        let ok = decode::opt_flag(raw, keys::CHECK_OK).unwrap_or_else(|| {
            matches!(
                decode::text(raw, keys::SERVICE_STATUS).to_ascii_lowercase().as_str(),
                "ok" | "healthy" | "pass" | "passed" | "up"
            )
        });
        Self {
            name: decode::text(raw, keys::CHECK_LABEL),
            ok,
            message: decode::text(raw, keys::MESSAGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagnostics {
    pub status: String,
    pub uptime_seconds: u64,
    pub database_connected: bool,
    pub api_latency_ms: Option<f64>,
    pub last_error: String,
    pub checks: Vec<DiagnosticCheck>,
}

impl Diagnostics {
    pub fn failing_checks(&self) -> impl Iterator<Item = &DiagnosticCheck> {
        self.checks.iter().filter(|check| !check.ok)
    }
}

impl Decode for Diagnostics {
    fn decode(raw: &Value) -> Self {
        Self {
            status: decode::text(raw, keys::SERVICE_STATUS),
            uptime_seconds: decode::count(raw, keys::UPTIME),
            database_connected: decode::flag(raw, keys::DATABASE_CONNECTED),
            api_latency_ms: decode::opt_number(raw, keys::API_LATENCY),
            last_error: decode::text(raw, keys::LAST_ERROR),
            checks: DiagnosticCheck::decode_list(raw, keys::DIAGNOSTIC_CHECKS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BackgroundJob {
    pub id: String,
    pub name: String,
    pub status: String,
    pub progress: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: String,
}

impl BackgroundJob {
    pub fn is_running(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "running" | "pending" | "queued" | "in_progress"
        )
    }
}

impl Decode for BackgroundJob {
    fn decode(raw: &Value) -> Self {
        Self {
            id: decode::text(raw, keys::JOB_ID),
            name: decode::text(raw, keys::JOB_NAME),
            status: decode::text(raw, keys::JOB_STATUS),
            progress: decode::number(raw, keys::PROGRESS).clamp(0.0, 100.0),
            started_at: decode::opt_timestamp(raw, keys::STARTED_AT),
            finished_at: decode::opt_timestamp(raw, keys::FINISHED_AT),
            error: decode::text(raw, keys::JOB_ERROR),
        }
    }
}
