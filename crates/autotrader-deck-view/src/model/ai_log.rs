/*
[INPUT]:  Raw autonomous-decision log records tagged with a log type
[OUTPUT]: AiLogEntry sum type with one exhaustive summary dispatch
[POS]:    Model layer - decision feed of the autonomous trader
[UPDATE]: When the backend adds a decision kind or a kind gains fields
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::Decode;
use crate::decode::{self, keys};

/// Kind-specific payload of a decision log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AiLogKind {
    PatternAnalysis {
        pattern: String,
        confidence: Option<f64>,
        direction: String,
    },
    StrikeSelection {
        strike: Option<Decimal>,
        option_type: String,
        expiration: String,
        reasoning: String,
    },
    PositionSizing {
        contracts: Option<i64>,
        kelly_fraction: Option<f64>,
        risk_amount: Option<Decimal>,
    },
    ModelEvaluation {
        model_name: String,
        score: Option<f64>,
        prediction: String,
    },
    RiskCheck {
        check: String,
        passed: Option<bool>,
        value: Option<f64>,
        limit: Option<f64>,
    },
    TradeDecision {
        action: String,
        symbol: String,
        strike: Option<Decimal>,
        confidence: Option<f64>,
        reasoning: String,
    },
    /// Unrecognized tag, kept normalized so it can still be shown
    Other { tag: String },
}

impl AiLogKind {
    fn decode_tagged(raw: &Value) -> Self {
        let tag = normalize_tag(&decode::text(raw, keys::LOG_TYPE));
        match tag.as_str() {
            "pattern_analysis" | "pattern" => AiLogKind::PatternAnalysis {
                pattern: decode::text(raw, keys::PATTERN),
                confidence: decode::opt_number(raw, keys::CONFIDENCE),
                direction: decode::text(raw, keys::DIRECTION),
            },
            "strike_selection" => AiLogKind::StrikeSelection {
                strike: decode::opt_decimal(raw, keys::STRIKE),
                option_type: decode::text(raw, keys::DECISION_OPTION_TYPE),
                expiration: decode::text(raw, keys::EXPIRATION),
                reasoning: decode::text(raw, keys::REASONING),
            },
            "position_sizing" => AiLogKind::PositionSizing {
                contracts: decode::opt_number(raw, keys::CONTRACTS).map(|n| n.trunc() as i64),
                kelly_fraction: decode::opt_number(raw, keys::KELLY),
                risk_amount: decode::opt_decimal(raw, keys::RISK_AMOUNT),
            },
            "model_evaluation" | "ml_evaluation" => AiLogKind::ModelEvaluation {
                model_name: decode::text(raw, keys::MODEL_NAME),
                score: decode::opt_number(raw, keys::SCORE),
                prediction: decode::text(raw, keys::PREDICTION),
            },
            "risk_check" => AiLogKind::RiskCheck {
                check: decode::text(raw, keys::CHECK_NAME),
                passed: decode::opt_flag(raw, keys::PASSED),
                value: decode::opt_number(raw, keys::CHECK_VALUE),
                limit: decode::opt_number(raw, keys::CHECK_LIMIT),
            },
            "trade_decision" | "trade" => AiLogKind::TradeDecision {
                action: decode::text(raw, keys::ACTION),
                symbol: decode::text(raw, keys::SYMBOL),
                strike: decode::opt_decimal(raw, keys::STRIKE),
                confidence: decode::opt_number(raw, keys::CONFIDENCE),
                reasoning: decode::text(raw, keys::REASONING),
            },
            _ => AiLogKind::Other { tag },
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            AiLogKind::PatternAnalysis { .. } => "pattern_analysis",
            AiLogKind::StrikeSelection { .. } => "strike_selection",
            AiLogKind::PositionSizing { .. } => "position_sizing",
            AiLogKind::ModelEvaluation { .. } => "model_evaluation",
            AiLogKind::RiskCheck { .. } => "risk_check",
            AiLogKind::TradeDecision { .. } => "trade_decision",
            AiLogKind::Other { tag } => tag,
        }
    }
}

/// `"Pattern Analysis"`, `"PATTERN-ANALYSIS"` -> `"pattern_analysis"`
fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiLogEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
    pub kind: AiLogKind,
}

impl AiLogEntry {
    /// One-line description for the decision feed
    pub fn summary(&self) -> String {
        let detail = match &self.kind {
            AiLogKind::PatternAnalysis {
                pattern,
                confidence,
                direction,
            } => format!(
                "pattern {}{}{}",
                or_dash(pattern),
                suffix(" ", direction),
                percent(*confidence)
            ),
            AiLogKind::StrikeSelection {
                strike,
                option_type,
                expiration,
                ..
            } => format!(
                "strike {}{}{}",
                strike.map(|s| s.normalize().to_string()).unwrap_or_else(|| "-".to_string()),
                suffix(" ", option_type),
                suffix(" exp ", expiration)
            ),
            AiLogKind::PositionSizing {
                contracts,
                kelly_fraction,
                risk_amount,
            } => format!(
                "size {} contracts{}{}",
                contracts.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                kelly_fraction
                    .map(|k| format!(" kelly {k:.2}"))
                    .unwrap_or_default(),
                risk_amount
                    .map(|r| format!(" risk ${}", r.round_dp(2)))
                    .unwrap_or_default()
            ),
            AiLogKind::ModelEvaluation {
                model_name,
                score,
                prediction,
            } => format!(
                "model {}{}{}",
                or_dash(model_name),
                score.map(|s| format!(" score {s:.2}")).unwrap_or_default(),
                suffix(" -> ", prediction)
            ),
            AiLogKind::RiskCheck {
                check,
                passed,
                value,
                limit,
            } => format!(
                "risk {} {}{}",
                or_dash(check),
                match passed {
                    Some(true) => "passed",
                    Some(false) => "FAILED",
                    None => "unknown",
                },
                match (value, limit) {
                    (Some(value), Some(limit)) => format!(" ({value:.2}/{limit:.2})"),
                    (Some(value), None) => format!(" ({value:.2})"),
                    _ => String::new(),
                }
            ),
            AiLogKind::TradeDecision {
                action,
                symbol,
                strike,
                confidence,
                ..
            } => format!(
                "trade {}{}{}{}",
                or_dash(action),
                suffix(" ", symbol),
                strike
                    .map(|s| format!(" {}", s.normalize()))
                    .unwrap_or_default(),
                percent(*confidence)
            ),
            AiLogKind::Other { tag } => or_dash(tag).to_string(),
        };

        if self.message.is_empty() {
            detail
        } else {
            format!("{detail}: {}", self.message)
        }
    }
}

impl Decode for AiLogEntry {
    fn decode(raw: &Value) -> Self {
        Self {
            timestamp: decode::opt_timestamp(raw, keys::LOG_TIMESTAMP),
            message: decode::text(raw, keys::MESSAGE),
            kind: AiLogKind::decode_tagged(raw),
        }
    }
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}

fn suffix(prefix: &str, text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{prefix}{text}")
    }
}

/// Confidence as a percentage; values in `0..=1` are treated as fractions
fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v <= 1.0 => format!(" ({:.0}%)", v * 100.0),
        Some(v) => format!(" ({v:.0}%)"),
        None => String::new(),
    }
}
