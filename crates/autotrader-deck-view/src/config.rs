/*
[INPUT]:  YAML configuration file (optional)
[OUTPUT]: Parsed dashboard configuration with every field defaulted
[POS]:    Configuration layer - session setup
[UPDATE]: When adding new configuration options
*/

use autotrader_deck_adapter::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_PUSH_URL, HistoryWindow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for the dashboard session
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeckConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Backend endpoints and transport limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Push channel WebSocket URL
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Bearer token, sent on every request when set
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// Bounded windows and counts for the pull endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Equity-curve window: 7, 30 or 90 days
    #[serde(default)]
    pub history_window: HistoryWindow,
    #[serde(default = "default_list_limit")]
    pub trades_limit: u32,
    #[serde(default = "default_list_limit")]
    pub decisions_limit: u32,
    #[serde(default = "default_closed_trades_limit")]
    pub closed_trades_limit: u32,
    #[serde(default = "default_predictions_limit")]
    pub predictions_limit: u32,
    #[serde(default = "default_backtest_days")]
    pub backtest_days: u32,
    #[serde(default = "default_study_days")]
    pub signal_days: u32,
    #[serde(default = "default_study_days")]
    pub risk_history_days: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            history_window: HistoryWindow::default(),
            trades_limit: default_list_limit(),
            decisions_limit: default_list_limit(),
            closed_trades_limit: default_closed_trades_limit(),
            predictions_limit: default_predictions_limit(),
            backtest_days: default_backtest_days(),
            signal_days: default_study_days(),
            risk_history_days: default_study_days(),
        }
    }
}

/// Constants used by derived metrics
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Option contract multiplier for per-row unrealized P&L
    #[serde(default = "default_contract_multiplier")]
    pub contract_multiplier: Decimal,
    /// Baseline paired with cumulative P&L when the curve is synthesized
    #[serde(default = "default_baseline_account_size")]
    pub baseline_account_size: Decimal,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: default_contract_multiplier(),
            baseline_account_size: default_baseline_account_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Scan cadence the countdown aligns to
    #[serde(default = "default_scan_interval_minutes")]
    pub scan_interval_minutes: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            scan_interval_minutes: default_scan_interval_minutes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_ws_url() -> String {
    DEFAULT_PUSH_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_list_limit() -> u32 {
    50
}

fn default_closed_trades_limit() -> u32 {
    100
}

fn default_predictions_limit() -> u32 {
    20
}

fn default_backtest_days() -> u32 {
    90
}

fn default_study_days() -> u32 {
    30
}

fn default_contract_multiplier() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_baseline_account_size() -> Decimal {
    Decimal::from(100_000)
}

fn default_scan_interval_minutes() -> u32 {
    5
}

fn default_export_directory() -> PathBuf {
    PathBuf::from(".")
}

impl DeckConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }
}
