/*
[INPUT]:  Raw strategy list, enabled-config map and leaderboard records
[OUTPUT]: Strategy rows with merged enabled state, leaderboard entries
[POS]:    Model layer - strategy catalogue and competition standings
[UPDATE]: When the config map shape or strategy status vocabulary changes
*/

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::Decode;
use crate::decode::{self, keys};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Active,
    #[default]
    Enabled,
    Paused,
    Other(String),
}

impl StrategyStatus {
    fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "enabled" => StrategyStatus::Enabled,
            "active" | "running" => StrategyStatus::Active,
            "paused" | "disabled" | "inactive" => StrategyStatus::Paused,
            _ => StrategyStatus::Other(text.trim().to_string()),
        }
    }

    /// Fold the config map's flag into the backend-reported status
    pub fn merged(self, enabled: Option<bool>) -> Self {
        match enabled {
            Some(false) => StrategyStatus::Paused,
            Some(true) => match self {
                StrategyStatus::Active => StrategyStatus::Active,
                _ => StrategyStatus::Enabled,
            },
            None => self,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StrategyStatus::Active => "active",
            StrategyStatus::Enabled => "enabled",
            StrategyStatus::Paused => "paused",
            StrategyStatus::Other(text) => text,
        }
    }
}

/// Enabled flag per strategy, keyed by strategy name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StrategyConfigMap {
    enabled: HashMap<String, bool>,
}

impl StrategyConfigMap {
    pub fn enabled(&self, name: &str) -> Option<bool> {
        self.enabled.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.enabled.insert(name.into(), enabled);
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl Decode for StrategyConfigMap {
    /// Accepts `{name: bool}`, `{name: {enabled: bool}}` or `[{name, enabled}]`,
    /// bare or wrapped under one of the config keys.
    fn decode(raw: &Value) -> Self {
        let body = keys::STRATEGY_CONFIG_MAP
            .iter()
            .filter_map(|key| raw.get(*key))
            .find(|value| value.is_object() || value.is_array())
            .unwrap_or(raw);

        let mut map = Self::default();
        match body {
            Value::Object(entries) => {
                for (name, value) in entries {
                    let enabled = match value {
                        Value::Object(_) => decode::opt_flag(value, keys::ENABLED),
                        scalar => decode::flag_value(scalar),
                    };
                    if let Some(enabled) = enabled {
                        map.set(name.clone(), enabled);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let (Some(name), Some(enabled)) = (
                        decode::opt_text(item, keys::STRATEGY_ID),
                        decode::opt_flag(item, keys::ENABLED),
                    ) {
                        map.set(name, enabled);
                    }
                }
            }
            _ => {}
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub status: StrategyStatus,
    pub win_rate: f64,
    pub total_trades: u64,
    pub total_pnl: Decimal,
    pub last_trade_date: String,
}

impl Strategy {
    /// Decode one row and merge the enabled flag for its name (or id)
    pub fn decode_with_config(raw: &Value, config: &StrategyConfigMap) -> Self {
        Self::decode(raw).with_config(config)
    }

    pub fn with_config(mut self, config: &StrategyConfigMap) -> Self {
        let enabled = config.enabled(&self.name).or_else(|| config.enabled(&self.id));
        self.status = self.status.merged(enabled);
        self
    }

    pub fn decode_list_with_config(raw: &Value, config: &StrategyConfigMap) -> Vec<Self> {
        decode::list(raw, keys::STRATEGY_LIST)
            .iter()
            .map(|item| Self::decode_with_config(item, config))
            .collect()
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.status, StrategyStatus::Paused)
    }
}

impl Decode for Strategy {
    fn decode(raw: &Value) -> Self {
        let name = decode::text(raw, keys::STRATEGY_NAME);
        Self {
            id: decode::opt_text(raw, keys::STRATEGY_ID).unwrap_or_else(|| name.clone()),
            status: StrategyStatus::from_text(&decode::text(raw, keys::STRATEGY_STATUS)),
            win_rate: decode::number(raw, keys::WIN_RATE),
            total_trades: decode::count(raw, keys::STRATEGY_TRADES),
            total_pnl: decode::decimal(raw, keys::STRATEGY_PNL),
            last_trade_date: decode::text(raw, keys::LAST_TRADE_DATE),
            name,
        }
    }
}

/// Strategy-competition standing. Aggregates are taken as reported.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub name: String,
    pub win_rate: f64,
    pub total_trades: u64,
    pub total_pnl: Decimal,
    pub sharpe_ratio: f64,
}

impl Decode for LeaderboardEntry {
    fn decode(raw: &Value) -> Self {
        Self {
            rank: decode::count(raw, keys::RANK),
            name: decode::text(raw, keys::STRATEGY_NAME),
            win_rate: decode::number(raw, keys::WIN_RATE),
            total_trades: decode::count(raw, keys::STRATEGY_TRADES),
            total_pnl: decode::decimal(raw, keys::STRATEGY_PNL),
            sharpe_ratio: decode::number(raw, keys::SHARPE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_map_accepts_three_shapes() {
        let flat = StrategyConfigMap::decode(&json!({ "Iron Condor": false, "Bull Put": true }));
        let nested = StrategyConfigMap::decode(&json!({ "config": {
            "Iron Condor": { "enabled": false },
            "Bull Put": { "enabled": true }
        }}));
        let listed = StrategyConfigMap::decode(&json!([
            { "name": "Iron Condor", "enabled": false },
            { "name": "Bull Put", "is_enabled": "yes" }
        ]));
        assert_eq!(flat, nested);
        assert_eq!(flat, listed);
        assert_eq!(flat.enabled("Iron Condor"), Some(false));
        assert_eq!(flat.enabled("Unknown"), None);
    }

    #[test]
    fn disabled_config_forces_paused() {
        let mut config = StrategyConfigMap::default();
        config.set("Iron Condor", false);
        let strategy =
            Strategy::decode_with_config(&json!({ "name": "Iron Condor", "status": "active" }), &config);
        assert_eq!(strategy.status, StrategyStatus::Paused);
        assert!(!strategy.is_enabled());
    }

    #[test]
    fn enabled_config_keeps_active_status() {
        let mut config = StrategyConfigMap::default();
        config.set("Iron Condor", true);
        let active =
            Strategy::decode_with_config(&json!({ "name": "Iron Condor", "status": "active" }), &config);
        let paused =
            Strategy::decode_with_config(&json!({ "name": "Iron Condor", "status": "paused" }), &config);
        assert_eq!(active.status, StrategyStatus::Active);
        assert_eq!(paused.status, StrategyStatus::Enabled);
    }

    #[test]
    fn missing_config_leaves_backend_status() {
        let strategy = Strategy::decode_with_config(
            &json!({ "name": "Bull Put", "status": "paused" }),
            &StrategyConfigMap::default(),
        );
        assert_eq!(strategy.status, StrategyStatus::Paused);
        assert_eq!(strategy.id, "Bull Put");
    }

    #[test]
    fn leaderboard_reads_legacy_spellings() {
        let entry = LeaderboardEntry::decode(&json!({
            "position": 2, "strategy_name": "Iron Condor", "pnl": "1,250.00", "trade_count": 14
        }));
        assert_eq!(entry.rank, 2);
        assert_eq!(entry.name, "Iron Condor");
        assert_eq!(entry.total_pnl, Decimal::from(1250));
        assert_eq!(entry.total_trades, 14);
    }
}
