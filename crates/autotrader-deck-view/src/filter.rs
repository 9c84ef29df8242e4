/*
[INPUT]:  Open-position rows and the viewer's filter criteria
[OUTPUT]: The matching rows, in their original order
[POS]:    View layer - pure, composable position filter
[UPDATE]: When a filter criterion or searchable field is added
*/

use serde::{Deserialize, Serialize};

use crate::model::Trade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    #[default]
    All,
    /// Explicit open status or the legacy "filled"
    Open,
    Closed,
}

impl StatusBucket {
    fn admits(self, trade: &Trade) -> bool {
        match self {
            StatusBucket::All => true,
            StatusBucket::Open => trade.status.is_open(),
            StatusBucket::Closed => trade.status.is_closed(),
        }
    }
}

/// Three AND-combined criteria. The default filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TradeFilter {
    pub status: StatusBucket,
    /// Exact strategy name
    pub strategy: Option<String>,
    /// Case-insensitive substring over symbol, strategy, action and strike
    pub search: String,
}

impl TradeFilter {
    pub fn with_status(mut self, status: StatusBucket) -> Self {
        self.status = status;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn matches(&self, trade: &Trade) -> bool {
        self.status.admits(trade) && self.matches_strategy(trade) && self.matches_search(trade)
    }

    /// Matching rows, cloned; `trades` is not touched
    pub fn apply(&self, trades: &[Trade]) -> Vec<Trade> {
        trades
            .iter()
            .filter(|trade| self.matches(trade))
            .cloned()
            .collect()
    }

    fn matches_strategy(&self, trade: &Trade) -> bool {
        match self.strategy.as_deref() {
            None | Some("") => true,
            Some(strategy) => trade.strategy == strategy,
        }
    }

    fn matches_search(&self, trade: &Trade) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let strike = trade.strike.normalize().to_string();
        [
            trade.symbol.as_str(),
            trade.strategy.as_str(),
            trade.action.as_str(),
            strike.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
