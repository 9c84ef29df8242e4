/*
[INPUT]:  Operator actions issued from the dashboard
[OUTPUT]: Typed action descriptors and request bodies
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When adding a mutating call or changing a request body
*/

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleStrategyRequest {
    pub enabled: bool,
}

/// Mutating call against the trading backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraderAction {
    ToggleStrategy { id: String, enabled: bool },
    ExecuteCycle,
    Start,
    Stop,
}

impl TraderAction {
    pub fn name(&self) -> &'static str {
        match self {
            TraderAction::ToggleStrategy { .. } => "toggle_strategy",
            TraderAction::ExecuteCycle => "execute_cycle",
            TraderAction::Start => "start",
            TraderAction::Stop => "stop",
        }
    }

    pub fn path(&self) -> String {
        match self {
            TraderAction::ToggleStrategy { id, .. } => {
                format!("/api/trader/strategies/{id}/toggle")
            }
            TraderAction::ExecuteCycle => "/api/trader/execute".to_string(),
            TraderAction::Start => "/api/trader/start".to_string(),
            TraderAction::Stop => "/api/trader/stop".to_string(),
        }
    }

    /// JSON body, for actions that carry one
    pub fn body(&self) -> Option<ToggleStrategyRequest> {
        match self {
            TraderAction::ToggleStrategy { enabled, .. } => Some(ToggleStrategyRequest {
                enabled: *enabled,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for TraderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
