/*
[INPUT]:  Scripted backend answers and default configuration
[OUTPUT]: Shared fixtures for session and orchestrator tests
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for autotrader-deck-view tests

use std::sync::Arc;
use std::time::Duration;

use autotrader_deck_adapter::MockBackend;
use autotrader_deck_view::{DashboardSession, DeckConfig};
use serde_json::{Value, json};

/// Upper bound for anything a test waits on
#[allow(dead_code)]
pub const WAIT: Duration = Duration::from_secs(5);

#[allow(dead_code)]
pub fn status_body(active: bool) -> Value {
    json!({ "is_active": active, "mode": "paper", "status": "scanning" })
}

#[allow(dead_code)]
pub fn performance_body(total_pnl: f64) -> Value {
    json!({ "total_pnl": total_pnl, "win_rate": 62.5, "total_trades": 8 })
}

#[allow(dead_code)]
pub fn positions_body() -> Value {
    json!({ "trades": [
        { "id": "t1", "symbol": "SPY", "strike": 595, "strategy": "Iron Condor", "status": "OPEN", "entry_price": 2.5, "quantity": 1 },
        { "id": "t2", "symbol": "SPY", "strike": 600, "strategy": "Bull Put", "status": "filled", "entry_price": 1.2, "quantity": 2 }
    ]})
}

#[allow(dead_code)]
pub fn strategies_body() -> Value {
    json!({ "strategies": [
        { "id": "ic", "name": "Iron Condor", "status": "active", "win_rate": 71.0 },
        { "id": "bp", "name": "Bull Put", "status": "active", "win_rate": 55.0 }
    ]})
}

/// Backend answering every main-batch read the dashboard renders first
#[allow(dead_code)]
pub fn scripted_backend() -> MockBackend {
    let backend = MockBackend::new();
    backend
        .respond("status", status_body(true))
        .respond("performance", performance_body(120.0))
        .respond("trades", positions_body())
        .respond("strategies", strategies_body())
        .respond("strategy_config", json!({ "Iron Condor": true, "Bull Put": false }))
        .respond("activity_log", json!({ "logs": [{ "date": "2024-11-04", "action": "SCAN", "pnl": 40 }] }));
    backend
}

#[allow(dead_code)]
pub fn session_for(backend: Arc<MockBackend>) -> DashboardSession {
    DashboardSession::new(backend, &DeckConfig::default())
}
