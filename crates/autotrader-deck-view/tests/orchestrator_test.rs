/*
[INPUT]:  Scripted backend answers, batch tickets from the state store
[OUTPUT]: Test results for pull isolation and generation staleness
[POS]:    Integration tests - fetch orchestrator against the state store
[UPDATE]: When batch grouping or apply rules change
*/

mod common;

use autotrader_deck_adapter::{ApiEnvelope, MockBackend};
use autotrader_deck_view::model::Performance;
use autotrader_deck_view::{BatchKind, DashboardState, FetchPlan, Slice, SliceUpdate, run_batch};
use common::{scripted_backend, status_body};
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn failed_endpoints_leave_other_slices_applied() {
    let backend = scripted_backend();
    backend
        .fail("performance", "connection reset by peer")
        .respond_envelope("strategies", ApiEnvelope::failed("database is locked"));
    let mut state = DashboardState::new();

    let ticket = state.begin_batch(BatchKind::Main);
    let batch = run_batch(&backend, &FetchPlan::default(), ticket).await;
    let report = state.apply_pull_batch(batch);

    assert!(!report.discarded);
    assert!(report.applied.contains(&Slice::Status));
    assert!(report.applied.contains(&Slice::Positions));
    assert!(!report.applied.contains(&Slice::Performance));
    assert!(!report.applied.contains(&Slice::Strategies));
    assert!(
        report
            .unavailable
            .iter()
            .any(|(endpoint, reason)| *endpoint == "strategies" && reason == "database is locked")
    );
    assert!(state.status.get().is_active);
    assert_eq!(state.positions.get().len(), 2);
    assert!(!state.performance.is_loaded());
}

#[tokio::test]
async fn failure_keeps_previous_value_instead_of_clearing() {
    let backend = scripted_backend();
    let mut state = DashboardState::new();

    let first = state.begin_batch(BatchKind::Main);
    state.apply_pull_batch(run_batch(&backend, &FetchPlan::default(), first).await);
    assert_eq!(state.performance.get().total_pnl, Decimal::from(120));

    backend.fail("performance", "timeout");
    let second = state.begin_batch(BatchKind::Main);
    state.apply_pull_batch(run_batch(&backend, &FetchPlan::default(), second).await);

    assert_eq!(state.performance.get().total_pnl, Decimal::from(120));
}

#[tokio::test]
async fn batch_from_older_generation_is_discarded() {
    let backend = MockBackend::new();
    let mut state = DashboardState::new();

    backend.respond("status", status_body(true));
    let old_ticket = state.begin_batch(BatchKind::Main);
    let old_batch = run_batch(&backend, &FetchPlan::default(), old_ticket).await;

    backend.respond("status", status_body(false));
    let new_ticket = state.begin_batch(BatchKind::Main);
    let new_batch = run_batch(&backend, &FetchPlan::default(), new_ticket).await;

    let applied = state.apply_pull_batch(new_batch);
    let stale = state.apply_pull_batch(old_batch);

    assert!(!applied.discarded);
    assert!(stale.discarded);
    assert_eq!(stale.generation, 1);
    assert_eq!(state.latest_generation(), 2);
    assert!(!state.status.get().is_active);
}

#[tokio::test]
async fn on_demand_batch_joins_current_generation() {
    let backend = MockBackend::new();
    backend.respond("market_regime", json!({ "regime": "NEGATIVE_GAMMA", "confidence": 0.8 }));
    let mut state = DashboardState::new();

    state.begin_batch(BatchKind::Main);
    let ticket = state.begin_batch(BatchKind::OnDemand);
    assert_eq!(ticket.generation, 1);

    let report = state.apply_pull_batch(run_batch(&backend, &FetchPlan::default(), ticket).await);
    assert_eq!(report.applied, vec![Slice::MarketRegime]);
    assert_eq!(report.unavailable.len(), 3);
}

#[tokio::test]
async fn push_during_pull_wins_and_pulled_slices_still_land() {
    let backend = scripted_backend();
    let mut state = DashboardState::new();

    let ticket = state.begin_batch(BatchKind::Main);
    let batch = run_batch(&backend, &FetchPlan::default(), ticket).await;

    let pushed = SliceUpdate::Performance(Performance {
        total_pnl: Decimal::from(999),
        ..Performance::default()
    });
    state.apply_push(vec![pushed]);
    let report = state.apply_pull_batch(batch);

    assert_eq!(report.superseded, vec![Slice::Performance]);
    assert_eq!(state.performance.get().total_pnl, Decimal::from(999));
    assert_eq!(state.positions.get().len(), 2);
}
