/*
[INPUT]:  A backend handle, fetch limits and a batch ticket
[OUTPUT]: PullBatch holding one isolated outcome per endpoint
[POS]:    Fetch layer - concurrent fan-out/fan-in of read endpoints
[UPDATE]: When an endpoint joins or leaves a batch group
*/

use autotrader_deck_adapter::{DeckBackend, Endpoint, HistoryWindow};
use futures_util::future::join_all;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::FetchConfig;

/// Which group a pull batch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Everything the dashboard renders on load
    Main,
    /// Volatility-hedge pair, run after the main batch lands
    Secondary,
    /// Market-context group, only when asked for
    OnDemand,
}

impl BatchKind {
    pub fn name(self) -> &'static str {
        match self {
            BatchKind::Main => "main",
            BatchKind::Secondary => "secondary",
            BatchKind::OnDemand => "on_demand",
        }
    }
}

/// Issued by the state store when a batch starts.
///
/// `started_seq` is the store's write sequence at issue time; pushes written
/// after it are newer than anything this batch can bring back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    pub kind: BatchKind,
    pub generation: u64,
    pub started_seq: u64,
}

/// Result of one endpoint: its `data` on a positive envelope, otherwise the
/// reason it is unavailable
#[derive(Debug, Clone, PartialEq)]
pub struct PullOutcome {
    pub endpoint: Endpoint,
    pub result: Result<Value, String>,
}

impl PullOutcome {
    pub fn is_available(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullBatch {
    pub ticket: BatchTicket,
    pub outcomes: Vec<PullOutcome>,
}

impl PullBatch {
    pub fn unavailable(&self) -> impl Iterator<Item = &PullOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_available())
    }
}

/// Endpoint groups with their bounded parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub window: HistoryWindow,
    pub trades_limit: u32,
    pub decisions_limit: u32,
    pub closed_trades_limit: u32,
    pub predictions_limit: u32,
    pub backtest_days: u32,
    pub signal_days: u32,
    pub risk_history_days: u32,
}

impl From<&FetchConfig> for FetchPlan {
    fn from(config: &FetchConfig) -> Self {
        Self {
            window: config.history_window,
            trades_limit: config.trades_limit,
            decisions_limit: config.decisions_limit,
            closed_trades_limit: config.closed_trades_limit,
            predictions_limit: config.predictions_limit,
            backtest_days: config.backtest_days,
            signal_days: config.signal_days,
            risk_history_days: config.risk_history_days,
        }
    }
}

impl Default for FetchPlan {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl FetchPlan {
    pub fn with_window(mut self, window: HistoryWindow) -> Self {
        self.window = window;
        self
    }

    pub fn endpoints(&self, kind: BatchKind) -> Vec<Endpoint> {
        match kind {
            BatchKind::Main => self.main_endpoints(),
            BatchKind::Secondary => vec![Endpoint::VixHedgeSignal, Endpoint::VixCurrent],
            BatchKind::OnDemand => vec![
                Endpoint::UnifiedPortfolio,
                Endpoint::MarketRegime,
                Endpoint::VolSurface,
                Endpoint::BackgroundJobs,
            ],
        }
    }

    fn main_endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::Status,
            Endpoint::Performance,
            Endpoint::Trades {
                limit: self.trades_limit,
            },
            Endpoint::Strategies,
            Endpoint::StrategyConfig,
            Endpoint::Decisions {
                limit: self.decisions_limit,
            },
            Endpoint::Leaderboard,
            Endpoint::PatternBacktests {
                days: self.backtest_days,
            },
            Endpoint::LiberationAccuracy {
                days: self.signal_days,
            },
            Endpoint::FalseFloor {
                days: self.signal_days,
            },
            Endpoint::RiskStatus,
            Endpoint::ActivityLog,
            Endpoint::EquityCurve {
                window: self.window,
            },
            Endpoint::ClosedTrades {
                limit: self.closed_trades_limit,
            },
            Endpoint::MlStatus,
            Endpoint::MlPredictions {
                limit: self.predictions_limit,
            },
            Endpoint::RiskHistory {
                days: self.risk_history_days,
            },
            Endpoint::Diagnostics,
        ]
    }
}

/// Fetch every endpoint of the ticket's group concurrently.
///
/// Each endpoint is isolated: a transport error or a negative envelope turns
/// into an unavailable outcome for that endpoint only.
pub async fn run_batch<B>(backend: &B, plan: &FetchPlan, ticket: BatchTicket) -> PullBatch
where
    B: DeckBackend + ?Sized,
{
    let endpoints = plan.endpoints(ticket.kind);
    let batch_start = Instant::now();
    debug!(
        batch = ticket.kind.name(),
        generation = ticket.generation,
        endpoints = endpoints.len(),
        "pull batch started"
    );

    let outcomes = join_all(
        endpoints
            .into_iter()
            .map(|endpoint| fetch_isolated(backend, endpoint)),
    )
    .await;

    let failed = outcomes.iter().filter(|outcome| !outcome.is_available()).count();
    info!(
        batch = ticket.kind.name(),
        generation = ticket.generation,
        ok = outcomes.len() - failed,
        failed,
        elapsed_ms = batch_start.elapsed().as_millis() as u64,
        "pull batch finished"
    );

    PullBatch { ticket, outcomes }
}

async fn fetch_isolated<B>(backend: &B, endpoint: Endpoint) -> PullOutcome
where
    B: DeckBackend + ?Sized,
{
    let result = match backend.fetch(endpoint).await {
        Ok(envelope) if envelope.success => Ok(envelope.data),
        Ok(envelope) => {
            let reason = envelope
                .reason()
                .unwrap_or("response without success flag")
                .to_string();
            warn!(endpoint = %endpoint, reason = %reason, "endpoint unavailable");
            Err(reason)
        }
        Err(err) => {
            if err.is_transient() {
                warn!(endpoint = %endpoint, error = %err, "endpoint unavailable");
            } else {
                error!(endpoint = %endpoint, error = %err, "endpoint failed");
            }
            Err(err.to_string())
        }
    };
    PullOutcome { endpoint, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotrader_deck_adapter::{ApiEnvelope, MockBackend};
    use serde_json::json;

    fn ticket(kind: BatchKind) -> BatchTicket {
        BatchTicket {
            kind,
            generation: 1,
            started_seq: 0,
        }
    }

    #[test]
    fn batch_groups_have_expected_sizes() {
        let plan = FetchPlan::default();
        assert_eq!(plan.endpoints(BatchKind::Main).len(), 18);
        assert_eq!(plan.endpoints(BatchKind::Secondary).len(), 2);
        assert_eq!(plan.endpoints(BatchKind::OnDemand).len(), 4);
    }

    #[test]
    fn window_only_changes_the_equity_curve() {
        let plan = FetchPlan::default().with_window(HistoryWindow::Week);
        assert!(
            plan.endpoints(BatchKind::Main)
                .contains(&Endpoint::EquityCurve { window: HistoryWindow::Week })
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_hide_the_others() {
        let backend = MockBackend::new();
        backend
            .respond("vix_hedge_signal", json!({ "signal": "HEDGE" }))
            .fail("vix_current", "connection reset");

        let batch = run_batch(&backend, &FetchPlan::default(), ticket(BatchKind::Secondary)).await;

        assert_eq!(batch.outcomes.len(), 2);
        assert_eq!(batch.outcomes[0].result, Ok(json!({ "signal": "HEDGE" })));
        assert!(batch.outcomes[1].result.is_err());
    }

    #[tokio::test]
    async fn negative_envelope_is_unavailable_with_reason() {
        let backend = MockBackend::new();
        backend
            .respond_envelope("vix_hedge_signal", ApiEnvelope::failed("VIX feed down"))
            .respond("vix_current", json!({ "vix": 17.2 }));

        let batch = run_batch(&backend, &FetchPlan::default(), ticket(BatchKind::Secondary)).await;
        let unavailable: Vec<_> = batch.unavailable().collect();

        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].endpoint, Endpoint::VixHedgeSignal);
        assert_eq!(unavailable[0].result, Err("VIX feed down".to_string()));
    }

    #[tokio::test]
    async fn every_endpoint_is_called_once() {
        let backend = MockBackend::new();
        run_batch(&backend, &FetchPlan::default(), ticket(BatchKind::OnDemand)).await;
        assert_eq!(
            backend.calls(),
            vec!["unified_portfolio", "market_regime", "vol_surface", "background_jobs"]
        );
    }
}
