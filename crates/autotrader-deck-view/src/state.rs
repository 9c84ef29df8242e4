/*
[INPUT]:  Pull batches from the orchestrator, slice updates from the push channel
[OUTPUT]: One consistent, versioned DashboardState
[POS]:    Reconciliation layer - single owner of every state slice
[UPDATE]: When a slice is added or its update source changes
*/

use autotrader_deck_adapter::{ConnectionState, Endpoint};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt::Write as _;
use tracing::{debug, trace};

use crate::decode::keys;
use crate::model::{
    AiLogEntry, BacktestResult, BackgroundJob, ClosedTrade, Decode, Diagnostics, EquityCurvePoint,
    FalseFloorReport, LeaderboardEntry, MlModelStatus, MlPrediction, Performance, RegimeSnapshot,
    RiskMetricPoint, RiskStatus, SignalAccuracy, Strategy, StrategyConfigMap, Trade, TradeLogEntry,
    TraderStatus, TradingMode, UnifiedPortfolio, VixData, VixSignal, VolSurfaceSignal,
};
use crate::orchestrator::{BatchKind, BatchTicket, PullBatch};

/// Which channels may write a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceSource {
    /// Last write wins between push and pull
    PushOrPull,
    PullOnly,
}

/// Independently updatable partition of the view-model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Status,
    Performance,
    Positions,
    ActivityLog,
    Decisions,
    Strategies,
    StrategyConfig,
    Leaderboard,
    PatternBacktests,
    LiberationAccuracy,
    FalseFloor,
    RiskStatus,
    EquityCurve,
    ClosedTrades,
    MlStatus,
    MlPredictions,
    RiskHistory,
    Diagnostics,
    VixSignal,
    VixData,
    UnifiedPortfolio,
    MarketRegime,
    VolSurface,
    BackgroundJobs,
}

impl Slice {
    pub fn source(self) -> SliceSource {
        match self {
            Slice::Status | Slice::Performance | Slice::Positions | Slice::ActivityLog => {
                SliceSource::PushOrPull
            }
            _ => SliceSource::PullOnly,
        }
    }
}

/// Decoded value bound for exactly one slice
#[derive(Debug, Clone, PartialEq)]
pub enum SliceUpdate {
    Status(TraderStatus),
    Performance(Performance),
    Positions(Vec<Trade>),
    ActivityLog(Vec<TradeLogEntry>),
    Decisions(Vec<AiLogEntry>),
    Strategies(Vec<Strategy>),
    StrategyConfig(StrategyConfigMap),
    Leaderboard(Vec<LeaderboardEntry>),
    PatternBacktests(Vec<BacktestResult>),
    LiberationAccuracy(SignalAccuracy),
    FalseFloor(FalseFloorReport),
    RiskStatus(RiskStatus),
    EquityCurve(Vec<EquityCurvePoint>),
    ClosedTrades(Vec<ClosedTrade>),
    MlStatus(MlModelStatus),
    MlPredictions(Vec<MlPrediction>),
    RiskHistory(Vec<RiskMetricPoint>),
    Diagnostics(Diagnostics),
    VixSignal(VixSignal),
    VixData(VixData),
    UnifiedPortfolio(UnifiedPortfolio),
    MarketRegime(RegimeSnapshot),
    VolSurface(VolSurfaceSignal),
    BackgroundJobs(Vec<BackgroundJob>),
}

impl SliceUpdate {
    /// Decode an endpoint's `data` into the update for its slice
    pub fn from_pull(endpoint: Endpoint, data: &Value) -> Self {
        match endpoint {
            Endpoint::Status => SliceUpdate::Status(TraderStatus::decode(data)),
            Endpoint::Performance => SliceUpdate::Performance(Performance::decode(data)),
            Endpoint::Trades { .. } => {
                SliceUpdate::Positions(Trade::decode_list(data, keys::TRADE_LIST))
            }
            Endpoint::Strategies => {
                SliceUpdate::Strategies(Strategy::decode_list(data, keys::STRATEGY_LIST))
            }
            Endpoint::StrategyConfig => {
                SliceUpdate::StrategyConfig(StrategyConfigMap::decode(data))
            }
            Endpoint::Decisions { .. } => {
                SliceUpdate::Decisions(AiLogEntry::decode_list(data, keys::DECISION_LIST))
            }
            Endpoint::Leaderboard => SliceUpdate::Leaderboard(LeaderboardEntry::decode_list(
                data,
                keys::LEADERBOARD_LIST,
            )),
            Endpoint::PatternBacktests { .. } => SliceUpdate::PatternBacktests(
                BacktestResult::decode_list(data, keys::BACKTEST_LIST),
            ),
            Endpoint::LiberationAccuracy { .. } => {
                SliceUpdate::LiberationAccuracy(SignalAccuracy::decode(data))
            }
            Endpoint::FalseFloor { .. } => SliceUpdate::FalseFloor(FalseFloorReport::decode(data)),
            Endpoint::RiskStatus => SliceUpdate::RiskStatus(RiskStatus::decode(data)),
            Endpoint::ActivityLog => {
                SliceUpdate::ActivityLog(TradeLogEntry::decode_list(data, keys::LOG_LIST))
            }
            Endpoint::EquityCurve { .. } => {
                SliceUpdate::EquityCurve(EquityCurvePoint::decode_list(data, keys::CURVE_LIST))
            }
            Endpoint::ClosedTrades { .. } => {
                SliceUpdate::ClosedTrades(ClosedTrade::decode_list(data, keys::CLOSED_TRADE_LIST))
            }
            Endpoint::MlStatus => SliceUpdate::MlStatus(MlModelStatus::decode(data)),
            Endpoint::MlPredictions { .. } => {
                SliceUpdate::MlPredictions(MlPrediction::decode_list(data, keys::PREDICTION_LIST))
            }
            Endpoint::RiskHistory { .. } => SliceUpdate::RiskHistory(RiskMetricPoint::decode_list(
                data,
                keys::RISK_HISTORY_LIST,
            )),
            Endpoint::Diagnostics => SliceUpdate::Diagnostics(Diagnostics::decode(data)),
            Endpoint::VixHedgeSignal => SliceUpdate::VixSignal(VixSignal::decode(data)),
            Endpoint::VixCurrent => SliceUpdate::VixData(VixData::decode(data)),
            Endpoint::UnifiedPortfolio => {
                SliceUpdate::UnifiedPortfolio(UnifiedPortfolio::decode(data))
            }
            Endpoint::MarketRegime => SliceUpdate::MarketRegime(RegimeSnapshot::decode(data)),
            Endpoint::VolSurface => SliceUpdate::VolSurface(VolSurfaceSignal::decode(data)),
            Endpoint::BackgroundJobs => {
                SliceUpdate::BackgroundJobs(BackgroundJob::decode_list(data, keys::JOB_LIST))
            }
        }
    }

    pub fn slice(&self) -> Slice {
        match self {
            SliceUpdate::Status(_) => Slice::Status,
            SliceUpdate::Performance(_) => Slice::Performance,
            SliceUpdate::Positions(_) => Slice::Positions,
            SliceUpdate::ActivityLog(_) => Slice::ActivityLog,
            SliceUpdate::Decisions(_) => Slice::Decisions,
            SliceUpdate::Strategies(_) => Slice::Strategies,
            SliceUpdate::StrategyConfig(_) => Slice::StrategyConfig,
            SliceUpdate::Leaderboard(_) => Slice::Leaderboard,
            SliceUpdate::PatternBacktests(_) => Slice::PatternBacktests,
            SliceUpdate::LiberationAccuracy(_) => Slice::LiberationAccuracy,
            SliceUpdate::FalseFloor(_) => Slice::FalseFloor,
            SliceUpdate::RiskStatus(_) => Slice::RiskStatus,
            SliceUpdate::EquityCurve(_) => Slice::EquityCurve,
            SliceUpdate::ClosedTrades(_) => Slice::ClosedTrades,
            SliceUpdate::MlStatus(_) => Slice::MlStatus,
            SliceUpdate::MlPredictions(_) => Slice::MlPredictions,
            SliceUpdate::RiskHistory(_) => Slice::RiskHistory,
            SliceUpdate::Diagnostics(_) => Slice::Diagnostics,
            SliceUpdate::VixSignal(_) => Slice::VixSignal,
            SliceUpdate::VixData(_) => Slice::VixData,
            SliceUpdate::UnifiedPortfolio(_) => Slice::UnifiedPortfolio,
            SliceUpdate::MarketRegime(_) => Slice::MarketRegime,
            SliceUpdate::VolSurface(_) => Slice::VolSurface,
            SliceUpdate::BackgroundJobs(_) => Slice::BackgroundJobs,
        }
    }
}

/// One slice's value plus the sequence numbers of its last writes.
///
/// `version` is the store sequence of the last write of any origin and is
/// what derived-value caches key on. `0` means never written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot<T> {
    value: T,
    version: u64,
    fresh_seq: u64,
}

impl<T> Slot<T> {
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_loaded(&self) -> bool {
        self.version > 0
    }

    fn write(&mut self, value: T, seq: u64, fresh: bool) {
        self.value = value;
        self.version = seq;
        if fresh {
            self.fresh_seq = seq;
        }
    }
}

/// Where a write came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Pull { started_seq: u64 },
    /// Push message or acknowledged local action
    Fresh,
}

/// What applying a pull batch did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub generation: u64,
    /// Whole batch dropped because a newer main batch has started
    pub discarded: bool,
    pub applied: Vec<Slice>,
    /// Push-or-pull slices skipped because a push landed after the batch started
    pub superseded: Vec<Slice>,
    /// Endpoints left stale, with the reason
    pub unavailable: Vec<(&'static str, String)>,
}

/// The whole view-model for one session
#[derive(Debug, Clone)]
pub struct DashboardState {
    seq: u64,
    latest_generation: u64,
    pub status: Slot<TraderStatus>,
    pub performance: Slot<Performance>,
    pub positions: Slot<Vec<Trade>>,
    pub activity_log: Slot<Vec<TradeLogEntry>>,
    pub decisions: Slot<Vec<AiLogEntry>>,
    pub strategies: Slot<Vec<Strategy>>,
    pub strategy_config: Slot<StrategyConfigMap>,
    pub leaderboard: Slot<Vec<LeaderboardEntry>>,
    pub pattern_backtests: Slot<Vec<BacktestResult>>,
    pub liberation_accuracy: Slot<SignalAccuracy>,
    pub false_floor: Slot<FalseFloorReport>,
    pub risk_status: Slot<RiskStatus>,
    pub equity_curve: Slot<Vec<EquityCurvePoint>>,
    pub closed_trades: Slot<Vec<ClosedTrade>>,
    pub ml_status: Slot<MlModelStatus>,
    pub ml_predictions: Slot<Vec<MlPrediction>>,
    pub risk_history: Slot<Vec<RiskMetricPoint>>,
    pub diagnostics: Slot<Diagnostics>,
    pub vix_signal: Slot<VixSignal>,
    pub vix_data: Slot<VixData>,
    pub unified_portfolio: Slot<UnifiedPortfolio>,
    pub market_regime: Slot<RegimeSnapshot>,
    pub vol_surface: Slot<VolSurfaceSignal>,
    pub background_jobs: Slot<Vec<BackgroundJob>>,
    pub connection: ConnectionState,
    /// `m:ss` until the next scheduled scan
    pub countdown: String,
    pub last_batch_at: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            seq: 0,
            latest_generation: 0,
            status: Slot::default(),
            performance: Slot::default(),
            positions: Slot::default(),
            activity_log: Slot::default(),
            decisions: Slot::default(),
            strategies: Slot::default(),
            strategy_config: Slot::default(),
            leaderboard: Slot::default(),
            pattern_backtests: Slot::default(),
            liberation_accuracy: Slot::default(),
            false_floor: Slot::default(),
            risk_status: Slot::default(),
            equity_curve: Slot::default(),
            closed_trades: Slot::default(),
            ml_status: Slot::default(),
            ml_predictions: Slot::default(),
            risk_history: Slot::default(),
            diagnostics: Slot::default(),
            vix_signal: Slot::default(),
            vix_data: Slot::default(),
            unified_portfolio: Slot::default(),
            market_regime: Slot::default(),
            vol_surface: Slot::default(),
            background_jobs: Slot::default(),
            connection: ConnectionState::Disconnected,
            countdown: String::new(),
            last_batch_at: None,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Issue a ticket for a batch about to start.
    ///
    /// Only main batches open a new generation; the others join the current one.
    pub fn begin_batch(&mut self, kind: BatchKind) -> BatchTicket {
        if kind == BatchKind::Main {
            self.latest_generation += 1;
        }
        BatchTicket {
            kind,
            generation: self.latest_generation,
            started_seq: self.seq,
        }
    }

    /// Apply every available outcome of a finished batch.
    ///
    /// Unavailable outcomes leave their slice untouched. The config map is
    /// applied before strategy rows so rows merge against the newest map.
    pub fn apply_pull_batch(&mut self, batch: PullBatch) -> ApplyReport {
        let ticket = batch.ticket;
        let mut report = ApplyReport {
            generation: ticket.generation,
            ..ApplyReport::default()
        };

        if ticket.generation < self.latest_generation {
            debug!(
                batch = ticket.kind.name(),
                generation = ticket.generation,
                latest = self.latest_generation,
                "discarding stale pull batch"
            );
            report.discarded = true;
            return report;
        }

        let (config, rest): (Vec<_>, Vec<_>) = batch
            .outcomes
            .into_iter()
            .partition(|outcome| outcome.endpoint == Endpoint::StrategyConfig);

        for outcome in config.into_iter().chain(rest) {
            match outcome.result {
                Ok(data) => {
                    let update = SliceUpdate::from_pull(outcome.endpoint, &data);
                    let slice = update.slice();
                    let origin = Origin::Pull {
                        started_seq: ticket.started_seq,
                    };
                    if self.write(update, origin) {
                        report.applied.push(slice);
                    } else {
                        report.superseded.push(slice);
                    }
                }
                Err(reason) => report.unavailable.push((outcome.endpoint.name(), reason)),
            }
        }

        if ticket.kind == BatchKind::Main {
            self.last_batch_at = Some(Utc::now());
        }
        report
    }

    /// Apply push updates in arrival order. Always wins over in-flight pulls.
    pub fn apply_push(&mut self, updates: Vec<SliceUpdate>) -> Vec<Slice> {
        updates
            .into_iter()
            .map(|update| {
                let slice = update.slice();
                self.write(update, Origin::Fresh);
                slice
            })
            .collect()
    }

    /// Record an acknowledged start or stop
    pub fn set_trader_active(&mut self, active: bool) {
        let mut status = self.status.get().clone();
        status.is_active = active;
        self.write(SliceUpdate::Status(status), Origin::Fresh);
    }

    /// Record an acknowledged strategy toggle. Returns false when no row matches.
    pub fn set_strategy_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let mut rows = self.strategies.get().clone();
        let Some(row) = rows.iter_mut().find(|row| row.id == id || row.name == id) else {
            return false;
        };
        row.status = row.status.clone().merged(Some(enabled));
        let name = row.name.clone();

        let mut config = self.strategy_config.get().clone();
        config.set(name, enabled);
        self.write(SliceUpdate::StrategyConfig(config), Origin::Fresh);
        self.write(SliceUpdate::Strategies(rows), Origin::Fresh);
        true
    }

    fn fresh_seq(&self, slice: Slice) -> u64 {
        match slice {
            Slice::Status => self.status.fresh_seq,
            Slice::Performance => self.performance.fresh_seq,
            Slice::Positions => self.positions.fresh_seq,
            Slice::ActivityLog => self.activity_log.fresh_seq,
            _ => 0,
        }
    }

    /// Single synchronous assignment of one slice. Returns false when skipped.
    fn write(&mut self, update: SliceUpdate, origin: Origin) -> bool {
        let slice = update.slice();
        if let Origin::Pull { started_seq } = origin
            && slice.source() == SliceSource::PushOrPull
            && self.fresh_seq(slice) > started_seq
        {
            trace!(?slice, "pull result older than last push, skipped");
            return false;
        }

        self.seq += 1;
        let seq = self.seq;
        let fresh = origin == Origin::Fresh;
        match update {
            SliceUpdate::Status(value) => self.status.write(value, seq, fresh),
            SliceUpdate::Performance(value) => self.performance.write(value, seq, fresh),
            SliceUpdate::Positions(value) => self.positions.write(value, seq, fresh),
            SliceUpdate::ActivityLog(value) => self.activity_log.write(value, seq, fresh),
            SliceUpdate::Decisions(value) => self.decisions.write(value, seq, fresh),
            SliceUpdate::Strategies(rows) => {
                let rows = if fresh {
                    rows
                } else {
                    let config = self.strategy_config.get();
                    rows.into_iter().map(|row| row.with_config(config)).collect()
                };
                self.strategies.write(rows, seq, fresh)
            }
            SliceUpdate::StrategyConfig(value) => self.strategy_config.write(value, seq, fresh),
            SliceUpdate::Leaderboard(value) => self.leaderboard.write(value, seq, fresh),
            SliceUpdate::PatternBacktests(value) => self.pattern_backtests.write(value, seq, fresh),
            SliceUpdate::LiberationAccuracy(value) => {
                self.liberation_accuracy.write(value, seq, fresh)
            }
            SliceUpdate::FalseFloor(value) => self.false_floor.write(value, seq, fresh),
            SliceUpdate::RiskStatus(value) => self.risk_status.write(value, seq, fresh),
            SliceUpdate::EquityCurve(value) => self.equity_curve.write(value, seq, fresh),
            SliceUpdate::ClosedTrades(value) => self.closed_trades.write(value, seq, fresh),
            SliceUpdate::MlStatus(value) => self.ml_status.write(value, seq, fresh),
            SliceUpdate::MlPredictions(value) => self.ml_predictions.write(value, seq, fresh),
            SliceUpdate::RiskHistory(value) => self.risk_history.write(value, seq, fresh),
            SliceUpdate::Diagnostics(value) => self.diagnostics.write(value, seq, fresh),
            SliceUpdate::VixSignal(value) => self.vix_signal.write(value, seq, fresh),
            SliceUpdate::VixData(value) => self.vix_data.write(value, seq, fresh),
            SliceUpdate::UnifiedPortfolio(value) => self.unified_portfolio.write(value, seq, fresh),
            SliceUpdate::MarketRegime(value) => self.market_regime.write(value, seq, fresh),
            SliceUpdate::VolSurface(value) => self.vol_surface.write(value, seq, fresh),
            SliceUpdate::BackgroundJobs(value) => self.background_jobs.write(value, seq, fresh),
        }
        true
    }

    /// Compact multi-line text view of the snapshot
    pub fn summary(&self) -> String {
        let status = self.status.get();
        let perf = self.performance.get();
        let mut out = String::new();

        let mode = match status.mode {
            TradingMode::Paper => "PAPER",
            TradingMode::Live => "LIVE",
        };
        let activity = if status.is_active { "ACTIVE" } else { "STOPPED" };
        let push = if self.connection.is_connected() {
            "connected"
        } else {
            "disconnected"
        };
        let _ = write!(out, "mode {mode} | trader {activity}");
        if !status.status.is_empty() {
            let _ = write!(out, " ({})", status.status);
        }
        let _ = writeln!(out, " | push {push}");

        let _ = writeln!(
            out,
            "P&L total {} | today {} | realized {} | unrealized {}",
            money(perf.total_pnl),
            money(perf.today_pnl),
            money(perf.realized_pnl),
            money(perf.unrealized_pnl),
        );
        let _ = writeln!(
            out,
            "win rate {:.1}% | trades {} ({}W/{}L) | sharpe {:.2} | max drawdown {:.2}%",
            perf.win_rate,
            perf.total_trades,
            perf.winning_trades,
            perf.losing_trades,
            perf.sharpe_ratio,
            perf.max_drawdown,
        );

        let open = self
            .positions
            .get()
            .iter()
            .filter(|trade| trade.status.is_open())
            .count();
        let strategies = self.strategies.get();
        let paused = strategies.iter().filter(|row| !row.is_enabled()).count();
        let _ = writeln!(
            out,
            "positions {open} open | strategies {} ({paused} paused) | decisions {} | closed trades {}",
            strategies.len(),
            self.decisions.get().len(),
            self.closed_trades.get().len(),
        );

        let countdown = if self.countdown.is_empty() {
            "-"
        } else {
            self.countdown.as_str()
        };
        let _ = write!(out, "next scan in {countdown}");
        out
    }
}

fn money(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::PullOutcome;
    use serde_json::json;

    fn batch(ticket: BatchTicket, outcomes: Vec<(Endpoint, Result<Value, String>)>) -> PullBatch {
        PullBatch {
            ticket,
            outcomes: outcomes
                .into_iter()
                .map(|(endpoint, result)| PullOutcome { endpoint, result })
                .collect(),
        }
    }

    #[test]
    fn failed_endpoint_leaves_slice_stale_not_empty() {
        let mut state = DashboardState::new();
        let first = state.begin_batch(BatchKind::Main);
        state.apply_pull_batch(batch(
            first,
            vec![(Endpoint::RiskStatus, Ok(json!({ "risk_level": "LOW" })))],
        ));

        let second = state.begin_batch(BatchKind::Main);
        let report = state.apply_pull_batch(batch(
            second,
            vec![
                (Endpoint::RiskStatus, Err("timeout".to_string())),
                (Endpoint::MlStatus, Ok(json!({ "is_trained": true }))),
            ],
        ));

        assert_eq!(state.risk_status.get().risk_level, "LOW");
        assert!(state.ml_status.get().is_trained);
        assert_eq!(report.applied, vec![Slice::MlStatus]);
        assert_eq!(report.unavailable, vec![("risk_status", "timeout".to_string())]);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut state = DashboardState::new();
        let slow = state.begin_batch(BatchKind::Main);
        let fast = state.begin_batch(BatchKind::Main);

        state.apply_pull_batch(batch(
            fast,
            vec![(Endpoint::EquityCurve { window: Default::default() }, Ok(json!([{ "equity": 2 }])))],
        ));
        let report = state.apply_pull_batch(batch(
            slow,
            vec![(Endpoint::EquityCurve { window: Default::default() }, Ok(json!([{ "equity": 1 }])))],
        ));

        assert!(report.discarded);
        assert_eq!(state.equity_curve.get()[0].equity, Decimal::from(2));
    }

    #[test]
    fn secondary_batch_joins_current_generation() {
        let mut state = DashboardState::new();
        let main = state.begin_batch(BatchKind::Main);
        let secondary = state.begin_batch(BatchKind::Secondary);
        assert_eq!(main.generation, secondary.generation);

        let report = state.apply_pull_batch(batch(
            secondary,
            vec![(Endpoint::VixCurrent, Ok(json!({ "vix": 21.5 })))],
        ));
        assert!(!report.discarded);
        assert_eq!(state.vix_data.get().vix_spot, 21.5);
    }

    #[test]
    fn push_after_batch_start_beats_the_pull() {
        let mut state = DashboardState::new();
        let ticket = state.begin_batch(BatchKind::Main);

        state.apply_push(vec![SliceUpdate::Performance(Performance::decode(
            &json!({ "total_pnl": 900 }),
        ))]);

        let report = state.apply_pull_batch(batch(
            ticket,
            vec![
                (Endpoint::Performance, Ok(json!({ "total_pnl": 500 }))),
                (Endpoint::Trades { limit: 50 }, Ok(json!({ "trades": [{ "id": "t1" }] }))),
            ],
        ));

        assert_eq!(state.performance.get().total_pnl, Decimal::from(900));
        assert_eq!(state.positions.get().len(), 1);
        assert_eq!(report.superseded, vec![Slice::Performance]);
    }

    #[test]
    fn pull_started_after_push_still_applies() {
        let mut state = DashboardState::new();
        state.apply_push(vec![SliceUpdate::Performance(Performance::decode(
            &json!({ "total_pnl": 900 }),
        ))]);
        let ticket = state.begin_batch(BatchKind::Main);
        state.apply_pull_batch(batch(
            ticket,
            vec![(Endpoint::Performance, Ok(json!({ "total_pnl": 950 })))],
        ));
        assert_eq!(state.performance.get().total_pnl, Decimal::from(950));
    }

    #[test]
    fn pull_only_slices_ignore_push_freshness() {
        let mut state = DashboardState::new();
        let ticket = state.begin_batch(BatchKind::Main);
        state.apply_push(vec![SliceUpdate::Status(TraderStatus::default())]);
        let report = state.apply_pull_batch(batch(
            ticket,
            vec![(Endpoint::Diagnostics, Ok(json!({ "status": "ok" })))],
        ));
        assert_eq!(report.applied, vec![Slice::Diagnostics]);
    }

    #[test]
    fn strategies_merge_with_config_from_same_batch() {
        let mut state = DashboardState::new();
        let ticket = state.begin_batch(BatchKind::Main);
        state.apply_pull_batch(batch(
            ticket,
            vec![
                (Endpoint::Strategies, Ok(json!([{ "name": "Iron Condor", "status": "active" }]))),
                (Endpoint::StrategyConfig, Ok(json!({ "Iron Condor": false }))),
            ],
        ));
        assert!(!state.strategies.get()[0].is_enabled());
    }

    #[test]
    fn strategies_fall_back_to_last_known_config() {
        let mut state = DashboardState::new();
        let first = state.begin_batch(BatchKind::Main);
        state.apply_pull_batch(batch(
            first,
            vec![(Endpoint::StrategyConfig, Ok(json!({ "Iron Condor": false })))],
        ));
        let second = state.begin_batch(BatchKind::Main);
        state.apply_pull_batch(batch(
            second,
            vec![
                (Endpoint::StrategyConfig, Err("500".to_string())),
                (Endpoint::Strategies, Ok(json!([{ "name": "Iron Condor", "status": "active" }]))),
            ],
        ));
        assert!(!state.strategies.get()[0].is_enabled());
    }

    #[test]
    fn local_toggle_updates_row_and_config() {
        let mut state = DashboardState::new();
        let ticket = state.begin_batch(BatchKind::Main);
        state.apply_pull_batch(batch(
            ticket,
            vec![(Endpoint::Strategies, Ok(json!([{ "id": "ic", "name": "Iron Condor" }])))],
        ));

        assert!(state.set_strategy_enabled("ic", false));
        assert!(!state.strategies.get()[0].is_enabled());
        assert_eq!(state.strategy_config.get().enabled("Iron Condor"), Some(false));
        assert!(!state.set_strategy_enabled("missing", true));
    }

    #[test]
    fn versions_only_move_for_written_slices() {
        let mut state = DashboardState::new();
        let curve_before = state.equity_curve.version();
        state.apply_push(vec![SliceUpdate::Positions(Vec::new())]);
        assert_eq!(state.equity_curve.version(), curve_before);
        assert!(state.positions.is_loaded());
    }

    #[test]
    fn summary_mentions_mode_and_countdown() {
        let mut state = DashboardState::new();
        state.apply_push(vec![SliceUpdate::Status(TraderStatus::decode(
            &json!({ "is_active": true, "mode": "live" }),
        ))]);
        state.countdown = "1:02".to_string();
        let summary = state.summary();
        assert!(summary.starts_with("mode LIVE | trader ACTIVE"));
        assert!(summary.ends_with("next scan in 1:02"));
    }
}
