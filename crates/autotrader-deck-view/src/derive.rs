/*
[INPUT]:  Equity-curve, closed-trade, activity-log and position slices
[OUTPUT]: Normalized or synthesized curve, best/worst trade, per-row P&L
[POS]:    Derivation layer - pure functions plus a version-keyed cache
[UPDATE]: When a derived figure is added or its fallback rule changes
*/

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MetricsConfig;
use crate::decode::epoch_millis;
use crate::filter::TradeFilter;
use crate::model::{ClosedTrade, EquityCurvePoint, Trade, TradeLogEntry};
use crate::state::DashboardState;

/// Chart-ready curve point with a millisecond timestamp
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartPoint {
    pub timestamp_ms: i64,
    pub equity: Decimal,
    /// Equity relative to the first point of the curve
    pub pnl: Decimal,
    pub label: String,
}

impl ChartPoint {
    pub fn at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

/// Scale every timestamp to milliseconds and rebase P&L on the first point
pub fn normalize_curve(points: &[EquityCurvePoint]) -> Vec<ChartPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let baseline = first.equity;
    points
        .iter()
        .map(|point| {
            let timestamp_ms = epoch_millis(point.timestamp);
            ChartPoint {
                timestamp_ms,
                equity: point.equity,
                pnl: point.equity.saturating_sub(baseline),
                label: label_for(&point.date_label, timestamp_ms),
            }
        })
        .collect()
}

/// Synthetic curve from closed trades: cumulative realized P&L on top of
/// `baseline`, ordered by exit time. Sorts a copy; the input is untouched.
pub fn synthesize_curve(closed: &[ClosedTrade], baseline: Decimal) -> Vec<ChartPoint> {
    let mut ordered: Vec<&ClosedTrade> = closed.iter().collect();
    // stable: trades without an exit time keep their order, after dated ones
    ordered.sort_by_key(|trade| (trade.exit_at.is_none(), trade.exit_at));

    let mut cumulative = Decimal::ZERO;
    ordered
        .into_iter()
        .map(|trade| {
            cumulative = cumulative.saturating_add(trade.realized_pnl);
            let timestamp_ms = trade.exit_at.map(|at| at.timestamp_millis()).unwrap_or(0);
            ChartPoint {
                timestamp_ms,
                equity: baseline.saturating_add(cumulative),
                pnl: cumulative,
                label: label_for("", timestamp_ms),
            }
        })
        .collect()
}

/// Backend curve when it has points, otherwise the closed-trade synthesis
pub fn equity_curve(
    points: &[EquityCurvePoint],
    closed: &[ClosedTrade],
    baseline: Decimal,
) -> Vec<ChartPoint> {
    if points.is_empty() {
        synthesize_curve(closed, baseline)
    } else {
        normalize_curve(points)
    }
}

fn label_for(date_label: &str, timestamp_ms: i64) -> String {
    if !date_label.is_empty() {
        return date_label.to_string();
    }
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .filter(|_| timestamp_ms > 0)
        .map(|at| at.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Largest win and largest loss; both `0` when there is nothing to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TradeExtremes {
    pub best: Decimal,
    pub worst: Decimal,
}

/// Extremes over closed trades, falling back to the activity log's P&L
pub fn trade_extremes(closed: &[ClosedTrade], log: &[TradeLogEntry]) -> TradeExtremes {
    let pnls: Vec<Decimal> = if closed.is_empty() {
        log.iter().filter_map(|entry| entry.pnl).collect()
    } else {
        closed.iter().map(|trade| trade.realized_pnl).collect()
    };
    TradeExtremes {
        best: pnls.iter().copied().max().unwrap_or(Decimal::ZERO),
        worst: pnls.iter().copied().min().unwrap_or(Decimal::ZERO),
    }
}

/// Row P&L: the backend's unrealized figure, else
/// `(mark - entry) * quantity * multiplier` with an un-priced row marked at entry.
/// Out-of-range products saturate at the `Decimal` bounds.
pub fn row_unrealized_pnl(trade: &Trade, contract_multiplier: Decimal) -> Decimal {
    trade.unrealized_pnl.unwrap_or_else(|| {
        trade
            .mark_price()
            .saturating_sub(trade.entry_price)
            .saturating_mul(Decimal::from(trade.quantity))
            .saturating_mul(contract_multiplier)
    })
}

/// Single-entry cache: recomputes only when the key differs from the last one
#[derive(Debug, Clone, Default)]
pub struct Memo<K, V> {
    key: Option<K>,
    value: V,
    computations: u64,
}

impl<K: PartialEq, V: Default> Memo<K, V> {
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if self.key.as_ref() != Some(&key) {
            self.value = compute();
            self.key = Some(key);
            self.computations += 1;
        }
        &self.value
    }

    pub fn computations(&self) -> u64 {
        self.computations
    }
}

/// Derived values keyed by the slice versions they read
#[derive(Debug, Clone, Default)]
pub struct DerivedCache {
    metrics: MetricsConfig,
    curve: Memo<(u64, u64), Vec<ChartPoint>>,
    extremes: Memo<(u64, u64), TradeExtremes>,
    filtered: Memo<(u64, TradeFilter), Vec<Trade>>,
}

impl DerivedCache {
    pub fn new(metrics: MetricsConfig) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> &MetricsConfig {
        &self.metrics
    }

    pub fn equity_curve(&mut self, state: &DashboardState) -> &[ChartPoint] {
        let key = (state.equity_curve.version(), state.closed_trades.version());
        let baseline = self.metrics.baseline_account_size;
        self.curve.get_or_compute(key, || {
            equity_curve(state.equity_curve.get(), state.closed_trades.get(), baseline)
        })
    }

    pub fn extremes(&mut self, state: &DashboardState) -> TradeExtremes {
        let key = (state.closed_trades.version(), state.activity_log.version());
        *self.extremes.get_or_compute(key, || {
            trade_extremes(state.closed_trades.get(), state.activity_log.get())
        })
    }

    pub fn filtered_trades(&mut self, state: &DashboardState, filter: &TradeFilter) -> &[Trade] {
        let key = (state.positions.version(), filter.clone());
        self.filtered
            .get_or_compute(key, || filter.apply(state.positions.get()))
    }

    /// How many times each derivation actually ran: curve, extremes, filter
    pub fn computations(&self) -> (u64, u64, u64) {
        (
            self.curve.computations(),
            self.extremes.computations(),
            self.filtered.computations(),
        )
    }
}
