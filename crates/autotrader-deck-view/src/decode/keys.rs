/*
[INPUT]:  Field spellings observed across backend schema versions
[OUTPUT]: One fallback chain per decoded field
[POS]:    Decode layer - the auditable field table
[UPDATE]: When the backend renames a field or a legacy spelling is retired
*/

//! Fallback table.
//!
//! Each constant is the ordered chain for one logical field: the current
//! canonical key, then older spellings. The default applied when the whole
//! chain misses is chosen by the reader (`0`, `false`, empty), not here.

use super::Keys;

// envelope payload wrappers
pub const STATUS_BODY: Keys = &["status", "trader"];
pub const PERFORMANCE_BODY: Keys = &["performance", "stats"];
pub const TRADE_LIST: Keys = &["trades", "positions", "open_positions", "items"];
pub const CLOSED_TRADE_LIST: Keys = &["closed_trades", "trades", "items"];
pub const LOG_LIST: Keys = &["logs", "log", "entries", "activity"];
pub const DECISION_LIST: Keys = &["decisions", "logs", "entries"];
pub const STRATEGY_LIST: Keys = &["strategies", "items"];
pub const STRATEGY_CONFIG_MAP: Keys = &["config", "strategies", "strategy_config"];
pub const LEADERBOARD_LIST: Keys = &["leaderboard", "rankings", "strategies"];
pub const BACKTEST_LIST: Keys = &["results", "patterns", "backtests"];
pub const CURVE_LIST: Keys = &["equity_curve", "curve", "points", "data"];
pub const PREDICTION_LIST: Keys = &["predictions", "items"];
pub const RISK_HISTORY_LIST: Keys = &["history", "metrics", "points"];
pub const JOB_LIST: Keys = &["jobs", "items"];
pub const PORTFOLIO_POSITIONS: Keys = &["positions", "holdings", "instruments"];
pub const REGIME_PERFORMANCE_LIST: Keys = &["regime_performance", "performance_by_regime"];
pub const WARNINGS: Keys = &["warnings", "alerts"];
pub const DIAGNOSTIC_CHECKS: Keys = &["checks", "components"];

// trader status
pub const IS_ACTIVE: Keys = &["is_active", "active", "running"];
pub const MODE: Keys = &["mode", "trading_mode"];
pub const STATUS_TEXT: Keys = &["status", "state"];
pub const CURRENT_ACTION: Keys = &["current_action", "action"];
pub const MARKET_ANALYSIS: Keys = &["market_analysis", "analysis"];
pub const LAST_CHECK: Keys = &["last_check", "last_check_time", "last_scan"];
pub const NEXT_CHECK: Keys = &["next_check", "next_check_time", "next_scan"];

// performance
pub const TOTAL_PNL: Keys = &["total_pnl", "net_pnl"];
pub const TODAY_PNL: Keys = &["today_pnl", "daily_pnl", "pnl_today"];
pub const REALIZED_PNL: Keys = &["realized_pnl", "total_realized_pnl"];
pub const UNREALIZED_PNL: Keys = &["unrealized_pnl", "total_unrealized_pnl", "unrealized_pl"];
pub const WIN_RATE: Keys = &["win_rate", "winrate"];
pub const TOTAL_TRADES: Keys = &["total_trades", "trade_count", "trades"];
pub const WINNING_TRADES: Keys = &["winning_trades", "wins"];
pub const LOSING_TRADES: Keys = &["losing_trades", "losses"];
pub const SHARPE: Keys = &["sharpe_ratio", "sharpe"];
pub const MAX_DRAWDOWN: Keys = &["max_drawdown", "max_drawdown_pct"];
pub const STARTING_CAPITAL: Keys = &["starting_capital", "initial_capital"];
pub const CURRENT_VALUE: Keys = &["current_value", "current_equity", "equity", "account_value"];
pub const RETURN_PCT: Keys = &["return_pct", "total_return_pct", "return_percent"];

// trades and positions
pub const TRADE_ID: Keys = &["id", "trade_id", "position_id"];
pub const TRADE_TIMESTAMP: Keys = &["timestamp", "entry_time", "created_at", "opened_at"];
pub const SYMBOL: Keys = &["symbol", "underlying", "ticker"];
pub const STRIKE: Keys = &["strike", "strike_price"];
pub const OPTION_TYPE: Keys = &["option_type", "type", "right"];
pub const EXPIRATION: Keys = &["expiration", "expiration_date", "expiry"];
pub const ACTION: Keys = &["action", "side", "trade_type"];
pub const QUANTITY: Keys = &["quantity", "contracts", "qty"];
pub const ENTRY_PRICE: Keys = &["entry_price", "price", "fill_price"];
pub const CURRENT_PRICE: Keys = &["current_price", "mark_price", "last_price"];
pub const EXIT_PRICE: Keys = &["exit_price", "close_price"];
pub const SPOT_PRICE: Keys = &["spot_price", "underlying_price", "entry_spot_price"];
pub const TRADE_STATUS: Keys = &["status", "state"];
pub const TRADE_REALIZED_PNL: Keys = &["realized_pnl", "net_pnl"];
pub const TRADE_UNREALIZED_PNL: Keys = &["unrealized_pnl", "pnl", "unrealized_pl"];
pub const CLOSED_PNL: Keys = &["realized_pnl", "pnl", "net_pnl"];
pub const PNL_PCT: Keys = &["pnl_pct", "pnl_percent", "return_pct"];
pub const STRATEGY: Keys = &["strategy", "strategy_name"];
pub const GREEKS: Keys = &["greeks"];
pub const REGIME_BODY: Keys = &["regime_context", "market_context"];
pub const DELTA: Keys = &["delta", "entry_delta"];
pub const GAMMA: Keys = &["gamma", "entry_gamma"];
pub const THETA: Keys = &["theta", "entry_theta"];
pub const VEGA: Keys = &["vega", "entry_vega"];
pub const ENTRY_IV: Keys = &["entry_iv", "iv", "implied_volatility"];
pub const CURRENT_IV: Keys = &["current_iv", "iv_now"];
pub const REGIME: Keys = &["gex_regime", "regime", "market_regime"];
pub const VIX_AT_ENTRY: Keys = &["vix_at_entry", "entry_vix", "vix"];
pub const NET_GEX: Keys = &["net_gex", "entry_net_gex"];
pub const FLIP_POINT: Keys = &["flip_point", "gamma_flip"];

// closed trades
pub const ENTRY_DATE: Keys = &["entry_date", "opened_at", "entry_timestamp"];
pub const ENTRY_TIME: Keys = &["entry_time"];
pub const EXIT_DATE: Keys = &["exit_date", "closed_at", "exit_timestamp"];
pub const EXIT_TIME: Keys = &["exit_time"];
pub const EXIT_REASON: Keys = &["exit_reason", "close_reason", "reason"];
pub const HOLD_MINUTES: Keys = &["hold_duration_minutes", "duration_minutes", "holding_minutes"];

// equity curve
pub const CURVE_TIMESTAMP: Keys = &["timestamp", "time", "ts", "date"];
pub const CURVE_EQUITY: Keys = &["equity", "account_value", "value", "balance"];
pub const CURVE_PNL: Keys = &["pnl", "cumulative_pnl"];
pub const DATE_LABEL: Keys = &["date", "label"];

// activity log
pub const LOG_DATE: Keys = &["date"];
pub const LOG_TIME: Keys = &["time"];
pub const LOG_ACTION: Keys = &["action", "type", "event"];
pub const LOG_DETAILS: Keys = &["details", "detail", "description", "message"];
pub const LOG_PNL: Keys = &["pnl", "realized_pnl"];

// strategies and leaderboard
pub const STRATEGY_ID: Keys = &["id", "strategy_id", "name"];
pub const STRATEGY_NAME: Keys = &["name", "display_name", "strategy", "strategy_name"];
pub const STRATEGY_STATUS: Keys = &["status", "state"];
pub const STRATEGY_TRADES: Keys = &["total_trades", "trades", "trade_count"];
pub const STRATEGY_PNL: Keys = &["total_pnl", "pnl", "net_pnl"];
pub const LAST_TRADE_DATE: Keys = &["last_trade_date", "last_trade"];
pub const ENABLED: Keys = &["enabled", "is_enabled", "active"];
pub const RANK: Keys = &["rank", "position"];

// autonomous-decision log
pub const LOG_TIMESTAMP: Keys = &["timestamp", "created_at", "time"];
pub const LOG_TYPE: Keys = &["log_type", "type", "decision_type"];
pub const MESSAGE: Keys = &["message", "description", "details", "text"];
pub const PATTERN: Keys = &["pattern", "pattern_name", "detected_pattern"];
pub const CONFIDENCE: Keys = &["confidence", "confidence_score", "probability"];
pub const DIRECTION: Keys = &["direction", "bias"];
pub const CONTRACTS: Keys = &["contracts", "quantity", "position_size"];
pub const KELLY: Keys = &["kelly_fraction", "kelly_pct", "kelly"];
pub const RISK_AMOUNT: Keys = &["risk_amount", "max_risk", "capital_at_risk"];
pub const MODEL_NAME: Keys = &["model_name", "model", "name"];
pub const SCORE: Keys = &["score", "accuracy", "model_score"];
pub const PREDICTION: Keys = &["prediction", "predicted_direction", "predicted_outcome"];
pub const CHECK_NAME: Keys = &["check", "check_name", "risk_check"];
pub const PASSED: Keys = &["passed", "approved", "ok"];
pub const CHECK_VALUE: Keys = &["value", "current_value", "observed"];
pub const CHECK_LIMIT: Keys = &["limit", "threshold", "max_value"];
pub const REASONING: Keys = &["reasoning", "ai_reasoning", "rationale"];
pub const DECISION_OPTION_TYPE: Keys = &["option_type", "right", "contract_type"];

// risk
pub const TRADING_ALLOWED: Keys = &["trading_allowed", "can_trade"];
pub const DAILY_LOSS: Keys = &["daily_loss", "daily_pnl"];
pub const DAILY_LOSS_LIMIT: Keys = &["daily_loss_limit", "max_daily_loss"];
pub const MAX_POSITION_SIZE: Keys = &["max_position_size", "position_limit"];
pub const EXPOSURE: Keys = &["current_exposure", "exposure"];
pub const PORTFOLIO_DELTA: Keys = &["portfolio_delta", "net_delta", "delta"];
pub const PORTFOLIO_GAMMA: Keys = &["portfolio_gamma", "net_gamma", "gamma"];
pub const PORTFOLIO_THETA: Keys = &["portfolio_theta", "net_theta", "theta"];
pub const PORTFOLIO_VEGA: Keys = &["portfolio_vega", "net_vega", "vega"];
pub const RISK_LEVEL: Keys = &["risk_level", "level"];
pub const VAR_95: Keys = &["var_95", "value_at_risk"];
pub const POINT_TIMESTAMP: Keys = &["timestamp", "date", "time"];

// volatility
pub const SIGNAL: Keys = &["signal", "recommendation", "action"];
pub const VIX_LEVEL: Keys = &["vix_spot", "vix", "vix_level", "spot", "price"];
pub const VIX_PERCENTILE: Keys = &["vix_percentile", "percentile"];
pub const TERM_STRUCTURE: Keys = &["term_structure", "contango_state"];
pub const HEDGE_RATIO: Keys = &["hedge_ratio", "recommended_hedge_pct"];
pub const VIX9D: Keys = &["vix9d", "vix_9d"];
pub const VIX3M: Keys = &["vix3m", "vix_3m"];
pub const CHANGE_PCT: Keys = &["change_pct", "change_percent"];
pub const TERM_RATIO: Keys = &["term_structure_ratio", "ratio"];
pub const UPDATED_AT: Keys = &["updated_at", "timestamp", "as_of"];
pub const SKEW: Keys = &["skew", "put_call_skew"];
pub const TERM_SLOPE: Keys = &["term_slope", "term_structure_slope"];
pub const IV_RANK: Keys = &["iv_rank", "ivr"];
pub const ATM_IV: Keys = &["atm_iv", "iv"];

// ml
pub const IS_TRAINED: Keys = &["is_trained", "trained", "model_trained"];
pub const MODEL_VERSION: Keys = &["model_version", "version"];
pub const ACCURACY: Keys = &["accuracy", "test_accuracy"];
pub const SAMPLES: Keys = &["training_samples", "samples"];
pub const LAST_TRAINED: Keys = &["last_trained", "trained_at"];
pub const PROBABILITY: Keys = &["probability", "confidence"];
pub const ACTUAL: Keys = &["actual", "actual_outcome"];
pub const CORRECT: Keys = &["correct", "was_correct"];

// backtests and signal studies
pub const PATTERN_NAME: Keys = &["pattern", "pattern_name", "name"];
pub const TOTAL_SIGNALS: Keys = &["total_signals", "signals", "occurrences"];
pub const AVG_RETURN_PCT: Keys = &["avg_return_pct", "avg_return"];
pub const EXPECTANCY: Keys = &["expectancy", "expected_value"];
pub const CORRECT_SIGNALS: Keys = &["correct_signals", "correct", "hits"];
pub const ACCURACY_PCT: Keys = &["accuracy_pct", "accuracy", "hit_rate"];
pub const AVG_MOVE_PCT: Keys = &["avg_move_pct", "avg_move"];
pub const DETECTIONS: Keys = &["total_detections", "detections"];
pub const TRUE_POSITIVES: Keys = &["true_positives", "correct"];
pub const FALSE_POSITIVES: Keys = &["false_positives", "incorrect"];
pub const EFFECTIVENESS_PCT: Keys = &["effectiveness_pct", "effectiveness", "precision"];

// diagnostics and jobs
pub const SERVICE_STATUS: Keys = &["status", "overall_status", "health"];
pub const UPTIME: Keys = &["uptime_seconds", "uptime"];
pub const DATABASE_CONNECTED: Keys = &["database_connected", "db_connected", "database"];
pub const API_LATENCY: Keys = &["api_latency_ms", "latency_ms"];
pub const LAST_ERROR: Keys = &["last_error", "error"];
pub const CHECK_LABEL: Keys = &["name", "component", "check"];
pub const CHECK_OK: Keys = &["ok", "healthy", "passed", "status"];
pub const JOB_ID: Keys = &["id", "job_id"];
pub const JOB_NAME: Keys = &["name", "job_name", "job_type"];
pub const JOB_STATUS: Keys = &["status", "state"];
pub const PROGRESS: Keys = &["progress", "progress_pct"];
pub const STARTED_AT: Keys = &["started_at", "created_at"];
pub const FINISHED_AT: Keys = &["completed_at", "finished_at"];
pub const JOB_ERROR: Keys = &["error", "error_message"];

// regime and portfolio
pub const REGIME_NAME: Keys = &["regime", "market_regime", "gex_regime"];
pub const INSTRUMENT: Keys = &["symbol", "instrument", "ticker"];
pub const ASSET_CLASS: Keys = &["asset_class", "instrument_type", "type"];
pub const MARKET_VALUE: Keys = &["market_value", "value", "notional"];
pub const TOTAL_VALUE: Keys = &["total_value", "total_equity", "net_liquidation"];
pub const CASH: Keys = &["cash", "cash_balance"];
