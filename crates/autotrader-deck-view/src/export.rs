/*
[INPUT]:  Open-position rows, or activity-log rows when there are none
[OUTPUT]: Fully quoted CSV bytes and the date-stamped export file name
[POS]:    Export layer - serializer only; writing the file is the caller's job
[UPDATE]: When the export header or a column's formatting changes
*/

use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::derive::row_unrealized_pnl;
use crate::error::ExportError;
use crate::model::{Trade, TradeLogEntry};

pub const EXPORT_HEADER: [&str; 15] = [
    "Date",
    "Time",
    "Action",
    "Symbol",
    "Strategy",
    "Strike",
    "Option Type",
    "Expiration",
    "Quantity",
    "Entry Price",
    "Exit Price",
    "P&L",
    "P&L %",
    "Status",
    "Details",
];

/// `trades_export_YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("trades_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize the richer position rows, or the log rows when there are no positions.
///
/// Every field is quoted. Money and percentages use two decimals.
pub fn export_trades(
    trades: &[Trade],
    log: &[TradeLogEntry],
    contract_multiplier: Decimal,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    if trades.is_empty() {
        for entry in log {
            writer.write_record(log_row(entry))?;
        }
    } else {
        for trade in trades {
            writer.write_record(trade_row(trade, contract_multiplier))?;
        }
    }

    writer.flush().map_err(csv::Error::from)?;
    writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.error().to_string()))
}

fn trade_row(trade: &Trade, contract_multiplier: Decimal) -> [String; 15] {
    let pnl = if trade.status.is_closed() {
        trade
            .realized_pnl
            .unwrap_or_else(|| row_unrealized_pnl(trade, contract_multiplier))
    } else {
        row_unrealized_pnl(trade, contract_multiplier)
    };
    let pnl_pct = trade
        .pnl_pct
        .and_then(Decimal::from_f64)
        .unwrap_or_else(|| pnl_percent(pnl, trade, contract_multiplier));

    [
        trade
            .timestamp
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        trade
            .timestamp
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_default(),
        trade.action.clone(),
        trade.symbol.clone(),
        trade.strategy.clone(),
        two_dp(trade.strike),
        trade.option_type.clone(),
        trade.expiration.clone(),
        trade.quantity.to_string(),
        two_dp(trade.entry_price),
        trade.current_price.map(two_dp).unwrap_or_default(),
        two_dp(pnl),
        two_dp(pnl_pct),
        trade.status.label().to_string(),
        // free-text details only exist on log rows
        String::new(),
    ]
}

fn log_row(entry: &TradeLogEntry) -> [String; 15] {
    [
        entry.date.clone(),
        entry.time.clone(),
        entry.action.clone(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        entry.pnl.map(two_dp).unwrap_or_default(),
        String::new(),
        String::new(),
        entry.details.clone(),
    ]
}

/// P&L against the capital put in: `pnl / (entry * |quantity| * multiplier) * 100`
fn pnl_percent(pnl: Decimal, trade: &Trade, contract_multiplier: Decimal) -> Decimal {
    let cost = trade
        .entry_price
        .saturating_mul(Decimal::from(trade.quantity.unsigned_abs()))
        .saturating_mul(contract_multiplier);
    if cost.is_zero() {
        return Decimal::ZERO;
    }
    pnl.checked_div(cost)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn two_dp(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::keys;
    use crate::model::Decode;
    use csv::ReaderBuilder;
    use serde_json::json;

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|record| record.expect("record").iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn file_name_is_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 4).expect("date");
        assert_eq!(export_file_name(date), "trades_export_2024-11-04.csv");
    }

    #[test]
    fn every_field_is_quoted() {
        let bytes = export_trades(&[], &[], Decimal::ONE_HUNDRED).expect("export");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.starts_with("\"Date\",\"Time\",\"Action\""));
    }

    #[test]
    fn log_rows_round_trip_with_embedded_comma() {
        let log = TradeLogEntry::decode_list(
            &json!([{
                "date": "2024-11-04",
                "time": "10:15:00",
                "action": "CLOSE",
                "details": "Closed SPY 595P, profit target hit",
                "pnl": 125.5
            }]),
            keys::LOG_LIST,
        );
        let bytes = export_trades(&[], &log, Decimal::ONE_HUNDRED).expect("export");
        let rows = read_back(&bytes);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), EXPORT_HEADER.len());
        assert_eq!(rows[1].len(), EXPORT_HEADER.len());
        assert_eq!(rows[1][0], "2024-11-04");
        assert_eq!(rows[1][11], "125.50");
        assert_eq!(rows[1][14], "Closed SPY 595P, profit target hit");
    }

    #[test]
    fn positions_are_preferred_over_log() {
        let trades = Trade::decode_list(
            &json!([{
                "id": "t1",
                "timestamp": "2024-11-04T14:30:00Z",
                "symbol": "SPY",
                "strategy": "Iron Condor",
                "strike": 595,
                "option_type": "put",
                "quantity": 2,
                "entry_price": 2.5,
                "current_price": 3
            }]),
            keys::TRADE_LIST,
        );
        let log = TradeLogEntry::decode_list(&json!([{ "action": "SCAN" }]), keys::LOG_LIST);
        let rows = read_back(&export_trades(&trades, &log, Decimal::ONE_HUNDRED).expect("export"));

        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row[0], "2024-11-04");
        assert_eq!(row[1], "14:30:00");
        assert_eq!(row[5], "595.00");
        assert_eq!(row[9], "2.50");
        assert_eq!(row[10], "3.00");
        // (3.00 - 2.50) * 2 * 100
        assert_eq!(row[11], "100.00");
        // 100 / (2.50 * 2 * 100)
        assert_eq!(row[12], "20.00");
        assert_eq!(row[13], "OPEN");
        assert_eq!(row[14], "");
    }

    #[test]
    fn backend_percentage_is_kept() {
        let trades = Trade::decode_list(
            &json!([{ "id": "t1", "entry_price": 2, "quantity": 1, "pnl_pct": 12.346 }]),
            keys::TRADE_LIST,
        );
        let rows = read_back(&export_trades(&trades, &[], Decimal::ONE_HUNDRED).expect("export"));
        assert_eq!(rows[1][12], "12.35");
    }

    #[test]
    fn extreme_prices_do_not_panic() {
        let trades = Trade::decode_list(
            &json!([{
                "id": "t1",
                "quantity": 2,
                "entry_price": "50000000000000000000000000000",
                "current_price": 0
            }]),
            keys::TRADE_LIST,
        );
        let rows = read_back(&export_trades(&trades, &[], Decimal::ONE_HUNDRED).expect("export"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][12], "-100.00");
    }
}
