//! CSV directory data adapter.
//!
//! Each record kind lives in its own file under the base directory
//! (`orders.csv`, `holdings.csv`, `watchlist.csv`, `leaderboard.csv`,
//! `candles.csv`). Columns are located by header name, so derived columns
//! written by [`write_records`] are ignored on the way back in.

use crate::domain::candle::Candle;
use crate::domain::error::StocksimError;
use crate::domain::holding::Holding;
use crate::domain::leaderboard::LeaderboardEntry;
use crate::domain::order::{Order, OrderSide, OrderStatus};
use crate::domain::record::{Record, ensure_unique_keys, parse_bool, parse_timestamp};
use crate::domain::watchlist::WatchlistEntry;
use crate::ports::data_port::RecordSource;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub const ORDERS_FILE: &str = "orders.csv";
pub const HOLDINGS_FILE: &str = "holdings.csv";
pub const WATCHLIST_FILE: &str = "watchlist.csv";
pub const LEADERBOARD_FILE: &str = "leaderboard.csv";
pub const CANDLES_FILE: &str = "candles.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn load<R, F>(&self, file: &str, parse: F) -> Result<Vec<R>, StocksimError>
    where
        R: Record,
        F: Fn(&Row<'_>) -> Result<R, StocksimError>,
    {
        let path = self.base_path.join(file);
        let content = fs::read_to_string(&path).map_err(|e| StocksimError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let columns: HashMap<String, usize> = rdr
            .headers()
            .map_err(|e| StocksimError::DataSource {
                reason: format!("{file}: CSV header error: {e}"),
            })?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        let mut records = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| StocksimError::DataSource {
                reason: format!("{file}: CSV parse error: {e}"),
            })?;
            let row = Row {
                file,
                // Line 1 is the header.
                line: index + 2,
                columns: &columns,
                record: &record,
            };
            records.push(parse(&row)?);
        }

        ensure_unique_keys(&records)?;
        tracing::debug!(file, count = records.len(), "loaded records");
        Ok(records)
    }
}

struct Row<'a> {
    file: &'a str,
    line: usize,
    columns: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    fn error(&self, reason: String) -> StocksimError {
        StocksimError::DataSource {
            reason: format!("{} line {}: {}", self.file, self.line, reason),
        }
    }

    fn text(&self, column: &str) -> Result<&str, StocksimError> {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
            .ok_or_else(|| self.error(format!("missing {column} column")))
    }

    fn int(&self, column: &str) -> Result<i64, StocksimError> {
        let raw = self.text(column)?;
        raw.parse()
            .map_err(|e| self.error(format!("invalid {column} value '{raw}': {e}")))
    }

    fn decimal(&self, column: &str) -> Result<f64, StocksimError> {
        let raw = self.text(column)?;
        raw.parse()
            .map_err(|e| self.error(format!("invalid {column} value '{raw}': {e}")))
    }

    fn boolean(&self, column: &str) -> Result<bool, StocksimError> {
        let raw = self.text(column)?;
        parse_bool(raw).ok_or_else(|| self.error(format!("invalid {column} value '{raw}'")))
    }

    fn timestamp(&self, column: &str) -> Result<NaiveDateTime, StocksimError> {
        let raw = self.text(column)?;
        parse_timestamp(raw).ok_or_else(|| self.error(format!("invalid {column} value '{raw}'")))
    }

    fn parsed<T: std::str::FromStr<Err = String>>(&self, column: &str) -> Result<T, StocksimError> {
        self.text(column)?.parse().map_err(|e| self.error(e))
    }
}

fn parse_order(row: &Row<'_>) -> Result<Order, StocksimError> {
    let quantity = row.int("quantity")?;
    if quantity <= 0 {
        return Err(row.error(format!("quantity must be positive, got {quantity}")));
    }
    let price = row.decimal("price")?;
    if price < 0.0 {
        return Err(row.error(format!("price must be non-negative, got {price}")));
    }
    Ok(Order::new(
        row.text("id")?,
        row.parsed::<OrderSide>("side")?,
        row.text("symbol")?,
        quantity,
        price,
        row.parsed::<OrderStatus>("status")?,
        row.timestamp("timestamp")?,
    ))
}

fn parse_holding(row: &Row<'_>) -> Result<Holding, StocksimError> {
    Ok(Holding::new(
        row.text("symbol")?,
        row.text("name")?,
        row.text("sector")?,
        row.int("quantity")?,
        row.decimal("avg_cost")?,
        row.decimal("current_price")?,
    ))
}

fn parse_watchlist_entry(row: &Row<'_>) -> Result<WatchlistEntry, StocksimError> {
    Ok(WatchlistEntry::new(
        row.text("symbol")?,
        row.text("name")?,
        row.decimal("price")?,
        row.decimal("change_24h")?,
        row.decimal("market_cap")?,
        row.decimal("volume_24h")?,
        row.boolean("is_favorite")?,
    ))
}

fn parse_leaderboard_entry(row: &Row<'_>) -> Result<LeaderboardEntry, StocksimError> {
    Ok(LeaderboardEntry {
        user_id: row.int("user_id")?,
        username: row.text("username")?.to_string(),
        portfolio_value: row.decimal("portfolio_value")?,
        gain: row.decimal("gain")?,
        gain_pct: row.decimal("gain_pct")?,
        trades: row.int("trades")?,
        win_rate: row.decimal("win_rate")?,
    })
}

fn parse_candle(row: &Row<'_>) -> Result<Candle, StocksimError> {
    Ok(Candle::new(
        row.text("symbol")?,
        row.timestamp("timestamp")?,
        row.decimal("open")?,
        row.decimal("high")?,
        row.decimal("low")?,
        row.decimal("close")?,
        row.int("volume")?,
    ))
}

impl RecordSource for CsvAdapter {
    fn orders(&self) -> Result<Vec<Order>, StocksimError> {
        self.load(ORDERS_FILE, parse_order)
    }

    fn holdings(&self) -> Result<Vec<Holding>, StocksimError> {
        self.load(HOLDINGS_FILE, parse_holding)
    }

    fn watchlist(&self) -> Result<Vec<WatchlistEntry>, StocksimError> {
        self.load(WATCHLIST_FILE, parse_watchlist_entry)
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StocksimError> {
        self.load(LEADERBOARD_FILE, parse_leaderboard_entry)
    }

    fn candles(&self) -> Result<Vec<Candle>, StocksimError> {
        self.load(CANDLES_FILE, parse_candle)
    }
}

/// Writes every schema column of `records` in lossless form, header first.
pub fn write_records<R: Record, W: Write>(records: &[R], writer: W) -> Result<(), StocksimError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(R::SCHEMA.iter().map(|def| def.name))
        .map_err(io::Error::from)?;
    for record in records {
        let cells = R::SCHEMA.iter().map(|def| {
            record
                .field(def.name)
                .map(|value| value.to_raw())
                .unwrap_or_default()
        });
        wtr.write_record(cells).map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}
