//! Intraday OHLCV candles for the chart view.

use super::record::{FieldDef, FieldType, FieldValue, Record, RecordKind, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    symbol: String,
    timestamp: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
    change: f64,
    change_pct: f64,
}

impl Candle {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        let change = close - open;
        let change_pct = if open != 0.0 {
            change / open * 100.0
        } else {
            0.0
        };
        Candle {
            symbol: symbol.into(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            change,
            change_pct,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn volume(&self) -> i64 {
        self.volume
    }

    /// close - open
    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn change_pct(&self) -> f64 {
        self.change_pct
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

impl Record for Candle {
    const KIND: RecordKind = RecordKind::Candle;

    const SCHEMA: &'static [FieldDef] = &[
        FieldDef::new("symbol", FieldType::Text),
        FieldDef::new("timestamp", FieldType::Timestamp),
        FieldDef::new("open", FieldType::Decimal),
        FieldDef::new("high", FieldType::Decimal),
        FieldDef::new("low", FieldType::Decimal),
        FieldDef::new("close", FieldType::Decimal),
        FieldDef::new("volume", FieldType::Integer),
        FieldDef::new("change", FieldType::Decimal),
        FieldDef::new("change_pct", FieldType::Decimal),
        FieldDef::new("range", FieldType::Decimal),
    ];

    const SEARCH_FIELDS: &'static [&'static str] = &["symbol"];

    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "symbol" => FieldValue::Text(&self.symbol),
            "timestamp" => FieldValue::Timestamp(self.timestamp),
            "open" => FieldValue::Decimal(self.open),
            "high" => FieldValue::Decimal(self.high),
            "low" => FieldValue::Decimal(self.low),
            "close" => FieldValue::Decimal(self.close),
            "volume" => FieldValue::Integer(self.volume),
            "change" => FieldValue::Decimal(self.change),
            "change_pct" => FieldValue::Decimal(self.change_pct),
            "range" => FieldValue::Decimal(self.range()),
            _ => return None,
        })
    }

    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{}@{}", self.symbol, self.timestamp.format(TIMESTAMP_FORMAT)))
    }

    fn timestamp(&self) -> Option<NaiveDateTime> {
        Some(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{assert_schema_consistent, parse_timestamp};

    fn sample_candle() -> Candle {
        Candle::new(
            "AAPL",
            parse_timestamp("2024-06-14T10:00:00").unwrap(),
            100.0,
            110.0,
            90.0,
            105.0,
            750_000,
        )
    }

    #[test]
    fn change_and_pct() {
        let c = sample_candle();
        assert!((c.change() - 5.0).abs() < f64::EPSILON);
        assert!((c.change_pct() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn range_is_high_minus_low() {
        assert!((sample_candle().range() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_open_has_zero_pct() {
        let at = parse_timestamp("2024-06-14T10:00:00").unwrap();
        let c = Candle::new("X", at, 0.0, 1.0, 0.0, 1.0, 1);
        assert_eq!(c.change_pct(), 0.0);
    }

    #[test]
    fn key_combines_symbol_and_time() {
        assert_eq!(sample_candle().key(), "AAPL@2024-06-14T10:00:00");
    }

    #[test]
    fn schema_is_consistent() {
        assert_schema_consistent(&sample_candle());
    }
}
