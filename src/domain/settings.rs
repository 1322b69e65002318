//! Runtime settings resolved from configuration.

use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::str::FromStr;

use super::query::DEFAULT_PAGE_SIZE;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ORDER_COUNT: usize = 50;
pub const DEFAULT_CANDLE_DAYS: u32 = 5;
pub const DEFAULT_CANDLE_SYMBOL: &str = "AAPL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceKind {
    Mock,
    Csv { dir: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceName {
    Mock,
    Csv,
}

impl FromStr for SourceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(SourceName::Mock),
            "csv" => Ok(SourceName::Csv),
            other => Err(format!("unknown data source '{other}' (expected mock or csv)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockSettings {
    pub seed: u64,
    /// Reference instant for generated timestamps; `None` means the wall clock.
    pub now: Option<NaiveDateTime>,
    pub orders: usize,
    pub candle_days: u32,
    pub symbol: String,
}

impl Default for MockSettings {
    fn default() -> Self {
        MockSettings {
            seed: DEFAULT_SEED,
            now: None,
            orders: DEFAULT_ORDER_COUNT,
            candle_days: DEFAULT_CANDLE_DAYS,
            symbol: DEFAULT_CANDLE_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: DataSourceKind,
    pub mock: MockSettings,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: DataSourceKind::Mock,
            mock: MockSettings::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
