//! Watchlist entries and the watchlist tab presets.

use super::query::Filter;
use super::record::{FieldDef, FieldType, FieldValue, Record, RecordKind};
use serde::Serialize;
use std::borrow::Cow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Gain,
    Loss,
    Flat,
}

impl Trend {
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            Trend::Gain
        } else if change_pct < 0.0 {
            Trend::Loss
        } else {
            Trend::Flat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Gain => "gain",
            Trend::Loss => "loss",
            Trend::Flat => "flat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistEntry {
    symbol: String,
    name: String,
    price: f64,
    change_24h: f64,
    /// Billions.
    market_cap: f64,
    /// Billions.
    volume_24h: f64,
    is_favorite: bool,
    trend: Trend,
}

impl WatchlistEntry {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        change_24h: f64,
        market_cap: f64,
        volume_24h: f64,
        is_favorite: bool,
    ) -> Self {
        WatchlistEntry {
            symbol: symbol.into(),
            name: name.into(),
            price,
            change_24h,
            market_cap,
            volume_24h,
            is_favorite,
            trend: Trend::from_change(change_24h),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn change_24h(&self) -> f64 {
        self.change_24h
    }

    pub fn market_cap(&self) -> f64 {
        self.market_cap
    }

    pub fn volume_24h(&self) -> f64 {
        self.volume_24h
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }
}

impl Record for WatchlistEntry {
    const KIND: RecordKind = RecordKind::WatchlistEntry;

    const SCHEMA: &'static [FieldDef] = &[
        FieldDef::new("symbol", FieldType::Text),
        FieldDef::new("name", FieldType::Text),
        FieldDef::new("price", FieldType::Decimal),
        FieldDef::new("change_24h", FieldType::Decimal),
        FieldDef::new("market_cap", FieldType::Decimal),
        FieldDef::new("volume_24h", FieldType::Decimal),
        FieldDef::new("is_favorite", FieldType::Boolean),
        FieldDef::new("trend", FieldType::Text),
    ];

    const SEARCH_FIELDS: &'static [&'static str] = &["symbol", "name"];

    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "symbol" => FieldValue::Text(&self.symbol),
            "name" => FieldValue::Text(&self.name),
            "price" => FieldValue::Decimal(self.price),
            "change_24h" => FieldValue::Decimal(self.change_24h),
            "market_cap" => FieldValue::Decimal(self.market_cap),
            "volume_24h" => FieldValue::Decimal(self.volume_24h),
            "is_favorite" => FieldValue::Boolean(self.is_favorite),
            "trend" => FieldValue::Text(self.trend.as_str()),
            _ => return None,
        })
    }

    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchlistTab {
    #[default]
    All,
    Favorites,
    Gainers,
    Losers,
}

impl WatchlistTab {
    pub fn filters(&self) -> Vec<Filter> {
        match self {
            WatchlistTab::All => Vec::new(),
            WatchlistTab::Favorites => vec![Filter::one("is_favorite", "true")],
            WatchlistTab::Gainers => vec![Filter::one("trend", Trend::Gain.as_str())],
            WatchlistTab::Losers => vec![Filter::one("trend", Trend::Loss.as_str())],
        }
    }
}

impl FromStr for WatchlistTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(WatchlistTab::All),
            "favorites" | "favourites" => Ok(WatchlistTab::Favorites),
            "gainers" => Ok(WatchlistTab::Gainers),
            "losers" => Ok(WatchlistTab::Losers),
            other => Err(format!("unknown watchlist tab '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{QueryParams, query};
    use crate::domain::record::assert_schema_consistent;

    fn entries() -> Vec<WatchlistEntry> {
        vec![
            WatchlistEntry::new("BTC", "Bitcoin", 26735.59, -5.12, 520.5, 32.1, true),
            WatchlistEntry::new("USDT", "Tether", 1.0, 0.22, 83.2, 45.3, false),
            WatchlistEntry::new("SUSHI", "SushiSwap", 0.8802, 0.60, 2.5, 1.2, true),
            WatchlistEntry::new("DAI", "Dai", 1.0, 0.0, 5.3, 0.2, false),
        ]
    }

    fn symbols_for(tab: WatchlistTab) -> Vec<String> {
        let data = entries();
        let params = QueryParams {
            filters: tab.filters(),
            ..QueryParams::sorted_by("symbol")
        };
        query(&data, &params)
            .unwrap()
            .items
            .iter()
            .map(|e| e.symbol().to_string())
            .collect()
    }

    #[test]
    fn trend_is_derived_from_change() {
        let data = entries();
        assert_eq!(data[0].trend(), Trend::Loss);
        assert_eq!(data[1].trend(), Trend::Gain);
        assert_eq!(data[3].trend(), Trend::Flat);
    }

    #[test]
    fn schema_is_consistent() {
        assert_schema_consistent(&entries()[0]);
    }

    #[test]
    fn favorites_tab() {
        assert_eq!(symbols_for(WatchlistTab::Favorites), vec!["BTC", "SUSHI"]);
    }

    #[test]
    fn gainers_and_losers_exclude_flat() {
        assert_eq!(symbols_for(WatchlistTab::Gainers), vec!["SUSHI", "USDT"]);
        assert_eq!(symbols_for(WatchlistTab::Losers), vec!["BTC"]);
    }

    #[test]
    fn all_tab_has_no_constraint() {
        assert_eq!(symbols_for(WatchlistTab::All).len(), 4);
    }

    #[test]
    fn tab_parses() {
        assert_eq!("Favourites".parse::<WatchlistTab>(), Ok(WatchlistTab::Favorites));
        assert!("trending".parse::<WatchlistTab>().is_err());
    }
}
