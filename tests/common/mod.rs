#![allow(dead_code)]

use chrono::NaiveDateTime;
use stocksim::domain::candle::Candle;
use stocksim::domain::error::StocksimError;
use stocksim::domain::holding::Holding;
use stocksim::domain::leaderboard::LeaderboardEntry;
use stocksim::domain::order::{Order, OrderSide, OrderStatus};
use stocksim::domain::record::parse_timestamp;
use stocksim::domain::watchlist::WatchlistEntry;
use stocksim::ports::data_port::RecordSource;

/// In-memory record source with optional injected failure.
#[derive(Default)]
pub struct MockSource {
    pub orders: Vec<Order>,
    pub holdings: Vec<Holding>,
    pub watchlist: Vec<WatchlistEntry>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub candles: Vec<Candle>,
    pub error: Option<String>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_holdings(mut self, holdings: Vec<Holding>) -> Self {
        self.holdings = holdings;
        self
    }

    pub fn with_watchlist(mut self, watchlist: Vec<WatchlistEntry>) -> Self {
        self.watchlist = watchlist;
        self
    }

    pub fn with_leaderboard(mut self, leaderboard: Vec<LeaderboardEntry>) -> Self {
        self.leaderboard = leaderboard;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn check(&self) -> Result<(), StocksimError> {
        match &self.error {
            Some(reason) => Err(StocksimError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl RecordSource for MockSource {
    fn orders(&self) -> Result<Vec<Order>, StocksimError> {
        self.check()?;
        Ok(self.orders.clone())
    }

    fn holdings(&self) -> Result<Vec<Holding>, StocksimError> {
        self.check()?;
        Ok(self.holdings.clone())
    }

    fn watchlist(&self) -> Result<Vec<WatchlistEntry>, StocksimError> {
        self.check()?;
        Ok(self.watchlist.clone())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StocksimError> {
        self.check()?;
        Ok(self.leaderboard.clone())
    }

    fn candles(&self) -> Result<Vec<Candle>, StocksimError> {
        self.check()?;
        Ok(self.candles.clone())
    }
}

pub fn ts(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap()
}

pub fn make_order(id: &str, symbol: &str, price: f64, status: OrderStatus, at: &str) -> Order {
    Order::new(id, OrderSide::Buy, symbol, 1, price, status, ts(at))
}

pub fn make_holding(symbol: &str, quantity: i64, avg_cost: f64, current_price: f64) -> Holding {
    Holding::new(symbol, format!("{symbol} Corp."), "Technology", quantity, avg_cost, current_price)
}

pub fn make_watchlist_entry(symbol: &str, price: f64, change: f64, favorite: bool) -> WatchlistEntry {
    WatchlistEntry::new(symbol, symbol, price, change, 1.0, 1.0, favorite)
}

/// `count` watchlist entries `SYM00`, `SYM01`, ... with increasing prices.
pub fn make_watchlist(count: usize) -> Vec<WatchlistEntry> {
    (0..count)
        .map(|i| make_watchlist_entry(&format!("SYM{i:02}"), 10.0 + i as f64, 0.5, i % 2 == 0))
        .collect()
}

pub fn make_leaderboard_entry(id: i64, name: &str, gain_pct: f64, trades: i64) -> LeaderboardEntry {
    LeaderboardEntry::from_performance(id, name, 100_000.0, gain_pct, trades, 60.0)
}
