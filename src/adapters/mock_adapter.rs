//! Deterministic mock data adapter.
//!
//! Each collection draws from its own generator seeded from the configured
//! seed, so reading orders never shifts the leaderboard and vice versa.

use crate::domain::candle::Candle;
use crate::domain::error::StocksimError;
use crate::domain::holding::Holding;
use crate::domain::leaderboard::LeaderboardEntry;
use crate::domain::mock;
use crate::domain::order::Order;
use crate::domain::settings::MockSettings;
use crate::domain::watchlist::WatchlistEntry;
use crate::ports::data_port::RecordSource;
use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;

const ORDER_STREAM: u64 = 1;
const LEADERBOARD_STREAM: u64 = 2;
const CANDLE_STREAM: u64 = 3;

pub struct MockAdapter {
    settings: MockSettings,
    now: NaiveDateTime,
}

impl MockAdapter {
    /// `now` anchors every generated timestamp.
    pub fn new(settings: MockSettings, now: NaiveDateTime) -> Self {
        Self { settings, now }
    }

    fn rng(&self, stream: u64) -> StdRng {
        StdRng::seed_from_u64(self.settings.seed.wrapping_add(stream))
    }
}

impl RecordSource for MockAdapter {
    fn orders(&self) -> Result<Vec<Order>, StocksimError> {
        let mut rng = self.rng(ORDER_STREAM);
        Ok(mock::generate_orders(&mut rng, self.now, self.settings.orders))
    }

    fn holdings(&self) -> Result<Vec<Holding>, StocksimError> {
        Ok(mock::sample_holdings())
    }

    fn watchlist(&self) -> Result<Vec<WatchlistEntry>, StocksimError> {
        Ok(mock::sample_watchlist())
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StocksimError> {
        let mut rng = self.rng(LEADERBOARD_STREAM);
        Ok(mock::generate_leaderboard(&mut rng))
    }

    fn candles(&self) -> Result<Vec<Candle>, StocksimError> {
        let mut rng = self.rng(CANDLE_STREAM);
        Ok(mock::generate_candles(
            &mut rng,
            &self.settings.symbol,
            self.now,
            self.settings.candle_days,
        ))
    }
}
