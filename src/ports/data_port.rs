//! Record source port trait.
//!
//! A source supplies whole collections; callers run queries over the
//! returned vectors.

use crate::domain::candle::Candle;
use crate::domain::error::StocksimError;
use crate::domain::holding::Holding;
use crate::domain::leaderboard::LeaderboardEntry;
use crate::domain::order::Order;
use crate::domain::watchlist::WatchlistEntry;

pub trait RecordSource {
    fn orders(&self) -> Result<Vec<Order>, StocksimError>;

    fn holdings(&self) -> Result<Vec<Holding>, StocksimError>;

    fn watchlist(&self) -> Result<Vec<WatchlistEntry>, StocksimError>;

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, StocksimError>;

    fn candles(&self) -> Result<Vec<Candle>, StocksimError>;
}
