//! Deterministic mock data for every record kind.
//!
//! Generators take the random source and the reference instant explicitly,
//! so a fixed seed and `now` always reproduce the same collections.

use super::candle::Candle;
use super::holding::Holding;
use super::leaderboard::LeaderboardEntry;
use super::order::{Order, OrderSide, OrderStatus};
use super::record::Record;
use super::watchlist::WatchlistEntry;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::Rng;

pub const ORDER_SYMBOLS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "JPM", "V", "JNJ", "PG", "NVDA",
];

/// Completed, processing, canceled.
pub const STATUS_WEIGHTS: [f64; 3] = [0.80, 0.15, 0.05];

pub const HISTORY_DAYS: i64 = 30;
pub const FIRST_ORDER_ID: usize = 1000;

pub const LEADERBOARD_USERS: [&str; 20] = [
    "TradeKing",
    "StockWhisperer",
    "InvestorPro",
    "MarketGuru",
    "WallStreetWizard",
    "BullMarket",
    "AssetAllocator",
    "TrendTrader",
    "DividendHunter",
    "SwingTrader",
    "GrowthInvestor",
    "ValueSeeker",
    "TechTrader",
    "ForexMaster",
    "CryptoKing",
    "DayTraderPro",
    "AlgoTrader",
    "FundManager",
    "RetailInvestor",
    "BogleHead",
];

pub const INITIAL_BALANCE: f64 = 100_000.0;

pub const MARKET_OPEN_HOUR: u32 = 9;
pub const MARKET_CLOSE_HOUR: u32 = 16;
pub const CANDLE_START_PRICE: f64 = 152.75;
pub const CANDLE_VOLATILITY: f64 = 5.0;
pub const MAX_ORDER_COUNT: usize = 100_000;
pub const MAX_CANDLE_DAYS: u32 = 3_650;

fn swing<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-1.0..1.0) * CANDLE_VOLATILITY
}

fn weighted_status<R: Rng + ?Sized>(rng: &mut R) -> OrderStatus {
    let roll: f64 = rng.gen_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (status, weight) in OrderStatus::ALL.iter().zip(STATUS_WEIGHTS) {
        cumulative += weight;
        if roll <= cumulative {
            return *status;
        }
    }
    OrderStatus::Completed
}

/// `count` orders spread over the last [`HISTORY_DAYS`] days during market
/// hours, newest first. Ids run from `ORD-1000` in generation order.
pub fn generate_orders<R: Rng + ?Sized>(
    rng: &mut R,
    now: NaiveDateTime,
    count: usize,
) -> Vec<Order> {
    let mut orders: Vec<Order> = (0..count)
        .map(|i| {
            let back = Duration::days(rng.gen_range(0..HISTORY_DAYS));
            let day = now.date().checked_sub_signed(back).unwrap_or(now.date());
            let time = NaiveTime::from_hms_opt(
                rng.gen_range(MARKET_OPEN_HOUR..=MARKET_CLOSE_HOUR),
                rng.gen_range(0..60),
                rng.gen_range(0..60),
            )
            .unwrap_or(NaiveTime::MIN);
            let side = if rng.gen_range(0..2) == 0 {
                OrderSide::Buy
            } else {
                OrderSide::Sell
            };
            let symbol = ORDER_SYMBOLS[rng.gen_range(0..ORDER_SYMBOLS.len())];
            let quantity = rng.gen_range(1..=20);
            let price = rng.gen_range(100..1000) as f64;
            let status = weighted_status(rng);
            Order::new(
                format!("ORD-{}", FIRST_ORDER_ID + i),
                side,
                symbol,
                quantity,
                price,
                status,
                day.and_time(time),
            )
        })
        .collect();
    orders.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    orders
}

pub fn sample_holdings() -> Vec<Holding> {
    vec![
        Holding::new("AAPL", "Apple Inc.", "Technology", 15, 150.25, 187.82),
        Holding::new("MSFT", "Microsoft Corp.", "Technology", 10, 290.12, 378.85),
        Holding::new("GOOGL", "Alphabet Inc.", "Technology", 8, 135.75, 142.5),
        Holding::new("AMZN", "Amazon.com Inc.", "Consumer Cyclical", 5, 175.35, 169.95),
        Holding::new("TSLA", "Tesla Inc.", "Automotive", 12, 900.5, 879.89),
        Holding::new("JPM", "JPMorgan Chase & Co.", "Financial Services", 20, 145.8, 153.15),
        Holding::new("V", "Visa Inc.", "Financial Services", 25, 210.9, 258.35),
    ]
}

pub fn sample_watchlist() -> Vec<WatchlistEntry> {
    vec![
        WatchlistEntry::new("BTC", "Bitcoin", 26735.59, -5.12, 520.5, 32.1, true),
        WatchlistEntry::new("ETH", "Ethereum", 1830.25, -3.25, 220.1, 18.7, true),
        WatchlistEntry::new("USDT", "Tether", 1.00, 0.22, 83.2, 45.3, false),
        WatchlistEntry::new("SUSHI", "SushiSwap", 0.8802, 0.60, 2.5, 1.2, true),
        WatchlistEntry::new("SOL", "Solana", 38.52, 2.18, 16.4, 2.8, false),
        WatchlistEntry::new("XRP", "Ripple", 0.53, -1.35, 28.7, 1.6, false),
        WatchlistEntry::new("ADA", "Cardano", 0.38, -2.41, 13.5, 0.9, false),
    ]
}

/// One entry per name in [`LEADERBOARD_USERS`], gains between -5% and +25%
/// of [`INITIAL_BALANCE`], ordered by portfolio value descending.
pub fn generate_leaderboard<R: Rng + ?Sized>(rng: &mut R) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = LEADERBOARD_USERS
        .iter()
        .zip(1..)
        .map(|(name, id)| {
            let gain_pct = rng.gen_range(-5.0..25.0);
            let trades = rng.gen_range(10..60);
            let win_rate = rng.gen_range(50..80) as f64;
            LeaderboardEntry::from_performance(id, *name, INITIAL_BALANCE, gain_pct, trades, win_rate)
        })
        .collect();
    entries.sort_by(|a, b| b.portfolio_value.total_cmp(&a.portfolio_value));
    entries
}

/// Hourly candles from market open to close for the `days` trading days
/// ending on `now`'s date, oldest first.
///
/// The first candle opens at [`CANDLE_START_PRICE`]; each later candle opens
/// at the previous close, with a random gap at the start of each day. High
/// and low always bracket open and close.
pub fn generate_candles<R: Rng + ?Sized>(
    rng: &mut R,
    symbol: &str,
    now: NaiveDateTime,
    days: u32,
) -> Vec<Candle> {
    let mut candles = Vec::new();
    let mut previous_close: Option<f64> = None;

    for day_offset in (0..i64::from(days)).rev() {
        let Some(date) = now.date().checked_sub_signed(Duration::days(day_offset)) else {
            continue;
        };
        for hour in MARKET_OPEN_HOUR..=MARKET_CLOSE_HOUR {
            let Some(at) = date.and_hms_opt(hour, 0, 0) else {
                continue;
            };
            let open = match previous_close {
                None => CANDLE_START_PRICE,
                Some(close) if hour == MARKET_OPEN_HOUR => close + swing(rng),
                Some(close) => close,
            };
            let high = open + swing(rng).abs();
            let low = open - swing(rng).abs();
            let close = (high + low) / 2.0 + swing(rng);
            let volume = rng.gen_range(500_000..1_500_000);
            candles.push(Candle::new(
                symbol,
                at,
                open,
                high.max(close),
                low.min(close),
                close,
                volume,
            ));
            previous_close = Some(close);
        }
    }
    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::parse_timestamp;
    use chrono::Timelike;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn now() -> NaiveDateTime {
        parse_timestamp("2024-06-14T16:00:00").unwrap()
    }

    #[test]
    fn orders_are_deterministic_for_a_seed() {
        let a = generate_orders(&mut StdRng::seed_from_u64(7), now(), 50);
        let b = generate_orders(&mut StdRng::seed_from_u64(7), now(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn orders_respect_field_ranges() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(1), now(), 200);
        let earliest = now().date() - Duration::days(HISTORY_DAYS - 1);
        for order in &orders {
            assert!((1..=20).contains(&order.quantity()));
            assert!((100.0..1000.0).contains(&order.price()));
            assert!(ORDER_SYMBOLS.contains(&order.symbol()));
            let ts = order.timestamp().unwrap();
            assert!(ts.date() >= earliest && ts.date() <= now().date());
            assert!((MARKET_OPEN_HOUR..=MARKET_CLOSE_HOUR).contains(&ts.hour()));
        }
    }

    #[test]
    fn orders_have_unique_ids_and_are_newest_first() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(3), now(), 50);
        let ids: HashSet<_> = orders.iter().map(|o| o.id().to_string()).collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.contains("ORD-1000") && ids.contains("ORD-1049"));
        assert!(
            orders
                .windows(2)
                .all(|w| w[0].timestamp() >= w[1].timestamp())
        );
    }

    #[test]
    fn status_weights_favor_completed() {
        let orders = generate_orders(&mut StdRng::seed_from_u64(11), now(), 2000);
        let completed = orders
            .iter()
            .filter(|o| o.status() == OrderStatus::Completed)
            .count();
        let canceled = orders
            .iter()
            .filter(|o| o.status() == OrderStatus::Canceled)
            .count();
        assert!(completed > 1400, "completed = {completed}");
        assert!(canceled < 250, "canceled = {canceled}");
    }

    #[test]
    fn leaderboard_has_every_user_sorted_by_value() {
        let entries = generate_leaderboard(&mut StdRng::seed_from_u64(5));
        assert_eq!(entries.len(), LEADERBOARD_USERS.len());
        assert!(
            entries
                .windows(2)
                .all(|w| w[0].portfolio_value >= w[1].portfolio_value)
        );
        for e in &entries {
            assert!((-5.0..25.0).contains(&e.gain_pct));
            assert!((10..60).contains(&e.trades));
            assert!((50.0..80.0).contains(&e.win_rate));
        }
    }

    #[test]
    fn candles_cover_market_hours_in_order() {
        let candles = generate_candles(&mut StdRng::seed_from_u64(9), "AAPL", now(), 5);
        assert_eq!(candles.len(), 5 * 8);
        assert!((candles[0].open() - CANDLE_START_PRICE).abs() < f64::EPSILON);
        assert!(
            candles
                .windows(2)
                .all(|w| w[0].timestamp() < w[1].timestamp())
        );
        assert_eq!(candles.last().unwrap().timestamp(), Some(now()));
    }

    #[test]
    fn candles_before_the_earliest_date_are_skipped() {
        let earliest = chrono::NaiveDate::MIN.and_hms_opt(16, 0, 0).unwrap();
        let candles = generate_candles(&mut StdRng::seed_from_u64(2), "AAPL", earliest, 3);
        assert_eq!(candles.len(), 8);
        assert!(candles.iter().all(|c| c.timestamp().unwrap().date() == earliest.date()));
    }

    #[test]
    fn candles_are_well_formed_and_continuous_within_a_day() {
        let candles = generate_candles(&mut StdRng::seed_from_u64(13), "AAPL", now(), 3);
        for c in &candles {
            assert!(c.high() >= c.open().max(c.close()));
            assert!(c.low() <= c.open().min(c.close()));
            assert!((500_000..1_500_000).contains(&c.volume()));
        }
        for pair in candles.windows(2) {
            let next_hour = pair[1].timestamp().unwrap().hour();
            if next_hour != MARKET_OPEN_HOUR {
                assert!((pair[1].open() - pair[0].close()).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn fixed_samples_have_unique_keys() {
        let holdings = sample_holdings();
        let keys: HashSet<_> = holdings.iter().map(|h| h.key().into_owned()).collect();
        assert_eq!(keys.len(), holdings.len());
        let watchlist = sample_watchlist();
        let keys: HashSet<_> = watchlist.iter().map(|w| w.key().into_owned()).collect();
        assert_eq!(keys.len(), watchlist.len());
    }
}
