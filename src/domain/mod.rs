//! Core domain types and logic.

pub mod error;
pub mod record;
pub mod query;
pub mod order;
pub mod holding;
pub mod watchlist;
pub mod leaderboard;
pub mod candle;
pub mod mock;
pub mod settings;
pub mod config_validation;
