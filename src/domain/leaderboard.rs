//! Leaderboard entries and derived standings.
//!
//! An entry does not carry a rank. [`rank_by`] orders entries by a
//! caller-chosen criterion and pairs each with its 1-based position,
//! producing [`Standing`] records that the query engine can then search,
//! sort (including by `rank`) and paginate.

use super::error::QueryError;
use super::query::{QueryParams, SortDirection, query};
use super::record::{FieldDef, FieldType, FieldValue, Record, RecordKind};
use serde::Serialize;
use std::borrow::Cow;

pub const DEFAULT_RANK_CRITERION: &str = "portfolio_value";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub portfolio_value: f64,
    pub gain: f64,
    pub gain_pct: f64,
    pub trades: i64,
    pub win_rate: f64,
}

impl LeaderboardEntry {
    /// Builds an entry from a starting balance and percentage gain, deriving
    /// the gain amount and current portfolio value.
    pub fn from_performance(
        user_id: i64,
        username: impl Into<String>,
        initial_balance: f64,
        gain_pct: f64,
        trades: i64,
        win_rate: f64,
    ) -> Self {
        let gain = initial_balance * gain_pct / 100.0;
        LeaderboardEntry {
            user_id,
            username: username.into(),
            portfolio_value: initial_balance + gain,
            gain,
            gain_pct,
            trades,
            win_rate,
        }
    }
}

const ENTRY_FIELDS: [FieldDef; 7] = [
    FieldDef::new("user_id", FieldType::Integer),
    FieldDef::new("username", FieldType::Text),
    FieldDef::new("portfolio_value", FieldType::Decimal),
    FieldDef::new("gain", FieldType::Decimal),
    FieldDef::new("gain_pct", FieldType::Decimal),
    FieldDef::new("trades", FieldType::Integer),
    FieldDef::new("win_rate", FieldType::Decimal),
];

impl Record for LeaderboardEntry {
    const KIND: RecordKind = RecordKind::LeaderboardEntry;
    const SCHEMA: &'static [FieldDef] = &ENTRY_FIELDS;
    const SEARCH_FIELDS: &'static [&'static str] = &["username"];

    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "user_id" => FieldValue::Integer(self.user_id),
            "username" => FieldValue::Text(&self.username),
            "portfolio_value" => FieldValue::Decimal(self.portfolio_value),
            "gain" => FieldValue::Decimal(self.gain),
            "gain_pct" => FieldValue::Decimal(self.gain_pct),
            "trades" => FieldValue::Integer(self.trades),
            "win_rate" => FieldValue::Decimal(self.win_rate),
            _ => return None,
        })
    }

    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    rank: i64,
    #[serde(flatten)]
    entry: LeaderboardEntry,
}

impl Standing {
    pub fn rank(&self) -> i64 {
        self.rank
    }

    pub fn entry(&self) -> &LeaderboardEntry {
        &self.entry
    }
}

impl Record for Standing {
    const KIND: RecordKind = RecordKind::Standing;

    const SCHEMA: &'static [FieldDef] = &[
        FieldDef::new("rank", FieldType::Integer),
        ENTRY_FIELDS[0],
        ENTRY_FIELDS[1],
        ENTRY_FIELDS[2],
        ENTRY_FIELDS[3],
        ENTRY_FIELDS[4],
        ENTRY_FIELDS[5],
        ENTRY_FIELDS[6],
    ];

    const SEARCH_FIELDS: &'static [&'static str] = &["username"];

    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "rank" => Some(FieldValue::Integer(self.rank)),
            other => self.entry.field(other),
        }
    }

    fn key(&self) -> Cow<'_, str> {
        self.entry.key()
    }
}

/// Ranks entries by `criterion`. Rank 1 goes to the first entry in
/// `direction` order; equal scores keep input order.
pub fn rank_by(
    entries: &[LeaderboardEntry],
    criterion: &str,
    direction: SortDirection,
) -> Result<Vec<Standing>, QueryError> {
    let params = QueryParams {
        sort_direction: direction,
        page_size: entries.len().max(1),
        ..QueryParams::sorted_by(criterion)
    };
    let ordered = query(entries, &params)?;
    Ok(ordered
        .items
        .into_iter()
        .zip(1..)
        .map(|(entry, rank)| Standing {
            rank,
            entry: entry.clone(),
        })
        .collect())
}
