//! Record kinds, field schemas and typed field values.
//!
//! Every queryable collection holds a single record kind. A kind publishes
//! its schema as a static table, and field access goes through
//! [`Record::field`], so a misspelt field name is detected against the schema
//! instead of silently reading nothing.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use super::error::StocksimError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Order,
    Holding,
    WatchlistEntry,
    LeaderboardEntry,
    Standing,
    Candle,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Order => "order",
            RecordKind::Holding => "holding",
            RecordKind::WatchlistEntry => "watchlist entry",
            RecordKind::LeaderboardEntry => "leaderboard entry",
            RecordKind::Standing => "leaderboard standing",
            RecordKind::Candle => "candle",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldDef {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        FieldDef { name, ty }
    }
}

/// A borrowed view of one field of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

impl FieldValue<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Decimal(_) => FieldType::Decimal,
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Timestamp(_) => FieldType::Timestamp,
        }
    }

    /// Total order over values of the same field.
    ///
    /// Text compares byte-wise (case-sensitive), numbers numerically, booleans
    /// with `false < true`, timestamps chronologically. Values of one schema
    /// field always share a type, so the mixed arm only covers integer vs
    /// decimal.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Decimal(a), FieldValue::Decimal(b)) => a.total_cmp(b),
            (FieldValue::Integer(a), FieldValue::Decimal(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Decimal(a), FieldValue::Integer(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Exact-match test against a raw filter value.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            FieldValue::Text(s) => *s == raw,
            FieldValue::Integer(n) => raw
                .trim()
                .parse::<f64>()
                .is_ok_and(|v| v == *n as f64),
            FieldValue::Decimal(x) => raw.trim().parse::<f64>().is_ok_and(|v| v == *x),
            FieldValue::Boolean(b) => parse_bool(raw) == Some(*b),
            FieldValue::Timestamp(t) => parse_timestamp(raw) == Some(*t),
        }
    }
}

impl FieldValue<'_> {
    /// Lossless text form, readable back by the CSV adapter.
    pub fn to_raw(&self) -> String {
        match self {
            FieldValue::Decimal(x) => x.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            // Sub-unit prices (e.g. 0.8802) keep four places.
            FieldValue::Decimal(x) if x.abs() < 1.0 && *x != 0.0 => write!(f, "{x:.4}"),
            FieldValue::Decimal(x) => write!(f, "{x:.2}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
        }
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date
/// (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A record that the query engine can search, filter and sort.
pub trait Record {
    const KIND: RecordKind;

    /// Every field reachable through [`Record::field`], in display order.
    const SCHEMA: &'static [FieldDef];

    /// Text fields consulted by free-text search.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Returns `None` for names outside [`Record::SCHEMA`].
    fn field(&self, field: &str) -> Option<FieldValue<'_>>;

    /// Unique key within a collection (order id, symbol, or symbol and time
    /// for candles).
    fn key(&self) -> Cow<'_, str>;

    /// Kinds without a timestamp ignore date-range constraints.
    fn timestamp(&self) -> Option<NaiveDateTime> {
        None
    }
}

pub fn field_def<R: Record>(name: &str) -> Option<&'static FieldDef> {
    R::SCHEMA.iter().find(|def| def.name == name)
}

/// Rejects collections in which two records share a key.
pub fn ensure_unique_keys<R: Record>(records: &[R]) -> Result<(), StocksimError> {
    let mut seen = HashSet::new();
    for record in records {
        let key = record.key();
        if !seen.insert(key.clone()) {
            return Err(StocksimError::DuplicateKey {
                kind: R::KIND,
                key: key.into_owned(),
            });
        }
    }
    Ok(())
}

/// Asserts that every schema entry resolves to a value of the declared type
/// and that search fields are text.
#[cfg(test)]
pub(crate) fn assert_schema_consistent<R: Record>(sample: &R) {
    for def in R::SCHEMA {
        let value = sample
            .field(def.name)
            .unwrap_or_else(|| panic!("{} has no value for '{}'", R::KIND, def.name));
        assert_eq!(value.field_type(), def.ty, "type mismatch on '{}'", def.name);
    }
    for name in R::SEARCH_FIELDS {
        assert_eq!(
            field_def::<R>(name).map(|d| d.ty),
            Some(FieldType::Text),
            "search field '{name}' must be a text field"
        );
    }
    assert!(sample.field("no_such_field").is_none());
}
