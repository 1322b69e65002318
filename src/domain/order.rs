//! Order history records.

use super::record::{FieldDef, FieldType, FieldValue, Record, RecordKind};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(OrderSide::Buy),
            "sell" => Ok(OrderSide::Sell),
            other => Err(format!("unknown order side '{other}'")),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
    Processing,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Completed,
        OrderStatus::Processing,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "completed",
            OrderStatus::Processing => "processing",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(OrderStatus::Completed),
            "processing" => Ok(OrderStatus::Processing),
            "canceled" | "cancelled" => Ok(OrderStatus::Canceled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single buy or sell order. `total` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: String,
    side: OrderSide,
    symbol: String,
    quantity: i64,
    price: f64,
    total: f64,
    status: OrderStatus,
    timestamp: NaiveDateTime,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        side: OrderSide,
        symbol: impl Into<String>,
        quantity: i64,
        price: f64,
        status: OrderStatus,
        timestamp: NaiveDateTime,
    ) -> Self {
        Order {
            id: id.into(),
            side,
            symbol: symbol.into(),
            quantity,
            price,
            total: quantity as f64 * price,
            status,
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }
}

impl Record for Order {
    const KIND: RecordKind = RecordKind::Order;

    const SCHEMA: &'static [FieldDef] = &[
        FieldDef::new("id", FieldType::Text),
        FieldDef::new("side", FieldType::Text),
        FieldDef::new("symbol", FieldType::Text),
        FieldDef::new("quantity", FieldType::Integer),
        FieldDef::new("price", FieldType::Decimal),
        FieldDef::new("total", FieldType::Decimal),
        FieldDef::new("status", FieldType::Text),
        FieldDef::new("timestamp", FieldType::Timestamp),
    ];

    const SEARCH_FIELDS: &'static [&'static str] = &["symbol", "id"];

    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "id" => FieldValue::Text(&self.id),
            "side" => FieldValue::Text(self.side.as_str()),
            "symbol" => FieldValue::Text(&self.symbol),
            "quantity" => FieldValue::Integer(self.quantity),
            "price" => FieldValue::Decimal(self.price),
            "total" => FieldValue::Decimal(self.total),
            "status" => FieldValue::Text(self.status.as_str()),
            "timestamp" => FieldValue::Timestamp(self.timestamp),
            _ => return None,
        })
    }

    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }

    fn timestamp(&self) -> Option<NaiveDateTime> {
        Some(self.timestamp)
    }
}
