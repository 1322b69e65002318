//! Portfolio holdings and summary totals.

use super::record::{FieldDef, FieldType, FieldValue, Record, RecordKind};
use serde::Serialize;
use std::borrow::Cow;

/// A position in one symbol. Value and P&L are derived once in [`Holding::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    symbol: String,
    name: String,
    sector: String,
    quantity: i64,
    avg_cost: f64,
    current_price: f64,
    value: f64,
    pnl: f64,
    pnl_pct: f64,
}

impl Holding {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
        quantity: i64,
        avg_cost: f64,
        current_price: f64,
    ) -> Self {
        let value = quantity as f64 * current_price;
        let cost_basis = quantity as f64 * avg_cost;
        let pnl = value - cost_basis;
        let pnl_pct = if cost_basis != 0.0 {
            pnl / cost_basis * 100.0
        } else {
            0.0
        };
        Holding {
            symbol: symbol.into(),
            name: name.into(),
            sector: sector.into(),
            quantity,
            avg_cost,
            current_price,
            value,
            pnl,
            pnl_pct,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn avg_cost(&self) -> f64 {
        self.avg_cost
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn cost_basis(&self) -> f64 {
        self.quantity as f64 * self.avg_cost
    }

    pub fn pnl(&self) -> f64 {
        self.pnl
    }

    pub fn pnl_pct(&self) -> f64 {
        self.pnl_pct
    }
}

impl Record for Holding {
    const KIND: RecordKind = RecordKind::Holding;

    const SCHEMA: &'static [FieldDef] = &[
        FieldDef::new("symbol", FieldType::Text),
        FieldDef::new("name", FieldType::Text),
        FieldDef::new("sector", FieldType::Text),
        FieldDef::new("quantity", FieldType::Integer),
        FieldDef::new("avg_cost", FieldType::Decimal),
        FieldDef::new("current_price", FieldType::Decimal),
        FieldDef::new("value", FieldType::Decimal),
        FieldDef::new("pnl", FieldType::Decimal),
        FieldDef::new("pnl_pct", FieldType::Decimal),
    ];

    const SEARCH_FIELDS: &'static [&'static str] = &["symbol", "name"];

    fn field(&self, field: &str) -> Option<FieldValue<'_>> {
        Some(match field {
            "symbol" => FieldValue::Text(&self.symbol),
            "name" => FieldValue::Text(&self.name),
            "sector" => FieldValue::Text(&self.sector),
            "quantity" => FieldValue::Integer(self.quantity),
            "avg_cost" => FieldValue::Decimal(self.avg_cost),
            "current_price" => FieldValue::Decimal(self.current_price),
            "value" => FieldValue::Decimal(self.value),
            "pnl" => FieldValue::Decimal(self.pnl),
            "pnl_pct" => FieldValue::Decimal(self.pnl_pct),
            _ => return None,
        })
    }

    fn key(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub holdings: usize,
    pub total_value: f64,
    pub total_pnl: f64,
    /// P&L relative to the cost basis (`total_value - total_pnl`).
    pub pnl_pct: f64,
}

impl PortfolioSummary {
    pub fn compute(holdings: &[Holding]) -> Self {
        let total_value: f64 = holdings.iter().map(Holding::value).sum();
        let total_pnl: f64 = holdings.iter().map(Holding::pnl).sum();
        let cost_basis = total_value - total_pnl;
        let pnl_pct = if cost_basis != 0.0 {
            total_pnl / cost_basis * 100.0
        } else {
            0.0
        };
        PortfolioSummary {
            holdings: holdings.len(),
            total_value,
            total_pnl,
            pnl_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::assert_schema_consistent;
    use approx::assert_relative_eq;

    fn apple() -> Holding {
        Holding::new("AAPL", "Apple Inc.", "Technology", 15, 150.25, 187.82)
    }

    #[test]
    fn derived_fields() {
        let h = apple();
        assert_relative_eq!(h.value(), 2817.3, epsilon = 1e-6);
        assert_relative_eq!(h.pnl(), 2817.3 - 15.0 * 150.25, epsilon = 1e-6);
        assert_relative_eq!(h.pnl_pct(), 25.005, epsilon = 1e-3);
    }

    #[test]
    fn losing_position_has_negative_pnl() {
        let h = Holding::new("AMZN", "Amazon.com Inc.", "Consumer Cyclical", 5, 175.35, 169.95);
        assert!(h.pnl() < 0.0);
        assert_relative_eq!(h.pnl(), -27.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_cost_basis_has_zero_pct() {
        let h = Holding::new("FREE", "Gifted", "Other", 10, 0.0, 5.0);
        assert_relative_eq!(h.pnl(), 50.0);
        assert_relative_eq!(h.pnl_pct(), 0.0);
    }

    #[test]
    fn schema_is_consistent() {
        assert_schema_consistent(&apple());
    }

    #[test]
    fn summary_totals() {
        let holdings = vec![
            apple(),
            Holding::new("AMZN", "Amazon.com Inc.", "Consumer Cyclical", 5, 175.35, 169.95),
        ];
        let summary = PortfolioSummary::compute(&holdings);
        assert_eq!(summary.holdings, 2);
        assert_relative_eq!(summary.total_value, 2817.3 + 849.75, epsilon = 1e-6);
        let expected_pnl = holdings[0].pnl() + holdings[1].pnl();
        assert_relative_eq!(summary.total_pnl, expected_pnl, epsilon = 1e-6);
        assert_relative_eq!(
            summary.pnl_pct,
            expected_pnl / (summary.total_value - expected_pnl) * 100.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn empty_summary() {
        let summary = PortfolioSummary::compute(&[]);
        assert_eq!(summary.holdings, 0);
        assert_relative_eq!(summary.total_value, 0.0);
        assert_relative_eq!(summary.pnl_pct, 0.0);
    }
}
