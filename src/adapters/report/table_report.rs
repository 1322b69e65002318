//! Plain-text table report adapter.
//!
//! Columns follow the record schema; numeric and timestamp columns are
//! right-aligned, text and boolean columns left-aligned.

use crate::domain::error::StocksimError;
use crate::domain::holding::PortfolioSummary;
use crate::domain::query::QueryResult;
use crate::domain::record::{FieldType, Record};
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::io::Write;

pub const NO_RESULTS: &str = "No matching records.";

pub struct TableReport;

pub fn render_page<R: Record>(result: &QueryResult<'_, R>) -> String {
    if result.is_empty() {
        return format!("{NO_RESULTS}\n");
    }

    let headers: Vec<&str> = R::SCHEMA.iter().map(|def| def.name).collect();
    let rows: Vec<Vec<String>> = result
        .items
        .iter()
        .map(|record| {
            R::SCHEMA
                .iter()
                .map(|def| {
                    record
                        .field(def.name)
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .fold(h.len(), usize::max)
        })
        .collect();

    let mut output = String::new();
    push_row(&mut output, headers.iter().copied(), &widths, R::SCHEMA.iter().map(|_| false));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut output, rule.iter().map(String::as_str), &widths, R::SCHEMA.iter().map(|_| false));
    for row in &rows {
        push_row(
            &mut output,
            row.iter().map(String::as_str),
            &widths,
            R::SCHEMA.iter().map(|def| right_aligned(def.ty)),
        );
    }
    output.push_str(&format!(
        "\npage {} of {} ({} matched)\n",
        result.page, result.total_pages, result.total_matched
    ));
    output
}

fn right_aligned(ty: FieldType) -> bool {
    matches!(
        ty,
        FieldType::Integer | FieldType::Decimal | FieldType::Timestamp
    )
}

fn push_row<'a>(
    output: &mut String,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    align_right: impl Iterator<Item = bool>,
) {
    let line: Vec<String> = cells
        .zip(widths)
        .zip(align_right)
        .map(|((cell, &width), right)| {
            if right {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}

pub fn render_summary(summary: &PortfolioSummary) -> String {
    format!(
        "Holdings:     {}\nTotal value:  ${:.2}\nTotal P&L:    {}${:.2}\nP&L %:        {:+.2}%\n",
        summary.holdings,
        summary.total_value,
        if summary.total_pnl < 0.0 { "-" } else { "+" },
        summary.total_pnl.abs(),
        summary.pnl_pct,
    )
}

impl ReportPort for TableReport {
    fn write_page<R: Record + Serialize>(
        &self,
        result: &QueryResult<'_, R>,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError> {
        out.write_all(render_page(result).as_bytes())?;
        Ok(())
    }

    fn write_summary(
        &self,
        summary: &PortfolioSummary,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError> {
        out.write_all(render_summary(summary).as_bytes())?;
        Ok(())
    }
}
