//! Report adapters: aligned text tables, CSV and pretty-printed JSON.

pub mod csv_report;
pub mod json_report;
pub mod table_report;

pub use csv_report::CsvReport;
pub use json_report::JsonReport;
pub use table_report::TableReport;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
    Json,
}
