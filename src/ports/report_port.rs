//! Report output port trait.

use crate::domain::error::StocksimError;
use crate::domain::holding::PortfolioSummary;
use crate::domain::query::QueryResult;
use crate::domain::record::Record;
use serde::Serialize;
use std::io::Write;

/// Port for rendering query results and summaries to an output stream.
pub trait ReportPort {
    fn write_page<R: Record + Serialize>(
        &self,
        result: &QueryResult<'_, R>,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError>;

    fn write_summary(
        &self,
        summary: &PortfolioSummary,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError>;
}
