//! JSON report adapter.

use crate::domain::error::StocksimError;
use crate::domain::holding::PortfolioSummary;
use crate::domain::query::QueryResult;
use crate::domain::record::Record;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::io::Write;

pub struct JsonReport;

fn write_pretty<T: Serialize + ?Sized>(value: &T, out: &mut dyn Write) -> Result<(), StocksimError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

impl ReportPort for JsonReport {
    fn write_page<R: Record + Serialize>(
        &self,
        result: &QueryResult<'_, R>,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError> {
        write_pretty(result, out)
    }

    fn write_summary(
        &self,
        summary: &PortfolioSummary,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError> {
        write_pretty(summary, out)
    }
}
