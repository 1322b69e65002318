//! CSV report adapter. Cells use the same display form as the table report.

use crate::domain::error::StocksimError;
use crate::domain::holding::PortfolioSummary;
use crate::domain::query::QueryResult;
use crate::domain::record::Record;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::io::Write;

pub struct CsvReport;

impl ReportPort for CsvReport {
    fn write_page<R: Record + Serialize>(
        &self,
        result: &QueryResult<'_, R>,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(R::SCHEMA.iter().map(|def| def.name))
            .map_err(std::io::Error::from)?;
        for record in &result.items {
            let cells = R::SCHEMA.iter().map(|def| {
                record
                    .field(def.name)
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            });
            wtr.write_record(cells).map_err(std::io::Error::from)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_summary(
        &self,
        summary: &PortfolioSummary,
        out: &mut dyn Write,
    ) -> Result<(), StocksimError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.serialize(summary).map_err(std::io::Error::from)?;
        wtr.flush()?;
        Ok(())
    }
}
