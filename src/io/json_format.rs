//! JSON report output
//!
//! The JSON form carries the whole report, including the transaction
//! entries that the CSV form leaves out. Amounts are written as strings so
//! no precision is lost.

use std::io::Write;

use crate::core::Report;
use crate::types::LedgerError;

/// Write a report as pretty-printed JSON followed by a newline
pub fn write_report_json(report: &Report, output: &mut dyn Write) -> Result<(), LedgerError> {
    serde_json::to_writer_pretty(&mut *output, report)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
