//! I/O module
//!
//! Handles CSV import and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, report serialization)
//! - `json_format` - JSON report serialization
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{write_report_csv, CsvCategoryRecord, CsvRow, CsvTransactionRecord};
pub use json_format::write_report_json;
pub use sync_reader::SyncReader;

use std::io::Write;

use crate::cli::OutputFormat;
use crate::core::Report;
use crate::types::LedgerError;

/// Write a report in the requested format
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match format {
        OutputFormat::Csv => write_report_csv(report, output),
        OutputFormat::Json => write_report_json(report, output),
    }
}
