//! Loading strategies for report generation
//!
//! This module defines the Strategy pattern for the complete report pipeline:
//! load a ledger from CSV inputs, build the report for a period, and write it
//! out. The strategies differ only in how the ledger is loaded:
//!
//! - `sync`: CSV rows are read with `SyncReader` straight into memory
//! - `async`: CSV rows are streamed in batches into a backing store, and the
//!   ledger is then loaded through the `BackingStore` contract

use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::{OutputFormat, StrategyType};
use crate::core::Ledger;
use crate::io::write_report;
use crate::types::{LedgerError, PeriodSpec, UserId};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncReportStrategy, LoadConfig};
pub use sync::SyncReportStrategy;

/// CSV files making up one user's ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSource {
    /// Owner of the imported rows
    pub user: UserId,
    pub transactions: PathBuf,
    /// Categories file; without one every label falls back to the id
    pub categories: Option<PathBuf>,
}

/// Everything needed to produce one report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub source: LedgerSource,
    pub period: PeriodSpec,
    pub today: NaiveDate,
    pub format: OutputFormat,
}

/// Report pipeline with a pluggable loading step
pub trait ReportStrategy: Send + Sync {
    /// Load the ledger described by `source`
    ///
    /// Malformed rows are logged and skipped. Only problems with the files
    /// themselves are returned as errors.
    fn load(&self, source: &LedgerSource) -> Result<Ledger, LedgerError>;

    /// Load the ledger, build the report and write it to `output`
    ///
    /// # Arguments
    ///
    /// * `request` - Input files, period and output format
    /// * `output` - Mutable reference to a writer for the report
    ///
    /// # Errors
    ///
    /// Returns an error if an input file cannot be read or the report cannot
    /// be written.
    fn process(&self, request: &ReportRequest, output: &mut dyn Write) -> Result<(), LedgerError> {
        let ledger = self.load(&request.source)?;
        let report = ledger.report(&request.period, request.today)?;
        write_report(&report, request.format, output)
    }
}

/// Create a report strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - Which loading strategy to use
/// * `config` - Batch configuration for the async strategy (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<LoadConfig>,
) -> Box<dyn ReportStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncReportStrategy),
        StrategyType::Async => Box::new(AsyncReportStrategy::new(config.unwrap_or_default())),
    }
}
