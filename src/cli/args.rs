use crate::strategy::{LedgerSource, LoadConfig, ReportRequest};
use crate::types::{LedgerError, PeriodSpec};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Summarize income and expenses from ledger CSV files
#[derive(Parser, Debug)]
#[command(name = "ledger-report")]
#[command(about = "Summarize income and expenses from ledger CSV files", long_about = None)]
pub struct CliArgs {
    /// Transactions CSV file
    #[arg(value_name = "TRANSACTIONS", help = "Path to the transactions CSV file")]
    pub transactions: PathBuf,

    /// Categories CSV file
    #[arg(
        long = "categories",
        value_name = "FILE",
        help = "Path to the categories CSV file used to label transactions"
    )]
    pub categories: Option<PathBuf>,

    /// Owner of the imported rows
    #[arg(long = "user", value_name = "USER", default_value = "local")]
    pub user: String,

    /// Report window
    #[arg(
        long = "period",
        value_name = "PERIOD",
        default_value = "month",
        help = "Report period: 'month', 'quarter', 'year', 'custom' or 'all'"
    )]
    pub period: PeriodKind,

    /// First day of a custom period (YYYY-MM-DD)
    #[arg(long = "start", value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day of a custom period (YYYY-MM-DD)
    #[arg(long = "end", value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Reference date for relative periods (defaults to the local date)
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
    pub format: OutputFormat,

    /// Loading strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Loading strategy: 'sync' reads files directly, 'async' imports them through a backing store"
    )]
    pub strategy: StrategyType,

    /// Number of rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of rows per import batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,
}

/// Available loading strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Report output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Period names accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PeriodKind {
    Month,
    Quarter,
    Year,
    Custom,
    All,
}

impl CliArgs {
    /// Create a LoadConfig from CLI arguments
    pub fn to_load_config(&self) -> LoadConfig {
        match self.batch_size {
            Some(batch_size) => LoadConfig::new(batch_size),
            None => LoadConfig::default(),
        }
    }

    /// Resolve the period, pairing `custom` with `--start` and `--end`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` when `--start` or `--end` is given
    /// for a non-custom period, or when `--start` is after `--end`.
    pub fn to_period(&self) -> Result<PeriodSpec, LedgerError> {
        let has_bounds = self.start.is_some() || self.end.is_some();

        match self.period {
            PeriodKind::Custom => {
                if let (Some(start), Some(end)) = (self.start, self.end) {
                    if start > end {
                        return Err(LedgerError::validation("period", "start is after end"));
                    }
                }
                Ok(PeriodSpec::Custom {
                    start: self.start,
                    end: self.end,
                })
            }
            _ if has_bounds => Err(LedgerError::validation(
                "period",
                "--start and --end require --period custom",
            )),
            PeriodKind::Month => Ok(PeriodSpec::Month),
            PeriodKind::Quarter => Ok(PeriodSpec::Quarter),
            PeriodKind::Year => Ok(PeriodSpec::Year),
            PeriodKind::All => Ok(PeriodSpec::All),
        }
    }

    /// Build the full report request
    pub fn to_request(&self) -> Result<ReportRequest, LedgerError> {
        Ok(ReportRequest {
            source: LedgerSource {
                user: self.user.clone(),
                transactions: self.transactions.clone(),
                categories: self.categories.clone(),
            },
            period: self.to_period()?,
            today: self.today.unwrap_or_else(|| Local::now().date_naive()),
            format: self.format,
        })
    }
}
