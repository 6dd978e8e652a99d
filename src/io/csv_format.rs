//! CSV format handling for ledger imports and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for the transaction and category input files
//! - Conversion from CSV records to domain types (`CsvRow`)
//! - Report serialization as `section,key,value` rows
//!
//! All functions are pure (no file I/O) for easy testing.
//!
//! # Input Formats
//!
//! Transactions: `id,kind,description,amount,date,category,created_at`
//! (`category` and `created_at` may be empty).
//!
//! Categories: `id,name,icon,kind,custom` (`icon` and `custom` may be empty).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

use crate::core::Report;
use crate::types::{Category, Kind, LedgerError, Transaction, TransactionId, DEFAULT_ICON};

/// A domain type that can be built from one row of a CSV file
pub trait CsvRow: Sized {
    /// Raw row as deserialized by `csv`
    type Record: DeserializeOwned + Send + 'static;

    /// Validate and convert a raw row
    fn from_record(record: Self::Record) -> Result<Self, String>;
}

/// One row of a transactions CSV file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvTransactionRecord {
    pub id: TransactionId,
    pub kind: String,
    pub description: String,
    pub amount: String,
    pub date: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One row of a categories CSV file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvCategoryRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub custom: Option<String>,
}

/// Parse a transaction kind
///
/// Accepts `income`/`expense` and the `entrada`/`saida` spellings, in any
/// case.
pub fn parse_kind(value: &str) -> Result<Kind, String> {
    match value.trim().to_lowercase().as_str() {
        "income" | "entrada" => Ok(Kind::Income),
        "expense" | "saida" | "saída" => Ok(Kind::Expense),
        _ => Err(format!("Invalid transaction kind: '{}'", value)),
    }
}

/// Parse a calendar date
///
/// Only the leading `YYYY-MM-DD` part is used, so full timestamps such as
/// `2024-01-05T10:00:00Z` are accepted too.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| format!("Invalid date: '{}'", value))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CsvRow for Transaction {
    type Record = CsvTransactionRecord;

    /// Convert a CSV record into a `Transaction`
    ///
    /// When `created_at` is empty the id is read as a millisecond timestamp,
    /// which is how ids are generated.
    fn from_record(record: CsvTransactionRecord) -> Result<Self, String> {
        let kind = parse_kind(&record.kind).map_err(|e| format!("{} for tx {}", e, record.id))?;

        let description = record.description.trim().to_string();
        if description.is_empty() {
            return Err(format!("Missing description for tx {}", record.id));
        }

        let amount = Decimal::from_str(record.amount.trim())
            .map_err(|_| format!("Invalid amount '{}' for tx {}", record.amount, record.id))?;
        if amount < Decimal::ZERO {
            return Err(format!(
                "Negative amount '{}' for tx {}",
                record.amount, record.id
            ));
        }

        let date = parse_date(&record.date).map_err(|e| format!("{} for tx {}", e, record.id))?;

        let created_at = match non_empty(record.created_at) {
            Some(timestamp) => DateTime::parse_from_rfc3339(&timestamp)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| {
                    format!("Invalid created_at '{}' for tx {}", timestamp, record.id)
                })?,
            None => i64::try_from(record.id)
                .ok()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .unwrap_or_default(),
        };

        Ok(Transaction {
            id: record.id,
            kind,
            description,
            amount,
            date,
            category_id: non_empty(record.category),
            created_at,
        })
    }
}

impl CsvRow for Category {
    type Record = CsvCategoryRecord;

    fn from_record(record: CsvCategoryRecord) -> Result<Self, String> {
        let id = record.id.trim().to_string();
        if id.is_empty() {
            return Err("Missing category id".to_string());
        }

        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(format!("Missing name for category '{}'", id));
        }

        let kind = parse_kind(&record.kind).map_err(|e| format!("{} for category '{}'", e, id))?;

        let custom = match non_empty(record.custom) {
            Some(flag) => match flag.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(format!("Invalid custom flag '{}' for category '{}'", flag, id)),
            },
            None => false,
        };

        Ok(Category {
            icon: non_empty(record.icon).unwrap_or_else(|| DEFAULT_ICON.to_string()),
            id,
            name,
            kind,
            custom,
        })
    }
}

/// Write a report in CSV format
///
/// Writes three columns, `section,key,value`:
/// - `summary` rows for period, income, expense, balance, count and
///   expense_share
/// - one `category` row per expense category, in report order
/// - one `balance` row per date of the running balance
///
/// Amounts are written with two decimal places, the expense share with one.
///
/// # Arguments
///
/// * `report` - Report to write
/// * `output` - Mutable reference to a writer for outputting CSV
pub fn write_report_csv(report: &Report, output: &mut dyn Write) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["section", "key", "value"])?;

    let summary = &report.summary;
    let summary_rows = [
        ("period", report.period.label().to_string()),
        ("income", format!("{:.2}", summary.income)),
        ("expense", format!("{:.2}", summary.expense)),
        ("balance", format!("{:.2}", summary.balance)),
        ("count", summary.count.to_string()),
        ("expense_share", format!("{:.1}", report.expense_share)),
    ];
    for (key, value) in summary_rows {
        writer.write_record(["summary", key, value.as_str()])?;
    }

    for entry in &report.by_category {
        let amount = format!("{:.2}", entry.amount);
        writer.write_record(["category", entry.label.as_str(), amount.as_str()])?;
    }

    for point in &report.balance_series {
        let balance = format!("{:.2}", point.balance);
        writer.write_record(["balance", point.date.as_str(), balance.as_str()])?;
    }

    writer.flush()?;

    Ok(())
}
