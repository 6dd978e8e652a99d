//! Synchronous loading strategy
//!
//! Reads the categories and transactions files with `SyncReader` and builds
//! the ledger directly in memory, without going through a backing store.
//!
//! # Design
//!
//! The SyncReportStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Category bookkeeping to `CategoryRegistry`
//! - Ordering to `TransactionStore::from_transactions`, so the result matches
//!   a ledger loaded from a backing store

use std::collections::HashSet;
use std::path::Path;

use crate::core::{CategoryRegistry, Ledger, TransactionStore};
use crate::io::csv_format::CsvRow;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{LedgerSource, ReportStrategy};
use crate::types::{Category, LedgerError, Transaction};

/// Synchronous, single-threaded loading strategy
#[derive(Debug, Clone, Copy)]
pub struct SyncReportStrategy;

/// Read every valid row of a CSV file, logging the rest
fn read_rows<T: CsvRow>(path: &Path) -> Result<Vec<T>, LedgerError> {
    let mut rows = Vec::new();
    for result in SyncReader::<T>::new(path)? {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("Skipping row in {}: {}", path.display(), e),
        }
    }
    Ok(rows)
}

impl ReportStrategy for SyncReportStrategy {
    /// Load the ledger from CSV files
    ///
    /// Transactions whose id was already seen are skipped, as a backing
    /// store would reject them.
    fn load(&self, source: &LedgerSource) -> Result<Ledger, LedgerError> {
        let registry = match &source.categories {
            Some(path) => CategoryRegistry::from_categories(read_rows::<Category>(path)?),
            None => CategoryRegistry::new(),
        };

        let mut seen = HashSet::new();
        let transactions: Vec<Transaction> = read_rows::<Transaction>(&source.transactions)?
            .into_iter()
            .filter(|t| {
                let fresh = seen.insert(t.id);
                if !fresh {
                    tracing::warn!("Skipping duplicate transaction {}", t.id);
                }
                fresh
            })
            .collect();

        tracing::info!(
            "Loaded {} transactions and {} categories for {}",
            transactions.len(),
            registry.len(),
            source.user
        );

        Ok(Ledger::from_parts(
            source.user.clone(),
            registry,
            TransactionStore::from_transactions(transactions),
        ))
    }
}
