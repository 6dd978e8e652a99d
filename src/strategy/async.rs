//! Asynchronous loading strategy
//!
//! This strategy imports the CSV files the way a client would populate a
//! remote store: rows are read in batches with `AsyncReader`, each batch is
//! written to a `MemoryBackingStore` concurrently, and the ledger is then
//! loaded back through the `BackingStore` contract with `Ledger::load`.
//!
//! # Architecture
//!
//! ```text
//! AsyncReportStrategy
//!     ├── LoadConfig (batch_size)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── MemoryBackingStore (per-user rows, DashMap)
//!     └── Ledger::load (concurrent list of transactions and categories)
//! ```

use futures::future::join_all;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;

use crate::core::{BackingStore, Ledger, MemoryBackingStore};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::CsvRow;
use crate::strategy::{LedgerSource, ReportStrategy};
use crate::types::{Category, LedgerError, StoreError, Transaction, UserId};

/// Configuration for batched imports
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    /// Number of CSV rows read and written per batch
    pub batch_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

impl LoadConfig {
    /// Create a LoadConfig, falling back to the default for a zero batch size
    pub fn new(batch_size: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        Self { batch_size }
    }
}

/// Batched import through a backing store
#[derive(Debug, Clone)]
pub struct AsyncReportStrategy {
    config: LoadConfig,
}

impl AsyncReportStrategy {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Import the CSV files into `backing` and load the ledger from it
    pub async fn load_into(
        &self,
        source: &LedgerSource,
        backing: &MemoryBackingStore,
    ) -> Result<Ledger, LedgerError> {
        if let Some(path) = &source.categories {
            let imported = import::<Category, _, _>(path, self.config.batch_size, |row| {
                backing.create_category(&source.user, row)
            })
            .await?;
            tracing::debug!("Imported {} categories from {}", imported, path.display());
        }

        let imported = import::<Transaction, _, _>(
            &source.transactions,
            self.config.batch_size,
            |row| backing.create_transaction(&source.user, row),
        )
        .await?;
        tracing::debug!(
            "Imported {} transactions from {}",
            imported,
            source.transactions.display()
        );

        Ledger::load(source.user.clone(), backing).await
    }
}

/// Stream a CSV file into a store, one concurrent write per row of a batch
///
/// Rows the store rejects are logged and skipped.
///
/// # Returns
///
/// The number of rows the store accepted
async fn import<T, F, Fut>(path: &Path, batch_size: usize, write: F) -> Result<usize, LedgerError>
where
    T: CsvRow,
    F: Fn(T) -> Fut,
    Fut: std::future::Future<Output = Result<T, StoreError>>,
{
    let file = tokio::fs::File::open(path).await.map_err(|e| LedgerError::Io {
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;

    let mut reader: AsyncReader<T, _> = AsyncReader::new(file.compat());
    let mut imported = 0;

    loop {
        let batch = reader.read_batch(batch_size).await;
        if batch.is_empty() {
            break;
        }

        for result in join_all(batch.into_iter().map(&write)).await {
            match result {
                Ok(_) => imported += 1,
                Err(e) => tracing::warn!("Skipping row in {}: {}", path.display(), e),
            }
        }
    }

    Ok(imported)
}

impl ReportStrategy for AsyncReportStrategy {
    fn load(&self, source: &LedgerSource) -> Result<Ledger, LedgerError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LedgerError::Io {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let backing = MemoryBackingStore::new();
        runtime.block_on(self.load_into(source, &backing))
    }
}

/// Convenience for callers that already run inside a runtime
pub async fn load_ledger(
    user: UserId,
    transactions: &Path,
    categories: Option<&Path>,
    config: LoadConfig,
) -> Result<Ledger, LedgerError> {
    let source = LedgerSource {
        user,
        transactions: transactions.to_path_buf(),
        categories: categories.map(Path::to_path_buf),
    };
    AsyncReportStrategy::new(config)
        .load_into(&source, &MemoryBackingStore::new())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncReportStrategy;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const TRANSACTIONS: &str = "id,kind,description,amount,date,category\n\
        1,income,Salary,100,2024-01-05,salary\n\
        2,expense,Lunch,30,2024-01-05,food\n\
        3,expense,Dinner,20,2024-02-01,food\n\
        3,expense,Duplicate,99,2024-02-01,food\n\
        4,expense,Broken,x,2024-02-01,food\n";

    const CATEGORIES: &str = "id,name,icon,kind,custom\n\
        salary,Salary,$,income,false\n\
        food,Food,*,expense,false\n";

    #[rstest]
    #[case(0, 1000)]
    #[case(1, 1)]
    #[case(250, 250)]
    fn test_load_config(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(LoadConfig::new(requested).batch_size, expected);
    }

    #[rstest]
    #[case::single_batch(1000)]
    #[case::many_batches(1)]
    fn test_async_strategy_matches_sync(#[case] batch_size: usize) {
        let transactions = create_temp_csv(TRANSACTIONS);
        let categories = create_temp_csv(CATEGORIES);
        let source = LedgerSource {
            user: "ana@example.com".to_string(),
            transactions: transactions.path().to_path_buf(),
            categories: Some(categories.path().to_path_buf()),
        };

        let from_async = AsyncReportStrategy::new(LoadConfig::new(batch_size))
            .load(&source)
            .unwrap();
        let from_sync = SyncReportStrategy.load(&source).unwrap();

        assert_eq!(from_async.store().len(), 3);
        assert_eq!(from_async.transactions(None), from_sync.transactions(None));
        assert_eq!(from_async.registry().len(), 2);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let source = LedgerSource {
            user: "ana".to_string(),
            transactions: "nonexistent.csv".into(),
            categories: None,
        };

        let result = AsyncReportStrategy::new(LoadConfig::default()).load(&source);
        assert!(matches!(result, Err(LedgerError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_ledger_inside_runtime() {
        let transactions = create_temp_csv(TRANSACTIONS);

        let ledger = load_ledger(
            "ana".to_string(),
            transactions.path(),
            None,
            LoadConfig::new(2),
        )
        .await
        .unwrap();

        assert_eq!(ledger.store().len(), 3);
        assert!(ledger.registry().is_empty());
    }
}
