//! Core business logic module
//!
//! This module contains the ledger aggregation and reporting components:
//! - `category_registry` - Per-user categories and label resolution
//! - `transaction_store` - In-memory transactions in display order
//! - `filter` - Pure filters by kind, search term and period
//! - `aggregator` - Totals, percentages and series
//! - `report` - Report and dashboard builders
//! - `ledger` - Per-user session sequencing mutations with a backing store
//! - `traits` - The `BackingStore` abstraction
//! - `memory_store` - In-memory `BackingStore` implementation

pub mod aggregator;
pub mod category_registry;
pub mod filter;
pub mod ledger;
pub mod memory_store;
pub mod report;
pub mod traits;
pub mod transaction_store;

pub use aggregator::{BalancePoint, BalanceTrend, CategoryTotal, Summary};
pub use category_registry::CategoryRegistry;
pub use ledger::{Ledger, MutationOutcome, SyncStatus, DASHBOARD_RECENT_LIMIT};
pub use memory_store::MemoryBackingStore;
pub use report::{build_dashboard, build_report, Dashboard, Report, ReportEntry};
pub use traits::BackingStore;
pub use transaction_store::TransactionStore;
