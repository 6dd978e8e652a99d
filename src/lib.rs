//! Ledger Report Library
//! # Overview
//!
//! This library turns a personal-finance ledger (income and expense
//! transactions tagged with user categories) into dashboard figures and
//! period reports: totals, the share of income spent, expenses per category
//! and the running balance over time.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! TransactionStore + CategoryRegistry → filter → aggregator → report
//! ```
//!
//! - [`types`] - Core data types (Transaction, Category, PeriodSpec, errors)
//! - [`core`] - Business logic components:
//!   - [`core::filter`] - Pure filters by kind, search term and period
//!   - [`core::aggregator`] - Summaries and series
//!   - [`core::report`] - Report and dashboard builders
//!   - [`core::ledger`] - Per-user session kept in step with a backing store
//! - [`io`] - CSV import, CSV and JSON report output
//! - [`strategy`] - Sync and async loading pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Mutations
//!
//! Creating or editing a transaction is applied locally first and synced
//! afterwards; a failed sync is reported in the returned
//! [`MutationOutcome`]. Deleting waits for the backing store to confirm.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    build_dashboard, build_report, BackingStore, CategoryRegistry, Dashboard, Ledger,
    MemoryBackingStore, MutationOutcome, Report, SyncStatus, TransactionStore,
};
pub use io::{write_report_csv, write_report_json};
pub use types::{
    Category, CategoryDraft, Kind, LedgerError, PeriodSpec, StoreError, Transaction,
    TransactionDraft, TransactionId, TransactionPatch, UserId,
};
