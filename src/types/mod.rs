//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Transactions, kinds and edit inputs
//! - `category`: Categories and category inputs
//! - `period`: Calendar report windows
//! - `error`: Error types for the ledger and backing stores

pub mod category;
pub mod error;
pub mod period;
pub mod transaction;

pub use category::{new_category_id, Category, CategoryDraft, CategoryId, DEFAULT_ICON};
pub use error::{LedgerError, StoreError};
pub use period::PeriodSpec;
pub use transaction::{
    next_transaction_id, reserve_transaction_ids_through, Kind, Transaction, TransactionDraft,
    TransactionId, TransactionPatch,
};

/// Identity of the user owning a ledger
pub type UserId = String;
