//! Error types for the ledger
//!
//! This module defines the errors raised by ledger operations and the
//! errors reported by a backing store.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Missing or invalid transaction/category fields
//! - **Lookup Errors**: Edits or deletes referencing an unknown id
//! - **Sync Errors**: Backing-store round trips that failed
//! - **Arithmetic Errors**: Totals that do not fit in a `Decimal`
//! - **I/O Errors**: CSV import and report export failures

use thiserror::Error;

use super::category::CategoryId;
use super::transaction::TransactionId;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A required field is missing or invalid
    ///
    /// Raised before any state is touched.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// An edit or delete referenced a transaction that does not exist
    #[error("Transaction {id} not found for {operation}")]
    NotFound {
        id: TransactionId,
        operation: String,
    },

    /// A backing-store round trip failed
    ///
    /// For create and edit the local change has already been applied when
    /// this is reported. For delete the local ledger is left untouched.
    #[error("Sync failure during {operation}: {message}")]
    SyncFailure {
        operation: String,
        message: String,
    },

    /// A category with the same id already exists for that kind
    #[error("Category '{id}' already exists")]
    DuplicateCategory { id: CategoryId },

    /// A category cannot be removed
    #[error("Category '{id}' cannot be deleted: {reason}")]
    CategoryNotDeletable { id: CategoryId, reason: String },

    /// A total, balance or percentage does not fit in a `Decimal`
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Computation that would overflow
        operation: String,
    },

    /// I/O error while reading input or writing output
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Malformed CSV input
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        line: Option<u64>,
        message: String,
    },

    /// Report could not be serialized
    #[error("Output error: {message}")]
    Output { message: String },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::Output {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a Validation error
    pub fn validation(field: &str, message: &str) -> Self {
        LedgerError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: TransactionId, operation: &str) -> Self {
        LedgerError::NotFound {
            id,
            operation: operation.to_string(),
        }
    }

    /// Create a SyncFailure error from a backing-store error
    pub fn sync_failure(operation: &str, cause: &StoreError) -> Self {
        LedgerError::SyncFailure {
            operation: operation.to_string(),
            message: cause.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create a CategoryNotDeletable error
    pub fn category_not_deletable(id: &str, reason: &str) -> Self {
        LedgerError::CategoryNotDeletable {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors reported by a backing store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with the same primary key already exists
    #[error("{entity} '{id}' already exists")]
    Conflict { entity: String, id: String },

    /// No live record with that key for the user
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// The store could not be reached or failed internally
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn conflict(entity: &str, id: impl ToString) -> Self {
        StoreError::Conflict {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        StoreError::Unavailable {
            message: message.to_string(),
        }
    }
}
