//! Backing store abstraction
//!
//! The ledger never persists anything itself. Every durable change goes
//! through a `BackingStore`, which owns the authoritative copy of each
//! user's transactions and categories. Implementations may be remote
//! services or the in-memory store used for tests and CSV imports.

use async_trait::async_trait;

use crate::types::{Category, StoreError, Transaction, TransactionId, TransactionPatch, UserId};

/// Remote store keyed by owning user
///
/// All operations are scoped to one user: a transaction created for one user
/// is never visible to another.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Live (non-tombstoned) transactions, most recent date first
    async fn list_transactions(&self, user: &UserId) -> Result<Vec<Transaction>, StoreError>;

    /// All categories of the user, ordered by name
    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>, StoreError>;

    /// Persist a new transaction
    ///
    /// Fails with `StoreError::Conflict` if the id is already used.
    async fn create_transaction(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError>;

    /// Apply a partial update and return the stored result
    ///
    /// Fails with `StoreError::NotFound` if no live transaction has the id.
    async fn update_transaction(
        &self,
        user: &UserId,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError>;

    /// Tombstone a transaction
    ///
    /// Fails with `StoreError::NotFound` if the id is absent or already
    /// tombstoned.
    async fn soft_delete_transaction(
        &self,
        user: &UserId,
        id: TransactionId,
    ) -> Result<(), StoreError>;

    /// Persist a new category
    async fn create_category(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<Category, StoreError>;
}
