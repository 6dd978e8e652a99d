//! In-memory transaction collection for the active user
//!
//! This module provides the TransactionStore component that mirrors the
//! backing store's live (non-tombstoned) transactions. The store keeps
//! transactions in insertion order and derives the display order on read.
//!
//! # Display Order
//!
//! Reads are ordered by date, most recent first. Transactions on the same
//! date are ordered by insertion recency, most recently inserted first.
//!
//! # Removal
//!
//! `remove` only drops the in-memory copy. Callers must only invoke it after
//! the backing store has confirmed the tombstone.

use crate::types::{Kind, Transaction, TransactionId, TransactionPatch};
use std::cmp::Reverse;

/// Ordered in-memory transaction store
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    /// Transactions in insertion order
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        TransactionStore {
            transactions: Vec::new(),
        }
    }

    /// Build a store from transactions loaded from a backing store
    ///
    /// Insertion order is reconstructed from `created_at` (oldest first), so
    /// that same-day ties keep ordering by recency.
    pub fn from_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let mut transactions: Vec<Transaction> = transactions.into_iter().collect();
        transactions.sort_by_key(|t| (t.created_at, t.id));
        TransactionStore { transactions }
    }

    /// Append a transaction
    ///
    /// The id is supplied by the caller and expected to be unique.
    pub fn insert(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Get a transaction by id
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TransactionId) -> bool {
        self.get(id).is_some()
    }

    /// Highest id in the store
    pub fn max_id(&self) -> Option<TransactionId> {
        self.transactions.iter().map(|t| t.id).max()
    }

    /// Apply a partial update in place
    ///
    /// # Returns
    ///
    /// * `true` - If the transaction existed and was updated
    /// * `false` - If no transaction has that id (nothing changes)
    pub fn update(&mut self, id: TransactionId, patch: &TransactionPatch) -> bool {
        match self.transactions.iter_mut().find(|t| t.id == id) {
            Some(transaction) => {
                patch.apply_to(transaction);
                true
            }
            None => false,
        }
    }

    /// Drop a transaction from memory
    ///
    /// # Returns
    ///
    /// The removed transaction, or `None` if the id was not present
    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(index))
    }

    /// Transactions in display order, optionally restricted to one kind
    pub fn all(&self, kind: Option<Kind>) -> Vec<Transaction> {
        let mut ordered: Vec<(usize, &Transaction)> = self
            .transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| kind.map_or(true, |k| t.kind == k))
            .collect();
        ordered.sort_by_key(|&(index, t)| (Reverse(t.date), Reverse(index)));
        ordered.into_iter().map(|(_, t)| t.clone()).collect()
    }

    /// The `limit` most recent transactions in display order
    pub fn recent(&self, limit: usize) -> Vec<Transaction> {
        let mut all = self.all(None);
        all.truncate(limit);
        all
    }

    /// Transactions in insertion order
    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
