//! In-memory backing store
//!
//! This module provides `MemoryBackingStore`, a `BackingStore` that keeps
//! every user's rows in process memory. It is used to seed ledgers from CSV
//! imports and to exercise the ledger's sync behavior in tests.
//!
//! # Design
//!
//! Rows are partitioned per user in a `DashMap`, so several ledger sessions
//! can share one store from different tasks. Deleted transactions are kept
//! as tombstones and never returned by listings.
//! Categories are listed by name.
//!
//! The store can be switched offline, in which case every operation fails
//! with `StoreError::Unavailable` and nothing changes.

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::traits::BackingStore;
use crate::types::{Category, StoreError, Transaction, TransactionId, TransactionPatch, UserId};

#[derive(Debug, Clone)]
struct StoredTransaction {
    transaction: Transaction,
    deleted: bool,
}

#[derive(Debug, Default)]
struct UserRows {
    transactions: Vec<StoredTransaction>,
    categories: Vec<Category>,
}

impl UserRows {
    fn live_mut(&mut self, id: TransactionId) -> Option<&mut StoredTransaction> {
        self.transactions
            .iter_mut()
            .find(|row| row.transaction.id == id && !row.deleted)
    }
}

/// Thread-safe in-memory `BackingStore`
#[derive(Debug, Default)]
pub struct MemoryBackingStore {
    users: DashMap<UserId, UserRows>,
    offline: AtomicBool,
}

impl MemoryBackingStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate the store becoming unreachable (or reachable again)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("backing store is offline"));
        }
        Ok(())
    }

    /// Number of tombstoned transactions for a user
    pub fn tombstone_count(&self, user: &UserId) -> usize {
        self.users
            .get(user)
            .map(|rows| rows.transactions.iter().filter(|row| row.deleted).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl BackingStore for MemoryBackingStore {
    async fn list_transactions(&self, user: &UserId) -> Result<Vec<Transaction>, StoreError> {
        self.ensure_online()?;

        let mut transactions: Vec<Transaction> = match self.users.get(user) {
            Some(rows) => rows
                .transactions
                .iter()
                .filter(|row| !row.deleted)
                .map(|row| row.transaction.clone())
                .collect(),
            None => Vec::new(),
        };
        transactions.sort_by_key(|t| (Reverse(t.date), Reverse(t.created_at)));
        Ok(transactions)
    }

    async fn list_categories(&self, user: &UserId) -> Result<Vec<Category>, StoreError> {
        self.ensure_online()?;

        let mut categories = self
            .users
            .get(user)
            .map(|rows| rows.categories.clone())
            .unwrap_or_default();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_transaction(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Transaction, StoreError> {
        self.ensure_online()?;

        let mut rows = self.users.entry(user.clone()).or_default();
        if rows
            .transactions
            .iter()
            .any(|row| row.transaction.id == transaction.id)
        {
            return Err(StoreError::conflict("transaction", transaction.id));
        }

        rows.transactions.push(StoredTransaction {
            transaction: transaction.clone(),
            deleted: false,
        });
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user: &UserId,
        id: TransactionId,
        patch: &TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        self.ensure_online()?;

        let mut rows = self
            .users
            .get_mut(user)
            .ok_or_else(|| StoreError::not_found("transaction", id))?;
        let row = rows
            .live_mut(id)
            .ok_or_else(|| StoreError::not_found("transaction", id))?;

        patch.apply_to(&mut row.transaction);
        Ok(row.transaction.clone())
    }

    async fn soft_delete_transaction(
        &self,
        user: &UserId,
        id: TransactionId,
    ) -> Result<(), StoreError> {
        self.ensure_online()?;

        let mut rows = self
            .users
            .get_mut(user)
            .ok_or_else(|| StoreError::not_found("transaction", id))?;
        let row = rows
            .live_mut(id)
            .ok_or_else(|| StoreError::not_found("transaction", id))?;

        row.deleted = true;
        Ok(())
    }

    async fn create_category(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<Category, StoreError> {
        self.ensure_online()?;

        let mut rows = self.users.entry(user.clone()).or_default();
        if rows
            .categories
            .iter()
            .any(|c| c.id == category.id && c.kind == category.kind)
        {
            return Err(StoreError::conflict("category", &category.id));
        }

        rows.categories.push(category.clone());
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn user(name: &str) -> UserId {
        name.to_string()
    }

    fn tx(id: TransactionId, date: (i32, u32, u32)) -> Transaction {
        Transaction {
            id,
            kind: Kind::Expense,
            description: format!("tx {}", id),
            amount: Decimal::new(10, 0),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category_id: Some("food".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(id as i64),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = MemoryBackingStore::new();
        let alice = user("alice@example.com");

        store.create_transaction(&alice, tx(1, (2024, 1, 5))).await.unwrap();
        store.create_transaction(&alice, tx(2, (2024, 2, 1))).await.unwrap();
        store.create_transaction(&alice, tx(3, (2024, 1, 5))).await.unwrap();

        let ids: Vec<_> = store
            .list_transactions(&alice)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = MemoryBackingStore::new();
        store
            .create_transaction(&user("alice"), tx(1, (2024, 1, 5)))
            .await
            .unwrap();

        assert!(store.list_transactions(&user("bob")).await.unwrap().is_empty());
        assert!(store.list_categories(&user("bob")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        store.create_transaction(&alice, tx(1, (2024, 1, 5))).await.unwrap();

        let result = store.create_transaction(&alice, tx(1, (2024, 3, 5))).await;
        assert_eq!(result, Err(StoreError::conflict("transaction", 1)));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_row_and_repeats_fail() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        store.create_transaction(&alice, tx(1, (2024, 1, 5))).await.unwrap();

        store.soft_delete_transaction(&alice, 1).await.unwrap();
        assert!(store.list_transactions(&alice).await.unwrap().is_empty());
        assert_eq!(store.tombstone_count(&alice), 1);

        let again = store.soft_delete_transaction(&alice, 1).await;
        assert_eq!(again, Err(StoreError::not_found("transaction", 1)));
    }

    #[tokio::test]
    async fn test_update_tombstoned_row_not_found() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        store.create_transaction(&alice, tx(1, (2024, 1, 5))).await.unwrap();
        store.soft_delete_transaction(&alice, 1).await.unwrap();

        let patch = TransactionPatch {
            description: Some("late edit".to_string()),
            ..Default::default()
        };
        let result = store.update_transaction(&alice, 1, &patch).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        store.create_transaction(&alice, tx(1, (2024, 1, 5))).await.unwrap();

        let patch = TransactionPatch {
            amount: Some(Decimal::new(99, 0)),
            ..Default::default()
        };
        let updated = store.update_transaction(&alice, 1, &patch).await.unwrap();
        assert_eq!(updated.amount, Decimal::new(99, 0));
        assert_eq!(updated.description, "tx 1");
    }

    #[tokio::test]
    async fn test_offline_store_rejects_everything() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        store.set_offline(true);

        let result = store.create_transaction(&alice, tx(1, (2024, 1, 5))).await;
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));

        store.set_offline(false);
        assert!(store.list_transactions(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_category() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        let category = Category {
            id: "pets".to_string(),
            name: "Pets".to_string(),
            icon: "🐶".to_string(),
            kind: Kind::Expense,
            custom: true,
        };

        store.create_category(&alice, category.clone()).await.unwrap();
        assert_eq!(store.list_categories(&alice).await.unwrap(), vec![category.clone()]);
        assert!(matches!(
            store.create_category(&alice, category).await,
            Err(StoreError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_categories_are_listed_by_name() {
        let store = MemoryBackingStore::new();
        let alice = user("alice");
        for (id, name, kind) in [
            ("rent", "Rent", Kind::Expense),
            ("bonus", "Bonus", Kind::Income),
            ("food", "Food", Kind::Expense),
        ] {
            let category = Category {
                id: id.to_string(),
                name: name.to_string(),
                icon: "📌".to_string(),
                kind,
                custom: true,
            };
            store.create_category(&alice, category).await.unwrap();
        }

        let names: Vec<String> = store
            .list_categories(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Bonus", "Food", "Rent"]);
    }
}
