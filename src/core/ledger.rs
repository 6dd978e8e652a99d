//! Per-user ledger session
//!
//! A `Ledger` owns the in-memory state of one user: the category registry and
//! the transaction store. It validates user input, applies mutations locally
//! and keeps the backing store in step.
//!
//! # Mutation Rules
//!
//! - **Create / edit**: validated, applied locally, then synced. A failed sync
//!   does not undo the local change; it is reported through
//!   [`SyncStatus::LocalOnly`].
//! - **Delete**: the backing store is asked first. The local copy is only
//!   dropped after the tombstone is confirmed.
//! - **New category**: persisted remotely first, then added locally.
//!
//! Validation failures never change any state.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::core::category_registry::CategoryRegistry;
use crate::core::filter;
use crate::core::report::{self, Dashboard, Report};
use crate::core::traits::BackingStore;
use crate::core::transaction_store::TransactionStore;
use crate::types::{
    new_category_id, next_transaction_id, reserve_transaction_ids_through, Category,
    CategoryDraft, Kind, LedgerError, PeriodSpec, StoreError, Transaction, TransactionDraft,
    TransactionId, TransactionPatch, UserId, DEFAULT_ICON,
};

/// Number of transactions shown on the dashboard
pub const DASHBOARD_RECENT_LIMIT: usize = 5;

/// Whether a locally applied change reached the backing store
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    /// The backing store accepted the change
    Persisted,

    /// The change only exists in memory; the error says why
    LocalOnly(LedgerError),
}

/// Result of an optimistic mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub id: TransactionId,
    pub sync: SyncStatus,
}

impl MutationOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self.sync, SyncStatus::Persisted)
    }
}

/// In-memory ledger of one user
#[derive(Debug, Clone)]
pub struct Ledger {
    user: UserId,
    registry: CategoryRegistry,
    store: TransactionStore,
}

impl Ledger {
    /// Create an empty ledger for a user
    pub fn new(user: impl Into<UserId>) -> Self {
        Ledger {
            user: user.into(),
            registry: CategoryRegistry::new(),
            store: TransactionStore::new(),
        }
    }

    /// Create a ledger from already loaded state
    pub fn from_parts(
        user: impl Into<UserId>,
        registry: CategoryRegistry,
        store: TransactionStore,
    ) -> Self {
        Ledger {
            user: user.into(),
            registry,
            store,
        }
    }

    /// Load a user's ledger from a backing store
    ///
    /// Transactions and categories are fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::SyncFailure` if either listing fails.
    pub async fn load<S>(user: impl Into<UserId>, backing: &S) -> Result<Self, LedgerError>
    where
        S: BackingStore + ?Sized,
    {
        let user = user.into();
        let (transactions, categories) = futures::try_join!(
            backing.list_transactions(&user),
            backing.list_categories(&user)
        )
        .map_err(|e| LedgerError::sync_failure("load", &e))?;

        tracing::info!(
            "Loaded {} transactions and {} categories for {}",
            transactions.len(),
            categories.len(),
            user
        );

        Ok(Ledger {
            registry: CategoryRegistry::from_categories(categories),
            store: TransactionStore::from_transactions(transactions),
            user,
        })
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Record a new transaction
    ///
    /// # Arguments
    ///
    /// * `draft` - User input; every field is required
    /// * `backing` - Store to sync the new transaction to
    ///
    /// # Returns
    ///
    /// * `Ok(MutationOutcome)` - The transaction is in the ledger; `sync` says
    ///   whether it was persisted
    /// * `Err(LedgerError::Validation)` - Input was incomplete; nothing changed
    pub async fn add_transaction<S>(
        &mut self,
        draft: TransactionDraft,
        backing: &S,
    ) -> Result<MutationOutcome, LedgerError>
    where
        S: BackingStore + ?Sized,
    {
        let mut transaction = validate_draft(draft)?;
        if self.store.contains(transaction.id) {
            transaction.id = self.fresh_id();
        }
        let id = transaction.id;

        self.store.insert(transaction.clone());

        let sync = match backing.create_transaction(&self.user, transaction).await {
            Ok(_) => SyncStatus::Persisted,
            Err(e) => self.local_only("create", id, &e),
        };
        Ok(MutationOutcome { id, sync })
    }

    /// Edit description, amount, date or category of a transaction
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - No transaction has that id
    /// * `LedgerError::Validation` - The patch would blank a required field
    pub async fn edit_transaction<S>(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
        backing: &S,
    ) -> Result<MutationOutcome, LedgerError>
    where
        S: BackingStore + ?Sized,
    {
        if !self.store.contains(id) {
            return Err(LedgerError::not_found(id, "edit"));
        }
        validate_patch(&patch)?;

        self.store.update(id, &patch);

        let sync = match backing.update_transaction(&self.user, id, &patch).await {
            Ok(_) => SyncStatus::Persisted,
            Err(e) => self.local_only("edit", id, &e),
        };
        Ok(MutationOutcome { id, sync })
    }

    /// Delete a transaction once the backing store confirms the tombstone
    ///
    /// A remote not-found means the row is already gone and counts as
    /// success.
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - No transaction has that id locally
    /// * `LedgerError::SyncFailure` - The store failed; the ledger is unchanged
    pub async fn delete_transaction<S>(
        &mut self,
        id: TransactionId,
        backing: &S,
    ) -> Result<Transaction, LedgerError>
    where
        S: BackingStore + ?Sized,
    {
        if !self.store.contains(id) {
            return Err(LedgerError::not_found(id, "delete"));
        }

        match backing.soft_delete_transaction(&self.user, id).await {
            Ok(()) => {}
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!("Transaction {} was already deleted remotely", id);
            }
            Err(e) => {
                tracing::warn!("Failed to delete transaction {}: {}", id, e);
                return Err(LedgerError::sync_failure("delete", &e));
            }
        }

        self.store
            .remove(id)
            .ok_or_else(|| LedgerError::not_found(id, "delete"))
    }

    /// Create a custom category
    ///
    /// The category is only added locally after the backing store accepted
    /// it. A missing icon defaults to [`DEFAULT_ICON`].
    pub async fn add_category<S>(
        &mut self,
        draft: CategoryDraft,
        backing: &S,
    ) -> Result<Category, LedgerError>
    where
        S: BackingStore + ?Sized,
    {
        let category = validate_category(draft)?;
        if self.registry.get(&category.id, category.kind).is_some() {
            return Err(LedgerError::DuplicateCategory { id: category.id });
        }

        let created = backing
            .create_category(&self.user, category)
            .await
            .map_err(|e| {
                tracing::warn!("Failed to persist category: {}", e);
                LedgerError::sync_failure("create category", &e)
            })?;

        self.registry.add(created.clone())?;
        Ok(created)
    }

    /// Remove a custom category that no transaction uses
    pub fn remove_category(&mut self, id: &str, kind: Kind) -> Result<Category, LedgerError> {
        self.registry.remove(id, kind, self.store.as_slice())
    }

    pub fn can_delete_category(&self, id: &str, kind: Kind) -> bool {
        self.registry.can_delete(id, kind, self.store.as_slice())
    }

    /// Transactions in display order, optionally of one kind
    pub fn transactions(&self, kind: Option<Kind>) -> Vec<Transaction> {
        self.store.all(kind)
    }

    /// Transactions of one kind matching a free-text search, in display order
    pub fn search(&self, kind: Kind, term: &str) -> Vec<Transaction> {
        filter::by_search(&self.store.all(Some(kind)), term, &self.registry)
    }

    /// Report for a period as seen from `today`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ArithmeticOverflow` if the amounts in the period
    /// add up beyond what a `Decimal` holds.
    pub fn report(&self, period: &PeriodSpec, today: NaiveDate) -> Result<Report, LedgerError> {
        report::build_report(&self.store.all(None), &self.registry, period, today)
    }

    /// Report relative to the current UTC date
    pub fn report_now(&self, period: &PeriodSpec) -> Result<Report, LedgerError> {
        self.report(period, Utc::now().date_naive())
    }

    /// Dashboard over the whole ledger
    pub fn dashboard(&self) -> Result<Dashboard, LedgerError> {
        report::build_dashboard(&self.store.all(None), DASHBOARD_RECENT_LIMIT)
    }

    /// An id above every id already in the store
    fn fresh_id(&self) -> TransactionId {
        if let Some(max) = self.store.max_id() {
            reserve_transaction_ids_through(max);
        }
        let id = next_transaction_id();
        tracing::debug!("Generated id collided with a stored row, using {}", id);
        id
    }

    fn local_only(&self, operation: &str, id: TransactionId, cause: &StoreError) -> SyncStatus {
        tracing::warn!(
            "Transaction {} saved locally but {} failed to sync: {}",
            id,
            operation,
            cause
        );
        SyncStatus::LocalOnly(LedgerError::sync_failure(operation, cause))
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, LedgerError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(LedgerError::validation(field, "is required")),
    }
}

fn check_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::validation("amount", "must not be negative"));
    }
    Ok(amount)
}

fn validate_draft(draft: TransactionDraft) -> Result<Transaction, LedgerError> {
    let kind = draft
        .kind
        .ok_or_else(|| LedgerError::validation("kind", "is required"))?;
    let description = required_text(draft.description, "description")?;
    let amount = draft
        .amount
        .ok_or_else(|| LedgerError::validation("amount", "is required"))
        .and_then(check_amount)?;
    let date = draft
        .date
        .ok_or_else(|| LedgerError::validation("date", "is required"))?;
    let category_id = required_text(draft.category_id, "category")?;

    Ok(Transaction {
        id: next_transaction_id(),
        kind,
        description,
        amount,
        date,
        category_id: Some(category_id),
        created_at: Utc::now(),
    })
}

fn validate_patch(patch: &TransactionPatch) -> Result<(), LedgerError> {
    if let Some(description) = &patch.description {
        if description.trim().is_empty() {
            return Err(LedgerError::validation("description", "is required"));
        }
    }
    if let Some(amount) = patch.amount {
        check_amount(amount)?;
    }
    if let Some(category_id) = &patch.category_id {
        if category_id.trim().is_empty() {
            return Err(LedgerError::validation("category", "is required"));
        }
    }
    Ok(())
}

fn validate_category(draft: CategoryDraft) -> Result<Category, LedgerError> {
    let name = required_text(draft.name, "name")?;
    let kind = draft
        .kind
        .ok_or_else(|| LedgerError::validation("kind", "is required"))?;
    let icon = draft
        .icon
        .filter(|icon| !icon.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ICON.to_string());

    Ok(Category {
        id: new_category_id(),
        name,
        icon,
        kind,
        custom: true,
    })
}
