//! Transaction-related types for the ledger
//!
//! This module defines the transaction kind, the stored transaction record,
//! and the partial inputs used to create and edit transactions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::category::CategoryId;

/// Transaction identifier
///
/// By convention a millisecond timestamp taken at creation time.
pub type TransactionId = u64;

/// Direction of a transaction
///
/// The amount of a transaction is always non-negative; whether it adds to or
/// subtracts from the balance is decided by its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Money coming in
    Income,

    /// Money going out
    Expense,
}

impl Kind {
    /// Apply the sign of this kind to a non-negative amount
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Kind::Income => amount,
            Kind::Expense => -amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Whether this is income or an expense
    pub kind: Kind,

    /// Free-text description, never empty
    pub description: String,

    /// Non-negative amount; the sign comes from `kind`
    pub amount: Decimal,

    /// Calendar date of the transaction (no time component)
    pub date: NaiveDate,

    /// Category reference, only `None` while a record is being repaired
    pub category_id: Option<CategoryId>,

    /// When the transaction was inserted into the ledger
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign implied by the transaction kind
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// User input for a new transaction
///
/// Every field is optional so that missing input can be reported as a
/// validation error instead of failing at construction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub kind: Option<Kind>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl TransactionDraft {
    /// Start a draft for the given kind
    pub fn new(kind: Kind) -> Self {
        TransactionDraft {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }
}

/// Partial update of an existing transaction
///
/// Only the fields that are `Some` are changed. The kind of a transaction
/// is fixed once recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
    }

    /// Copy the present fields onto a transaction
    pub fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(description) = &self.description {
            transaction.description = description.clone();
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(category_id) = &self.category_id {
            transaction.category_id = Some(category_id.clone());
        }
    }
}

static LAST_TRANSACTION_ID: AtomicU64 = AtomicU64::new(0);

/// Generate a new transaction id from the current time in milliseconds
///
/// Ids are strictly increasing within a process even when several
/// transactions are created in the same millisecond.
pub fn next_transaction_id() -> TransactionId {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_TRANSACTION_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_TRANSACTION_ID.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(current) => last = current,
        }
    }
}

/// Make every later `next_transaction_id` call return an id above `id`
///
/// Used when ids from elsewhere (another device, an import) are ahead of the
/// local clock.
pub fn reserve_transaction_ids_through(id: TransactionId) {
    LAST_TRANSACTION_ID.fetch_max(id, Ordering::Relaxed);
}
