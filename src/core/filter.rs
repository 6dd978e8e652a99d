//! Pure filters over transaction sequences
//!
//! Every function takes a slice and returns a new vector, preserving the
//! relative order of the input. None of them touch ledger state.

use chrono::NaiveDate;

use crate::core::category_registry::CategoryRegistry;
use crate::types::{Kind, PeriodSpec, Transaction};

/// Keep only transactions of one kind
pub fn by_kind(transactions: &[Transaction], kind: Kind) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .cloned()
        .collect()
}

/// Case-insensitive free-text search
///
/// A transaction matches when the term is a substring of its description,
/// of its amount written as a plain decimal (`100`, `12.5`), or of its
/// resolved category label. A blank term returns the input unchanged.
pub fn by_search(
    transactions: &[Transaction],
    term: &str,
    registry: &CategoryRegistry,
) -> Vec<Transaction> {
    if term.trim().is_empty() {
        return transactions.to_vec();
    }

    let needle = term.to_lowercase();
    transactions
        .iter()
        .filter(|t| matches_search(t, &needle, registry))
        .cloned()
        .collect()
}

fn matches_search(transaction: &Transaction, needle: &str, registry: &CategoryRegistry) -> bool {
    transaction.description.to_lowercase().contains(needle)
        || transaction.amount.normalize().to_string().contains(needle)
        || registry
            .label_for(transaction)
            .to_lowercase()
            .contains(needle)
}

/// Keep only transactions whose date falls in `period` relative to `today`
pub fn by_period(
    transactions: &[Transaction],
    period: &PeriodSpec,
    today: NaiveDate,
) -> Vec<Transaction> {
    if period.is_unbounded() {
        return transactions.to_vec();
    }

    transactions
        .iter()
        .filter(|t| period.contains(t.date, today))
        .cloned()
        .collect()
}
