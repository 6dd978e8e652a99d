//! Per-user category definitions
//!
//! The registry keeps one partition per transaction kind. Lookups are always
//! scoped to a kind: an expense category is invisible when resolving an
//! income transaction and vice versa.
//!
//! # Label Resolution
//!
//! Resolving a label never fails. When a category cannot be found the
//! category id itself is shown instead, so every transaction renders with
//! some label.

use crate::types::{Category, Kind, LedgerError, Transaction};

/// Label shown for a transaction without any category id
const MISSING_LABEL: &str = "-";

/// Category registry split by transaction kind
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    income: Vec<Category>,
    expense: Vec<Category>,
}

impl CategoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a flat list of categories
    ///
    /// Categories whose id repeats within a partition are skipped; the first
    /// occurrence wins.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut registry = Self::new();
        for category in categories {
            if let Err(e) = registry.add(category) {
                tracing::warn!("Skipping category: {}", e);
            }
        }
        registry
    }

    fn partition(&self, kind: Kind) -> &Vec<Category> {
        match kind {
            Kind::Income => &self.income,
            Kind::Expense => &self.expense,
        }
    }

    fn partition_mut(&mut self, kind: Kind) -> &mut Vec<Category> {
        match kind {
            Kind::Income => &mut self.income,
            Kind::Expense => &mut self.expense,
        }
    }

    /// Add a category to the partition matching its kind
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateCategory` if the id is already used in
    /// that partition.
    pub fn add(&mut self, category: Category) -> Result<(), LedgerError> {
        if self.get(&category.id, category.kind).is_some() {
            return Err(LedgerError::DuplicateCategory { id: category.id });
        }
        self.partition_mut(category.kind).push(category);
        Ok(())
    }

    /// Look up a category within one kind
    pub fn get(&self, category_id: &str, kind: Kind) -> Option<&Category> {
        self.partition(kind).iter().find(|c| c.id == category_id)
    }

    /// All categories of a kind in insertion order
    pub fn categories(&self, kind: Kind) -> &[Category] {
        self.partition(kind)
    }

    /// Total number of categories across both kinds
    pub fn len(&self) -> usize {
        self.income.len() + self.expense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Display label for a category id
    ///
    /// Returns `"{icon} {name}"` when found in the `kind` partition and the id
    /// itself otherwise.
    pub fn resolve_label(&self, category_id: &str, kind: Kind) -> String {
        match self.get(category_id, kind) {
            Some(category) => category.label(),
            None if category_id.is_empty() => MISSING_LABEL.to_string(),
            None => category_id.to_string(),
        }
    }

    /// Display label for the category of a transaction
    pub fn label_for(&self, transaction: &Transaction) -> String {
        self.resolve_label(
            transaction.category_id.as_deref().unwrap_or_default(),
            transaction.kind,
        )
    }

    /// Whether a category may be deleted
    ///
    /// Only custom categories that no transaction references can go. The
    /// reference check matches on id alone, regardless of transaction kind.
    pub fn can_delete(&self, category_id: &str, kind: Kind, transactions: &[Transaction]) -> bool {
        self.deletion_blocker(category_id, kind, transactions).is_none()
    }

    fn deletion_blocker(
        &self,
        category_id: &str,
        kind: Kind,
        transactions: &[Transaction],
    ) -> Option<&'static str> {
        let Some(category) = self.get(category_id, kind) else {
            return Some("unknown category");
        };
        if !category.custom {
            return Some("built-in category");
        }

        let in_use = transactions
            .iter()
            .any(|t| t.category_id.as_deref() == Some(category_id));
        in_use.then_some("category is used by transactions")
    }

    /// Remove a custom, unreferenced category
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CategoryNotDeletable` with the reason when
    /// `can_delete` does not hold.
    pub fn remove(
        &mut self,
        category_id: &str,
        kind: Kind,
        transactions: &[Transaction],
    ) -> Result<Category, LedgerError> {
        if let Some(reason) = self.deletion_blocker(category_id, kind, transactions) {
            return Err(LedgerError::category_not_deletable(category_id, reason));
        }

        let partition = self.partition_mut(kind);
        let index = partition
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| LedgerError::category_not_deletable(category_id, "unknown category"))?;
        Ok(partition.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn category(id: &str, name: &str, kind: Kind, custom: bool) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: "*".to_string(),
            kind,
            custom,
        }
    }

    fn transaction(id: u64, kind: Kind, category_id: &str) -> Transaction {
        Transaction {
            id,
            kind,
            description: "tx".to_string(),
            amount: Decimal::ONE,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category_id: Some(category_id.to_string()),
            created_at: Utc::now(),
        }
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_categories([
            category("salary", "Salary", Kind::Income, false),
            category("food", "Food", Kind::Expense, false),
            category("hobby", "Hobby", Kind::Expense, true),
        ])
    }

    #[rstest]
    #[case::found("food", Kind::Expense, "* Food")]
    #[case::wrong_kind("food", Kind::Income, "food")]
    #[case::unknown("travel", Kind::Expense, "travel")]
    #[case::empty_id("", Kind::Income, "-")]
    fn test_resolve_label(#[case] id: &str, #[case] kind: Kind, #[case] expected: &str) {
        let label = registry().resolve_label(id, kind);
        assert_eq!(label, expected);
        assert!(!label.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate_in_same_partition() {
        let mut registry = registry();
        let result = registry.add(category("food", "Other food", Kind::Expense, true));
        assert_eq!(
            result,
            Err(LedgerError::DuplicateCategory {
                id: "food".to_string()
            })
        );
        assert_eq!(registry.categories(Kind::Expense).len(), 2);
    }

    #[test]
    fn test_same_id_allowed_in_other_partition() {
        let mut registry = registry();
        assert!(registry
            .add(category("food", "Food refund", Kind::Income, true))
            .is_ok());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_built_in_category_never_deletable() {
        let registry = registry();
        assert!(!registry.can_delete("food", Kind::Expense, &[]));
        assert!(!registry.can_delete("salary", Kind::Income, &[]));
    }

    #[test]
    fn test_referenced_custom_category_becomes_deletable_after_removal() {
        let registry = registry();
        let mut transactions = vec![transaction(1, Kind::Expense, "hobby")];

        assert!(!registry.can_delete("hobby", Kind::Expense, &transactions));

        transactions.clear();
        assert!(registry.can_delete("hobby", Kind::Expense, &transactions));
    }

    #[test]
    fn test_reference_check_ignores_transaction_kind() {
        let registry = registry();
        let transactions = vec![transaction(1, Kind::Income, "hobby")];
        assert!(!registry.can_delete("hobby", Kind::Expense, &transactions));
    }

    #[test]
    fn test_remove_custom_category() {
        let mut registry = registry();
        let removed = registry.remove("hobby", Kind::Expense, &[]).unwrap();
        assert_eq!(removed.id, "hobby");
        assert!(registry.get("hobby", Kind::Expense).is_none());
    }

    #[test]
    fn test_remove_built_in_category_fails() {
        let mut registry = registry();
        let result = registry.remove("food", Kind::Expense, &[]);
        assert!(matches!(
            result,
            Err(LedgerError::CategoryNotDeletable { .. })
        ));
        assert!(registry.get("food", Kind::Expense).is_some());
    }
}
