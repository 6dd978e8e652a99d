//! Category types for the ledger

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::Kind;

/// Category identifier, unique per user
pub type CategoryId = String;

/// Icon used when a category is created without one
pub const DEFAULT_ICON: &str = "📌";

/// A user-visible category for income or expenses
///
/// Categories are never edited after creation. Built-in categories
/// (`custom == false`) can never be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub kind: Kind,
    pub custom: bool,
}

impl Category {
    /// Display label, e.g. `"🍔 Food"`
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

/// User input for a new custom category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub kind: Option<Kind>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        CategoryDraft {
            name: Some(name.into()),
            icon: None,
            kind: Some(kind),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Generate a collision-resistant category id
pub fn new_category_id() -> CategoryId {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_joins_icon_and_name() {
        let category = Category {
            id: "food".to_string(),
            name: "Food".to_string(),
            icon: "🍔".to_string(),
            kind: Kind::Expense,
            custom: false,
        };
        assert_eq!(category.label(), "🍔 Food");
    }

    #[test]
    fn test_new_category_ids_are_unique() {
        assert_ne!(new_category_id(), new_category_id());
    }
}
