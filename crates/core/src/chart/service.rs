//! Chart of accounts rules.
//!
//! Pure decisions used by the storage layer while it holds a transaction:
//! parent checks, code assignment, fallback planning, and deactivation guards.

use uuid::Uuid;

use super::code::{fallback_code, fallback_name, next_child_code, next_root_code};
use super::error::ChartError;
use super::types::{AccountClass, AccountRecord, BalanceDirection};

/// Sort order given to fallback accounts so they list after user children.
pub const FALLBACK_SORT_ORDER: i32 = 9999;

/// Attributes of the fallback child a parent's history moves into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPlan {
    /// `<parent code>-99`.
    pub code: String,
    /// `Unclassified <parent name>`.
    pub name: String,
    /// Same class as the parent.
    pub class: AccountClass,
    /// Same direction as the parent.
    pub direction: BalanceDirection,
    /// Parent account.
    pub parent_id: Uuid,
    /// Display order.
    pub sort_order: i32,
}

/// Stateless chart of accounts rules.
pub struct ChartService;

impl ChartService {
    /// Trims and checks an account name.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for blank names.
    pub fn validate_name(name: &str) -> Result<String, ChartError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ChartError::EmptyName);
        }
        Ok(trimmed.to_string())
    }

    /// Checks that `parent` may receive a new child of `class` in `book_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is in another book, inactive, or of another class.
    pub fn validate_parent(
        parent: &AccountRecord,
        book_id: Uuid,
        class: AccountClass,
    ) -> Result<(), ChartError> {
        if parent.book_id != book_id {
            return Err(ChartError::ParentWrongBook(parent.id));
        }
        if !parent.is_active {
            return Err(ChartError::ParentInactive(parent.id));
        }
        if parent.class != class {
            return Err(ChartError::ClassMismatch {
                parent: parent.class,
                child: class,
            });
        }
        Ok(())
    }

    /// Generates the code for a new account.
    ///
    /// `existing` should hold every code in the book, active or not.
    ///
    /// # Errors
    ///
    /// Returns `CodeSpaceExhausted` when no code is left.
    pub fn generate_code<'a, I>(
        class: AccountClass,
        parent: Option<&AccountRecord>,
        existing: I,
    ) -> Result<String, ChartError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        match parent {
            Some(parent) => next_child_code(&parent.code, existing),
            None => next_root_code(class, existing),
        }
    }

    /// A parent needs its history moved only while it is still a leaf that holds lines.
    #[must_use]
    pub const fn needs_fallback(parent_is_leaf: bool, parent_line_count: u64) -> bool {
        parent_is_leaf && parent_line_count > 0
    }

    /// Describes the fallback child for `parent`.
    #[must_use]
    pub fn fallback_for(parent: &AccountRecord) -> FallbackPlan {
        FallbackPlan {
            code: fallback_code(&parent.code),
            name: fallback_name(&parent.name),
            class: parent.class,
            direction: parent.direction,
            parent_id: parent.id,
            sort_order: FALLBACK_SORT_ORDER,
        }
    }

    /// Deactivation requires an account with no lines and no active children.
    ///
    /// # Errors
    ///
    /// Returns `HasPostings` or `HasActiveChildren`.
    pub fn ensure_can_deactivate(
        account_id: Uuid,
        line_count: u64,
        active_children: u64,
    ) -> Result<(), ChartError> {
        if line_count > 0 {
            return Err(ChartError::HasPostings {
                account_id,
                count: line_count,
            });
        }
        if active_children > 0 {
            return Err(ChartError::HasActiveChildren {
                account_id,
                count: active_children,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(class: AccountClass) -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            book_id: Uuid::from_u128(7),
            code: "5001".to_string(),
            name: "Food & Dining".to_string(),
            class,
            direction: class.default_direction(),
            parent_id: None,
            icon: None,
            is_system: true,
            is_active: true,
            sort_order: 100,
        }
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(ChartService::validate_name("  Coffee ").unwrap(), "Coffee");
        assert!(matches!(
            ChartService::validate_name("   "),
            Err(ChartError::EmptyName)
        ));
    }

    #[test]
    fn test_validate_parent() {
        let p = parent(AccountClass::Expense);
        let book = p.book_id;

        assert!(ChartService::validate_parent(&p, book, AccountClass::Expense).is_ok());
        assert!(matches!(
            ChartService::validate_parent(&p, Uuid::new_v4(), AccountClass::Expense),
            Err(ChartError::ParentWrongBook(_))
        ));
        assert!(matches!(
            ChartService::validate_parent(&p, book, AccountClass::Asset),
            Err(ChartError::ClassMismatch { .. })
        ));

        let inactive = AccountRecord {
            is_active: false,
            ..p
        };
        assert!(matches!(
            ChartService::validate_parent(&inactive, book, AccountClass::Expense),
            Err(ChartError::ParentInactive(_))
        ));
    }

    #[test]
    fn test_generate_code_dispatches_on_parent() {
        let p = parent(AccountClass::Expense);
        let existing = ["5001", "5002"];

        let root = ChartService::generate_code(AccountClass::Expense, None, existing).unwrap();
        let child = ChartService::generate_code(AccountClass::Expense, Some(&p), existing).unwrap();

        assert_eq!(root, "5003");
        assert_eq!(child, "5001-01");
    }

    #[test]
    fn test_needs_fallback() {
        assert!(ChartService::needs_fallback(true, 3));
        assert!(!ChartService::needs_fallback(true, 0));
        assert!(!ChartService::needs_fallback(false, 3));
    }

    #[test]
    fn test_fallback_plan_inherits_parent() {
        let p = parent(AccountClass::Expense);
        let plan = ChartService::fallback_for(&p);

        assert_eq!(plan.code, "5001-99");
        assert_eq!(plan.name, "Unclassified Food & Dining");
        assert_eq!(plan.class, AccountClass::Expense);
        assert_eq!(plan.direction, BalanceDirection::Debit);
        assert_eq!(plan.parent_id, p.id);
    }

    #[test]
    fn test_deactivation_guards() {
        let id = Uuid::new_v4();
        assert!(ChartService::ensure_can_deactivate(id, 0, 0).is_ok());
        assert!(matches!(
            ChartService::ensure_can_deactivate(id, 2, 0),
            Err(ChartError::HasPostings { count: 2, .. })
        ));
        assert!(matches!(
            ChartService::ensure_can_deactivate(id, 0, 1),
            Err(ChartError::HasActiveChildren { count: 1, .. })
        ));
    }
}
