//! Chart of accounts domain types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ChartError;

/// The five account classes of the household chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Things the household owns.
    Asset,
    /// Things the household owes.
    Liability,
    /// Net assets.
    Equity,
    /// Income categories.
    Income,
    /// Expense categories.
    Expense,
}

impl AccountClass {
    /// All classes in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Returns the wire name of the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Base of the thousand-block reserved for root codes of this class.
    #[must_use]
    pub const fn code_block(self) -> u32 {
        match self {
            Self::Asset => 1000,
            Self::Liability => 2000,
            Self::Equity => 3000,
            Self::Income => 4000,
            Self::Expense => 5000,
        }
    }

    /// The usual normal balance direction for the class.
    #[must_use]
    pub const fn default_direction(self) -> BalanceDirection {
        match self {
            Self::Asset | Self::Expense => BalanceDirection::Debit,
            Self::Liability | Self::Equity | Self::Income => BalanceDirection::Credit,
        }
    }

    /// Returns true for classes shown on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountClass {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| ChartError::UnknownClass(s.to_string()))
    }
}

/// Normal balance direction of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDirection {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl BalanceDirection {
    /// Returns the wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Signs a debit/credit pair according to this direction.
    #[must_use]
    pub fn balance(self, total_debit: Decimal, total_credit: Decimal) -> Decimal {
        match self {
            Self::Debit => total_debit - total_credit,
            Self::Credit => total_credit - total_debit,
        }
    }
}

impl fmt::Display for BalanceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceDirection {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(ChartError::UnknownDirection(other.to_string())),
        }
    }
}

/// A storage-independent snapshot of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: Uuid,
    /// Owning book.
    pub book_id: Uuid,
    /// Hierarchical code, e.g. `1001-0201`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account class.
    pub class: AccountClass,
    /// Normal balance direction.
    pub direction: BalanceDirection,
    /// Parent account, if any.
    pub parent_id: Option<Uuid>,
    /// Display icon key.
    pub icon: Option<String>,
    /// Created by seeding or fallback migration rather than by a user.
    pub is_system: bool,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Display order among siblings.
    pub sort_order: i32,
}

/// One node of the display tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNode {
    /// The account itself.
    #[serde(flatten)]
    pub account: AccountRecord,
    /// True when no account in the same set names this one as parent.
    pub is_leaf: bool,
    /// Child nodes ordered by `(sort_order, code)`.
    pub children: Vec<AccountNode>,
}

impl AccountNode {
    /// Depth-first search for a node by account id.
    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&Self> {
        if self.account.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Chart of accounts grouped by class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountTree {
    /// Asset roots.
    pub asset: Vec<AccountNode>,
    /// Liability roots.
    pub liability: Vec<AccountNode>,
    /// Equity roots.
    pub equity: Vec<AccountNode>,
    /// Income roots.
    pub income: Vec<AccountNode>,
    /// Expense roots.
    pub expense: Vec<AccountNode>,
}

impl AccountTree {
    /// Returns the roots for one class.
    #[must_use]
    pub fn roots(&self, class: AccountClass) -> &[AccountNode] {
        match class {
            AccountClass::Asset => &self.asset,
            AccountClass::Liability => &self.liability,
            AccountClass::Equity => &self.equity,
            AccountClass::Income => &self.income,
            AccountClass::Expense => &self.expense,
        }
    }

    pub(crate) fn roots_mut(&mut self, class: AccountClass) -> &mut Vec<AccountNode> {
        match class {
            AccountClass::Asset => &mut self.asset,
            AccountClass::Liability => &mut self.liability,
            AccountClass::Equity => &mut self.equity,
            AccountClass::Income => &mut self.income,
            AccountClass::Expense => &mut self.expense,
        }
    }

    /// Finds a node anywhere in the tree.
    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&AccountNode> {
        AccountClass::ALL
            .into_iter()
            .flat_map(|class| self.roots(class))
            .find_map(|node| node.find(id))
    }
}

/// Outcome of moving a parent's historical lines to its fallback child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Whether any lines were moved.
    pub triggered: bool,
    /// The fallback account, when one was used.
    pub fallback_account_id: Option<Uuid>,
    /// Code of the fallback account.
    pub fallback_account_code: Option<String>,
    /// Number of lines re-pointed.
    pub migrated_lines_count: u64,
}

impl MigrationResult {
    /// A result for when nothing had to move.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}
