//! Report data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::{AccountClass, BalanceDirection};
use crate::ledger::{EntrySource, EntryType};

/// Debit/credit totals of one account over a date window.
///
/// Accounts without lines in the window carry zero totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActivity {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account class.
    pub class: AccountClass,
    /// Normal balance side.
    pub direction: BalanceDirection,
    /// Parent account.
    pub parent_id: Option<Uuid>,
    /// Display order among siblings.
    pub sort_order: i32,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

impl AccountActivity {
    /// Balance on the account's own normal side.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.direction.balance(self.total_debit, self.total_credit)
    }

    /// Debit minus credit, regardless of direction.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Account row of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account class.
    pub class: AccountClass,
    /// Normal balance side.
    pub direction: BalanceDirection,
    /// Parent account.
    pub parent_id: Option<Uuid>,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Direction-aware balance.
    pub balance: Decimal,
}

impl From<AccountActivity> for StatementLine {
    fn from(row: AccountActivity) -> Self {
        let balance = row.balance();
        Self {
            account_id: row.account_id,
            code: row.code,
            name: row.name,
            class: row.class,
            direction: row.direction,
            parent_id: row.parent_id,
            total_debit: row.total_debit,
            total_credit: row.total_credit,
            balance,
        }
    }
}

/// Rows of one class with their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<StatementLine>,
}

/// Balance sheet as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// As of date.
    pub as_of: NaiveDate,
    /// Asset rows; the total nets contra assets.
    pub assets: StatementSection,
    /// Liability rows.
    pub liabilities: StatementSection,
    /// Equity rows.
    pub equity: StatementSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity before current earnings.
    pub total_equity: Decimal,
    /// Income minus expense up to `as_of`.
    pub net_income: Decimal,
    /// Equity plus net income; the book's net worth.
    pub adjusted_equity: Decimal,
    /// Liabilities plus adjusted equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus adjusted equity within tolerance.
    pub is_balanced: bool,
}

impl BalanceSheet {
    /// Net worth of the book.
    #[must_use]
    pub const fn net_worth(&self) -> Decimal {
        self.adjusted_equity
    }
}

/// Income statement over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Income rows.
    pub income: StatementSection,
    /// Expense rows.
    pub expenses: StatementSection,
    /// Total income.
    pub total_income: Decimal,
    /// Total expense.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net_income: Decimal,
}

/// Minimal view of a posted line for net worth impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactLine {
    /// Class of the line's account.
    pub class: AccountClass,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Entry summary shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Business date.
    pub entry_date: NaiveDate,
    /// Entry type.
    pub entry_type: EntryType,
    /// Description.
    pub description: Option<String>,
    /// Note.
    pub note: Option<String>,
    /// Provenance tag.
    pub source: EntrySource,
    /// Balanced flag.
    pub is_balanced: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Change in assets minus change in liabilities.
    pub net_worth_impact: Decimal,
}

/// Dashboard metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Date the dashboard was computed for.
    pub as_of: NaiveDate,
    /// Net worth today.
    pub net_worth: Decimal,
    /// Net worth at the previous month end.
    pub previous_net_worth: Decimal,
    /// Change since the previous month end.
    pub net_worth_change: Decimal,
    /// Total assets today.
    pub total_assets: Decimal,
    /// Total liabilities today.
    pub total_liabilities: Decimal,
    /// Income this month.
    pub month_income: Decimal,
    /// Expense this month.
    pub month_expense: Decimal,
    /// Net income this month.
    pub month_net_income: Decimal,
    /// Most recent entries, newest first.
    pub recent_entries: Vec<RecentEntry>,
}

/// One point of the net worth trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Sample date.
    pub date: NaiveDate,
    /// `YYYY-MM` label.
    pub label: String,
    /// Net worth at `date`.
    pub net_worth: Decimal,
    /// Total assets at `date`.
    pub total_assets: Decimal,
    /// Total liabilities at `date`.
    pub total_liabilities: Decimal,
}

/// One slice of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Direction-aware balance.
    pub amount: Decimal,
    /// Share of the total, percent with one decimal.
    pub percentage: Decimal,
}
