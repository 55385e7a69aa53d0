//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::period::month_label;
use super::types::{
    AccountActivity, BalanceSheet, BreakdownItem, Dashboard, ImpactLine, IncomeStatement,
    RecentEntry, StatementLine, StatementSection, TrendPoint,
};
use crate::chart::AccountClass;

/// Largest gap between assets and liabilities plus equity still reported as balanced.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// Breakdown rows with a smaller absolute amount are dropped.
const BREAKDOWN_THRESHOLD: Decimal = dec!(0.005);

/// Longest accepted trend.
pub const MAX_TREND_MONTHS: u32 = 120;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a balance sheet from cumulative activity up to `as_of`.
    ///
    /// Asset totals use raw debit minus credit so contra assets net out.
    /// Liabilities, equity, income, and expense use each account's direction.
    #[must_use]
    pub fn balance_sheet(as_of: NaiveDate, mut rows: Vec<AccountActivity>) -> BalanceSheet {
        Self::sort_rows(&mut rows);

        let mut assets = StatementSection::default();
        let mut liabilities = StatementSection::default();
        let mut equity = StatementSection::default();
        let mut income_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;

        for row in rows {
            match row.class {
                AccountClass::Asset => {
                    assets.total += row.net_debit();
                    assets.accounts.push(row.into());
                }
                AccountClass::Liability => Self::add_to_section(&mut liabilities, row),
                AccountClass::Equity => Self::add_to_section(&mut equity, row),
                AccountClass::Income => income_total += row.balance(),
                AccountClass::Expense => expense_total += row.balance(),
            }
        }

        let net_income = income_total - expense_total;
        let adjusted_equity = equity.total + net_income;
        let liabilities_and_equity = liabilities.total + adjusted_equity;
        let is_balanced = (assets.total - liabilities_and_equity).abs() < BALANCE_TOLERANCE;

        BalanceSheet {
            as_of,
            total_assets: assets.total,
            total_liabilities: liabilities.total,
            total_equity: equity.total,
            assets,
            liabilities,
            equity,
            net_income,
            adjusted_equity,
            liabilities_and_equity,
            is_balanced,
        }
    }

    /// Generates an income statement from activity within `[start, end]`.
    ///
    /// Rows of balance-sheet classes are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start` is after `end`.
    pub fn income_statement(
        start: NaiveDate,
        end: NaiveDate,
        mut rows: Vec<AccountActivity>,
    ) -> Result<IncomeStatement, ReportError> {
        Self::ensure_range(start, end)?;
        Self::sort_rows(&mut rows);

        let mut income = StatementSection::default();
        let mut expenses = StatementSection::default();
        for row in rows {
            match row.class {
                AccountClass::Income => Self::add_to_section(&mut income, row),
                AccountClass::Expense => Self::add_to_section(&mut expenses, row),
                _ => {}
            }
        }

        Ok(IncomeStatement {
            period_start: start,
            period_end: end,
            total_income: income.total,
            total_expense: expenses.total,
            net_income: income.total - expenses.total,
            income,
            expenses,
        })
    }

    /// Assets change minus liabilities change of one entry's lines.
    #[must_use]
    pub fn net_worth_impact(lines: &[ImpactLine]) -> Decimal {
        lines
            .iter()
            .map(|line| match line.class {
                AccountClass::Asset => line.debit - line.credit,
                AccountClass::Liability => -(line.credit - line.debit),
                _ => Decimal::ZERO,
            })
            .sum()
    }

    /// Assembles the dashboard from its three statements and recent entries.
    #[must_use]
    pub fn dashboard(
        current: &BalanceSheet,
        previous: &BalanceSheet,
        month: &IncomeStatement,
        recent_entries: Vec<RecentEntry>,
    ) -> Dashboard {
        Dashboard {
            as_of: current.as_of,
            net_worth: current.net_worth(),
            previous_net_worth: previous.net_worth(),
            net_worth_change: current.net_worth() - previous.net_worth(),
            total_assets: current.total_assets,
            total_liabilities: current.total_liabilities,
            month_income: month.total_income,
            month_expense: month.total_expense,
            month_net_income: month.net_income,
            recent_entries,
        }
    }

    /// One trend point from the balance sheet at its sample date.
    #[must_use]
    pub fn trend_point(sheet: &BalanceSheet) -> TrendPoint {
        TrendPoint {
            date: sheet.as_of,
            label: month_label(sheet.as_of),
            net_worth: sheet.net_worth(),
            total_assets: sheet.total_assets,
            total_liabilities: sheet.total_liabilities,
        }
    }

    /// Validates a trend length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonths` outside `1..=MAX_TREND_MONTHS`.
    pub fn ensure_trend_months(months: u32) -> Result<(), ReportError> {
        if months == 0 || months > MAX_TREND_MONTHS {
            return Err(ReportError::InvalidMonths {
                months,
                max: MAX_TREND_MONTHS,
            });
        }
        Ok(())
    }

    /// Expense accounts of an income statement as shares of total expense.
    #[must_use]
    pub fn expense_breakdown(statement: &IncomeStatement) -> Vec<BreakdownItem> {
        Self::breakdown(&statement.expenses.accounts, statement.total_expense)
    }

    /// Asset accounts of a balance sheet as shares of total assets.
    #[must_use]
    pub fn asset_allocation(sheet: &BalanceSheet) -> Vec<BreakdownItem> {
        Self::breakdown(&sheet.assets.accounts, sheet.total_assets)
    }

    /// Percentage of `amount` in `total`, rounded half-up to one decimal.
    ///
    /// Zero when `total` is zero.
    #[must_use]
    pub fn percentage(amount: Decimal, total: Decimal) -> Decimal {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(total))
            .map_or(Decimal::ZERO, |pct| {
                pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            })
    }

    /// Validates an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start` is after `end`.
    pub fn ensure_range(start: NaiveDate, end: NaiveDate) -> Result<(), ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    fn breakdown(rows: &[StatementLine], total: Decimal) -> Vec<BreakdownItem> {
        let mut items: Vec<BreakdownItem> = rows
            .iter()
            .filter(|row| row.balance.abs() >= BREAKDOWN_THRESHOLD)
            .map(|row| BreakdownItem {
                account_id: row.account_id,
                code: row.code.clone(),
                name: row.name.clone(),
                amount: row.balance,
                percentage: Self::percentage(row.balance, total),
            })
            .collect();
        items.sort_by(|a, b| b.amount.cmp(&a.amount));
        items
    }

    fn sort_rows(rows: &mut [AccountActivity]) {
        rows.sort_by(|a, b| {
            a.class
                .cmp(&b.class)
                .then(a.sort_order.cmp(&b.sort_order))
                .then_with(|| a.code.cmp(&b.code))
        });
    }

    fn add_to_section(section: &mut StatementSection, row: AccountActivity) {
        let line = StatementLine::from(row);
        section.total += line.balance;
        section.accounts.push(line);
    }
}
