//! Report repository for ledger aggregation queries.
//!
//! Line totals are aggregated per account in SQL, then folded into
//! statements by [`ReportService`]. Composite reports read every statement
//! inside one transaction.

use std::collections::HashMap;

use chrono::NaiveDate;
use homebook_core::reports::{
    AccountActivity, BalanceSheet, BreakdownItem, Dashboard, IncomeStatement, RecentEntry,
    ReportError, ReportService, TrendPoint, month_end, month_start, previous_month_end,
    trend_dates,
};
use homebook_shared::AppError;
use homebook_shared::types::from_minor_units;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use super::entry::{lines_by_entry, net_worth_impact};
use super::support::{self, AccountIndex};
use crate::entities::{accounts, journal_entries, journal_lines};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// Report input or lookup error.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportQueryError> for AppError {
    fn from(err: ReportQueryError) -> Self {
        match err {
            ReportQueryError::Report(e) => e.into(),
            ReportQueryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Inclusive entry-date window; an open start means "since the beginning".
#[derive(Debug, Clone, Copy)]
struct Window {
    start: Option<NaiveDate>,
    end: NaiveDate,
}

impl Window {
    const fn until(end: NaiveDate) -> Self {
        Self { start: None, end }
    }

    const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end,
        }
    }
}

/// Report repository for ledger aggregation.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Direction-aware balance of one account over entries dated on or before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub async fn account_balance(
        &self,
        account_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Decimal, ReportQueryError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(ReportError::AccountNotFound(account_id))?;

        let totals = line_totals(&self.db, account.book_id, Window::until(as_of), Some(account_id))
            .await?;
        let (debit, credit) = totals.get(&account_id).copied().unwrap_or_default();

        let direction: homebook_core::chart::BalanceDirection = account.direction.into();
        Ok(direction.balance(debit, credit))
    }

    /// Balance sheet over every active account as of a date.
    ///
    /// # Errors
    ///
    /// Returns `BookNotFound` if the book does not exist.
    pub async fn balance_sheet(
        &self,
        book_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<BalanceSheet, ReportQueryError> {
        ensure_book(&self.db, book_id).await?;
        balance_sheet_in(&self.db, book_id, as_of).await
    }

    /// Income statement over entries dated within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` or `BookNotFound`.
    pub async fn income_statement(
        &self,
        book_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatement, ReportQueryError> {
        ReportService::ensure_range(start, end)?;
        ensure_book(&self.db, book_id).await?;
        income_statement_in(&self.db, book_id, start, end).await
    }

    /// Dashboard for `today`: net worth against the previous month end,
    /// the whole calendar month's income and expense, and the latest entries.
    ///
    /// # Errors
    ///
    /// Returns `BookNotFound` if the book does not exist.
    pub async fn dashboard(
        &self,
        book_id: Uuid,
        today: NaiveDate,
        recent_limit: u64,
    ) -> Result<Dashboard, ReportQueryError> {
        let txn = self.db.begin().await?;
        ensure_book(&txn, book_id).await?;

        let current = balance_sheet_in(&txn, book_id, today).await?;
        let previous = balance_sheet_in(&txn, book_id, previous_month_end(today)).await?;
        let month =
            income_statement_in(&txn, book_id, month_start(today), month_end(today)).await?;
        let recent = recent_entries(&txn, book_id, recent_limit).await?;
        txn.commit().await?;

        Ok(ReportService::dashboard(&current, &previous, &month, recent))
    }

    /// Month-end net worth over `months` months, oldest first; the current
    /// month is sampled at `today`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonths` or `BookNotFound`.
    pub async fn net_worth_trend(
        &self,
        book_id: Uuid,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<TrendPoint>, ReportQueryError> {
        ReportService::ensure_trend_months(months)?;
        let txn = self.db.begin().await?;
        ensure_book(&txn, book_id).await?;

        let mut points = Vec::new();
        for date in trend_dates(today, months) {
            let sheet = balance_sheet_in(&txn, book_id, date).await?;
            points.push(ReportService::trend_point(&sheet));
        }
        txn.commit().await?;

        Ok(points)
    }

    /// Expense accounts within `[start, end]` as shares of total expense.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` or `BookNotFound`.
    pub async fn expense_breakdown(
        &self,
        book_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BreakdownItem>, ReportQueryError> {
        let statement = self.income_statement(book_id, start, end).await?;
        Ok(ReportService::expense_breakdown(&statement))
    }

    /// Asset accounts as of a date as shares of total assets.
    ///
    /// # Errors
    ///
    /// Returns `BookNotFound` if the book does not exist.
    pub async fn asset_allocation(
        &self,
        book_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Vec<BreakdownItem>, ReportQueryError> {
        let sheet = self.balance_sheet(book_id, as_of).await?;
        Ok(ReportService::asset_allocation(&sheet))
    }
}

async fn ensure_book<C: ConnectionTrait>(conn: &C, book_id: Uuid) -> Result<(), ReportQueryError> {
    if support::book_exists(conn, book_id).await? {
        Ok(())
    } else {
        Err(ReportError::BookNotFound(book_id).into())
    }
}

async fn balance_sheet_in<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    as_of: NaiveDate,
) -> Result<BalanceSheet, ReportQueryError> {
    let rows = activity(conn, book_id, Window::until(as_of)).await?;
    Ok(ReportService::balance_sheet(as_of, rows))
}

async fn income_statement_in<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<IncomeStatement, ReportQueryError> {
    let rows = activity(conn, book_id, Window::between(start, end)).await?;
    Ok(ReportService::income_statement(start, end, rows)?)
}

/// Every active account of the book with its totals inside `window`.
async fn activity<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    window: Window,
) -> Result<Vec<AccountActivity>, DbErr> {
    let accounts = accounts::Entity::find()
        .filter(accounts::Column::BookId.eq(book_id))
        .filter(accounts::Column::IsActive.eq(true))
        .all(conn)
        .await?;
    let totals = line_totals(conn, book_id, window, None).await?;

    Ok(accounts
        .into_iter()
        .map(|account| {
            let (total_debit, total_credit) =
                totals.get(&account.id).copied().unwrap_or_default();
            AccountActivity {
                account_id: account.id,
                code: account.code,
                name: account.name,
                class: account.class.into(),
                direction: account.direction.into(),
                parent_id: account.parent_id,
                sort_order: account.sort_order,
                total_debit,
                total_credit,
            }
        })
        .collect())
}

/// Debit and credit sums per account for entries of the book inside `window`.
async fn line_totals<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    window: Window,
    account_id: Option<Uuid>,
) -> Result<HashMap<Uuid, (Decimal, Decimal)>, DbErr> {
    let mut query = journal_lines::Entity::find()
        .select_only()
        .column(journal_lines::Column::AccountId)
        .column_as(
            Expr::col((journal_lines::Entity, journal_lines::Column::DebitMinor)).sum(),
            "debit_minor",
        )
        .column_as(
            Expr::col((journal_lines::Entity, journal_lines::Column::CreditMinor)).sum(),
            "credit_minor",
        )
        .join(
            JoinType::InnerJoin,
            journal_lines::Relation::JournalEntries.def(),
        )
        .filter(journal_entries::Column::BookId.eq(book_id))
        .filter(journal_entries::Column::EntryDate.lte(window.end));

    if let Some(start) = window.start {
        query = query.filter(journal_entries::Column::EntryDate.gte(start));
    }
    if let Some(account_id) = account_id {
        query = query.filter(journal_lines::Column::AccountId.eq(account_id));
    }

    let rows: Vec<(Uuid, i64, i64)> = query
        .group_by(journal_lines::Column::AccountId)
        .into_tuple()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, debit, credit)| (id, (from_minor_units(debit), from_minor_units(credit))))
        .collect())
}

async fn recent_entries<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    limit: u64,
) -> Result<Vec<RecentEntry>, DbErr> {
    let entries = journal_entries::Entity::find()
        .filter(journal_entries::Column::BookId.eq(book_id))
        .order_by_desc(journal_entries::Column::EntryDate)
        .order_by_desc(journal_entries::Column::CreatedAt)
        .limit(limit)
        .all(conn)
        .await?;

    let index = AccountIndex::load(conn, book_id).await?;
    let lines = lines_by_entry(conn, entries.iter().map(|e| e.id)).await?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            let impact = lines
                .get(&entry.id)
                .map_or(Decimal::ZERO, |lines| net_worth_impact(&index, lines));
            RecentEntry {
                id: entry.id,
                entry_date: entry.entry_date,
                entry_type: entry.entry_type.into(),
                description: entry.description,
                note: entry.note,
                source: entry.source.into(),
                is_balanced: entry.is_balanced,
                created_at: entry.created_at,
                net_worth_impact: impact,
            }
        })
        .collect())
}
