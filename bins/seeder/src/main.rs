//! Database seeder for Homebook development.
//!
//! Runs pending migrations, then creates a personal demo book with the preset
//! chart and a month of sample entries.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use homebook_core::ledger::{
    Actor, BorrowShape, EntryMeta, EntryShape, ExpenseShape, IncomeShape, LineDraft, RepayShape,
    TransferShape,
};
use homebook_db::entities::sea_orm_active_enums::BookKind;
use homebook_db::migration::Migrator;
use homebook_db::{AccountRepository, BookRepository, EntryRepository, ReportRepository};
use homebook_shared::AppConfig;
use homebook_shared::telemetry::init_tracing;
use rust_decimal_macros::dec;
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

/// Owner of the demo book (consistent across runs).
const DEMO_OWNER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let db = homebook_db::connect_with(&config.database)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.url))?;
    Migrator::up(&db, None).await.context("failed to run migrations")?;

    let book = BookRepository::new(db.clone())
        .create_book("Demo Household", BookKind::Personal, DEMO_OWNER_ID, true)
        .await?;

    let accounts = AccountRepository::new(db.clone())
        .list_accounts(book.id, false)
        .await?;
    let codes: HashMap<String, Uuid> = accounts.into_iter().map(|a| (a.code, a.id)).collect();
    let account = |code: &str| {
        codes
            .get(code)
            .copied()
            .with_context(|| format!("preset account {code} missing"))
    };

    let today = Utc::now().date_naive();
    let day = |d: u32| NaiveDate::from_ymd_opt(today.year(), today.month(), d.min(today.day()));
    let actor = Actor::user(DEMO_OWNER_ID);
    let entries = EntryRepository::new(db.clone());

    let cash = account("1001-01")?;
    let alipay = account("1001-0201")?;
    let wechat = account("1001-0202")?;
    let loan = account("2201")?;

    let samples = [
        (
            1,
            "Opening balances",
            EntryShape::manual(vec![
                LineDraft::debit(cash, dec!(800)),
                LineDraft::debit(alipay, dec!(12000)),
                LineDraft::credit(account("3001")?, dec!(12800)),
            ]),
        ),
        (
            1,
            "Car loan",
            EntryShape::Borrow(BorrowShape {
                amount: dec!(30000),
                payment_account_id: alipay,
                liability_account_id: loan,
            }),
        ),
        (
            5,
            "Monthly salary",
            EntryShape::Income(IncomeShape {
                amount: dec!(9500),
                category_account_id: account("4001")?,
                payment_account_id: alipay,
            }),
        ),
        (
            6,
            "Top up WeChat Pay",
            EntryShape::Transfer(TransferShape {
                amount: dec!(600),
                from_account_id: alipay,
                to_account_id: wechat,
            }),
        ),
        (
            8,
            "Groceries",
            EntryShape::Expense(ExpenseShape {
                amount: dec!(186.40),
                category_account_id: account("5001")?,
                payment_account_id: wechat,
            }),
        ),
        (
            10,
            "Metro card",
            EntryShape::Expense(ExpenseShape {
                amount: dec!(100),
                category_account_id: account("5002")?,
                payment_account_id: cash,
            }),
        ),
        (
            15,
            "Loan installment",
            EntryShape::Repay(RepayShape {
                principal: dec!(1200),
                interest: dec!(95.50),
                liability_account_id: loan,
                payment_account_id: alipay,
                interest_account_id: Some(account("5013")?),
            }),
        ),
    ];

    for (d, description, shape) in &samples {
        let date = day(*d).context("invalid sample date")?;
        entries
            .post_entry(book.id, &actor, date, shape, EntryMeta::described(*description))
            .await?;
    }

    let reports = ReportRepository::new(db);
    let sheet = reports.balance_sheet(book.id, today).await?;
    tracing::info!(
        book_id = %book.id,
        entries = samples.len(),
        net_worth = %sheet.net_worth(),
        balanced = sheet.is_balanced,
        "Demo book seeded"
    );

    let dashboard = reports
        .dashboard(book.id, today, config.reports.recent_entries)
        .await?;
    tracing::info!(
        month_income = %dashboard.month_income,
        month_expense = %dashboard.month_expense,
        change = %dashboard.net_worth_change,
        recent = dashboard.recent_entries.len(),
        "Dashboard"
    );
    for point in reports
        .net_worth_trend(book.id, today, config.reports.trend_months)
        .await?
    {
        tracing::debug!(month = %point.label, net_worth = %point.net_worth, "Trend");
    }

    Ok(())
}
