//! Shared fixtures for database integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use homebook_core::ledger::{Actor, EntryMeta, EntryShape, ExpenseShape};
use homebook_db::entities::sea_orm_active_enums::BookKind;
use homebook_db::migration::Migrator;
use homebook_db::repositories::EntryWithLines;
use homebook_db::{AccountRepository, BookRepository, EntryRepository};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

pub const OWNER_ID: Uuid = Uuid::from_u128(0xb00c);

/// A migrated in-memory database holding one book with the preset chart.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub book_id: Uuid,
    pub codes: HashMap<String, Uuid>,
}

impl Fixture {
    pub async fn new() -> Self {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let book = BookRepository::new(db.clone())
            .create_book("Test Household", BookKind::Family, OWNER_ID, true)
            .await
            .unwrap();
        let mut fixture = Self {
            db,
            book_id: book.id,
            codes: HashMap::new(),
        };
        fixture.reload_codes().await;
        fixture
    }

    /// Refreshes the code lookup after accounts were added.
    pub async fn reload_codes(&mut self) {
        self.codes = self
            .accounts()
            .list_accounts(self.book_id, true)
            .await
            .unwrap()
            .into_iter()
            .map(|a| (a.code, a.id))
            .collect();
    }

    pub fn account(&self, code: &str) -> Uuid {
        *self
            .codes
            .get(code)
            .unwrap_or_else(|| panic!("account {code} missing"))
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.db.clone())
    }

    pub fn entries(&self) -> EntryRepository {
        EntryRepository::new(self.db.clone())
    }

    /// Posts an expense from `payment` to `category`.
    pub async fn expense(
        &self,
        date: NaiveDate,
        amount: Decimal,
        category: &str,
        payment: &str,
    ) -> EntryWithLines {
        let shape = EntryShape::Expense(ExpenseShape {
            amount,
            category_account_id: self.account(category),
            payment_account_id: self.account(payment),
        });
        self.entries()
            .post_entry(
                self.book_id,
                &actor(),
                date,
                &shape,
                EntryMeta::described("test expense"),
            )
            .await
            .unwrap()
    }
}

pub fn actor() -> Actor {
    Actor::user(OWNER_ID)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
