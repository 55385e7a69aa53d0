//! Book repository.

use std::collections::HashMap;

use chrono::Utc;
use homebook_core::chart::{ChartError, ChartService, PRESET_CHART};
use homebook_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::account::{AccountError, AccountRow, insert_account};
use crate::entities::{books, sea_orm_active_enums::BookKind};

/// Error types for book operations.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// Book or chart rule violation.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for BookError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Chart(e) => Self::Chart(e),
            AccountError::Database(e) => Self::Database(e),
        }
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Chart(e) => e.into(),
            BookError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Book repository.
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: DatabaseConnection,
}

impl BookRepository {
    /// Creates a new book repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a book, optionally seeding the preset household chart.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for a blank name or a database error.
    pub async fn create_book(
        &self,
        name: &str,
        kind: BookKind,
        owner_id: Uuid,
        seed_preset: bool,
    ) -> Result<books::Model, BookError> {
        let name = ChartService::validate_name(name)?;
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let book = books::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            kind: Set(kind),
            owner_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let seeded = if seed_preset {
            seed_preset_chart(&txn, book.id).await?
        } else {
            0
        };

        txn.commit().await?;

        tracing::info!(
            book_id = %book.id,
            owner_id = %owner_id,
            seeded_accounts = seeded,
            "Book created"
        );
        Ok(book)
    }

    /// Gets a book by ID.
    ///
    /// # Errors
    ///
    /// Returns `BookNotFound` if the book does not exist.
    pub async fn get_book(&self, book_id: Uuid) -> Result<books::Model, BookError> {
        books::Entity::find_by_id(book_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ChartError::BookNotFound(book_id).into())
    }
}

/// Inserts the preset chart, parents before their sub-accounts.
async fn seed_preset_chart<C: ConnectionTrait>(conn: &C, book_id: Uuid) -> Result<usize, BookError> {
    let mut ids: HashMap<&str, Uuid> = HashMap::with_capacity(PRESET_CHART.len());
    let ordered = PRESET_CHART
        .iter()
        .filter(|p| p.parent_code.is_none())
        .chain(PRESET_CHART.iter().filter(|p| p.parent_code.is_some()));

    for preset in ordered {
        let parent_id = preset.parent_code.and_then(|code| ids.get(code).copied());
        let account = insert_account(
            conn,
            AccountRow {
                book_id,
                code: preset.code.to_string(),
                name: preset.name.to_string(),
                class: preset.class,
                direction: preset.direction,
                parent_id,
                icon: Some(preset.icon.to_string()),
                is_system: true,
                sort_order: preset.sort_order,
            },
        )
        .await?;
        ids.insert(preset.code, account.id);
    }

    Ok(ids.len())
}
