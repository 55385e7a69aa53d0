//! Account repository for chart of accounts database operations.
//!
//! Leafness is never stored. Every write that depends on it loads the book's
//! accounts inside its own transaction and derives it from parent references.

use chrono::Utc;
use homebook_core::chart::{
    AccountClass, AccountRecord, AccountTree, BalanceDirection, ChartError, ChartService,
    MigrationResult, build_tree,
};
use homebook_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use super::support::{self, AccountIndex};
use crate::entities::{accounts, journal_lines};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Chart of accounts rule violation.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Chart(e) => e.into(),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Book the account belongs to.
    pub book_id: Uuid,
    /// Display name.
    pub name: String,
    /// Account class.
    pub class: AccountClass,
    /// Normal balance side; the class default when absent.
    pub direction: Option<BalanceDirection>,
    /// Parent account.
    pub parent_id: Option<Uuid>,
    /// Display icon.
    pub icon: Option<String>,
    /// Display order among siblings.
    pub sort_order: i32,
}

impl NewAccount {
    /// A root account of `class` with default direction.
    #[must_use]
    pub fn root(book_id: Uuid, name: impl Into<String>, class: AccountClass) -> Self {
        Self {
            book_id,
            name: name.into(),
            class,
            direction: None,
            parent_id: None,
            icon: None,
            sort_order: 0,
        }
    }

    /// A child of `parent_id` sharing `class`.
    #[must_use]
    pub fn child(
        book_id: Uuid,
        parent_id: Uuid,
        name: impl Into<String>,
        class: AccountClass,
    ) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::root(book_id, name, class)
        }
    }
}

/// Input for updating display attributes of an account.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    /// New name.
    pub name: Option<String>,
    /// New icon.
    pub icon: Option<String>,
    /// New display order.
    pub sort_order: Option<i32>,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists accounts of a book ordered by class, sort order, and code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        book_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find().filter(accounts::Column::BookId.eq(book_id));
        if !include_inactive {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }

        let mut rows = query
            .order_by_asc(accounts::Column::SortOrder)
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        rows.sort_by_key(|a| AccountClass::from(a.class));
        Ok(rows)
    }

    /// Gets one account of a book.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is not in the book.
    pub async fn get_account(
        &self,
        book_id: Uuid,
        account_id: Uuid,
    ) -> Result<accounts::Model, AccountError> {
        find_in_book(&self.db, book_id, account_id)
            .await?
            .ok_or_else(|| ChartError::AccountNotFound(account_id).into())
    }

    /// Builds the display tree of the book's active accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_tree(&self, book_id: Uuid) -> Result<AccountTree, AccountError> {
        let records = self
            .list_accounts(book_id, false)
            .await?
            .into_iter()
            .map(AccountRecord::from)
            .collect();
        Ok(build_tree(records))
    }

    /// Returns true when no active account names `account_id` as parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_leaf(&self, account_id: Uuid) -> Result<bool, AccountError> {
        Ok(support::active_children(&self.db, account_id).await? == 0)
    }

    /// Number of lines posted to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn line_count(&self, account_id: Uuid) -> Result<u64, AccountError> {
        Ok(support::line_count(&self.db, account_id).await?)
    }

    /// Creates an account with a generated code.
    ///
    /// When the parent is a leaf that already holds lines, those lines first
    /// move to the parent's fallback child so the parent can stop being a
    /// posting target.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The book or parent does not exist
    /// - The parent is in another book, inactive, or of another class
    /// - The code space under the parent or class is exhausted
    pub async fn create_account(
        &self,
        input: NewAccount,
    ) -> Result<(accounts::Model, MigrationResult), AccountError> {
        let name = ChartService::validate_name(&input.name)?;
        let txn = self.db.begin().await?;

        if !support::book_exists(&txn, input.book_id).await? {
            return Err(ChartError::BookNotFound(input.book_id).into());
        }
        let index = AccountIndex::load(&txn, input.book_id).await?;

        let parent = match input.parent_id {
            Some(parent_id) => {
                let parent = find_by_id(&txn, parent_id)
                    .await?
                    .ok_or(ChartError::ParentNotFound(parent_id))?;
                ChartService::validate_parent(
                    &AccountRecord::from(parent.clone()),
                    input.book_id,
                    input.class,
                )?;
                Some(parent)
            }
            None => None,
        };

        let migration = match &parent {
            Some(parent) => {
                let lines = support::line_count(&txn, parent.id).await?;
                if ChartService::needs_fallback(index.is_leaf(parent.id), lines) {
                    migrate_in(&txn, parent).await?
                } else {
                    MigrationResult::none()
                }
            }
            None => MigrationResult::none(),
        };

        let parent_record = parent.map(AccountRecord::from);
        let code = ChartService::generate_code(input.class, parent_record.as_ref(), index.codes())?;
        tracing::debug!(book_id = %input.book_id, code = %code, "Generated account code");

        let account = insert_account(
            &txn,
            AccountRow {
                book_id: input.book_id,
                code,
                name,
                class: input.class,
                direction: input.direction.unwrap_or_else(|| input.class.default_direction()),
                parent_id: input.parent_id,
                icon: input.icon,
                is_system: false,
                sort_order: input.sort_order,
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            book_id = %account.book_id,
            account_id = %account.id,
            code = %account.code,
            migrated = migration.migrated_lines_count,
            "Account created"
        );
        Ok((account, migration))
    }

    /// Moves every line of `parent_id` to its fallback child.
    ///
    /// A no-op when the account holds no lines.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is not in the book.
    pub async fn migrate_to_fallback(
        &self,
        book_id: Uuid,
        parent_id: Uuid,
    ) -> Result<MigrationResult, AccountError> {
        let txn = self.db.begin().await?;
        let parent = find_in_book(&txn, book_id, parent_id)
            .await?
            .ok_or(ChartError::AccountNotFound(parent_id))?;
        let result = migrate_in(&txn, &parent).await?;
        txn.commit().await?;
        Ok(result)
    }

    /// Updates the display attributes of an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `EmptyName`.
    pub async fn update_account(
        &self,
        book_id: Uuid,
        account_id: Uuid,
        update: AccountUpdate,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.get_account(book_id, account_id).await?;
        let mut active: accounts::ActiveModel = account.into();

        if let Some(name) = update.name {
            active.name = Set(ChartService::validate_name(&name)?);
        }
        if let Some(icon) = update.icon {
            active.icon = Set(Some(icon));
        }
        if let Some(sort_order) = update.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Deactivates an account that has no lines and no active children.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `HasPostings`, or `HasActiveChildren`.
    pub async fn deactivate_account(
        &self,
        book_id: Uuid,
        account_id: Uuid,
    ) -> Result<accounts::Model, AccountError> {
        let txn = self.db.begin().await?;
        let account = find_in_book(&txn, book_id, account_id)
            .await?
            .ok_or(ChartError::AccountNotFound(account_id))?;

        let lines = support::line_count(&txn, account_id).await?;
        let children = support::active_children(&txn, account_id).await?;
        ChartService::ensure_can_deactivate(account_id, lines, children)?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        let account = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(book_id = %book_id, account_id = %account_id, "Account deactivated");
        Ok(account)
    }
}

/// Column values of a new account row.
pub(crate) struct AccountRow {
    pub(crate) book_id: Uuid,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) class: AccountClass,
    pub(crate) direction: BalanceDirection,
    pub(crate) parent_id: Option<Uuid>,
    pub(crate) icon: Option<String>,
    pub(crate) is_system: bool,
    pub(crate) sort_order: i32,
}

pub(crate) async fn insert_account<C: ConnectionTrait>(
    conn: &C,
    row: AccountRow,
) -> Result<accounts::Model, AccountError> {
    let now = Utc::now();
    let code = row.code.clone();
    let account = accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        book_id: Set(row.book_id),
        code: Set(row.code),
        name: Set(row.name),
        class: Set(row.class.into()),
        direction: Set(row.direction.into()),
        parent_id: Set(row.parent_id),
        icon: Set(row.icon),
        is_system: Set(row.is_system),
        is_active: Set(true),
        sort_order: Set(row.sort_order),
        created_at: Set(now),
        updated_at: Set(now),
    };

    account.insert(conn).await.map_err(|err| {
        if support::is_unique_violation(&err) {
            ChartError::DuplicateCode(code).into()
        } else {
            err.into()
        }
    })
}

async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find_by_id(account_id).one(conn).await
}

async fn find_in_book<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    account_id: Uuid,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find_by_id(account_id)
        .filter(accounts::Column::BookId.eq(book_id))
        .one(conn)
        .await
}

/// Finds or creates the fallback child of `parent` and moves its lines there.
pub(crate) async fn migrate_in<C: ConnectionTrait>(
    conn: &C,
    parent: &accounts::Model,
) -> Result<MigrationResult, AccountError> {
    let lines = support::line_count(conn, parent.id).await?;
    if lines == 0 {
        return Ok(MigrationResult::none());
    }

    let plan = ChartService::fallback_for(&AccountRecord::from(parent.clone()));
    let existing = accounts::Entity::find()
        .filter(accounts::Column::BookId.eq(parent.book_id))
        .filter(accounts::Column::Code.eq(plan.code.as_str()))
        .one(conn)
        .await?;

    let fallback = match existing {
        Some(account) if account.is_active => account,
        Some(account) => {
            let mut active: accounts::ActiveModel = account.into();
            active.is_active = Set(true);
            active.updated_at = Set(Utc::now());
            active.update(conn).await?
        }
        None => {
            insert_account(
                conn,
                AccountRow {
                    book_id: parent.book_id,
                    code: plan.code,
                    name: plan.name,
                    class: plan.class,
                    direction: plan.direction,
                    parent_id: Some(plan.parent_id),
                    icon: parent.icon.clone(),
                    is_system: true,
                    sort_order: plan.sort_order,
                },
            )
            .await?
        }
    };

    let moved = journal_lines::Entity::update_many()
        .col_expr(journal_lines::Column::AccountId, Expr::value(fallback.id))
        .filter(journal_lines::Column::AccountId.eq(parent.id))
        .exec(conn)
        .await?
        .rows_affected;

    tracing::info!(
        book_id = %parent.book_id,
        parent_id = %parent.id,
        fallback_code = %fallback.code,
        migrated_lines = moved,
        "Moved parent history to fallback account"
    );

    Ok(MigrationResult {
        triggered: true,
        fallback_account_id: Some(fallback.id),
        fallback_account_code: Some(fallback.code),
        migrated_lines_count: moved,
    })
}
