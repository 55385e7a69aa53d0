//! Helpers shared by repositories while they hold a transaction.
//!
//! Every function takes a generic connection so callers pass the open
//! `DatabaseTransaction` and all reads happen inside it.

use std::collections::{HashMap, HashSet};

use homebook_core::chart;
use homebook_core::ledger::{AccountInfo, LedgerError, LineDraft};
use homebook_shared::types::to_minor_units;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{accounts, books, journal_lines};

/// Every account of a book, with parent references resolved.
pub(crate) struct AccountIndex {
    accounts: HashMap<Uuid, accounts::Model>,
    parents: HashSet<Uuid>,
}

impl AccountIndex {
    /// Loads all accounts of `book_id`, active or not.
    pub(crate) async fn load<C: ConnectionTrait>(conn: &C, book_id: Uuid) -> Result<Self, DbErr> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::BookId.eq(book_id))
            .all(conn)
            .await?;
        Ok(Self::from_models(models))
    }

    fn from_models(models: Vec<accounts::Model>) -> Self {
        let parents = models
            .iter()
            .filter(|a| a.is_active)
            .filter_map(|a| a.parent_id)
            .collect();
        let accounts = models.into_iter().map(|a| (a.id, a)).collect();
        Self { accounts, parents }
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<&accounts::Model> {
        self.accounts.get(&id)
    }

    /// True when no active account names `id` as parent.
    pub(crate) fn is_leaf(&self, id: Uuid) -> bool {
        !self.parents.contains(&id)
    }

    pub(crate) fn class_of(&self, id: Uuid) -> Option<chart::AccountClass> {
        self.get(id).map(|a| a.class.into())
    }

    /// Validation view of an account of this book.
    pub(crate) fn info(&self, id: Uuid) -> Result<AccountInfo, LedgerError> {
        let account = self.get(id).ok_or(LedgerError::AccountNotFound(id))?;
        Ok(AccountInfo {
            id,
            is_active: account.is_active,
            is_leaf: self.is_leaf(id),
        })
    }

    pub(crate) fn codes(&self) -> impl Iterator<Item = &str> {
        self.accounts.values().map(|a| a.code.as_str())
    }
}

pub(crate) async fn book_exists<C: ConnectionTrait>(conn: &C, book_id: Uuid) -> Result<bool, DbErr> {
    Ok(books::Entity::find_by_id(book_id).one(conn).await?.is_some())
}

/// Number of lines posted to an account.
pub(crate) async fn line_count<C: ConnectionTrait>(conn: &C, account_id: Uuid) -> Result<u64, DbErr> {
    journal_lines::Entity::find()
        .filter(journal_lines::Column::AccountId.eq(account_id))
        .count(conn)
        .await
}

/// Number of active accounts naming `account_id` as parent.
pub(crate) async fn active_children<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
) -> Result<u64, DbErr> {
    accounts::Entity::find()
        .filter(accounts::Column::ParentId.eq(account_id))
        .filter(accounts::Column::IsActive.eq(true))
        .count(conn)
        .await
}

/// Lines of an entry in posting order.
pub(crate) async fn entry_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
) -> Result<Vec<journal_lines::Model>, DbErr> {
    journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .order_by_asc(journal_lines::Column::Position)
        .all(conn)
        .await
}

pub(crate) async fn delete_entry_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
) -> Result<u64, DbErr> {
    let result = journal_lines::Entity::delete_many()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Converts a validated amount into stored minor units.
pub(crate) fn minor_units(amount: Decimal) -> Result<i64, LedgerError> {
    to_minor_units(amount).ok_or_else(|| LedgerError::InvalidField {
        field: "amount",
        reason: format!("{amount} is out of range"),
    })
}

/// Validated lines converted to stored values, ready to insert.
pub(crate) struct StoredLines(Vec<journal_lines::Model>);

impl StoredLines {
    pub(crate) fn new(entry_id: Uuid, lines: &[LineDraft]) -> Result<Self, LedgerError> {
        lines
            .iter()
            .enumerate()
            .map(|(position, line)| {
                Ok(journal_lines::Model {
                    id: Uuid::new_v4(),
                    entry_id,
                    account_id: line.account_id,
                    position: i32::try_from(position).unwrap_or(i32::MAX),
                    debit_minor: minor_units(line.debit)?,
                    credit_minor: minor_units(line.credit)?,
                    description: line.description.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub(crate) async fn insert<C: ConnectionTrait>(
        self,
        conn: &C,
    ) -> Result<Vec<journal_lines::Model>, DbErr> {
        let mut inserted = Vec::with_capacity(self.0.len());
        for line in self.0 {
            let model = journal_lines::ActiveModel {
                id: Set(line.id),
                entry_id: Set(line.entry_id),
                account_id: Set(line.account_id),
                position: Set(line.position),
                debit_minor: Set(line.debit_minor),
                credit_minor: Set(line.credit_minor),
                description: Set(line.description),
            };
            inserted.push(model.insert(conn).await?);
        }
        Ok(inserted)
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{AccountClass, BalanceDirection};
    use chrono::Utc;

    fn model(parent_id: Option<Uuid>, is_active: bool) -> accounts::Model {
        accounts::Model {
            id: Uuid::new_v4(),
            book_id: Uuid::nil(),
            code: "1001".to_string(),
            name: "Cash".to_string(),
            class: AccountClass::Asset,
            direction: BalanceDirection::Debit,
            parent_id,
            icon: None,
            is_system: false,
            is_active,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_leafness_ignores_inactive_children() {
        let parent = model(None, true);
        let retired = model(Some(parent.id), false);
        let parent_id = parent.id;
        let index = AccountIndex::from_models(vec![parent, retired]);

        assert!(index.is_leaf(parent_id));
        assert!(index.info(parent_id).unwrap().is_leaf);
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let index = AccountIndex::from_models(vec![]);
        let id = Uuid::new_v4();
        assert!(matches!(index.info(id), Err(LedgerError::AccountNotFound(x)) if x == id));
    }
}
