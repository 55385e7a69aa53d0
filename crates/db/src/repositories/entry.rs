//! Journal entry repository.
//!
//! Posting, mutation, conversion, and deletion each run in one transaction.
//! Account leafness and the external-id check are evaluated inside the same
//! transaction that writes the lines.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use homebook_core::ledger::{
    Actor, ConversionHints, EntryMeta, EntryPatch, EntryRequest, EntryShape, EntryType,
    LedgerError, LedgerService, LineDraft, PreparedEntry, plan_conversion,
};
use homebook_core::reports::{ImpactLine, ReportService};
use homebook_shared::AppError;
use homebook_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Query,
};
use serde::Serialize;
use uuid::Uuid;

use super::support::{self, AccountIndex, StoredLines};
use crate::entities::{journal_entries, journal_lines};

/// Error types for entry operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// Ledger rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::Ledger(e) => e.into(),
            EntryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// An entry with its lines in posting order.
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithLines {
    /// The entry.
    pub entry: journal_entries::Model,
    /// Its lines.
    pub lines: Vec<journal_lines::Model>,
}

impl EntryWithLines {
    /// Sum of debit lines.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(journal_lines::Model::debit_amount).sum()
    }

    /// Sum of credit lines.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(journal_lines::Model::credit_amount).sum()
    }

    /// Lines as drafts, as a builder would produce them.
    #[must_use]
    pub fn drafts(&self) -> Vec<LineDraft> {
        self.lines
            .iter()
            .map(|line| LineDraft {
                account_id: line.account_id,
                debit: line.debit_amount(),
                credit: line.credit_amount(),
                description: line.description.clone(),
            })
            .collect()
    }
}

/// An entry as listed, with its effect on net worth.
#[derive(Debug, Clone, Serialize)]
pub struct EntryListItem {
    /// The entry.
    pub entry: journal_entries::Model,
    /// Its lines.
    pub lines: Vec<journal_lines::Model>,
    /// Asset change minus liability change.
    pub net_worth_impact: Decimal,
}

/// Filter for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Earliest entry date, inclusive.
    pub start: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    pub end: Option<NaiveDate>,
    /// Only entries of this type.
    pub entry_type: Option<EntryType>,
    /// Only entries with a line on this account.
    pub account_id: Option<Uuid>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts an entry built from `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The book or any account is not found
    /// - Any account is inactive or not a leaf
    /// - A line is malformed or the lines do not balance
    /// - The external id is already used in the book
    pub async fn post_entry(
        &self,
        book_id: Uuid,
        actor: &Actor,
        entry_date: NaiveDate,
        shape: &EntryShape,
        meta: EntryMeta,
    ) -> Result<EntryWithLines, EntryError> {
        let txn = self.db.begin().await?;
        let posted = post_in(&txn, book_id, actor, entry_date, shape, meta).await?;
        txn.commit().await?;

        tracing::info!(
            book_id = %book_id,
            entry_id = %posted.entry.id,
            entry_type = %EntryType::from(posted.entry.entry_type),
            actor = %actor,
            lines = posted.lines.len(),
            "Entry posted"
        );
        Ok(posted)
    }

    /// Posts an entry from a loosely typed request.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntryType` or `MissingField` before anything is
    /// written, then anything [`Self::post_entry`] returns.
    pub async fn create_from_request(
        &self,
        book_id: Uuid,
        actor: &Actor,
        request: &EntryRequest,
    ) -> Result<EntryWithLines, EntryError> {
        let shape = request.to_shape()?;
        let meta = EntryMeta {
            description: request.description.clone(),
            note: request.note.clone(),
            external_id: request.external_id.clone(),
            ..EntryMeta::default()
        };
        self.post_entry(book_id, actor, request.entry_date, &shape, meta)
            .await
    }

    /// Gets an entry of a book with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is not in the book.
    pub async fn get_entry(
        &self,
        book_id: Uuid,
        entry_id: Uuid,
    ) -> Result<EntryWithLines, EntryError> {
        let entry = find_entry(&self.db, book_id, entry_id).await?;
        let lines = support::entry_lines(&self.db, entry.id).await?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Finds the entry holding `external_id` in a book.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_external_id(
        &self,
        book_id: Uuid,
        external_id: &str,
    ) -> Result<Option<journal_entries::Model>, EntryError> {
        Ok(find_by_external_id_in(&self.db, book_id, external_id.trim()).await?)
    }

    /// Lists entries newest first with their lines and net worth impact.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        book_id: Uuid,
        filter: &EntryFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<EntryListItem>, EntryError> {
        let mut query =
            journal_entries::Entity::find().filter(journal_entries::Column::BookId.eq(book_id));

        if let Some(start) = filter.start {
            query = query.filter(journal_entries::Column::EntryDate.gte(start));
        }
        if let Some(end) = filter.end {
            query = query.filter(journal_entries::Column::EntryDate.lte(end));
        }
        if let Some(entry_type) = filter.entry_type {
            let entry_type: crate::entities::sea_orm_active_enums::EntryType = entry_type.into();
            query = query.filter(journal_entries::Column::EntryType.eq(entry_type));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(
                journal_entries::Column::Id.in_subquery(
                    Query::select()
                        .column(journal_lines::Column::EntryId)
                        .from(journal_lines::Entity)
                        .and_where(journal_lines::Column::AccountId.eq(account_id))
                        .to_owned(),
                ),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let entries = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let index = AccountIndex::load(&self.db, book_id).await?;
        let mut lines = lines_by_entry(&self.db, entries.iter().map(|e| e.id)).await?;
        let data = entries
            .into_iter()
            .map(|entry| {
                let lines = lines.remove(&entry.id).unwrap_or_default();
                let net_worth_impact = net_worth_impact(&index, &lines);
                EntryListItem {
                    entry,
                    lines,
                    net_worth_impact,
                }
            })
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Updates an entry.
    ///
    /// Metadata fields change in place. When the patch carries business
    /// fields, the lines are rebuilt from those fields with the builder of
    /// the entry's current type and validated like a new post.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, a builder error, or a validation error.
    pub async fn update_entry(
        &self,
        book_id: Uuid,
        entry_id: Uuid,
        patch: &EntryPatch,
    ) -> Result<EntryWithLines, EntryError> {
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, book_id, entry_id).await?;

        let rebuilt = if patch.has_business_fields() {
            let shape = patch.fields.to_shape(entry.entry_type.into())?;
            Some(prepare_in(&txn, book_id, &shape).await?)
        } else {
            None
        };

        let mut active: journal_entries::ActiveModel = entry.into();
        if let Some(entry_date) = patch.entry_date {
            active.entry_date = Set(entry_date);
        }
        if let Some(description) = &patch.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(note) = &patch.note {
            active.note = Set(Some(note.clone()));
        }

        let lines = match rebuilt {
            Some(prepared) => {
                active.is_balanced = Set(prepared.totals.is_balanced);
                Some(replace_lines(&txn, entry_id, &prepared).await?)
            }
            None => None,
        };

        active.updated_at = Set(Utc::now());
        let entry = active.update(&txn).await?;
        let lines = match lines {
            Some(lines) => lines,
            None => support::entry_lines(&txn, entry_id).await?,
        };
        txn.commit().await?;

        tracing::info!(
            book_id = %book_id,
            entry_id = %entry_id,
            lines_rebuilt = patch.has_business_fields(),
            "Entry updated"
        );
        Ok(EntryWithLines { entry, lines })
    }

    /// Converts an entry to another type, rebuilding its lines.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedConversion` or `AmbiguousLines` before anything is
    /// written, or a validation error for the rebuilt lines.
    pub async fn convert_entry_type(
        &self,
        book_id: Uuid,
        entry_id: Uuid,
        target: EntryType,
        hints: ConversionHints,
    ) -> Result<EntryWithLines, EntryError> {
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, book_id, entry_id).await?;
        let from = EntryType::from(entry.entry_type);
        let current = EntryWithLines {
            lines: support::entry_lines(&txn, entry_id).await?,
            entry,
        };

        let shape = plan_conversion(from, target, &current.drafts(), hints)?;
        let prepared = prepare_in(&txn, book_id, &shape).await?;
        let lines = replace_lines(&txn, entry_id, &prepared).await?;

        let mut active: journal_entries::ActiveModel = current.entry.into();
        active.entry_type = Set(prepared.entry_type.into());
        active.is_balanced = Set(prepared.totals.is_balanced);
        active.updated_at = Set(Utc::now());
        let entry = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            book_id = %book_id,
            entry_id = %entry_id,
            from = %from,
            to = %target,
            "Entry type converted"
        );
        Ok(EntryWithLines { entry, lines })
    }

    /// Deletes an entry and its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is not in the book.
    pub async fn delete_entry(&self, book_id: Uuid, entry_id: Uuid) -> Result<(), EntryError> {
        let txn = self.db.begin().await?;
        let entry = find_entry(&txn, book_id, entry_id).await?;
        let removed = support::delete_entry_lines(&txn, entry.id).await?;
        journal_entries::Entity::delete_by_id(entry.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(
            book_id = %book_id,
            entry_id = %entry_id,
            lines = removed,
            "Entry deleted"
        );
        Ok(())
    }
}

/// Posts an entry on an open connection or transaction.
pub(crate) async fn post_in<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    actor: &Actor,
    entry_date: NaiveDate,
    shape: &EntryShape,
    meta: EntryMeta,
) -> Result<EntryWithLines, EntryError> {
    let external_id = meta
        .external_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    if let Some(external_id) = &external_id {
        if let Some(existing) = find_by_external_id_in(conn, book_id, external_id).await? {
            tracing::warn!(
                book_id = %book_id,
                external_id = %external_id,
                existing_entry_id = %existing.id,
                "Rejected post with duplicate external id"
            );
            return Err(LedgerError::DuplicateExternalId {
                external_id: external_id.clone(),
                entry_id: Some(existing.id),
            }
            .into());
        }
    }

    let prepared = prepare_in(conn, book_id, shape).await?;
    let entry_id = Uuid::new_v4();
    let stored = StoredLines::new(entry_id, &prepared.lines)?;
    let now = Utc::now();

    let entry = journal_entries::ActiveModel {
        id: Set(entry_id),
        book_id: Set(book_id),
        user_id: Set(actor.id()),
        entry_date: Set(entry_date),
        entry_type: Set(prepared.entry_type.into()),
        description: Set(meta.description),
        note: Set(meta.note),
        is_balanced: Set(prepared.totals.is_balanced),
        reconciliation_status: Set(meta.reconciliation_status.into()),
        source: Set(meta.source.into()),
        external_id: Set(external_id.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|err| match external_id {
        Some(external_id) if support::is_unique_violation(&err) => {
            tracing::warn!(
                book_id = %book_id,
                external_id = %external_id,
                "External id claimed concurrently"
            );
            EntryError::Ledger(LedgerError::DuplicateExternalId {
                external_id,
                entry_id: None,
            })
        }
        _ => EntryError::Database(err),
    })?;

    let lines = stored.insert(conn).await?;
    Ok(EntryWithLines { entry, lines })
}

pub(crate) async fn find_by_external_id_in<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    external_id: &str,
) -> Result<Option<journal_entries::Model>, DbErr> {
    journal_entries::Entity::find()
        .filter(journal_entries::Column::BookId.eq(book_id))
        .filter(journal_entries::Column::ExternalId.eq(external_id))
        .one(conn)
        .await
}

/// Lines of several entries, grouped by entry in posting order.
pub(crate) async fn lines_by_entry<C, I>(
    conn: &C,
    entry_ids: I,
) -> Result<HashMap<Uuid, Vec<journal_lines::Model>>, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let ids: Vec<Uuid> = entry_ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.is_in(ids))
        .order_by_asc(journal_lines::Column::EntryId)
        .order_by_asc(journal_lines::Column::Position)
        .all(conn)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<journal_lines::Model>> = HashMap::new();
    for line in lines {
        grouped.entry(line.entry_id).or_default().push(line);
    }
    Ok(grouped)
}

/// Net worth impact of stored lines; lines on unknown accounts are ignored.
pub(crate) fn net_worth_impact(index: &AccountIndex, lines: &[journal_lines::Model]) -> Decimal {
    let impact: Vec<ImpactLine> = lines
        .iter()
        .filter_map(|line| {
            index.class_of(line.account_id).map(|class| ImpactLine {
                class,
                debit: line.debit_amount(),
                credit: line.credit_amount(),
            })
        })
        .collect();
    ReportService::net_worth_impact(&impact)
}

async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    entry_id: Uuid,
) -> Result<journal_entries::Model, EntryError> {
    journal_entries::Entity::find_by_id(entry_id)
        .filter(journal_entries::Column::BookId.eq(book_id))
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(entry_id).into())
}

/// Builds and validates `shape` against the book's accounts as of now.
async fn prepare_in<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    shape: &EntryShape,
) -> Result<PreparedEntry, EntryError> {
    if !support::book_exists(conn, book_id).await? {
        return Err(LedgerError::BookNotFound(book_id).into());
    }
    let index = AccountIndex::load(conn, book_id).await?;
    Ok(LedgerService::prepare(shape, |id| index.info(id))?)
}

async fn replace_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: Uuid,
    prepared: &PreparedEntry,
) -> Result<Vec<journal_lines::Model>, EntryError> {
    let stored = StoredLines::new(entry_id, &prepared.lines)?;
    support::delete_entry_lines(conn, entry_id).await?;
    Ok(stored.insert(conn).await?)
}
