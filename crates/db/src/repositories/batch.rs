//! Idempotent batch ingestion.
//!
//! A batch is one transaction. Items whose external id is already known are
//! skipped; items without one are always posted. The first failing item rolls
//! back everything before it.

use homebook_core::batch::{
    BatchError, BatchResult, ensure_batch_size, item_external_id, prepare_item,
};
use homebook_core::ledger::{Actor, EntryRequest, LedgerError};
use homebook_shared::AppError;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

use super::entry::{EntryError, find_by_external_id_in, post_in};
use super::support;

/// Error types for batch ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Batch rejected as a whole or at one item.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Book-level ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Batch(e) => e.into(),
            IngestError::Ledger(e) => e.into(),
            IngestError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Repository for importer-driven batch posting.
#[derive(Debug, Clone)]
pub struct IngestRepository {
    db: DatabaseConnection,
}

impl IngestRepository {
    /// Creates a new ingest repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ingests `items` in order.
    ///
    /// # Errors
    ///
    /// Returns `TooManyItems` for oversized batches, `BookNotFound`, or
    /// `ItemFailed` naming the first failing item. Nothing is written on error.
    pub async fn ingest_batch(
        &self,
        book_id: Uuid,
        actor: &Actor,
        items: &[EntryRequest],
    ) -> Result<BatchResult, IngestError> {
        ensure_batch_size(items.len())?;

        let txn = self.db.begin().await?;
        let result = match ingest_in(&txn, book_id, actor, items).await {
            Ok(result) => result,
            Err(err) => {
                txn.rollback().await?;
                if let IngestError::Batch(batch) = &err {
                    tracing::warn!(book_id = %book_id, error = %batch, "Batch rolled back");
                }
                return Err(err);
            }
        };
        txn.commit().await?;

        tracing::info!(
            book_id = %book_id,
            actor = %actor,
            total = result.total,
            created = result.created,
            skipped = result.skipped,
            "Batch ingested"
        );
        Ok(result)
    }
}

async fn ingest_in<C: ConnectionTrait>(
    conn: &C,
    book_id: Uuid,
    actor: &Actor,
    items: &[EntryRequest],
) -> Result<BatchResult, IngestError> {
    if !support::book_exists(conn, book_id).await? {
        return Err(LedgerError::BookNotFound(book_id).into());
    }

    let mut result = BatchResult::new(items.len());
    for (index, item) in items.iter().enumerate() {
        let external_id = item_external_id(item).map(str::to_string);

        if let Some(key) = external_id.as_deref()
            && let Some(existing) = find_by_external_id_in(conn, book_id, key).await?
        {
            tracing::debug!(
                book_id = %book_id,
                index,
                external_id = %key,
                entry_id = %existing.id,
                "Skipped known batch item"
            );
            result.record_skipped(index, key, existing.id);
            continue;
        }

        let (shape, meta) = prepare_item(item)
            .map_err(|err| BatchError::item(index, external_id.clone(), err))?;
        match post_in(conn, book_id, actor, item.entry_date, &shape, meta).await {
            Ok(posted) => result.record_created(index, external_id, posted.entry.id),
            Err(EntryError::Ledger(err)) => {
                return Err(BatchError::item(index, external_id, err).into());
            }
            Err(EntryError::Database(err)) => return Err(err.into()),
        }
    }
    Ok(result)
}
