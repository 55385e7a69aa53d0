//! Batch ingestion types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::BatchError;
use crate::ledger::{EntryMeta, EntryRequest, EntryShape, EntrySource, LedgerError};

/// Maximum number of items accepted in one batch.
pub const MAX_BATCH_ITEMS: usize = 200;

/// Outcome of one batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    /// A new entry was posted.
    Created,
    /// An entry with the same external id already existed.
    Skipped,
}

/// Per-item result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemResult {
    /// 0-based position in the batch.
    pub index: usize,
    /// Idempotency key of the item, when it carries one.
    pub external_id: Option<String>,
    /// Created or skipped.
    pub status: BatchItemStatus,
    /// The created entry, or the existing one for a skip.
    pub entry_id: Uuid,
}

/// Summary of a committed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Items received.
    pub total: usize,
    /// Entries created.
    pub created: usize,
    /// Items skipped as duplicates.
    pub skipped: usize,
    /// Results in item order.
    pub results: Vec<BatchItemResult>,
}

impl BatchResult {
    /// An empty result for a batch of `total` items.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            results: Vec::with_capacity(total),
            ..Self::default()
        }
    }

    /// Records a newly posted entry.
    pub fn record_created(&mut self, index: usize, external_id: Option<String>, entry_id: Uuid) {
        self.created += 1;
        self.push(index, external_id, BatchItemStatus::Created, entry_id);
    }

    /// Records an item that matched an existing entry.
    pub fn record_skipped(&mut self, index: usize, external_id: impl Into<String>, entry_id: Uuid) {
        self.skipped += 1;
        self.push(index, Some(external_id.into()), BatchItemStatus::Skipped, entry_id);
    }

    fn push(&mut self, index: usize, external_id: Option<String>, status: BatchItemStatus, entry_id: Uuid) {
        self.results.push(BatchItemResult {
            index,
            external_id,
            status,
            entry_id,
        });
    }
}

/// Fails when a batch exceeds [`MAX_BATCH_ITEMS`].
///
/// # Errors
///
/// Returns `TooManyItems`.
pub fn ensure_batch_size(count: usize) -> Result<(), BatchError> {
    if count > MAX_BATCH_ITEMS {
        return Err(BatchError::TooManyItems {
            count,
            max: MAX_BATCH_ITEMS,
        });
    }
    Ok(())
}

/// Returns the trimmed external id of a batch item, if it has a non-blank one.
pub fn item_external_id(item: &EntryRequest) -> Option<&str> {
    item.external_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

/// Builds the shape and metadata posted for a batch item.
///
/// The entry is stamped with `source = sync` and the item's external id, if any.
///
/// # Errors
///
/// Returns `MissingField` or `UnknownEntryType`.
pub fn prepare_item(item: &EntryRequest) -> Result<(EntryShape, EntryMeta), LedgerError> {
    let shape = item.to_shape()?;
    let meta = EntryMeta {
        description: item.description.clone(),
        note: item.note.clone(),
        source: EntrySource::Sync,
        external_id: item_external_id(item).map(str::to_string),
        ..EntryMeta::default()
    };
    Ok((shape, meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expense(external_id: Option<&str>) -> EntryRequest {
        let mut item = EntryRequest::new(
            EntryType::Expense,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        );
        item.external_id = external_id.map(str::to_string);
        item.fields.amount = Some(dec!(12.5));
        item.fields.category_account_id = Some(Uuid::new_v4());
        item.fields.payment_account_id = Some(Uuid::new_v4());
        item
    }

    #[test]
    fn test_batch_size_limit() {
        assert!(ensure_batch_size(0).is_ok());
        assert!(ensure_batch_size(MAX_BATCH_ITEMS).is_ok());
        assert!(matches!(
            ensure_batch_size(MAX_BATCH_ITEMS + 1),
            Err(BatchError::TooManyItems { count: 201, max: 200 })
        ));
    }

    #[test]
    fn test_prepare_item_stamps_sync_source() {
        let (shape, meta) = prepare_item(&expense(Some("bank-1"))).unwrap();
        assert_eq!(shape.entry_type(), EntryType::Expense);
        assert_eq!(meta.source, EntrySource::Sync);
        assert_eq!(meta.external_id.as_deref(), Some("bank-1"));
    }

    #[test]
    fn test_prepare_item_without_external_id() {
        let (_, meta) = prepare_item(&expense(None)).unwrap();
        assert_eq!(meta.source, EntrySource::Sync);
        assert_eq!(meta.external_id, None);

        let (_, meta) = prepare_item(&expense(Some("  "))).unwrap();
        assert_eq!(meta.external_id, None);

        let (_, meta) = prepare_item(&expense(Some(" bank-2 "))).unwrap();
        assert_eq!(meta.external_id.as_deref(), Some("bank-2"));
    }

    #[test]
    fn test_prepare_item_rejects_unknown_type() {
        let mut item = expense(Some("x1"));
        item.entry_type = "refund".to_string();
        assert!(matches!(prepare_item(&item), Err(LedgerError::UnknownEntryType(_))));
    }

    #[test]
    fn test_result_counts() {
        let a = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut result = BatchResult::new(3);
        result.record_created(0, Some("x1".to_string()), a);
        result.record_skipped(1, "x1", a);
        result.record_created(2, None, c);

        assert_eq!((result.total, result.created, result.skipped), (3, 2, 1));
        assert_eq!(result.results[1].status, BatchItemStatus::Skipped);
        assert_eq!(result.results[1].entry_id, a);
        assert_eq!(result.results[1].external_id.as_deref(), Some("x1"));
        assert_eq!(result.results[2].external_id, None);
    }
}
