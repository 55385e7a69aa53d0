//! Idempotent batch ingestion.
//!
//! Pure rules for batches keyed by external id: size limits, per-item
//! preparation and result accounting. Storage runs the items in order
//! inside one transaction.

pub mod error;
pub mod types;

pub use error::BatchError;
pub use types::{
    BatchItemResult, BatchItemStatus, BatchResult, MAX_BATCH_ITEMS, ensure_batch_size,
    item_external_id, prepare_item,
};
