//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Entry types, provenance tags and actors
//! - Canonical entry shapes and their line builders
//! - Request and patch payloads
//! - Line and balance validation
//! - Entry type conversion
//! - Error types for ledger operations

pub mod conversion;
pub mod error;
pub mod request;
pub mod service;
pub mod shape;
pub mod types;

#[cfg(test)]
mod conversion_props;
#[cfg(test)]
mod validation_props;

pub use conversion::{
    ConversionHints, ConversionInputs, allowed_targets, ensure_convertible, plan_conversion,
    resolve_inputs, target_shape,
};
pub use error::LedgerError;
pub use request::{EntryFields, EntryPatch, EntryRequest};
pub use service::{AccountInfo, LedgerService, PreparedEntry};
pub use shape::{
    AssetPurchaseShape, BorrowShape, EntryShape, ExpenseShape, Financing, IncomeShape, LinesShape,
    RepayShape, TransferShape,
};
pub use types::{
    Actor, EntryMeta, EntrySource, EntryTotals, EntryType, LineDraft, ReconciliationStatus,
    ServiceIdentity,
};
