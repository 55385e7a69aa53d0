//! Ledger aggregation and financial reports.
//!
//! This module provides pure business logic for deriving reports from
//! per-account debit/credit totals:
//! - Balance Sheet
//! - Income Statement
//! - Dashboard
//! - Month-end net worth trend
//! - Expense breakdown and asset allocation

pub mod error;
pub mod period;
pub mod service;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use error::ReportError;
pub use period::{month_end, month_label, month_start, previous_month_end, trend_dates};
pub use service::{BALANCE_TOLERANCE, ReportService};
pub use types::*;
