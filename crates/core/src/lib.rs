//! Core bookkeeping logic for Homebook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `chart` - Hierarchical chart of accounts and leaf-only posting rules
//! - `ledger` - Entry shapes, double-entry validation, and type conversion
//! - `batch` - Idempotent batch ingestion rules
//! - `reports` - Balance sheet, income statement, and derived views

pub mod batch;
pub mod chart;
pub mod ledger;
pub mod reports;
