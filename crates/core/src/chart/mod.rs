//! Chart of accounts.
//!
//! This module implements the hierarchical account tree:
//! - Account classes and normal balance directions
//! - Hierarchical code generation
//! - Fallback planning when a leaf with history gains a child
//! - Deactivation guards
//! - Display tree construction with derived leaf flags
//! - The preset household chart

pub mod code;
pub mod error;
pub mod preset;
pub mod service;
pub mod tree;
pub mod types;

#[cfg(test)]
mod code_props;

pub use error::ChartError;
pub use preset::{PRESET_CHART, PresetAccount};
pub use service::{ChartService, FallbackPlan};
pub use tree::build_tree;
pub use types::{
    AccountClass, AccountNode, AccountRecord, AccountTree, BalanceDirection, MigrationResult,
};
