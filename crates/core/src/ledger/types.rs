//! Ledger domain types for entry creation and validation.
//!
//! This module defines the closed set of entry types, provenance tags, the
//! acting identity, and the line drafts every builder produces.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Transaction type of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Spending against an expense category.
    Expense,
    /// Money received into an income category.
    Income,
    /// Movement between two balance-sheet accounts.
    Transfer,
    /// Purchase of an asset, optionally part-financed.
    AssetPurchase,
    /// Money borrowed into a funding account.
    Borrow,
    /// Loan repayment split into principal and interest.
    Repay,
    /// Sale or write-off of an asset.
    AssetDispose,
    /// Periodic depreciation.
    Depreciation,
    /// Adjustment created while reconciling against an external source.
    Reconciliation,
    /// Free-form lines supplied by the caller.
    Manual,
}

impl EntryType {
    /// Every entry type.
    pub const ALL: [Self; 10] = [
        Self::Expense,
        Self::Income,
        Self::Transfer,
        Self::AssetPurchase,
        Self::Borrow,
        Self::Repay,
        Self::AssetDispose,
        Self::Depreciation,
        Self::Reconciliation,
        Self::Manual,
    ];

    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
            Self::AssetPurchase => "asset_purchase",
            Self::Borrow => "borrow",
            Self::Repay => "repay",
            Self::AssetDispose => "asset_dispose",
            Self::Depreciation => "depreciation",
            Self::Reconciliation => "reconciliation",
            Self::Manual => "manual",
        }
    }

    /// Returns true for types whose lines are computed by a typed builder.
    #[must_use]
    pub const fn has_typed_builder(self) -> bool {
        matches!(
            self,
            Self::Expense
                | Self::Income
                | Self::Transfer
                | Self::AssetPurchase
                | Self::Borrow
                | Self::Repay
        )
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownEntryType(s.to_string()))
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Entered by a person or posted directly by a calculator.
    #[default]
    Manual,
    /// Created by batch ingestion.
    Sync,
    /// Created by the reconciliation layer.
    Reconciliation,
}

impl EntrySource {
    /// Returns the wire name of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Sync => "sync",
            Self::Reconciliation => "reconciliation",
        }
    }
}

/// Reconciliation state exposed to the reconciliation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// Not part of any reconciliation.
    #[default]
    None,
    /// Awaiting confirmation.
    Pending,
    /// Confirmed.
    Confirmed,
}

impl ReconciliationStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
        }
    }
}

/// An automated process posting on its own behalf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceIdentity {
    /// Identity stamped on entries the service creates.
    pub id: Uuid,
    /// Human-readable service name, e.g. `depreciation`.
    pub name: String,
}

impl ServiceIdentity {
    /// Creates a service identity.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Who is posting. Every write names its actor explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    /// A signed-in person.
    User {
        /// User ID.
        id: Uuid,
    },
    /// An automated calculator or importer.
    Service(ServiceIdentity),
}

impl Actor {
    /// Shorthand for a user actor.
    #[must_use]
    pub const fn user(id: Uuid) -> Self {
        Self::User { id }
    }

    /// Shorthand for a service actor.
    #[must_use]
    pub fn service(id: Uuid, name: impl Into<String>) -> Self {
        Self::Service(ServiceIdentity::new(id, name))
    }

    /// The id recorded as the entry's creator.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::User { id } => *id,
            Self::Service(service) => service.id,
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { id } => write!(f, "user:{id}"),
            Self::Service(service) => write!(f, "service:{}:{}", service.name, service.id),
        }
    }
}

/// One line of an entry before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraft {
    /// Target account.
    pub account_id: Uuid,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Optional line memo.
    #[serde(default)]
    pub description: Option<String>,
}

impl LineDraft {
    /// A debit line.
    #[must_use]
    pub const fn debit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line.
    #[must_use]
    pub const fn credit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Attaches a line memo.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Debit/credit totals of a line-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Exact equality of the two sums.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals, deriving the balanced flag.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Sums a line-set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` when either side overflows.
    pub fn of(lines: &[LineDraft]) -> Result<Self, LedgerError> {
        let total_debit = checked_sum(lines.iter().map(|l| l.debit))?;
        let total_credit = checked_sum(lines.iter().map(|l| l.credit))?;
        Ok(Self::new(total_debit, total_credit))
    }
}

/// Adds amounts without overflowing.
pub(crate) fn checked_sum<I>(amounts: I) -> Result<Decimal, LedgerError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| LedgerError::out_of_range("amount"))
    })
}

/// Non-line attributes supplied with a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    /// Short description.
    pub description: Option<String>,
    /// Longer note.
    pub note: Option<String>,
    /// Provenance tag.
    pub source: EntrySource,
    /// Reconciliation state.
    pub reconciliation_status: ReconciliationStatus,
    /// Idempotency key, unique per book.
    pub external_id: Option<String>,
}

impl EntryMeta {
    /// Metadata carrying only a description.
    #[must_use]
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}
