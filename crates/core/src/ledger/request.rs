//! Loosely typed entry requests.
//!
//! Batch items and patches arrive as flat records with optional fields. They
//! are turned into an [`EntryShape`] here, and a missing field becomes a
//! validation error naming that field.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use super::shape::{
    AssetPurchaseShape, BorrowShape, EntryShape, ExpenseShape, Financing, IncomeShape,
    RepayShape, TransferShape,
};
use super::types::{EntryType, LineDraft};

/// Business fields shared by create requests and patches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFields {
    /// Main amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Expense or income category.
    #[serde(default)]
    pub category_account_id: Option<Uuid>,
    /// Funding or receiving account.
    #[serde(default)]
    pub payment_account_id: Option<Uuid>,
    /// Asset bought.
    #[serde(default)]
    pub asset_account_id: Option<Uuid>,
    /// Liability borrowed from or repaid.
    #[serde(default)]
    pub liability_account_id: Option<Uuid>,
    /// Transfer source.
    #[serde(default)]
    pub from_account_id: Option<Uuid>,
    /// Transfer destination.
    #[serde(default)]
    pub to_account_id: Option<Uuid>,
    /// Liability financing part of an asset purchase.
    #[serde(default)]
    pub extra_liability_account_id: Option<Uuid>,
    /// Financed amount of an asset purchase.
    #[serde(default)]
    pub extra_liability_amount: Option<Decimal>,
    /// Repayment principal.
    #[serde(default)]
    pub principal: Option<Decimal>,
    /// Repayment interest.
    #[serde(default)]
    pub interest: Option<Decimal>,
    /// Expense account for repayment interest.
    #[serde(default)]
    pub interest_account_id: Option<Uuid>,
    /// Raw lines for manual and calculator-driven types.
    #[serde(default)]
    pub lines: Option<Vec<LineDraft>>,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, LedgerError> {
    value.ok_or(LedgerError::MissingField(field))
}

impl EntryFields {
    /// Returns true when no business field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the shape for `entry_type` from these fields.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming the first absent required field.
    pub fn to_shape(&self, entry_type: EntryType) -> Result<EntryShape, LedgerError> {
        let shape = match entry_type {
            EntryType::Expense => EntryShape::Expense(ExpenseShape {
                amount: require(self.amount, "amount")?,
                category_account_id: require(self.category_account_id, "category_account_id")?,
                payment_account_id: require(self.payment_account_id, "payment_account_id")?,
            }),
            EntryType::Income => EntryShape::Income(IncomeShape {
                amount: require(self.amount, "amount")?,
                category_account_id: require(self.category_account_id, "category_account_id")?,
                payment_account_id: require(self.payment_account_id, "payment_account_id")?,
            }),
            EntryType::Transfer => EntryShape::Transfer(TransferShape {
                amount: require(self.amount, "amount")?,
                from_account_id: require(self.from_account_id, "from_account_id")?,
                to_account_id: require(self.to_account_id, "to_account_id")?,
            }),
            EntryType::AssetPurchase => EntryShape::AssetPurchase(AssetPurchaseShape {
                amount: require(self.amount, "amount")?,
                asset_account_id: require(self.asset_account_id, "asset_account_id")?,
                payment_account_id: require(self.payment_account_id, "payment_account_id")?,
                financing: self.financing()?,
            }),
            EntryType::Borrow => EntryShape::Borrow(BorrowShape {
                amount: require(self.amount, "amount")?,
                payment_account_id: require(self.payment_account_id, "payment_account_id")?,
                liability_account_id: require(self.liability_account_id, "liability_account_id")?,
            }),
            EntryType::Repay => EntryShape::Repay(RepayShape {
                principal: require(self.principal.or(self.amount), "principal")?,
                interest: self.interest.unwrap_or(Decimal::ZERO),
                liability_account_id: require(self.liability_account_id, "liability_account_id")?,
                payment_account_id: require(self.payment_account_id, "payment_account_id")?,
                interest_account_id: self.interest_account_id,
            }),
            EntryType::AssetDispose
            | EntryType::Depreciation
            | EntryType::Reconciliation
            | EntryType::Manual => {
                EntryShape::lines(entry_type, require(self.lines.clone(), "lines")?)
            }
        };
        Ok(shape)
    }

    fn financing(&self) -> Result<Option<Financing>, LedgerError> {
        match self.extra_liability_amount {
            Some(amount) if !amount.is_zero() => Ok(Some(Financing {
                liability_account_id: require(
                    self.extra_liability_account_id,
                    "extra_liability_account_id",
                )?,
                amount,
            })),
            _ => Ok(None),
        }
    }
}

/// A request to create one entry, as received from an importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRequest {
    /// Entry type name; validated when the shape is built.
    pub entry_type: String,
    /// Business date.
    pub entry_date: NaiveDate,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Longer note.
    #[serde(default)]
    pub note: Option<String>,
    /// Idempotency key.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Business fields.
    #[serde(flatten)]
    pub fields: EntryFields,
}

impl EntryRequest {
    /// Creates a request with no business fields set.
    #[must_use]
    pub fn new(entry_type: EntryType, entry_date: NaiveDate) -> Self {
        Self {
            entry_type: entry_type.as_str().to_string(),
            entry_date,
            description: None,
            note: None,
            external_id: None,
            fields: EntryFields::default(),
        }
    }

    /// Parses the entry type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntryType` for names outside the closed set.
    pub fn entry_type(&self) -> Result<EntryType, LedgerError> {
        self.entry_type.parse()
    }

    /// Builds the shape this request describes.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntryType` or `MissingField`.
    pub fn to_shape(&self) -> Result<EntryShape, LedgerError> {
        self.fields.to_shape(self.entry_type()?)
    }
}

/// Partial update of an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New business date.
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New note.
    #[serde(default)]
    pub note: Option<String>,
    /// Business fields; any of them set triggers a line rebuild.
    #[serde(flatten)]
    pub fields: EntryFields,
}

impl EntryPatch {
    /// Returns true when the patch requires rebuilding lines.
    #[must_use]
    pub fn has_business_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}
