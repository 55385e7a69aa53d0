//! `SeaORM` active enums stored as TEXT.
//!
//! Each enum mirrors a domain enum from `homebook_core` and converts to and
//! from it.

use homebook_core::{chart, ledger};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BookKind {
    #[sea_orm(string_value = "personal")]
    Personal,
    #[sea_orm(string_value = "family")]
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BalanceDirection {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "asset_purchase")]
    AssetPurchase,
    #[sea_orm(string_value = "borrow")]
    Borrow,
    #[sea_orm(string_value = "repay")]
    Repay,
    #[sea_orm(string_value = "asset_dispose")]
    AssetDispose,
    #[sea_orm(string_value = "depreciation")]
    Depreciation,
    #[sea_orm(string_value = "reconciliation")]
    Reconciliation,
    #[sea_orm(string_value = "manual")]
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "sync")]
    Sync,
    #[sea_orm(string_value = "reconciliation")]
    Reconciliation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
}

/// Generates `From` conversions in both directions between a stored enum and
/// its domain twin with identical variant names.
macro_rules! mirror_enum {
    ($stored:ident, $domain:path, [$($variant:ident),+ $(,)?]) => {
        impl From<$stored> for $domain {
            fn from(value: $stored) -> Self {
                match value {
                    $($stored::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$domain> for $stored {
            fn from(value: $domain) -> Self {
                type Domain = $domain;
                match value {
                    $(Domain::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(
    AccountClass,
    chart::AccountClass,
    [Asset, Liability, Equity, Income, Expense]
);
mirror_enum!(BalanceDirection, chart::BalanceDirection, [Debit, Credit]);
mirror_enum!(
    EntryType,
    ledger::EntryType,
    [
        Expense,
        Income,
        Transfer,
        AssetPurchase,
        Borrow,
        Repay,
        AssetDispose,
        Depreciation,
        Reconciliation,
        Manual,
    ]
);
mirror_enum!(EntrySource, ledger::EntrySource, [Manual, Sync, Reconciliation]);
mirror_enum!(
    ReconciliationStatus,
    ledger::ReconciliationStatus,
    [None, Pending, Confirmed]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_values_match_domain_names() {
        for domain in ledger::EntryType::ALL {
            let stored = EntryType::from(domain);
            assert_eq!(stored.to_value(), domain.as_str());
            assert_eq!(ledger::EntryType::from(stored), domain);
        }
    }

    #[test]
    fn test_class_values_match_domain_names() {
        for domain in chart::AccountClass::ALL {
            assert_eq!(AccountClass::from(domain).to_value(), domain.as_str());
        }
    }
}
