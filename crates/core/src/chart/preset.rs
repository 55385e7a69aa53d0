//! The standard household chart seeded into every new book.

use super::types::AccountClass::{self, Asset, Equity, Expense, Income, Liability};
use super::types::BalanceDirection::{self, Credit, Debit};

/// One account of the preset chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetAccount {
    /// Fixed code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Account class.
    pub class: AccountClass,
    /// Normal balance direction.
    pub direction: BalanceDirection,
    /// Icon key.
    pub icon: &'static str,
    /// Display order among siblings.
    pub sort_order: i32,
    /// Code of the parent, for sub-accounts.
    pub parent_code: Option<&'static str>,
}

const fn root(
    code: &'static str,
    name: &'static str,
    class: AccountClass,
    direction: BalanceDirection,
    icon: &'static str,
    sort_order: i32,
) -> PresetAccount {
    PresetAccount {
        code,
        name,
        class,
        direction,
        icon,
        sort_order,
        parent_code: None,
    }
}

const fn sub(
    parent_code: &'static str,
    code: &'static str,
    name: &'static str,
    icon: &'static str,
    sort_order: i32,
) -> PresetAccount {
    PresetAccount {
        code,
        name,
        class: AccountClass::Asset,
        direction: BalanceDirection::Debit,
        icon,
        sort_order,
        parent_code: Some(parent_code),
    }
}

/// Preset accounts, parents always listed before their children.
pub const PRESET_CHART: &[PresetAccount] = &[
    root("1001", "Cash & Deposits", Asset, Debit, "cash", 100),
    root("1002", "Cash Equivalents", Asset, Debit, "money-market", 200),
    root("1101", "Receivables", Asset, Debit, "receivable", 400),
    root("1201", "Short-term Investments", Asset, Debit, "stock", 500),
    root("1301", "Prepaid Expenses", Asset, Debit, "prepaid", 600),
    root("1501", "Fixed Assets", Asset, Debit, "building", 700),
    root("1502", "Accumulated Depreciation", Asset, Credit, "depreciation", 710),
    root("1503", "Impairment Allowance", Asset, Credit, "impairment", 720),
    root("1601", "Long-term Investments", Asset, Debit, "investment", 800),
    root("2001", "Credit Cards", Liability, Credit, "credit-card", 100),
    root("2101", "Short-term Loans", Liability, Credit, "loan-short", 200),
    root("2201", "Long-term Loans", Liability, Credit, "loan-long", 300),
    root("2301", "Payables", Liability, Credit, "payable", 400),
    root("3001", "Opening Net Assets", Equity, Credit, "equity", 100),
    root("3002", "Current Year Profit", Equity, Credit, "profit", 200),
    root("4001", "Salary", Income, Credit, "salary", 100),
    root("4002", "Side Jobs", Income, Credit, "side-job", 200),
    root("4003", "Investment Income", Income, Credit, "investment-income", 300),
    root("4004", "Business Income", Income, Credit, "business", 400),
    root("4005", "Other Income", Income, Credit, "other-income", 500),
    root("4100", "Unclassified Income", Income, Credit, "unclassified-income", 900),
    root("5001", "Food & Dining", Expense, Debit, "food", 100),
    root("5002", "Transport", Expense, Debit, "transport", 200),
    root("5003", "Housing", Expense, Debit, "housing", 300),
    root("5004", "Daily Goods", Expense, Debit, "daily", 400),
    root("5005", "Clothing & Beauty", Expense, Debit, "clothing", 500),
    root("5006", "Medical", Expense, Debit, "medical", 600),
    root("5007", "Education", Expense, Debit, "education", 700),
    root("5008", "Entertainment", Expense, Debit, "entertainment", 800),
    root("5009", "Social & Gifts", Expense, Debit, "social", 900),
    root("5010", "Childcare", Expense, Debit, "childcare", 1000),
    root("5011", "Phone & Internet", Expense, Debit, "telecom", 1100),
    root("5012", "Insurance", Expense, Debit, "insurance", 1200),
    root("5013", "Interest Expense", Expense, Debit, "interest", 1300),
    root("5014", "Depreciation Expense", Expense, Debit, "depreciation-expense", 1400),
    root("5015", "Impairment Loss", Expense, Debit, "impairment-loss", 1500),
    root("5099", "Other Expenses", Expense, Debit, "other-expense", 1800),
    root("5100", "Unclassified Expenses", Expense, Debit, "unclassified-expense", 1900),
    sub("1001", "1001-01", "Cash", "cash", 10),
    sub("1001", "1001-02", "Bank Deposits", "bank", 20),
    sub("1002", "1002-01", "Money Market Fund", "money-fund", 10),
    sub("1002", "1002-02", "Treasury Reverse Repo", "treasury-bond", 20),
    sub("1001-02", "1001-0201", "Alipay", "alipay", 10),
    sub("1001-02", "1001-0202", "WeChat Pay", "wechat-pay", 20),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::chart::code::child_prefix;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<&str> = PRESET_CHART.iter().map(|a| a.code).collect();
        assert_eq!(codes.len(), PRESET_CHART.len());
    }

    #[test]
    fn test_parents_precede_children() {
        let mut seen = HashSet::new();
        for account in PRESET_CHART {
            if let Some(parent) = account.parent_code {
                assert!(seen.contains(parent), "{} listed before {parent}", account.code);
                assert!(account.code.starts_with(&child_prefix(parent)));
            }
            seen.insert(account.code);
        }
    }

    #[test]
    fn test_roots_sit_in_their_class_block() {
        for account in PRESET_CHART.iter().filter(|a| a.parent_code.is_none()) {
            let n: u32 = account.code.parse().unwrap();
            let base = account.class.code_block();
            assert!((base..base + 1000).contains(&n), "{}", account.code);
        }
    }

    #[test]
    fn test_contra_assets_are_credit_normal() {
        let contra: Vec<&str> = PRESET_CHART
            .iter()
            .filter(|a| a.class == AccountClass::Asset && a.direction == BalanceDirection::Credit)
            .map(|a| a.code)
            .collect();
        assert_eq!(contra, vec!["1502", "1503"]);
    }
}
