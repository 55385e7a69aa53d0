//! Display tree construction.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::types::{AccountNode, AccountRecord, AccountTree};

/// Builds the class-grouped forest from a flat account list.
///
/// Accounts whose parent is missing from `accounts` are treated as roots. A
/// node is a leaf exactly when no other account in `accounts` names it as
/// parent, which matches the posting-time leaf check when `accounts` holds
/// the active accounts of one book.
#[must_use]
pub fn build_tree(accounts: Vec<AccountRecord>) -> AccountTree {
    let ids: HashSet<Uuid> = accounts.iter().map(|a| a.id).collect();

    let mut children: HashMap<Uuid, Vec<AccountRecord>> = HashMap::new();
    let mut roots = Vec::new();
    for account in accounts {
        match account.parent_id.filter(|parent| ids.contains(parent)) {
            Some(parent) => children.entry(parent).or_default().push(account),
            None => roots.push(account),
        }
    }

    sort_siblings(&mut roots);

    let mut tree = AccountTree::default();
    for root in roots {
        let class = root.class;
        let node = attach(root, &mut children);
        tree.roots_mut(class).push(node);
    }
    tree
}

fn attach(account: AccountRecord, children: &mut HashMap<Uuid, Vec<AccountRecord>>) -> AccountNode {
    let mut kids = children.remove(&account.id).unwrap_or_default();
    sort_siblings(&mut kids);

    let nodes: Vec<AccountNode> = kids
        .into_iter()
        .map(|child| attach(child, children))
        .collect();

    AccountNode {
        is_leaf: nodes.is_empty(),
        account,
        children: nodes,
    }
}

fn sort_siblings(accounts: &mut [AccountRecord]) {
    accounts.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.code.cmp(&b.code))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::{AccountClass, BalanceDirection};

    fn account(code: &str, class: AccountClass, parent: Option<Uuid>, order: i32) -> AccountRecord {
        AccountRecord {
            id: Uuid::new_v4(),
            book_id: Uuid::nil(),
            code: code.to_string(),
            name: format!("Account {code}"),
            class,
            direction: class.default_direction(),
            parent_id: parent,
            icon: None,
            is_system: false,
            is_active: true,
            sort_order: order,
        }
    }

    #[test]
    fn test_groups_roots_by_class() {
        let cash = account("1001", AccountClass::Asset, None, 100);
        let card = account("2001", AccountClass::Liability, None, 100);
        let food = account("5001", AccountClass::Expense, None, 100);

        let tree = build_tree(vec![food, card, cash]);

        assert_eq!(tree.asset.len(), 1);
        assert_eq!(tree.liability.len(), 1);
        assert_eq!(tree.expense.len(), 1);
        assert!(tree.equity.is_empty());
        assert!(tree.income.is_empty());
    }

    #[test]
    fn test_nests_three_levels_and_derives_leaves() {
        let root = account("1001", AccountClass::Asset, None, 100);
        let deposits = account("1001-02", AccountClass::Asset, Some(root.id), 20);
        let cash = account("1001-01", AccountClass::Asset, Some(root.id), 10);
        let wallet = account("1001-0201", AccountClass::Asset, Some(deposits.id), 10);
        let (root_id, deposits_id, cash_id, wallet_id) = (root.id, deposits.id, cash.id, wallet.id);

        let tree = build_tree(vec![wallet, deposits, cash, root]);

        let root_node = &tree.asset[0];
        assert_eq!(root_node.account.id, root_id);
        assert!(!root_node.is_leaf);
        assert_eq!(root_node.children[0].account.id, cash_id);
        assert_eq!(root_node.children[1].account.id, deposits_id);
        assert!(root_node.children[0].is_leaf);
        assert!(!root_node.children[1].is_leaf);
        assert!(tree.find(wallet_id).unwrap().is_leaf);
    }

    #[test]
    fn test_orders_by_sort_order_then_code() {
        let b = account("5002", AccountClass::Expense, None, 100);
        let a = account("5001", AccountClass::Expense, None, 100);
        let first = account("5099", AccountClass::Expense, None, 50);

        let tree = build_tree(vec![b, a, first]);
        let codes: Vec<&str> = tree.expense.iter().map(|n| n.account.code.as_str()).collect();

        assert_eq!(codes, vec!["5099", "5001", "5002"]);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let orphan = account("5001-01", AccountClass::Expense, Some(Uuid::new_v4()), 10);
        let tree = build_tree(vec![orphan]);
        assert_eq!(tree.expense.len(), 1);
        assert!(tree.expense[0].is_leaf);
    }

    #[test]
    fn test_direction_serializes_snake_case() {
        let json = serde_json::to_string(&BalanceDirection::Credit).unwrap();
        assert_eq!(json, "\"credit\"");
    }
}
