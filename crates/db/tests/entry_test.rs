//! Integration tests for posting, mutating, listing, and deleting entries.

mod common;

use common::{Fixture, OWNER_ID, actor, date};
use homebook_core::ledger::{
    Actor, AssetPurchaseShape, EntryFields, EntryMeta, EntryPatch, EntryRequest, EntryShape,
    EntryType, Financing, LedgerError, LineDraft, RepayShape,
};
use homebook_db::entities::sea_orm_active_enums as db_enums;
use homebook_db::repositories::{EntryError, EntryFilter};
use homebook_shared::types::PageRequest;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn test_post_expense_writes_balanced_lines() {
    let fx = Fixture::new().await;

    let posted = fx.expense(date(2025, 6, 15), dec!(50), "5001", "1001-01").await;

    assert_eq!(posted.lines.len(), 2);
    assert_eq!(posted.total_debit(), dec!(50));
    assert_eq!(posted.total_credit(), dec!(50));
    assert!(posted.entry.is_balanced);
    assert_eq!(posted.entry.entry_type, db_enums::EntryType::Expense);
    assert_eq!(posted.entry.source, db_enums::EntrySource::Manual);
    assert_eq!(posted.entry.user_id, OWNER_ID);

    assert_eq!(posted.lines[0].account_id, fx.account("5001"));
    assert_eq!(posted.lines[0].debit_minor, 5000);
    assert_eq!(posted.lines[1].account_id, fx.account("1001-01"));
    assert_eq!(posted.lines[1].credit_minor, 5000);
}

#[tokio::test]
async fn test_post_part_financed_purchase() {
    let fx = Fixture::new().await;
    let shape = EntryShape::AssetPurchase(AssetPurchaseShape {
        amount: dec!(12000),
        asset_account_id: fx.account("1501"),
        payment_account_id: fx.account("1001-0201"),
        financing: Some(Financing {
            liability_account_id: fx.account("2201"),
            amount: dec!(9000),
        }),
    });

    let posted = fx
        .entries()
        .post_entry(fx.book_id, &actor(), date(2025, 6, 1), &shape, EntryMeta::described("Car"))
        .await
        .unwrap();

    let amounts: Vec<_> = posted
        .lines
        .iter()
        .map(|l| (l.account_id, l.debit_amount(), l.credit_amount()))
        .collect();
    assert_eq!(
        amounts,
        vec![
            (fx.account("1501"), dec!(12000), dec!(0)),
            (fx.account("1001-0201"), dec!(0), dec!(3000)),
            (fx.account("2201"), dec!(0), dec!(9000)),
        ]
    );
}

#[tokio::test]
async fn test_post_repay_splits_interest() {
    let fx = Fixture::new().await;
    let shape = EntryShape::Repay(RepayShape {
        principal: dec!(1000),
        interest: dec!(42.50),
        liability_account_id: fx.account("2101"),
        payment_account_id: fx.account("1001-01"),
        interest_account_id: Some(fx.account("5013")),
    });

    let posted = fx
        .entries()
        .post_entry(fx.book_id, &actor(), date(2025, 6, 1), &shape, EntryMeta::default())
        .await
        .unwrap();

    assert_eq!(posted.lines.len(), 3);
    assert_eq!(posted.total_credit(), dec!(1042.50));
    assert_eq!(posted.entry.entry_type, db_enums::EntryType::Repay);
}

#[tokio::test]
async fn test_unbalanced_manual_entry_is_rejected() {
    let fx = Fixture::new().await;
    let shape = EntryShape::manual(vec![
        LineDraft::debit(fx.account("1001-01"), dec!(100)),
        LineDraft::credit(fx.account("3001"), dec!(99.99)),
    ]);

    let err = fx
        .entries()
        .post_entry(fx.book_id, &actor(), date(2025, 6, 1), &shape, EntryMeta::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EntryError::Ledger(LedgerError::UnbalancedEntry { debit, credit })
            if debit == dec!(100) && credit == dec!(99.99)
    ));
    let listed = fx
        .entries()
        .list_entries(fx.book_id, &EntryFilter::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.meta.total, 0);
}

#[tokio::test]
async fn test_single_line_is_rejected() {
    let fx = Fixture::new().await;
    let shape = EntryShape::manual(vec![LineDraft::debit(fx.account("1001-01"), dec!(1))]);

    let err = fx
        .entries()
        .post_entry(fx.book_id, &actor(), date(2025, 6, 1), &shape, EntryMeta::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EntryError::Ledger(LedgerError::InsufficientLines)));
}

#[tokio::test]
async fn test_account_of_another_book_is_not_found() {
    let fx = Fixture::new().await;
    let other = Fixture::new().await;
    let foreign = other.account("1001-01");
    let shape = EntryShape::manual(vec![
        LineDraft::debit(foreign, dec!(10)),
        LineDraft::credit(fx.account("3001"), dec!(10)),
    ]);

    let err = fx
        .entries()
        .post_entry(fx.book_id, &actor(), date(2025, 6, 1), &shape, EntryMeta::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EntryError::Ledger(LedgerError::AccountNotFound(id)) if id == foreign));
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let fx = Fixture::new().await;
    let missing = Uuid::new_v4();
    let shape = EntryShape::manual(vec![
        LineDraft::debit(fx.account("1001-01"), dec!(10)),
        LineDraft::credit(fx.account("3001"), dec!(10)),
    ]);

    let err = fx
        .entries()
        .post_entry(missing, &actor(), date(2025, 6, 1), &shape, EntryMeta::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EntryError::Ledger(LedgerError::BookNotFound(id)) if id == missing));
}

#[tokio::test]
async fn test_duplicate_external_id_conflicts_on_single_post() {
    let fx = Fixture::new().await;
    let mut request = EntryRequest::new(EntryType::Expense, date(2025, 6, 1));
    request.external_id = Some("bank-42".to_string());
    request.fields = EntryFields {
        amount: Some(dec!(12)),
        category_account_id: Some(fx.account("5001")),
        payment_account_id: Some(fx.account("1001-01")),
        ..EntryFields::default()
    };

    let first = fx
        .entries()
        .create_from_request(fx.book_id, &actor(), &request)
        .await
        .unwrap();
    let err = fx
        .entries()
        .create_from_request(fx.book_id, &actor(), &request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EntryError::Ledger(LedgerError::DuplicateExternalId { entry_id: Some(id), .. })
            if id == first.entry.id
    ));

    let found = fx
        .entries()
        .find_by_external_id(fx.book_id, " bank-42 ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.entry.id);
}

#[tokio::test]
async fn test_service_actor_is_recorded() {
    let fx = Fixture::new().await;
    let calculator = Uuid::new_v4();
    let shape = EntryShape::lines(
        EntryType::Depreciation,
        vec![
            LineDraft::debit(fx.account("5014"), dec!(250)),
            LineDraft::credit(fx.account("1502"), dec!(250)),
        ],
    );

    let posted = fx
        .entries()
        .post_entry(
            fx.book_id,
            &Actor::service(calculator, "depreciation"),
            date(2025, 6, 30),
            &shape,
            EntryMeta::described("Monthly depreciation"),
        )
        .await
        .unwrap();

    assert_eq!(posted.entry.user_id, calculator);
    assert_eq!(posted.entry.entry_type, db_enums::EntryType::Depreciation);
}

#[tokio::test]
async fn test_update_metadata_keeps_lines() {
    let fx = Fixture::new().await;
    let posted = fx.expense(date(2025, 6, 1), dec!(30), "5001", "1001-01").await;

    let patch = EntryPatch {
        entry_date: Some(date(2025, 6, 2)),
        description: Some("Lunch".to_string()),
        ..EntryPatch::default()
    };
    let updated = fx
        .entries()
        .update_entry(fx.book_id, posted.entry.id, &patch)
        .await
        .unwrap();

    assert_eq!(updated.entry.id, posted.entry.id);
    assert_eq!(updated.entry.created_at, posted.entry.created_at);
    assert!(updated.entry.updated_at >= posted.entry.updated_at);
    assert_eq!(updated.entry.entry_date, date(2025, 6, 2));
    assert_eq!(updated.entry.description.as_deref(), Some("Lunch"));
    assert_eq!(updated.lines, posted.lines);
}

#[tokio::test]
async fn test_update_business_fields_rebuilds_lines() {
    let fx = Fixture::new().await;
    let posted = fx.expense(date(2025, 6, 1), dec!(30), "5001", "1001-01").await;

    let patch = EntryPatch {
        fields: EntryFields {
            amount: Some(dec!(80)),
            category_account_id: Some(fx.account("5002")),
            payment_account_id: Some(fx.account("1001-0202")),
            ..EntryFields::default()
        },
        ..EntryPatch::default()
    };
    let updated = fx
        .entries()
        .update_entry(fx.book_id, posted.entry.id, &patch)
        .await
        .unwrap();

    assert_eq!(updated.lines.len(), 2);
    assert_eq!(updated.lines[0].account_id, fx.account("5002"));
    assert_eq!(updated.total_debit(), dec!(80));
    assert_eq!(fx.accounts().line_count(fx.account("5001")).await.unwrap(), 0);
}

#[tokio::test]
async fn test_partial_business_patch_changes_nothing() {
    let fx = Fixture::new().await;
    let posted = fx.expense(date(2025, 6, 1), dec!(30), "5001", "1001-01").await;

    let patch = EntryPatch {
        description: Some("ignored".to_string()),
        fields: EntryFields {
            amount: Some(dec!(45)),
            ..EntryFields::default()
        },
        ..EntryPatch::default()
    };
    let err = fx
        .entries()
        .update_entry(fx.book_id, posted.entry.id, &patch)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EntryError::Ledger(LedgerError::MissingField("category_account_id"))
    ));

    let current = fx.entries().get_entry(fx.book_id, posted.entry.id).await.unwrap();
    assert_eq!(current.entry.description, posted.entry.description);
    assert_eq!(current.total_debit(), dec!(30));
}

#[tokio::test]
async fn test_list_entries_orders_filters_and_pages() {
    let fx = Fixture::new().await;
    fx.expense(date(2025, 6, 1), dec!(10), "5001", "1001-01").await;
    let latest = fx.expense(date(2025, 6, 20), dec!(20), "5002", "1001-01").await;
    fx.expense(date(2025, 6, 10), dec!(30), "5001", "1001-0202").await;

    let all = fx
        .entries()
        .list_entries(fx.book_id, &EntryFilter::default(), &PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(all.meta.total, 3);
    assert_eq!(all.meta.total_pages, 2);
    assert_eq!(all.data.len(), 2);
    assert_eq!(all.data[0].entry.id, latest.entry.id);
    assert_eq!(all.data[0].net_worth_impact, dec!(-20));
    assert_eq!(all.data[1].entry.entry_date, date(2025, 6, 10));

    let food = EntryFilter {
        account_id: Some(fx.account("5001")),
        ..EntryFilter::default()
    };
    let food = fx
        .entries()
        .list_entries(fx.book_id, &food, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(food.meta.total, 2);
    assert!(food.data.iter().all(|item| item.lines.len() == 2));

    let window = EntryFilter {
        start: Some(date(2025, 6, 5)),
        end: Some(date(2025, 6, 15)),
        entry_type: Some(EntryType::Expense),
        ..EntryFilter::default()
    };
    let window = fx
        .entries()
        .list_entries(fx.book_id, &window, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(window.meta.total, 1);
}

#[tokio::test]
async fn test_delete_entry_removes_lines() {
    let fx = Fixture::new().await;
    let posted = fx.expense(date(2025, 6, 1), dec!(15), "5001", "1001-01").await;

    fx.entries().delete_entry(fx.book_id, posted.entry.id).await.unwrap();

    let err = fx
        .entries()
        .get_entry(fx.book_id, posted.entry.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EntryError::Ledger(LedgerError::EntryNotFound(_))));
    assert_eq!(fx.accounts().line_count(fx.account("5001")).await.unwrap(), 0);
}
