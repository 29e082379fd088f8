//! End-to-end ledger flow tests on an in-memory SQLite database.
//!
//! Each test spins up its own isolated database, so they can run in
//! parallel without touching disk.

use chrono::Utc;

use dukkan_core::{
    AccountStatus, CoreError, Customer, DebtKind, PaymentType, Product, SubCustomer,
};
use dukkan_db::{Database, DbConfig, DbError, NewPayment, NewRefund, NewSale, NewSaleItem};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn seed_product(db: &Database, barcode: &str, name: &str, price_kurus: i64, stock: i64) {
    let now = Utc::now();
    db.products()
        .insert(&Product {
            id: uuid::Uuid::new_v4().to_string(),
            barcode: barcode.to_string(),
            name: name.to_string(),
            price_kurus,
            purchase_price_kurus: price_kurus / 2,
            stock,
            category: None,
            brand: None,
            supplier: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
}

async fn seed_customer(db: &Database, name: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    db.customers()
        .insert(&Customer {
            id: id.clone(),
            name: name.to_string(),
            phone: None,
            address: None,
            is_active: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    id
}

async fn seed_sub_customer(db: &Database, customer_id: &str, name: &str) -> String {
    let now = Utc::now();
    let id = uuid::Uuid::new_v4().to_string();
    db.customers()
        .insert_sub_customer(&SubCustomer {
            id: id.clone(),
            customer_id: customer_id.to_string(),
            name: name.to_string(),
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
    id
}

fn sale_item(barcode: &str, quantity: i64) -> NewSaleItem {
    NewSaleItem {
        barcode: barcode.to_string(),
        quantity,
    }
}

fn credit_sale(customer_id: &str, items: Vec<NewSaleItem>) -> NewSale {
    NewSale {
        customer_id: Some(customer_id.to_string()),
        sub_customer_id: None,
        items,
        payment_type: PaymentType::Cash,
        is_debt: true,
    }
}

// =============================================================================
// Sales & Stock
// =============================================================================

#[tokio::test]
async fn credit_sale_opens_debt_equal_to_total() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1500, 10).await;
    seed_product(&db, "869002", "Ekmek", 500, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;

    let outcome = db
        .ledger()
        .create_sale(credit_sale(
            &customer,
            vec![sale_item("869001", 2), sale_item("869002", 1)],
        ))
        .await
        .unwrap();

    assert_eq!(outcome.sale.total_kurus, 3500);

    let debt = outcome.debt.expect("credit sale must open a debt");
    assert_eq!(debt.amount_kurus, outcome.sale.total_kurus);
    assert_eq!(debt.kind, DebtKind::Sale);
    assert_eq!(debt.description.as_deref(), Some("2 adet Süt, 1 adet Ekmek"));
    assert!(!debt.is_paid);
}

#[tokio::test]
async fn cash_sale_opens_no_debt() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1500, 10).await;

    let outcome = db
        .ledger()
        .create_sale(NewSale {
            customer_id: None,
            sub_customer_id: None,
            items: vec![sale_item("869001", 1)],
            payment_type: PaymentType::Cash,
            is_debt: false,
        })
        .await
        .unwrap();

    assert!(outcome.debt.is_none());
    assert_eq!(outcome.sale.total_kurus, 1500);
}

#[tokio::test]
async fn sale_of_entire_stock_succeeds_and_zeroes_it() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1500, 3).await;

    db.ledger()
        .create_sale(NewSale {
            customer_id: None,
            sub_customer_id: None,
            items: vec![sale_item("869001", 3)],
            payment_type: PaymentType::Cash,
            is_debt: false,
        })
        .await
        .unwrap();

    let product = db.products().find_by_barcode("869001").await.unwrap().unwrap();
    assert_eq!(product.stock, 0);
}

#[tokio::test]
async fn oversell_by_one_fails_and_rolls_back() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1500, 3).await;
    seed_product(&db, "869002", "Ekmek", 500, 10).await;

    // The first item would succeed on its own; the second trips the stock
    // guard and must drag the first item's decrement down with it.
    let err = db
        .ledger()
        .create_sale(NewSale {
            customer_id: None,
            sub_customer_id: None,
            items: vec![sale_item("869002", 2), sale_item("869001", 4)],
            payment_type: PaymentType::Cash,
            is_debt: false,
        })
        .await
        .unwrap_err();

    match err {
        DbError::Core(CoreError::InsufficientStock {
            barcode,
            available,
            requested,
        }) => {
            assert_eq!(barcode, "869001");
            assert_eq!(available, 3);
            assert_eq!(requested, 4);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    let sut = db.products().find_by_barcode("869001").await.unwrap().unwrap();
    assert_eq!(sut.stock, 3, "stock unchanged after rollback");
    let other = db.products().find_by_barcode("869002").await.unwrap().unwrap();
    assert_eq!(other.stock, 10, "earlier item in the request rolled back too");
}

#[tokio::test]
async fn unknown_barcode_is_rejected() {
    let db = test_db().await;

    let err = db
        .ledger()
        .create_sale(NewSale {
            customer_id: None,
            sub_customer_id: None,
            items: vec![sale_item("000000", 1)],
            payment_type: PaymentType::Cash,
            is_debt: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Core(CoreError::ProductNotFound(_))));
}

#[tokio::test]
async fn credit_sale_without_customer_is_rejected() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1500, 10).await;

    let err = db
        .ledger()
        .create_sale(NewSale {
            customer_id: None,
            sub_customer_id: None,
            items: vec![sale_item("869001", 1)],
            payment_type: PaymentType::Cash,
            is_debt: true,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Core(CoreError::DebtWithoutCustomer)));
}

// =============================================================================
// Payments & Allocation
// =============================================================================

#[tokio::test]
async fn partial_then_settling_payment_flips_is_paid() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;

    let outcome = db
        .ledger()
        .create_sale(credit_sale(&customer, vec![sale_item("869001", 1)]))
        .await
        .unwrap();
    let debt_id = outcome.debt.unwrap().id;

    let pay = |amount: i64| NewPayment {
        customer_id: customer.clone(),
        sub_customer_id: None,
        debt_id: None,
        amount_kurus: amount,
        payment_type: PaymentType::Cash,
        description: None,
    };

    db.ledger().record_payment(pay(600)).await.unwrap();
    let debt = db.debts().get_by_id(&debt_id).await.unwrap().unwrap();
    assert_eq!(debt.paid_amount_kurus, 600);
    assert!(!debt.is_paid);

    db.ledger().record_payment(pay(400)).await.unwrap();
    let debt = db.debts().get_by_id(&debt_id).await.unwrap().unwrap();
    assert_eq!(debt.paid_amount_kurus, 1000);
    assert!(debt.is_paid);
}

#[tokio::test]
async fn untargeted_payment_pays_oldest_debt_first() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    seed_product(&db, "869002", "Ekmek", 500, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;

    let first = db
        .ledger()
        .create_sale(credit_sale(&customer, vec![sale_item("869001", 1)]))
        .await
        .unwrap()
        .debt
        .unwrap();
    let second = db
        .ledger()
        .create_sale(credit_sale(&customer, vec![sale_item("869002", 1)]))
        .await
        .unwrap()
        .debt
        .unwrap();

    // 1200 settles the 1000 debt and leaves 200 on the younger 500 debt.
    let outcome = db
        .ledger()
        .record_payment(NewPayment {
            customer_id: customer.clone(),
            sub_customer_id: None,
            debt_id: None,
            amount_kurus: 1200,
            payment_type: PaymentType::Cash,
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.allocations.len(), 2);
    assert_eq!(outcome.allocations[0].debt_id, first.id);
    assert_eq!(outcome.allocations[0].applied.kurus(), 1000);
    assert_eq!(outcome.allocations[1].debt_id, second.id);
    assert_eq!(outcome.allocations[1].applied.kurus(), 200);
    assert_eq!(outcome.unallocated_kurus, 0);

    let first = db.debts().get_by_id(&first.id).await.unwrap().unwrap();
    assert!(first.is_paid);
    let second = db.debts().get_by_id(&second.id).await.unwrap().unwrap();
    assert_eq!(second.paid_amount_kurus, 200);
    assert!(!second.is_paid);
}

#[tokio::test]
async fn overshooting_payment_reports_unallocated_remainder() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;

    db.ledger()
        .create_sale(credit_sale(&customer, vec![sale_item("869001", 1)]))
        .await
        .unwrap();

    let outcome = db
        .ledger()
        .record_payment(NewPayment {
            customer_id: customer.clone(),
            sub_customer_id: None,
            debt_id: None,
            amount_kurus: 1500,
            payment_type: PaymentType::Cash,
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.unallocated_kurus, 500);
    // The full amount stays on the row regardless of allocation.
    assert_eq!(outcome.payment.amount_kurus, 1500);
}

#[tokio::test]
async fn targeted_payment_to_unknown_debt_is_surfaced() {
    let db = test_db().await;
    let customer = seed_customer(&db, "Ahmet Usta").await;

    let err = db
        .ledger()
        .record_payment(NewPayment {
            customer_id: customer,
            sub_customer_id: None,
            debt_id: Some("no-such-debt".to_string()),
            amount_kurus: 100,
            payment_type: PaymentType::Cash,
            description: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Core(CoreError::DebtNotFound(_))));
}

// =============================================================================
// Refunds
// =============================================================================

async fn debt_of_1000(db: &Database, customer: &str) -> String {
    db.ledger()
        .create_sale(credit_sale(customer, vec![sale_item("869001", 1)]))
        .await
        .unwrap()
        .debt
        .unwrap()
        .id
}

#[tokio::test]
async fn refund_exceeding_debt_is_rejected() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let debt_id = debt_of_1000(&db, &customer).await;

    let err = db
        .ledger()
        .record_refund(NewRefund {
            debt_id,
            barcode: "869001".to_string(),
            quantity: 1,
            refund_kurus: 1200,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DbError::Core(CoreError::RefundExceedsDebt { .. })
    ));
}

#[tokio::test]
async fn refund_restores_stock_and_writes_offset_payment() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let debt_id = debt_of_1000(&db, &customer).await;

    let stock_after_sale = db
        .products()
        .find_by_barcode("869001")
        .await
        .unwrap()
        .unwrap()
        .stock;
    assert_eq!(stock_after_sale, 9);

    let outcome = db
        .ledger()
        .record_refund(NewRefund {
            debt_id: debt_id.clone(),
            barcode: "869001".to_string(),
            quantity: 1,
            refund_kurus: 1000,
        })
        .await
        .unwrap();

    // Nothing was paid in, so the account is still open.
    assert!(!outcome.closed_account);
    assert_eq!(outcome.offset_payment.amount_kurus, 0);
    assert_eq!(outcome.offset_payment.refund_amount_kurus, 1000);
    assert_eq!(outcome.offset_payment.description.as_deref(), Some("Geri Ödeme"));
    assert_eq!(outcome.offset_payment.notes.as_deref(), Some("Açık hesap iadesi"));

    let stock = db
        .products()
        .find_by_barcode("869001")
        .await
        .unwrap()
        .unwrap()
        .stock;
    assert_eq!(stock, 10);

    assert_eq!(db.refunds().total_for_debt(&debt_id).await.unwrap(), 1000);
}

#[tokio::test]
async fn refund_after_full_payment_marks_account_closed() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let debt_id = debt_of_1000(&db, &customer).await;

    db.ledger()
        .record_payment(NewPayment {
            customer_id: customer.clone(),
            sub_customer_id: None,
            debt_id: Some(debt_id.clone()),
            amount_kurus: 1000,
            payment_type: PaymentType::Cash,
            description: None,
        })
        .await
        .unwrap();

    let outcome = db
        .ledger()
        .record_refund(NewRefund {
            debt_id,
            barcode: "869001".to_string(),
            quantity: 1,
            refund_kurus: 1000,
        })
        .await
        .unwrap();

    assert!(outcome.closed_account);
    assert_eq!(outcome.offset_payment.notes.as_deref(), Some("Kapalı hesap iadesi"));
}

#[tokio::test]
async fn replayed_refund_within_headroom_creates_second_pair() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let debt_id = debt_of_1000(&db, &customer).await;

    let request = NewRefund {
        debt_id: debt_id.clone(),
        barcode: "869001".to_string(),
        quantity: 1,
        refund_kurus: 400,
    };

    let first = db.ledger().record_refund(request.clone()).await.unwrap();
    let second = db.ledger().record_refund(request).await.unwrap();

    // No deduplication: both land as independent rows.
    assert_ne!(first.refund.id, second.refund.id);
    assert_ne!(first.offset_payment.id, second.offset_payment.id);
    assert_eq!(db.refunds().total_for_debt(&debt_id).await.unwrap(), 800);
    assert_eq!(db.refunds().list_for_debt(&debt_id).await.unwrap().len(), 2);

    // A third 400 would push 1200 past the 1000 debt.
    let err = db
        .ledger()
        .record_refund(NewRefund {
            debt_id,
            barcode: "869001".to_string(),
            quantity: 1,
            refund_kurus: 400,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Core(CoreError::RefundExceedsDebt { .. })
    ));
}

#[tokio::test]
async fn refund_verdict_scopes_paid_totals_to_the_sub_account() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let site_a = seed_sub_customer(&db, &customer, "Şantiye A").await;
    let site_b = seed_sub_customer(&db, &customer, "Şantiye B").await;

    let sub_sale = |sub: &str| NewSale {
        customer_id: Some(customer.clone()),
        sub_customer_id: Some(sub.to_string()),
        items: vec![sale_item("869001", 1)],
        payment_type: PaymentType::Cash,
        is_debt: true,
    };
    let debt_a = db.ledger().create_sale(sub_sale(&site_a)).await.unwrap().debt.unwrap();
    let debt_b = db.ledger().create_sale(sub_sale(&site_b)).await.unwrap().debt.unwrap();
    assert_eq!(debt_a.sub_customer_id.as_deref(), Some(site_a.as_str()));

    // Şantiye A pays its 1000 off in full; Şantiye B pays nothing.
    db.ledger()
        .record_payment(NewPayment {
            customer_id: customer.clone(),
            sub_customer_id: Some(site_a.clone()),
            debt_id: Some(debt_a.id.clone()),
            amount_kurus: 1000,
            payment_type: PaymentType::Cash,
            description: None,
        })
        .await
        .unwrap();

    // B's refund only sees B's payment rows: nothing paid in, so the
    // account stays open even though the customer as a whole paid 1000.
    let refund_b = db
        .ledger()
        .record_refund(NewRefund {
            debt_id: debt_b.id.clone(),
            barcode: "869001".to_string(),
            quantity: 1,
            refund_kurus: 1000,
        })
        .await
        .unwrap();
    assert!(!refund_b.closed_account);
    assert_eq!(refund_b.offset_payment.notes.as_deref(), Some("Açık hesap iadesi"));
    assert_eq!(
        refund_b.offset_payment.sub_customer_id.as_deref(),
        Some(site_b.as_str())
    );

    // A's refund sees A's full paydown and counts as a closed account.
    let refund_a = db
        .ledger()
        .record_refund(NewRefund {
            debt_id: debt_a.id.clone(),
            barcode: "869001".to_string(),
            quantity: 1,
            refund_kurus: 1000,
        })
        .await
        .unwrap();
    assert!(refund_a.closed_account);
    assert_eq!(refund_a.offset_payment.notes.as_deref(), Some("Kapalı hesap iadesi"));
}

// =============================================================================
// Sub-Customer Accounts
// =============================================================================

#[tokio::test]
async fn closed_sub_customer_cannot_be_reopened() {
    let db = test_db().await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let sub_id = seed_sub_customer(&db, &customer, "Şantiye A").await;

    let closed = db
        .customers()
        .update_sub_customer(&sub_id, None, Some(AccountStatus::Inactive))
        .await
        .unwrap();
    assert_eq!(closed.status, AccountStatus::Inactive);

    let err = db
        .customers()
        .update_sub_customer(&sub_id, None, Some(AccountStatus::Active))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("tekrar açılamaz"));
    let still_closed = db.customers().get_sub_customer(&sub_id).await.unwrap().unwrap();
    assert_eq!(still_closed.status, AccountStatus::Inactive);
}

#[tokio::test]
async fn rejected_reopen_writes_nothing_even_with_a_rename() {
    let db = test_db().await;
    let customer = seed_customer(&db, "Ahmet Usta").await;
    let sub_id = seed_sub_customer(&db, &customer, "Şantiye A").await;

    db.customers()
        .update_sub_customer(&sub_id, None, Some(AccountStatus::Inactive))
        .await
        .unwrap();

    // Rename and reopen in one update: the whole write must be rejected.
    let err = db
        .customers()
        .update_sub_customer(&sub_id, Some("Yeni Ad"), Some(AccountStatus::Active))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("tekrar açılamaz"));

    let sub = db.customers().get_sub_customer(&sub_id).await.unwrap().unwrap();
    assert_eq!(sub.name, "Şantiye A");
    assert_eq!(sub.status, AccountStatus::Inactive);
}

// =============================================================================
// Register
// =============================================================================

#[tokio::test]
async fn daily_summary_splits_cash_and_credit() {
    let db = test_db().await;
    seed_product(&db, "869001", "Süt", 1000, 10).await;
    let customer = seed_customer(&db, "Ahmet Usta").await;

    // One cash sale, one credit sale, one payment of 600 against the debt.
    db.ledger()
        .create_sale(NewSale {
            customer_id: None,
            sub_customer_id: None,
            items: vec![sale_item("869001", 2)],
            payment_type: PaymentType::Cash,
            is_debt: false,
        })
        .await
        .unwrap();
    db.ledger()
        .create_sale(credit_sale(&customer, vec![sale_item("869001", 1)]))
        .await
        .unwrap();
    db.ledger()
        .record_payment(NewPayment {
            customer_id: customer,
            sub_customer_id: None,
            debt_id: None,
            amount_kurus: 600,
            payment_type: PaymentType::Cash,
            description: None,
        })
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let summary = db.register().daily_summary(today).await.unwrap();

    assert_eq!(summary.sales_count, 2);
    assert_eq!(summary.sales_total_kurus, 3000);
    assert_eq!(summary.cash_sales_kurus, 2000);
    assert_eq!(summary.credit_sales_kurus, 1000);
    assert_eq!(summary.payments_count, 1);
    assert_eq!(summary.payments_total_kurus, 600);
    assert_eq!(summary.refunds_count, 0);
    assert_eq!(summary.net_kurus, 2600);
}
