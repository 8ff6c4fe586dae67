//! End-to-end tests for the transactional engine against an in-memory
//! SQLite database: stock non-negativity, total consistency, atomic-unit
//! rollback, and the query surface.

use chrono::Utc;
use stockroom_core::{DateRange, Money};
use stockroom_db::{Database, DbConfig, EngineError};

/// Fresh isolated database per test.
async fn test_db() -> Database {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn create_supplier_and_product() {
    let db = test_db().await;

    let supplier = db
        .catalog()
        .create_supplier("Acme Beans", Some("555-0100"), None)
        .await
        .unwrap();
    assert_eq!(supplier.name, "Acme Beans");

    let product = db
        .catalog()
        .create_product("Arabica 1kg", Some(&supplier.id), Money::from_cents(1000))
        .await
        .unwrap();
    assert_eq!(product.stock, 0);
    assert_eq!(product.unit_price.cents(), 1000);
    assert_eq!(product.supplier_id.as_deref(), Some(supplier.id.as_str()));
}

#[tokio::test]
async fn empty_name_is_rejected_before_mutation() {
    let db = test_db().await;

    let err = db.catalog().create_supplier("   ", None, None).await;
    assert!(matches!(err, Err(EngineError::InvalidArgument(_))));

    let err = db
        .catalog()
        .create_product("", None, Money::zero())
        .await;
    assert!(matches!(err, Err(EngineError::InvalidArgument(_))));

    assert!(db.queries().list_inventory().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_names_hit_the_constraint_layer() {
    let db = test_db().await;

    db.catalog()
        .create_supplier("Acme", None, None)
        .await
        .unwrap();
    let err = db.catalog().create_supplier("Acme", None, None).await;
    assert!(matches!(err, Err(EngineError::TransactionFailed(_))));

    db.catalog()
        .create_product("Widget", None, Money::zero())
        .await
        .unwrap();
    let err = db
        .catalog()
        .create_product("Widget", None, Money::zero())
        .await;
    assert!(matches!(err, Err(EngineError::TransactionFailed(_))));
}

#[tokio::test]
async fn deleting_supplier_clears_the_weak_reference() {
    let db = test_db().await;

    let supplier = db
        .catalog()
        .create_supplier("Acme", None, None)
        .await
        .unwrap();
    let product = db
        .catalog()
        .create_product("Widget", Some(&supplier.id), Money::from_cents(500))
        .await
        .unwrap();

    db.catalog().delete_supplier(&supplier.id).await.unwrap();

    // Product survives, its supplier reference is nulled
    let product = db.catalog().get_product(&product.id).await.unwrap().unwrap();
    assert!(product.supplier_id.is_none());

    let rows = db.queries().list_inventory().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].supplier.is_none());
}

#[tokio::test]
async fn update_price_is_price_only() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(500))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 4, Money::from_cents(300))
        .await
        .unwrap();

    db.catalog()
        .update_price(&product.id, Money::from_cents(750))
        .await
        .unwrap();

    let product = db.catalog().get_product(&product.id).await.unwrap().unwrap();
    assert_eq!(product.unit_price.cents(), 750);
    assert_eq!(product.stock, 4); // untouched

    let err = db
        .catalog()
        .update_price("no-such-product", Money::from_cents(1))
        .await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));

    let err = db
        .catalog()
        .update_price(&product.id, Money::from_cents(-1))
        .await;
    assert!(matches!(err, Err(EngineError::InvalidArgument(_))));
}

// =============================================================================
// Stock Ledger
// =============================================================================

#[tokio::test]
async fn receive_stock_increases_by_exactly_qty() {
    let db = test_db().await;

    // Scenario A: product at stock 0, receive 5 at cost 6.00
    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(1000))
        .await
        .unwrap();

    let purchase = db
        .ledger()
        .receive_stock(&product.id, 5, Money::from_cents(600))
        .await
        .unwrap();
    assert_eq!(purchase.qty, 5);
    assert_eq!(purchase.cost_price.cents(), 600);

    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 5);
}

#[tokio::test]
async fn receive_stock_rejects_bad_arguments_without_side_effects() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::zero())
        .await
        .unwrap();

    let err = db.ledger().receive_stock(&product.id, 0, Money::zero()).await;
    assert!(matches!(err, Err(EngineError::InvalidArgument(_))));

    let err = db
        .ledger()
        .receive_stock(&product.id, 5, Money::from_cents(-1))
        .await;
    assert!(matches!(err, Err(EngineError::InvalidArgument(_))));

    let err = db
        .ledger()
        .receive_stock("no-such-product", 5, Money::zero())
        .await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));

    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 0);
}

#[tokio::test]
async fn reserve_and_restore_conserve_stock() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::zero())
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 10, Money::zero())
        .await
        .unwrap();

    let committed = db.ledger().reserve_and_commit(&product.id, 4).await.unwrap();
    assert_eq!(committed, 4);
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 6);

    db.ledger().restore(&product.id, 4).await.unwrap();
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 10);
}

#[tokio::test]
async fn reserve_fails_cleanly_when_short() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::zero())
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 3, Money::zero())
        .await
        .unwrap();

    let err = db.ledger().reserve_and_commit(&product.id, 5).await;
    match err {
        Err(EngineError::InsufficientStock {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, 3);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // Check failed → stock unchanged
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 3);
}

// =============================================================================
// Sale Orchestration
// =============================================================================

#[tokio::test]
async fn sale_walkthrough_scenarios() {
    let db = test_db().await;

    // Scenario A: price 10.00, stock 0 → receive 5 at 6.00
    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(1000))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 5, Money::from_cents(600))
        .await
        .unwrap();
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 5);

    // Scenario B: sale for Alice, 3 units at the product's own price
    let sale = db.checkout().start(Some("Alice")).await.unwrap();
    let item = db
        .checkout()
        .add_item(&sale.id, &product.id, 3, None)
        .await
        .unwrap();
    assert_eq!(item.price.cents(), 1000);
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 2);
    assert_eq!(
        db.sales().current_total(&sale.id).await.unwrap().cents(),
        3000
    );

    // Scenario C: over-ask is rejected per-item, sale stays open
    let err = db.checkout().add_item(&sale.id, &product.id, 10, None).await;
    assert!(matches!(err, Err(EngineError::InsufficientStock { .. })));
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 2);
    assert_eq!(
        db.sales().current_total(&sale.id).await.unwrap().cents(),
        3000
    );

    // Scenario E: low-stock report lists the product (2 < 3)
    let low = db.queries().low_stock(3).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, product.id);
    assert_eq!(low[0].stock, 2);

    // Scenario F: today's summary sees one sale, revenue 30.00
    let summary = db
        .queries()
        .sales_summary(DateRange::on(Utc::now().date_naive()))
        .await
        .unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.revenue.cents(), 3000);

    // Scenario D: removing the item restores stock and the total
    db.checkout().remove_item(&sale.id, &item.id).await.unwrap();
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 5);
    assert_eq!(db.sales().current_total(&sale.id).await.unwrap().cents(), 0);
}

#[tokio::test]
async fn sale_stays_open_after_rejection() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(200))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 2, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(None).await.unwrap();

    // Rejected: only 2 in stock
    let err = db.checkout().add_item(&sale.id, &product.id, 3, None).await;
    assert!(matches!(err, Err(EngineError::InsufficientStock { .. })));

    // Caller retries with a smaller quantity on the SAME sale
    db.checkout()
        .add_item(&sale.id, &product.id, 2, None)
        .await
        .unwrap();

    let bill = db.checkout().finalize(&sale.id).await.unwrap();
    assert_eq!(bill.lines.len(), 1);
    assert_eq!(bill.total.cents(), 400);
}

#[tokio::test]
async fn price_override_resolution() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(1000))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 10, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(None).await.unwrap();

    // Positive override wins
    let item = db
        .checkout()
        .add_item(&sale.id, &product.id, 1, Some(Money::from_cents(800)))
        .await
        .unwrap();
    assert_eq!(item.price.cents(), 800);

    // Zero override falls back to the product's current price
    let item = db
        .checkout()
        .add_item(&sale.id, &product.id, 1, Some(Money::zero()))
        .await
        .unwrap();
    assert_eq!(item.price.cents(), 1000);

    assert_eq!(
        db.sales().current_total(&sale.id).await.unwrap().cents(),
        1800
    );
}

#[tokio::test]
async fn add_item_rejects_missing_references_before_mutation() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(100))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 5, Money::zero())
        .await
        .unwrap();

    let err = db
        .checkout()
        .add_item("no-such-sale", &product.id, 1, None)
        .await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));

    let sale = db.checkout().start(None).await.unwrap();
    let err = db
        .checkout()
        .add_item(&sale.id, "no-such-product", 1, None)
        .await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));

    let err = db.checkout().add_item(&sale.id, &product.id, 0, None).await;
    assert!(matches!(err, Err(EngineError::InvalidArgument(_))));

    // Nothing moved
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 5);
    assert_eq!(db.sales().current_total(&sale.id).await.unwrap().cents(), 0);
}

#[tokio::test]
async fn item_prices_are_snapshots() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(1000))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 5, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(None).await.unwrap();
    db.checkout()
        .add_item(&sale.id, &product.id, 2, None)
        .await
        .unwrap();

    // A later price change never rewrites committed items or totals
    db.catalog()
        .update_price(&product.id, Money::from_cents(9999))
        .await
        .unwrap();

    let items = db.sales().get_items(&sale.id).await.unwrap();
    assert_eq!(items[0].price.cents(), 1000);
    assert_eq!(
        db.sales().current_total(&sale.id).await.unwrap().cents(),
        2000
    );
}

#[tokio::test]
async fn zero_item_sale_is_a_valid_terminal_state() {
    let db = test_db().await;

    let sale = db.checkout().start(Some("Bob")).await.unwrap();
    let bill = db.checkout().finalize(&sale.id).await.unwrap();

    assert!(bill.lines.is_empty());
    assert!(bill.total.is_zero());
    assert_eq!(bill.customer.as_deref(), Some("Bob"));
}

#[tokio::test]
async fn remove_item_requires_matching_sale() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(100))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 5, Money::zero())
        .await
        .unwrap();

    let sale_a = db.checkout().start(None).await.unwrap();
    let sale_b = db.checkout().start(None).await.unwrap();
    let item = db
        .checkout()
        .add_item(&sale_a.id, &product.id, 1, None)
        .await
        .unwrap();

    // Item belongs to sale A; removing it through sale B is NotFound and
    // leaves everything intact
    let err = db.checkout().remove_item(&sale_b.id, &item.id).await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));
    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 4);
    assert_eq!(
        db.sales().current_total(&sale_a.id).await.unwrap().cents(),
        100
    );
}

#[tokio::test]
async fn bill_total_matches_sum_of_lines() {
    let db = test_db().await;

    let beans = db
        .catalog()
        .create_product("Beans", None, Money::from_cents(1000))
        .await
        .unwrap();
    let sugar = db
        .catalog()
        .create_product("Sugar", None, Money::from_cents(250))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&beans.id, 10, Money::zero())
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&sugar.id, 10, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(Some("Carol")).await.unwrap();
    db.checkout()
        .add_item(&sale.id, &beans.id, 3, None)
        .await
        .unwrap();
    db.checkout()
        .add_item(&sale.id, &sugar.id, 2, None)
        .await
        .unwrap();

    let bill = db.checkout().finalize(&sale.id).await.unwrap();
    assert_eq!(bill.lines.len(), 2);

    let summed: Money = bill.lines.iter().map(|l| l.line_total).sum();
    assert_eq!(bill.total, summed);
    assert_eq!(bill.total.cents(), 3500);
    assert_eq!(bill.lines[0].product_name, "Beans");
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_add_item_has_exactly_one_winner() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(100))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 4, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(None).await.unwrap();

    // Four callers each want ALL the stock; only one may have it
    let (c1, c2, c3, c4) = (
        db.checkout(),
        db.checkout(),
        db.checkout(),
        db.checkout(),
    );
    let results = tokio::join!(
        c1.add_item(&sale.id, &product.id, 4, None),
        c2.add_item(&sale.id, &product.id, 4, None),
        c3.add_item(&sale.id, &product.id, 4, None),
        c4.add_item(&sale.id, &product.id, 4, None),
    );
    let results = [results.0, results.1, results.2, results.3];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for r in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            r.as_ref().unwrap_err(),
            EngineError::InsufficientStock { .. }
        ));
    }

    assert_eq!(db.ledger().stock_level(&product.id).await.unwrap(), 0);
    assert_eq!(
        db.sales().current_total(&sale.id).await.unwrap().cents(),
        400
    );
}

// =============================================================================
// Query Surface
// =============================================================================

#[tokio::test]
async fn reads_are_idempotent() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(100))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 2, Money::zero())
        .await
        .unwrap();

    let a = db.queries().list_inventory().await.unwrap();
    let b = db.queries().list_inventory().await.unwrap();
    assert_eq!(a.len(), b.len());
    assert_eq!(a[0].id, b[0].id);
    assert_eq!(a[0].stock, b[0].stock);

    let a = db.queries().low_stock(10).await.unwrap();
    let b = db.queries().low_stock(10).await.unwrap();
    assert_eq!(a.len(), b.len());

    let a = db.queries().sales_summary(DateRange::all()).await.unwrap();
    let b = db.queries().sales_summary(DateRange::all()).await.unwrap();
    assert_eq!(a.count, b.count);
    assert_eq!(a.revenue, b.revenue);
}

#[tokio::test]
async fn low_stock_orders_by_stock_ascending() {
    let db = test_db().await;

    let a = db
        .catalog()
        .create_product("A", None, Money::zero())
        .await
        .unwrap();
    let b = db
        .catalog()
        .create_product("B", None, Money::zero())
        .await
        .unwrap();
    let c = db
        .catalog()
        .create_product("C", None, Money::zero())
        .await
        .unwrap();
    db.ledger().receive_stock(&a.id, 7, Money::zero()).await.unwrap();
    db.ledger().receive_stock(&b.id, 2, Money::zero()).await.unwrap();
    db.ledger().receive_stock(&c.id, 5, Money::zero()).await.unwrap();

    let rows = db.queries().low_stock(6).await.unwrap();
    let stocks: Vec<i64> = rows.iter().map(|r| r.stock).collect();
    assert_eq!(stocks, vec![2, 5]); // 7 is not below the threshold
}

#[tokio::test]
async fn sales_summary_respects_date_bounds() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(1000))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 5, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(None).await.unwrap();
    db.checkout()
        .add_item(&sale.id, &product.id, 2, None)
        .await
        .unwrap();

    let today = Utc::now().date_naive();

    let summary = db.queries().sales_summary(DateRange::all()).await.unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.revenue.cents(), 2000);

    // Bounded range containing today
    let summary = db
        .queries()
        .sales_summary(DateRange::on(today))
        .await
        .unwrap();
    assert_eq!(summary.count, 1);

    // Range ending before today is empty
    let yesterday = today.pred_opt().unwrap();
    let summary = db
        .queries()
        .sales_summary(DateRange {
            from: None,
            to: Some(yesterday),
        })
        .await
        .unwrap();
    assert_eq!(summary.count, 0);
    assert!(summary.revenue.is_zero());

    // Unbounded end, starting tomorrow: also empty
    let tomorrow = today.succ_opt().unwrap();
    let summary = db
        .queries()
        .sales_summary(DateRange {
            from: Some(tomorrow),
            to: None,
        })
        .await
        .unwrap();
    assert_eq!(summary.count, 0);
}

// =============================================================================
// Referential Actions
// =============================================================================

#[tokio::test]
async fn product_deletion_blocked_while_sale_items_exist() {
    let db = test_db().await;

    let product = db
        .catalog()
        .create_product("Widget", None, Money::from_cents(100))
        .await
        .unwrap();
    db.ledger()
        .receive_stock(&product.id, 5, Money::zero())
        .await
        .unwrap();

    let sale = db.checkout().start(None).await.unwrap();
    let item = db
        .checkout()
        .add_item(&sale.id, &product.id, 1, None)
        .await
        .unwrap();

    // RESTRICT: blocked while the item references the product
    let err = db.catalog().delete_product(&product.id).await;
    assert!(matches!(err, Err(EngineError::TransactionFailed(_))));
    assert!(db.catalog().get_product(&product.id).await.unwrap().is_some());

    // After the item is gone the product may be deleted (purchase history
    // cascades with it)
    db.checkout().remove_item(&sale.id, &item.id).await.unwrap();
    db.catalog().delete_product(&product.id).await.unwrap();
    assert!(db.catalog().get_product(&product.id).await.unwrap().is_none());
}

#[tokio::test]
async fn aggregator_reads_require_an_existing_sale() {
    let db = test_db().await;

    let err = db.sales().current_total("no-such-sale").await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));

    let err = db.sales().recompute("no-such-sale").await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));

    let err = db.checkout().finalize("no-such-sale").await;
    assert!(matches!(err, Err(EngineError::NotFound { .. })));
}
