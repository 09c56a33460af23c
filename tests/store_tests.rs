// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::collections::{BTreeMap, HashSet};
use std::thread;
use std::time::Duration;

use common::{d, empty_store, january, range, seeded_store};
use painel::ReportingStore;
use painel::config::StoreConfig;
use painel::models::{DEFAULT_PAYMENT_METHOD, DateRange, NewExpense, NewSale};
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn seed_region_totals_for_first_five_days() {
    let (_dir, store) = seeded_store();
    let agg = store
        .aggregate_sales_by_region(&range("2024-01-01", "2024-01-05"))
        .unwrap();
    let expected: BTreeMap<String, i64> = [
        ("Norte", 150),
        ("Sul", 200),
        ("Centro", 175),
        ("Leste", 300),
        ("Oeste", 250),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    assert_eq!(agg, expected);
}

#[test]
fn seeding_twice_keeps_fifteen_sales_with_ids_one_to_fifteen() {
    let (_dir, store) = seeded_store();
    store
        .append_sale(&NewSale::new(d("2024-02-01"), 5, "Produto A", "Sul"))
        .unwrap();
    store.reset_and_seed().unwrap();

    let sales = store.list_sales(&range("2000-01-01", "2100-01-01"), None, None).unwrap();
    assert_eq!(sales.len(), 15);
    let ids: Vec<i64> = sales.iter().map(|s| s.id).collect();
    assert_eq!(ids, (1..=15).collect::<Vec<_>>());
    assert_eq!(sales.first().unwrap().date, d("2024-01-01"));
    assert_eq!(sales.last().unwrap().date, d("2024-01-15"));
}

#[test]
fn ensure_schema_keeps_existing_rows() {
    let (_dir, store) = seeded_store();
    store.ensure_schema().unwrap();
    assert_eq!(store.list_expenses(&january(), None).unwrap().len(), 10);
}

#[test]
fn list_expenses_orders_by_date_then_id_and_filters() {
    let (_dir, store) = seeded_store();
    let rows = store
        .list_expenses(&range("2024-01-03", "2024-01-10"), None)
        .unwrap();
    let keys: Vec<_> = rows.iter().map(|e| (e.date, e.id)).collect();
    assert_eq!(
        keys,
        vec![
            (d("2024-01-03"), 2),
            (d("2024-01-03"), 3),
            (d("2024-01-05"), 4),
            (d("2024-01-06"), 5),
            (d("2024-01-08"), 6),
            (d("2024-01-10"), 7),
        ]
    );

    let food = store
        .list_expenses(&january(), Some("Alimentação"))
        .unwrap();
    assert_eq!(food.len(), 3);
    assert!(food.iter().all(|e| e.category == "Alimentação"));
}

#[test]
fn no_match_is_empty_not_error() {
    let (_dir, store) = seeded_store();
    let r = DateRange::month(2023, 6).unwrap();
    assert!(store.list_expenses(&r, None).unwrap().is_empty());
    assert!(store.list_sales(&r, Some("Produto A"), None).unwrap().is_empty());
    assert!(store.aggregate_expenses_by_category(&r).unwrap().is_empty());
    assert!(store.daily_totals(painel::models::Entity::Sales, &r).unwrap().is_empty());
}

#[test]
fn list_sales_filters_by_product_and_region() {
    let (_dir, store) = seeded_store();
    let rows = store
        .list_sales(&january(), Some("Produto A"), Some("Leste"))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, Some(300));
    assert_eq!(rows[0].date, d("2024-01-04"));
}

#[test]
fn append_then_list_returns_row_once_with_fresh_id() {
    let (_dir, store) = seeded_store();
    let stored = store
        .append_expense(
            &NewExpense::new(d("2024-01-20"), dec!(19.99), "Lazer").with_description("Livro"),
        )
        .unwrap();
    assert_eq!(stored.id, 11);
    assert_eq!(stored.amount, Some(dec!(19.99)));
    assert_eq!(stored.payment_method.as_deref(), Some(DEFAULT_PAYMENT_METHOD));
    assert!(!stored.is_flagged());

    let rows = store.list_expenses(&january(), None).unwrap();
    let hits: Vec<_> = rows.iter().filter(|e| e.id == stored.id).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], &stored);
    let ids: HashSet<i64> = rows.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), rows.len());
}

#[test]
fn negative_amount_is_rejected_without_writing() {
    let (_dir, store) = seeded_store();
    let before = store.list_expenses(&january(), None).unwrap();

    let err = store
        .append_expense(&NewExpense::new(d("2024-01-20"), dec!(-10.00), "Lazer"))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.violated_fields(), vec!["amount"]);

    let after = store.list_expenses(&january(), None).unwrap();
    assert_eq!(before, after);
}

#[test]
fn append_sale_validates_every_field() {
    let (_dir, store) = seeded_store();
    let err = store
        .append_sale(&NewSale::new(d("2024-01-20"), -1, "", "Norte"))
        .unwrap_err();
    assert_eq!(err.violated_fields(), vec!["quantity", "product"]);
    assert_eq!(store.list_sales(&january(), None, None).unwrap().len(), 15);

    let ok = store
        .append_sale(&NewSale::new(d("2024-01-20"), 0, "Produto D", "Norte"))
        .unwrap();
    assert_eq!(ok.id, 16);
    assert_eq!(ok.quantity, Some(0));
}

#[test]
fn inverted_range_fails_before_querying() {
    let err = DateRange::new(d("2024-01-10"), d("2024-01-01")).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn unreachable_backend_is_a_connection_error() {
    let dir = tempdir().unwrap();
    let cfg = StoreConfig::new(dir.path().join("no-such-dir").join("x.sqlite"))
        .with_connect_timeout(Duration::from_millis(200));
    let err = ReportingStore::open(&cfg).unwrap_err();
    assert!(err.is_connection());
}

#[test]
fn caller_busy_timeout_reaches_every_pooled_connection() {
    let dir = tempdir().unwrap();
    let cfg = StoreConfig::new(dir.path().join("timeout.sqlite"))
        .with_pool_size(2)
        .with_busy_timeout(Some(Duration::from_millis(1234)));
    let pool = painel::db::build_pool(&cfg).unwrap();
    let a = pool.get().unwrap();
    let b = pool.get().unwrap();
    for conn in [&a, &b] {
        let ms: i64 = conn
            .query_row("PRAGMA busy_timeout", [], |r| r.get(0))
            .unwrap();
        assert_eq!(ms, 1234);
    }
}

#[test]
fn zero_busy_timeout_is_not_replaced_by_a_default() {
    let dir = tempdir().unwrap();
    let cfg = StoreConfig::new(dir.path().join("timeout.sqlite"))
        .with_busy_timeout(Some(Duration::ZERO));
    let pool = painel::db::build_pool(&cfg).unwrap();
    let ms: i64 = pool
        .get()
        .unwrap()
        .query_row("PRAGMA busy_timeout", [], |r| r.get(0))
        .unwrap();
    assert_eq!(ms, 0);
}

#[test]
fn expenses_filter_by_payment_method() {
    let (_dir, store) = seeded_store();
    let pix = store
        .filter_expenses(&january(), None, Some("PIX"))
        .unwrap();
    let ids: Vec<i64> = pix.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![4, 8]);

    let credit_leisure = store
        .filter_expenses(&january(), Some("Lazer"), Some("Cartão Crédito"))
        .unwrap();
    assert_eq!(credit_leisure.len(), 1);
    assert_eq!(credit_leisure[0].id, 3);

    assert!(store
        .filter_expenses(&january(), None, Some("Boleto"))
        .unwrap()
        .is_empty());
}

#[test]
fn missing_tables_surface_as_connection_error() {
    let dir = tempdir().unwrap();
    let store = ReportingStore::open(&StoreConfig::new(dir.path().join("bare.sqlite"))).unwrap();
    let err = store.list_expenses(&january(), None).unwrap_err();
    assert!(err.is_connection());
}

#[test]
fn concurrent_callers_use_independent_connections() {
    let (_dir, store) = empty_store();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    store
                        .append_expense(&NewExpense::new(
                            d("2024-03-01"),
                            dec!(1.00),
                            format!("T{}", t),
                        ))
                        .unwrap();
                    store
                        .list_expenses(&DateRange::day(d("2024-03-01")).unwrap(), None)
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let agg = store
        .aggregate_expenses_by_category(&DateRange::day(d("2024-03-01")).unwrap())
        .unwrap();
    assert_eq!(agg.len(), 4);
    assert!(agg.values().all(|v| *v == dec!(5.00)));
    let ids: Vec<i64> = store
        .list_expenses(&DateRange::day(d("2024-03-01")).unwrap(), None)
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}
