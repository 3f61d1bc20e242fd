//! Catalog semantics, report by report, against the in-memory store.

use serde_json::{json, Value};

use tally_core::{catalog, SalesStore};

use crate::integration::common::{sale, seeded_store, worked_example};

fn field_f64(row: &Value, name: &str) -> f64 {
    row[name].as_f64().unwrap_or_else(|| panic!("{name} missing in {row}"))
}

// =============================================================================
// Grouping reports
// =============================================================================

#[tokio::test]
async fn total_sales_per_category_worked_example() {
    let store = worked_example();
    let mut rows = store
        .aggregate(&catalog::total_sales_per_category())
        .await
        .unwrap();

    // Order between groups is not guaranteed; sort by key before comparing.
    rows.sort_by_key(|r| r["_id"].as_str().map(str::to_string));
    assert_eq!(
        rows,
        vec![
            json!({"_id": "A", "totalSales": 150}),
            json!({"_id": "B", "totalSales": 30}),
        ]
    );
}

#[tokio::test]
async fn per_group_counts_conserve_the_row_total() {
    let store = seeded_store();

    let days = store.aggregate(&catalog::orders_per_day()).await.unwrap();
    let day_total: f64 = days.iter().map(|r| field_f64(r, "count")).sum();
    assert_eq!(day_total as usize, store.sales_len());

    let categories = store.aggregate(&catalog::avg_order_value()).await.unwrap();
    let order_total: f64 = categories.iter().map(|r| field_f64(r, "totalOrders")).sum();
    assert_eq!(order_total as usize, store.sales_len());
}

#[tokio::test]
async fn avg_order_value_is_total_over_count() {
    let store = seeded_store();
    let rows = store.aggregate(&catalog::avg_order_value()).await.unwrap();

    assert!(!rows.is_empty());
    for row in rows {
        let total = field_f64(&row, "totalSales");
        let count = field_f64(&row, "totalOrders");
        assert!(count >= 1.0, "groups only exist for present rows");
        let avg = field_f64(&row, "avgOrderValue");
        assert!((avg - total / count).abs() < 1e-9, "bad average in {row}");
        assert!(row.get("_id").is_none(), "_id must be projected away");
    }
}

#[tokio::test]
async fn monthly_sales_partitions_by_date_prefix_ascending() {
    let store = seeded_store();
    let rows = store.aggregate(&catalog::monthly_sales()).await.unwrap();

    let months: Vec<&str> = rows.iter().filter_map(|r| r["month"].as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);

    // Revenue is conserved across the month partition.
    let revenue: f64 = rows.iter().map(|r| field_f64(r, "totalRevenue")).sum();
    assert!((revenue - 868.75).abs() < 1e-9);
}

#[tokio::test]
async fn top_category_ranks_all_groups_descending() {
    let store = seeded_store();
    let rows = store.aggregate(&catalog::top_category()).await.unwrap();

    assert_eq!(rows.len(), 3, "every category appears, no limit");
    let totals: Vec<f64> = rows.iter().map(|r| field_f64(r, "totalSales")).collect();
    for pair in totals.windows(2) {
        assert!(pair[0] >= pair[1], "not descending: {totals:?}");
    }
    assert_eq!(rows[0]["_id"], json!("Electronics"));
}

// =============================================================================
// Single-row "top" reports
// =============================================================================

#[tokio::test]
async fn popular_payment_method_returns_one_maximal_row() {
    let store = seeded_store();
    let rows = store
        .aggregate(&catalog::popular_payment_method())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    // credit appears four times, cash twice, paypal once.
    assert_eq!(rows[0]["_id"], json!("credit"));
    assert_eq!(rows[0]["totalUsers"], json!(4));
}

#[tokio::test]
async fn top_customers_returns_one_maximal_row() {
    let store = seeded_store();
    let rows = store.aggregate(&catalog::top_customers()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["_id"], json!(1), "customer 1 spent 370.5");
    assert!((field_f64(&rows[0], "totalAmount") - 370.5).abs() < 1e-9);
}

#[tokio::test]
async fn tied_maxima_still_yield_exactly_one_row() {
    // Two methods used twice each: which one wins is unspecified, but the
    // report must still return a single row carrying the maximal count.
    let store = tally_core::MemoryStore::new(
        &[
            sale(1, 1, "A", 10.0, "2024-01-01", "credit"),
            sale(2, 1, "A", 10.0, "2024-01-02", "credit"),
            sale(3, 2, "B", 10.0, "2024-01-03", "cash"),
            sale(4, 2, "B", 10.0, "2024-01-04", "cash"),
        ],
        &[],
    )
    .unwrap();

    let rows = store
        .aggregate(&catalog::popular_payment_method())
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["totalUsers"], json!(2));
    let winner = rows[0]["_id"].as_str().unwrap();
    assert!(winner == "credit" || winner == "cash");
}

// =============================================================================
// Filter and joins
// =============================================================================

#[tokio::test]
async fn filter_by_payment_selects_exact_matches_only() {
    let store = worked_example();
    let rows = store
        .aggregate(&catalog::filter_by_payment("credit"))
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row["paymentMethod"], json!("credit"));
    }

    let none = store
        .aggregate(&catalog::filter_by_payment("CREDIT"))
        .await
        .unwrap();
    assert!(none.is_empty(), "matching is case-sensitive");

    let empty = store.aggregate(&catalog::filter_by_payment("")).await.unwrap();
    assert!(empty.is_empty(), "an empty literal matches nothing");
}

#[tokio::test]
async fn joins_silently_drop_orphan_sales() {
    let store = seeded_store();

    // Order 6 references customer 99, which does not exist.
    let flattened = store
        .aggregate(&catalog::sales_with_customers())
        .await
        .unwrap();
    assert_eq!(flattened.len(), store.sales_len() - 1);
    assert!(flattened.iter().all(|r| r["orderId"] != json!(6)));

    let summary = store.aggregate(&catalog::order_summary()).await.unwrap();
    assert_eq!(summary.len(), store.sales_len() - 1);
}

#[tokio::test]
async fn sales_with_customers_flattens_and_hides_internals() {
    let store = worked_example();
    let rows = store
        .aggregate(&catalog::sales_with_customers())
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    let first = rows.iter().find(|r| r["orderId"] == json!(1)).unwrap();
    assert_eq!(first["customerName"], json!("Ada"));
    assert_eq!(first["customerEmail"], json!("ada@example.com"));
    assert_eq!(first["customerLocation"], json!("London"));
    assert_eq!(first["customerAge"], json!(31));
    assert!(first.get("_id").is_none());
    assert!(first.get("customerDetails").is_none());
}

#[tokio::test]
async fn order_summary_derives_ten_percent_tax() {
    let store = worked_example();
    let rows = store.aggregate(&catalog::order_summary()).await.unwrap();

    for row in &rows {
        let amount = field_f64(row, "totalAmount");
        let tax = field_f64(row, "tax");
        assert!((tax - amount * 0.1).abs() < 1e-9);
        assert!(row.get("location").is_some());
        assert!(row.get("_id").is_none());
    }
}

// =============================================================================
// Repeat customers
// =============================================================================

#[tokio::test]
async fn repeat_customers_worked_example() {
    let store = worked_example();
    let rows = store.aggregate(&catalog::repeat_customers()).await.unwrap();

    assert_eq!(rows, vec![json!({"customer": 1, "totalOrders": 2})]);
}

#[tokio::test]
async fn repeat_customers_is_the_multi_order_subset() {
    let store = seeded_store();
    let rows = store.aggregate(&catalog::repeat_customers()).await.unwrap();

    // Customers 1 and 2 placed two orders each; 3, 4 and the orphan 99 one.
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert!(field_f64(row, "totalOrders") > 1.0);
    }
    let customers: Vec<i64> = rows.iter().filter_map(|r| r["customer"].as_i64()).collect();
    assert!(customers.contains(&1) && customers.contains(&2));
}

// =============================================================================
// Catalog-wide laws
// =============================================================================

#[tokio::test]
async fn every_fixed_report_runs_and_returns_objects() {
    let store = seeded_store();
    for (name, pipeline) in catalog::fixed_reports() {
        let rows = store.aggregate(&pipeline).await.unwrap();
        assert!(
            rows.iter().all(Value::is_object),
            "report {name} returned a non-object row"
        );
    }
}

#[tokio::test]
async fn reports_leave_the_source_data_untouched() {
    let store = seeded_store();
    let before = store.aggregate(&catalog::orders_per_day()).await.unwrap();
    for (_, pipeline) in catalog::fixed_reports() {
        store.aggregate(&pipeline).await.unwrap();
    }
    let after = store.aggregate(&catalog::orders_per_day()).await.unwrap();
    assert_eq!(before, after, "reads must be idempotent");
}
