//! End-to-end normalization scenarios over the public API.

use chrono::NaiveDate;
use fashion_ingest::models::SaleRecord;
use fashion_ingest::normalize;

fn day(year: i32, month: u32, dayofmonth: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayofmonth).unwrap()
}

struct RecordSpec {
    item_id: i64,
    sale_id: i64,
    sale_date: NaiveDate,
    customer_id: i64,
    product_id: i64,
    size: &'static str,
    channel: &'static str,
    country: &'static str,
}

fn build(spec: RecordSpec) -> SaleRecord {
    SaleRecord {
        item_id: spec.item_id,
        sale_id: spec.sale_id,
        sale_date: spec.sale_date,
        channel: spec.channel.to_string(),
        campaign: spec.channel.to_string(),
        customer_id: spec.customer_id,
        first_name: Some("Alice".to_string()),
        last_name: Some("Dupont".to_string()),
        email: Some("alice@test.com".to_string()),
        gender: "Female".to_string(),
        age_range: "26-35".to_string(),
        signup_date: day(2025, 1, 1),
        country: spec.country.to_string(),
        product_id: spec.product_id,
        product_name: format!("Prod {}", spec.product_id),
        category: "Shoes".to_string(),
        brand: "Tiva".to_string(),
        color: "Red".to_string(),
        size: spec.size.to_string(),
        catalog_price: 50.0,
        cost_price: 25.0,
        quantity: 1,
        original_price: 50.0,
        discount_applied: 0.0,
    }
}

/// Three records, two on the target date sharing one sale, one on the next
/// day: the off-date row must be absent from every derived collection.
#[test]
fn test_normalize_filters_and_splits() {
    let records = vec![
        build(RecordSpec {
            item_id: 1,
            sale_id: 100,
            sale_date: day(2025, 6, 16),
            customer_id: 1,
            product_id: 10,
            size: "38",
            channel: "App Mobile",
            country: "France",
        }),
        build(RecordSpec {
            item_id: 2,
            sale_id: 101,
            sale_date: day(2025, 6, 17),
            customer_id: 2,
            product_id: 11,
            size: "M",
            channel: "E-commerce",
            country: "Germany",
        }),
        build(RecordSpec {
            item_id: 3,
            sale_id: 100,
            sale_date: day(2025, 6, 16),
            customer_id: 1,
            product_id: 12,
            size: "40",
            channel: "App Mobile",
            country: "France",
        }),
    ];

    let batch = normalize(&records, day(2025, 6, 16)).expect("batch should not be empty");

    assert_eq!(batch.sale_items.len(), 2);
    assert_eq!(batch.sales.len(), 1);
    assert_eq!(batch.sales[0].sale_id, 100);
    assert!(!batch.customers.is_empty());

    // Nothing from the 2025-06-17 row leaks in
    assert_eq!(batch.countries, vec!["France".to_string()]);
    assert_eq!(batch.channels.len(), 1);
    assert!(!batch.sizes.contains(&"M".to_string()));
    assert!(batch.products.iter().all(|p| p.product_id != 11));
}

#[test]
fn test_normalize_no_data_for_date() {
    let records = vec![build(RecordSpec {
        item_id: 1,
        sale_id: 100,
        sale_date: day(2025, 6, 16),
        customer_id: 1,
        product_id: 10,
        size: "38",
        channel: "App Mobile",
        country: "France",
    })];

    assert!(normalize(&records, day(2025, 12, 31)).is_none());
}

#[test]
fn test_normalize_dedup_counts() {
    let target = day(2025, 6, 16);
    let records = vec![
        build(RecordSpec {
            item_id: 1,
            sale_id: 100,
            sale_date: target,
            customer_id: 1,
            product_id: 10,
            size: "38",
            channel: "App Mobile",
            country: "France",
        }),
        build(RecordSpec {
            item_id: 2,
            sale_id: 100,
            sale_date: target,
            customer_id: 1,
            product_id: 10,
            size: "38",
            channel: "App Mobile",
            country: "France",
        }),
        build(RecordSpec {
            item_id: 3,
            sale_id: 102,
            sale_date: target,
            customer_id: 2,
            product_id: 11,
            size: "39",
            channel: "E-commerce",
            country: "Germany",
        }),
    ];

    let batch = normalize(&records, target).unwrap();

    // One entry per distinct key; one fact row per input record
    assert_eq!(batch.customers.len(), 2);
    assert_eq!(batch.products.len(), 2);
    assert_eq!(batch.sales.len(), 2);
    assert_eq!(batch.sale_items.len(), 3);
    assert_eq!(batch.line_count(), 3);
}

#[test]
fn test_normalize_sizes_are_textual_and_comparable() {
    let target = day(2025, 6, 16);
    let records = vec![
        build(RecordSpec {
            item_id: 1,
            sale_id: 100,
            sale_date: target,
            customer_id: 1,
            product_id: 10,
            size: "38",
            channel: "App Mobile",
            country: "France",
        }),
        build(RecordSpec {
            item_id: 2,
            sale_id: 101,
            sale_date: target,
            customer_id: 2,
            product_id: 11,
            size: "38.0",
            channel: "App Mobile",
            country: "France",
        }),
        build(RecordSpec {
            item_id: 3,
            sale_id: 102,
            sale_date: target,
            customer_id: 3,
            product_id: 12,
            size: "M",
            channel: "App Mobile",
            country: "France",
        }),
    ];

    let batch = normalize(&records, target).unwrap();

    // Numeric-looking forms collapse to one textual entry; alpha stays
    assert_eq!(batch.sizes, vec!["38".to_string(), "M".to_string()]);
    // Product references resolve against the same canonical labels
    for product in &batch.products {
        assert!(batch.sizes.contains(&product.size));
    }
}
