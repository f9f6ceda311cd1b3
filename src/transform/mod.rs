//! Batch normalization: flat sale lines into star-schema collections.
//!
//! This stage is pure. It filters the raw record set to the run's target
//! date and partitions the survivors into the dimension and fact
//! collections of [`NormalizedBatch`], applying one deduplication rule per
//! entity. All side effects (key resolution, writes) belong to the load
//! stage.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::models::{
    Channel, Customer, NormalizedBatch, Product, Sale, SaleItem, SaleRecord, canonical_size,
};

/// Split the record set into normalized dimension and fact collections.
///
/// Only records whose `sale_date` equals `target_date` are considered; the
/// comparison is on parsed dates, never on strings. Returns `None` when no
/// record matches, which callers treat as a successful no-op run.
///
/// Deduplication rules:
/// - scalar dimensions and channel pairs are sets,
/// - customers, products, and sales keep the first occurrence per key,
/// - sale items are taken one per input record.
pub fn normalize(records: &[SaleRecord], target_date: NaiveDate) -> Option<NormalizedBatch> {
    let filtered: Vec<&SaleRecord> = records
        .iter()
        .filter(|record| record.sale_date == target_date)
        .collect();
    if filtered.is_empty() {
        return None;
    }
    tracing::info!("{} rows matched {}", filtered.len(), target_date);

    let mut countries = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut brands = BTreeSet::new();
    let mut colors = BTreeSet::new();
    let mut sizes = BTreeSet::new();
    let mut age_ranges = BTreeSet::new();
    let mut channels = BTreeSet::new();

    let mut seen_customers = HashSet::new();
    let mut seen_products = HashSet::new();
    let mut seen_sales = HashSet::new();
    let mut customers = Vec::new();
    let mut products = Vec::new();
    let mut sales = Vec::new();
    let mut sale_items = Vec::with_capacity(filtered.len());

    for record in &filtered {
        countries.insert(record.country.clone());
        categories.insert(record.category.clone());
        brands.insert(record.brand.clone());
        colors.insert(record.color.clone());
        sizes.insert(canonical_size(&record.size));
        age_ranges.insert(record.age_range.clone());
        channels.insert(Channel {
            name: record.channel.clone(),
            campaign: record.campaign.clone(),
        });

        if seen_customers.insert(record.customer_id) {
            customers.push(Customer {
                customer_id: record.customer_id,
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                email: record.email.clone(),
                gender: record.gender.clone(),
                age_range: record.age_range.clone(),
                signup_date: record.signup_date,
                country: record.country.clone(),
            });
        }

        if seen_products.insert(record.product_id) {
            products.push(Product {
                product_id: record.product_id,
                name: record.product_name.clone(),
                category: record.category.clone(),
                brand: record.brand.clone(),
                color: record.color.clone(),
                size: canonical_size(&record.size),
                catalog_price: record.catalog_price,
                cost_price: record.cost_price,
            });
        }

        if seen_sales.insert(record.sale_id) {
            sales.push(Sale {
                sale_id: record.sale_id,
                sale_date: record.sale_date,
                customer_id: record.customer_id,
                channel: record.channel.clone(),
            });
        }

        sale_items.push(SaleItem {
            item_id: record.item_id,
            sale_id: record.sale_id,
            product_id: record.product_id,
            quantity: record.quantity,
            original_price: record.original_price,
            discount_applied: record.discount_applied,
        });
    }

    Some(NormalizedBatch {
        target_date,
        countries: countries.into_iter().collect(),
        categories: categories.into_iter().collect(),
        brands: brands.into_iter().collect(),
        colors: colors.into_iter().collect(),
        sizes: sizes.into_iter().collect(),
        age_ranges: age_ranges.into_iter().collect(),
        channels: channels.into_iter().collect(),
        customers,
        products,
        sales,
        sale_items,
    })
}
