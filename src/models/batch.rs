//! Normalized collections produced by the transform stage.

use chrono::NaiveDate;

/// Sales channel with its marketing campaign label.
///
/// The natural key is `name`; `campaign` is informational and takes no part
/// in conflict resolution at load time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Channel {
    pub name: String,
    pub campaign: String,
}

/// One customer, deduplicated by `customer_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: String,
    /// Natural-key reference into the age-range dimension.
    pub age_range: String,
    pub signup_date: NaiveDate,
    /// Natural-key reference into the country dimension.
    pub country: String,
}

/// One product, deduplicated by `product_id`. Category, brand, color, and
/// size are natural-key references resolved at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub color: String,
    pub size: String,
    pub catalog_price: f64,
    pub cost_price: f64,
}

/// One sale transaction, deduplicated by `sale_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub sale_id: i64,
    pub sale_date: NaiveDate,
    pub customer_id: i64,
    /// Natural-key reference into the channels table.
    pub channel: String,
}

/// One sale line, one per input record. `item_id` is assumed unique in the
/// source; sale and product references are already surrogate-keyed.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
    pub item_id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub original_price: f64,
    pub discount_applied: f64,
}

/// One run's worth of normalized tables.
///
/// Built fresh per run from the date-filtered record set, never mutated
/// after creation, and discarded once the load commits. The scalar
/// dimensions hold sorted, deduplicated natural-key values.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub target_date: NaiveDate,
    pub countries: Vec<String>,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub age_ranges: Vec<String>,
    pub channels: Vec<Channel>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub sale_items: Vec<SaleItem>,
}

impl NormalizedBatch {
    /// Number of fact rows in the batch; equals the filtered input length.
    pub fn line_count(&self) -> usize {
        self.sale_items.len()
    }
}
