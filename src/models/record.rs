//! Flat input row as it arrives from the object store.

use chrono::NaiveDate;
use serde::Deserialize;

/// One denormalized sale line as read from the source CSV.
///
/// Each row is a join of transaction, customer, product, and line-item
/// attributes; no single row is meaningful on its own. Columns beyond the
/// ones listed here (running totals, display percentages) are ignored at
/// decode time, and a missing required column fails the decode before any
/// load is attempted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaleRecord {
    pub item_id: i64,
    pub sale_id: i64,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub sale_date: NaiveDate,
    pub channel: String,
    /// Source column `channel_campaigns`.
    #[serde(rename = "channel_campaigns")]
    pub campaign: String,
    pub customer_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: String,
    pub age_range: String,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub signup_date: NaiveDate,
    pub country: String,
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub brand: String,
    pub color: String,
    /// Raw size label; canonicalized by [`canonical_size`] during
    /// normalization.
    pub size: String,
    pub catalog_price: f64,
    pub cost_price: f64,
    pub quantity: i32,
    pub original_price: f64,
    pub discount_applied: f64,
}

/// Canonical text form of a size label.
///
/// Numeric-looking labels collapse to their integer string form so that
/// `38`, `"38"`, and `"38.0"` all compare equal, while half sizes like
/// `"7.5"` and alpha sizes like `"M"` keep their text form.
pub fn canonical_size(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.fract() == 0.0 && n.abs() < 1e15 {
            return format!("{}", n as i64);
        }
    }
    trimmed.to_string()
}

/// Accepts the date shapes seen in exported sales files: plain dates and
/// date-times with either a space or a `T` separator.
mod flexible_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(datetime.date());
            }
        }
        None
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).ok_or_else(|| Error::custom(format!("unrecognized date: {raw:?}")))
    }
}
