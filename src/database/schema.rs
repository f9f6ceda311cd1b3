//! Star-schema DDL for the sales warehouse.
//!
//! Dimension identity is carried by UNIQUE natural-key constraints; the
//! loader's conflict-resolution clauses depend on them being enforced.

/// Schema helper holding the DDL applied by `SalesLoader::initialize`.
pub struct IngestSchema;

impl IngestSchema {
    /// Table creation SQL. Idempotent; safe to run before every load.
    pub fn create_tables_sql() -> &'static str {
        r#"
-- Scalar dimensions, one row per distinct natural-key value
CREATE TABLE IF NOT EXISTS countries (
    country_id SERIAL PRIMARY KEY,
    country_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS categories (
    category_id SERIAL PRIMARY KEY,
    category_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS brands (
    brand_id SERIAL PRIMARY KEY,
    brand_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS colors (
    color_id SERIAL PRIMARY KEY,
    color_name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS sizes (
    size_id SERIAL PRIMARY KEY,
    size_label TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS age_ranges (
    age_range_id SERIAL PRIMARY KEY,
    age_range_label TEXT NOT NULL UNIQUE
);

-- Channels carry an informational campaign label next to the natural key
CREATE TABLE IF NOT EXISTS channels (
    channel_id SERIAL PRIMARY KEY,
    channel_name TEXT NOT NULL UNIQUE,
    campaign_name TEXT
);

CREATE TABLE IF NOT EXISTS customers (
    customer_id BIGINT PRIMARY KEY,
    first_name TEXT,
    last_name TEXT,
    email TEXT,
    gender TEXT,
    age_range_id INTEGER NOT NULL REFERENCES age_ranges(age_range_id),
    signup_date DATE NOT NULL,
    country_id INTEGER NOT NULL REFERENCES countries(country_id)
);

CREATE TABLE IF NOT EXISTS products (
    product_id BIGINT PRIMARY KEY,
    product_name TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(category_id),
    brand_id INTEGER NOT NULL REFERENCES brands(brand_id),
    color_id INTEGER NOT NULL REFERENCES colors(color_id),
    size_id INTEGER NOT NULL REFERENCES sizes(size_id),
    catalog_price DOUBLE PRECISION NOT NULL,
    cost_price DOUBLE PRECISION NOT NULL
);

CREATE TABLE IF NOT EXISTS sales (
    sale_id BIGINT PRIMARY KEY,
    sale_date DATE NOT NULL,
    customer_id BIGINT NOT NULL REFERENCES customers(customer_id),
    channel_id INTEGER NOT NULL REFERENCES channels(channel_id)
);

CREATE TABLE IF NOT EXISTS sale_items (
    item_id BIGINT PRIMARY KEY,
    sale_id BIGINT NOT NULL REFERENCES sales(sale_id),
    product_id BIGINT NOT NULL REFERENCES products(product_id),
    quantity INTEGER NOT NULL,
    original_price DOUBLE PRECISION NOT NULL,
    discount_applied DOUBLE PRECISION NOT NULL
);
"#
    }

    /// Index creation SQL for the foreign-key columns reporting queries
    /// join on.
    pub fn create_indexes_sql() -> &'static str {
        r#"
CREATE INDEX IF NOT EXISTS idx_sales_customer ON sales(customer_id);
CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(sale_date);
CREATE INDEX IF NOT EXISTS idx_sale_items_sale ON sale_items(sale_id);
CREATE INDEX IF NOT EXISTS idx_sale_items_product ON sale_items(product_id);
"#
    }
}
