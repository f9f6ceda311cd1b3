//! Reference resolution and transactional load.
//!
//! Natural keys become surrogate ids through lookup-table upserts; all
//! writes for one batch happen inside a single transaction. The per-table
//! conflict policies make a re-run of the same batch a no-op apart from
//! refreshed customer contact fields.

use std::collections::HashMap;

use tokio_postgres::{Client, NoTls, Transaction};

use super::schema::IngestSchema;
use super::{DatabaseError, DatabaseResult};
use crate::config::PostgresSection;
use crate::models::{Channel, Customer, NormalizedBatch, Product, Sale, SaleItem};

/// Natural-key → surrogate-id map for one lookup table.
type IdMap = HashMap<String, i32>;

/// A scalar dimension table and its id/name columns.
struct Dimension {
    table: &'static str,
    id_col: &'static str,
    name_col: &'static str,
}

const COUNTRIES: Dimension = Dimension {
    table: "countries",
    id_col: "country_id",
    name_col: "country_name",
};
const CATEGORIES: Dimension = Dimension {
    table: "categories",
    id_col: "category_id",
    name_col: "category_name",
};
const BRANDS: Dimension = Dimension {
    table: "brands",
    id_col: "brand_id",
    name_col: "brand_name",
};
const COLORS: Dimension = Dimension {
    table: "colors",
    id_col: "color_id",
    name_col: "color_name",
};
const SIZES: Dimension = Dimension {
    table: "sizes",
    id_col: "size_id",
    name_col: "size_label",
};
const AGE_RANGES: Dimension = Dimension {
    table: "age_ranges",
    id_col: "age_range_id",
    name_col: "age_range_label",
};

/// Row counts written (or matched) by one load call.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub customers: usize,
    pub products: usize,
    pub sales: usize,
    pub sale_items: usize,
    pub duration_ms: u64,
}

/// Loads normalized batches into PostgreSQL.
///
/// Holds one connection for its lifetime; dropping the loader closes the
/// connection on every exit path.
pub struct SalesLoader {
    client: Client,
}

impl SalesLoader {
    /// Connect with the given settings. tokio-postgres splits the client
    /// from the connection task; the task is driven in the background for
    /// the lifetime of the loader.
    pub async fn connect(config: &PostgresSection) -> DatabaseResult<Self> {
        let (client, connection) = config.pg_config().connect(NoTls).await.map_err(|e| {
            DatabaseError::Connection(format!("failed to connect to {}: {}", config.masked(), e))
        })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("postgres connection error: {e}");
            }
        });

        Ok(Self { client })
    }

    /// Create the warehouse schema if it does not exist.
    pub async fn initialize(&self) -> DatabaseResult<()> {
        self.client
            .batch_execute(IngestSchema::create_tables_sql())
            .await
            .map_err(|e| DatabaseError::Migration(format!("failed to create tables: {e}")))?;

        self.client
            .batch_execute(IngestSchema::create_indexes_sql())
            .await
            .map_err(|e| DatabaseError::Migration(format!("failed to create indexes: {e}")))?;

        Ok(())
    }

    /// Load one normalized batch inside a single transaction.
    ///
    /// Step order is load-bearing: the dimension and channel maps built
    /// first are what later steps use to resolve natural keys. Any failure
    /// rolls the whole transaction back and nothing from the run persists.
    pub async fn load(&mut self, batch: &NormalizedBatch) -> DatabaseResult<LoadSummary> {
        let start = std::time::Instant::now();
        let tx = self.client.transaction().await?;

        let countries = upsert_dimension(&tx, &COUNTRIES, &batch.countries).await?;
        let categories = upsert_dimension(&tx, &CATEGORIES, &batch.categories).await?;
        let brands = upsert_dimension(&tx, &BRANDS, &batch.brands).await?;
        let colors = upsert_dimension(&tx, &COLORS, &batch.colors).await?;
        let sizes = upsert_dimension(&tx, &SIZES, &batch.sizes).await?;
        let age_ranges = upsert_dimension(&tx, &AGE_RANGES, &batch.age_ranges).await?;
        let channels = upsert_channels(&tx, &batch.channels).await?;
        tracing::info!("lookup tables loaded");

        insert_customers(&tx, &batch.customers, &age_ranges, &countries).await?;
        tracing::info!("{} customers upserted", batch.customers.len());

        insert_products(&tx, &batch.products, &categories, &brands, &colors, &sizes).await?;
        tracing::info!("{} products upserted", batch.products.len());

        insert_sales(&tx, &batch.sales, &channels).await?;
        tracing::info!("{} sales upserted", batch.sales.len());

        insert_sale_items(&tx, &batch.sale_items).await?;
        tracing::info!("{} sale items upserted", batch.sale_items.len());

        tx.commit().await?;
        tracing::info!("transaction committed");

        Ok(LoadSummary {
            customers: batch.customers.len(),
            products: batch.products.len(),
            sales: batch.sales.len(),
            sale_items: batch.sale_items.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Look a natural key up, treating a miss as a normalization bug.
fn resolve(map: &IdMap, dimension: &'static str, key: &str) -> DatabaseResult<i32> {
    map.get(key)
        .copied()
        .ok_or_else(|| DatabaseError::LookupMiss {
            dimension,
            key: key.to_string(),
        })
}

/// Insert-if-absent for one scalar dimension, then read back the complete
/// natural-key → id mapping. Existing rows are never updated; the read-back
/// covers prior runs' rows so they resolve too.
async fn upsert_dimension(
    tx: &Transaction<'_>,
    dimension: &Dimension,
    values: &[String],
) -> DatabaseResult<IdMap> {
    let insert = format!(
        "INSERT INTO {} ({}) VALUES ($1) ON CONFLICT ({}) DO NOTHING",
        dimension.table, dimension.name_col, dimension.name_col
    );
    let statement = tx.prepare(insert.as_str()).await?;
    for value in values {
        tx.execute(&statement, &[value]).await?;
    }

    let select = format!(
        "SELECT {}, {} FROM {}",
        dimension.id_col, dimension.name_col, dimension.table
    );
    let rows = tx.query(select.as_str(), &[]).await?;
    rows.into_iter()
        .map(|row| Ok((row.try_get::<_, String>(1)?, row.try_get::<_, i32>(0)?)))
        .collect()
}

/// Channel upsert keyed on channel_name; the campaign label rides along on
/// first insertion and is not conflict-checked.
async fn upsert_channels(tx: &Transaction<'_>, channels: &[Channel]) -> DatabaseResult<IdMap> {
    let statement = tx
        .prepare(
            "INSERT INTO channels (channel_name, campaign_name) VALUES ($1, $2) \
             ON CONFLICT (channel_name) DO NOTHING",
        )
        .await?;
    for channel in channels {
        tx.execute(&statement, &[&channel.name, &channel.campaign])
            .await?;
    }

    let rows = tx
        .query("SELECT channel_id, channel_name FROM channels", &[])
        .await?;
    rows.into_iter()
        .map(|row| Ok((row.try_get::<_, String>(1)?, row.try_get::<_, i32>(0)?)))
        .collect()
}

/// Customer upsert: contact fields follow the latest batch, but the
/// reference fields (age_range_id, country_id, signup_date) are never
/// touched on conflict — a customer's original signup cohort survives
/// corrected name/email data.
async fn insert_customers(
    tx: &Transaction<'_>,
    customers: &[Customer],
    age_ranges: &IdMap,
    countries: &IdMap,
) -> DatabaseResult<()> {
    let statement = tx
        .prepare(
            "INSERT INTO customers \
             (customer_id, first_name, last_name, email, gender, age_range_id, signup_date, country_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (customer_id) DO UPDATE SET \
             first_name = EXCLUDED.first_name, \
             last_name = EXCLUDED.last_name, \
             email = EXCLUDED.email",
        )
        .await?;

    for customer in customers {
        let age_range_id = resolve(age_ranges, "age_ranges", &customer.age_range)?;
        let country_id = resolve(countries, "countries", &customer.country)?;
        tx.execute(
            &statement,
            &[
                &customer.customer_id,
                &customer.first_name,
                &customer.last_name,
                &customer.email,
                &customer.gender,
                &age_range_id,
                &customer.signup_date,
                &country_id,
            ],
        )
        .await?;
    }
    Ok(())
}

/// Products are immutable once created; pricing corrections in later
/// batches are dropped on conflict.
async fn insert_products(
    tx: &Transaction<'_>,
    products: &[Product],
    categories: &IdMap,
    brands: &IdMap,
    colors: &IdMap,
    sizes: &IdMap,
) -> DatabaseResult<()> {
    let statement = tx
        .prepare(
            "INSERT INTO products \
             (product_id, product_name, category_id, brand_id, color_id, size_id, catalog_price, cost_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (product_id) DO NOTHING",
        )
        .await?;

    for product in products {
        let category_id = resolve(categories, "categories", &product.category)?;
        let brand_id = resolve(brands, "brands", &product.brand)?;
        let color_id = resolve(colors, "colors", &product.color)?;
        let size_id = resolve(sizes, "sizes", &product.size)?;
        tx.execute(
            &statement,
            &[
                &product.product_id,
                &product.name,
                &category_id,
                &brand_id,
                &color_id,
                &size_id,
                &product.catalog_price,
                &product.cost_price,
            ],
        )
        .await?;
    }
    Ok(())
}

async fn insert_sales(
    tx: &Transaction<'_>,
    sales: &[Sale],
    channels: &IdMap,
) -> DatabaseResult<()> {
    let statement = tx
        .prepare(
            "INSERT INTO sales (sale_id, sale_date, customer_id, channel_id) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (sale_id) DO NOTHING",
        )
        .await?;

    for sale in sales {
        let channel_id = resolve(channels, "channels", &sale.channel)?;
        tx.execute(
            &statement,
            &[&sale.sale_id, &sale.sale_date, &sale.customer_id, &channel_id],
        )
        .await?;
    }
    Ok(())
}

async fn insert_sale_items(tx: &Transaction<'_>, items: &[SaleItem]) -> DatabaseResult<()> {
    let statement = tx
        .prepare(
            "INSERT INTO sale_items \
             (item_id, sale_id, product_id, quantity, original_price, discount_applied) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (item_id) DO NOTHING",
        )
        .await?;

    for item in items {
        tx.execute(
            &statement,
            &[
                &item.item_id,
                &item.sale_id,
                &item.product_id,
                &item.quantity,
                &item.original_price,
                &item.discount_applied,
            ],
        )
        .await?;
    }
    Ok(())
}
