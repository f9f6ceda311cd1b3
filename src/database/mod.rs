//! PostgreSQL load stage: schema, connection, and transactional upserts.
//!
//! The loader resolves natural keys to surrogate ids through lookup-table
//! upserts and writes one batch inside a single transaction; either every
//! row commits or none do.

pub mod loader;
pub mod schema;

pub use loader::{LoadSummary, SalesLoader};
pub use schema::IngestSchema;

/// Error type for load operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Failed to connect to the database.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A statement failed inside the load transaction.
    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A natural key referenced by a dependent row was absent from its
    /// lookup map. Indicates a normalization bug upstream, not bad user
    /// data; aborts the transaction.
    #[error("no {dimension} entry for key {key:?}")]
    LookupMiss {
        dimension: &'static str,
        key: String,
    },

    /// Schema creation failed.
    #[error("migration failed: {0}")]
    Migration(String),
}

/// Result type for load operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
