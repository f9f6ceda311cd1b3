//! Fashion store sales ingestion pipeline
//!
//! Loads one day of denormalized sales records from object storage, splits
//! them into a star schema in memory, and upserts the result into PostgreSQL
//! inside a single transaction.
//!
//! The pipeline has three stages:
//! - [`source`] fetches the raw CSV batch and decodes it into typed records,
//! - [`transform`] filters the batch to the run date and normalizes it,
//! - [`database`] resolves natural keys to surrogate ids and applies the
//!   writes with conflict-safe upserts, committing or rolling back as a unit.

pub mod config;
pub mod database;
pub mod models;
pub mod source;
pub mod transform;

// Re-export the types a caller needs to drive one ingestion run
pub use config::IngestConfig;
pub use database::loader::{LoadSummary, SalesLoader};
pub use database::{DatabaseError, DatabaseResult};
pub use models::{NormalizedBatch, SaleRecord};
pub use source::{RowSource, SourceError};
pub use transform::normalize;
