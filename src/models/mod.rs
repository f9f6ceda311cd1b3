//! Typed records for the ingestion pipeline.
//!
//! [`SaleRecord`] is the flat row shape the source yields; the remaining
//! types are the normalized star-schema collections the transform stage
//! produces and the loader consumes.

mod batch;
mod record;

pub use batch::{Channel, Customer, NormalizedBatch, Product, Sale, SaleItem};
pub use record::{SaleRecord, canonical_size};
