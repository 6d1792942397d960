//! [`crate::services::InsightStore`] implementations.

mod csv_store;
mod memory;
mod s3_store;

pub use csv_store::CsvInsightStore;
pub use memory::MemoryInsightStore;
pub use s3_store::S3InsightStore;
