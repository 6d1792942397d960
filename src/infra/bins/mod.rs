//! [`crate::services::BinSource`] implementations.

mod http;
mod json_file;
mod memory;

pub use http::HttpBinSource;
pub use json_file::JsonFileBinSource;
pub use memory::InMemoryBinSource;
