pub mod analyzers;
pub mod bins;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod insights;
pub mod output;
pub mod pipeline;
pub mod services;
