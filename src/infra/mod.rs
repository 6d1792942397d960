//! Concrete adapters for the bin source, insight store and reasoning service.

pub mod bins;
pub mod openrouter;
pub mod storage;
