//! Seams between the pipeline and its external collaborators.

pub mod bin_source;
pub mod insight_store;
pub mod reasoning;

pub use bin_source::BinSource;
pub use insight_store::{InsightRecord, InsightStore};
pub use reasoning::{ChatMessage, ChatRequest, ChatResponse, ReasoningService, Role};
