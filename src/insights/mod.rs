//! Insight generation: history context, prompting, response validation and
//! the deterministic fallback.

pub mod extract;
pub mod fallback;
pub mod history;
pub mod prompt;
pub mod requester;
pub mod types;

pub use fallback::FallbackSynthesizer;
pub use history::{latest, load_recent};
pub use requester::{InsightRequester, RequestSettings};
pub use types::{HistoricalInsight, InsightPayload, SystemErrorPayload};
