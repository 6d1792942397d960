//! Reasoning service client.

mod client;

pub use client::{ChatCompletionsClient, DEFAULT_BASE_URL};
