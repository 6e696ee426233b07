//! Text generation and token counting collaborators

pub mod client;
pub mod tokens;

// Re-export main types for convenience
pub use client::{Generator, OllamaClient};
pub use tokens::{DefaultCounter, EstimateCounter, TiktokenCounter, TokenCounter, estimate_tokens};
