/// Chat Summarizer - condenses chats that are too long for a model's context window.
///
/// Long chats are split into token-bounded groups, each group is summarized on
/// its own, and the partial summaries are then consolidated into one final
/// summary of a requested length.
///
/// # Architecture
///
/// The system uses:
/// - tiktoken-rs (`o200k_base`) to size message groups
/// - An Ollama server, reached over reqwest, for text generation
/// - AWS Lambda (`lambda_runtime`) for the thin HTTP boundary
/// - Tokio for the async runtime
///
/// # Example
///
/// ```no_run
/// use chat_summarizer::ai::{OllamaClient, TiktokenCounter};
/// use chat_summarizer::core::config::AppConfig;
/// use chat_summarizer::pipeline::{SummarizationPipeline, SummaryOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     chat_summarizer::setup_logging();
///
///     let config = AppConfig::default();
///     let pipeline = SummarizationPipeline::new(
///         OllamaClient::new(&config)?,
///         TiktokenCounter::new()?,
///         config,
///     );
///
///     let messages = vec![
///         "**Mara** (User): The ferry is late again.\n\n---\n\n".to_string(),
///         "**Keeper**: Fog on the strait. It always is in March.\n\n---\n\n".to_string(),
///     ];
///     let outcome = pipeline
///         .summarize(&messages, &SummaryOptions::default())
///         .await?;
///
///     println!("Summary: {}", outcome.summary);
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod chunker;
pub mod core;
pub mod errors;
pub mod pipeline;
pub mod prompt;
pub mod render;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. The level defaults to `info` and can be
/// overridden with `RUST_LOG`. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// chat_summarizer::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
