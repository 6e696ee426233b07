//! API Lambda handler - thin router in front of the summarization pipeline.
//!
//! Routes:
//! - `GET  .../models`  lists the models installed on the Ollama server
//! - `POST .../summary` summarizes a chat and returns the ordered summaries

use lambda_runtime::{Error, LambdaEvent};
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::helpers;
use crate::ai::{DefaultCounter, OllamaClient, TokenCounter};
use crate::core::config::AppConfig;
use crate::core::models::SummaryRequest;
use crate::pipeline::{SummarizationPipeline, SummaryOptions};
use crate::render::render_messages_for_summary;

pub use self::function_handler as handler;

// Loaded once per container and shared by warm invocations.
static TOKEN_COUNTER: Lazy<DefaultCounter> = Lazy::new(DefaultCounter::load);

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error only when the process configuration or the HTTP client
/// cannot be loaded; request-level failures become error responses.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %Uuid::new_v4()))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e.to_string())
    })?;

    let generator = OllamaClient::new(&config)
        .map_err(|e| Error::from(format!("Failed to initialize Ollama client: {e}")))?;
    let pipeline = SummarizationPipeline::new(generator, TOKEN_COUNTER.clone(), config);

    Ok(route(&pipeline, &event.payload).await)
}

/// Dispatches one proxy event to the matching route.
pub async fn route<C>(pipeline: &SummarizationPipeline<OllamaClient, C>, payload: &Value) -> Value
where
    C: TokenCounter,
{
    let path = payload
        .get("rawPath")
        .and_then(|v| v.as_str())
        .or_else(|| payload.get("path").and_then(|v| v.as_str()))
        .unwrap_or("");
    let method = request_method(payload);
    info!(path = %path, method = %method, "Request received");

    if path.ends_with("/models") {
        if !matches!(method, "" | "GET") {
            return helpers::err_response(405, "Method not allowed");
        }
        return handle_models(pipeline.generator()).await;
    }

    if path.ends_with("/summary") {
        if !matches!(method, "" | "POST") {
            return helpers::err_response(405, "Method not allowed");
        }
        return match extract_body(payload) {
            Ok(body) => handle_summary(pipeline, body).await,
            Err(response) => response,
        };
    }

    helpers::err_response(404, "Not found")
}

async fn handle_models(client: &OllamaClient) -> Value {
    match client.list_models().await {
        Ok(models) => helpers::ok_json(&models),
        Err(e) => {
            error!("Failed to list models: {}", e);
            helpers::generate_error_response(&e)
        }
    }
}

async fn handle_summary<C>(pipeline: &SummarizationPipeline<OllamaClient, C>, body: &str) -> Value
where
    C: TokenCounter,
{
    let request: SummaryRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            error!("Summary request parse error: {}", e);
            return helpers::err_response(400, &format!("Parse Error: {e}"));
        }
    };

    let (messages, options) = match summary_inputs(request) {
        Ok(inputs) => inputs,
        Err(message) => return helpers::err_response(400, message),
    };

    match pipeline.summarize(&messages, &options).await {
        Ok(outcome) => helpers::ok_json(&outcome.into_list()),
        Err(e) => {
            error!(upstream = ?e.upstream_kind(), "Failed to generate summary: {}", e);
            helpers::summarize_error_response(&e)
        }
    }
}

fn summary_inputs(request: SummaryRequest) -> Result<(Vec<String>, SummaryOptions), &'static str> {
    let messages = match (request.messages, request.chat) {
        (Some(messages), _) => messages,
        (None, Some(chat)) => render_messages_for_summary(&chat),
        (None, None) => return Err("Request must include `messages` or `chat`"),
    };

    let options = SummaryOptions {
        model: request.model,
        token_budget: positive(request.max_tokens),
        word_limit: positive(request.summary_words),
    };

    Ok((messages, options))
}

fn positive(value: Option<i64>) -> Option<usize> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| usize::try_from(v).ok())
}

fn request_method(payload: &Value) -> &str {
    payload
        .get("requestContext")
        .and_then(|c| c.get("http"))
        .and_then(|h| h.get("method"))
        .and_then(|m| m.as_str())
        .or_else(|| payload.get("httpMethod").and_then(|m| m.as_str()))
        .unwrap_or("")
}

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ChatMessage;

    #[test]
    fn test_summary_inputs_prefers_rendered_messages() {
        let request = SummaryRequest {
            messages: Some(vec!["line one".to_string()]),
            chat: Some(vec![ChatMessage {
                name: "Ann".to_string(),
                is_user: true,
                message: "ignored".to_string(),
            }]),
            max_tokens: Some(-5),
            summary_words: Some(120),
            ..SummaryRequest::default()
        };

        let (messages, options) = summary_inputs(request).unwrap();
        assert_eq!(messages, vec!["line one".to_string()]);
        assert_eq!(options.token_budget, None);
        assert_eq!(options.word_limit, Some(120));
    }

    #[test]
    fn test_summary_inputs_renders_chat() {
        let request = SummaryRequest {
            chat: Some(vec![ChatMessage {
                name: "Ann".to_string(),
                is_user: true,
                message: "Hi there".to_string(),
            }]),
            ..SummaryRequest::default()
        };

        let (messages, _) = summary_inputs(request).unwrap();
        assert_eq!(messages, vec!["**Ann** (User): Hi there\n\n---\n\n".to_string()]);
    }

    #[test]
    fn test_summary_inputs_requires_content() {
        assert!(summary_inputs(SummaryRequest::default()).is_err());
    }

    #[test]
    fn test_token_counter_is_loaded_once() {
        let first: *const DefaultCounter = &*TOKEN_COUNTER;
        let second: *const DefaultCounter = &*TOKEN_COUNTER;
        assert!(std::ptr::eq(first, second));
        assert!(matches!(*TOKEN_COUNTER, DefaultCounter::Tiktoken(_)));
        assert!(TOKEN_COUNTER.clone().count("fog over the harbor") > 0);
    }

    #[test]
    fn test_request_method_reads_both_event_versions() {
        let v2 = serde_json::json!({ "requestContext": { "http": { "method": "POST" } } });
        let v1 = serde_json::json!({ "httpMethod": "GET" });
        assert_eq!(request_method(&v2), "POST");
        assert_eq!(request_method(&v1), "GET");
        assert_eq!(request_method(&serde_json::json!({})), "");
    }
}
