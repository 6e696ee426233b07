//! Ollama API client module
//!
//! Encapsulates all text-generation API interactions used for summaries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::config::AppConfig;
use crate::core::models::Model;
use crate::errors::GenerateError;

/// Upper bound used when no per-call deadline is configured.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(810);

/// Remote text generation, as consumed by the summarization pipeline.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Sends `prompt` to `model` and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Unavailable`] when the service cannot be
    /// reached, [`GenerateError::Status`] for a non-success reply and
    /// [`GenerateError::Decode`] when the reply body is malformed.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError>;
}

#[async_trait]
impl<T> Generator for std::sync::Arc<T>
where
    T: Generator + ?Sized,
{
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        (**self).generate(model, prompt).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatTurn<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagsModel>,
}

#[derive(Debug, Deserialize)]
struct TagsModel {
    name: String,
    model: String,
}

/// HTTP client for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: Url,
    default_model: String,
}

impl OllamaClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, GenerateError> {
        let http = Client::builder()
            .timeout(config.request_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT))
            .build()
            .map_err(|e| {
                GenerateError::Unavailable(format!("Failed to build Ollama HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.ollama_base_url.clone(),
            default_model: config.default_model.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GenerateError> {
        self.base_url
            .join(path)
            .map_err(|e| GenerateError::Unavailable(format!("Invalid Ollama endpoint {path}: {e}")))
    }

    /// Lists the models installed on the server, flagging the configured default.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Generator::generate`].
    pub async fn list_models(&self) -> Result<Vec<Model>, GenerateError> {
        let url = self.endpoint("api/tags")?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = read_body(response).await?;
        let tags: TagsResponse = serde_json::from_slice(&bytes)?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| Model {
                default: m.name == self.default_model,
                name: m.name,
                model: m.model,
            })
            .collect())
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        debug!(model = %model, prompt_chars = prompt.len(), "Requesting generation from Ollama");

        #[cfg(feature = "debug-logs")]
        tracing::info!("Using Ollama prompt:\n{}", prompt);

        let request = ChatRequest {
            model,
            messages: [ChatTurn {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let url = self.endpoint("api/chat")?;
        let response = self.http.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(GenerateError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = read_body(response).await?;
        let reply: ChatResponse = serde_json::from_slice(&bytes)?;
        debug!(chars = reply.message.content.len(), "Ollama generation complete");

        Ok(reply.message.content)
    }
}

/// Reads the whole reply. Payloads are decoded separately, so a failure here
/// is always a transport failure.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, GenerateError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| GenerateError::Unavailable(format!("Failed to read Ollama response body: {e}")))
}
