use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_MODEL: &str = "artifish/llama3.2-uncensored:latest";
/// Working context of the service minus a reserve for the instruction text.
pub const DEFAULT_TOKEN_BUDGET: usize = 4096 - 100;
pub const DEFAULT_WORD_LIMIT: usize = 400;

const DEFAULT_OLLAMA_HOST: &str = "localhost";
const DEFAULT_OLLAMA_PORT: &str = "11434";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ollama_base_url: Url,
    pub default_model: String,
    pub default_token_budget: usize,
    pub default_word_limit: usize,
    /// Deadline applied to each generation call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Number of passage summaries allowed in flight at once. 1 keeps calls sequential.
    pub group_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: base_url(DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT)
                .unwrap_or_else(|_| unreachable!("default Ollama URL is well-formed")),
            default_model: DEFAULT_MODEL.to_string(),
            default_token_budget: DEFAULT_TOKEN_BUDGET,
            default_word_limit: DEFAULT_WORD_LIMIT,
            request_timeout: None,
            group_concurrency: 1,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or empty keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        let port = get("OLLAMA_PORT").unwrap_or_else(|| DEFAULT_OLLAMA_PORT.to_string());
        let ollama_base_url = base_url(&host, &port).map_err(|e| ConfigError::Invalid {
            var: "OLLAMA_HOST",
            value: format!("{host}:{port}"),
            reason: e.to_string(),
        })?;

        let default_token_budget =
            parse_positive(get("SUMMARIZER_TOKEN_BUDGET"), "SUMMARIZER_TOKEN_BUDGET")?
                .unwrap_or(DEFAULT_TOKEN_BUDGET);
        let default_word_limit =
            parse_positive(get("SUMMARIZER_WORD_LIMIT"), "SUMMARIZER_WORD_LIMIT")?
                .unwrap_or(DEFAULT_WORD_LIMIT);
        let request_timeout = parse_positive(
            get("SUMMARIZER_REQUEST_TIMEOUT_SECS"),
            "SUMMARIZER_REQUEST_TIMEOUT_SECS",
        )?
        .map(|secs| Duration::from_secs(secs as u64));
        let group_concurrency = parse_positive(
            get("SUMMARIZER_GROUP_CONCURRENCY"),
            "SUMMARIZER_GROUP_CONCURRENCY",
        )?
        .unwrap_or(1);

        Ok(Self {
            ollama_base_url,
            default_model: get("SUMMARIZER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            default_token_budget,
            default_word_limit,
            request_timeout,
            group_concurrency,
        })
    }
}

fn base_url(host: &str, port: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("http://{host}:{port}"))
}

fn parse_positive(raw: Option<String>, var: &'static str) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(v) => Ok(Some(v)),
        Err(e) => Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
