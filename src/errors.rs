use thiserror::Error;

/// Failure of a single call to the text-generation service.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Failed to reach generation service: {0}")]
    Unavailable(String),

    #[error("Generation service returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Failed to decode generation service response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() || error.is_request() || error.is_body() {
            GenerateError::Unavailable(error.to_string())
        } else if error.is_decode() {
            GenerateError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            GenerateError::Status {
                code: status.as_u16(),
                body: error.to_string(),
            }
        } else {
            GenerateError::Unavailable(error.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(error: serde_json::Error) -> Self {
        GenerateError::Decode(error.to_string())
    }
}

/// Failure of a whole pipeline invocation, tagged with the stage it happened in.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to summarize group {index}: {source}")]
    GroupSummaryFailed {
        index: usize,
        #[source]
        source: GenerateError,
    },

    #[error("Failed to generate final summary: {source}")]
    ConsolidationFailed {
        #[source]
        source: GenerateError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Flat classification used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    UpstreamUnavailable,
    UpstreamStatusError,
    DecodeError,
    GroupSummaryFailed,
    ConsolidationFailed,
}

impl ErrorKind {
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::UpstreamUnavailable => 504,
            ErrorKind::UpstreamStatusError
            | ErrorKind::DecodeError
            | ErrorKind::GroupSummaryFailed
            | ErrorKind::ConsolidationFailed => 502,
        }
    }
}

impl GenerateError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::Unavailable(_) => ErrorKind::UpstreamUnavailable,
            GenerateError::Status { .. } => ErrorKind::UpstreamStatusError,
            GenerateError::Decode(_) => ErrorKind::DecodeError,
        }
    }
}

impl SummarizeError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            SummarizeError::InvalidInput(_) => ErrorKind::InvalidInput,
            SummarizeError::GroupSummaryFailed { .. } => ErrorKind::GroupSummaryFailed,
            SummarizeError::ConsolidationFailed { .. } => ErrorKind::ConsolidationFailed,
        }
    }

    /// Kind of the underlying generation failure, if any.
    #[must_use]
    pub const fn upstream_kind(&self) -> Option<ErrorKind> {
        match self {
            SummarizeError::InvalidInput(_) => None,
            SummarizeError::GroupSummaryFailed { source, .. }
            | SummarizeError::ConsolidationFailed { source } => Some(source.kind()),
        }
    }
}
