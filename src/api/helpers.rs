//! Response builders shared by the API handler.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::errors::{GenerateError, SummarizeError};

/// Returns a 200 OK response with `body` serialized as JSON.
#[must_use]
pub fn ok_json<T: Serialize>(body: &T) -> Value {
    match serde_json::to_string(body) {
        Ok(body) => json!({
            "statusCode": 200,
            "headers": { "Content-Type": "application/json" },
            "body": body
        }),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            err_response(500, "Failed to serialize response")
        }
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": message }).to_string()
    })
}

/// Maps a pipeline failure onto an error response.
#[must_use]
pub fn summarize_error_response(err: &SummarizeError) -> Value {
    err_response(err.kind().status_code(), &err.to_string())
}

/// Maps a generation-service failure onto an error response.
#[must_use]
pub fn generate_error_response(err: &GenerateError) -> Value {
    err_response(err.kind().status_code(), &err.to_string())
}
