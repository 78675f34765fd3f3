//! Extraction of human-readable messages from service error bodies.
//!
//! The service is not consistent about its error shape: some endpoints send
//! `{"errors": [{"message": ...}]}`, others a bare `{"message": ...}`. Both
//! are accepted, the error list first.

use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Returns the first message found in an error body, if any.
///
/// Looks at `errors[0].message`, then at a top-level `message`. Bodies that
/// are not JSON objects yield `None`.
#[instrument(skip(body), fields(body_len = body.len()))]
pub fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "Error body is not a recognized JSON shape");
            return None;
        }
    };

    parsed
        .errors
        .into_iter()
        .next()
        .and_then(|entry| entry.message)
        .or(parsed.message)
        .filter(|message| !message.is_empty())
}
