//! Service client error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong while talking to the game service.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ApiErrorKind {
    /// The request never produced a response (DNS, connect, timeout, body read).
    #[display("transport failure: {}", _0)]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[display("service rejected request with {}: {}", status, message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, if any.
        message: Option<String>,
    },
    /// A 2xx body did not match the expected shape.
    #[display("malformed response: {}", _0)]
    Decode(String),
}

/// Service client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("API error: {} at {}:{}", kind, file, line)]
pub struct ApiError {
    /// Error category and detail.
    pub kind: ApiErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ApiError {
    /// Creates a new API error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: ApiErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates a transport error.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport(message.into()))
    }

    /// Creates a rejection error for a non-2xx status.
    #[track_caller]
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::new(ApiErrorKind::Rejected { status, message })
    }

    /// Creates a decode error.
    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Decode(message.into()))
    }

    /// Returns the text to show a user for this error.
    ///
    /// Service rejections surface the server's own message when it sent one
    /// and `fallback` otherwise. Transport and decode failures surface their
    /// underlying message.
    #[instrument(skip(self))]
    pub fn user_message(&self, fallback: &str) -> String {
        match &self.kind {
            ApiErrorKind::Transport(message) | ApiErrorKind::Decode(message) => {
                if message.is_empty() {
                    fallback.to_string()
                } else {
                    message.clone()
                }
            }
            ApiErrorKind::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiErrorKind::Rejected { message: None, .. } => fallback.to_string(),
        }
    }
}
