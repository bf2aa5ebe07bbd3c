//! Error types for the translation pipeline.
//!
//! Local anomalies (a truncated or filtered completion) are not errors: they
//! are logged and absorbed by the translator. Everything here surfaces to the
//! top level and ends the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A language code outside the closed set of supported languages
    #[error("Unsupported language code: '{0}'")]
    UnsupportedLanguageCode(String),

    /// The planner produced nothing to write back
    #[error("No text replacements found")]
    NoOperations,

    /// A remote service answered with a non-success HTTP status
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The completion service answered without any choices
    #[error("OpenAI response contained no choices")]
    EmptyCompletion,
}

impl Error {
    /// Whether a retry could plausibly succeed: rate limits and server errors.
    ///
    /// Other 4xx responses (bad request, bad credentials) fail the same way
    /// every time.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::EmptyCompletion => true,
            Error::UnsupportedLanguageCode(_) | Error::NoOperations => false,
        }
    }
}

/// Decide whether an `anyhow` error from a remote call is worth retrying.
///
/// Typed API errors decide for themselves; anything else (connection refused,
/// timeouts, a truncated body that fails to parse) is treated as transient.
pub fn is_retryable_error(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<Error>() {
        Some(e) => e.is_transient(),
        None => true,
    }
}
