//! Error types for the companion core.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the companion core.
///
/// Most external-call failures never surface as errors at all: the analysis
/// bridge and the chat backend substitute fallback content instead (see
/// `analysis` and `chat`), and a missing API key degrades the same way.
/// These variants cover the cases a caller can actually act on.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("A reply is already streaming for this conversation")]
    ExchangeInFlight,

    #[error("No exchange is in flight")]
    NoExchange,

    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),
}
