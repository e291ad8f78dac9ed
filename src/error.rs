//! Error types for the chat dispatcher

use thiserror::Error;

/// Why a dispatch did not produce a reply.
///
/// The UI never shows these; they are collapsed into the fallback reply by
/// [`crate::dispatch::reply_or_fallback`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Connection, DNS, TLS or body read failures
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body was JSON but could not hold a reply
    #[error("Malformed reply: {0}")]
    Malformed(String),

    /// The request task ended without settling (panic or cancellation)
    #[error("Dispatch aborted: {0}")]
    Aborted(String),
}

impl From<tokio::task::JoinError> for DispatchError {
    fn from(e: tokio::task::JoinError) -> Self {
        DispatchError::Aborted(e.to_string())
    }
}
