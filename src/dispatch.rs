use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::DispatchError;

/// Shown in place of a reply whenever a dispatch fails for any reason
pub const FALLBACK_REPLY: &str = "System is in Offline";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Clone, Debug)]
pub struct ChatClient {
    client: Client,
    endpoint: Url,
}

impl ChatClient {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid chat endpoint: {}", endpoint))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `text` to the endpoint and return the `reply` field.
    ///
    /// The status code does not decide the outcome: an error status with a
    /// JSON body still yields its reply. A body without a usable `reply`
    /// (missing, null, false, zero, or not an object at all) is an empty
    /// string; only a body that is not JSON, or is JSON `null`, fails.
    pub async fn send(&self, text: &str) -> Result<String, DispatchError> {
        let request = ChatRequest { message: text };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, endpoint = %self.endpoint, "chat endpoint returned an error status");
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        debug!(bytes = body.len(), "chat reply received");

        reply_text(&value)
    }
}

/// Pull the displayable reply out of a decoded body
fn reply_text(value: &Value) -> Result<String, DispatchError> {
    if value.is_null() {
        return Err(DispatchError::Malformed("body is null".to_string()));
    }

    let reply = match value.get("reply") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => String::new(),
    };
    Ok(reply)
}

/// Await a spawned dispatch; a task that panicked or was cancelled still
/// settles, as [`DispatchError::Aborted`].
pub async fn settle(
    handle: JoinHandle<Result<String, DispatchError>>,
) -> Result<String, DispatchError> {
    handle.await?
}

/// Collapse a dispatch outcome into the text shown to the user
pub fn reply_or_fallback(outcome: Result<String, DispatchError>) -> String {
    match outcome {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "dispatch failed, showing fallback reply");
            FALLBACK_REPLY.to_string()
        }
    }
}
