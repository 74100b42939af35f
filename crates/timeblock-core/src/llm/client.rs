//! LlmClient trait definition

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{extract_json, LlmError, Message};

/// Chat-style language model.
///
/// Every call receives the full conversation; clients keep no state between
/// calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the conversation and returns the text of the reply.
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError>;
}

/// Sends the conversation and parses the first JSON value in the reply.
///
/// Returns the raw reply alongside the parsed value so callers can put it
/// back into the conversation.
pub async fn chat_json<T>(
    client: &dyn LlmClient,
    messages: &[Message],
) -> Result<(T, String), LlmError>
where
    T: DeserializeOwned,
{
    let raw = client.chat(messages).await?;
    let value = parse_json(&raw)?;
    Ok((value, raw))
}

/// Parses the first JSON value embedded in `text`.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let json = extract_json(text)
        .ok_or_else(|| LlmError::InvalidResponse("no JSON found in response".to_string()))?;
    Ok(serde_json::from_str(json)?)
}
