//! Chat completion seam.
//!
//! The pipeline never talks HTTP itself. A host plugs in a `ChatCompletion`
//! implementation (reqwest, a proxy, a recorded fixture) and this module
//! supplies the provider-specific request bodies and response readers so
//! implementations stay thin.

use super::payload::ImagePayload;
use super::provider::Provider;
use crate::error::ProviderError;
use crate::response::TokenUsage;
use async_trait::async_trait;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub provider: Provider,
    pub model: String,
    pub system_prompt: String,
    pub user_instruction: String,
    pub image: ImagePayload,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Wire body for the provider's chat endpoint.
    pub fn to_provider_json(&self) -> Value {
        match self.provider {
            Provider::OpenAi => json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    { "role": "system", "content": self.system_prompt },
                    {
                        "role": "user",
                        "content": [
                            { "type": "text", "text": self.user_instruction },
                            {
                                "type": "image_url",
                                "image_url": { "url": self.image.data_url(), "detail": "high" }
                            }
                        ]
                    }
                ]
            }),
            Provider::Anthropic => json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "system": self.system_prompt,
                "messages": [
                    {
                        "role": "user",
                        "content": [
                            { "type": "text", "text": self.user_instruction },
                            {
                                "type": "image",
                                "source": {
                                    "type": "base64",
                                    "media_type": self.image.mime_type,
                                    "data": self.image.data_base64
                                }
                            }
                        ]
                    }
                ]
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Read the assistant text and usage out of a provider response body.
    pub fn from_provider_json(provider: Provider, body: &Value) -> Result<Self, ProviderError> {
        let text = match provider {
            Provider::OpenAi => body
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str),
            Provider::Anthropic => body
                .get("content")
                .and_then(Value::as_array)
                .and_then(|blocks| {
                    blocks
                        .iter()
                        .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                })
                .and_then(|b| b.get("text"))
                .and_then(Value::as_str),
        };

        let text = match text {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => return Err(ProviderError::EmptyContent),
        };

        let usage = body
            .get("usage")
            .map(|u| TokenUsage::from_provider_json(provider, u))
            .unwrap_or_default();

        Ok(Self { text, usage })
    }
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}
