//! Token usage normalization across provider response shapes.

use super::provider::Provider;
use crate::response::TokenUsage;
use serde_json::Value;

impl TokenUsage {
    /// Read a provider's `usage` object. Missing or non-integer fields count
    /// as zero, and a missing total is the sum of input and output.
    pub fn from_provider_json(provider: Provider, usage: &Value) -> Self {
        let field = |name: &str| usage.get(name).and_then(Value::as_u64).unwrap_or(0);

        let (input, output, total) = match provider {
            Provider::OpenAi => (
                field("prompt_tokens"),
                field("completion_tokens"),
                field("total_tokens"),
            ),
            Provider::Anthropic => (field("input_tokens"), field("output_tokens"), 0),
        };

        Self {
            input_tokens: input,
            output_tokens: output,
            total_tokens: if total == 0 { input.saturating_add(output) } else { total },
        }
    }
}
