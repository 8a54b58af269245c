//! LLM provider metadata and configuration checks.
//!
//! The HTTP calls themselves live behind `ChatCompletion`; this module only
//! knows which providers exist, which model each one runs, and where its
//! API key comes from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Anthropic];

    pub fn id(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Vision model used for analyses.
    pub fn model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Anthropic => "claude-3-5-sonnet-latest",
        }
    }

    pub fn env_key(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Short label used in completion headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "GPT-4o",
            Provider::Anthropic => "Claude",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Provider::OpenAi),
            "anthropic" | "claude" => Some(Provider::Anthropic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Provider metadata exposed to a settings panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub model: String,
    pub env_key: String,
    pub configured: bool,
}

pub fn all_providers() -> Vec<ProviderInfo> {
    Provider::ALL
        .iter()
        .map(|p| ProviderInfo {
            id: p.id().to_string(),
            name: p.display_name().to_string(),
            model: p.model().to_string(),
            env_key: p.env_key().to_string(),
            configured: is_provider_configured(*p),
        })
        .collect()
}

/// Check if a provider has a non-empty API key in the environment.
pub fn is_provider_configured(provider: Provider) -> bool {
    std::env::var(provider.env_key())
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_parse() {
        for p in Provider::ALL {
            assert_eq!(Provider::parse(p.id()), Some(p));
        }
        assert_eq!(Provider::parse(" Claude "), Some(Provider::Anthropic));
        assert_eq!(Provider::parse("gemini"), None);
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        assert_eq!(serde_json::to_string(&Provider::OpenAi).ok().as_deref(), Some("\"openai\""));
        let p: Provider = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(p, Provider::Anthropic);
    }

    #[test]
    fn models_match_providers() {
        assert_eq!(Provider::OpenAi.model(), "gpt-4o");
        assert_eq!(Provider::Anthropic.model(), "claude-3-5-sonnet-latest");
        assert_eq!(all_providers().len(), 2);
    }
}
