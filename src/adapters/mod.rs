//! Provider adapters: concrete `CompletionProvider` implementations.
//!
//! `openai` speaks the OpenAI-compatible chat completions protocol and also
//! serves Groq, DeepSeek and OpenRouter, which differ only in base URL,
//! default model and key variable. `anthropic` and `gemini` speak their own
//! native protocols.

pub mod anthropic;
pub mod failure;
pub mod gemini;
pub mod openai;

use crate::config::ProviderSettings;
use crate::domain::ports::CompletionProvider;
use crate::utils::error::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[cfg_attr(feature = "cli", value(name = "openai"))]
    OpenAi,
    Groq,
    #[cfg_attr(feature = "cli", value(name = "deepseek"))]
    DeepSeek,
    #[cfg_attr(feature = "cli", value(name = "openrouter"))]
    OpenRouter,
    Anthropic,
    Gemini,
}

/// Wire protocol spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    ChatCompletions,
    AnthropicMessages,
    GeminiGenerateContent,
}

impl ProviderKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Groq => "Groq",
            ProviderKind::DeepSeek => "DeepSeek",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
        }
    }

    pub fn protocol(self) -> Protocol {
        match self {
            ProviderKind::OpenAi
            | ProviderKind::Groq
            | ProviderKind::DeepSeek
            | ProviderKind::OpenRouter => Protocol::ChatCompletions,
            ProviderKind::Anthropic => Protocol::AnthropicMessages,
            ProviderKind::Gemini => Protocol::GeminiGenerateContent,
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::DeepSeek => "https://api.deepseek.com/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-3.5-turbo",
            ProviderKind::Groq => "llama-3.1-8b-instant",
            ProviderKind::DeepSeek => "deepseek-chat",
            ProviderKind::OpenRouter => "openai/gpt-3.5-turbo",
            ProviderKind::Anthropic => "claude-3-haiku-20240307",
            ProviderKind::Gemini => "gemini-1.5-flash",
        }
    }

    /// Environment variable consulted when no key is configured explicitly.
    pub fn api_key_env(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        };
        f.write_str(name)
    }
}

/// Builds the adapter selected by `settings.kind`. Called once at startup.
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn CompletionProvider>> {
    let mut builder = Client::builder();
    if let Some(secs) = settings.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;

    tracing::debug!(
        provider = %settings.kind,
        base_url = %settings.base_url,
        model = %settings.model,
        "Initialized completion provider"
    );

    let provider: Arc<dyn CompletionProvider> = match settings.kind.protocol() {
        Protocol::ChatCompletions => Arc::new(OpenAiProvider::new(settings, client)),
        Protocol::AnthropicMessages => Arc::new(AnthropicProvider::new(settings, client)),
        Protocol::GeminiGenerateContent => Arc::new(GeminiProvider::new(settings, client)),
    };
    Ok(provider)
}
