#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::adapters::ProviderKind;
use crate::domain::model::{CompletionParams, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Outbound request timeout. `None` waits for the provider indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl ProviderSettings {
    /// The key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Fully resolved configuration, built once at startup and handed to the
/// server and the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub generation: CompletionParams,
}

/// Settings from a single source (TOML file, command line).
/// Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ConfigLayer {
    /// Returns a layer where fields set in `other` win.
    pub fn merge(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            static_dir: other.static_dir.or(self.static_dir),
            provider: other.provider.or(self.provider),
            model: other.model.or(self.model),
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
            timeout_seconds: other.timeout_seconds.or(self.timeout_seconds),
            max_tokens: other.max_tokens.or(self.max_tokens),
            temperature: other.temperature.or(self.temperature),
        }
    }
}

impl RelayConfig {
    /// Resolves a layer against defaults, reading the provider's key variable
    /// from the process environment when no key was given.
    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        Self::resolve_with(layer, |name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(layer: ConfigLayer, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = layer.provider.unwrap_or_default();

        let api_key = layer
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env(kind.api_key_env()).filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| RelayError::ConfigError {
                message: format!(
                    "no API key for provider '{}': pass --api-key, set provider.api_key or export {}",
                    kind,
                    kind.api_key_env()
                ),
            })?;

        Ok(Self {
            server: ServerSettings {
                host: layer.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: layer.port.unwrap_or(DEFAULT_PORT),
                static_dir: layer
                    .static_dir
                    .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            },
            provider: ProviderSettings {
                kind,
                api_key,
                base_url: layer
                    .base_url
                    .unwrap_or_else(|| kind.default_base_url().to_string()),
                model: layer
                    .model
                    .unwrap_or_else(|| kind.default_model().to_string()),
                timeout_seconds: layer.timeout_seconds,
            },
            generation: CompletionParams {
                max_tokens: layer.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: layer.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_path("server.static_dir", &self.server.static_dir)?;

        validation::validate_url("provider.base_url", &self.provider.base_url)?;
        validation::validate_non_empty_string("provider.model", &self.provider.model)?;
        if let Some(secs) = self.provider.timeout_seconds {
            validation::validate_range("provider.timeout_seconds", secs, 1, 600)?;
        }

        validation::validate_range("generation.max_tokens", self.generation.max_tokens, 1, 4096)?;
        validation::validate_range("generation.temperature", self.generation.temperature, 0.0, 2.0)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
