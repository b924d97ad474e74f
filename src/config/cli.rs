use crate::adapters::ProviderKind;
use crate::config::{ConfigLayer, RelayConfig, TomlConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "excuse-relay")]
#[command(about = "Relay server that turns a described mishap into an LLM-written excuse")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "EXCUSE_CONFIG")]
    pub config: Option<String>,

    /// Interface to bind
    #[arg(long, env = "EXCUSE_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding the static client
    #[arg(long, env = "EXCUSE_STATIC_DIR")]
    pub static_dir: Option<String>,

    #[arg(long, env = "EXCUSE_PROVIDER", value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long, env = "EXCUSE_MODEL")]
    pub model: Option<String>,

    /// API key; defaults to the provider's own variable (OPENAI_API_KEY, ...)
    #[arg(long, env = "EXCUSE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the provider's base URL (proxies, self-hosted gateways)
    #[arg(long, env = "EXCUSE_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub temperature: Option<f32>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Print the resolved configuration and exit")]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            host: self.host.clone(),
            port: self.port,
            static_dir: self.static_dir.clone(),
            provider: self.provider,
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Loads the TOML file (if any), applies command line overrides and
    /// resolves the result against defaults.
    pub fn load(&self) -> Result<RelayConfig> {
        let file_layer = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let toml = TomlConfig::from_file(path)?;
                toml.validate()?;
                toml.into_layer()?
            }
            None => ConfigLayer::default(),
        };

        RelayConfig::resolve(file_layer.merge(self.layer()))
    }
}
