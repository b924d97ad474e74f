use crate::adapters::ProviderKind;
use crate::config::ConfigLayer;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    pub kind: Option<ProviderKind>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| RelayError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 解析後才替換環境變數，變數內容不會被當成 TOML 語法
        let re = placeholder_regex()?;
        for value in [
            &mut config.server.host,
            &mut config.server.static_dir,
            &mut config.provider.model,
            &mut config.provider.api_key,
            &mut config.provider.base_url,
        ]
        .into_iter()
        .flatten()
        {
            *value = substitute_env_vars(&re, value);
        }

        Ok(config)
    }

    /// 轉換成可與命令列合併的設定層
    pub fn into_layer(self) -> Result<ConfigLayer> {
        let re = placeholder_regex()?;
        // 仍是 ${VAR} 的值代表環境變數不存在，視為未設定
        let resolved = |value: Option<String>| value.filter(|v| !re.is_match(v));

        Ok(ConfigLayer {
            host: self.server.host,
            port: self.server.port,
            static_dir: self.server.static_dir,
            provider: self.provider.kind,
            model: resolved(self.provider.model),
            api_key: resolved(self.provider.api_key),
            base_url: resolved(self.provider.base_url),
            timeout_seconds: self.provider.timeout_seconds,
            max_tokens: self.generation.max_tokens,
            temperature: self.generation.temperature,
        })
    }
}

/// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的變數保留原樣
fn substitute_env_vars(re: &Regex, value: &str) -> String {
    re.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

fn placeholder_regex() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
        message: format!("invalid placeholder pattern: {}", e),
    })
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.provider.base_url {
            validation::validate_url("provider.base_url", base_url)?;
        }
        if let Some(static_dir) = &self.server.static_dir {
            validation::validate_path("server.static_dir", static_dir)?;
        }
        if let Some(max_tokens) = self.generation.max_tokens {
            validation::validate_range("generation.max_tokens", max_tokens, 1, 4096)?;
        }
        if let Some(temperature) = self.generation.temperature {
            validation::validate_range("generation.temperature", temperature, 0.0, 2.0)?;
        }
        Ok(())
    }
}
