use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Problem description is required")]
    MissingProblem,

    #[error("Invalid request body: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid {provider} API key. Please check your API key.")]
    ProviderAuthError { provider: String },

    #[error("{provider} API quota exceeded. Please check your billing.")]
    ProviderQuotaError { provider: String },

    #[error("Rate limit exceeded. Please try again in a moment.")]
    ProviderRateLimitError { provider: String },

    #[error("{provider} returned an empty response. Please try again.")]
    EmptyCompletionError { provider: String },

    #[error("Failed to generate excuse: {message}")]
    ProviderError {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to generate excuse: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Provider,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::MissingProblem | RelayError::InvalidRequest { .. } => ErrorCategory::Input,
            RelayError::ProviderAuthError { .. }
            | RelayError::ProviderQuotaError { .. }
            | RelayError::ProviderRateLimitError { .. }
            | RelayError::EmptyCompletionError { .. }
            | RelayError::ProviderError { .. } => ErrorCategory::Provider,
            RelayError::ApiError(_) => ErrorCategory::Network,
            RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. }
            | RelayError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            RelayError::SerializationError(_) | RelayError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RelayError::MissingProblem | RelayError::InvalidRequest { .. } => ErrorSeverity::Low,
            RelayError::ProviderRateLimitError { .. }
            | RelayError::EmptyCompletionError { .. }
            | RelayError::ApiError(_) => ErrorSeverity::Medium,
            RelayError::ProviderAuthError { .. }
            | RelayError::ProviderQuotaError { .. }
            | RelayError::ProviderError { .. }
            | RelayError::SerializationError(_) => ErrorSeverity::High,
            RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. }
            | RelayError::ConfigValidationError { .. }
            | RelayError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// HTTP status the relay answers with. Only caller mistakes are 4xx;
    /// every upstream problem is reported as a 500.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Input => 400,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::ApiError(e) if e.is_timeout() => {
                "Failed to generate excuse: the provider took too long to answer".to_string()
            }
            RelayError::ApiError(e) if e.is_connect() => {
                "Failed to generate excuse: could not reach the provider".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RelayError::MissingProblem | RelayError::InvalidRequest { .. } => {
                "Send a JSON body like {\"problem\": \"...\"} with a non-empty description"
            }
            RelayError::ProviderAuthError { .. } => {
                "Check the API key for the selected provider (--api-key or the provider's *_API_KEY variable)"
            }
            RelayError::ProviderQuotaError { .. } => {
                "Check the billing and usage limits of the provider account"
            }
            RelayError::ProviderRateLimitError { .. } => "Wait a moment and try again",
            RelayError::EmptyCompletionError { .. } => {
                "Try again, or raise max_tokens if the model keeps stopping early"
            }
            RelayError::ProviderError { .. } | RelayError::ApiError(_) => {
                "Check the provider base URL, model name and network connectivity"
            }
            RelayError::SerializationError(_) => {
                "The provider answered with an unexpected payload; check the provider kind and base URL"
            }
            RelayError::IoError(_) => "Check file paths and permissions",
            RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. }
            | RelayError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags and restart"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
