use thiserror::Error;

/// SessKit unified error type
#[derive(Error, Debug)]
pub enum SessKitError {
    /// Unknown backend, duplicate registration or invalid manager settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The secure randomness source could not produce an identifier
    #[error("Randomness failure: {0}")]
    Randomness(String),

    /// A cookie value that is not a valid session identifier
    #[error("Cookie decode error: {0}")]
    CookieDecode(String),

    /// Storage failure reported by a provider
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Configuration file could not be read, parsed or written
    #[error("Config file error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

impl SessKitError {
    /// Build a provider error tagged with the backend name
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from a storage backend
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

pub type SessKitResult<T> = Result<T, SessKitError>;
