use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(".env error: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Env var {name}: {source}")]
    EnvVar {
        name: String,
        #[source]
        source: std::env::VarError,
    },

    #[error("Unknown network: {0}. Must be: hardhat, mainnet, or a configured chain ID")]
    UnknownNetwork(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::ValidationError(msg.into())
    }
}
