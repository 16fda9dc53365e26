//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `vigil.toml` run
/// configuration or its plusargs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A plusarg token was malformed or its value could not be parsed.
    #[error("invalid plusarg '{token}': {reason}")]
    Plusarg {
        /// The offending token or key.
        token: String,
        /// What was wrong with it.
        reason: String,
    },
}
