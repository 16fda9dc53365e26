//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RunConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE: &str = "vigil.toml";

/// Loads and validates a `vigil.toml` configuration from a run directory.
///
/// Reads `<run_dir>/vigil.toml`, parses it, and validates it.
pub fn load_config(run_dir: &Path) -> Result<RunConfig, ConfigError> {
    load_config_file(&run_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<RunConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = load_config_from_str(&content)?;
    tracing::debug!(path = %path.display(), model = %config.run.model, "loaded run configuration");
    Ok(config)
}

/// Parses and validates a `vigil.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
