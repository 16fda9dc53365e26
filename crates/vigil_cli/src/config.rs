//! Locating and loading the run configuration for a CLI invocation.

use std::path::{Path, PathBuf};

use vigil_config::{load_config, load_config_file, RunConfig, CONFIG_FILE};

use crate::GlobalArgs;

/// Where the configuration comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// An explicit `vigil.toml` file.
    File(PathBuf),
    /// A directory expected to contain `vigil.toml`.
    Dir(PathBuf),
    /// No file: built-in defaults.
    Defaults,
}

/// Resolves `--config`, falling back to `./vigil.toml` and then to defaults.
pub fn config_source(global: &GlobalArgs, cwd: &Path) -> ConfigSource {
    match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_file() {
                ConfigSource::File(p)
            } else {
                ConfigSource::Dir(p)
            }
        }
        None if cwd.join(CONFIG_FILE).is_file() => ConfigSource::Dir(cwd.to_path_buf()),
        None => ConfigSource::Defaults,
    }
}

/// Loads the run configuration for this invocation.
pub fn load(global: &GlobalArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = match config_source(global, &cwd) {
        ConfigSource::File(path) => load_config_file(&path)?,
        ConfigSource::Dir(dir) => load_config(&dir)?,
        ConfigSource::Defaults => RunConfig::default(),
    };
    Ok(config)
}
