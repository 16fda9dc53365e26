//! Parsing and validation of `vigil.toml` run configuration files.
//!
//! This crate reads the run configuration file and produces a strongly-typed
//! [`RunConfig`] with model and scenario selection, hash seeds, tracked
//! signals, and export settings. [`Plusargs`] carries `+key=value` overrides
//! from the command line into the run.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod plusargs;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use plusargs::Plusargs;
pub use types::*;
