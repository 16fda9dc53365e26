//! Configuration types deserialized from `vigil.toml`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::plusargs::Plusargs;

/// The top-level run configuration parsed from `vigil.toml`.
///
/// Every section is optional; an empty file yields the peek/poke token
/// hashing run with seeds `(0, 0)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    /// Model, scenario, and cycle settings.
    #[serde(default)]
    pub run: RunSection,
    /// Hash seeds.
    #[serde(default)]
    pub hash: HashSection,
    /// Signals to track; empty means the scenario's defaults.
    #[serde(default, rename = "track")]
    pub tracks: Vec<TrackEntry>,
    /// Fingerprint export settings.
    #[serde(default)]
    pub export: ExportSection,
    /// Plusargs applied on top of the file, available to scenarios.
    #[serde(skip)]
    pub plusargs: Plusargs,
}

/// The `[run]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Reference model name (see `vigil_sim::MODEL_NAMES`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Which scenario drives the model.
    #[serde(default)]
    pub scenario: ScenarioKind,
    /// Loop count or run length; each scenario has its own default.
    #[serde(default)]
    pub cycles: Option<u64>,
    /// Reset cycles driven by `target_reset`.
    #[serde(default = "default_reset_cycles")]
    pub reset_cycles: u32,
    /// Peek/poke scope; defaults to the model's top module.
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_model() -> String {
    "peek-poke".to_string()
}

fn default_reset_cycles() -> u32 {
    1
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            scenario: ScenarioKind::default(),
            cycles: None,
            reset_cycles: default_reset_cycles(),
            scope: None,
        }
    }
}

/// Scenario selector.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Poke a token sequence and check every fingerprint against a host replay.
    #[default]
    TokenHashers,
    /// Reset then free-run for a fixed number of cycles.
    Passthrough,
}

/// The `[hash]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct HashSection {
    /// First seed word.
    #[serde(default)]
    pub seed0: u32,
    /// Second seed word.
    #[serde(default)]
    pub seed1: u32,
}

/// One `[[track]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TrackEntry {
    /// Module path query; empty matches every module.
    #[serde(default)]
    pub module: String,
    /// Signal name or `*`/`?` glob.
    pub signal: String,
}

/// The `[export]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportSection {
    /// Output format.
    #[serde(default)]
    pub format: ExportKind,
    /// Destination file; stdout when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Fingerprint export format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// `signal,hash,count` CSV (default).
    #[default]
    Csv,
    /// Aligned plain text.
    Text,
    /// JSON with the seed pair.
    Json,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportKind::Csv => "csv",
            ExportKind::Text => "text",
            ExportKind::Json => "json",
        })
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportKind::Csv),
            "text" => Ok(ExportKind::Text),
            "json" => Ok(ExportKind::Json),
            other => Err(format!("unknown export format '{other}' (csv, text, json)")),
        }
    }
}

impl RunConfig {
    /// Applies plusarg overrides.
    ///
    /// `+cycles`, `+seed0`, `+seed1`, and `+reset_cycles` replace the file's
    /// values. All plusargs, known or not, are kept for scenarios.
    pub fn apply_plusargs(&mut self, args: &Plusargs) -> Result<(), ConfigError> {
        if let Some(cycles) = args.get_u32("cycles")? {
            self.run.cycles = Some(u64::from(cycles));
        }
        if let Some(seed0) = args.get_u32("seed0")? {
            self.hash.seed0 = seed0;
        }
        if let Some(seed1) = args.get_u32("seed1")? {
            self.hash.seed1 = seed1;
        }
        if let Some(reset) = args.get_u32("reset_cycles")? {
            self.run.reset_cycles = reset;
        }
        self.plusargs.extend(args);
        self.validate()
    }

    /// Checks value consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "run.model must not be empty".to_string(),
            ));
        }
        if self.run.cycles == Some(0) {
            return Err(ConfigError::ValidationError(
                "run.cycles must be at least 1".to_string(),
            ));
        }
        for (i, track) in self.tracks.iter().enumerate() {
            if track.signal.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "track[{i}].signal must not be empty"
                )));
            }
        }
        Ok(())
    }
}
