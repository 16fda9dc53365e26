//! The signal manifest exported by the simulation engine.
//!
//! The manifest is owned by the engine; this crate only consumes it. It can be
//! built programmatically (reference models do this) or loaded from a JSON or
//! TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vigil_common::ContentHash;

use crate::error::CatalogError;

/// Port direction of a manifest signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven by the host through `poke`.
    Input,
    /// Driven by the design.
    Output,
    /// Internal state, observable only.
    #[default]
    Internal,
}

impl Direction {
    /// Lowercase name used in listings.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Internal => "internal",
        }
    }
}

/// One `(module path, signal name, width)` tuple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Dotted module path, e.g. `PassthroughModelNested.stage0`.
    pub module: String,
    /// Signal name within the module, e.g. `io_in`.
    pub name: String,
    /// Bit width, 1..=32.
    pub width: u32,
    /// Port direction.
    #[serde(default)]
    pub direction: Direction,
}

/// The full list of signals a design exposes, in engine order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalManifest {
    /// Entries in the order the engine enumerated them. Catalog indices follow
    /// this order.
    #[serde(default, rename = "signal")]
    pub signals: Vec<ManifestEntry>,
}

impl SignalManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns `self` for chaining.
    pub fn with(
        mut self,
        module: &str,
        name: &str,
        width: u32,
        direction: Direction,
    ) -> Self {
        self.push(module, name, width, direction);
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, module: &str, name: &str, width: u32, direction: Direction) {
        self.signals.push(ManifestEntry {
            module: module.to_string(),
            name: name.to_string(),
            width,
            direction,
        });
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if the manifest lists no signals.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Content hash over the canonical form of every entry, in order.
    pub fn content_hash(&self) -> ContentHash {
        let mut canonical = Vec::new();
        for entry in &self.signals {
            canonical.extend_from_slice(entry.module.as_bytes());
            canonical.push(0);
            canonical.extend_from_slice(entry.name.as_bytes());
            canonical.push(0);
            canonical.extend_from_slice(&entry.width.to_le_bytes());
            canonical.extend_from_slice(entry.direction.as_str().as_bytes());
            canonical.push(b'\n');
        }
        ContentHash::from_bytes(&canonical)
    }
}

/// Loads a manifest from a `.json` or `.toml` file.
///
/// The TOML form uses `[[signal]]` tables; the JSON form is
/// `{"signal": [{"module": .., "name": .., "width": ..}]}`.
pub fn load_manifest(path: &Path) -> Result<SignalManifest, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |reason: String| CatalogError::ManifestParse {
        path: path.to_path_buf(),
        reason,
    };
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Some("toml") => toml::from_str(&content).map_err(|e| parse_err(e.to_string())),
        other => Err(parse_err(format!(
            "unsupported manifest extension {:?}",
            other.unwrap_or("")
        ))),
    }
}
