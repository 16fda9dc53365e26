//! Error types for manifest loading and signal lookup.

use std::path::PathBuf;

/// Errors raised while building or querying a [`SignalCatalog`](crate::SignalCatalog).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A lookup matched no signal.
    #[error("no signal '{signal}' found in module '{module}'")]
    NotFound {
        /// The module query.
        module: String,
        /// The signal name or pattern.
        signal: String,
    },

    /// A lookup that must be unique matched several signal instances.
    #[error(
        "signal '{signal}' in module '{module}' is ambiguous ({} candidates: {})",
        .candidates.len(),
        .candidates.join(", ")
    )]
    Ambiguous {
        /// The module query.
        module: String,
        /// The signal name.
        signal: String,
        /// Qualified names of every matching instance.
        candidates: Vec<String>,
    },

    /// A signal pattern could not be compiled.
    #[error("invalid signal pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The manifest lists the same signal twice under the same module path.
    #[error("duplicate signal '{module}.{signal}' in manifest")]
    DuplicateSignal {
        /// Module path.
        module: String,
        /// Signal name.
        signal: String,
    },

    /// A manifest entry has an empty module path or signal name.
    #[error("manifest entry {position} has an empty module path or signal name")]
    EmptyName {
        /// Zero-based position of the entry in the manifest.
        position: usize,
    },

    /// A signal width outside 1..=32 bits.
    #[error("signal '{module}.{signal}' has unsupported width {width} (expected 1..=32)")]
    InvalidWidth {
        /// Module path.
        module: String,
        /// Signal name.
        signal: String,
        /// The declared width.
        width: u32,
    },

    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", .path.display())]
    ManifestIo {
        /// The manifest path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest file could not be parsed.
    #[error("failed to parse manifest {}: {reason}", .path.display())]
    ManifestParse {
        /// The manifest path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let e = CatalogError::NotFound {
            module: "PeekPokeBridgeModule".into(),
            signal: "io_missing".into(),
        };
        assert_eq!(
            e.to_string(),
            "no signal 'io_missing' found in module 'PeekPokeBridgeModule'"
        );
    }

    #[test]
    fn ambiguous_lists_candidates() {
        let e = CatalogError::Ambiguous {
            module: "passthru".into(),
            signal: "io_in".into(),
            candidates: vec!["A.passthru.io_in".into(), "B.passthru.io_in".into()],
        };
        assert_eq!(
            e.to_string(),
            "signal 'io_in' in module 'passthru' is ambiguous (2 candidates: A.passthru.io_in, B.passthru.io_in)"
        );
    }

    #[test]
    fn invalid_width_display() {
        let e = CatalogError::InvalidWidth {
            module: "Top".into(),
            signal: "wide".into(),
            width: 64,
        };
        assert_eq!(
            e.to_string(),
            "signal 'Top.wide' has unsupported width 64 (expected 1..=32)"
        );
    }

    #[test]
    fn manifest_io_display() {
        let e = CatalogError::ManifestIo {
            path: PathBuf::from("/nope/manifest.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(e
            .to_string()
            .starts_with("failed to read manifest /nope/manifest.json"));
    }
}
