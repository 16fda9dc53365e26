//! Error types for the token-hashing bridge.

use std::path::PathBuf;

use vigil_catalog::CatalogError;

/// Errors raised while attaching, configuring, querying, or exporting the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A catalog lookup failed while resolving tracked signals.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// `set_params` was called after the current window began sampling.
    ///
    /// Use `restart_window` to deliberately discard the window.
    #[error(
        "hash parameters changed after {sampled} sampled cycles; call restart_window to begin a new measurement window"
    )]
    OutOfWindowConfiguration {
        /// Cycles already folded into the current window.
        sampled: u64,
    },

    /// An index passed to `attach` is not in the catalog.
    #[error("signal index {index} is outside the catalog ({len} signals)")]
    InvalidIndex {
        /// The offending raw index.
        index: u32,
        /// Catalog size.
        len: usize,
    },

    /// The same signal was listed twice at attach time.
    #[error("signal '{signal}' is tracked twice")]
    DuplicateTrack {
        /// Qualified signal name.
        signal: String,
    },

    /// A track spec matched nothing in the catalog.
    #[error("track spec '{module}'/'{pattern}' matched no signals")]
    EmptyTrackSpec {
        /// Module query.
        module: String,
        /// Signal pattern.
        pattern: String,
    },

    /// A row lookup matched no tracked signal.
    #[error("no tracked signal '{signal}' in module '{module}'")]
    NotFound {
        /// Module query.
        module: String,
        /// Signal name.
        signal: String,
    },

    /// A row lookup matched several tracked signals.
    #[error("tracked signal '{signal}' in module '{module}' matches {count} rows, expected one")]
    Ambiguous {
        /// Module query.
        module: String,
        /// Signal name.
        signal: String,
        /// Number of matching rows.
        count: usize,
    },

    /// Reading or writing CSV failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an export file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parsed CSV row was not `signal,hash,count`.
    #[error("malformed fingerprint row {row}: {reason}")]
    MalformedRow {
        /// One-based data row number (header excluded).
        row: usize,
        /// What was wrong.
        reason: String,
    },
}
