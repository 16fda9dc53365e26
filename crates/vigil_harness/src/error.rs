//! Error types for scenarios and the run harness.

use vigil_bridge::BridgeError;
use vigil_catalog::CatalogError;
use vigil_common::format_hex32;
use vigil_config::ConfigError;
use vigil_sim::SimError;

/// Errors that abort a scenario run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Building or driving the simulation failed.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// The bridge rejected a lookup, configuration, or export.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The run configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A catalog query failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A bridge fingerprint disagreed with the host-side replay.
    #[error(
        "fingerprint mismatch on '{signal}': expected {} x{expected_count}, bridge reported {} x{actual_count}",
        format_hex32(*.expected),
        format_hex32(*.actual)
    )]
    ShadowMismatch {
        /// Signal name.
        signal: String,
        /// Host replay hash.
        expected: u32,
        /// Bridge hash.
        actual: u32,
        /// Host replay token count.
        expected_count: u64,
        /// Bridge token count.
        actual_count: u64,
    },

    /// A resolved row was absent from the fingerprint snapshot.
    #[error("fingerprint table has no row {row} for '{signal}'")]
    MissingRow {
        /// Signal name.
        signal: String,
        /// Row number resolved before the run.
        row: usize,
    },
}
