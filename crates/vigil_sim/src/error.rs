//! Simulation controller error types.
//!
//! All errors that can occur while building a controller, attaching bridges,
//! or driving the simulation are variants of [`SimError`].

use vigil_catalog::{CatalogError, Direction};

/// Errors raised by the simulation controller and bridge registry.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A peek/poke name or model binding failed to resolve.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// `poke` targeted a signal the host does not drive.
    #[error("signal '{signal}' is an {} and cannot be poked", .direction.as_str())]
    NotPokeable {
        /// The signal name.
        signal: String,
        /// Its declared direction.
        direction: Direction,
    },

    /// No bridge of the requested type is attached.
    #[error("no bridge of type {bridge} is attached")]
    BridgeNotFound {
        /// Type name of the requested bridge.
        bridge: &'static str,
    },

    /// A bridge of this type is already attached.
    #[error("a bridge of type {bridge} is already attached")]
    DuplicateBridge {
        /// Type name of the bridge.
        bridge: &'static str,
    },

    /// A bridge handle was still borrowed when the simulation tried to advance.
    #[error("bridge {bridge} is borrowed while stepping; release the handle before step()")]
    BridgeBusy {
        /// Type name of the bridge.
        bridge: &'static str,
    },

    /// A model name did not match any reference model.
    #[error("unknown model '{name}' (available: {})", .available.join(", "))]
    UnknownModel {
        /// The requested name.
        name: String,
        /// Names that would have been accepted.
        available: Vec<&'static str>,
    },

    /// A shared catalog was built from a different manifest than the model's.
    #[error("catalog was built for design {expected} but model '{model}' exports {found}")]
    ManifestMismatch {
        /// The model name.
        model: String,
        /// Short content hash of the catalog.
        expected: String,
        /// Short content hash of the model's manifest.
        found: String,
    },
}
