//! Step-synchronous simulation control for the Vigil bridge.
//!
//! This crate defines the capability traits scenarios drive a simulation
//! through ([`Stepper`], [`SignalAccess`]), the [`Bridge`] hook and
//! [`BridgeRegistry`] that observe every completed cycle, and
//! [`SimController`], which runs a [`CycleModel`] one clock at a time.
//!
//! # Usage
//!
//! ```ignore
//! use vigil_sim::{models::PeekPokeModel, SimController, SignalAccess, Stepper};
//!
//! let mut sim = SimController::new(Box::new(PeekPokeModel::new()))?;
//! sim.target_reset()?;
//! sim.poke("io_writeValue", 0xf000)?;
//! sim.step(1)?;
//! assert_eq!(sim.peek("io_readValue")?, 0xf000);
//! ```
//!
//! # Modules
//!
//! - `error`: Controller and registry error types
//! - `control`: `Stepper` / `SignalAccess` capability traits
//! - `state`: Flat signal value table
//! - `bridge`: Bridge trait and per-type registry
//! - `controller`: The cycle loop
//! - `models`: Reference cycle models

#![warn(missing_docs)]

pub mod bridge;
pub mod control;
pub mod controller;
pub mod error;
pub mod models;
pub mod state;

pub use bridge::{Bridge, BridgeHandle, BridgeRegistry};
pub use control::{SignalAccess, SimulationControl, Stepper};
pub use controller::SimController;
pub use error::SimError;
pub use models::{model_by_name, CycleModel, MODEL_NAMES};
pub use state::SignalState;

/// Controller settings taken from the run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Reset cycles driven by `target_reset`.
    pub reset_cycles: u32,
    /// Peek/poke scope; defaults to the model's top module.
    pub scope: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            reset_cycles: 1,
            scope: None,
        }
    }
}
