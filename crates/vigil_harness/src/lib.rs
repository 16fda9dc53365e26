//! Scenarios and the run harness for the Vigil token-hashing bridge.
//!
//! A [`Harness`] turns a [`vigil_config::RunConfig`] into a running
//! simulation: it picks a reference model, builds the controller, attaches a
//! [`vigil_bridge::TokenHasherBridge`] for the configured signals, and runs a
//! [`Scenario`] against it. Scenarios receive the bridge handle and the signal
//! names they work with as plain constructor arguments.

#![warn(missing_docs)]

pub mod error;
pub mod harness;
pub mod scenario;

pub use error::HarnessError;
pub use harness::{export_format, Harness};
pub use scenario::{
    PassthroughScenario, Scenario, ScenarioReport, TokenHashersScenario, DEFAULT_LOOPS,
    DEFAULT_PASSTHROUGH_LENGTH, PEEK_POKE_MODULE, PEEK_POKE_SIGNALS, TOKEN_BASE,
};
