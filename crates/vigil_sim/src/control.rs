//! Capability traits through which scenarios drive a simulation.
//!
//! A scenario needs two capabilities: advancing time ([`Stepper`]) and moving
//! values across the host/simulation boundary ([`SignalAccess`]). Backends
//! implement both; [`SimulationControl`] is the combination scenarios take.

use crate::error::SimError;

/// Advances simulated time.
pub trait Stepper {
    /// Drives the design through its reset sequence and returns once it is in
    /// its defined initial state. Reset cycles are not sampled by bridges.
    fn target_reset(&mut self) -> Result<(), SimError>;

    /// Advances exactly `cycles` clock cycles, blocking until all complete.
    fn step(&mut self, cycles: u64) -> Result<(), SimError>;

    /// Total cycles advanced so far, reset cycles included.
    fn cycle(&self) -> u64;
}

/// Reads and writes named signals between steps.
pub trait SignalAccess {
    /// Returns the value of `signal` as of the end of the last completed step.
    fn peek(&self, signal: &str) -> Result<u32, SimError>;

    /// Sets an input; the value is seen by the design during the next step.
    fn poke(&mut self, signal: &str, value: u32) -> Result<(), SimError>;
}

/// Everything a scenario needs from a simulation backend.
pub trait SimulationControl: Stepper + SignalAccess {}

impl<T: Stepper + SignalAccess + ?Sized> SimulationControl for T {}
