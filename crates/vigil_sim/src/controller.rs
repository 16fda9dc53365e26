//! The step-synchronous simulation controller.
//!
//! [`SimController`] binds a [`CycleModel`] to a signal catalog, owns the
//! current [`SignalState`] and the [`BridgeRegistry`], and implements the
//! [`Stepper`] and [`SignalAccess`] capabilities. Time only advances inside
//! [`step`](Stepper::step), which runs each cycle to completion:
//!
//! 1. settle combinational logic with the current inputs,
//! 2. deliver the cycle to every bridge (the sampling point),
//! 3. clock edge,
//! 4. settle again so peeks see end-of-cycle values.

use std::sync::Arc;

use vigil_catalog::{Direction, SignalCatalog, SignalIndex};

use crate::bridge::{Bridge, BridgeHandle, BridgeRegistry};
use crate::control::{SignalAccess, Stepper};
use crate::error::SimError;
use crate::models::CycleModel;
use crate::state::SignalState;
use crate::SimConfig;

/// Drives a cycle model and its bridges one clock at a time.
pub struct SimController {
    model: Box<dyn CycleModel>,
    catalog: Arc<SignalCatalog>,
    state: SignalState,
    bridges: BridgeRegistry,
    scope: String,
    cycle: u64,
    sampled_cycles: u64,
    reset_cycles: u32,
}

impl SimController {
    /// Builds a controller, deriving the catalog from the model's manifest.
    pub fn new(model: Box<dyn CycleModel>) -> Result<Self, SimError> {
        let catalog = Arc::new(SignalCatalog::from_manifest(&model.manifest())?);
        Self::with_catalog(model, catalog)
    }

    /// Builds a controller around an existing, shared catalog.
    ///
    /// The catalog must have been built from this model's manifest.
    pub fn with_catalog(
        mut model: Box<dyn CycleModel>,
        catalog: Arc<SignalCatalog>,
    ) -> Result<Self, SimError> {
        let manifest_hash = model.manifest().content_hash();
        if manifest_hash != catalog.content_hash() {
            return Err(SimError::ManifestMismatch {
                model: model.top().to_string(),
                expected: catalog.content_hash().short(),
                found: manifest_hash.short(),
            });
        }
        model.bind(&catalog)?;
        let mut state = SignalState::for_catalog(&catalog);
        model.reset(&mut state);
        model.settle(&mut state);
        let scope = model.top().to_string();
        Ok(Self {
            model,
            catalog,
            state,
            bridges: BridgeRegistry::new(),
            scope,
            cycle: 0,
            sampled_cycles: 0,
            reset_cycles: 1,
        })
    }

    /// Applies a [`SimConfig`].
    pub fn configure(&mut self, config: &SimConfig) {
        self.reset_cycles = config.reset_cycles;
        if let Some(scope) = &config.scope {
            self.scope = scope.clone();
        }
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Arc<SignalCatalog> {
        &self.catalog
    }

    /// Attaches a bridge and returns its handle.
    pub fn attach_bridge<T: Bridge + 'static>(
        &mut self,
        bridge: T,
    ) -> Result<BridgeHandle<T>, SimError> {
        self.bridges.attach(bridge)
    }

    /// The bridge registry.
    pub fn bridges(&self) -> &BridgeRegistry {
        &self.bridges
    }

    /// The module path peek/poke names are resolved in.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Changes the peek/poke scope.
    pub fn set_scope(&mut self, module: &str) {
        self.scope = module.to_string();
    }

    /// Number of reset cycles [`target_reset`](Stepper::target_reset) runs.
    pub fn set_reset_cycles(&mut self, cycles: u32) {
        self.reset_cycles = cycles;
    }

    /// Cycles delivered to bridges so far (reset cycles excluded).
    pub fn sampled_cycles(&self) -> u64 {
        self.sampled_cycles
    }

    /// Read-only view of every signal value.
    pub fn state(&self) -> &SignalState {
        &self.state
    }

    fn resolve(&self, signal: &str) -> Result<SignalIndex, SimError> {
        Ok(self.catalog.index_of(&self.scope, signal)?)
    }

    fn run_cycle(&mut self) -> Result<(), SimError> {
        self.model.settle(&mut self.state);
        self.bridges.dispatch(self.cycle, &self.state)?;
        self.model.clock_edge(&mut self.state);
        self.model.settle(&mut self.state);
        tracing::trace!(cycle = self.cycle, "cycle complete");
        self.cycle += 1;
        self.sampled_cycles += 1;
        Ok(())
    }
}

impl Stepper for SimController {
    fn target_reset(&mut self) -> Result<(), SimError> {
        for _ in 0..self.reset_cycles {
            self.model.reset(&mut self.state);
            self.model.settle(&mut self.state);
            self.cycle += 1;
        }
        self.model.reset(&mut self.state);
        self.model.settle(&mut self.state);
        tracing::debug!(
            top = self.model.top(),
            reset_cycles = self.reset_cycles,
            cycle = self.cycle,
            "target reset complete"
        );
        Ok(())
    }

    fn step(&mut self, cycles: u64) -> Result<(), SimError> {
        for _ in 0..cycles {
            self.run_cycle()?;
        }
        tracing::debug!(cycles, now = self.cycle, "step complete");
        Ok(())
    }

    fn cycle(&self) -> u64 {
        self.cycle
    }
}

impl SignalAccess for SimController {
    fn peek(&self, signal: &str) -> Result<u32, SimError> {
        let index = self.resolve(signal)?;
        Ok(self.state.get(index))
    }

    fn poke(&mut self, signal: &str, value: u32) -> Result<(), SimError> {
        let index = self.resolve(signal)?;
        let direction = self.catalog.signal(index).direction;
        if direction != Direction::Input {
            return Err(SimError::NotPokeable {
                signal: signal.to_string(),
                direction,
            });
        }
        self.state.set(index, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PassthroughModel, PassthroughVariant, PeekPokeModel};

    struct Recorder {
        read: SignalIndex,
        write: SignalIndex,
        samples: Vec<(u64, u32, u32)>,
    }

    impl Bridge for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn on_cycle(&mut self, cycle: u64, signals: &SignalState) {
            self.samples
                .push((cycle, signals.get(self.write), signals.get(self.read)));
        }
    }

    fn peek_poke() -> SimController {
        SimController::new(Box::new(PeekPokeModel::new())).unwrap()
    }

    fn recorder(sim: &SimController) -> Recorder {
        let cat = sim.catalog();
        Recorder {
            write: cat.index_of("PeekPokeBridgeModule", "io_writeValue").unwrap(),
            read: cat.index_of("PeekPokeBridgeModule", "io_readValue").unwrap(),
            samples: Vec::new(),
        }
    }

    #[test]
    fn poke_then_step_then_peek() {
        let mut sim = peek_poke();
        sim.target_reset().unwrap();
        sim.poke("io_writeValue", 0xf000).unwrap();
        assert_eq!(sim.peek("io_readValue").unwrap(), 0);
        sim.step(1).unwrap();
        assert_eq!(sim.peek("io_readValue").unwrap(), 0xf000);
        assert_eq!(sim.peek("io_readValueFlipped").unwrap(), !0xf000);
    }

    #[test]
    fn bridge_samples_once_per_cycle() {
        let mut sim = peek_poke();
        let rec = recorder(&sim);
        let handle = sim.attach_bridge(rec).unwrap();
        sim.target_reset().unwrap();
        for i in 0..4 {
            sim.poke("io_writeValue", 0x10 + i).unwrap();
            sim.peek("io_readValue").unwrap();
            sim.peek("io_readValue").unwrap();
            sim.step(1).unwrap();
        }
        let rec = handle.borrow();
        let samples = &rec.samples;
        assert_eq!(samples.len(), 4);
        assert_eq!(sim.sampled_cycles(), 4);
        // write is seen in its own cycle; the register lags by one
        assert_eq!(samples[0].1, 0x10);
        assert_eq!(samples[0].2, 0);
        assert_eq!(samples[3].1, 0x13);
        assert_eq!(samples[3].2, 0x12);
    }

    #[test]
    fn multi_cycle_step_samples_each_cycle() {
        let mut sim = peek_poke();
        let handle = sim.attach_bridge(recorder(&sim)).unwrap();
        sim.step(7).unwrap();
        sim.step(0).unwrap();
        let cycles: Vec<u64> = handle.borrow().samples.iter().map(|s| s.0).collect();
        assert_eq!(cycles, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn reset_cycles_are_not_sampled() {
        let mut sim = peek_poke();
        sim.set_reset_cycles(3);
        let handle = sim.attach_bridge(recorder(&sim)).unwrap();
        sim.target_reset().unwrap();
        assert_eq!(sim.cycle(), 3);
        assert!(handle.borrow().samples.is_empty());
        sim.step(2).unwrap();
        let cycles: Vec<u64> = handle.borrow().samples.iter().map(|s| s.0).collect();
        assert_eq!(cycles, vec![3, 4]);
    }

    #[test]
    fn held_borrow_fails_step_without_advancing() {
        let mut sim = peek_poke();
        let handle = sim.attach_bridge(recorder(&sim)).unwrap();
        let guard = handle.borrow();
        let err = sim.step(1).unwrap_err();
        assert!(matches!(err, SimError::BridgeBusy { .. }));
        drop(guard);
        assert_eq!(sim.cycle(), 0);
        assert!(handle.borrow().samples.is_empty());
    }

    #[test]
    fn poke_output_rejected() {
        let mut sim = peek_poke();
        let err = sim.poke("io_readValue", 1).unwrap_err();
        assert!(matches!(
            err,
            SimError::NotPokeable {
                direction: Direction::Output,
                ..
            }
        ));
    }

    #[test]
    fn unknown_signal_is_not_found() {
        let sim = peek_poke();
        let err = sim.peek("io_renamed").unwrap_err();
        assert!(matches!(
            err,
            SimError::Catalog(vigil_catalog::CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn scope_controls_resolution() {
        let mut sim =
            SimController::new(Box::new(PassthroughModel::new(PassthroughVariant::Nested)))
                .unwrap();
        sim.poke("io_in", 4).unwrap();
        sim.step(1).unwrap();
        sim.set_scope("stage0.passthru");
        assert_eq!(sim.peek("io_out").unwrap(), 4);
        sim.set_scope("passthru");
        assert!(matches!(
            sim.peek("io_out").unwrap_err(),
            SimError::Catalog(vigil_catalog::CatalogError::Ambiguous { .. })
        ));
    }

    #[test]
    fn shared_catalog_must_match_model() {
        let other = PassthroughModel::new(PassthroughVariant::Iden);
        let catalog = Arc::new(SignalCatalog::from_manifest(&other.manifest()).unwrap());
        let err = SimController::with_catalog(Box::new(PeekPokeModel::new()), catalog)
            .err()
            .unwrap();
        assert!(matches!(err, SimError::ManifestMismatch { .. }));
    }

    #[test]
    fn configure_applies_scope_and_reset() {
        let mut sim = peek_poke();
        sim.configure(&SimConfig {
            reset_cycles: 2,
            scope: Some("PeekPokeBridgeModule".into()),
        });
        sim.target_reset().unwrap();
        assert_eq!(sim.cycle(), 2);
        assert_eq!(sim.scope(), "PeekPokeBridgeModule");
    }
}
