use vigil_catalog::{Direction, SignalCatalog, SignalIndex, SignalManifest};

use super::CycleModel;
use crate::error::SimError;
use crate::state::SignalState;

/// Which passthrough design to model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughVariant {
    /// `io_in` registered straight to `io_out`.
    Iden,
    /// The same register split across two chained `passthru` instances.
    /// `io_in`/`io_out` exist on each instance as well as on the top module.
    Nested,
    /// No inputs; an internal free-running counter drives `io_out`.
    BridgeSource,
}

impl PassthroughVariant {
    fn top(self) -> &'static str {
        match self {
            PassthroughVariant::Iden => "PassthroughModelIden",
            PassthroughVariant::Nested => "PassthroughModelNested",
            PassthroughVariant::BridgeSource => "PassthroughModelBridgeSource",
        }
    }
}

/// Latency-1 passthrough designs.
#[derive(Debug)]
pub struct PassthroughModel {
    variant: PassthroughVariant,
    wiring: Option<Wiring>,
}

#[derive(Debug, Clone, Copy)]
enum Wiring {
    Iden {
        input: SignalIndex,
        output: SignalIndex,
    },
    Nested {
        input: SignalIndex,
        output: SignalIndex,
        stage0_in: SignalIndex,
        stage0_out: SignalIndex,
        stage1_in: SignalIndex,
        stage1_out: SignalIndex,
    },
    BridgeSource {
        counter: SignalIndex,
        output: SignalIndex,
    },
}

impl PassthroughModel {
    /// Creates an unbound model of the given variant.
    pub fn new(variant: PassthroughVariant) -> Self {
        Self {
            variant,
            wiring: None,
        }
    }

    /// `io_in` registered to `io_out`.
    pub fn iden() -> Self {
        Self::new(PassthroughVariant::Iden)
    }

    /// Two chained `passthru` stages under one top.
    pub fn nested() -> Self {
        Self::new(PassthroughVariant::Nested)
    }

    /// Free-running counter on `io_out`.
    pub fn bridge_source() -> Self {
        Self::new(PassthroughVariant::BridgeSource)
    }

    /// The modelled variant.
    pub fn variant(&self) -> PassthroughVariant {
        self.variant
    }
}

fn stage_path(top: &str, stage: u32) -> String {
    format!("{top}.stage{stage}.passthru")
}

impl CycleModel for PassthroughModel {
    fn top(&self) -> &str {
        self.variant.top()
    }

    fn manifest(&self) -> SignalManifest {
        let top = self.variant.top();
        match self.variant {
            PassthroughVariant::Iden => SignalManifest::new()
                .with(top, "io_in", 32, Direction::Input)
                .with(top, "io_out", 32, Direction::Output),
            PassthroughVariant::Nested => {
                let mut m = SignalManifest::new()
                    .with(top, "io_in", 32, Direction::Input)
                    .with(top, "io_out", 32, Direction::Output);
                for stage in 0..2 {
                    let path = stage_path(top, stage);
                    m.push(&path, "io_in", 32, Direction::Internal);
                    m.push(&path, "io_out", 32, Direction::Internal);
                }
                m
            }
            PassthroughVariant::BridgeSource => SignalManifest::new()
                .with(top, "counter", 32, Direction::Internal)
                .with(top, "io_out", 32, Direction::Output),
        }
    }

    fn bind(&mut self, catalog: &SignalCatalog) -> Result<(), SimError> {
        let top = self.variant.top();
        let wiring = match self.variant {
            PassthroughVariant::Iden => Wiring::Iden {
                input: catalog.index_of(top, "io_in")?,
                output: catalog.index_of(top, "io_out")?,
            },
            PassthroughVariant::Nested => {
                let s0 = stage_path(top, 0);
                let s1 = stage_path(top, 1);
                Wiring::Nested {
                    input: catalog.index_of(top, "io_in")?,
                    output: catalog.index_of(top, "io_out")?,
                    stage0_in: catalog.index_of(&s0, "io_in")?,
                    stage0_out: catalog.index_of(&s0, "io_out")?,
                    stage1_in: catalog.index_of(&s1, "io_in")?,
                    stage1_out: catalog.index_of(&s1, "io_out")?,
                }
            }
            PassthroughVariant::BridgeSource => Wiring::BridgeSource {
                counter: catalog.index_of(top, "counter")?,
                output: catalog.index_of(top, "io_out")?,
            },
        };
        self.wiring = Some(wiring);
        Ok(())
    }

    fn reset(&mut self, state: &mut SignalState) {
        match self.wiring {
            Some(Wiring::Iden { output, .. }) => state.set(output, 0),
            Some(Wiring::Nested { stage0_out, .. }) => state.set(stage0_out, 0),
            Some(Wiring::BridgeSource { counter, .. }) => state.set(counter, 0),
            None => {}
        }
    }

    fn settle(&self, state: &mut SignalState) {
        match self.wiring {
            // stage0 holds the only register; stage1 is a wire
            Some(Wiring::Nested {
                input,
                output,
                stage0_in,
                stage0_out,
                stage1_in,
                stage1_out,
            }) => {
                state.set(stage0_in, state.get(input));
                state.set(stage1_in, state.get(stage0_out));
                state.set(stage1_out, state.get(stage1_in));
                state.set(output, state.get(stage1_out));
            }
            Some(Wiring::BridgeSource { counter, output }) => {
                state.set(output, state.get(counter));
            }
            Some(Wiring::Iden { .. }) | None => {}
        }
    }

    fn clock_edge(&mut self, state: &mut SignalState) {
        match self.wiring {
            Some(Wiring::Iden { input, output }) => state.set(output, state.get(input)),
            Some(Wiring::Nested {
                stage0_in,
                stage0_out,
                ..
            }) => state.set(stage0_out, state.get(stage0_in)),
            Some(Wiring::BridgeSource { counter, .. }) => {
                state.set(counter, state.get(counter).wrapping_add(1))
            }
            None => {}
        }
    }
}
