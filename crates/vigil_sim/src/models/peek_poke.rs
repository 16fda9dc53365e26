use vigil_catalog::{Direction, SignalCatalog, SignalIndex, SignalManifest};

use super::CycleModel;
use crate::error::SimError;
use crate::state::SignalState;

const TOP: &str = "PeekPokeBridgeModule";

/// The peek/poke loopback design.
///
/// `io_writeValue` is registered into `io_readValue` on every clock edge and
/// `io_readValueFlipped` is its bitwise complement. A value poked before a
/// step therefore shows up on the read ports after that step.
#[derive(Debug, Default)]
pub struct PeekPokeModel {
    ports: Option<Ports>,
}

#[derive(Debug, Clone, Copy)]
struct Ports {
    write: SignalIndex,
    read: SignalIndex,
    flipped: SignalIndex,
}

impl PeekPokeModel {
    /// Creates an unbound model.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CycleModel for PeekPokeModel {
    fn top(&self) -> &str {
        TOP
    }

    fn manifest(&self) -> SignalManifest {
        SignalManifest::new()
            .with(TOP, "io_writeValue", 32, Direction::Input)
            .with(TOP, "io_readValue", 32, Direction::Output)
            .with(TOP, "io_readValueFlipped", 32, Direction::Output)
    }

    fn bind(&mut self, catalog: &SignalCatalog) -> Result<(), SimError> {
        self.ports = Some(Ports {
            write: catalog.index_of(TOP, "io_writeValue")?,
            read: catalog.index_of(TOP, "io_readValue")?,
            flipped: catalog.index_of(TOP, "io_readValueFlipped")?,
        });
        Ok(())
    }

    fn reset(&mut self, state: &mut SignalState) {
        if let Some(p) = self.ports {
            state.set(p.read, 0);
        }
    }

    fn settle(&self, state: &mut SignalState) {
        if let Some(p) = self.ports {
            state.set(p.flipped, !state.get(p.read));
        }
    }

    fn clock_edge(&mut self, state: &mut SignalState) {
        if let Some(p) = self.ports {
            state.set(p.read, state.get(p.write));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound() -> (PeekPokeModel, SignalCatalog, SignalState) {
        let mut model = PeekPokeModel::new();
        let catalog = SignalCatalog::from_manifest(&model.manifest()).unwrap();
        model.bind(&catalog).unwrap();
        let state = SignalState::for_catalog(&catalog);
        (model, catalog, state)
    }

    #[test]
    fn write_appears_after_edge() {
        let (mut model, catalog, mut state) = bound();
        let write = catalog.index_of(TOP, "io_writeValue").unwrap();
        let read = catalog.index_of(TOP, "io_readValue").unwrap();
        let flipped = catalog.index_of(TOP, "io_readValueFlipped").unwrap();

        model.reset(&mut state);
        model.settle(&mut state);
        assert_eq!(state.get(flipped), u32::MAX);

        state.set(write, 0xf000);
        model.settle(&mut state);
        assert_eq!(state.get(read), 0);
        model.clock_edge(&mut state);
        model.settle(&mut state);
        assert_eq!(state.get(read), 0xf000);
        assert_eq!(state.get(flipped), !0xf000);
    }

    #[test]
    fn reset_clears_register() {
        let (mut model, catalog, mut state) = bound();
        let write = catalog.index_of(TOP, "io_writeValue").unwrap();
        let read = catalog.index_of(TOP, "io_readValue").unwrap();
        state.set(write, 7);
        model.clock_edge(&mut state);
        model.reset(&mut state);
        assert_eq!(state.get(read), 0);
        assert_eq!(state.get(write), 7);
    }
}
