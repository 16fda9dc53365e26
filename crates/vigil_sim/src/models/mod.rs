//! Reference cycle models.
//!
//! A [`CycleModel`] stands in for the RTL/FPGA backend: it exports a signal
//! manifest and evaluates one clock cycle at a time against a
//! [`SignalState`]. The models here reproduce the small designs used to
//! exercise the bridges; a real backend plugs in through the same trait.

mod passthrough;
mod peek_poke;

pub use passthrough::{PassthroughModel, PassthroughVariant};
pub use peek_poke::PeekPokeModel;

use vigil_catalog::{SignalCatalog, SignalManifest};

use crate::error::SimError;
use crate::state::SignalState;

/// A clocked design evaluated one cycle at a time.
///
/// Per cycle the controller calls [`settle`](CycleModel::settle), samples the
/// bridges, calls [`clock_edge`](CycleModel::clock_edge), then settles again.
pub trait CycleModel {
    /// Top-level module path; also the default peek/poke scope.
    fn top(&self) -> &str;

    /// Signals the design exposes, in a fixed order.
    fn manifest(&self) -> SignalManifest;

    /// Resolves the model's own signals against the catalog built from its
    /// manifest. Called once before any other evaluation.
    fn bind(&mut self, catalog: &SignalCatalog) -> Result<(), SimError>;

    /// Puts all registers into their reset values.
    fn reset(&mut self, state: &mut SignalState);

    /// Propagates combinational logic from inputs and registers.
    fn settle(&self, state: &mut SignalState);

    /// Latches next-state values into registers.
    fn clock_edge(&mut self, state: &mut SignalState);
}

/// Names accepted by [`model_by_name`].
pub const MODEL_NAMES: &[&str] = &[
    "peek-poke",
    "passthrough-iden",
    "passthrough-nested",
    "passthrough-bridge-source",
];

/// Builds a reference model from its CLI/config name.
pub fn model_by_name(name: &str) -> Result<Box<dyn CycleModel>, SimError> {
    let model: Box<dyn CycleModel> = match name {
        "peek-poke" => Box::new(PeekPokeModel::new()),
        "passthrough-iden" => Box::new(PassthroughModel::new(PassthroughVariant::Iden)),
        "passthrough-nested" => Box::new(PassthroughModel::new(PassthroughVariant::Nested)),
        "passthrough-bridge-source" => {
            Box::new(PassthroughModel::new(PassthroughVariant::BridgeSource))
        }
        _ => {
            return Err(SimError::UnknownModel {
                name: name.to_string(),
                available: MODEL_NAMES.to_vec(),
            })
        }
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_builds() {
        for name in MODEL_NAMES {
            let model = model_by_name(name).unwrap();
            assert!(!model.manifest().is_empty(), "{name} has no signals");
        }
    }

    #[test]
    fn unknown_name() {
        let err = model_by_name("fpga-blob").err().unwrap();
        assert!(matches!(err, SimError::UnknownModel { .. }));
    }

    #[test]
    fn manifests_build_catalogs() {
        for name in MODEL_NAMES {
            let model = model_by_name(name).unwrap();
            SignalCatalog::from_manifest(&model.manifest()).unwrap();
        }
    }
}
