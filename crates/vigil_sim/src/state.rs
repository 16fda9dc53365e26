//! Current values of every catalogued signal.

use vigil_catalog::{SignalCatalog, SignalIndex};

/// Flat value table indexed by [`SignalIndex`].
///
/// Values are stored masked to each signal's width, so a bridge sampling the
/// table always sees exactly the bits the design holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalState {
    values: Vec<u32>,
    masks: Vec<u32>,
}

impl SignalState {
    /// Creates an all-zero table sized and masked for `catalog`.
    pub fn for_catalog(catalog: &SignalCatalog) -> Self {
        let masks: Vec<u32> = catalog.iter().map(|(_, e)| e.mask()).collect();
        Self {
            values: vec![0; masks.len()],
            masks,
        }
    }

    /// Returns the current value of a signal.
    pub fn get(&self, index: SignalIndex) -> u32 {
        self.values[index.as_usize()]
    }

    /// Sets a signal, truncating `value` to the signal's width.
    pub fn set(&mut self, index: SignalIndex, value: u32) {
        let i = index.as_usize();
        self.values[i] = value & self.masks[i];
    }

    /// Number of signals in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in index order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }
}
