//! The token-hashing bridge.
//!
//! [`TokenHasherBridge`] folds the value of every tracked signal into a
//! per-signal [`XorHash32`] once per sampled cycle. A measurement window
//! starts at attach time (or at [`restart_window`](TokenHasherBridge::restart_window))
//! and its seeds are fixed once the first cycle has been sampled.

use std::sync::Arc;

use vigil_catalog::{module_matches, SignalCatalog, SignalIndex};
use vigil_common::XorHash32;
use vigil_sim::{Bridge, SignalState};

use crate::error::BridgeError;
use crate::table::{FingerprintRow, FingerprintTable, HashParameters};

/// A module/signal selection used by [`TokenHasherBridge::attach_matching`].
///
/// `signal` may be an exact name or a `*`/`?` glob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackSpec {
    /// Module path query (segment suffix match; empty matches all).
    pub module: String,
    /// Signal name or glob.
    pub signal: String,
}

impl TrackSpec {
    /// Creates a track spec.
    pub fn new(module: impl Into<String>, signal: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            signal: signal.into(),
        }
    }
}

/// Rolling hash and token count for one tracked signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashState {
    hasher: XorHash32,
    count: u64,
}

impl HashState {
    fn seeded(params: HashParameters) -> Self {
        Self {
            hasher: params.hasher(),
            count: 0,
        }
    }

    fn absorb(&mut self, token: u32) {
        self.hasher.next(token);
        self.count += 1;
    }

    /// Current hash value.
    pub fn value(&self) -> u32 {
        self.hasher.value()
    }

    /// Tokens consumed since the window started.
    pub fn count(&self) -> u64 {
        self.count
    }
}

#[derive(Debug)]
struct Tracked {
    index: SignalIndex,
    state: HashState,
}

/// Bridge that fingerprints a fixed set of signals cycle by cycle.
#[derive(Debug)]
pub struct TokenHasherBridge {
    catalog: Arc<SignalCatalog>,
    tracked: Vec<Tracked>,
    params: HashParameters,
    window_cycles: u64,
}

impl TokenHasherBridge {
    /// Tracks the given catalog indices, in the order given.
    ///
    /// Every index must exist and appear only once.
    pub fn attach(
        catalog: Arc<SignalCatalog>,
        indices: &[SignalIndex],
        params: HashParameters,
    ) -> Result<Self, BridgeError> {
        let mut tracked: Vec<Tracked> = Vec::with_capacity(indices.len());
        for &index in indices {
            if catalog.get(index).is_none() {
                return Err(BridgeError::InvalidIndex {
                    index: index.as_raw(),
                    len: catalog.len(),
                });
            }
            if tracked.iter().any(|t| t.index == index) {
                return Err(BridgeError::DuplicateTrack {
                    signal: catalog.qualified_name(index),
                });
            }
            tracked.push(Tracked {
                index,
                state: HashState::seeded(params),
            });
        }
        tracing::debug!(
            tracked = tracked.len(),
            seed0 = params.seed0,
            seed1 = params.seed1,
            "token hasher attached"
        );
        Ok(Self {
            catalog,
            tracked,
            params,
            window_cycles: 0,
        })
    }

    /// Tracks every catalogued signal, in catalog order.
    pub fn attach_all(
        catalog: Arc<SignalCatalog>,
        params: HashParameters,
    ) -> Result<Self, BridgeError> {
        let indices: Vec<SignalIndex> = catalog.iter().map(|(i, _)| i).collect();
        Self::attach(catalog, &indices, params)
    }

    /// Tracks the signals selected by `specs`, in spec order then catalog order.
    ///
    /// Each spec must select at least one signal. A signal selected by more
    /// than one spec is a [`BridgeError::DuplicateTrack`].
    pub fn attach_matching(
        catalog: Arc<SignalCatalog>,
        specs: &[TrackSpec],
        params: HashParameters,
    ) -> Result<Self, BridgeError> {
        let mut indices = Vec::new();
        for spec in specs {
            let hits = catalog.search(&spec.module, &spec.signal)?;
            if hits.is_empty() {
                return Err(BridgeError::EmptyTrackSpec {
                    module: spec.module.clone(),
                    pattern: spec.signal.clone(),
                });
            }
            indices.extend(hits);
        }
        Self::attach(catalog, &indices, params)
    }

    /// Replaces the seeds of the current window.
    ///
    /// Only allowed before the window has sampled anything; afterwards the
    /// fingerprints would mix two seed pairs, so this fails with
    /// [`BridgeError::OutOfWindowConfiguration`]. Re-applying the same seeds
    /// before sampling is a no-op.
    pub fn set_params(&mut self, seed0: u32, seed1: u32) -> Result<(), BridgeError> {
        if self.window_cycles > 0 {
            return Err(BridgeError::OutOfWindowConfiguration {
                sampled: self.window_cycles,
            });
        }
        self.reseed(HashParameters::new(seed0, seed1));
        Ok(())
    }

    /// Discards the current window and starts a new one with the given seeds.
    pub fn restart_window(&mut self, seed0: u32, seed1: u32) {
        if self.window_cycles > 0 {
            tracing::info!(discarded = self.window_cycles, "restarting hash window");
        }
        self.reseed(HashParameters::new(seed0, seed1));
    }

    fn reseed(&mut self, params: HashParameters) {
        self.params = params;
        self.window_cycles = 0;
        for t in &mut self.tracked {
            t.state = HashState::seeded(params);
        }
        tracing::debug!(seed0 = params.seed0, seed1 = params.seed1, "hash window seeded");
    }

    /// Seeds of the current window.
    pub fn params(&self) -> HashParameters {
        self.params
    }

    /// Cycles sampled in the current window.
    pub fn window_cycles(&self) -> u64 {
        self.window_cycles
    }

    /// Number of tracked signals (rows).
    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    /// Catalog index tracked at `row`.
    pub fn tracked_index(&self, row: usize) -> Option<SignalIndex> {
        self.tracked.get(row).map(|t| t.index)
    }

    /// Hash state at `row`.
    pub fn hash_state(&self, row: usize) -> Option<HashState> {
        self.tracked.get(row).map(|t| t.state)
    }

    /// The catalog the tracked indices refer to.
    pub fn catalog(&self) -> &Arc<SignalCatalog> {
        &self.catalog
    }

    /// Rows whose signal matches `module` and the glob `pattern`, ascending.
    pub fn search(&self, module: &str, pattern: &str) -> Result<Vec<usize>, BridgeError> {
        let hits = self.catalog.search(module, pattern)?;
        Ok(self
            .tracked
            .iter()
            .enumerate()
            .filter(|(_, t)| hits.binary_search(&t.index).is_ok())
            .map(|(row, _)| row)
            .collect())
    }

    /// The single row tracking `signal` (exact name) under `module`.
    pub fn row_of(&self, module: &str, signal: &str) -> Result<usize, BridgeError> {
        let rows: Vec<usize> = self
            .tracked
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                self.catalog.name(t.index) == signal
                    && module_matches(self.catalog.module(t.index), module)
            })
            .map(|(row, _)| row)
            .collect();
        match rows.as_slice() {
            [] => Err(BridgeError::NotFound {
                module: module.to_string(),
                signal: signal.to_string(),
            }),
            [row] => Ok(*row),
            many => Err(BridgeError::Ambiguous {
                module: module.to_string(),
                signal: signal.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Snapshot of every row, in attach order.
    pub fn get_fingerprint_table(&self) -> FingerprintTable {
        FingerprintTable {
            params: self.params,
            rows: self
                .tracked
                .iter()
                .map(|t| FingerprintRow {
                    signal: self.catalog.name(t.index).to_string(),
                    hash: t.state.value(),
                    count: t.state.count(),
                })
                .collect(),
        }
    }

    /// Logs every tracked signal with its row number.
    pub fn info(&self) {
        tracing::info!(
            tracked = self.tracked.len(),
            seed0 = self.params.seed0,
            seed1 = self.params.seed1,
            window_cycles = self.window_cycles,
            "token hasher"
        );
        for (row, t) in self.tracked.iter().enumerate() {
            let entry = self.catalog.signal(t.index);
            tracing::info!(
                row,
                signal = %self.catalog.qualified_name(t.index),
                width = entry.width,
                direction = entry.direction.as_str(),
                "tracked signal"
            );
        }
    }

    /// CSV export of the current table.
    pub fn csv_string(&self) -> Result<String, BridgeError> {
        crate::export::to_csv(&self.get_fingerprint_table())
    }

    /// Writes the CSV export of the current table to `path`.
    pub fn write_csv_file(&self, path: &std::path::Path) -> Result<(), BridgeError> {
        crate::export::write_csv_file(&self.get_fingerprint_table(), path)
    }
}

impl Bridge for TokenHasherBridge {
    fn name(&self) -> &str {
        "token_hashers"
    }

    fn on_cycle(&mut self, cycle: u64, signals: &SignalState) {
        for t in &mut self.tracked {
            t.state.absorb(signals.get(t.index));
        }
        self.window_cycles += 1;
        tracing::trace!(cycle, window_cycles = self.window_cycles, "hashed cycle");
    }
}
