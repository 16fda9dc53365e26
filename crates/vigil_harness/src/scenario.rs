//! Scenarios: host-side programs that drive a simulation and read back the
//! bridge's fingerprints.
//!
//! A scenario never looks bridges up itself. The harness resolves the
//! [`BridgeHandle`] once and passes it in, together with the signal names and
//! module the scenario should work with.

use vigil_bridge::{to_csv, FingerprintTable, HashParameters, TokenHasherBridge};
use vigil_common::{format_hex32, XorHash32};
use vigil_sim::{BridgeHandle, SimulationControl};

use crate::error::HarnessError;

/// Top module of the peek/poke reference design.
pub const PEEK_POKE_MODULE: &str = "PeekPokeBridgeModule";

/// Signals the token-hashing scenario tracks on the peek/poke design.
pub const PEEK_POKE_SIGNALS: [&str; 3] = ["io_writeValue", "io_readValue", "io_readValueFlipped"];

/// Default loop count of [`TokenHashersScenario`].
pub const DEFAULT_LOOPS: u32 = 16;

/// Default run length of [`PassthroughScenario`].
pub const DEFAULT_PASSTHROUGH_LENGTH: u64 = 1 << 16;

/// Base of the token sequence poked by [`TokenHashersScenario`].
pub const TOKEN_BASE: u32 = 0xf000;

/// What a scenario hands back after a successful run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario name.
    pub scenario: String,
    /// Cycles sampled in the measurement window.
    pub sampled_cycles: u64,
    /// Rows verified against a host replay.
    pub checked_rows: usize,
    /// Fingerprints at the end of the run.
    pub table: FingerprintTable,
    /// CSV export of `table`.
    pub csv: String,
}

/// A host-side test program.
pub trait Scenario {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Drives the simulation to completion.
    fn run(&mut self, sim: &mut dyn SimulationControl) -> Result<ScenarioReport, HarnessError>;
}

/// Pokes `0xf000 | i` into a write port for `loops` cycles and checks every
/// tracked fingerprint against hashers replayed on the host.
///
/// Before each step the scenario peeks every tracked signal; those are the
/// values the design presents at the next sampling point, so the host
/// hashers see exactly the bridge's token stream.
pub struct TokenHashersScenario {
    bridge: BridgeHandle<TokenHasherBridge>,
    module: String,
    signals: Vec<String>,
    write_port: String,
    params: HashParameters,
    loops: u32,
}

impl TokenHashersScenario {
    /// Creates the scenario for `signals` under `module`.
    ///
    /// The first signal is the one poked each loop.
    pub fn new(
        bridge: BridgeHandle<TokenHasherBridge>,
        module: impl Into<String>,
        signals: &[&str],
    ) -> Self {
        Self {
            bridge,
            module: module.into(),
            signals: signals.iter().map(|s| s.to_string()).collect(),
            write_port: signals.first().map(|s| s.to_string()).unwrap_or_default(),
            params: HashParameters::default(),
            loops: DEFAULT_LOOPS,
        }
    }

    /// The scenario for the peek/poke reference design.
    pub fn peek_poke(bridge: BridgeHandle<TokenHasherBridge>) -> Self {
        Self::new(bridge, PEEK_POKE_MODULE, &PEEK_POKE_SIGNALS)
    }

    /// Sets the seeds applied before reset.
    pub fn with_params(mut self, params: HashParameters) -> Self {
        self.params = params;
        self
    }

    /// Sets the number of poke/step loops.
    pub fn with_loops(mut self, loops: u32) -> Self {
        self.loops = loops;
        self
    }

    /// Resolves one bridge row per tracked name.
    fn resolve_rows(&self) -> Result<Vec<usize>, HarnessError> {
        let bridge = self.bridge.borrow();
        let mut rows = Vec::with_capacity(self.signals.len());
        for signal in &self.signals {
            rows.push(bridge.row_of(&self.module, signal)?);
        }
        Ok(rows)
    }
}

impl Scenario for TokenHashersScenario {
    fn name(&self) -> &str {
        "token-hashers"
    }

    fn run(&mut self, sim: &mut dyn SimulationControl) -> Result<ScenarioReport, HarnessError> {
        let rows = self.resolve_rows()?;
        {
            let mut bridge = self.bridge.borrow_mut();
            bridge.info();
            bridge.set_params(self.params.seed0, self.params.seed1)?;
        }
        sim.target_reset()?;

        let mut shadows = vec![self.params.hasher(); self.signals.len()];
        for i in 0..self.loops {
            let token = TOKEN_BASE | i;
            sim.poke(&self.write_port, token)?;
            let mut values = Vec::with_capacity(self.signals.len());
            for signal in &self.signals {
                values.push(sim.peek(signal)?);
            }
            tracing::debug!(
                step = i,
                cycle = sim.cycle(),
                poked = %format_hex32(token),
                values = ?values.iter().map(|v| format_hex32(*v)).collect::<Vec<_>>(),
                "token step"
            );
            for (shadow, value) in shadows.iter_mut().zip(&values) {
                shadow.next(*value);
            }
            sim.step(1)?;
        }

        let (table, sampled) = {
            let bridge = self.bridge.borrow();
            (bridge.get_fingerprint_table(), bridge.window_cycles())
        };
        verify(&table, &rows, &self.signals, &shadows, u64::from(self.loops))?;
        tracing::info!(
            rows = rows.len(),
            loops = self.loops,
            "all fingerprints match host replay"
        );

        let csv = to_csv(&table)?;
        Ok(ScenarioReport {
            scenario: self.name().to_string(),
            sampled_cycles: sampled,
            checked_rows: rows.len(),
            table,
            csv,
        })
    }
}

fn verify(
    table: &FingerprintTable,
    rows: &[usize],
    signals: &[String],
    shadows: &[XorHash32],
    expected_count: u64,
) -> Result<(), HarnessError> {
    for ((&row, signal), shadow) in rows.iter().zip(signals).zip(shadows) {
        let (actual, actual_count) = table
            .rows
            .get(row)
            .map(|r| (r.hash, r.count))
            .ok_or_else(|| HarnessError::MissingRow {
                signal: signal.clone(),
                row,
            })?;
        if actual != shadow.value() || actual_count != expected_count {
            tracing::warn!(
                signal = %signal,
                expected = %format_hex32(shadow.value()),
                actual = %format_hex32(actual),
                expected_count,
                actual_count,
                "fingerprint mismatch"
            );
            return Err(HarnessError::ShadowMismatch {
                signal: signal.clone(),
                expected: shadow.value(),
                actual,
                expected_count,
                actual_count,
            });
        }
    }
    Ok(())
}

/// Seeds the bridge, resets the design and lets it free-run, then snapshots
/// the table.
pub struct PassthroughScenario {
    bridge: BridgeHandle<TokenHasherBridge>,
    params: HashParameters,
    length: u64,
}

impl PassthroughScenario {
    /// Creates the scenario with the default length.
    pub fn new(bridge: BridgeHandle<TokenHasherBridge>) -> Self {
        Self {
            bridge,
            params: HashParameters::default(),
            length: DEFAULT_PASSTHROUGH_LENGTH,
        }
    }

    /// Sets the seeds applied before reset.
    pub fn with_params(mut self, params: HashParameters) -> Self {
        self.params = params;
        self
    }

    /// Sets the number of cycles to run after reset.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }
}

impl Scenario for PassthroughScenario {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn run(&mut self, sim: &mut dyn SimulationControl) -> Result<ScenarioReport, HarnessError> {
        {
            let mut bridge = self.bridge.borrow_mut();
            bridge.info();
            bridge.set_params(self.params.seed0, self.params.seed1)?;
        }
        sim.target_reset()?;
        sim.step(self.length)?;
        let (table, sampled) = {
            let bridge = self.bridge.borrow();
            (bridge.get_fingerprint_table(), bridge.window_cycles())
        };
        tracing::info!(length = self.length, rows = table.len(), "passthrough run complete");
        let csv = to_csv(&table)?;
        Ok(ScenarioReport {
            scenario: self.name().to_string(),
            sampled_cycles: sampled,
            checked_rows: 0,
            table,
            csv,
        })
    }
}
