//! End-to-end runs of the token-hashing bridge against the reference models.
//!
//! These tests drive full scenarios through the harness and check the bridge's
//! fingerprints against fixed reference values and against host-side replays.

use vigil_bridge::{from_csv, BridgeError, HashParameters, TokenHasherBridge};
use vigil_common::XorHash32;
use vigil_config::{load_config_from_str, Plusargs, RunConfig};
use vigil_harness::{Harness, HarnessError, Scenario, TokenHashersScenario, PEEK_POKE_MODULE};
use vigil_sim::models::{PassthroughModel, PeekPokeModel};
use vigil_sim::{SignalAccess, SimController, Stepper};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn harness(toml: &str) -> Harness {
    Harness::from_config(load_config_from_str(toml).unwrap()).unwrap()
}

fn replay(params: HashParameters, tokens: impl IntoIterator<Item = u32>) -> u32 {
    let mut h = params.hasher();
    h.consume(tokens)
}

// ---------------------------------------------------------------------------
// Reference fingerprints
// ---------------------------------------------------------------------------

#[test]
fn peek_poke_reference_csv() {
    let mut h = harness("");
    let report = h.run().unwrap();
    assert_eq!(
        report.csv,
        "signal,hash,count\n\
         io_writeValue,7727725b,16\n\
         io_readValue,cb8ac19d,16\n\
         io_readValueFlipped,8b583cc7,16\n"
    );
}

#[test]
fn write_port_matches_host_replay() {
    let mut h = harness("");
    let report = h.run().unwrap();
    let row = report.table.find("io_writeValue").unwrap();
    let expected = replay(HashParameters::default(), (0..16).map(|i| 0xf000 | i));
    assert_eq!(row.hash, expected);
    assert_eq!(row.hash, 0x7727_725b);
    assert_eq!(row.count, 16);
}

#[test]
fn read_port_lags_write_port_by_one_cycle() {
    let mut h = harness("");
    let report = h.run().unwrap();
    let tokens: Vec<u32> = std::iter::once(0)
        .chain((0..15).map(|i| 0xf000 | i))
        .collect();
    let read = report.table.find("io_readValue").unwrap();
    let flipped = report.table.find("io_readValueFlipped").unwrap();
    assert_eq!(read.hash, replay(HashParameters::default(), tokens.iter().copied()));
    assert_eq!(
        flipped.hash,
        replay(HashParameters::default(), tokens.iter().map(|t| !t))
    );
}

#[test]
fn seeds_change_every_fingerprint() {
    let mut a = harness("");
    let mut b = harness("[hash]\nseed0 = 1\nseed1 = 2\n");
    let ra = a.run().unwrap();
    let rb = b.run().unwrap();
    for (x, y) in ra.table.rows.iter().zip(&rb.table.rows) {
        assert_eq!(x.signal, y.signal);
        assert_eq!(x.count, y.count);
        assert_ne!(x.hash, y.hash);
    }
}

#[test]
fn identical_runs_export_identical_bytes() {
    let first = harness("").run().unwrap();
    let second = harness("").run().unwrap();
    assert_eq!(first.csv, second.csv);
    assert!(first.table.diff(&second.table.rows).is_empty());
    assert_eq!(from_csv(&first.csv).unwrap(), first.table.rows);
}

// ---------------------------------------------------------------------------
// Sample completeness and reset
// ---------------------------------------------------------------------------

#[test]
fn count_equals_completed_steps_regardless_of_peeks() {
    let mut sim = SimController::new(Box::new(PeekPokeModel::new())).unwrap();
    let bridge =
        TokenHasherBridge::attach_all(sim.catalog().clone(), HashParameters::default()).unwrap();
    let handle = sim.attach_bridge(bridge).unwrap();
    sim.target_reset().unwrap();
    for i in 0..10u32 {
        sim.poke("io_writeValue", i).unwrap();
        for _ in 0..i {
            sim.peek("io_readValue").unwrap();
            sim.poke("io_writeValue", i).unwrap();
        }
        sim.step(u64::from(i % 3)).unwrap();
    }
    let expected: u64 = (0..10u64).map(|i| i % 3).sum();
    let table = handle.borrow().get_fingerprint_table();
    assert!(table.rows.iter().all(|r| r.count == expected));
}

#[test]
fn restart_window_yields_pure_seed() {
    let mut h = harness("");
    h.run().unwrap();
    h.bridge().borrow_mut().restart_window(1, 2);
    let table = h.bridge().borrow().get_fingerprint_table();
    let seeded = XorHash32::seeded(1, 2).value();
    assert!(table.rows.iter().all(|r| r.hash == seeded && r.count == 0));

    h.controller_mut().step(3).unwrap();
    assert_eq!(h.bridge().borrow().window_cycles(), 3);
}

#[test]
fn second_run_needs_restart() {
    let mut h = harness("[run]\ncycles = 4\n");
    h.run().unwrap();
    let err = h.run().unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Bridge(BridgeError::OutOfWindowConfiguration { sampled: 4 })
    ));
}

// ---------------------------------------------------------------------------
// Search and ambiguity
// ---------------------------------------------------------------------------

#[test]
fn nested_instances_are_ambiguous_until_qualified() {
    let mut sim = SimController::new(Box::new(PassthroughModel::nested())).unwrap();
    let bridge =
        TokenHasherBridge::attach_all(sim.catalog().clone(), HashParameters::default()).unwrap();
    let handle = sim.attach_bridge(bridge).unwrap();

    assert_eq!(handle.borrow().search("passthru", "io_in").unwrap().len(), 2);
    assert_eq!(handle.borrow().search("stage1.passthru", "io_in").unwrap().len(), 1);
    assert_eq!(handle.borrow().search("", "io_*").unwrap().len(), 6);

    let mut scenario = TokenHashersScenario::new(handle.clone(), "passthru", &["io_in"]);
    let err = scenario.run(&mut sim).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Bridge(BridgeError::Ambiguous { count: 2, .. })
    ));
}

#[test]
fn scenario_on_qualified_nested_port() {
    let mut sim = SimController::new(Box::new(PassthroughModel::nested())).unwrap();
    let bridge =
        TokenHasherBridge::attach_all(sim.catalog().clone(), HashParameters::default()).unwrap();
    let handle = sim.attach_bridge(bridge).unwrap();
    // top-level ports resolve uniquely under the top scope
    let mut scenario =
        TokenHashersScenario::new(handle.clone(), "PassthroughModelNested", &["io_in", "io_out"])
            .with_loops(8);
    let report = scenario.run(&mut sim).unwrap();
    assert_eq!(report.checked_rows, 2);
    let io_in = handle.borrow().row_of("PassthroughModelNested", "io_in").unwrap();
    assert_eq!(report.table.rows[io_in].count, 8);
}

// ---------------------------------------------------------------------------
// Passthrough family
// ---------------------------------------------------------------------------

#[test]
fn bridge_source_counter_fingerprint() {
    let mut h = harness(
        r#"
[run]
model = "passthrough-bridge-source"
scenario = "passthrough"
cycles = 1000

[[track]]
signal = "io_out"
"#,
    );
    let report = h.run().unwrap();
    assert_eq!(report.table.len(), 1);
    let row = &report.table.rows[0];
    assert_eq!(row.count, 1000);
    assert_eq!(row.hash, replay(HashParameters::default(), 0..1000));
}

#[test]
fn passthrough_default_length() {
    let mut h = harness("[run]\nmodel = \"passthrough-iden\"\nscenario = \"passthrough\"\n");
    let report = h.run().unwrap();
    assert_eq!(report.sampled_cycles, 1 << 16);
}

// ---------------------------------------------------------------------------
// Configuration and export
// ---------------------------------------------------------------------------

#[test]
fn plusargs_override_loops_and_seeds() {
    let mut config = RunConfig::default();
    let args = Plusargs::parse(["+cycles=4", "+seed0=0x1", "+plusargs_test_key=x"]).unwrap();
    config.apply_plusargs(&args).unwrap();
    let mut h = Harness::from_config(config).unwrap();
    let report = h.run().unwrap();
    assert_eq!(report.table.params, HashParameters::new(1, 0));
    assert!(report.table.rows.iter().all(|r| r.count == 4));
}

#[test]
fn export_writes_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fingerprints.csv");
    let toml = format!("[export]\npath = {:?}\n", path.display().to_string());
    let mut h = harness(&toml);
    let report = h.run().unwrap();
    let written = h.export(&report).unwrap().unwrap();
    assert_eq!(written, path);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), report.csv);
}

#[test]
fn unknown_track_spec_fails_at_build() {
    let toml = format!("[[track]]\nmodule = {PEEK_POKE_MODULE:?}\nsignal = \"io_bogus\"\n");
    let config = load_config_from_str(&toml).unwrap();
    let err = Harness::from_config(config).err().unwrap();
    assert!(matches!(
        err,
        HarnessError::Bridge(BridgeError::EmptyTrackSpec { .. })
    ));
}
