//! Builds a simulation from a [`RunConfig`], attaches the token-hashing
//! bridge, and runs the configured scenario.

use std::path::PathBuf;

use vigil_bridge::{
    render, write_export, ExportFormat, HashParameters, TokenHasherBridge, TrackSpec,
};
use vigil_config::{ConfigError, ExportKind, RunConfig, ScenarioKind};
use vigil_sim::{model_by_name, BridgeHandle, SimConfig, SimController};

use crate::error::HarnessError;
use crate::scenario::{
    PassthroughScenario, Scenario, ScenarioReport, TokenHashersScenario, DEFAULT_LOOPS,
    DEFAULT_PASSTHROUGH_LENGTH, PEEK_POKE_SIGNALS,
};

/// Maps the configured export kind onto the bridge's renderer.
pub fn export_format(kind: ExportKind) -> ExportFormat {
    match kind {
        ExportKind::Csv => ExportFormat::Csv,
        ExportKind::Text => ExportFormat::Text,
        ExportKind::Json => ExportFormat::Json,
    }
}

/// A configured controller with the token-hashing bridge attached.
pub struct Harness {
    config: RunConfig,
    sim: SimController,
    bridge: BridgeHandle<TokenHasherBridge>,
}

impl Harness {
    /// Builds the model, controller, and bridge described by `config`.
    ///
    /// With no `[[track]]` entries every catalogued signal is tracked.
    pub fn from_config(config: RunConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let model = model_by_name(&config.run.model)?;
        let mut sim = SimController::new(model)?;
        sim.configure(&SimConfig {
            reset_cycles: config.run.reset_cycles,
            scope: config.run.scope.clone(),
        });

        let catalog = sim.catalog().clone();
        let params = HashParameters::new(config.hash.seed0, config.hash.seed1);
        let bridge = if config.tracks.is_empty() {
            TokenHasherBridge::attach_all(catalog, params)?
        } else {
            let specs: Vec<TrackSpec> = config
                .tracks
                .iter()
                .map(|t| TrackSpec::new(t.module.clone(), t.signal.clone()))
                .collect();
            TokenHasherBridge::attach_matching(catalog, &specs, params)?
        };
        sim.attach_bridge(bridge)?;
        let bridge = sim.bridges().get::<TokenHasherBridge>()?;

        for (key, value) in config.plusargs.iter() {
            tracing::debug!(key, value = value.unwrap_or(""), "plusarg");
        }
        if let Some(value) = config.plusargs.get("plusargs_test_key") {
            tracing::info!(plusargs_test_key = value, "plusarg test key");
        }
        tracing::info!(
            model = %config.run.model,
            scope = sim.scope(),
            tracked = bridge.borrow().tracked_len(),
            "harness ready"
        );
        Ok(Self {
            config,
            sim,
            bridge,
        })
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The controller.
    pub fn controller(&self) -> &SimController {
        &self.sim
    }

    /// Mutable access to the controller, for driving it by hand.
    pub fn controller_mut(&mut self) -> &mut SimController {
        &mut self.sim
    }

    /// The bridge handle.
    pub fn bridge(&self) -> &BridgeHandle<TokenHasherBridge> {
        &self.bridge
    }

    /// Builds the configured scenario.
    pub fn scenario(&self) -> Result<Box<dyn Scenario>, HarnessError> {
        let scenario: Box<dyn Scenario> = match self.config.run.scenario {
            ScenarioKind::TokenHashers => {
                let loops = match self.config.run.cycles {
                    Some(cycles) => u32::try_from(cycles).map_err(|_| {
                        ConfigError::ValidationError(format!(
                            "run.cycles {cycles} exceeds the token-hashers loop limit"
                        ))
                    })?,
                    None => DEFAULT_LOOPS,
                };
                let params = HashParameters::new(self.config.hash.seed0, self.config.hash.seed1);
                Box::new(
                    TokenHashersScenario::new(
                        self.bridge.clone(),
                        self.sim.scope(),
                        &PEEK_POKE_SIGNALS,
                    )
                    .with_params(params)
                    .with_loops(loops),
                )
            }
            ScenarioKind::Passthrough => Box::new(
                PassthroughScenario::new(self.bridge.clone())
                    .with_params(HashParameters::new(
                        self.config.hash.seed0,
                        self.config.hash.seed1,
                    ))
                    .with_length(self.config.run.cycles.unwrap_or(DEFAULT_PASSTHROUGH_LENGTH)),
            ),
        };
        Ok(scenario)
    }

    /// Runs the configured scenario to completion.
    pub fn run(&mut self) -> Result<ScenarioReport, HarnessError> {
        let mut scenario = self.scenario()?;
        self.run_scenario(scenario.as_mut())
    }

    /// Runs any scenario against this harness's controller.
    pub fn run_scenario(
        &mut self,
        scenario: &mut dyn Scenario,
    ) -> Result<ScenarioReport, HarnessError> {
        tracing::info!(scenario = scenario.name(), "running scenario");
        let report = scenario.run(&mut self.sim)?;
        tracing::info!(
            scenario = %report.scenario,
            sampled_cycles = report.sampled_cycles,
            checked_rows = report.checked_rows,
            "scenario complete"
        );
        Ok(report)
    }

    /// Renders a report in the configured export format.
    pub fn render(&self, report: &ScenarioReport) -> Result<String, HarnessError> {
        Ok(render(&report.table, export_format(self.config.export.format))?)
    }

    /// Writes the report to the configured export path, if any.
    pub fn export(&self, report: &ScenarioReport) -> Result<Option<PathBuf>, HarnessError> {
        match &self.config.export.path {
            Some(path) => {
                write_export(
                    &report.table,
                    export_format(self.config.export.format),
                    path,
                )?;
                Ok(Some(path.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_config::load_config_from_str;
    use vigil_sim::{SimError, Stepper};

    #[test]
    fn default_config_runs_peek_poke() {
        let mut harness = Harness::from_config(RunConfig::default()).unwrap();
        assert_eq!(harness.bridge().borrow().tracked_len(), 3);
        let report = harness.run().unwrap();
        assert_eq!(report.scenario, "token-hashers");
        assert_eq!(report.checked_rows, 3);
        assert_eq!(harness.controller().cycle(), 17);
    }

    #[test]
    fn unknown_model() {
        let config = load_config_from_str("[run]\nmodel = \"fir-filter\"\n").unwrap();
        let err = Harness::from_config(config).err().unwrap();
        assert!(matches!(err, HarnessError::Sim(SimError::UnknownModel { .. })));
    }

    #[test]
    fn track_specs_select_rows() {
        let config = load_config_from_str(
            r#"
[run]
model = "passthrough-nested"
scenario = "passthrough"
cycles = 8

[[track]]
module = "passthru"
signal = "io_out"
"#,
        )
        .unwrap();
        let mut harness = Harness::from_config(config).unwrap();
        assert_eq!(harness.bridge().borrow().tracked_len(), 2);
        let report = harness.run().unwrap();
        assert_eq!(report.sampled_cycles, 8);
    }

    #[test]
    fn render_uses_configured_format() {
        let config = load_config_from_str("[export]\nformat = \"text\"\n").unwrap();
        let mut harness = Harness::from_config(config).unwrap();
        let report = harness.run().unwrap();
        let text = harness.render(&report).unwrap();
        assert!(text.starts_with("signal"));
        assert!(text.contains("7727725b"));
        assert!(!text.contains(','));
    }

    #[test]
    fn export_without_path_is_noop() {
        let mut harness = Harness::from_config(RunConfig::default()).unwrap();
        let report = harness.run().unwrap();
        assert_eq!(harness.export(&report).unwrap(), None);
    }

    #[test]
    fn export_maps_every_kind() {
        assert_eq!(export_format(ExportKind::Csv), ExportFormat::Csv);
        assert_eq!(export_format(ExportKind::Text), ExportFormat::Text);
        assert_eq!(export_format(ExportKind::Json), ExportFormat::Json);
    }
}
