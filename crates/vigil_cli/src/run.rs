//! `vigil run`: run the configured scenario and export the fingerprints.
//!
//! Loads `vigil.toml` (or defaults), layers command-line flags and plusargs on
//! top, builds the harness, and runs the scenario. The export goes to the
//! configured file or stdout. A fingerprint that disagrees with the host
//! replay exits with code 1.

use std::path::PathBuf;

use vigil_config::{ExportKind, Plusargs, RunConfig};
use vigil_harness::{Harness, HarnessError};

use crate::{ExportFormatArg, GlobalArgs, RunArgs};

/// Runs the `vigil run` command.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = crate::config::load(global)?;
    apply_args(&mut config, args)?;
    tracing::debug!(
        model = %config.run.model,
        cycles = ?config.run.cycles,
        seed0 = config.hash.seed0,
        seed1 = config.hash.seed1,
        format = %config.export.format,
        "effective run configuration"
    );

    if !global.quiet {
        eprintln!(
            "   Running {:?} on {}",
            config.run.scenario, config.run.model
        );
    }

    let mut harness = Harness::from_config(config)?;
    let report = match harness.run() {
        Ok(report) => report,
        Err(e @ HarnessError::ShadowMismatch { .. }) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    match harness.export(&report)? {
        Some(path) => {
            if !global.quiet {
                eprintln!(
                    "    Wrote {} rows to {}",
                    report.table.len(),
                    path.display()
                );
            }
        }
        None => print!("{}", harness.render(&report)?),
    }

    if !global.quiet {
        eprintln!(
            "   Finished {} sampled cycles, {} rows checked",
            report.sampled_cycles, report.checked_rows
        );
    }
    Ok(0)
}

/// Applies command-line flags, then plusargs, to the loaded configuration.
fn apply_args(config: &mut RunConfig, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(model) = &args.model {
        config.run.model = model.clone();
    }
    if let Some(cycles) = args.cycles {
        config.run.cycles = Some(cycles);
    }
    if let Some(seed0) = args.seed0 {
        config.hash.seed0 = seed0;
    }
    if let Some(seed1) = args.seed1 {
        config.hash.seed1 = seed1;
    }
    if let Some(format) = args.format {
        config.export.format = export_kind(format);
    }
    if let Some(output) = &args.output {
        config.export.path = Some(PathBuf::from(output));
    }
    let plusargs = Plusargs::parse(&args.plusargs)?;
    config.apply_plusargs(&plusargs)?;
    Ok(())
}

fn export_kind(format: ExportFormatArg) -> ExportKind {
    match format {
        ExportFormatArg::Csv => ExportKind::Csv,
        ExportFormatArg::Text => ExportKind::Text,
        ExportFormatArg::Json => ExportKind::Json,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args() -> RunArgs {
        RunArgs {
            model: None,
            cycles: None,
            seed0: None,
            seed1: None,
            format: None,
            output: None,
            plusargs: Vec::new(),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = RunConfig::default();
        let mut a = args();
        a.model = Some("passthrough-iden".into());
        a.seed0 = Some(5);
        a.format = Some(ExportFormatArg::Text);
        a.output = Some("fp.txt".into());
        apply_args(&mut config, &a).unwrap();
        assert_eq!(config.run.model, "passthrough-iden");
        assert_eq!(config.hash.seed0, 5);
        assert_eq!(config.export.format, ExportKind::Text);
        assert_eq!(config.export.path, Some(PathBuf::from("fp.txt")));
    }

    #[test]
    fn plusargs_win_over_flags() {
        let mut config = RunConfig::default();
        let mut a = args();
        a.seed1 = Some(1);
        a.plusargs = vec!["+seed1=9".into()];
        apply_args(&mut config, &a).unwrap();
        assert_eq!(config.hash.seed1, 9);
    }

    #[test]
    fn malformed_plusarg_errors() {
        let mut config = RunConfig::default();
        let mut a = args();
        a.plusargs = vec!["seed1=9".into()];
        assert!(apply_args(&mut config, &a).is_err());
    }

    #[test]
    fn run_writes_export_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("fp.csv");
        let mut a = args();
        a.output = Some(out.to_str().unwrap().to_string());
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(tmp.path().join("vigil.toml").to_str().unwrap().to_string()),
        };
        std::fs::write(tmp.path().join("vigil.toml"), "").unwrap();
        assert_eq!(run(&a, &global).unwrap(), 0);
        let csv = std::fs::read_to_string(&out).unwrap();
        assert!(csv.contains("io_writeValue,7727725b,16\n"));
    }

    #[test]
    fn unknown_model_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("vigil.toml"), "[run]\nmodel = \"nope\"\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(tmp.path().to_str().unwrap().to_string()),
        };
        assert!(run(&args(), &global).is_err());
    }
}
