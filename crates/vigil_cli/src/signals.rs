//! `vigil signals`: list a model's catalogued signals.

use vigil_catalog::SignalCatalog;
use vigil_sim::model_by_name;

use crate::{GlobalArgs, SignalsArgs};

/// Runs the `vigil signals` command.
///
/// Prints one line per match: index, qualified name, width, direction.
/// Returns exit code 0 when at least one signal matched, 1 otherwise.
pub fn run(args: &SignalsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let model_name = match &args.model {
        Some(m) => m.clone(),
        None => crate::config::load(global)?.run.model,
    };
    let model = model_by_name(&model_name)?;
    let catalog = SignalCatalog::from_manifest(&model.manifest())?;
    let lines = list(&catalog, &args.module, &args.pattern)?;
    for line in &lines {
        println!("{line}");
    }
    if !global.quiet {
        eprintln!(
            "   {} of {} signals in {} ({})",
            lines.len(),
            catalog.len(),
            model.top(),
            catalog.content_hash().short()
        );
    }
    Ok(if lines.is_empty() { 1 } else { 0 })
}

fn list(
    catalog: &SignalCatalog,
    module: &str,
    pattern: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let hits = catalog.search(module, pattern)?;
    let width = hits
        .iter()
        .map(|i| catalog.qualified_name(*i).len())
        .max()
        .unwrap_or(0);
    Ok(hits
        .iter()
        .map(|&i| {
            let entry = catalog.signal(i);
            format!(
                "{:>4}  {:<width$}  {:>2}  {}",
                i.as_raw(),
                catalog.qualified_name(i),
                entry.width,
                entry.direction.as_str()
            )
        })
        .collect())
}
