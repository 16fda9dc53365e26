//! `vigil compare`: diff two exported CSV fingerprint tables.

use std::path::Path;

use vigil_bridge::{diff_rows, from_csv, FingerprintRow};

use crate::{CompareArgs, GlobalArgs};

/// Runs the `vigil compare` command.
///
/// Prints every mismatching row and returns exit code 1 if there is any.
pub fn run(args: &CompareArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let left = read_rows(Path::new(&args.left))?;
    let right = read_rows(Path::new(&args.right))?;
    let mismatches = diff_rows(&left, &right);
    for m in &mismatches {
        println!("{m}");
    }
    if mismatches.is_empty() {
        if !global.quiet {
            eprintln!("   Identical {} rows", left.len());
        }
        Ok(0)
    } else {
        eprintln!(
            "error: {} of {} rows differ",
            mismatches.len(),
            left.len().max(right.len())
        );
        Ok(1)
    }
}

fn read_rows(path: &Path) -> Result<Vec<FingerprintRow>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let rows = from_csv(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(rows)
}
