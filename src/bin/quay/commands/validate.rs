//! `quay validate` command

use anyhow::Result;

use quay::ops::validate_recipe;

use crate::cli::RecipeArgs;
use crate::commands::GlobalArgs;

pub fn execute(global: &GlobalArgs, args: RecipeArgs) -> Result<()> {
    let opts = global.resolve_options(&args)?;
    let report = validate_recipe(&opts)?;

    println!(
        "{} is compatible with revision {}",
        report.toolchain, report.revision
    );

    let enabled: Vec<&str> = report.features.enabled().collect();
    if !enabled.is_empty() {
        println!("features: {}", enabled.join(", "));
    }
    if !report.warnings.is_empty() {
        println!("{} warning(s) emitted", report.warnings.len());
    }

    Ok(())
}
