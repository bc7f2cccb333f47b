//! `quay resolve` command

use std::io::{self, Write};

use anyhow::{Context, Result};

use quay::ops::resolve_recipe;

use crate::cli::ResolveArgs;
use crate::commands::GlobalArgs;

pub fn execute(global: &GlobalArgs, args: ResolveArgs) -> Result<()> {
    let opts = global.resolve_options(&args.recipe)?;
    let resolved = resolve_recipe(&opts)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        serde_json::to_writer_pretty(&mut out, &resolved)
            .context("failed to serialize resolved configuration")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} (revision {})", resolved.package.reference(), resolved.revision)?;
    writeln!(out, "settings: {}", resolved.package.settings.join(", "))?;

    let enabled: Vec<&str> = resolved.features.enabled().collect();
    if enabled.is_empty() {
        writeln!(out, "features: none")?;
    } else {
        writeln!(out, "features: {}", enabled.join(", "))?;
    }

    writeln!(out, "requires:")?;
    for req in &resolved.requirements {
        writeln!(out, "  {}", req)?;
    }

    if !resolved.option_overrides.is_empty() {
        writeln!(out, "dependency options:")?;
        for o in &resolved.option_overrides {
            writeln!(out, "  {}", o)?;
        }
    }

    if !resolved.defines.is_empty() {
        writeln!(out, "defines:")?;
        for define in &resolved.defines {
            writeln!(out, "  {}", define)?;
        }
    }

    let aliases = resolved.metadata.aliases();
    writeln!(out, "targets: {}", aliases.join(", "))?;
    let fingerprint = resolved
        .fingerprint()
        .context("failed to fingerprint resolved configuration")?;
    writeln!(out, "fingerprint: {}", fingerprint)?;

    Ok(())
}
