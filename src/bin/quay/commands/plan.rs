//! `quay plan` command

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use quay::ops::{run, MetadataWriter, PlanWriter};

use crate::cli::PlanArgs;
use crate::commands::GlobalArgs;

pub fn execute(global: &GlobalArgs, args: PlanArgs) -> Result<()> {
    let opts = global.resolve_options(&args.recipe)?;
    let mut driver = PlanWriter::new(io::stdout().lock(), args.json);

    match &args.metadata_out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut registry = MetadataWriter::new(BufWriter::new(file));
            run(&opts, &mut driver, &mut registry)?;
            registry.into_inner().flush()?;
            tracing::info!("wrote package metadata to {}", path.display());
        }
        None => {
            let mut registry = MetadataWriter::new(io::sink());
            run(&opts, &mut driver, &mut registry)?;
        }
    }

    Ok(())
}
