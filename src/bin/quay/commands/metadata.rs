//! `quay metadata` command

use std::io;

use anyhow::Result;

use quay::ops::{resolve_recipe, MetadataWriter, RegistryClient};

use crate::cli::RecipeArgs;
use crate::commands::GlobalArgs;

pub fn execute(global: &GlobalArgs, args: RecipeArgs) -> Result<()> {
    let opts = global.resolve_options(&args)?;
    let resolved = resolve_recipe(&opts)?;

    MetadataWriter::new(io::stdout().lock()).publish(&resolved.metadata)
}
