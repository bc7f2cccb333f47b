//! Command implementations.

pub mod completions;
pub mod metadata;
pub mod options;
pub mod plan;
pub mod resolve;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use quay::core::feature::parse_assignment;
use quay::core::Revision;
use quay::ops::ResolveOptions;
use quay::resolver::UnknownCompilerPolicy;
use quay::util::config::{global_config_path, load_config, project_config_path, Config};

use crate::cli::{Cli, RecipeArgs};

/// Flags shared by every command.
pub struct GlobalArgs {
    pub revision: Option<Revision>,
    pub recipe_dir: PathBuf,
    pub unknown_compiler: Option<UnknownCompilerPolicy>,
}

impl From<&Cli> for GlobalArgs {
    fn from(cli: &Cli) -> Self {
        GlobalArgs {
            revision: cli.revision,
            recipe_dir: cli.recipe_dir.clone(),
            unknown_compiler: cli.unknown_compiler,
        }
    }
}

impl GlobalArgs {
    /// Merged global and project configuration.
    fn config(&self) -> Config {
        let global_path = global_config_path().unwrap_or_default();
        let project_path = project_config_path(&self.recipe_dir);
        load_config(&global_path, &project_path)
    }

    /// The revision to use, with config as fallback.
    ///
    /// Only the `[resolve]` table is consulted, so a bad `[settings]` entry
    /// does not change which revision is picked.
    pub fn revision(&self) -> Revision {
        self.revision
            .or_else(|| self.config().resolve.revision)
            .unwrap_or(Revision::LATEST)
    }

    /// Build resolution inputs: config files first, then command-line flags.
    pub fn resolve_options(&self, args: &RecipeArgs) -> Result<ResolveOptions> {
        let config = self.config();
        let mut opts = ResolveOptions::from_config(&config, &self.recipe_dir)?;
        if let Some(revision) = self.revision {
            opts.revision = revision;
        }
        if let Some(policy) = self.unknown_compiler {
            opts.policy = policy;
        }

        for option in &args.options {
            opts.options.push(parse_assignment(option)?);
        }
        for setting in &args.settings {
            opts.settings.set_assignment(setting)?;
        }

        tracing::debug!(
            "resolving revision {} from {}",
            opts.revision,
            opts.recipe_dir.display()
        );
        Ok(opts)
    }
}
