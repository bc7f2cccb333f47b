//! Recipe resolution operations.
//!
//! These glue the pure resolver to the outside: loading the recipe
//! version, merging configuration with command-line overrides, and handing
//! the result to the build driver and registry client.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::feature::NormalizedFeatures;
use crate::core::recipe::RecipeIdentity;
use crate::core::revision::{Revision, RevisionSchema};
use crate::core::settings::Settings;
use crate::core::toolchain::ToolchainDescriptor;
use crate::ops::handoff::{BuildDriver, RegistryClient};
use crate::ops::plan::DriverPlan;
use crate::resolver::{ResolutionPass, ResolvedConfiguration, UnknownCompilerPolicy, ValidatedPass};
use crate::util::config::Config;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Inputs of a resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Recipe revision to resolve against
    pub revision: Revision,
    /// Folder holding the recipe (and its VERSION file)
    pub recipe_dir: PathBuf,
    /// Option defaults from configuration; skipped when the revision does
    /// not declare them
    pub defaults: Vec<(String, bool)>,
    /// Flag overrides, applied in order after the defaults
    pub options: Vec<(String, bool)>,
    /// Profile settings
    pub settings: Settings,
    /// Policy for compilers missing from the minimum version table
    pub policy: UnknownCompilerPolicy,
}

impl ResolveOptions {
    /// Options with every default: latest revision, no overrides.
    pub fn new(recipe_dir: impl Into<PathBuf>) -> Self {
        ResolveOptions {
            revision: Revision::LATEST,
            recipe_dir: recipe_dir.into(),
            defaults: Vec::new(),
            options: Vec::new(),
            settings: Settings::new(),
            policy: UnknownCompilerPolicy::default(),
        }
    }

    /// Options seeded from configuration files.
    pub fn from_config(config: &Config, recipe_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut opts = ResolveOptions::new(recipe_dir);
        if let Some(revision) = config.resolve.revision {
            opts.revision = revision;
        }
        if let Some(policy) = config.resolve.unknown_compiler {
            opts.policy = policy;
        }
        opts.defaults = config
            .options
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        opts.settings = config.profile()?;
        Ok(opts)
    }
}

/// Result of a pass that got through validation.
#[derive(Debug)]
pub struct ValidateReport {
    pub revision: Revision,
    pub toolchain: ToolchainDescriptor,
    pub features: NormalizedFeatures,
    pub warnings: Vec<Diagnostic>,
}

/// Load the identity of the recipe for a revision.
pub fn load_identity(schema: &RevisionSchema, recipe_dir: &Path) -> Result<RecipeIdentity> {
    let version = schema
        .version_source
        .load(recipe_dir)
        .context(suggestions::MISSING_VERSION_FILE)?;
    Ok(RecipeIdentity::new(version))
}

fn validated_pass<'a>(
    schema: &'a RevisionSchema,
    opts: &ResolveOptions,
) -> Result<ValidatedPass<'a>> {
    let identity = load_identity(schema, &opts.recipe_dir)?;
    let toolchain = opts.settings.toolchain()?;
    let cppstd = opts.settings.cppstd()?;

    let mut pass = ResolutionPass::new(schema, identity);
    for (name, value) in &opts.defaults {
        if schema.feature(name).is_none() {
            tracing::debug!(
                "ignoring configured option `{}`, not declared by revision {}",
                name,
                schema.revision
            );
            continue;
        }
        pass.set(name, *value)?;
    }
    for (name, value) in &opts.options {
        pass.set(name, *value)?;
    }

    let pass = pass.normalize().validate(&toolchain, cppstd, opts.policy)?;
    Ok(pass)
}

/// Run normalization and validation only.
pub fn validate_recipe(opts: &ResolveOptions) -> Result<ValidateReport> {
    let schema = RevisionSchema::for_revision(opts.revision);
    let pass = validated_pass(&schema, opts)?;

    Ok(ValidateReport {
        revision: opts.revision,
        toolchain: opts.settings.toolchain()?,
        features: pass.features().clone(),
        warnings: pass.warnings().to_vec(),
    })
}

/// Run a full resolution pass.
///
/// A rejected pass surfaces its [`crate::resolver::ValidationError`]
/// unchanged inside the returned error.
pub fn resolve_recipe(opts: &ResolveOptions) -> Result<ResolvedConfiguration> {
    let schema = RevisionSchema::for_revision(opts.revision);
    Ok(validated_pass(&schema, opts)?.resolve())
}

/// Resolve, then hand the result to the build driver and registry client.
///
/// Neither collaborator is invoked unless the pass resolves.
pub fn run(
    opts: &ResolveOptions,
    driver: &mut dyn BuildDriver,
    registry: &mut dyn RegistryClient,
) -> Result<ResolvedConfiguration> {
    let schema = RevisionSchema::for_revision(opts.revision);
    let resolved = validated_pass(&schema, opts)?.resolve();

    let plan = DriverPlan::new(&schema, &resolved, opts.settings.os());
    driver
        .execute(&plan)
        .with_context(|| format!("build driver failed for `{}`", plan.package))?;
    registry
        .publish(&resolved.metadata)
        .with_context(|| format!("failed to publish `{}`", plan.package))?;

    Ok(resolved)
}
