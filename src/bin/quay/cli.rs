//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use quay::core::Revision;
use quay::resolver::UnknownCompilerPolicy;

/// quay - Feature-conditional dependency and compatibility resolver
#[derive(Parser)]
#[command(name = "quay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Recipe revision to resolve against (v1, v2, v3, latest)
    #[arg(long, global = true, env = "QUAY_REVISION")]
    pub revision: Option<Revision>,

    /// Folder holding the recipe and its VERSION file
    #[arg(long, global = true, default_value = ".")]
    pub recipe_dir: PathBuf,

    /// How to treat compilers without a known minimum version (warn, deny)
    #[arg(long, global = true)]
    pub unknown_compiler: Option<UnknownCompilerPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve requirements, defines and metadata
    Resolve(ResolveArgs),

    /// Check the toolchain without resolving
    Validate(RecipeArgs),

    /// List the options a revision declares
    Options,

    /// Show the build-driver plan
    Plan(PlanArgs),

    /// Print the installed-package metadata as JSON
    Metadata(RecipeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Clone)]
pub struct RecipeArgs {
    /// Override an option (e.g. `-o with_aws=True`)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Set a profile setting (e.g. `-s compiler=gcc`)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Emit the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the package metadata to this file
    #[arg(long, value_name = "PATH")]
    pub metadata_out: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
