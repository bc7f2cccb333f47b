//! High-level operations.
//!
//! This module contains the implementation of quay commands.

pub mod handoff;
pub mod plan;
pub mod resolve;

pub use handoff::{BuildDriver, MetadataWriter, PlanWriter, RegistryClient};
pub use plan::{BuildStep, DriverPlan};
pub use resolve::{
    load_identity, resolve_recipe, run, validate_recipe, ResolveOptions, ValidateReport,
};
