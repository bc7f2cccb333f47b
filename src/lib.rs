//! quay - A feature-conditional dependency and compatibility resolver
//!
//! This crate evaluates the `octo-logger-cpp` package recipe: given feature
//! flags and a toolchain, it validates the configuration and resolves the
//! pinned requirements, exported defines and installed-package metadata that
//! a build driver and a package registry consume.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for quay unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    FeatureFlag, PackageMetadata, Revision, RevisionSchema, ToolchainDescriptor,
};

pub use resolver::{ResolutionPass, ResolvedConfiguration, ValidationError};
