//! Test utilities and mocks for quay unit tests.
//!
//! This module provides fixture builders for toolchains, settings and
//! recipe folders, plus recording mocks for the build driver and registry
//! client seams.
//!
//! # Example
//!
//! ```rust,ignore
//! use quay::test_support::{recipe_dir, settings, MockDriver, MockRegistry};
//!
//! #[test]
//! fn test_example() {
//!     let dir = recipe_dir("1.0.0");
//!     let mut driver = MockDriver::default();
//!     let mut registry = MockRegistry::default();
//!     // Run ops::run against the mocks...
//! }
//! ```

use anyhow::{bail, Result};
use tempfile::TempDir;

use crate::core::metadata::PackageMetadata;
use crate::core::recipe::VERSION_FILE;
use crate::core::settings::Settings;
use crate::core::toolchain::{parse_version_lenient, CompilerFamily, ToolchainDescriptor};
use crate::ops::handoff::{BuildDriver, RegistryClient};
use crate::ops::plan::DriverPlan;

/// Build a toolchain descriptor for a recognized compiler.
///
/// Panics if `family` is not one of the known compiler names.
pub fn toolchain(family: &str, version: &str) -> ToolchainDescriptor {
    let family = CompilerFamily::from_name(family);
    assert!(family.is_known(), "`{}` is not a known compiler", family);
    descriptor(family, version)
}

/// Build a toolchain descriptor for a compiler quay does not know.
pub fn unknown_toolchain(name: &str, version: &str) -> ToolchainDescriptor {
    let family = CompilerFamily::from_name(name);
    assert!(!family.is_known(), "`{}` is a known compiler", family);
    descriptor(family, version)
}

fn descriptor(family: CompilerFamily, version: &str) -> ToolchainDescriptor {
    let version = parse_version_lenient(version)
        .unwrap_or_else(|| panic!("invalid version `{}`", version));
    ToolchainDescriptor::new(family, version)
}

/// Build settings from `key=value` pairs.
pub fn settings(pairs: &[&str]) -> Settings {
    let mut settings = Settings::new();
    for pair in pairs {
        settings
            .set_assignment(pair)
            .unwrap_or_else(|e| panic!("bad setting `{}`: {}", pair, e));
    }
    settings
}

/// Create a recipe folder holding a VERSION file.
pub fn recipe_dir(version: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(VERSION_FILE), format!("{}\n", version)).unwrap();
    dir
}

/// A build driver that records every plan it is handed.
#[derive(Debug, Default)]
pub struct MockDriver {
    pub plans: Vec<DriverPlan>,
    /// Fail every execution with this message
    pub fail_with: Option<String>,
}

impl BuildDriver for MockDriver {
    fn execute(&mut self, plan: &DriverPlan) -> Result<()> {
        self.plans.push(plan.clone());
        if let Some(ref message) = self.fail_with {
            bail!("{}", message);
        }
        Ok(())
    }
}

/// A registry client that records published metadata.
#[derive(Debug, Default)]
pub struct MockRegistry {
    pub published: Vec<PackageMetadata>,
}

impl RegistryClient for MockRegistry {
    fn publish(&mut self, metadata: &PackageMetadata) -> Result<()> {
        self.published.push(metadata.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_dir_has_version() {
        let dir = recipe_dir("3.2.1");
        let contents = std::fs::read_to_string(dir.path().join(VERSION_FILE)).unwrap();
        assert_eq!(contents.trim(), "3.2.1");
    }

    #[test]
    #[should_panic(expected = "not a known compiler")]
    fn test_toolchain_rejects_unknown() {
        toolchain("tcc", "0.9");
    }
}
