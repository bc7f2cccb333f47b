//! Recipe identity.
//!
//! The descriptor quay resolves is the `octo-logger-cpp` recipe. Its name,
//! origin and declared settings are fixed; its version depends on the
//! revision (see [`VersionSource`]).

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Canonical package name.
pub const PACKAGE_NAME: &str = "octo-logger-cpp";

/// Upstream repository.
pub const PACKAGE_URL: &str = "https://github.com/ofiriluz/octo-logger-cpp";

/// Recipe author.
pub const PACKAGE_AUTHOR: &str = "Ofir Iluz";

/// Settings the recipe declares it depends on.
pub const SETTINGS: &[&str] = &["os", "compiler", "build_type", "arch"];

/// Name of the version file read by revisions with a file version source.
pub const VERSION_FILE: &str = "VERSION";

/// Where a revision takes its package version from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// A version written into the recipe itself
    Literal(&'static str),
    /// The first line of a file in the recipe folder
    File(&'static str),
}

impl VersionSource {
    /// Determine the version, reading from `recipe_dir` if needed.
    pub fn load(&self, recipe_dir: &Path) -> Result<String> {
        match self {
            VersionSource::Literal(version) => Ok((*version).to_string()),
            VersionSource::File(name) => read_version_file(&recipe_dir.join(name)),
        }
    }
}

fn read_version_file(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read version file: {}", path.display()))?;

    let version = contents.lines().next().unwrap_or_default().trim();
    if version.is_empty() {
        bail!(
            "version file is empty: {}\n\
             help: write the package version on the first line",
            path.display()
        );
    }

    Ok(version.to_string())
}

/// Name, version and origin of the package being described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIdentity {
    pub name: String,
    pub version: String,
    pub url: String,
    pub author: String,
    /// Profile settings the package binary depends on
    pub settings: Vec<String>,
}

impl RecipeIdentity {
    /// Identity of the recipe at the given version.
    pub fn new(version: impl Into<String>) -> Self {
        RecipeIdentity {
            name: PACKAGE_NAME.to_string(),
            version: version.into(),
            url: PACKAGE_URL.to_string(),
            author: PACKAGE_AUTHOR.to_string(),
            settings: SETTINGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The `name/version` reference of the package.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identity_declares_settings() {
        let identity = RecipeIdentity::new("1.0.0");
        assert_eq!(identity.reference(), "octo-logger-cpp/1.0.0");
        assert_eq!(identity.settings, ["os", "compiler", "build_type", "arch"]);
    }

    #[test]
    fn test_literal_source() {
        let tmp = TempDir::new().unwrap();
        let version = VersionSource::Literal("1.0.0").load(tmp.path()).unwrap();
        assert_eq!(version, "1.0.0");
    }

    #[test]
    fn test_file_source_trims_first_line() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(VERSION_FILE), "  2.3.1 \nignored\n").unwrap();

        let version = VersionSource::File(VERSION_FILE).load(tmp.path()).unwrap();
        assert_eq!(version, "2.3.1");
    }

    #[test]
    fn test_file_source_missing() {
        let tmp = TempDir::new().unwrap();
        let err = VersionSource::File(VERSION_FILE)
            .load(tmp.path())
            .unwrap_err();
        assert!(err.to_string().contains("failed to read version file"));
    }

    #[test]
    fn test_file_source_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(VERSION_FILE), "\n").unwrap();

        let err = VersionSource::File(VERSION_FILE)
            .load(tmp.path())
            .unwrap_err();
        assert!(err.to_string().contains("version file is empty"));
    }

    #[test]
    fn test_identity_reference() {
        assert_eq!(RecipeIdentity::new("1.1.0").reference(), "octo-logger-cpp/1.1.0");
    }
}
