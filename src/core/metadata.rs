//! Installed-package discovery metadata.
//!
//! This is what the package registry client publishes so consumers can find
//! the built library: the package and component names, the aliases each
//! downstream build tool looks up, exported defines, and the components the
//! library links against.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A downstream build-tool naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    /// CMake `Find<pkg>.cmake` modules
    CmakeFindPackage,
    /// CMake `<pkg>-config.cmake` per-configuration files
    CmakeFindPackageMulti,
    /// pkg-config `.pc` files
    PkgConfig,
}

impl Generator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Generator::CmakeFindPackage => "cmake_find_package",
            Generator::CmakeFindPackageMulti => "cmake_find_package_multi",
            Generator::PkgConfig => "pkg_config",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property keys read by the newer, property-based generators.
pub mod property {
    pub const CMAKE_FILE_NAME: &str = "cmake_file_name";
    pub const CMAKE_TARGET_NAME: &str = "cmake_target_name";
    pub const PKG_CONFIG_NAME: &str = "pkg_config_name";
}

/// A library component of an installed package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Component name (e.g. `libocto-logger-cpp`)
    pub name: String,
    /// Library artifacts to link
    pub libs: Vec<String>,
    /// Linked components of other packages (`pkg::component`), in link order
    pub requires: Vec<String>,
    /// Preprocessor defines consumers must see
    pub defines: Vec<String>,
    /// Per-generator names
    pub names: BTreeMap<Generator, String>,
    /// Generator properties
    pub properties: BTreeMap<String, String>,
}

/// Discovery metadata for an installed package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Canonical package name
    pub name: String,
    /// Package-scope preprocessor defines
    pub defines: Vec<String>,
    /// Per-generator package names
    pub names: BTreeMap<Generator, String>,
    /// Per-generator file names
    pub filenames: BTreeMap<Generator, String>,
    /// Generator properties
    pub properties: BTreeMap<String, String>,
    /// Library components
    pub components: Vec<Component>,
}

impl PackageMetadata {
    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Every distinct name this package can be discovered under.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = std::iter::once(self.name.as_str())
            .chain(self.names.values().map(String::as_str))
            .chain(self.filenames.values().map(String::as_str))
            .chain(self.properties.values().map(String::as_str))
            .chain(self.components.iter().flat_map(|c| {
                c.names
                    .values()
                    .chain(c.properties.values())
                    .map(String::as_str)
            }))
            .collect();
        aliases.sort_unstable();
        aliases.dedup();
        aliases
    }
}
