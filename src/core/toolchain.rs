//! Toolchain descriptors.
//!
//! A [`ToolchainDescriptor`] is the compiler configuration a recipe is being
//! evaluated against. It is built once per resolution pass, usually from
//! profile settings (see [`crate::core::settings`]), and never mutated.

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

/// The compiler family of a toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerFamily {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
    /// Microsoft Visual C++ (`Visual Studio` or `msvc` in profiles)
    Msvc,
    /// Any compiler the recipe has no knowledge of.
    Unknown(String),
}

impl CompilerFamily {
    /// Parse a profile compiler name.
    ///
    /// Never fails: names that are not recognized become
    /// [`CompilerFamily::Unknown`] so the validator can decide what to do.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "gcc" => CompilerFamily::Gcc,
            "clang" => CompilerFamily::Clang,
            "apple-clang" => CompilerFamily::AppleClang,
            "Visual Studio" | "msvc" => CompilerFamily::Msvc,
            other => CompilerFamily::Unknown(other.to_string()),
        }
    }

    /// Get the family name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            CompilerFamily::Gcc => "gcc",
            CompilerFamily::Clang => "clang",
            CompilerFamily::AppleClang => "apple-clang",
            CompilerFamily::Msvc => "Visual Studio",
            CompilerFamily::Unknown(name) => name,
        }
    }

    /// Whether the family is one of the recognized compilers.
    pub fn is_known(&self) -> bool {
        !matches!(self, CompilerFamily::Unknown(_))
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime library linkage mode (MSVC `/MT`, `/MTd`, `/MD`, `/MDd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeLinkage {
    /// `/MTd`
    StaticDebug,
    /// `/MT`
    StaticRelease,
    /// `/MDd`
    DynamicDebug,
    /// `/MD`
    DynamicRelease,
}

impl RuntimeLinkage {
    /// The MSVC flag spelling of this runtime.
    pub fn as_flag(&self) -> &'static str {
        match self {
            RuntimeLinkage::StaticDebug => "MTd",
            RuntimeLinkage::StaticRelease => "MT",
            RuntimeLinkage::DynamicDebug => "MDd",
            RuntimeLinkage::DynamicRelease => "MD",
        }
    }

    /// Whether the runtime is linked statically.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            RuntimeLinkage::StaticDebug | RuntimeLinkage::StaticRelease
        )
    }
}

impl std::str::FromStr for RuntimeLinkage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MTd" | "static-debug" => Ok(RuntimeLinkage::StaticDebug),
            "MT" | "static-release" => Ok(RuntimeLinkage::StaticRelease),
            "MDd" | "dynamic-debug" => Ok(RuntimeLinkage::DynamicDebug),
            "MD" | "dynamic-release" => Ok(RuntimeLinkage::DynamicRelease),
            other => Err(format!(
                "invalid runtime '{}'; expected MT, MTd, MD or MDd",
                other
            )),
        }
    }
}

impl fmt::Display for RuntimeLinkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// The compiler configuration a recipe is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainDescriptor {
    /// Compiler family
    pub family: CompilerFamily,
    /// Compiler version
    pub version: Version,
    /// Standard library variant (`libstdc++`, `libstdc++11`, `libc++`)
    pub stdlib: Option<String>,
    /// Runtime linkage (MSVC only)
    pub runtime: Option<RuntimeLinkage>,
}

impl ToolchainDescriptor {
    /// Create a descriptor with no standard library or runtime set.
    pub fn new(family: CompilerFamily, version: Version) -> Self {
        ToolchainDescriptor {
            family,
            version,
            stdlib: None,
            runtime: None,
        }
    }

    /// Set the standard library variant.
    pub fn with_stdlib(mut self, stdlib: impl Into<String>) -> Self {
        self.stdlib = Some(stdlib.into());
        self
    }

    /// Set the runtime linkage.
    pub fn with_runtime(mut self, runtime: RuntimeLinkage) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

impl fmt::Display for ToolchainDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.version)?;
        if let Some(ref stdlib) = self.stdlib {
            write!(f, " ({})", stdlib)?;
        }
        if let Some(runtime) = self.runtime {
            write!(f, " [{}]", runtime)?;
        }
        Ok(())
    }
}

/// Parse a version string, allowing for incomplete versions.
///
/// Compiler versions are usually written as `9`, `11.1` or `16`; they are
/// padded with zeros to a full semver version.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = s.trim();
    if let Ok(v) = s.parse() {
        return Some(v);
    }

    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        1 => {
            let major: u64 = parts[0].parse().ok()?;
            Some(Version::new(major, 0, 0))
        }
        2 => {
            let major: u64 = parts[0].parse().ok()?;
            let minor: u64 = parts[1].parse().ok()?;
            Some(Version::new(major, minor, 0))
        }
        _ => None,
    }
}

/// Map an `msvc` compiler version onto the Visual Studio major version.
///
/// `msvc` profiles count toolset versions (`191`, `192`, `193`) while the
/// minimum version table is written against Visual Studio releases.
pub fn visual_studio_version(msvc: &Version) -> Option<Version> {
    let major = match msvc.major {
        190 => 14,
        191 => 15,
        192 => 16,
        193 | 194 => 17,
        _ => return None,
    };
    Some(Version::new(major, 0, 0))
}
