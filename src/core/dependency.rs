//! Recipe requirements.
//!
//! A [`DependencySpec`] is a pinned package reference guarded by a
//! [`Condition`] over the normalized feature set. Resolution keeps the specs
//! whose condition holds, in declaration order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::feature::NormalizedFeatures;

/// A pinned package reference, written `name/version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    pub name: String,
    /// The version pin exactly as declared (`3.1.0`, `42`).
    pub version: String,
}

impl PackageRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        PackageRef {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl std::str::FromStr for PackageRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(PackageRef::new(name, version))
            }
            _ => Err(format!("invalid package reference '{}', expected name/version", s)),
        }
    }
}

/// When a requirement (or metadata entry) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Unconditional
    Always,
    /// Only when the named feature flag is enabled
    Feature(&'static str),
}

impl Condition {
    /// Evaluate the condition against a normalized feature set.
    pub fn holds(&self, features: &NormalizedFeatures) -> bool {
        match self {
            Condition::Always => true,
            Condition::Feature(name) => features.is_enabled(name),
        }
    }
}

/// A declared requirement of a recipe revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: &'static str,
    pub version: &'static str,
    pub condition: Condition,
}

impl DependencySpec {
    pub const fn always(name: &'static str, version: &'static str) -> Self {
        DependencySpec {
            name,
            version,
            condition: Condition::Always,
        }
    }

    pub const fn when(feature: &'static str, name: &'static str, version: &'static str) -> Self {
        DependencySpec {
            name,
            version,
            condition: Condition::Feature(feature),
        }
    }

    /// The pinned reference this spec contributes.
    pub fn package_ref(&self) -> PackageRef {
        PackageRef::new(self.name, self.version)
    }
}

/// An option the build driver must set on a dependency.
///
/// Recipes sometimes need a dependency built a particular way (for example
/// `aws-sdk-cpp` with its logs client). Rather than mutating the
/// dependency's options in place, the resolver reports the override and the
/// driver applies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionOverride {
    pub package: String,
    pub option: String,
    pub value: bool,
}

impl fmt::Display for OptionOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value { "True" } else { "False" };
        write!(f, "{}:{}={}", self.package, self.option, value)
    }
}

/// A declared dependency option override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideSpec {
    pub package: &'static str,
    pub option: &'static str,
    pub value: bool,
    pub condition: Condition,
}

impl OverrideSpec {
    pub fn to_override(&self) -> OptionOverride {
        OptionOverride {
            package: self.package.to_string(),
            option: self.option.to_string(),
            value: self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_ref_roundtrip_display() {
        let r: PackageRef = "trompeloeil/42".parse().unwrap();
        assert_eq!(r.name, "trompeloeil");
        assert_eq!(r.version, "42");
        assert_eq!(r.to_string(), "trompeloeil/42");
    }

    #[test]
    fn test_package_ref_invalid() {
        assert!("fmt".parse::<PackageRef>().is_err());
        assert!("/9.0.0".parse::<PackageRef>().is_err());
        assert!("fmt/".parse::<PackageRef>().is_err());
    }

    #[test]
    fn test_override_display() {
        let o = OptionOverride {
            package: "aws-sdk-cpp".to_string(),
            option: "logs".to_string(),
            value: true,
        };
        assert_eq!(o.to_string(), "aws-sdk-cpp:logs=True");
    }
}
