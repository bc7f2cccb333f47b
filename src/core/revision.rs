//! Recipe schema revisions.
//!
//! The descriptor has gone through three revisions. Rather than keeping
//! three copies of the rules, each [`Revision`] maps to a [`RevisionSchema`]
//! holding everything that differs between them: declared flags,
//! implication rules, the minimum compiler table, requirements and
//! metadata contributions.
//!
//! | revision | flags                                  | version from   |
//! |----------|----------------------------------------|----------------|
//! | v1       | none                                   | literal 1.0.0  |
//! | v2       | `with_aws`                             | literal 1.1.0  |
//! | v3       | `with_aws`, `with_json_formatting`     | `VERSION` file |

use std::collections::HashSet;
use std::fmt;

use anyhow::{bail, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::dependency::{Condition, DependencySpec, OverrideSpec};
use crate::core::feature::{FeatureDecl, FeatureSet, Implication};
use crate::core::recipe::{VersionSource, VERSION_FILE};
use crate::core::toolchain::{parse_version_lenient, CompilerFamily};

/// Flag enabling the CloudWatch sink.
pub const WITH_AWS: &str = "with_aws";

/// Flag enabling the JSON console sink.
pub const WITH_JSON_FORMATTING: &str = "with_json_formatting";

/// Define exported when AWS integration is compiled in.
pub const AWS_DEFINE: &str = "OCTO_LOGGER_WITH_AWS";

/// Define exported when JSON formatting is compiled in.
pub const JSON_DEFINE: &str = "OCTO_LOGGER_WITH_JSON_FORMATTING";

/// A recipe schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Fixed requirements, no options
    V1,
    /// Adds AWS integration
    V2,
    /// Adds JSON formatting, implied by AWS integration
    #[default]
    V3,
}

impl Revision {
    /// Every revision, oldest first.
    pub const ALL: [Revision; 3] = [Revision::V1, Revision::V2, Revision::V3];

    /// The authoritative revision.
    pub const LATEST: Revision = Revision::V3;

    pub fn as_str(&self) -> &'static str {
        match self {
            Revision::V1 => "v1",
            Revision::V2 => "v2",
            Revision::V3 => "v3",
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Revision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" => Ok(Revision::V1),
            "v2" | "2" => Ok(Revision::V2),
            "v3" | "3" | "latest" => Ok(Revision::V3),
            other => Err(format!(
                "invalid revision '{}'; expected 'v1', 'v2', 'v3' or 'latest'",
                other
            )),
        }
    }
}

/// Minimum accepted compiler version per family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimumVersionTable {
    entries: Vec<(CompilerFamily, Version)>,
}

impl MinimumVersionTable {
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let entries = pairs
            .iter()
            .filter_map(|(family, version)| {
                Some((CompilerFamily::from_name(family), parse_version_lenient(version)?))
            })
            .collect();
        MinimumVersionTable { entries }
    }

    /// The minimum version for a family, or `None` if the family is not listed.
    pub fn minimum_for(&self, family: &CompilerFamily) -> Option<&Version> {
        self.entries
            .iter()
            .find(|(f, _)| f == family)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompilerFamily, &Version)> {
        self.entries.iter().map(|(f, v)| (f, v))
    }
}

/// A metadata entry guarded by a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conditional {
    pub value: &'static str,
    pub condition: Condition,
}

impl Conditional {
    const fn always(value: &'static str) -> Self {
        Conditional {
            value,
            condition: Condition::Always,
        }
    }

    const fn when(feature: &'static str, value: &'static str) -> Self {
        Conditional {
            value,
            condition: Condition::Feature(feature),
        }
    }
}

/// A build-system cache variable mirroring a feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheVariable {
    pub name: &'static str,
    pub feature: &'static str,
}

/// Everything that varies between recipe revisions.
#[derive(Debug, Clone)]
pub struct RevisionSchema {
    pub revision: Revision,
    pub version_source: VersionSource,
    pub features: &'static [FeatureDecl],
    pub implications: &'static [Implication],
    pub minimum_versions: MinimumVersionTable,
    pub requirements: &'static [DependencySpec],
    pub option_overrides: &'static [OverrideSpec],
    /// Linked components of the library component
    pub component_requires: &'static [Conditional],
    /// Defines exported at package and component scope
    pub defines: &'static [Conditional],
    pub cache_variables: &'static [CacheVariable],
}

const MINIMUM_VERSIONS: &[(&str, &str)] = &[
    ("gcc", "8"),
    ("clang", "9"),
    ("apple-clang", "11"),
    ("Visual Studio", "16"),
];

const BASE_REQUIREMENTS: [DependencySpec; 3] = [
    DependencySpec::always("catch2", "3.1.0"),
    DependencySpec::always("fmt", "9.0.0"),
    DependencySpec::always("trompeloeil", "42"),
];

const AWS_SDK: &str = "aws-sdk-cpp";

const AWS_DECL: FeatureDecl = FeatureDecl {
    name: WITH_AWS,
    default: false,
    description: "CloudWatch sink through the AWS SDK",
};

const JSON_DECL: FeatureDecl = FeatureDecl {
    name: WITH_JSON_FORMATTING,
    default: false,
    description: "JSON console sink",
};

const AWS_LOGS_OVERRIDE: OverrideSpec = OverrideSpec {
    package: AWS_SDK,
    option: "logs",
    value: true,
    condition: Condition::Feature(WITH_AWS),
};

mod v1 {
    use super::*;

    pub(super) const REQUIREMENTS: &[DependencySpec] = &BASE_REQUIREMENTS;
    pub(super) const COMPONENT_REQUIRES: &[Conditional] = &[Conditional::always("fmt::fmt")];
}

mod v2 {
    use super::*;

    pub(super) const FEATURES: &[FeatureDecl] = &[AWS_DECL];
    pub(super) const REQUIREMENTS: &[DependencySpec] = &[
        BASE_REQUIREMENTS[0],
        BASE_REQUIREMENTS[1],
        BASE_REQUIREMENTS[2],
        DependencySpec::when(WITH_AWS, AWS_SDK, "1.9.234"),
    ];
    pub(super) const OVERRIDES: &[OverrideSpec] = &[AWS_LOGS_OVERRIDE];
    pub(super) const COMPONENT_REQUIRES: &[Conditional] = &[
        Conditional::always("fmt::fmt"),
        Conditional::when(WITH_AWS, "aws-sdk-cpp::monitoring"),
    ];
    pub(super) const DEFINES: &[Conditional] = &[Conditional::when(WITH_AWS, AWS_DEFINE)];
    pub(super) const CACHE_VARIABLES: &[CacheVariable] = &[CacheVariable {
        name: "WITH_AWS",
        feature: WITH_AWS,
    }];
}

mod v3 {
    use super::*;

    pub(super) const FEATURES: &[FeatureDecl] = &[AWS_DECL, JSON_DECL];
    pub(super) const IMPLICATIONS: &[Implication] = &[Implication {
        when: WITH_AWS,
        forces: WITH_JSON_FORMATTING,
    }];
    pub(super) const REQUIREMENTS: &[DependencySpec] = &[
        BASE_REQUIREMENTS[0],
        BASE_REQUIREMENTS[1],
        BASE_REQUIREMENTS[2],
        DependencySpec::when(WITH_JSON_FORMATTING, "nlohmann_json", "3.11.2"),
        DependencySpec::when(WITH_AWS, AWS_SDK, "1.9.234"),
    ];
    pub(super) const OVERRIDES: &[OverrideSpec] = &[AWS_LOGS_OVERRIDE];
    pub(super) const COMPONENT_REQUIRES: &[Conditional] = &[
        Conditional::always("fmt::fmt"),
        Conditional::when(WITH_JSON_FORMATTING, "nlohmann_json::nlohmann_json"),
        Conditional::when(WITH_AWS, "aws-sdk-cpp::monitoring"),
    ];
    pub(super) const DEFINES: &[Conditional] = &[
        Conditional::when(WITH_JSON_FORMATTING, JSON_DEFINE),
        Conditional::when(WITH_AWS, AWS_DEFINE),
    ];
    pub(super) const CACHE_VARIABLES: &[CacheVariable] = &[
        CacheVariable {
            name: "WITH_AWS",
            feature: WITH_AWS,
        },
        CacheVariable {
            name: "WITH_JSON_FORMATTING",
            feature: WITH_JSON_FORMATTING,
        },
    ];
}

impl RevisionSchema {
    /// Select the schema for a revision.
    pub fn for_revision(revision: Revision) -> Self {
        let minimum_versions = MinimumVersionTable::from_pairs(MINIMUM_VERSIONS);

        match revision {
            Revision::V1 => RevisionSchema {
                revision,
                version_source: VersionSource::Literal("1.0.0"),
                features: &[],
                implications: &[],
                minimum_versions,
                requirements: v1::REQUIREMENTS,
                option_overrides: &[],
                component_requires: v1::COMPONENT_REQUIRES,
                defines: &[],
                cache_variables: &[],
            },
            Revision::V2 => RevisionSchema {
                revision,
                version_source: VersionSource::Literal("1.1.0"),
                features: v2::FEATURES,
                implications: &[],
                minimum_versions,
                requirements: v2::REQUIREMENTS,
                option_overrides: v2::OVERRIDES,
                component_requires: v2::COMPONENT_REQUIRES,
                defines: v2::DEFINES,
                cache_variables: v2::CACHE_VARIABLES,
            },
            Revision::V3 => RevisionSchema {
                revision,
                version_source: VersionSource::File(VERSION_FILE),
                features: v3::FEATURES,
                implications: v3::IMPLICATIONS,
                minimum_versions,
                requirements: v3::REQUIREMENTS,
                option_overrides: v3::OVERRIDES,
                component_requires: v3::COMPONENT_REQUIRES,
                defines: v3::DEFINES,
                cache_variables: v3::CACHE_VARIABLES,
            },
        }
    }

    /// A fresh flag set holding this revision's defaults.
    pub fn default_features(&self) -> FeatureSet {
        FeatureSet::from_decls(self.revision.as_str(), self.features)
    }

    /// Look up a declared flag.
    pub fn feature(&self, name: &str) -> Option<&FeatureDecl> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Check the schema's internal consistency.
    ///
    /// Flag names must be unique, requirements must not repeat a package,
    /// and every rule must only mention declared flags.
    pub fn check(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for decl in self.features {
            if !seen.insert(decl.name) {
                bail!("revision {} declares `{}` twice", self.revision, decl.name);
            }
        }

        let mut packages = HashSet::new();
        for dep in self.requirements {
            if !packages.insert(dep.name) {
                bail!("revision {} requires `{}` twice", self.revision, dep.name);
            }
        }

        let conditions = self
            .requirements
            .iter()
            .map(|d| d.condition)
            .chain(self.option_overrides.iter().map(|o| o.condition))
            .chain(self.component_requires.iter().map(|c| c.condition))
            .chain(self.defines.iter().map(|c| c.condition));
        for condition in conditions {
            if let Condition::Feature(name) = condition {
                if self.feature(name).is_none() {
                    bail!(
                        "revision {} has a rule on undeclared option `{}`",
                        self.revision,
                        name
                    );
                }
            }
        }

        for rule in self.implications {
            if self.feature(rule.when).is_none() || self.feature(rule.forces).is_none() {
                bail!(
                    "revision {} has an implication on undeclared options: {}",
                    self.revision,
                    rule
                );
            }
        }

        for var in self.cache_variables {
            if self.feature(var.feature).is_none() {
                bail!(
                    "revision {} maps `{}` to undeclared option `{}`",
                    self.revision,
                    var.name,
                    var.feature
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_revision_is_consistent() {
        for revision in Revision::ALL {
            RevisionSchema::for_revision(revision)
                .check()
                .unwrap_or_else(|e| panic!("{}", e));
        }
    }

    #[test]
    fn test_v1_declares_no_flags() {
        let schema = RevisionSchema::for_revision(Revision::V1);
        assert!(schema.features.is_empty());
        assert!(schema.implications.is_empty());
        assert!(schema
            .requirements
            .iter()
            .all(|d| d.condition == Condition::Always));
    }

    #[test]
    fn test_v2_flags() {
        let schema = RevisionSchema::for_revision(Revision::V2);
        let names: Vec<_> = schema.features.iter().map(|f| f.name).collect();
        assert_eq!(names, vec![WITH_AWS]);
        assert!(schema.implications.is_empty());
    }

    #[test]
    fn test_v3_flags_default_disabled() {
        let schema = RevisionSchema::for_revision(Revision::V3);
        let names: Vec<_> = schema.features.iter().map(|f| f.name).collect();
        assert_eq!(names, vec![WITH_AWS, WITH_JSON_FORMATTING]);
        assert!(schema.features.iter().all(|f| !f.default));
        assert_eq!(schema.implications.len(), 1);
        assert_eq!(schema.version_source, VersionSource::File("VERSION"));
    }

    #[test]
    fn test_minimum_table_same_in_all_revisions() {
        for revision in Revision::ALL {
            let table = RevisionSchema::for_revision(revision).minimum_versions;
            assert_eq!(
                table.minimum_for(&CompilerFamily::Gcc),
                Some(&Version::new(8, 0, 0))
            );
            assert_eq!(
                table.minimum_for(&CompilerFamily::Clang),
                Some(&Version::new(9, 0, 0))
            );
            assert_eq!(
                table.minimum_for(&CompilerFamily::AppleClang),
                Some(&Version::new(11, 0, 0))
            );
            assert_eq!(
                table.minimum_for(&CompilerFamily::Msvc),
                Some(&Version::new(16, 0, 0))
            );
            assert_eq!(
                table.minimum_for(&CompilerFamily::Unknown("icc".to_string())),
                None
            );
        }
    }

    #[test]
    fn test_revision_parse() {
        assert_eq!("v2".parse::<Revision>().unwrap(), Revision::V2);
        assert_eq!("latest".parse::<Revision>().unwrap(), Revision::LATEST);
        assert_eq!("V1".parse::<Revision>().unwrap(), Revision::V1);
        assert!("v4".parse::<Revision>().is_err());
    }
}
