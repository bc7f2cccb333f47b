//! Dependency and metadata resolution.
//!
//! Resolution is a pure function of the revision schema, the recipe
//! identity and a normalized feature set: no I/O, and nothing depends on
//! the order in which flags were overridden.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::dependency::{OptionOverride, PackageRef};
use crate::core::feature::NormalizedFeatures;
use crate::core::metadata::{property, Component, Generator, PackageMetadata};
use crate::core::recipe::RecipeIdentity;
use crate::core::revision::{Conditional, Revision, RevisionSchema};
use crate::core::standard::CppStandard;
use crate::util::hash::sha256_bytes;

/// Namespace of the exported CMake target.
const CMAKE_NAMESPACE: &str = "octo";

/// The complete output of a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfiguration {
    pub revision: Revision,
    pub package: RecipeIdentity,
    /// Feature flags after implication closure
    pub features: NormalizedFeatures,
    /// Required packages, in declaration order
    pub requirements: Vec<PackageRef>,
    /// Options the build driver must set on dependencies
    pub option_overrides: Vec<OptionOverride>,
    /// Exported preprocessor defines
    pub defines: Vec<String>,
    /// The language standard the profile requested
    pub cppstd: Option<CppStandard>,
    /// Discovery metadata for the registry client
    pub metadata: PackageMetadata,
}

impl ResolvedConfiguration {
    /// Stable hash of the whole configuration.
    ///
    /// Two passes over the same inputs produce the same fingerprint.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(sha256_bytes(&bytes))
    }
}

/// Resolve requirements, overrides, defines and metadata.
pub fn resolve(
    schema: &RevisionSchema,
    identity: &RecipeIdentity,
    features: &NormalizedFeatures,
    cppstd: Option<CppStandard>,
) -> ResolvedConfiguration {
    let mut requirements: Vec<PackageRef> = Vec::new();
    for spec in schema.requirements {
        if !spec.condition.holds(features) {
            continue;
        }
        let package = spec.package_ref();
        if requirements.iter().any(|r| r.name == package.name) {
            tracing::debug!("skipping duplicate requirement {}", package);
            continue;
        }
        requirements.push(package);
    }

    let option_overrides: Vec<OptionOverride> = schema
        .option_overrides
        .iter()
        .filter(|o| o.condition.holds(features))
        .map(|o| o.to_override())
        .collect();

    let defines = select(schema.defines, features);
    let metadata = build_metadata(schema, identity, features, &defines);

    tracing::debug!(
        "resolved {} requirements and {} defines",
        requirements.len(),
        defines.len()
    );

    ResolvedConfiguration {
        revision: schema.revision,
        package: identity.clone(),
        features: features.clone(),
        requirements,
        option_overrides,
        defines,
        cppstd,
        metadata,
    }
}

fn select(entries: &[Conditional], features: &NormalizedFeatures) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.condition.holds(features))
        .map(|e| e.value.to_string())
        .collect()
}

fn build_metadata(
    schema: &RevisionSchema,
    identity: &RecipeIdentity,
    features: &NormalizedFeatures,
    defines: &[String],
) -> PackageMetadata {
    let name = identity.name.clone();
    let target = format!("{}::{}", CMAKE_NAMESPACE, name);

    let cmake_generators = [Generator::CmakeFindPackage, Generator::CmakeFindPackageMulti];

    let mut names: BTreeMap<Generator, String> = cmake_generators
        .iter()
        .map(|g| (*g, name.clone()))
        .collect();
    names.insert(Generator::PkgConfig, name.clone());

    let filenames = cmake_generators
        .iter()
        .map(|g| (*g, name.clone()))
        .collect();

    let mut properties = BTreeMap::new();
    properties.insert(property::CMAKE_FILE_NAME.to_string(), name.clone());
    properties.insert(property::CMAKE_TARGET_NAME.to_string(), target.clone());
    properties.insert(property::PKG_CONFIG_NAME.to_string(), name.clone());

    let mut component_properties = BTreeMap::new();
    component_properties.insert(property::CMAKE_TARGET_NAME.to_string(), target);
    component_properties.insert(property::PKG_CONFIG_NAME.to_string(), name.clone());

    let component = Component {
        name: format!("lib{}", name),
        libs: vec![name.clone()],
        requires: select(schema.component_requires, features),
        defines: defines.to_vec(),
        names: cmake_generators
            .iter()
            .map(|g| (*g, name.clone()))
            .collect(),
        properties: component_properties,
    };

    PackageMetadata {
        name,
        defines: defines.to_vec(),
        names,
        filenames,
        properties,
        components: vec![component],
    }
}
