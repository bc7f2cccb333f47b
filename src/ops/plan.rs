//! Build-driver plans.
//!
//! A [`DriverPlan`] is everything the external build driver needs once a
//! pass has resolved: what to fetch, which options to force on
//! dependencies, which cache variables to configure with, and which steps
//! to run.

use std::fmt;

use serde::Serialize;

use crate::core::dependency::{OptionOverride, PackageRef};
use crate::core::revision::RevisionSchema;
use crate::core::standard::CppStandard;
use crate::resolver::ResolvedConfiguration;
use crate::util::hash::Fingerprint;

/// A step of the build driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStep {
    Configure,
    Build,
    Test,
    Install,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildStep::Configure => "configure",
            BuildStep::Build => "build",
            BuildStep::Test => "test",
            BuildStep::Install => "install",
        };
        f.write_str(s)
    }
}

/// Input handed to the build driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverPlan {
    /// `name/version` of the package being built
    pub package: String,
    pub requirements: Vec<PackageRef>,
    pub option_overrides: Vec<OptionOverride>,
    pub defines: Vec<String>,
    pub cppstd: Option<CppStandard>,
    /// CMake cache variables, in declaration order
    pub cache_variables: Vec<(String, String)>,
    pub steps: Vec<BuildStep>,
}

impl DriverPlan {
    /// Derive the plan for a resolved configuration.
    ///
    /// Tests are not run when targeting Windows.
    pub fn new(schema: &RevisionSchema, resolved: &ResolvedConfiguration, os: Option<&str>) -> Self {
        let cache_variables = schema
            .cache_variables
            .iter()
            .map(|var| {
                let value = if resolved.features.is_enabled(var.feature) {
                    "ON"
                } else {
                    "OFF"
                };
                (var.name.to_string(), value.to_string())
            })
            .collect();

        let mut steps = vec![BuildStep::Configure, BuildStep::Build];
        if os != Some("Windows") {
            steps.push(BuildStep::Test);
        }
        steps.push(BuildStep::Install);

        DriverPlan {
            package: resolved.package.reference(),
            requirements: resolved.requirements.clone(),
            option_overrides: resolved.option_overrides.clone(),
            defines: resolved.defines.clone(),
            cppstd: resolved.cppstd,
            cache_variables,
            steps,
        }
    }

    pub fn runs_tests(&self) -> bool {
        self.steps.contains(&BuildStep::Test)
    }

    /// Short key identifying the build this plan produces.
    ///
    /// The step list is left out except for whether tests run, so a
    /// driver can reuse a build tree across otherwise identical plans.
    pub fn cache_key(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.package);
        fp.update_strs(self.requirements.iter().map(|r| r.name.as_str()));
        fp.update_strs(self.requirements.iter().map(|r| r.version.as_str()));
        for o in &self.option_overrides {
            fp.update_str(&o.package).update_str(&o.option).update_bool(o.value);
        }
        fp.update_strs(self.defines.iter().map(String::as_str));
        if let Some(std) = self.cppstd {
            fp.update_str(std.as_str());
        }
        for (name, value) in &self.cache_variables {
            fp.update_str(name).update_str(value);
        }
        fp.update_bool(self.runs_tests());
        fp.finish_short()
    }
}
