//! Handing resolved output to the outside world.
//!
//! quay never compiles or installs anything itself. A [`BuildDriver`]
//! receives the [`DriverPlan`] and a [`RegistryClient`] receives the
//! package metadata, and both are only called once a pass has resolved.

use std::io::Write;

use anyhow::{Context, Result};

use crate::core::metadata::PackageMetadata;
use crate::ops::plan::DriverPlan;

/// Configures, builds, tests and installs a resolved package.
pub trait BuildDriver {
    fn execute(&mut self, plan: &DriverPlan) -> Result<()>;
}

/// Makes an installed package discoverable to consumers.
pub trait RegistryClient {
    fn publish(&mut self, metadata: &PackageMetadata) -> Result<()>;
}

/// A driver that only describes what it would do.
pub struct PlanWriter<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> PlanWriter<W> {
    pub fn new(out: W, json: bool) -> Self {
        PlanWriter { out, json }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BuildDriver for PlanWriter<W> {
    fn execute(&mut self, plan: &DriverPlan) -> Result<()> {
        if self.json {
            serde_json::to_writer_pretty(&mut self.out, plan)
                .context("failed to serialize build plan")?;
            writeln!(self.out)?;
            return Ok(());
        }

        writeln!(self.out, "# Build plan for `{}`", plan.package)?;
        writeln!(self.out)?;

        writeln!(self.out, "requires:")?;
        for req in &plan.requirements {
            writeln!(self.out, "  {}", req)?;
        }

        if !plan.option_overrides.is_empty() {
            writeln!(self.out, "dependency options:")?;
            for o in &plan.option_overrides {
                writeln!(self.out, "  {}", o)?;
            }
        }

        if !plan.cache_variables.is_empty() {
            writeln!(self.out, "cache variables:")?;
            for (name, value) in &plan.cache_variables {
                writeln!(self.out, "  -D{}={}", name, value)?;
            }
        }

        if !plan.defines.is_empty() {
            writeln!(self.out, "defines:")?;
            for define in &plan.defines {
                writeln!(self.out, "  {}", define)?;
            }
        }

        if let Some(std) = plan.cppstd {
            writeln!(self.out, "standard: {}", std)?;
        }

        let steps: Vec<String> = plan.steps.iter().map(|s| s.to_string()).collect();
        writeln!(self.out, "steps: {}", steps.join(" -> "))?;
        writeln!(self.out, "cache key: {}", plan.cache_key())?;

        Ok(())
    }
}

/// A registry client that writes the metadata as JSON.
pub struct MetadataWriter<W: Write> {
    out: W,
}

impl<W: Write> MetadataWriter<W> {
    pub fn new(out: W) -> Self {
        MetadataWriter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RegistryClient for MetadataWriter<W> {
    fn publish(&mut self, metadata: &PackageMetadata) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, metadata)
            .context("failed to serialize package metadata")?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::RecipeIdentity;
    use crate::core::revision::{Revision, RevisionSchema, WITH_AWS};
    use crate::resolver::resolve;

    fn resolved_plan() -> (DriverPlan, PackageMetadata) {
        let schema = RevisionSchema::for_revision(Revision::V3);
        let mut features = schema.default_features();
        features.set(WITH_AWS, true).unwrap();
        let features = features.normalize(schema.implications);
        let resolved = resolve(&schema, &RecipeIdentity::new("1.0.0"), &features, None);
        (
            DriverPlan::new(&schema, &resolved, Some("Linux")),
            resolved.metadata,
        )
    }

    #[test]
    fn test_plan_writer_human() {
        let (plan, _) = resolved_plan();
        let mut writer = PlanWriter::new(Vec::new(), false);
        writer.execute(&plan).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.contains("# Build plan for `octo-logger-cpp/1.0.0`"));
        assert!(output.contains("  aws-sdk-cpp/1.9.234"));
        assert!(output.contains("  aws-sdk-cpp:logs=True"));
        assert!(output.contains("  -DWITH_JSON_FORMATTING=ON"));
        assert!(output.contains("steps: configure -> build -> test -> install"));
    }

    #[test]
    fn test_plan_writer_json() {
        let (plan, _) = resolved_plan();
        let mut writer = PlanWriter::new(Vec::new(), true);
        writer.execute(&plan).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
        assert_eq!(value["package"], "octo-logger-cpp/1.0.0");
        assert_eq!(value["steps"][2], "test");
    }

    #[test]
    fn test_metadata_writer() {
        let (_, metadata) = resolved_plan();
        let mut writer = MetadataWriter::new(Vec::new());
        writer.publish(&metadata).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
        assert_eq!(value["name"], "octo-logger-cpp");
        assert_eq!(value["names"]["pkg_config"], "octo-logger-cpp");
        assert_eq!(
            value["components"][0]["requires"][2],
            "aws-sdk-cpp::monitoring"
        );
    }
}
