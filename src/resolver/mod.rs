//! Recipe resolution.
//!
//! A resolution pass moves through
//! `Created -> FlagsNormalized -> Validated -> Resolved`, or ends in
//! `Rejected` when validation fails. Each stage is its own type, so a
//! [`ResolvedConfiguration`] can only be produced from a [`ValidatedPass`].
//!
//! ```rust,ignore
//! let schema = RevisionSchema::for_revision(Revision::LATEST);
//! let mut pass = ResolutionPass::new(&schema, RecipeIdentity::new("1.2.0"));
//! pass.set("with_aws", true)?;
//! let resolved = pass
//!     .normalize()
//!     .validate(&toolchain, Some(CppStandard::Cpp17), UnknownCompilerPolicy::Warn)?
//!     .resolve();
//! ```

pub mod errors;
pub mod resolve;
pub mod validate;

pub use errors::ValidationError;
pub use resolve::{resolve, ResolvedConfiguration};
pub use validate::{validate, UnknownCompilerPolicy, Validation};

use std::fmt;

use crate::core::feature::{FeatureError, FeatureSet, NormalizedFeatures};
use crate::core::recipe::RecipeIdentity;
use crate::core::revision::RevisionSchema;
use crate::core::standard::CppStandard;
use crate::core::toolchain::ToolchainDescriptor;
use crate::util::diagnostic::Diagnostic;

/// Lifecycle state of a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Created,
    FlagsNormalized,
    Validated,
    Resolved,
    Rejected,
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PassState::Created => "created",
            PassState::FlagsNormalized => "flags-normalized",
            PassState::Validated => "validated",
            PassState::Resolved => "resolved",
            PassState::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A pass whose flags may still be overridden.
#[derive(Debug)]
pub struct ResolutionPass<'a> {
    schema: &'a RevisionSchema,
    identity: RecipeIdentity,
    features: FeatureSet,
}

impl<'a> ResolutionPass<'a> {
    /// Start a pass with the revision's default flags.
    pub fn new(schema: &'a RevisionSchema, identity: RecipeIdentity) -> Self {
        tracing::debug!(
            "pass for {} (revision {}) is {}",
            identity.reference(),
            schema.revision,
            PassState::Created
        );
        ResolutionPass {
            schema,
            identity,
            features: schema.default_features(),
        }
    }

    pub fn state(&self) -> PassState {
        PassState::Created
    }

    /// Override a feature flag.
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), FeatureError> {
        self.features.set(name, value)
    }

    /// Apply implication rules and freeze the flag set.
    pub fn normalize(self) -> NormalizedPass<'a> {
        let features = self.features.normalize(self.schema.implications);
        tracing::debug!("pass is {}", PassState::FlagsNormalized);
        NormalizedPass {
            schema: self.schema,
            identity: self.identity,
            features,
        }
    }
}

/// A pass whose flags are closed under implication.
#[derive(Debug)]
pub struct NormalizedPass<'a> {
    schema: &'a RevisionSchema,
    identity: RecipeIdentity,
    features: NormalizedFeatures,
}

impl<'a> NormalizedPass<'a> {
    pub fn state(&self) -> PassState {
        PassState::FlagsNormalized
    }

    pub fn features(&self) -> &NormalizedFeatures {
        &self.features
    }

    /// Gate the pass on toolchain compatibility.
    ///
    /// On failure the pass is `Rejected` and the error is returned as is.
    pub fn validate(
        self,
        toolchain: &ToolchainDescriptor,
        cppstd: Option<CppStandard>,
        policy: UnknownCompilerPolicy,
    ) -> Result<ValidatedPass<'a>, ValidationError> {
        match validate::validate(&self.schema.minimum_versions, toolchain, cppstd, policy) {
            Ok(validation) => {
                tracing::debug!("pass is {}", PassState::Validated);
                Ok(ValidatedPass {
                    schema: self.schema,
                    identity: self.identity,
                    features: self.features,
                    cppstd,
                    warnings: validation.warnings,
                })
            }
            Err(err) => {
                tracing::debug!("pass is {}: {}", PassState::Rejected, err);
                Err(err)
            }
        }
    }
}

/// A pass that passed validation.
#[derive(Debug)]
pub struct ValidatedPass<'a> {
    schema: &'a RevisionSchema,
    identity: RecipeIdentity,
    features: NormalizedFeatures,
    cppstd: Option<CppStandard>,
    warnings: Vec<Diagnostic>,
}

impl ValidatedPass<'_> {
    pub fn state(&self) -> PassState {
        PassState::Validated
    }

    pub fn features(&self) -> &NormalizedFeatures {
        &self.features
    }

    /// Warnings raised during validation.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Compute the final configuration.
    pub fn resolve(self) -> ResolvedConfiguration {
        let resolved = resolve::resolve(self.schema, &self.identity, &self.features, self.cppstd);
        tracing::info!(
            "resolved {} with {} requirements",
            resolved.package.reference(),
            resolved.requirements.len()
        );
        resolved
    }
}
