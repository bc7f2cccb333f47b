//! Core data structures for quay.
//!
//! This module contains the foundational types used throughout quay:
//! - Feature flags and implication closure
//! - Toolchain descriptors and language standards
//! - Requirements and installed-package metadata
//! - The per-revision recipe schema

pub mod dependency;
pub mod feature;
pub mod metadata;
pub mod recipe;
pub mod revision;
pub mod settings;
pub mod standard;
pub mod toolchain;

pub use dependency::{DependencySpec, OptionOverride, PackageRef};
pub use feature::{FeatureFlag, FeatureSet, NormalizedFeatures};
pub use metadata::{Component, Generator, PackageMetadata};
pub use recipe::RecipeIdentity;
pub use revision::{Revision, RevisionSchema};
pub use settings::Settings;
pub use standard::CppStandard;
pub use toolchain::{CompilerFamily, RuntimeLinkage, ToolchainDescriptor};
