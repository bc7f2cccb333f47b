//! Toolchain compatibility checks.
//!
//! Validation runs before any dependency is resolved. It is a pure function
//! of the toolchain, the requested standard and the revision's minimum
//! version table; the only side effect is at most one warning, which is
//! both logged and returned in the [`Validation`] report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::revision::MinimumVersionTable;
use crate::core::standard::CppStandard;
use crate::core::toolchain::{CompilerFamily, ToolchainDescriptor};
use crate::util::diagnostic::Diagnostic;

use super::errors::ValidationError;

/// How to treat compilers missing from the minimum version table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCompilerPolicy {
    /// Warn and assume the compiler supports C++17
    #[default]
    Warn,
    /// Reject the configuration
    Deny,
}

impl std::str::FromStr for UnknownCompilerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(UnknownCompilerPolicy::Warn),
            "deny" => Ok(UnknownCompilerPolicy::Deny),
            _ => Err(format!(
                "invalid unknown-compiler policy '{}'; expected 'warn' or 'deny'",
                s
            )),
        }
    }
}

impl fmt::Display for UnknownCompilerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownCompilerPolicy::Warn => write!(f, "warn"),
            UnknownCompilerPolicy::Deny => write!(f, "deny"),
        }
    }
}

/// Outcome of a successful validation.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Non-fatal findings (at most one today)
    pub warnings: Vec<Diagnostic>,
}

/// Check a toolchain against the recipe's requirements.
pub fn validate(
    table: &MinimumVersionTable,
    toolchain: &ToolchainDescriptor,
    requested_std: Option<CppStandard>,
    policy: UnknownCompilerPolicy,
) -> Result<Validation, ValidationError> {
    let mut validation = Validation::default();

    if let Some(requested) = requested_std {
        if requested < CppStandard::MINIMUM {
            return Err(ValidationError::StandardTooLow {
                requested,
                required: CppStandard::MINIMUM,
            });
        }
    }

    match table.minimum_for(&toolchain.family) {
        None => match policy {
            UnknownCompilerPolicy::Warn => {
                let warning = Diagnostic::warning(format!(
                    "octo-logger-cpp requires C++17. Your compiler `{}` is unknown. Assuming it supports C++17.",
                    toolchain.family
                ));
                tracing::warn!("{}", warning.message);
                validation.warnings.push(warning);
            }
            UnknownCompilerPolicy::Deny => {
                return Err(ValidationError::UnknownCompiler {
                    family: toolchain.family.clone(),
                });
            }
        },
        Some(minimum) if toolchain.version < *minimum => {
            return Err(ValidationError::ToolchainTooOld {
                family: toolchain.family.clone(),
                required: minimum.clone(),
                actual: toolchain.version.clone(),
            });
        }
        Some(_) => {}
    }

    if toolchain.family == CompilerFamily::Clang && toolchain.stdlib.as_deref() == Some("libc++") {
        return Err(ValidationError::UnsupportedStandardLibrary {
            family: toolchain.family.clone(),
            stdlib: "libc++".to_string(),
        });
    }

    if toolchain.family == CompilerFamily::Msvc {
        if let Some(runtime) = toolchain.runtime.filter(|r| r.is_static()) {
            return Err(ValidationError::UnsupportedRuntimeLinkage { runtime });
        }
    }

    tracing::debug!("toolchain {} accepted", toolchain);
    Ok(validation)
}
