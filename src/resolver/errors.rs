//! Validation error types and diagnostics.

use semver::Version;
use thiserror::Error;

use crate::core::recipe::PACKAGE_NAME;
use crate::core::standard::CppStandard;
use crate::core::toolchain::{CompilerFamily, RuntimeLinkage};
use crate::util::diagnostic::Diagnostic;

/// A configuration the recipe refuses to build.
///
/// Every variant is fatal for the pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum ValidationError {
    #[error("octo-logger-cpp requires at least {required}, but {requested} was requested")]
    #[diagnostic(code(quay::validate::standard_too_low))]
    StandardTooLow {
        requested: CppStandard,
        required: CppStandard,
    },

    #[error("octo-logger-cpp requires C++17, which {family} {actual} does not support (minimum {required})")]
    #[diagnostic(code(quay::validate::toolchain_too_old))]
    ToolchainTooOld {
        family: CompilerFamily,
        required: Version,
        actual: Version,
    },

    #[error("octo-logger-cpp does not support {family} with {stdlib}. Use libstdc++ instead.")]
    #[diagnostic(code(quay::validate::unsupported_stdlib))]
    UnsupportedStandardLibrary {
        family: CompilerFamily,
        stdlib: String,
    },

    #[error("octo-logger-cpp does not support MSVC {runtime} configurations, only MD/MDd is supported")]
    #[diagnostic(code(quay::validate::unsupported_runtime))]
    UnsupportedRuntimeLinkage { runtime: RuntimeLinkage },

    #[error("octo-logger-cpp requires C++17 and compiler `{family}` is unknown")]
    #[diagnostic(
        code(quay::validate::unknown_compiler),
        help("Set `unknown-compiler = \"warn\"` under [resolve] in .quay/config.toml to assume compatibility")
    )]
    UnknownCompiler { family: CompilerFamily },
}

impl ValidationError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match self {
            ValidationError::StandardTooLow {
                requested,
                required,
            } => Diagnostic::error(format!(
                "`{}` requires {} but the profile requests {}",
                PACKAGE_NAME, required, requested
            ))
            .with_suggestion(format!(
                "Pass `-s compiler.cppstd={}` or higher",
                required.as_str()
            ))
            .with_suggestion("Remove `compiler.cppstd` to let the compiler default apply"),

            ValidationError::ToolchainTooOld {
                family,
                required,
                actual,
            } => Diagnostic::error(format!(
                "`{}` requires C++17, which your compiler does not support",
                PACKAGE_NAME
            ))
            .with_context(format!(
                "{} {} is older than the minimum {} {}",
                family, actual, family, required
            ))
            .with_suggestion(format!("Upgrade {} to {} or newer", family, required.major)),

            ValidationError::UnsupportedStandardLibrary { family, stdlib } => {
                Diagnostic::error(format!(
                    "`{}` does not support {} with {}",
                    PACKAGE_NAME, family, stdlib
                ))
                .with_suggestion("Pass `-s compiler.libcxx=libstdc++11`")
            }

            ValidationError::UnsupportedRuntimeLinkage { runtime } => Diagnostic::error(
                format!("`{}` does not support the {} runtime", PACKAGE_NAME, runtime),
            )
            .with_context("only the dynamic runtimes (MD, MDd) are supported")
            .with_suggestion(format!(
                "Pass `-s compiler.runtime={}`",
                if runtime == &RuntimeLinkage::StaticDebug {
                    "MDd"
                } else {
                    "MD"
                }
            )),

            ValidationError::UnknownCompiler { family } => Diagnostic::error(format!(
                "compiler `{}` is not in the minimum version table",
                family
            ))
            .with_context("the unknown-compiler policy is set to deny")
            .with_suggestion("Use gcc, clang, apple-clang or Visual Studio"),
        };
        diag.with_details(self)
    }
}
