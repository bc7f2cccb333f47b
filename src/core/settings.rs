//! Profile settings.
//!
//! Settings arrive as `key=value` pairs, from a `[settings]` table in the
//! config file or `-s` on the command line, using the usual profile keys
//! (`compiler`, `compiler.version`, `compiler.libcxx`, ...). They are turned
//! into a [`ToolchainDescriptor`] plus the requested language standard.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::standard::CppStandard;
use crate::core::toolchain::{
    parse_version_lenient, visual_studio_version, CompilerFamily, RuntimeLinkage,
    ToolchainDescriptor,
};
use crate::util::diagnostic::Diagnostic;

/// Keys accepted in settings.
pub const KNOWN_KEYS: &[&str] = &[
    "os",
    "arch",
    "build_type",
    "compiler",
    "compiler.version",
    "compiler.libcxx",
    "compiler.runtime",
    "compiler.cppstd",
];

/// Errors raised while interpreting settings.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum SettingsError {
    #[error("malformed setting `{input}`, expected `key=value`")]
    #[diagnostic(code(quay::settings::malformed))]
    Malformed { input: String },

    #[error("unknown setting `{key}`")]
    #[diagnostic(code(quay::settings::unknown))]
    UnknownKey { key: String },

    #[error("no compiler configured")]
    #[diagnostic(
        code(quay::settings::no_compiler),
        help("Pass `-s compiler=gcc -s compiler.version=12` or add a [settings] table to .quay/config.toml")
    )]
    MissingCompiler,

    #[error("compiler `{compiler}` has no version")]
    #[diagnostic(code(quay::settings::no_compiler_version))]
    MissingVersion { compiler: String },

    #[error("invalid value `{value}` for setting `{key}`: {reason}")]
    #[diagnostic(code(quay::settings::invalid_value))]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl SettingsError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_details(self);
        match self {
            SettingsError::Malformed { .. } => {
                diag.with_suggestion("Settings are written as `key=value`, e.g. `compiler=gcc`")
            }
            SettingsError::UnknownKey { .. } => {
                diag.with_context(format!("known settings: {}", KNOWN_KEYS.join(", ")))
            }
            SettingsError::MissingCompiler => diag,
            SettingsError::MissingVersion { compiler } => diag.with_suggestion(format!(
                "Pass `-s compiler.version=<version>` for `{}`",
                compiler
            )),
            SettingsError::InvalidValue { .. } => diag,
        }
    }
}

/// A set of profile settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Settings::default()
    }

    /// Set a value, rejecting unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let key = key.trim();
        if !KNOWN_KEYS.contains(&key) {
            return Err(SettingsError::UnknownKey {
                key: key.to_string(),
            });
        }
        self.values.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }

    /// Parse and set a `key=value` argument.
    pub fn set_assignment(&mut self, input: &str) -> Result<(), SettingsError> {
        let Some((key, value)) = input.split_once('=') else {
            return Err(SettingsError::Malformed {
                input: input.to_string(),
            });
        };
        self.set(key, value)
    }

    /// Overlay another set of settings; values in `other` win.
    pub fn merge(&mut self, other: &Settings) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Target operating system.
    pub fn os(&self) -> Option<&str> {
        self.get("os")
    }

    /// The requested language standard, if any.
    pub fn cppstd(&self) -> Result<Option<CppStandard>, SettingsError> {
        self.get("compiler.cppstd")
            .map(|value| {
                value
                    .parse::<CppStandard>()
                    .map_err(|e| invalid("compiler.cppstd", value, e.to_string()))
            })
            .transpose()
    }

    /// Build the toolchain descriptor these settings describe.
    pub fn toolchain(&self) -> Result<ToolchainDescriptor, SettingsError> {
        let compiler = self.get("compiler").ok_or(SettingsError::MissingCompiler)?;
        let version_str =
            self.get("compiler.version")
                .ok_or_else(|| SettingsError::MissingVersion {
                    compiler: compiler.to_string(),
                })?;
        let version = parse_version_lenient(version_str).ok_or_else(|| {
            invalid("compiler.version", version_str, "not a version number".to_string())
        })?;

        // `msvc` versions are toolset numbers, the table uses Visual Studio releases
        let version = if compiler == "msvc" {
            let vs = visual_studio_version(&version).ok_or_else(|| {
                invalid(
                    "compiler.version",
                    version_str,
                    "not an msvc toolset version (190 to 194)".to_string(),
                )
            })?;
            tracing::debug!("msvc {} is Visual Studio {}", version_str, vs.major);
            vs
        } else {
            version
        };

        let mut toolchain = ToolchainDescriptor::new(CompilerFamily::from_name(compiler), version);

        if let Some(libcxx) = self.get("compiler.libcxx") {
            toolchain = toolchain.with_stdlib(libcxx);
        }

        if let Some(runtime) = self.get("compiler.runtime") {
            let runtime = runtime
                .parse::<RuntimeLinkage>()
                .map_err(|reason| invalid("compiler.runtime", runtime, reason))?;
            toolchain = toolchain.with_runtime(runtime);
        }

        Ok(toolchain)
    }

}

fn invalid(key: &str, value: &str, reason: String) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn settings(pairs: &[&str]) -> Settings {
        let mut s = Settings::new();
        for pair in pairs {
            s.set_assignment(pair).unwrap();
        }
        s
    }

    #[test]
    fn test_gcc_profile() {
        let s = settings(&[
            "os=Linux",
            "compiler=gcc",
            "compiler.version=9",
            "compiler.libcxx=libstdc++11",
            "compiler.cppstd=gnu17",
        ]);

        let tc = s.toolchain().unwrap();
        assert_eq!(tc.family, CompilerFamily::Gcc);
        assert_eq!(tc.version, Version::new(9, 0, 0));
        assert_eq!(tc.stdlib.as_deref(), Some("libstdc++11"));
        assert_eq!(tc.runtime, None);
        assert_eq!(s.cppstd().unwrap(), Some(CppStandard::Cpp17));
        assert_eq!(s.os(), Some("Linux"));
    }

    #[test]
    fn test_msvc_runtime() {
        let s = settings(&[
            "compiler=Visual Studio",
            "compiler.version=16",
            "compiler.runtime=MTd",
        ]);
        let tc = s.toolchain().unwrap();
        assert_eq!(tc.family, CompilerFamily::Msvc);
        assert_eq!(tc.runtime, Some(RuntimeLinkage::StaticDebug));
    }

    #[test]
    fn test_msvc_version_uses_visual_studio_scale() {
        let tc = settings(&["compiler=msvc", "compiler.version=192"])
            .toolchain()
            .unwrap();
        assert_eq!(tc.family, CompilerFamily::Msvc);
        assert_eq!(tc.version, Version::new(16, 0, 0));

        let tc = settings(&["compiler=msvc", "compiler.version=190"])
            .toolchain()
            .unwrap();
        assert_eq!(tc.version, Version::new(14, 0, 0));
    }

    #[test]
    fn test_msvc_rejects_visual_studio_numbering() {
        let s = settings(&["compiler=msvc", "compiler.version=16"]);
        assert!(matches!(
            s.toolchain(),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_compiler() {
        let s = settings(&["os=Linux"]);
        assert!(matches!(s.toolchain(), Err(SettingsError::MissingCompiler)));
    }

    #[test]
    fn test_missing_compiler_diagnostic_carries_help() {
        let output = SettingsError::MissingCompiler.to_diagnostic().format(false);
        assert!(output.starts_with("error[quay::settings::no_compiler]: no compiler configured"));
        assert!(output.contains("1. Pass `-s compiler=gcc -s compiler.version=12`"));
    }

    #[test]
    fn test_missing_version() {
        let s = settings(&["compiler=clang"]);
        assert!(matches!(
            s.toolchain(),
            Err(SettingsError::MissingVersion { .. })
        ));
    }

    #[test]
    fn test_unknown_key() {
        let mut s = Settings::new();
        let err = s.set_assignment("compiler.flavor=spicy").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownKey { .. }));
        assert!(err.to_diagnostic().format(false).contains("known settings"));
    }

    #[test]
    fn test_invalid_cppstd() {
        let s = settings(&["compiler.cppstd=16"]);
        assert!(matches!(
            s.cppstd(),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = settings(&["compiler=gcc", "compiler.version=8"]);
        base.merge(&settings(&["compiler.version=12"]));
        assert_eq!(base.get("compiler"), Some("gcc"));
        assert_eq!(base.get("compiler.version"), Some("12"));
    }
}
