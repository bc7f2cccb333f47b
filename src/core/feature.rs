//! Feature flags and implication closure.
//!
//! A [`FeatureSet`] starts out holding a revision's declared flags at their
//! defaults. Callers may override values while the set is still mutable;
//! [`FeatureSet::normalize`] then propagates implication rules to a fixed
//! point and freezes the result as [`NormalizedFeatures`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Declaration of a feature flag in a recipe revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDecl {
    /// Flag name (e.g. `with_aws`)
    pub name: &'static str,
    /// Value when the caller does not override it
    pub default: bool,
    /// One-line description for `quay options`
    pub description: &'static str,
}

/// "Enabling `when` forces `forces` on."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Implication {
    pub when: &'static str,
    pub forces: &'static str,
}

impl fmt::Display for Implication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.when, self.forces)
    }
}

/// A single feature flag with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub name: String,
    pub value: bool,
    pub default: bool,
}

/// Errors raised while overriding feature flags.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum FeatureError {
    #[error("unknown option `{name}` for recipe revision {revision}")]
    #[diagnostic(code(quay::options::unknown))]
    UnknownFeature {
        name: String,
        revision: String,
        known: Vec<String>,
    },

    #[error("invalid value `{value}` for option `{name}`")]
    #[diagnostic(
        code(quay::options::invalid_value),
        help("Use True/False, true/false, on/off or 1/0")
    )]
    InvalidValue { name: String, value: String },

    #[error("malformed option `{input}`, expected `name=value`")]
    #[diagnostic(code(quay::options::malformed))]
    Malformed { input: String },
}

impl FeatureError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match self {
            FeatureError::UnknownFeature {
                name,
                revision,
                known,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "option `{}` does not exist in revision {}",
                    name, revision
                ));
                if known.is_empty() {
                    diag = diag.with_context(format!("revision {} declares no options", revision));
                } else {
                    diag = diag.with_context(format!("possible options: {}", known.join(", ")));
                }
                diag.with_suggestion("Run `quay options` to list the declared options")
            }
            FeatureError::InvalidValue { name, value } => {
                Diagnostic::error(format!("`{}` is not a boolean value for `{}`", value, name))
                    .with_suggestion(format!("Pass `-o {}=True` or `-o {}=False`", name, name))
            }
            FeatureError::Malformed { input } => {
                Diagnostic::error(format!("could not parse option `{}`", input))
                    .with_suggestion("Options are written as `name=value`")
            }
        };
        diag.with_details(self)
    }
}

/// Parse a boolean option value the way recipe profiles spell them.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, FeatureError> {
    match value.trim() {
        "True" | "true" | "ON" | "on" | "1" | "yes" => Ok(true),
        "False" | "false" | "OFF" | "off" | "0" | "no" => Ok(false),
        other => Err(FeatureError::InvalidValue {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Split a `name=value` option argument.
pub fn parse_assignment(input: &str) -> Result<(String, bool), FeatureError> {
    let Some((name, value)) = input.split_once('=') else {
        return Err(FeatureError::Malformed {
            input: input.to_string(),
        });
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(FeatureError::Malformed {
            input: input.to_string(),
        });
    }
    Ok((name.to_string(), parse_bool(name, value)?))
}

/// The mutable flag set of a pass that has not been normalized yet.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    revision: String,
    flags: Vec<FeatureFlag>,
}

impl FeatureSet {
    /// Create a set holding every declared flag at its default value.
    pub fn from_decls(revision: impl Into<String>, decls: &[FeatureDecl]) -> Self {
        FeatureSet {
            revision: revision.into(),
            flags: decls
                .iter()
                .map(|d| FeatureFlag {
                    name: d.name.to_string(),
                    value: d.default,
                    default: d.default,
                })
                .collect(),
        }
    }

    /// Override a flag value.
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), FeatureError> {
        match self.flags.iter_mut().find(|f| f.name == name) {
            Some(flag) => {
                flag.value = value;
                Ok(())
            }
            None => Err(FeatureError::UnknownFeature {
                name: name.to_string(),
                revision: self.revision.clone(),
                known: self.flags.iter().map(|f| f.name.clone()).collect(),
            }),
        }
    }

    /// Current value of a flag; undeclared flags read as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name && f.value)
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> &[FeatureFlag] {
        &self.flags
    }

    /// Propagate implication rules to a fixed point and freeze the set.
    pub fn normalize(mut self, implications: &[Implication]) -> NormalizedFeatures {
        loop {
            let mut changed = false;
            for rule in implications {
                if !self.is_enabled(rule.when) || self.is_enabled(rule.forces) {
                    continue;
                }
                if let Some(flag) = self.flags.iter_mut().find(|f| f.name == rule.forces) {
                    tracing::debug!("`{}` implies `{}`, enabling it", rule.when, rule.forces);
                    flag.value = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        NormalizedFeatures { flags: self.flags }
    }
}

/// A flag set closed under its revision's implication rules.
///
/// Only [`FeatureSet::normalize`] creates these, so holding one proves the
/// closure has been computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedFeatures {
    flags: Vec<FeatureFlag>,
}

impl NormalizedFeatures {
    /// Current value of a flag; undeclared flags read as disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name && f.value)
    }

    /// Flags in declaration order.
    pub fn flags(&self) -> &[FeatureFlag] {
        &self.flags
    }

    /// Names of the enabled flags, in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().filter(|f| f.value).map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECLS: &[FeatureDecl] = &[
        FeatureDecl {
            name: "a",
            default: false,
            description: "",
        },
        FeatureDecl {
            name: "b",
            default: false,
            description: "",
        },
        FeatureDecl {
            name: "c",
            default: false,
            description: "",
        },
    ];

    #[test]
    fn test_defaults() {
        let set = FeatureSet::from_decls("v3", DECLS);
        assert!(set.flags().iter().all(|f| !f.value && !f.default));
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let mut set = FeatureSet::from_decls("v3", DECLS);
        let err = set.set("d", true).unwrap_err();
        assert!(err.to_string().contains("unknown option `d`"));
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("possible options: a, b, c"));
    }

    #[test]
    fn test_closure_is_transitive() {
        let rules = [
            Implication {
                when: "b",
                forces: "c",
            },
            Implication {
                when: "a",
                forces: "b",
            },
        ];
        let mut set = FeatureSet::from_decls("v3", DECLS);
        set.set("a", true).unwrap();

        let normalized = set.normalize(&rules);
        assert!(normalized.is_enabled("a"));
        assert!(normalized.is_enabled("b"));
        assert!(normalized.is_enabled("c"));
    }

    #[test]
    fn test_closure_overrides_explicit_false() {
        let rules = [Implication {
            when: "a",
            forces: "b",
        }];
        let mut set = FeatureSet::from_decls("v3", DECLS);
        set.set("b", false).unwrap();
        set.set("a", true).unwrap();

        assert!(set.normalize(&rules).is_enabled("b"));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("with_aws=True").unwrap(),
            ("with_aws".to_string(), true)
        );
        assert_eq!(
            parse_assignment("with_aws = off").unwrap(),
            ("with_aws".to_string(), false)
        );
        assert!(matches!(
            parse_assignment("with_aws"),
            Err(FeatureError::Malformed { .. })
        ));
        assert!(matches!(
            parse_assignment("with_aws=maybe"),
            Err(FeatureError::InvalidValue { .. })
        ));
    }
}
