//! Configuration file support for quay.
//!
//! quay reads two configuration files:
//! - Global: `~/.quay/config.toml` - User-wide defaults
//! - Project: `.quay/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::revision::Revision;
use crate::core::settings::Settings;
use crate::resolver::UnknownCompilerPolicy;

/// quay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution settings
    pub resolve: ResolveConfig,

    /// Default option values (`with_aws = true`); options the selected
    /// revision does not declare are skipped
    pub options: BTreeMap<String, bool>,

    /// Default profile settings (`compiler = "gcc"`)
    pub settings: BTreeMap<String, String>,
}

/// Resolution-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolveConfig {
    /// Recipe revision to resolve against (defaults to the latest)
    pub revision: Option<Revision>,

    /// What to do with compilers missing from the minimum version table
    pub unknown_compiler: Option<UnknownCompilerPolicy>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.resolve.revision.is_some() {
            self.resolve.revision = other.resolve.revision;
        }
        if other.resolve.unknown_compiler.is_some() {
            self.resolve.unknown_compiler = other.resolve.unknown_compiler;
        }
        self.options.extend(other.options);
        self.settings.extend(other.settings);
    }

    /// The configured default settings.
    pub fn profile(&self) -> Result<Settings> {
        let mut settings = Settings::new();
        for (key, value) in &self.settings {
            settings
                .set(key, value)
                .with_context(|| format!("invalid [settings] entry `{}`", key))?;
        }
        Ok(settings)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.quay/config.toml)
/// 2. Global config (~/.quay/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global quay config directory (~/.quay).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".quay"))
}

/// Get the global config path (~/.quay/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.quay/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".quay").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [resolve]
            revision = "v2"
            unknown-compiler = "deny"

            [options]
            with_aws = true

            [settings]
            compiler = "gcc"
            "compiler.version" = "9"
            "#,
        )
        .unwrap();

        assert_eq!(config.resolve.revision, Some(Revision::V2));
        assert_eq!(
            config.resolve.unknown_compiler,
            Some(UnknownCompilerPolicy::Deny)
        );
        assert_eq!(config.options.get("with_aws"), Some(&true));

        let profile = config.profile().unwrap();
        assert_eq!(profile.get("compiler.version"), Some("9"));
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());

        let mut g = Config::default();
        g.resolve.revision = Some(Revision::V1);
        g.options.insert("with_aws".to_string(), true);
        g.settings.insert("compiler".to_string(), "clang".to_string());
        g.save(&global).unwrap();

        let mut p = Config::default();
        p.resolve.revision = Some(Revision::V3);
        p.settings.insert("compiler".to_string(), "gcc".to_string());
        p.save(&project).unwrap();

        let merged = load_config(&global, &project);
        assert_eq!(merged.resolve.revision, Some(Revision::V3));
        assert_eq!(merged.options.get("with_aws"), Some(&true));
        assert_eq!(merged.settings.get("compiler").map(String::as_str), Some("gcc"));
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("nope.toml"), &tmp.path().join("nada.toml"));
        assert!(config.resolve.revision.is_none());
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_unknown_setting_in_profile() {
        let mut config = Config::default();
        config
            .settings
            .insert("compiler.flavor".to_string(), "spicy".to_string());
        assert!(config.profile().is_err());
    }
}
