use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseFlowError, Result};

/// File name looked up in the repository and in the user config directory.
pub const CONFIG_FILE_NAME: &str = "releaseflow.toml";

/// Represents the complete configuration file for release-flow-version.
///
/// Holds the branch naming convention and history traversal options. All keys are
/// optional; missing keys fall back to the release-flow defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub naming: NamingSettings,

    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_main_branch() -> String {
    "^(main|master)$".to_string()
}

fn default_release_prefix() -> String {
    "release/".to_string()
}

fn default_feature_prefix() -> String {
    "feature/".to_string()
}

fn default_hotfix_prefix() -> String {
    "fix/".to_string()
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_prerelease_label() -> String {
    "beta".to_string()
}

/// Branch naming convention as written in the configuration file.
///
/// `main_branch` is a regular expression matched against a branch's short name.
/// The prefixes are literal text.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamingSettings {
    #[serde(default = "default_version")]
    pub default_version: String,

    #[serde(default = "default_main_branch")]
    pub main_branch: String,

    #[serde(default = "default_release_prefix")]
    pub release_prefix: String,

    #[serde(default = "default_feature_prefix")]
    pub feature_prefix: String,

    #[serde(default = "default_hotfix_prefix")]
    pub hotfix_prefix: String,

    #[serde(default = "default_remote_name")]
    pub remote_name: String,

    #[serde(default = "default_prerelease_label")]
    pub prerelease_label: String,
}

impl Default for NamingSettings {
    fn default() -> Self {
        NamingSettings {
            default_version: default_version(),
            main_branch: default_main_branch(),
            release_prefix: default_release_prefix(),
            feature_prefix: default_feature_prefix(),
            hotfix_prefix: default_hotfix_prefix(),
            remote_name: default_remote_name(),
            prerelease_label: default_prerelease_label(),
        }
    }
}

/// Options controlling how commit distances are counted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HistoryConfig {
    /// Follow only first parents instead of the full ancestry
    #[serde(default)]
    pub first_parent: bool,
}

impl Config {
    /// Replace the main branch pattern with an exact branch name.
    pub fn override_main_branch(&mut self, name: &str) {
        self.naming.main_branch = format!("^{}$", regex::escape(name));
    }

    /// Compile the naming settings into an immutable [NamingConfig].
    ///
    /// Every pattern is compiled here so that an invalid pattern fails the run
    /// before the repository is touched.
    pub fn compile(&self) -> Result<NamingConfig> {
        let naming = &self.naming;

        let default_version = semver::Version::parse(&naming.default_version).map_err(|e| {
            ReleaseFlowError::config(format!(
                "default_version '{}' is not a semantic version: {}",
                naming.default_version, e
            ))
        })?;

        if naming.prerelease_label.is_empty()
            || semver::Prerelease::new(&naming.prerelease_label).is_err()
        {
            return Err(ReleaseFlowError::config(format!(
                "prerelease_label '{}' is not a valid prerelease identifier",
                naming.prerelease_label
            )));
        }

        if naming.remote_name.is_empty() {
            return Err(ReleaseFlowError::config("remote_name must not be empty"));
        }

        let main_matcher = compile_pattern("main_branch", &naming.main_branch)?;
        let release_matcher = compile_pattern(
            "release_prefix",
            &format!(r"^{}(\d+\.\d+\.\d+)", regex::escape(&naming.release_prefix)),
        )?;
        let feature_matcher = compile_pattern(
            "feature_prefix",
            &format!("^{}.*", regex::escape(&naming.feature_prefix)),
        )?;
        let hotfix_matcher = compile_pattern(
            "hotfix_prefix",
            &format!("^{}.*", regex::escape(&naming.hotfix_prefix)),
        )?;

        Ok(NamingConfig {
            default_version,
            remote_name: naming.remote_name.clone(),
            prerelease_label: naming.prerelease_label.clone(),
            release_prefix: naming.release_prefix.clone(),
            main_matcher,
            release_matcher,
            feature_matcher,
            hotfix_matcher,
        })
    }
}

fn compile_pattern(key: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        ReleaseFlowError::config(format!("{} pattern '{}' does not compile: {}", key, pattern, e))
    })
}

/// Compiled naming convention shared by the classifier, the release registry and
/// the version engine.
#[derive(Debug, Clone)]
pub struct NamingConfig {
    pub default_version: semver::Version,
    pub remote_name: String,
    pub prerelease_label: String,
    pub release_prefix: String,
    main_matcher: Regex,
    release_matcher: Regex,
    feature_matcher: Regex,
    hotfix_matcher: Regex,
}

impl NamingConfig {
    pub fn is_main(&self, short_name: &str) -> bool {
        self.main_matcher.is_match(short_name)
    }

    pub fn is_release(&self, logical_name: &str) -> bool {
        self.release_matcher.is_match(logical_name)
    }

    pub fn is_feature(&self, logical_name: &str) -> bool {
        self.feature_matcher.is_match(logical_name)
    }

    pub fn is_hotfix(&self, logical_name: &str) -> bool {
        self.hotfix_matcher.is_match(logical_name)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releaseflow.toml` in the repository directory
/// 3. `releaseflow.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_dir: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(repo_dir),
    };

    let Some(path) = path else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(&path).map_err(|e| {
        ReleaseFlowError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        ReleaseFlowError::config(format!("cannot parse {}: {}", path.display(), e))
    })
}

fn discover_config(repo_dir: &Path) -> Option<PathBuf> {
    let local = repo_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
