//! Configuration file support for cmakegen.
//!
//! cmakegen reads two configuration file locations:
//! - Global: `~/.cmakegen/config.toml` - User-wide defaults
//! - Project: `.cmakegen/config.toml` - Component-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::read_to_string;

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".cmakegen";

/// cmakegen configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,
}

/// Settings for `[generate]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory holding per-target build roots, relative to the root
    /// component (default: `build`)
    pub build_dir: Option<PathBuf>,

    /// Extra subdirectory names never treated as nested CMake projects
    pub ignored_subdirs: Vec<String>,

    /// Extra directories searched for installed components
    pub search_paths: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
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

    /// Merge another config into this one (other takes precedence).
    ///
    /// List settings from `other` are appended, so project search paths
    /// are consulted after global ones.
    pub fn merge(&mut self, other: Config) {
        if other.generate.build_dir.is_some() {
            self.generate.build_dir = other.generate.build_dir;
        }
        for name in other.generate.ignored_subdirs {
            if !self.generate.ignored_subdirs.contains(&name) {
                self.generate.ignored_subdirs.push(name);
            }
        }
        self.generate
            .search_paths
            .extend(other.generate.search_paths);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cmakegen/config.toml)
/// 2. Global config (~/.cmakegen/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global cmakegen config directory (~/.cmakegen).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.cmakegen/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.cmakegen/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}
