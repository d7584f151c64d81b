//! Global context for cmakegen operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            verbose: false,
            color: true,
        }
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Find the root component directory, starting from `start` (or cwd)
    /// and searching upward for a `Component.toml`.
    pub fn find_component_root(&self, start: Option<&Path>) -> Result<PathBuf, ManifestError> {
        let start = start
            .map(|p| self.resolve_path(p))
            .unwrap_or_else(|| self.cwd.clone());
        let mut current = start.clone();
        loop {
            match find_manifest(&current) {
                Ok(path) => {
                    return Ok(path
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| current.clone()))
                }
                Err(ManifestError::NotFound { .. }) => {
                    if !current.pop() {
                        return Err(ManifestError::NotFound { dir: start });
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Load the merged global and project configuration for a component root.
    pub fn load_config(&self, component_root: &Path) -> Config {
        let global = config::global_config_path();
        config::load_config(
            global.as_deref(),
            &config::project_config_path(component_root),
        )
    }
}
