//! Target descriptions - which platform and toolchain to generate for.
//!
//! A target is read from a directory containing `Target.toml`:
//!
//! ```toml
//! [target]
//! name = "frdm-k64f-gcc"
//! toolchain = "CMake/toolchain.cmake"
//! ```
//!
//! or assembled directly from a name and a toolchain file path.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::util::fs::normalize_path;

/// Target description file name.
pub const TARGET_MANIFEST_NAME: &str = "Target.toml";

/// Error building or loading a target.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum TargetError {
    #[error("Target \"{name}\" is not a valid build target")]
    #[diagnostic(
        code(cmakegen::target::invalid_name),
        help("target names must be non-empty and contain no whitespace or path separators")
    )]
    InvalidName { name: String },

    #[error("target `{name}` does not name a toolchain file")]
    #[diagnostic(
        code(cmakegen::target::no_toolchain),
        help("set `toolchain` in Target.toml or pass --toolchain")
    )]
    MissingToolchain { name: String },

    #[error("could not find Target.toml in {}", .dir.display())]
    #[diagnostic(code(cmakegen::target::not_found))]
    NotFound { dir: PathBuf },

    #[error("failed to read target description: {}", .path.display())]
    #[diagnostic(code(cmakegen::target::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse target description: {}", .path.display())]
    #[diagnostic(code(cmakegen::target::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawTargetFile {
    target: RawTarget,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    name: String,
    #[serde(default)]
    toolchain: Option<PathBuf>,
}

/// A validated build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    toolchain_file: PathBuf,
}

impl Target {
    /// Create a target from a name and toolchain file path.
    pub fn new(
        name: impl Into<String>,
        toolchain_file: impl Into<PathBuf>,
    ) -> Result<Self, TargetError> {
        let name = name.into();
        let toolchain_file = toolchain_file.into();

        if name.is_empty()
            || name.chars().any(char::is_whitespace)
            || name.contains(['/', '\\'])
        {
            return Err(TargetError::InvalidName { name });
        }
        if toolchain_file.as_os_str().is_empty() {
            return Err(TargetError::MissingToolchain { name });
        }

        Ok(Target {
            name,
            toolchain_file,
        })
    }

    /// Load a target from the `Target.toml` in `dir`.
    ///
    /// A relative toolchain path is resolved against `dir`.
    pub fn load(dir: &Path) -> Result<Self, TargetError> {
        let path = dir.join(TARGET_MANIFEST_NAME);
        if !path.is_file() {
            return Err(TargetError::NotFound {
                dir: dir.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| TargetError::Io {
            path: path.clone(),
            source,
        })?;
        let raw: RawTargetFile =
            toml::from_str(&contents).map_err(|source| TargetError::Parse {
                path: path.clone(),
                source,
            })?;

        let toolchain = match raw.target.toolchain {
            Some(toolchain) if toolchain.is_relative() => normalize_path(&dir.join(toolchain)),
            Some(toolchain) => toolchain,
            None => PathBuf::new(),
        };

        let target = Target::new(raw.target.name, toolchain)?;
        if !target.toolchain_file.exists() {
            tracing::warn!(
                "toolchain file for target `{}` does not exist: {}",
                target.name,
                target.toolchain_file.display()
            );
        }
        Ok(target)
    }

    /// Target name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the CMake toolchain file.
    pub fn toolchain_file(&self) -> &Path {
        &self.toolchain_file
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
