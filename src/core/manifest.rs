//! Component.toml manifest parsing and schema.
//!
//! The manifest names a component, gives its version, and declares the
//! other components it depends on. Requirement strings are recorded as
//! written; cmakegen never solves them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;
use thiserror::Error;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Component.toml";

/// Error loading a component manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find Component.toml in {}", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("failed to read manifest: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid version `{version}` in {}", .path.display())]
    InvalidVersion {
        path: PathBuf,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid component name `{name}` in {}: {reason}", .path.display())]
    InvalidName {
        path: PathBuf,
        name: String,
        reason: &'static str,
    },
}

/// Metadata from the `[component]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentMetadata {
    /// Component name
    pub name: String,

    /// Component version (semver)
    pub version: String,

    /// Component description
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawManifest {
    component: ComponentMetadata,

    #[serde(default)]
    dependencies: BTreeMap<String, String>,

    #[serde(default)]
    target_dependencies: BTreeMap<String, BTreeMap<String, String>>,
}

/// The parsed Component.toml manifest.
#[derive(Debug, Clone)]
pub struct ComponentManifest {
    /// Metadata from `[component]`
    pub metadata: ComponentMetadata,

    /// Parsed version
    pub version: Version,

    /// Dependencies for every target (name -> requirement)
    pub dependencies: BTreeMap<String, String>,

    /// Extra dependencies keyed by target name
    pub target_dependencies: BTreeMap<String, BTreeMap<String, String>>,

    /// Path to the manifest file
    pub manifest_path: PathBuf,
}

impl ComponentManifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse manifest contents; `path` is used for error reporting only.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        validate_name(&raw.component.name, path)?;
        for name in raw
            .dependencies
            .keys()
            .chain(raw.target_dependencies.values().flat_map(|deps| deps.keys()))
        {
            validate_name(name, path)?;
        }

        let version = raw
            .component
            .version
            .parse()
            .map_err(|source| ManifestError::InvalidVersion {
                path: path.to_path_buf(),
                version: raw.component.version.clone(),
                source,
            })?;

        Ok(ComponentManifest {
            metadata: raw.component,
            version,
            dependencies: raw.dependencies,
            target_dependencies: raw.target_dependencies,
            manifest_path: path.to_path_buf(),
        })
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// All dependencies declared for `target`: the common ones plus any
    /// target-specific entries. Target entries win on a name clash.
    pub fn dependencies_for(&self, target: &str) -> BTreeMap<String, String> {
        let mut deps = self.dependencies.clone();
        if let Some(extra) = self.target_dependencies.get(target) {
            deps.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        deps
    }
}

/// Component names become build directory names, so they must be a
/// single, non-special path segment.
fn validate_name(name: &str, path: &Path) -> Result<(), ManifestError> {
    let reason = if name.is_empty() {
        Some("name must not be empty")
    } else if name == "." || name == ".." {
        Some("name must not be a relative path segment")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else if name.chars().any(char::is_whitespace) {
        Some("name must not contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ManifestError::InvalidName {
            path: path.to_path_buf(),
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Find the manifest in `dir`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let path = dir.join(MANIFEST_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        })
    }
}
