//! Component - a named unit of source with a location on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::core::manifest::{find_manifest, ComponentManifest, ManifestError};
use crate::core::Target;
use crate::util::fs::normalize_path;

/// Directory inside a component where its dependencies are installed.
pub const MODULES_DIR_NAME: &str = "components";

/// A loaded component: its manifest plus the source directory it lives in.
#[derive(Debug, Clone)]
pub struct Component {
    manifest: ComponentManifest,
    path: PathBuf,
}

impl Component {
    /// Load the component whose `Component.toml` lives in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let manifest_path = find_manifest(dir)?;
        let manifest = ComponentManifest::load(&manifest_path)?;
        Ok(Self::new(manifest, normalize_path(dir)))
    }

    /// Create a component from an already parsed manifest.
    pub fn new(manifest: ComponentManifest, path: PathBuf) -> Self {
        Component { manifest, path }
    }

    /// Component name.
    pub fn name(&self) -> &str {
        self.manifest.name()
    }

    /// Component version.
    pub fn version(&self) -> &Version {
        &self.manifest.version
    }

    /// Source directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed manifest.
    pub fn manifest(&self) -> &ComponentManifest {
        &self.manifest
    }

    /// Directory searched first for this component's own dependencies.
    pub fn modules_path(&self) -> PathBuf {
        self.path.join(MODULES_DIR_NAME)
    }

    /// Declared dependencies (name -> requirement) when building for `target`.
    pub fn dependency_specs(&self, target: &Target) -> BTreeMap<String, String> {
        self.manifest.dependencies_for(target.name())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.path == other.path
    }
}

impl Eq for Component {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_component_load() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("Component.toml"),
            "[component]\nname = \"libA\"\nversion = \"2.0.1\"\n\n[dependencies]\nlibB = \"*\"\n",
        )
        .unwrap();

        let component = Component::load(tmp.path()).unwrap();
        assert_eq!(component.name(), "libA");
        assert_eq!(component.version(), &Version::new(2, 0, 1));
        assert_eq!(component.to_string(), "libA");
        assert!(component.path().is_absolute());
        assert!(component.modules_path().ends_with("components"));

        let target = Target::new("native", "/tc/native.cmake").unwrap();
        let deps = component.dependency_specs(&target);
        assert_eq!(deps.keys().collect::<Vec<_>>(), vec!["libB"]);
    }

    #[test]
    fn test_component_load_without_manifest() {
        let tmp = TempDir::new().unwrap();
        let err = Component::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }
}
