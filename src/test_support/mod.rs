//! Test fixtures for component trees.
//!
//! # Example
//!
//! ```rust,ignore
//! use cmakegen::test_support::ComponentFixture;
//!
//! let app = ComponentFixture::new("app").dep("libA").write(&tmp.path().join("app"));
//! ComponentFixture::new("libA").write(&app.join("components/libA"));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::Target;
use crate::generator::BUILD_SCRIPT_NAME;
use crate::util::fs::normalize_path;

/// The target most tests generate for.
pub fn native_target() -> Target {
    Target::new("native", "/toolchains/native.cmake").unwrap()
}

/// Builder for a component directory on disk.
#[derive(Debug, Clone)]
pub struct ComponentFixture {
    name: String,
    deps: Vec<String>,
    target_deps: BTreeMap<String, Vec<String>>,
    nested: Vec<String>,
}

impl ComponentFixture {
    /// A component with no dependencies, version 1.0.0.
    pub fn new(name: impl Into<String>) -> Self {
        ComponentFixture {
            name: name.into(),
            deps: Vec::new(),
            target_deps: BTreeMap::new(),
            nested: Vec::new(),
        }
    }

    /// Declare a dependency for every target.
    pub fn dep(mut self, name: impl Into<String>) -> Self {
        self.deps.push(name.into());
        self
    }

    /// Declare a dependency for one target only.
    pub fn target_dep(mut self, target: impl Into<String>, name: impl Into<String>) -> Self {
        self.target_deps
            .entry(target.into())
            .or_default()
            .push(name.into());
        self
    }

    /// Add a source subdirectory with its own CMakeLists.txt.
    pub fn nested_project(mut self, subdir: impl Into<String>) -> Self {
        self.nested.push(subdir.into());
        self
    }

    /// Manifest text for this fixture.
    pub fn manifest(&self) -> String {
        let mut manifest = format!(
            "[component]\nname = \"{}\"\nversion = \"1.0.0\"\n\n[dependencies]\n",
            self.name
        );
        for dep in &self.deps {
            manifest.push_str(&format!("{} = \"*\"\n", dep));
        }
        for (target, deps) in &self.target_deps {
            manifest.push_str(&format!("\n[target-dependencies.{}]\n", target));
            for dep in deps {
                manifest.push_str(&format!("{} = \"*\"\n", dep));
            }
        }
        manifest
    }

    /// Write the component into `dir` and return its canonical path.
    pub fn write(&self, dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("Component.toml"), self.manifest()).unwrap();
        for subdir in &self.nested {
            let sub = dir.join(subdir);
            fs::create_dir_all(&sub).unwrap();
            fs::write(
                sub.join(BUILD_SCRIPT_NAME),
                format!("add_executable({}-{} main.c)\n", self.name, subdir),
            )
            .unwrap();
        }
        normalize_path(dir)
    }
}
