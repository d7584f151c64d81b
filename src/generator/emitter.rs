//! CMakeLists.txt synthesis for a single component.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{Component, Target};
use crate::generator::template::Template;
use crate::resolver::ComponentMap;
use crate::util::fs::{ensure_dir, subdirectory_names, write_string};

/// File name of every generated (and every recognised nested) build script.
pub const BUILD_SCRIPT_NAME: &str = "CMakeLists.txt";

/// Source subdirectories never treated as nested CMake projects.
pub const IGNORED_SUBDIRS: &[&str] = &["build"];

const CMAKELISTS_TEMPLATE: &str = r#"#
#
# NOTE: This file is generated by cmakegen: changes will be overwritten!
#
#
cmake_minimum_required(VERSION 2.8)

# toolchain file for $target_name
set(CMAKE_TOOLCHAIN_FILE $toolchain_file)

project($component_name)

# include own root directory
$include_own_dir

# include root directories of all components we depend on
$include_root_dirs

# Some components need to export system header files with no prefix
include_directories(SYSTEM $${CMAKEGEN_SYSTEM_INCLUDE_DIRS})

# recurse into dependencies that aren't built elsewhere
$add_depend_subdirs

# recurse into subdirectories for this component, using the two-argument
# add_subdirectory because the directories referred to here exist in the source
# tree, not the working directory
$add_own_subdirs

"#;

/// Receives one call per component visited by the walker.
pub trait Emit {
    /// Produce the build script for `component` in `build_dir`.
    ///
    /// `new_deps` are the dependencies that get a subordinate build
    /// directory under `build_dir`; `all_deps` is every resolved
    /// dependency, including those built elsewhere in the tree.
    /// Returns the path of the script.
    fn emit(
        &mut self,
        build_dir: &Path,
        component: &Component,
        new_deps: &ComponentMap,
        all_deps: &ComponentMap,
    ) -> Result<PathBuf>;
}

/// Writes real `CMakeLists.txt` files.
#[derive(Debug, Clone)]
pub struct CMakeEmitter {
    target: Target,
    template: Template,
    ignored_subdirs: BTreeSet<String>,
}

impl CMakeEmitter {
    /// Create an emitter for `target` with the default ignored subdirectories.
    pub fn new(target: Target) -> Self {
        CMakeEmitter {
            target,
            template: Template::new(CMAKELISTS_TEMPLATE),
            ignored_subdirs: IGNORED_SUBDIRS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Ignore additional source subdirectory names.
    pub fn ignore_subdirs(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_subdirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Render the script for `component` without touching the output tree.
    pub fn render(
        &self,
        build_dir: &Path,
        component: &Component,
        new_deps: &ComponentMap,
        all_deps: &ComponentMap,
    ) -> Result<String> {
        let include_own_dir = include_directories(component.path());

        let include_root_dirs: String = all_deps
            .values()
            .map(|dep| include_directories(dep.path()))
            .collect();

        let add_depend_subdirs: String = new_deps
            .keys()
            .map(|name| format!("add_subdirectory(\"{}\")\n", cmake_path(&build_dir.join(name))))
            .collect();

        let add_own_subdirs: String = self
            .nested_projects(component.path())?
            .iter()
            .map(|subdir| {
                format!(
                    "add_subdirectory(\n    \"{}\"\n    \"{}\"\n)\n",
                    cmake_path(&component.path().join(subdir)),
                    cmake_path(&build_dir.join(subdir))
                )
            })
            .collect();

        let values = BTreeMap::from([
            ("target_name", self.target.name().to_string()),
            ("toolchain_file", cmake_path(self.target.toolchain_file())),
            ("component_name", component.name().to_string()),
            ("include_own_dir", include_own_dir),
            ("include_root_dirs", include_root_dirs),
            ("add_depend_subdirs", add_depend_subdirs),
            ("add_own_subdirs", add_own_subdirs),
        ]);

        self.template
            .render(&values)
            .with_context(|| format!("failed to render build script for `{}`", component))
    }

    /// Direct subdirectories of `source_dir` holding their own build script.
    fn nested_projects(&self, source_dir: &Path) -> Result<Vec<String>> {
        Ok(subdirectory_names(source_dir)?
            .into_iter()
            .filter(|name| !self.ignored_subdirs.contains(name))
            .filter(|name| source_dir.join(name).join(BUILD_SCRIPT_NAME).is_file())
            .collect())
    }
}

impl Emit for CMakeEmitter {
    fn emit(
        &mut self,
        build_dir: &Path,
        component: &Component,
        new_deps: &ComponentMap,
        all_deps: &ComponentMap,
    ) -> Result<PathBuf> {
        let contents = self.render(build_dir, component, new_deps, all_deps)?;

        ensure_dir(build_dir)?;
        let script = build_dir.join(BUILD_SCRIPT_NAME);
        write_string(&script, &contents)?;

        tracing::debug!("wrote {}", script.display());
        Ok(script)
    }
}

fn include_directories(path: &Path) -> String {
    format!("include_directories(\"{}\")\n", cmake_path(path))
}

/// CMake wants forward slashes on every platform.
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
