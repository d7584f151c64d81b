//! Resolution against installed component directories.
//!
//! A dependency `name` is installed if some searched directory contains
//! `<dir>/<name>/Component.toml` declaring that same name. Directories are
//! searched in this order:
//!
//! 1. components already made available elsewhere in the tree
//! 2. the component's own modules directory
//! 3. modules directories of previously visited components, nearest first
//! 4. extra search paths from configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::VersionReq;

use crate::core::{Component, ManifestError, Target};
use crate::resolver::{ComponentMap, DependencyMap, Resolver};

/// Resolver that looks for installed components on disk.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    extra_paths: Vec<PathBuf>,
}

impl SearchPathResolver {
    /// Create a resolver with no extra search paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add directories searched after every traversal-derived directory.
    pub fn with_extra_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.extra_paths.extend(paths);
        self
    }

    fn find_installed(
        &self,
        name: &str,
        component: &Component,
        search_dirs: &[PathBuf],
    ) -> Result<Option<Component>> {
        let own = component.modules_path();
        let candidates = std::iter::once(own.as_path())
            .chain(search_dirs.iter().rev().map(PathBuf::as_path))
            .chain(self.extra_paths.iter().map(PathBuf::as_path));

        for dir in candidates {
            if let Some(found) = load_candidate(&dir.join(name), name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

/// Load the component installed at `dir`, if it is the one called `name`.
fn load_candidate(dir: &Path, name: &str) -> Result<Option<Component>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    match Component::load(dir) {
        Ok(component) if component.name() == name => {
            tracing::debug!("found `{}` at {}", name, dir.display());
            Ok(Some(component))
        }
        Ok(component) => {
            tracing::debug!(
                "skipping {}: manifest declares `{}`, not `{}`",
                dir.display(),
                component.name(),
                name
            );
            Ok(None)
        }
        Err(ManifestError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to load component `{}`", name)),
    }
}

/// Warn when an installed version falls outside what the dependent asked for.
fn check_requirement(dependent: &Component, found: &Component, requirement: &str) {
    match requirement.parse::<VersionReq>() {
        Ok(req) if !req.matches(found.version()) => tracing::warn!(
            "`{}` requires {} {}, but {} is installed",
            dependent,
            found,
            req,
            found.version()
        ),
        Ok(_) => {}
        Err(_) => tracing::debug!(
            "`{}` has an unparseable requirement `{}` on `{}`",
            dependent,
            requirement,
            found
        ),
    }
}

impl Resolver for SearchPathResolver {
    fn resolve(
        &self,
        component: &Component,
        available: &ComponentMap,
        search_dirs: &[PathBuf],
        target: &Target,
    ) -> Result<DependencyMap> {
        let mut resolved = DependencyMap::new();

        for (name, requirement) in component.dependency_specs(target) {
            let found = match available.get(&name) {
                Some(c) => Some(c.clone()),
                None => self.find_installed(&name, component, search_dirs)?,
            };
            if let Some(ref found) = found {
                check_requirement(component, found, &requirement);
            }
            resolved.insert(name, found);
        }

        Ok(resolved)
    }
}
