//! Dependency resolution.
//!
//! A resolver maps each dependency a component declares to an installed
//! component, or to `None` when nothing suitable is installed. Version
//! requirements are never solved here.

pub mod search;

pub use search::SearchPathResolver;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::{Component, Target};

/// Resolved components keyed by name, iterated in name order.
pub type ComponentMap = BTreeMap<String, Component>;

/// Resolution result for one component: every declared dependency name,
/// mapped to the installed component or `None` if it is not installed.
pub type DependencyMap = BTreeMap<String, Option<Component>>;

/// Something that can find the installed dependencies of a component.
pub trait Resolver {
    /// Resolve the dependencies `component` declares for `target`.
    ///
    /// Names already in `available` must resolve to the available
    /// component. `search_dirs` holds the modules directories of every
    /// component visited so far, in visiting order.
    ///
    /// An `Err` is reserved for broken inputs (an unreadable or malformed
    /// manifest); a dependency that simply isn't there is `None`.
    fn resolve(
        &self,
        component: &Component,
        available: &ComponentMap,
        search_dirs: &[PathBuf],
        target: &Target,
    ) -> Result<DependencyMap>;
}
