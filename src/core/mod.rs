//! Core data structures for cmakegen.
//!
//! This module contains the read-only inputs of a generation run:
//! - Component manifests and loaded components
//! - Target descriptions

pub mod component;
pub mod manifest;
pub mod target;

pub use component::{Component, MODULES_DIR_NAME};
pub use manifest::{find_manifest, ComponentManifest, ManifestError, MANIFEST_NAME};
pub use target::{Target, TargetError, TARGET_MANIFEST_NAME};
