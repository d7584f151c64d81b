//! Dry-run emission: record what would be generated without writing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::Component;
use crate::generator::emitter::{Emit, BUILD_SCRIPT_NAME};
use crate::resolver::ComponentMap;

/// One build script the walker asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedScript {
    pub component: String,
    pub version: String,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Dependencies materialized under `build_dir`
    pub new_dependencies: Vec<String>,
    /// Dependencies only referenced by include path
    pub available_dependencies: Vec<String>,
}

/// Emitter that records every request in visiting order.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    scripts: Vec<PlannedScript>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_scripts(self) -> Vec<PlannedScript> {
        self.scripts
    }
}

impl Emit for RecordingEmitter {
    fn emit(
        &mut self,
        build_dir: &Path,
        component: &Component,
        new_deps: &ComponentMap,
        all_deps: &ComponentMap,
    ) -> Result<PathBuf> {
        self.scripts.push(PlannedScript {
            component: component.name().to_string(),
            version: component.version().to_string(),
            source_dir: component.path().to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            new_dependencies: new_deps.keys().cloned().collect(),
            available_dependencies: all_deps
                .keys()
                .filter(|name| !new_deps.contains_key(*name))
                .cloned()
                .collect(),
        });
        Ok(build_dir.join(BUILD_SCRIPT_NAME))
    }
}
