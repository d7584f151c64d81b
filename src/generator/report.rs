//! What a generation run produced.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// A declared dependency that no searched directory provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    /// The dependency that could not be found
    pub name: String,
    /// The component declaring it
    pub dependent: String,
    /// Manifest of the declaring component
    pub manifest_path: PathBuf,
}

impl MissingDependency {
    /// Render as a CLI diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_location(&self.manifest_path)
            .with_suggestion(suggestions::MISSING_DEPENDENCY)
    }
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Required dependency \"{}\" of \"{}\" is not installed.",
            self.name, self.dependent
        )
    }
}

/// One build script written (or planned) during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedScript {
    /// Component the script builds
    pub component: String,
    /// Directory the script lives in
    pub build_dir: PathBuf,
    /// Full path of the script
    pub path: PathBuf,
}

/// Outcome of a complete traversal.
///
/// Scripts and missing dependencies are both in traversal order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
    pub scripts: Vec<GeneratedScript>,
    pub missing: Vec<MissingDependency>,
}

impl GenerateReport {
    /// Whether every declared dependency was found.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_message() {
        let missing = MissingDependency {
            name: "libB".into(),
            dependent: "app".into(),
            manifest_path: PathBuf::from("/src/app/Component.toml"),
        };

        assert_eq!(
            missing.to_string(),
            "Required dependency \"libB\" of \"app\" is not installed."
        );

        let rendered = missing.to_diagnostic().format(false);
        assert!(rendered.starts_with("error: Required dependency \"libB\" of \"app\""));
        assert!(rendered.contains("--> /src/app/Component.toml"));
    }
}
