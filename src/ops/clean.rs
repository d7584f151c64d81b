//! Implementation of `cmakegen clean`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::Component;
use crate::ops::generate::{build_root_for, check_outside_source, find_root};
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::GlobalContext;

/// Options for the clean command.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Directory of (or below) the root component; defaults to cwd
    pub component_dir: Option<PathBuf>,

    /// Only remove this target's build root
    pub target_name: Option<String>,

    /// Explicit directory to remove
    pub build_dir: Option<PathBuf>,
}

/// What `clean` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutcome {
    /// The build directory that was targeted
    pub dir: PathBuf,
    /// Whether it existed and was removed
    pub removed: bool,
}

/// Remove generated build files.
pub fn clean(ctx: &GlobalContext, opts: &CleanOptions) -> Result<CleanOutcome> {
    let root_dir = find_root(ctx, opts.component_dir.as_deref())?;
    let root = Component::load(&root_dir)?;

    let dir = match opts.build_dir {
        Some(ref dir) => ctx.resolve_path(dir),
        None => {
            let config = ctx.load_config(root.path());
            build_root_for(root.path(), &config, opts.target_name.as_deref())
        }
    };

    let dir = check_outside_source(&root, &dir, "remove")?;
    let removed = dir.exists();

    tracing::debug!("removing {}", dir.display());
    remove_dir_all_if_exists(&dir)?;
    Ok(CleanOutcome { dir, removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ComponentFixture;
    use tempfile::TempDir;

    #[test]
    fn test_clean_single_target() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app").write(&tmp.path().join("app"));
        std::fs::create_dir_all(app.join("build/native")).unwrap();
        std::fs::create_dir_all(app.join("build/k64f")).unwrap();

        let ctx = GlobalContext::with_cwd(app.clone());
        let outcome = clean(
            &ctx,
            &CleanOptions {
                target_name: Some("native".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(outcome.dir, app.join("build/native"));
        assert!(outcome.removed);
        assert!(!app.join("build/native").exists());
        assert!(app.join("build/k64f").exists());
    }

    #[test]
    fn test_clean_refuses_source_dir() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app").write(&tmp.path().join("app"));

        let ctx = GlobalContext::with_cwd(app.clone());
        let err = clean(
            &ctx,
            &CleanOptions {
                build_dir: Some(PathBuf::from(".")),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("refusing to remove"));
        assert!(app.join("Component.toml").exists());
    }

    #[test]
    fn test_clean_without_build_dir() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app").write(&tmp.path().join("app"));

        let ctx = GlobalContext::with_cwd(app.clone());
        let outcome = clean(&ctx, &CleanOptions::default()).unwrap();

        assert_eq!(outcome.dir, app.join("build"));
        assert!(!outcome.removed);
    }
}
