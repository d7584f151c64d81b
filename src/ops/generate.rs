//! Implementation of `cmakegen generate` and `cmakegen tree`.

use std::path::{Component as PathComponent, Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use crate::core::{Component, Target};
use crate::generator::{
    BuildGraphWalker, CMakeEmitter, GenerateReport, MissingDependency, PlannedScript,
    RecordingEmitter,
};
use crate::resolver::SearchPathResolver;
use crate::util::config::Config;
use crate::util::diagnostic::suggestions;
use crate::util::fs::normalize_path;
use crate::util::GlobalContext;

/// Directory, relative to the root component, holding per-target build roots.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Options for generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory of (or below) the root component; defaults to cwd
    pub component_dir: Option<PathBuf>,

    /// Target to generate for
    pub target: Target,

    /// Explicit build root, overriding `<build_dir>/<target>`
    pub build_dir: Option<PathBuf>,
}

/// Result of a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPlan {
    pub target: String,
    pub build_root: PathBuf,
    /// Scripts in visiting order; the first one is the root component
    pub scripts: Vec<PlannedScript>,
    pub missing: Vec<MissingDependency>,
}

/// Everything needed to walk one root component.
struct Session {
    root: Component,
    build_root: PathBuf,
    resolver: SearchPathResolver,
    ignored_subdirs: Vec<String>,
}

impl Session {
    fn prepare(ctx: &GlobalContext, opts: &GenerateOptions) -> Result<Self> {
        let root_dir = find_root(ctx, opts.component_dir.as_deref())?;
        let root = Component::load(&root_dir)?;
        let config = ctx.load_config(root.path());

        let build_root = match opts.build_dir {
            Some(ref dir) => ctx.resolve_path(dir),
            None => build_root_for(root.path(), &config, Some(opts.target.name())),
        };
        let build_root = check_outside_source(&root, &build_root, "generate into")?;

        let mut ignored_subdirs = config.generate.ignored_subdirs.clone();
        ignored_subdirs.extend(configured_build_dir_name(&config));
        ignored_subdirs.extend(first_segment_below(root.path(), &build_root));

        let search_paths = config
            .generate
            .search_paths
            .iter()
            .map(|p| resolve_against(root.path(), p));

        Ok(Session {
            resolver: SearchPathResolver::new().with_extra_paths(search_paths),
            root,
            build_root,
            ignored_subdirs,
        })
    }
}

/// Generate the CMake build tree for the root component.
///
/// Missing dependencies are returned in the report, not as an error; the
/// caller decides what they mean for the exit status.
pub fn generate(ctx: &GlobalContext, opts: &GenerateOptions) -> Result<GenerateReport> {
    let session = Session::prepare(ctx, opts)?;

    tracing::debug!(
        "generating `{}` into {}",
        session.root,
        session.build_root.display()
    );

    let mut emitter =
        CMakeEmitter::new(opts.target.clone()).ignore_subdirs(session.ignored_subdirs);
    BuildGraphWalker::new(
        &session.resolver,
        &mut emitter,
        &opts.target,
        &session.build_root,
    )
    .run(&session.root)
    .with_context(|| format!("failed to generate build files for `{}`", session.root))
}

/// Walk the tree without writing anything.
pub fn plan(ctx: &GlobalContext, opts: &GenerateOptions) -> Result<GenerationPlan> {
    let session = Session::prepare(ctx, opts)?;

    let mut recorder = RecordingEmitter::new();
    let report = BuildGraphWalker::new(
        &session.resolver,
        &mut recorder,
        &opts.target,
        &session.build_root,
    )
    .run(&session.root)?;

    Ok(GenerationPlan {
        target: opts.target.name().to_string(),
        build_root: session.build_root,
        scripts: recorder.into_scripts(),
        missing: report.missing,
    })
}

/// Locate the root component directory at or above `start`.
pub(crate) fn find_root(ctx: &GlobalContext, start: Option<&Path>) -> Result<PathBuf> {
    ctx.find_component_root(start)
        .map_err(|e| anyhow!("{}\n{}", e, suggestions::NO_MANIFEST))
}

/// The build root for `target_name` below a component root, or the
/// directory holding every target's build root when no target is given.
pub fn build_root_for(root_dir: &Path, config: &Config, target_name: Option<&str>) -> PathBuf {
    let base = match config.generate.build_dir {
        Some(ref dir) => resolve_against(root_dir, dir),
        None => root_dir.join(DEFAULT_BUILD_DIR),
    };
    match target_name {
        Some(name) => base.join(name),
        None => base,
    }
}

/// Normalize `dir` and make sure it does not contain the root component.
pub(crate) fn check_outside_source(root: &Component, dir: &Path, action: &str) -> Result<PathBuf> {
    let normalized = normalize_path(dir);
    if root.path().starts_with(&normalized) {
        bail!(
            "refusing to {} {}: it contains the component `{}`",
            action,
            dir.display(),
            root
        );
    }
    Ok(normalized)
}

/// Name of the directory directly below `root` that holds `dir`, if any.
fn first_segment_below(root: &Path, dir: &Path) -> Option<String> {
    match dir.strip_prefix(root).ok()?.components().next()? {
        PathComponent::Normal(name) => name.to_str().map(str::to_string),
        _ => None,
    }
}

/// First segment of a relative configured build dir, which must not be
/// picked up as a nested source project.
fn configured_build_dir_name(config: &Config) -> Option<String> {
    let dir = config.generate.build_dir.as_ref()?;
    match dir.components().next()? {
        PathComponent::Normal(name) => name.to_str().map(str::to_string),
        _ => None,
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
