//! Dependency-graph traversal.
//!
//! The walker visits the tree depth first, in dependency-name order. The
//! first component to reach a dependency materializes it as a subordinate
//! build directory; everyone after that only includes its headers, since
//! CMake rejects a second `add_subdirectory` for the same binary target.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{Component, Target};
use crate::generator::emitter::Emit;
use crate::generator::report::{GenerateReport, GeneratedScript, MissingDependency};
use crate::resolver::{ComponentMap, Resolver};

/// Mutable state shared by every level of one traversal.
#[derive(Debug, Default)]
pub struct TraversalState {
    /// Components whose build script has been emitted somewhere in the tree
    pub available: ComponentMap,
    /// Modules directories of visited components, in visiting order
    pub search_dirs: Vec<PathBuf>,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Drives resolution and emission over a component tree.
pub struct BuildGraphWalker<'a, R: ?Sized, E: ?Sized> {
    resolver: &'a R,
    emitter: &'a mut E,
    target: &'a Target,
    build_root: PathBuf,
}

impl<'a, R, E> BuildGraphWalker<'a, R, E>
where
    R: Resolver + ?Sized,
    E: Emit + ?Sized,
{
    pub fn new(
        resolver: &'a R,
        emitter: &'a mut E,
        target: &'a Target,
        build_root: impl Into<PathBuf>,
    ) -> Self {
        BuildGraphWalker {
            resolver,
            emitter,
            target,
            build_root: build_root.into(),
        }
    }

    /// Generate the whole tree below `root`, starting at the build root.
    ///
    /// The root itself counts as available from the start, so a
    /// dependency cycle back to it ends in an include rather than
    /// unbounded recursion.
    pub fn run(&mut self, root: &Component) -> Result<GenerateReport> {
        tracing::info!("generate for target: {}", self.target);

        let mut state = TraversalState::new();
        state
            .available
            .insert(root.name().to_string(), root.clone());

        let mut report = GenerateReport::default();
        let build_root = self.build_root.clone();
        self.traverse(root, &build_root, &mut state, &mut report)?;
        Ok(report)
    }

    /// Emit `component` into `build_dir`, then recurse into every
    /// dependency it is first to reach.
    ///
    /// Missing dependencies are recorded in `report` and skipped. Any
    /// `Err` (resolver, template, filesystem) aborts the traversal; scripts
    /// written before the failure stay on disk.
    pub fn traverse(
        &mut self,
        component: &Component,
        build_dir: &Path,
        state: &mut TraversalState,
        report: &mut GenerateReport,
    ) -> Result<()> {
        tracing::debug!("generate build files: {}", component);

        let dependencies = self.resolver.resolve(
            component,
            &state.available,
            &state.search_dirs,
            self.target,
        )?;

        let mut resolved = ComponentMap::new();
        for (name, dep) in dependencies {
            match dep {
                Some(dep) => {
                    resolved.insert(name, dep);
                }
                None => report.missing.push(MissingDependency {
                    name,
                    dependent: component.name().to_string(),
                    manifest_path: component.manifest().manifest_path.clone(),
                }),
            }
        }

        let new_deps: ComponentMap = resolved
            .iter()
            .filter(|(name, _)| !state.available.contains_key(*name))
            .map(|(name, dep)| (name.clone(), dep.clone()))
            .collect();

        let script = self
            .emitter
            .emit(build_dir, component, &new_deps, &resolved)?;
        report.scripts.push(GeneratedScript {
            component: component.name().to_string(),
            build_dir: build_dir.to_path_buf(),
            path: script,
        });

        state.available.extend(
            new_deps
                .iter()
                .map(|(name, dep)| (name.clone(), dep.clone())),
        );
        state.search_dirs.push(component.modules_path());

        for (name, dep) in &new_deps {
            self.traverse(dep, &build_dir.join(name), state, report)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    use crate::generator::emitter::{CMakeEmitter, BUILD_SCRIPT_NAME};
    use crate::generator::plan::RecordingEmitter;
    use crate::resolver::SearchPathResolver;
    use crate::test_support::{native_target, ComponentFixture};
    use tempfile::TempDir;

    fn generate(root_dir: &Path, build_root: &Path) -> GenerateReport {
        let root = Component::load(root_dir).unwrap();
        let target = native_target();
        let resolver = SearchPathResolver::new();
        let mut emitter = CMakeEmitter::new(target.clone());
        BuildGraphWalker::new(&resolver, &mut emitter, &target, build_root)
            .run(&root)
            .unwrap()
    }

    fn read_all_scripts(build_root: &Path) -> BTreeMap<PathBuf, String> {
        walkdir::WalkDir::new(build_root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_name() == BUILD_SCRIPT_NAME)
            .map(|e| (e.path().to_path_buf(), fs::read_to_string(e.path()).unwrap()))
            .collect()
    }

    #[test]
    fn test_end_to_end_app_and_lib() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .dep("libA")
            .write(&tmp.path().join("app"));
        let lib_a = ComponentFixture::new("libA")
            .nested_project("tests")
            .write(&app.join("components").join("libA"));
        let build = tmp.path().join("out");

        let report = generate(&app, &build);
        assert!(report.is_complete());

        let scripts = read_all_scripts(&build);
        assert_eq!(scripts.len(), 2);

        let root_script = &scripts[&build.join(BUILD_SCRIPT_NAME)];
        assert!(root_script.contains("project(app)\n"));
        assert!(root_script.contains(&format!("include_directories(\"{}\")", app.display())));
        assert!(root_script.contains(&format!("include_directories(\"{}\")", lib_a.display())));
        assert!(root_script.contains(&format!(
            "add_subdirectory(\"{}\")",
            build.join("libA").display()
        )));

        let lib_script = &scripts[&build.join("libA").join(BUILD_SCRIPT_NAME)];
        assert!(lib_script.contains("project(libA)\n"));
        assert_eq!(lib_script.matches("include_directories(\"").count(), 1);
        assert!(lib_script.contains(&format!(
            "add_subdirectory(\n    \"{}\"\n    \"{}\"\n)",
            lib_a.join("tests").display(),
            build.join("libA").join("tests").display()
        )));
        assert_eq!(lib_script.matches("add_subdirectory(").count(), 1);
    }

    #[test]
    fn test_shared_dependency_materialized_once_under_first_visitor() {
        let tmp = TempDir::new().unwrap();
        let a = ComponentFixture::new("A")
            .dep("B")
            .dep("C")
            .write(&tmp.path().join("A"));
        let b = ComponentFixture::new("B").write(&a.join("components/B"));
        ComponentFixture::new("C")
            .dep("B")
            .write(&a.join("components/C"));
        let build = tmp.path().join("out");

        let report = generate(&a, &build);
        let built: Vec<_> = report.scripts.iter().map(|s| s.component.as_str()).collect();
        assert_eq!(built, vec!["A", "B", "C"]);

        let scripts = read_all_scripts(&build);
        assert_eq!(scripts.len(), 3);
        assert!(scripts.contains_key(&build.join("B").join(BUILD_SCRIPT_NAME)));
        assert!(!build.join("C").join("B").exists());

        let c_script = &scripts[&build.join("C").join(BUILD_SCRIPT_NAME)];
        assert!(c_script.contains(&format!("include_directories(\"{}\")", b.display())));
        assert!(!c_script.contains("add_subdirectory("));
    }

    #[test]
    fn test_every_component_added_exactly_once() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .dep("libA")
            .dep("libB")
            .write(&tmp.path().join("app"));
        let modules = app.join("components");
        ComponentFixture::new("libA").dep("libC").write(&modules.join("libA"));
        ComponentFixture::new("libB")
            .dep("libC")
            .dep("libD")
            .write(&modules.join("libB"));
        ComponentFixture::new("libC").dep("libD").write(&modules.join("libC"));
        ComponentFixture::new("libD").write(&modules.join("libD"));
        let build = tmp.path().join("out");

        let report = generate(&app, &build);
        let scripts = read_all_scripts(&build);
        assert_eq!(scripts.len(), 5);
        assert_eq!(report.scripts.len(), 5);

        for name in ["libA", "libB", "libC", "libD"] {
            let declarations: usize = scripts
                .values()
                .map(|text| {
                    text.lines()
                        .filter(|l| l.starts_with("add_subdirectory(\"") && l.ends_with(&format!("/{name}\")")))
                        .count()
                })
                .sum();
            assert_eq!(declarations, 1, "{name} should be added exactly once");
        }

        // Depth first: libC is reached through libA, libD through libC
        assert!(build.join("libA/libC/libD").join(BUILD_SCRIPT_NAME).is_file());
    }

    #[test]
    fn test_missing_dependency_reported_and_skipped() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .dep("libA")
            .dep("ghost")
            .write(&tmp.path().join("app"));
        ComponentFixture::new("libA").write(&app.join("components/libA"));
        let build = tmp.path().join("out");

        let report = generate(&app, &build);

        assert_eq!(report.missing.len(), 1);
        assert_eq!(
            report.missing[0].to_string(),
            "Required dependency \"ghost\" of \"app\" is not installed."
        );
        assert_eq!(report.scripts.len(), 2);

        let root_script = fs::read_to_string(build.join(BUILD_SCRIPT_NAME)).unwrap();
        assert!(!root_script.contains("ghost"));
    }

    #[test]
    fn test_regeneration_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .dep("libA")
            .nested_project("tools")
            .write(&tmp.path().join("app"));
        ComponentFixture::new("libA")
            .nested_project("tests")
            .write(&app.join("components/libA"));
        let build = tmp.path().join("out");

        generate(&app, &build);
        let first = read_all_scripts(&build);
        generate(&app, &build);
        let second = read_all_scripts(&build);

        assert_eq!(first, second);
    }

    #[test]
    fn test_cycle_back_to_root_terminates() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .dep("libA")
            .write(&tmp.path().join("app"));
        ComponentFixture::new("libA")
            .dep("app")
            .write(&app.join("components/libA"));

        let root = Component::load(&app).unwrap();
        let target = native_target();
        let resolver = SearchPathResolver::new();
        let mut recorder = RecordingEmitter::new();
        let report = BuildGraphWalker::new(&resolver, &mut recorder, &target, "/out")
            .run(&root)
            .unwrap();

        assert!(report.is_complete());
        let plan = recorder.into_scripts();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].component, "libA");
        assert!(plan[1].new_dependencies.is_empty());
        assert_eq!(plan[1].available_dependencies, vec!["app"]);
    }

    #[test]
    fn test_target_dependencies_are_followed() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .target_dep("native", "hal")
            .target_dep("k64f", "cmsis")
            .write(&tmp.path().join("app"));
        ComponentFixture::new("hal").write(&app.join("components/hal"));

        let report = generate(&app, &tmp.path().join("out"));
        assert!(report.is_complete());
        let built: Vec<_> = report.scripts.iter().map(|s| s.component.as_str()).collect();
        assert_eq!(built, vec!["app", "hal"]);
    }

    #[test]
    fn test_emit_failure_aborts_traversal() {
        let tmp = TempDir::new().unwrap();
        let app = ComponentFixture::new("app")
            .dep("libA")
            .write(&tmp.path().join("app"));
        ComponentFixture::new("libA").write(&app.join("components/libA"));
        let build = tmp.path().join("out");
        fs::create_dir_all(&build).unwrap();
        // A file where libA's build directory should go
        fs::write(build.join("libA"), "").unwrap();

        let root = Component::load(&app).unwrap();
        let target = native_target();
        let resolver = SearchPathResolver::new();
        let mut emitter = CMakeEmitter::new(target.clone());
        let result = BuildGraphWalker::new(&resolver, &mut emitter, &target, &build).run(&root);

        assert!(result.is_err());
        // The root script was written before the failure
        assert!(build.join(BUILD_SCRIPT_NAME).is_file());
    }
}
