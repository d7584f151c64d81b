//! `cmakegen tree` command

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::Result;

use super::resolve_target;
use crate::cli::TreeArgs;
use cmakegen::generator::PlannedScript;
use cmakegen::ops::{plan, GenerateOptions, GenerationPlan};
use cmakegen::util::fs::relative_path;
use cmakegen::util::GlobalContext;

/// How a dependency appears below its dependent.
enum Edge<'a> {
    Built(&'a PlannedScript),
    Elsewhere,
    Missing,
}

pub fn execute(ctx: &GlobalContext, args: TreeArgs) -> Result<i32> {
    let target = resolve_target(ctx, &args.target)?;

    let plan = plan(
        ctx,
        &GenerateOptions {
            component_dir: args.path,
            target,
            build_dir: args.build_dir,
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else if let Some(root) = plan.scripts.first() {
        // Each component has exactly one script, keyed by its build dir
        let by_dir: HashMap<PathBuf, &PlannedScript> = plan
            .scripts
            .iter()
            .map(|s| (s.build_dir.clone(), s))
            .collect();
        print_tree(&plan, &by_dir, root, 0);
    }

    Ok(if plan.missing.is_empty() { 0 } else { 1 })
}

fn print_tree(
    plan: &GenerationPlan,
    by_dir: &HashMap<PathBuf, &PlannedScript>,
    script: &PlannedScript,
    depth: usize,
) {
    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };
    let location = relative_path(&plan.build_root, &script.build_dir);
    let location = if location.as_os_str().is_empty() {
        ".".to_string()
    } else {
        location.display().to_string()
    };
    println!(
        "{}{} v{} [{}]",
        prefix, script.component, script.version, location
    );

    let mut edges: BTreeMap<&str, Edge<'_>> = BTreeMap::new();
    for name in &script.new_dependencies {
        match by_dir.get(&script.build_dir.join(name)) {
            Some(&child) => edges.insert(name.as_str(), Edge::Built(child)),
            None => edges.insert(name.as_str(), Edge::Elsewhere),
        };
    }
    for name in &script.available_dependencies {
        edges.insert(name.as_str(), Edge::Elsewhere);
    }
    for missing in plan.missing.iter().filter(|m| m.dependent == script.component) {
        edges.insert(missing.name.as_str(), Edge::Missing);
    }

    let child_prefix = format!("{}├── ", "│   ".repeat(depth));
    for (name, edge) in edges {
        match edge {
            Edge::Built(child) => print_tree(plan, by_dir, child, depth + 1),
            Edge::Elsewhere => println!("{}{} (*)", child_prefix, name),
            Edge::Missing => println!("{}{} (missing)", child_prefix, name),
        }
    }
}
