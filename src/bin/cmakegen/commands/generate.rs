//! `cmakegen generate` command

use anyhow::Result;

use super::resolve_target;
use crate::cli::GenerateArgs;
use cmakegen::ops::{generate, GenerateOptions};
use cmakegen::util::diagnostic;
use cmakegen::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: GenerateArgs) -> Result<i32> {
    let target = resolve_target(ctx, &args.target)?;

    let report = generate(
        ctx,
        &GenerateOptions {
            component_dir: args.path,
            target,
            build_dir: args.build_dir,
        },
    )?;

    for missing in &report.missing {
        diagnostic::emit(&missing.to_diagnostic(), ctx.color());
    }

    if ctx.is_verbose() {
        for script in &report.scripts {
            eprintln!("       Wrote {}", script.path.display());
        }
    }

    if let Some(root) = report.scripts.first() {
        eprintln!(
            "   Generated {} build script{} in {}",
            report.scripts.len(),
            if report.scripts.len() == 1 { "" } else { "s" },
            root.build_dir.display()
        );
    }

    if report.is_complete() {
        Ok(0)
    } else {
        eprintln!(
            "error: {} required dependenc{} not installed",
            report.missing.len(),
            if report.missing.len() == 1 { "y is" } else { "ies are" }
        );
        Ok(1)
    }
}
