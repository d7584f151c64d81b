//! Command implementations

pub mod clean;
pub mod completions;
pub mod generate;
pub mod tree;

use anyhow::{anyhow, bail, Result};
use miette::Diagnostic as _;

use crate::cli::TargetArgs;
use cmakegen::core::TargetError;
use cmakegen::util::diagnostic::suggestions;
use cmakegen::util::GlobalContext;
use cmakegen::Target;

/// Build the target named on the command line.
pub fn resolve_target(ctx: &GlobalContext, args: &TargetArgs) -> Result<Target> {
    let target = match (&args.target_dir, &args.target, &args.toolchain) {
        (Some(dir), _, _) => Target::load(&ctx.resolve_path(dir)),
        (None, Some(name), Some(toolchain)) if toolchain.as_os_str().is_empty() => {
            Target::new(name.clone(), toolchain.clone())
        }
        (None, Some(name), Some(toolchain)) => {
            Target::new(name.clone(), ctx.resolve_path(toolchain))
        }
        _ => bail!("no target specified\n{}", suggestions::NO_TARGET),
    };
    target.map_err(with_help)
}

/// Attach the diagnostic's help text, when it has one.
fn with_help(e: TargetError) -> anyhow::Error {
    let help = e.help().map(|help| help.to_string());
    match help {
        Some(help) => anyhow!("{}\nhelp: {}", e, help),
        None => e.into(),
    }
}
