//! `cmakegen clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use cmakegen::ops::{clean, CleanOptions};
use cmakegen::util::diagnostic::{self, Diagnostic};
use cmakegen::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: CleanArgs) -> Result<i32> {
    let outcome = clean(
        ctx,
        &CleanOptions {
            component_dir: args.path,
            target_name: args.target,
            build_dir: args.build_dir,
        },
    )?;

    if outcome.removed {
        eprintln!("     Removed {}", outcome.dir.display());
    } else {
        diagnostic::emit(
            &Diagnostic::warning(format!(
                "nothing to clean: {} does not exist",
                outcome.dir.display()
            )),
            ctx.color(),
        );
    }
    Ok(0)
}
