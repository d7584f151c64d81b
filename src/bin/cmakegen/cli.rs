//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// cmakegen - out-of-source CMake build trees for component-based projects
#[derive(Parser)]
#[command(name = "cmakegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate CMakeLists.txt files for the component and its dependencies
    Generate(GenerateArgs),

    /// Show where each component would be built, without writing anything
    Tree(TreeArgs),

    /// Remove generated build files
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// How the target is specified on the command line.
#[derive(Args, Clone)]
pub struct TargetArgs {
    /// Directory containing a Target.toml
    #[arg(long, conflicts_with_all = ["target", "toolchain"])]
    pub target_dir: Option<PathBuf>,

    /// Target name
    #[arg(long, requires = "toolchain")]
    pub target: Option<String>,

    /// CMake toolchain file for --target
    #[arg(long, requires = "target")]
    pub toolchain: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Build root (defaults to build/<target> in the component)
    #[arg(long, env = "CMAKEGEN_BUILD_DIR")]
    pub build_dir: Option<PathBuf>,

    /// Component directory (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Build root to show paths under
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Component directory (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Only remove the build root of this target
    #[arg(long)]
    pub target: Option<String>,

    /// Directory to remove instead of the default build directory
    #[arg(long, conflicts_with = "target")]
    pub build_dir: Option<PathBuf>,

    /// Component directory (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
