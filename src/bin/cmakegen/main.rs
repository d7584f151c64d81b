//! cmakegen CLI - CMake build tree generator

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use cmakegen::GlobalContext;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("cmakegen=debug")
    } else {
        EnvFilter::new("cmakegen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(&ctx, args),
        Commands::Tree(args) => commands::tree::execute(&ctx, args),
        Commands::Clean(args) => commands::clean::execute(&ctx, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
