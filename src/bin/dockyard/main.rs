//! Dockyard CLI - a build-plan generator for C/C++ components

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use dockyard::util::diagnostic::emit;
use dockyard::util::GlobalContext;
use dockyard::PlanError;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<PlanError>() {
            Some(plan_error) => emit(&plan_error.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging; stdout carries only the plan
    let filter = if cli.verbose {
        EnvFilter::new("dockyard=debug")
    } else {
        EnvFilter::new("dockyard=info")
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

    let manifest = cli.manifest.as_deref();

    match cli.command {
        Commands::Plan(args) => commands::plan::execute(&ctx, manifest, args),
        Commands::Linkplan(args) => commands::linkplan::execute(&ctx, manifest, args),
        Commands::Tree(args) => commands::tree::execute(&ctx, manifest, args),
        Commands::Check(args) => commands::check::execute(&ctx, manifest, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
