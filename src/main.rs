mod cli;
mod logging;

use std::process;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use logdel::{config, RunMode, Sweep, SweepOptions};
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let args = Cli::parse();

    let _guard = logging::init_logger(RunMode::from_dry_run(args.dry_run));

    let result = match args.command {
        Some(Commands::PrintConfig) => print_config(&args),
        Some(Commands::Run) | None => run_sweep(&args),
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_sweep(args: &Cli) -> anyhow::Result<()> {
    let options = SweepOptions {
        mode: RunMode::from_dry_run(args.dry_run),
        ordering: args.order,
    };
    if options.mode == RunMode::Preview {
        info!("Running in dry-run mode, no file will be deleted");
    }

    let summary = Sweep::new(options)
        .run_config_dir(&args.conf_dir)
        .with_context(|| format!("cannot run with configuration from {}", args.conf_dir.display()))?;

    info!(
        "Sweep completed in {}",
        format!("{:.2}s", summary.duration.as_secs_f64()).green()
    );
    info!(
        "{} matched, {} previewed, {} removed, {} failed",
        format!("{}", summary.matched()).cyan(),
        format!("{}", summary.previewed()).yellow(),
        format!("{}", summary.removed()).green(),
        format!("{}", summary.failed()).red(),
    );
    if summary.path_errors > 0 || summary.rule_errors > 0 {
        info!(
            "{} path(s) and {} rule(s) skipped",
            format!("{}", summary.path_errors).red(),
            format!("{}", summary.rule_errors).red(),
        );
    }

    Ok(())
}

fn print_config(args: &Cli) -> anyhow::Result<()> {
    let sets = config::load_policies(&args.conf_dir)
        .with_context(|| format!("cannot load configuration from {}", args.conf_dir.display()))?;

    for set in sets {
        println!("{}", set.source.display().to_string().bold());
        for item in &set.items {
            println!("{:#?}", item);
        }
    }

    Ok(())
}
