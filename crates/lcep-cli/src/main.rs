use clap::Parser;
use lcep_cli::cli::{Cli, Commands};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::batch::BatchArgs;
use commands::plan::PlanArgs;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {err}");
    }

    let (name, result) = match &cli.command {
        Some(Commands::Plan {
            settlements,
            config,
            out_dir,
            threads,
            json,
            geojson,
        }) => (
            "plan",
            commands::plan::handle(&PlanArgs {
                settlements,
                config: config.as_deref(),
                out_dir,
                threads,
                json: *json,
                geojson: *geojson,
            }),
        ),
        Some(Commands::Batch {
            settlements,
            scenarios,
            config,
            out,
            threads,
        }) => (
            "batch",
            commands::batch::handle(&BatchArgs {
                settlements,
                scenarios,
                config: config.as_deref(),
                out,
                threads: *threads,
            }),
        ),
        Some(Commands::Config { command }) => ("config", commands::config::handle(command)),
        None => {
            info!("No subcommand provided. Use `lcep --help` for more information.");
            return;
        }
    };

    if let Err(err) = result {
        error!("{name} command failed: {err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
