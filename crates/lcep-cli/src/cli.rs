use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use lcep_scenarios::ConfigFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lcep", author, version, about = "Least-cost electrification planning", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan every settlement in a dataset and write the electrification plan
    Plan {
        /// Settlements file (.csv, .geojson or .json)
        #[arg(long, value_hint = ValueHint::FilePath)]
        settlements: PathBuf,
        /// Planning configuration (.toml, .yaml or .json); defaults if omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Output directory for plan tables and the run manifest
        #[arg(long, value_hint = ValueHint::DirPath)]
        out_dir: PathBuf,
        /// Worker threads ("auto" or a number)
        #[arg(long, default_value = "auto")]
        threads: String,
        /// Also write the full plans as JSON
        #[arg(long)]
        json: bool,
        /// Also write plan and demand tables as GeoJSON on the input geometries
        #[arg(long)]
        geojson: bool,
    },
    /// Run a scenario set over one settlement dataset
    Batch {
        #[arg(long, value_hint = ValueHint::FilePath)]
        settlements: PathBuf,
        /// Scenario set (.yaml or .json)
        #[arg(long, value_hint = ValueHint::FilePath)]
        scenarios: PathBuf,
        /// Base planning configuration the scenarios override
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        #[arg(long, value_hint = ValueHint::DirPath)]
        out: PathBuf,
        /// Scenarios run concurrently (0 = one per CPU)
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },
    /// Planning configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the default configuration
    Defaults {
        #[arg(long, value_enum, default_value_t = FormatArg::Toml)]
        format: FormatArg,
    },
    /// Load and validate a configuration file
    Validate {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Toml,
    Yaml,
    Json,
}

impl From<FormatArg> for ConfigFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Toml => ConfigFormat::Toml,
            FormatArg::Yaml => ConfigFormat::Yaml,
            FormatArg::Json => ConfigFormat::Json,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn parses_plan_arguments() {
        let cli = Cli::try_parse_from([
            "lcep",
            "plan",
            "--settlements",
            "s.csv",
            "--out-dir",
            "out",
            "--threads",
            "4",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Plan { threads, json, geojson, config, .. }) => {
                assert_eq!(threads, "4");
                assert!(json);
                assert!(!geojson);
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
