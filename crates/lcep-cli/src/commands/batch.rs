use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use lcep_batch::{
    jobs_from_scenarios, load_batch_manifest, run_batch, BatchRunnerConfig, BatchSummary, JobStatus,
};
use lcep_cli::manifest::{record_manifest, RunInputs};
use lcep_io::load_settlements;
use lcep_scenarios::{load_spec_from_path, materialize_scenarios, resolve_scenarios};
use tabwriter::TabWriter;
use tracing::info;

use crate::commands::util::{load_config, log_diagnostics};

pub struct BatchArgs<'a> {
    pub settlements: &'a Path,
    pub scenarios: &'a Path,
    pub config: Option<&'a Path>,
    pub out: &'a Path,
    pub threads: usize,
}

pub fn handle(args: &BatchArgs<'_>) -> Result<()> {
    let base = load_config(args.config)?;
    let set = load_spec_from_path(args.scenarios)?;
    let resolved = resolve_scenarios(&set, &base)?;
    let artifacts = materialize_scenarios(&args.out.join("scenarios"), &resolved)?;
    info!(scenarios = artifacts.len(), "resolved scenario set");

    let imported = load_settlements(args.settlements)?;
    log_diagnostics(&imported.diagnostics);
    if imported.settlements.is_empty() {
        return Err(anyhow!(
            "no settlements could be read from '{}'",
            args.settlements.display()
        ));
    }

    let config = BatchRunnerConfig {
        jobs: jobs_from_scenarios(&resolved),
        settlements: imported.settlements,
        settlements_file: args.settlements.display().to_string(),
        output_root: PathBuf::from(args.out),
        threads: args.threads,
    };
    let summary = run_batch(&config)?;
    print_batch_summary(&summary)?;
    if let Some(best) = load_batch_manifest(&summary.manifest_path)?.least_investment() {
        println!(
            "Lowest investment: {} ({:.0} USD)",
            best.scenario_id,
            best.total_investment_usd.unwrap_or_default()
        );
    }

    let manifest = record_manifest(
        args.out,
        &RunInputs {
            command: "batch",
            settlements: args.settlements,
            config: args.config,
        },
        &[summary.manifest_path.clone()],
        &[
            ("scenarios", args.scenarios.display().to_string()),
            ("threads", args.threads.to_string()),
            ("success", summary.success.to_string()),
            ("failure", summary.failure.to_string()),
        ],
    )?;
    println!("Recorded run manifest {}", manifest.display());

    if summary.failure > 0 {
        return Err(anyhow!("{} of {} batch jobs failed", summary.failure, summary.jobs.len()));
    }
    Ok(())
}

fn print_batch_summary(summary: &BatchSummary) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "JOB\tSTATUS\tPLANNED\tGRID\tMINIGRID\tSHS\tINVESTMENT (USD)")?;
    for job in &summary.jobs {
        let share = |tech: &str| job.technology_shares.get(tech).copied().unwrap_or(0.0) * 100.0;
        let status = match job.status {
            JobStatus::Ok => "ok",
            JobStatus::Error => "error",
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.1}%\t{:.1}%\t{:.1}%\t{:.0}",
            job.job_id,
            status,
            job.planned,
            share("Grid"),
            share("MiniGrid"),
            share("SHS"),
            job.total_investment_usd.unwrap_or(0.0)
        )?;
    }
    writer.flush()?;
    println!("Batch manifest {}", summary.manifest_path.display());
    for job in summary.jobs.iter().filter(|j| j.status == JobStatus::Error) {
        println!(
            "  failed {} - {}",
            job.job_id,
            job.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
