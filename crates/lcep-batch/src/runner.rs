use crate::job::{BatchJob, BatchJobRecord, JobStatus};
use crate::manifest::{write_batch_manifest, BatchManifest};
use anyhow::{Context, Result};
use lcep_algo::{plan_all, PlanSummary};
use lcep_core::{SettlementInput, Technology};
use lcep_io::{write_plan_csv, PLAN_CSV};
use lcep_scenarios::manifest::sanitize_name;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct BatchRunnerConfig {
    pub jobs: Vec<BatchJob>,
    /// Shared by every job; each job only reads it
    pub settlements: Vec<SettlementInput>,
    /// Recorded in the manifest
    pub settlements_file: String,
    pub output_root: PathBuf,
    /// 0 = one thread per CPU
    pub threads: usize,
}

pub struct BatchSummary {
    pub success: usize,
    pub failure: usize,
    pub manifest_path: PathBuf,
    pub jobs: Vec<BatchJobRecord>,
}

/// Run every job on a dedicated rayon pool. A failing job is recorded in
/// the manifest and does not stop the others.
pub fn run_batch(config: &BatchRunnerConfig) -> Result<BatchSummary> {
    fs::create_dir_all(&config.output_root).with_context(|| {
        format!(
            "creating batch output root '{}'",
            config.output_root.display()
        )
    })?;

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for batch runs")?;

    info!(
        jobs = config.jobs.len(),
        settlements = config.settlements.len(),
        threads = thread_count,
        "starting batch"
    );
    let job_records: Vec<BatchJobRecord> = pool.install(|| {
        config
            .jobs
            .par_iter()
            .map(|job| run_job(job, config))
            .collect()
    });

    let manifest = BatchManifest::new(
        config.settlements_file.clone(),
        config.settlements.len(),
        job_records,
    );
    let manifest_path = config.output_root.join("batch_manifest.json");
    write_batch_manifest(&manifest_path, &manifest)?;
    info!(
        success = manifest.success,
        failure = manifest.failure,
        "batch finished"
    );
    Ok(BatchSummary {
        success: manifest.success,
        failure: manifest.failure,
        manifest_path,
        jobs: manifest.jobs,
    })
}

/// Plan the dataset under one scenario and write its plan table to
/// `<output_root>/<scenario_id>/`.
fn run_job(job: &BatchJob, config: &BatchRunnerConfig) -> BatchJobRecord {
    let output_file = config
        .output_root
        .join(sanitize_name(&job.scenario_id))
        .join(PLAN_CSV);

    let runner = || -> Result<(usize, usize, PlanSummary)> {
        let outcome = plan_all(&config.settlements, &job.config)
            .with_context(|| format!("planning scenario '{}'", job.scenario_id))?;
        for rejection in &outcome.rejected {
            warn!(
                job = %job.job_id,
                settlement = %rejection.settlement_id,
                "rejected: {}",
                rejection.reason
            );
        }
        write_plan_csv(&output_file, &outcome.plans)?;
        Ok((
            outcome.plans.len(),
            outcome.rejected.len(),
            PlanSummary::from_plans(&outcome.plans),
        ))
    };

    let mut record = BatchJobRecord {
        job_id: job.job_id.clone(),
        scenario_id: job.scenario_id.clone(),
        status: JobStatus::Ok,
        error: None,
        output: output_file.display().to_string(),
        planned: 0,
        rejected: 0,
        total_investment_usd: None,
        technology_shares: Default::default(),
    };
    match runner() {
        Ok((planned, rejected, summary)) => {
            info!(job = %job.job_id, planned, rejected, "batch job finished");
            record.planned = planned;
            record.rejected = rejected;
            record.total_investment_usd = Some(summary.total_investment.value());
            record.technology_shares = Technology::ALL
                .iter()
                .map(|t| (t.as_str().to_string(), summary.share(*t)))
                .collect();
        }
        Err(err) => {
            warn!(job = %job.job_id, "batch job failed: {err:#}");
            record.status = JobStatus::Error;
            record.error = Some(format!("{err:#}"));
        }
    }
    record
}
