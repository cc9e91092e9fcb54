use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::job::{BatchJobRecord, JobStatus};

/// `batch_manifest.json`: one record per scenario job plus run-level counts.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    pub settlements_file: String,
    pub num_settlements: usize,
    pub num_jobs: usize,
    pub success: usize,
    pub failure: usize,
    pub jobs: Vec<BatchJobRecord>,
}

impl BatchManifest {
    pub fn new(
        settlements_file: impl Into<String>,
        num_settlements: usize,
        jobs: Vec<BatchJobRecord>,
    ) -> Self {
        let success = jobs.iter().filter(|j| j.status == JobStatus::Ok).count();
        Self {
            created_at: Utc::now(),
            settlements_file: settlements_file.into(),
            num_settlements,
            num_jobs: jobs.len(),
            success,
            failure: jobs.len() - success,
            jobs,
        }
    }

    /// The successful scenario needing the least total investment.
    pub fn least_investment(&self) -> Option<&BatchJobRecord> {
        self.jobs
            .iter()
            .filter(|j| j.status == JobStatus::Ok)
            .filter_map(|j| j.total_investment_usd.map(|usd| (j, usd)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(job, _)| job)
    }
}

pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating batch manifest '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest)
        .with_context(|| format!("writing batch manifest '{}'", path.display()))?;
    writer.flush()?;
    Ok(())
}

pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = File::open(path)
        .with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing batch manifest '{}'", path.display()))
}
