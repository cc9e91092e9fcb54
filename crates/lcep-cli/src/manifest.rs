use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a CLI run read and wrote, stored next to its outputs as
/// `run-<uuid>.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub command: String,
    pub version: String,
    pub timestamp: String,
    pub settlements_file: String,
    /// Config file path, or "defaults"
    pub config: String,
    pub outputs: Vec<String>,
    #[serde(default)]
    pub params: Vec<Param>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

/// Inputs of a run, before it is given an id.
pub struct RunInputs<'a> {
    pub command: &'a str,
    pub settlements: &'a Path,
    pub config: Option<&'a Path>,
}

pub fn record_manifest(
    out_dir: &Path,
    inputs: &RunInputs<'_>,
    outputs: &[PathBuf],
    params: &[(&str, String)],
) -> Result<PathBuf> {
    let run_id = Uuid::new_v4().to_string();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let manifest = RunManifest {
        run_id: run_id.clone(),
        command: inputs.command.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        settlements_file: inputs.settlements.display().to_string(),
        config: inputs
            .config
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string()),
        outputs: outputs.iter().map(|p| p.display().to_string()).collect(),
        params: params
            .iter()
            .map(|(name, value)| Param {
                name: name.to_string(),
                value: value.clone(),
            })
            .collect(),
    };
    let path = out_dir.join(format!("run-{run_id}.json"));
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading run manifest {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("parsing run manifest {}", path.display()))
}
