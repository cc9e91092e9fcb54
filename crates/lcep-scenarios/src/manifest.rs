use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::config_file::{render_config, ConfigFormat};
use crate::overrides::ParameterOverrides;
use crate::spec::ResolvedScenario;

pub const SCENARIO_MANIFEST: &str = "scenario_manifest.json";
pub const SCENARIO_CONFIG: &str = "planning.toml";

/// Where a resolved scenario's planning configuration was written, and what
/// it changed relative to the base configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioArtifact {
    pub scenario_id: String,
    pub description: Option<String>,
    /// Loadable with `lcep plan --config`
    pub config_file: String,
    #[serde(default)]
    pub changed_parameters: Vec<String>,
    #[serde(default)]
    pub overrides: ParameterOverrides,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Write each resolved configuration as TOML so any scenario can be rerun
/// on its own.
///
/// ```text
/// out_dir/
///   scenario_manifest.json
///   <scenario_id>/
///     planning.toml
/// ```
pub fn materialize_scenarios(
    out_dir: &Path,
    scenarios: &[ResolvedScenario],
) -> Result<Vec<ScenarioArtifact>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating scenario output directory '{}'", out_dir.display()))?;

    let artifacts = scenarios
        .iter()
        .map(|scenario| -> Result<ScenarioArtifact> {
            let scenario_dir = out_dir.join(sanitize_name(&scenario.scenario_id));
            fs::create_dir_all(&scenario_dir).with_context(|| {
                format!("creating scenario directory '{}'", scenario_dir.display())
            })?;
            let config_path = scenario_dir.join(SCENARIO_CONFIG);
            let text = render_config(&scenario.config, ConfigFormat::Toml)?;
            fs::write(&config_path, text)
                .with_context(|| format!("writing '{}'", config_path.display()))?;
            Ok(ScenarioArtifact {
                scenario_id: scenario.scenario_id.clone(),
                description: scenario.description.clone(),
                config_file: config_path.display().to_string(),
                changed_parameters: scenario
                    .overrides
                    .changed()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                overrides: scenario.overrides.clone(),
                tags: scenario.tags.clone(),
                metadata: scenario.metadata.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    write_manifest(&out_dir.join(SCENARIO_MANIFEST), &artifacts)?;
    Ok(artifacts)
}

pub fn write_manifest(path: &Path, artifacts: &[ScenarioArtifact]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating scenario manifest '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, artifacts)
        .with_context(|| format!("writing scenario manifest '{}'", path.display()))?;
    writer.flush()?;
    Ok(())
}

pub fn load_manifest(path: &Path) -> Result<Vec<ScenarioArtifact>> {
    let file = File::open(path)
        .with_context(|| format!("opening scenario manifest '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing scenario manifest '{}'", path.display()))
}

/// Directory-safe form of a scenario id.
pub fn sanitize_name(value: &str) -> String {
    let name: String = value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect();
    if matches!(name.as_str(), "" | "." | "..") {
        "scenario".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_scenario_ids() {
        assert_eq!(sanitize_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_name("high growth"), "high-growth");
        assert_eq!(sanitize_name(""), "scenario");
        assert_eq!(sanitize_name(".."), "scenario");
    }
}
