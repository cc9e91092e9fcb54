use anyhow::{anyhow, Context, Result};
use lcep_core::PlanningConfig;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::manifest::sanitize_name;
use crate::overrides::{apply_overrides, ParameterOverrides};

/// A family of planning runs over the same settlement dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub version: Option<u32>,
    /// Settlements file the set was designed for; the CLI may override it.
    pub settlements_file: Option<String>,
    #[serde(default)]
    pub defaults: ScenarioDefaults,
    #[serde(default)]
    pub scenarios: Vec<ScenarioSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioDefaults {
    #[serde(default)]
    pub overrides: ParameterOverrides,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub scenario_id: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub overrides: ParameterOverrides,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl ScenarioSpec {
    pub fn new(scenario_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            description: None,
            tags: None,
            overrides: ParameterOverrides::default(),
            metadata: None,
        }
    }
}

/// A scenario with its fully built, validated configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedScenario {
    pub scenario_id: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub metadata: HashMap<String, String>,
    pub overrides: ParameterOverrides,
    pub config: PlanningConfig,
}

pub fn load_spec_from_path(path: &Path) -> Result<ScenarioSet> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading scenario set '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing scenario set yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing scenario set json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing scenario set"),
    }
}

/// Resolve every scenario against `base`.
///
/// Scenario overrides win over set defaults, which win over `base`.
pub fn resolve_scenarios(set: &ScenarioSet, base: &PlanningConfig) -> Result<Vec<ResolvedScenario>> {
    if set.scenarios.is_empty() {
        return Err(anyhow!("scenario set contains no scenarios"));
    }
    let defaults = &set.defaults;
    let mut seen = HashSet::new();
    // Output directory name -> the id that claimed it
    let mut dirs: HashMap<String, &str> = HashMap::new();
    let mut resolved = Vec::with_capacity(set.scenarios.len());
    for scenario in &set.scenarios {
        if scenario.scenario_id.trim().is_empty() {
            return Err(anyhow!("scenario_id cannot be empty"));
        }
        if !seen.insert(scenario.scenario_id.clone()) {
            return Err(anyhow!(
                "duplicate scenario_id '{}' in scenario set",
                scenario.scenario_id
            ));
        }
        let dir = sanitize_name(&scenario.scenario_id);
        if let Some(other) = dirs.insert(dir.clone(), &scenario.scenario_id) {
            return Err(anyhow!(
                "scenario ids '{}' and '{}' both map to output directory '{}'",
                other,
                scenario.scenario_id,
                dir
            ));
        }
        let overrides = scenario.overrides.over(&defaults.overrides);
        let config = apply_overrides(base, &overrides)
            .with_context(|| format!("building config for scenario '{}'", scenario.scenario_id))?;
        resolved.push(ResolvedScenario {
            scenario_id: scenario.scenario_id.clone(),
            description: scenario.description.clone(),
            tags: scenario
                .tags
                .clone()
                .unwrap_or_else(|| defaults.tags.clone()),
            metadata: scenario
                .metadata
                .clone()
                .unwrap_or_else(|| defaults.metadata.clone()),
            overrides,
            config,
        });
    }
    Ok(resolved)
}

pub fn validate(set: &ScenarioSet, base: &PlanningConfig) -> Result<()> {
    resolve_scenarios(set, base).map(|_| ())
}
