use lcep_core::PlanningConfig;
use lcep_scenarios::ResolvedScenario;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One planning run: a scenario's configuration applied to the shared
/// settlement dataset.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub job_id: String,
    pub scenario_id: String,
    pub tags: Vec<String>,
    pub config: PlanningConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJobRecord {
    pub job_id: String,
    pub scenario_id: String,
    pub status: JobStatus,
    pub error: Option<String>,
    pub output: String,
    #[serde(default)]
    pub planned: usize,
    #[serde(default)]
    pub rejected: usize,
    pub total_investment_usd: Option<f64>,
    /// Share of planned settlements per optimal technology
    #[serde(default)]
    pub technology_shares: BTreeMap<String, f64>,
}

pub fn jobs_from_scenarios(scenarios: &[ResolvedScenario]) -> Vec<BatchJob> {
    scenarios
        .iter()
        .map(|scenario| BatchJob {
            job_id: format!("plan:{}", scenario.scenario_id),
            scenario_id: scenario.scenario_id.clone(),
            tags: scenario.tags.clone(),
            config: scenario.config.clone(),
        })
        .collect()
}
