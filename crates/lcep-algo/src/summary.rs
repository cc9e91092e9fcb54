//! Dataset-level roll-up of a plan.

use std::collections::BTreeMap;

use lcep_core::{SettlementPlan, Technology, Usd};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnologyTotals {
    pub settlements: usize,
    pub population: f64,
    pub households: u64,
    pub investment: Usd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub settlements: usize,
    pub by_technology: BTreeMap<Technology, TechnologyTotals>,
    pub total_investment: Usd,
}

impl PlanSummary {
    pub fn from_plans(plans: &[SettlementPlan]) -> Self {
        let mut summary = PlanSummary {
            settlements: plans.len(),
            by_technology: Technology::ALL
                .into_iter()
                .map(|t| (t, TechnologyTotals::default()))
                .collect(),
            total_investment: Usd::ZERO,
        };
        for plan in plans {
            let entry = summary
                .by_technology
                .entry(plan.result.optimal_tech)
                .or_default();
            entry.settlements += 1;
            entry.population += plan.population;
            entry.households += plan.profile.households;
            entry.investment += plan.result.total_investment;
            summary.total_investment += plan.result.total_investment;
        }
        summary
    }

    pub fn totals(&self, technology: Technology) -> TechnologyTotals {
        self.by_technology
            .get(&technology)
            .copied()
            .unwrap_or_default()
    }

    /// Share of settlements assigned to `technology`, 0 for an empty plan.
    pub fn share(&self, technology: Technology) -> f64 {
        if self.settlements == 0 {
            return 0.0;
        }
        self.totals(technology).settlements as f64 / self.settlements as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::plan_all;
    use lcep_core::{PlanningConfig, SettlementInput};

    #[test]
    fn test_totals_add_up() {
        let config = PlanningConfig::default();
        let rows = vec![
            SettlementInput::new("near", 3000.0)
                .with_buildings(600.0)
                .with_grid_distances(1.0, 20.0),
            SettlementInput::new("far", 250.0).with_grid_distances(90.0, 150.0),
            SettlementInput::new("empty", 0.0),
        ];
        let outcome = plan_all(&rows, &config).unwrap();
        let summary = PlanSummary::from_plans(&outcome.plans);
        assert_eq!(summary.settlements, 3);
        let counted: usize = summary.by_technology.values().map(|t| t.settlements).sum();
        assert_eq!(counted, 3);
        let invested: f64 = outcome
            .plans
            .iter()
            .map(|p| p.result.total_investment.value())
            .sum();
        assert!((summary.total_investment.value() - invested).abs() < 1e-6);
        let shares: f64 = Technology::ALL.iter().map(|t| summary.share(*t)).sum();
        assert!((shares - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_plan() {
        let summary = PlanSummary::from_plans(&[]);
        assert_eq!(summary.settlements, 0);
        assert_eq!(summary.share(Technology::Grid), 0.0);
        assert_eq!(summary.total_investment, Usd::ZERO);
    }
}
