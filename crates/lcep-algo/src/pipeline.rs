//! Per-settlement pipeline and the dataset-wide map.
//!
//! Each settlement runs through classify → project → cost → select with
//! nothing but a shared `&PlanningConfig`; the dataset map is therefore an
//! embarrassingly parallel `par_iter` when the `parallel` feature is on.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use lcep_core::{
    LcepError, LcepResult, PlanningConfig, SettlementInput, SettlementPlan, SettlementResult,
};
use serde::{Deserialize, Serialize};

use crate::costing::cost_all;
use crate::demand::project;
use crate::select::select;
use crate::tier::classify;

/// Plan one settlement.
pub fn plan_settlement(
    settlement: &SettlementInput,
    config: &PlanningConfig,
) -> LcepResult<SettlementPlan> {
    settlement.validate()?;

    let classification = classify(settlement, config);
    let profile = project(settlement, classification, config);

    let result = if profile.is_zero_demand() {
        SettlementResult::zero_demand(&settlement.settlement_id)
    } else {
        let candidates = cost_all(settlement, &profile, config);
        select(
            &settlement.settlement_id,
            &candidates.grid,
            &candidates.minigrid,
            &candidates.shs,
        )?
    };

    Ok(SettlementPlan {
        settlement_id: settlement.settlement_id.clone(),
        population: settlement.population,
        profile,
        result,
    })
}

/// A settlement left out of the plan, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub settlement_id: String,
    pub reason: String,
}

/// Plans in input order plus the settlements that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub plans: Vec<SettlementPlan>,
    pub rejected: Vec<Rejection>,
}

impl PlanOutcome {
    fn collect(results: Vec<(String, LcepResult<SettlementPlan>)>) -> LcepResult<Self> {
        let mut outcome = PlanOutcome::default();
        for (settlement_id, result) in results {
            match result {
                Ok(plan) => outcome.plans.push(plan),
                Err(LcepError::InvalidInput { reason, .. }) => {
                    outcome.rejected.push(Rejection {
                        settlement_id,
                        reason,
                    })
                }
                Err(fatal) => return Err(fatal),
            }
        }
        Ok(outcome)
    }
}

/// Plan every settlement. Invalid records are rejected individually;
/// any other error aborts the run.
pub fn plan_all(
    settlements: &[SettlementInput],
    config: &PlanningConfig,
) -> LcepResult<PlanOutcome> {
    #[cfg(feature = "parallel")]
    let results: Vec<_> = settlements
        .par_iter()
        .map(|s| (s.settlement_id.clone(), plan_settlement(s, config)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = settlements
        .iter()
        .map(|s| (s.settlement_id.clone(), plan_settlement(s, config)))
        .collect();

    PlanOutcome::collect(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcep_core::{Technology, UsdPerKwh};

    #[test]
    fn test_zero_population_defaults_to_grid() {
        let config = PlanningConfig::default();
        let plan = plan_settlement(&SettlementInput::new("empty", 0.0), &config).unwrap();
        assert_eq!(plan.result.optimal_tech, Technology::Grid);
        assert_eq!(plan.result.optimal_lcoe, UsdPerKwh::ZERO);
        assert!(plan.result.lcoe_grid.is_none());
        assert!(plan.result.lcoe_minigrid.is_none());
        assert!(plan.result.lcoe_shs.is_none());
    }

    #[test]
    fn test_invalid_rows_are_rejected_not_fatal() {
        let config = PlanningConfig::default();
        let mut bad = SettlementInput::new("bad", 100.0);
        bad.distance_to_grid_km = -1.0;
        let rows = vec![
            SettlementInput::new("a", 400.0).with_grid_distances(5.0, 30.0),
            bad,
            SettlementInput::new("c", 900.0).with_grid_distances(1.0, 20.0),
        ];
        let outcome = plan_all(&rows, &config).unwrap();
        let ids: Vec<_> = outcome.plans.iter().map(|p| p.settlement_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].settlement_id, "bad");
    }

    #[test]
    fn test_plan_all_preserves_order() {
        let config = PlanningConfig::default();
        let rows: Vec<_> = (0..200)
            .map(|i| {
                SettlementInput::new(format!("s{i}"), 100.0 + i as f64 * 37.0)
                    .with_grid_distances(i as f64 * 0.5, 40.0)
            })
            .collect();
        let outcome = plan_all(&rows, &config).unwrap();
        assert!(outcome.rejected.is_empty());
        for (row, plan) in rows.iter().zip(&outcome.plans) {
            assert_eq!(row.settlement_id, plan.settlement_id);
        }
    }
}
