//! Least-cost selection across the three candidates.

use lcep_core::{LcepError, LcepResult, SettlementResult, TechnologyCostResult};

/// Pick the eligible candidate with the lowest LCOE.
///
/// Arguments come in preference order and only a strictly lower LCOE
/// displaces an earlier candidate, so exact ties go to Grid, then MiniGrid.
/// Ineligible candidates report `None` for their LCOE.
pub fn select(
    settlement_id: &str,
    grid: &TechnologyCostResult,
    minigrid: &TechnologyCostResult,
    shs: &TechnologyCostResult,
) -> LcepResult<SettlementResult> {
    let mut best: Option<(&TechnologyCostResult, f64)> = None;
    for candidate in [grid, minigrid, shs] {
        let Some(lcoe) = candidate.competing_lcoe() else {
            continue;
        };
        if best.map_or(true, |(_, current)| lcoe.value() < current) {
            best = Some((candidate, lcoe.value()));
        }
    }

    let (winner, _) = best.ok_or_else(|| LcepError::NoEligibleTechnology {
        settlement_id: settlement_id.to_string(),
    })?;

    Ok(SettlementResult {
        settlement_id: settlement_id.to_string(),
        optimal_tech: winner.technology,
        // competing_lcoe() was Some for the winner
        optimal_lcoe: winner.lcoe.unwrap_or_default(),
        total_investment: winner.capital_cost,
        lcoe_grid: grid.competing_lcoe(),
        lcoe_minigrid: minigrid.competing_lcoe(),
        lcoe_shs: shs.competing_lcoe(),
    })
}
