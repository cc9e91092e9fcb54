//! Technology costing. The three sub-models are independent; each turns a
//! demand profile into a [`TechnologyCostResult`].

mod grid;
mod minigrid;
mod shs;

pub use grid::{connection_route, cost_grid, transformer_kva};
pub use minigrid::{battery_replacement_pv, cost_minigrid, size_minigrid, MiniGridSizing};
pub use shs::{choose_kit, cost_shs, ShsGate};

use lcep_core::{DemandProfile, PlanningConfig, SettlementInput, TechnologyCostResult};

/// One result per technology.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates {
    pub grid: TechnologyCostResult,
    pub minigrid: TechnologyCostResult,
    pub shs: TechnologyCostResult,
}

impl Candidates {
    /// Candidates in tie-break preference order.
    pub fn iter(&self) -> impl Iterator<Item = &TechnologyCostResult> {
        [&self.grid, &self.minigrid, &self.shs].into_iter()
    }
}

pub fn cost_all(
    settlement: &SettlementInput,
    profile: &DemandProfile,
    config: &PlanningConfig,
) -> Candidates {
    Candidates {
        grid: cost_grid(settlement, profile, config),
        minigrid: cost_minigrid(profile, config),
        shs: cost_shs(profile, config),
    }
}
