//! Solar PV + battery mini-grid with its own LV network.
//!
//! Sizing:
//! - battery: `autonomy_days` of average daily demand over usable depth of
//!   discharge
//! - PV: average load over the solar capacity factor, oversized
//! - inverter: design peak × sizing margin
//!
//! Batteries wear out before the rest of the plant, so every replacement
//! inside the project life is discounted to today and folded into capital
//! before annualizing.

use lcep_core::{
    CostDetail, DemandProfile, KilowattHours, Kilowatts, PlanningConfig, Technology,
    TechnologyCostResult, Usd,
};

use crate::finance::{annualize, present_value, replacement_years};

/// PV, storage and inverter ratings for a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiniGridSizing {
    pub pv_kw: Kilowatts,
    pub battery_kwh: KilowattHours,
    pub inverter_kw: Kilowatts,
}

pub fn size_minigrid(profile: &DemandProfile, config: &PlanningConfig) -> MiniGridSizing {
    let m = &config.minigrid;
    let projected = profile.annual_kwh_total_projected;
    MiniGridSizing {
        pv_kw: projected.average_power() / m.capacity_factor * m.pv_oversizing,
        battery_kwh: projected.daily() * m.autonomy_days / m.depth_of_discharge,
        inverter_kw: profile.design_peak_kw * m.inverter_sizing,
    }
}

/// Discounted cost of all battery replacements inside the project life.
pub fn battery_replacement_pv(battery_cost: Usd, config: &PlanningConfig) -> Usd {
    let m = &config.minigrid;
    let rate = config.minigrid_discount_rate();
    replacement_years(m.battery_life_years, m.lifetime_years)
        .map(|year| present_value(battery_cost, rate, year))
        .sum()
}

pub fn cost_minigrid(profile: &DemandProfile, config: &PlanningConfig) -> TechnologyCostResult {
    let m = &config.minigrid;
    let households = profile.households as f64;
    let sizing = size_minigrid(profile, config);

    let pv = Usd(m.pv_cost_per_kw * sizing.pv_kw.value());
    let battery = Usd(m.battery_cost_per_kwh * sizing.battery_kwh.value());
    let inverter = Usd(m.inverter_cost_per_kw * sizing.inverter_kw.value());
    // Priced like the grid's LV network
    let lv = Usd(config.grid.lv_cost_per_km * m.lv_km_per_household * households);
    let drops = Usd(m.connection_cost_per_household * households);
    let replacements = battery_replacement_pv(battery, config);
    let capital = pv + battery + inverter + lv + drops + replacements;

    let annualized_capex = annualize(capital, config.minigrid_discount_rate(), m.lifetime_years);
    let annualized = annualized_capex * (1.0 + m.om_fraction);

    TechnologyCostResult::new(
        Technology::MiniGrid,
        capital,
        annualized,
        profile.annual_kwh_total_projected,
        true,
        CostDetail::MiniGrid {
            pv_kw: sizing.pv_kw,
            battery_kwh: sizing.battery_kwh,
            inverter_kw: sizing.inverter_kw,
            battery_replacements: replacements,
        },
    )
}
