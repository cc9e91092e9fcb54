//! Grid extension: MV line to the nearest connection point, a distribution
//! transformer, LV network and service drops, plus bought-in energy.

use lcep_core::{
    ConnectionPoint, CostDetail, DemandProfile, KilovoltAmperes, PlanningConfig, SettlementInput,
    Technology, TechnologyCostResult, Usd,
};

use crate::finance::annualize;

/// Cheapest way onto the existing network.
///
/// A substation costs as much as `substation_cost / mv_cost_per_km`
/// kilometres of MV line, so connecting there is priced as that extra
/// distance. Both paths then share the same MV annualization.
pub fn connection_route(
    settlement: &SettlementInput,
    config: &PlanningConfig,
) -> (ConnectionPoint, f64) {
    let via_line = settlement.distance_to_grid_km;
    let via_substation =
        settlement.distance_to_substation_km + config.grid.substation_equivalent_km();
    if via_substation < via_line {
        (ConnectionPoint::Substation, via_substation)
    } else {
        (ConnectionPoint::ExistingLine, via_line)
    }
}

/// Transformer rating for the coincident share of the design peak.
pub fn transformer_kva(profile: &DemandProfile, config: &PlanningConfig) -> KilovoltAmperes {
    (profile.design_peak_kw * config.grid.diversity_factor).apparent_power(config.grid.power_factor)
}

pub fn cost_grid(
    settlement: &SettlementInput,
    profile: &DemandProfile,
    config: &PlanningConfig,
) -> TechnologyCostResult {
    let g = &config.grid;
    let households = profile.households as f64;

    let (connection, effective_km) = connection_route(settlement, config);
    let terrain = if settlement.distance_to_road_km > g.road_access_km {
        g.roadless_mv_multiplier
    } else {
        1.0
    };
    let kva = transformer_kva(profile, config);

    let mv = Usd(g.mv_cost_per_km * effective_km * terrain);
    let units = g.transformer_units(kva.value());
    let transformer = Usd(f64::from(units) * g.transformer_unit_cost);
    let lv = Usd(g.lv_cost_per_km * g.lv_km_per_household * households);
    let drops = Usd(g.connection_cost_per_household * households);
    let capital = mv + transformer + lv + drops;

    let energy = profile.annual_kwh_total_projected;
    let purchase = Usd(energy.value() * g.wholesale_tariff * (1.0 + g.loss_factor));
    let annualized = annualize(capital, config.planning.discount_rate, g.lifetime_years)
        + capital * g.om_fraction
        + purchase;

    TechnologyCostResult::new(
        Technology::Grid,
        capital,
        annualized,
        energy,
        true,
        CostDetail::Grid {
            connection,
            effective_mv_km: effective_km,
            transformer_kva: kva,
            transformer_units: units,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::project;
    use crate::finance::capital_recovery_factor;
    use crate::tier::classify;

    fn profile_for(settlement: &SettlementInput, config: &PlanningConfig) -> DemandProfile {
        project(settlement, classify(settlement, config), config)
    }

    #[test]
    fn test_existing_line_preferred_when_close() {
        let config = PlanningConfig::default();
        let settlement = SettlementInput::new("s", 800.0).with_grid_distances(2.0, 10.0);
        let (point, km) = connection_route(&settlement, &config);
        assert_eq!(point, ConnectionPoint::ExistingLine);
        assert_eq!(km, 2.0);
    }

    #[test]
    fn test_substation_penalty_as_equivalent_distance() {
        let config = PlanningConfig::default();
        // 60 km to a line, 5 km to a substation (+35.7 km equivalent)
        let settlement = SettlementInput::new("s", 800.0).with_grid_distances(60.0, 5.0);
        let (point, km) = connection_route(&settlement, &config);
        assert_eq!(point, ConnectionPoint::Substation);
        assert!((km - (5.0 + 500_000.0 / 14_000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_capital_and_annualized_cost() {
        let config = PlanningConfig::default();
        let settlement = SettlementInput::new("s", 1040.0).with_grid_distances(3.0, 500.0);
        let profile = profile_for(&settlement, &config);
        let result = cost_grid(&settlement, &profile, &config);

        let hh = profile.households as f64;
        let kva = profile.design_peak_kw.value() * 0.6;
        let units = (kva / 45.0).ceil();
        let capital = 14_000.0 * 3.0 + 8_000.0 * units + 5_500.0 * 0.05 * hh + 150.0 * hh;
        assert!((result.capital_cost.value() - capital).abs() < 1e-6);
        match result.detail {
            CostDetail::Grid { transformer_units, .. } => {
                assert_eq!(f64::from(transformer_units), units)
            }
            _ => panic!("grid detail expected"),
        }

        let energy = profile.annual_kwh_total_projected.value();
        let annual = capital * capital_recovery_factor(0.08, 40)
            + capital * 0.02
            + energy * 0.10 * 1.18;
        assert!((result.annualized_cost.value() - annual).abs() < 1e-6);
        assert_eq!(result.energy_delivered_kwh, profile.annual_kwh_total_projected);
        assert!(result.eligible);
        assert!((result.lcoe.unwrap().value() - annual / energy).abs() < 1e-12);
    }

    #[test]
    fn test_roadless_settlements_pay_terrain_multiplier() {
        let config = PlanningConfig::default();
        let near_road = SettlementInput::new("a", 600.0).with_grid_distances(10.0, 500.0);
        let no_road = near_road.clone().with_road_distance(25.0);
        let profile = profile_for(&near_road, &config);
        let a = cost_grid(&near_road, &profile, &config);
        let b = cost_grid(&no_road, &profile, &config);
        let extra = 14_000.0 * 10.0 * 0.3;
        assert!((b.capital_cost.value() - a.capital_cost.value() - extra).abs() < 1e-6);
    }

    #[test]
    fn test_zero_demand_has_no_lcoe() {
        let config = PlanningConfig::default();
        let settlement = SettlementInput::new("ghost", 0.0).with_grid_distances(1.0, 1.0);
        let profile = profile_for(&settlement, &config);
        let result = cost_grid(&settlement, &profile, &config);
        assert!(result.lcoe.is_none());
        assert!(!result.eligible);
    }
}
