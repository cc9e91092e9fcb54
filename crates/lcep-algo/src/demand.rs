//! Demand estimation: households, residential baseline, anchor loads,
//! projection to the planning horizon and the design peak.
//!
//! ```text
//! households        = ceil(population / household_size(urban))
//! base              = households × tier_kwh[tier]
//! anchors           = Σ rule.units × rule.kwh_per_unit   (rules that fire)
//! units             = basis / per, floored or rounded up, at least 1
//! current           = base + anchors
//! projected         = current × ((1 + g_pop) × (1 + g_cons))^horizon
//! design_peak_kw    = projected / (8760 × load_factor[tier])
//! ```
//!
//! Growth compounds sequentially: population and per-capita consumption each
//! grow at their own rate and the yearly multiplier is their product.

use lcep_core::{
    AnchorContribution, AnchorRule, AnchorTrigger, Classification, DemandProfile, KilowattHours,
    PlanningConfig, ScalingBasis, SettlementInput,
};

/// Settlement facts the anchor predicates look at.
#[derive(Debug, Clone, Copy)]
pub struct AnchorContext {
    pub population: f64,
    pub households: u64,
    pub buildings: f64,
    pub urban: bool,
    pub near_water: bool,
    pub in_cashew_belt: bool,
    pub has_health_facility: bool,
    pub has_school: bool,
}

impl AnchorContext {
    pub fn new(
        settlement: &SettlementInput,
        households: u64,
        urban: bool,
        config: &PlanningConfig,
    ) -> Self {
        Self {
            population: settlement.population,
            households,
            buildings: settlement.building_count,
            urban,
            near_water: settlement.near_water(&config.anchors),
            in_cashew_belt: settlement.in_cashew_belt(&config.anchors),
            has_health_facility: settlement.has_health_facility,
            has_school: settlement.has_school,
        }
    }

    fn trigger_holds(&self, trigger: AnchorTrigger) -> bool {
        match trigger {
            AnchorTrigger::Always => true,
            AnchorTrigger::HealthFacility => self.has_health_facility,
            AnchorTrigger::School => self.has_school,
            AnchorTrigger::NearWater => self.near_water,
            AnchorTrigger::CashewBelt => self.in_cashew_belt,
        }
    }

    fn basis(&self, basis: ScalingBasis) -> f64 {
        match basis {
            ScalingBasis::Population => self.population,
            ScalingBasis::Households => self.households as f64,
            ScalingBasis::Buildings => self.buildings,
        }
    }
}

/// Contribution of one rule, or `None` when its predicate does not hold.
pub fn evaluate_anchor(rule: &AnchorRule, ctx: &AnchorContext) -> Option<AnchorContribution> {
    if !ctx.trigger_holds(rule.trigger)
        || ctx.population <= rule.min_population
        || (rule.rural_only && ctx.urban)
    {
        return None;
    }
    let units = match &rule.scaling {
        None => 1,
        Some(scaling) => scaling.units(ctx.basis(scaling.basis)),
    };
    Some(AnchorContribution {
        kind: rule.kind,
        units,
        annual_kwh: KilowattHours(units as f64 * rule.kwh_per_unit),
    })
}

/// All anchors that fire, in rule order. Rules are independent and additive.
pub fn anchor_loads(ctx: &AnchorContext, config: &PlanningConfig) -> Vec<AnchorContribution> {
    config
        .anchors
        .rules
        .iter()
        .filter_map(|rule| evaluate_anchor(rule, ctx))
        .collect()
}

/// Households, never zero for a populated settlement.
pub fn households(population: f64, urban: bool, config: &PlanningConfig) -> u64 {
    if population <= 0.0 {
        return 0;
    }
    let size = config.classification.household_size(urban);
    (population / size).ceil().max(1.0) as u64
}

/// Demand multiplier between the base year and `horizon_years` later.
///
/// Validated configs have non-negative rates, so this is at least 1.
pub fn growth_factor(config: &PlanningConfig, horizon_years: u32) -> f64 {
    let p = &config.planning;
    ((1.0 + p.population_growth) * (1.0 + p.consumption_growth)).powi(horizon_years as i32)
}

/// Build the demand profile at the configured horizon.
pub fn project(
    settlement: &SettlementInput,
    classification: Classification,
    config: &PlanningConfig,
) -> DemandProfile {
    project_to(
        settlement,
        classification,
        config,
        config.planning.horizon_years,
    )
}

/// Build the demand profile at an explicit horizon.
pub fn project_to(
    settlement: &SettlementInput,
    classification: Classification,
    config: &PlanningConfig,
    horizon_years: u32,
) -> DemandProfile {
    let Classification { urban, tier } = classification;
    let households = households(settlement.population, urban, config);
    if households == 0 {
        return DemandProfile::zero(classification, horizon_years);
    }

    let base = KilowattHours(households as f64 * config.tiers.annual_kwh(tier));
    let ctx = AnchorContext::new(settlement, households, urban, config);
    let anchors = anchor_loads(&ctx, config);
    let anchor_total: KilowattHours = anchors.iter().map(|a| a.annual_kwh).sum();

    let current = base + anchor_total;
    let projected = current * growth_factor(config, horizon_years);
    let design_peak = projected.peak_power(config.tiers.load_factor(tier));

    DemandProfile {
        households,
        tier,
        urban,
        annual_kwh_base: base,
        annual_kwh_anchor: anchor_total,
        anchors,
        annual_kwh_total_current: current,
        annual_kwh_total_projected: projected,
        design_peak_kw: design_peak,
        horizon_years,
    }
}
