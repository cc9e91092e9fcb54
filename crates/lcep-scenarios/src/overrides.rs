use anyhow::{anyhow, Result};
use lcep_core::PlanningConfig;
use serde::{Deserialize, Serialize};

/// Parameters a scenario may change relative to the base configuration.
///
/// Every field is optional; `None` keeps whatever the layer below says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterOverrides {
    pub discount_rate: Option<f64>,
    pub horizon_years: Option<u32>,
    pub population_growth: Option<f64>,
    pub consumption_growth: Option<f64>,
    pub wholesale_tariff: Option<f64>,
    pub grid_loss_factor: Option<f64>,
    pub mv_cost_per_km: Option<f64>,
    pub pv_cost_per_kw: Option<f64>,
    pub battery_cost_per_kwh: Option<f64>,
    /// Multiplies every SHS kit price
    pub shs_cost_multiplier: Option<f64>,
}

impl ParameterOverrides {
    /// Layer `self` over `lower`: fields set here win.
    pub fn over(&self, lower: &ParameterOverrides) -> ParameterOverrides {
        ParameterOverrides {
            discount_rate: self.discount_rate.or(lower.discount_rate),
            horizon_years: self.horizon_years.or(lower.horizon_years),
            population_growth: self.population_growth.or(lower.population_growth),
            consumption_growth: self.consumption_growth.or(lower.consumption_growth),
            wholesale_tariff: self.wholesale_tariff.or(lower.wholesale_tariff),
            grid_loss_factor: self.grid_loss_factor.or(lower.grid_loss_factor),
            mv_cost_per_km: self.mv_cost_per_km.or(lower.mv_cost_per_km),
            pv_cost_per_kw: self.pv_cost_per_kw.or(lower.pv_cost_per_kw),
            battery_cost_per_kwh: self.battery_cost_per_kwh.or(lower.battery_cost_per_kwh),
            shs_cost_multiplier: self.shs_cost_multiplier.or(lower.shs_cost_multiplier),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ParameterOverrides::default()
    }

    /// Names of the parameters this layer sets, in declaration order.
    pub fn changed(&self) -> Vec<&'static str> {
        [
            ("discount_rate", self.discount_rate.is_some()),
            ("horizon_years", self.horizon_years.is_some()),
            ("population_growth", self.population_growth.is_some()),
            ("consumption_growth", self.consumption_growth.is_some()),
            ("wholesale_tariff", self.wholesale_tariff.is_some()),
            ("grid_loss_factor", self.grid_loss_factor.is_some()),
            ("mv_cost_per_km", self.mv_cost_per_km.is_some()),
            ("pv_cost_per_kw", self.pv_cost_per_kw.is_some()),
            ("battery_cost_per_kwh", self.battery_cost_per_kwh.is_some()),
            ("shs_cost_multiplier", self.shs_cost_multiplier.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// Apply overrides to a copy of `base` and validate the result.
pub fn apply_overrides(
    base: &PlanningConfig,
    overrides: &ParameterOverrides,
) -> Result<PlanningConfig> {
    let mut config = base.clone();

    if let Some(rate) = overrides.discount_rate {
        config.planning.discount_rate = rate;
    }
    if let Some(years) = overrides.horizon_years {
        config.planning.horizon_years = years;
    }
    if let Some(g) = overrides.population_growth {
        config.planning.population_growth = g;
    }
    if let Some(g) = overrides.consumption_growth {
        config.planning.consumption_growth = g;
    }
    if let Some(tariff) = overrides.wholesale_tariff {
        config.grid.wholesale_tariff = tariff;
    }
    if let Some(loss) = overrides.grid_loss_factor {
        config.grid.loss_factor = loss;
    }
    if let Some(cost) = overrides.mv_cost_per_km {
        config.grid.mv_cost_per_km = cost;
    }
    if let Some(cost) = overrides.pv_cost_per_kw {
        config.minigrid.pv_cost_per_kw = cost;
    }
    if let Some(cost) = overrides.battery_cost_per_kwh {
        config.minigrid.battery_cost_per_kwh = cost;
    }
    if let Some(multiplier) = overrides.shs_cost_multiplier {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(anyhow!(
                "shs_cost_multiplier must be positive, got {multiplier}"
            ));
        }
        for kit in &mut config.shs.kits {
            kit.upfront_cost *= multiplier;
        }
    }

    config.validate()?;
    Ok(config)
}
