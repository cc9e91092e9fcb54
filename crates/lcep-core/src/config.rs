//! Planning parameters.
//!
//! [`PlanningConfig`] is built once per run, validated, and then only ever
//! borrowed by the pipeline stages. Every section carries `#[serde(default)]`
//! so a parameter file may name only the keys it changes:
//!
//! ```toml
//! [planning]
//! discount_rate = 0.10
//!
//! [grid]
//! mv_cost_per_km = 16000
//! ```
//!
//! Defaults are the Benin parameter set (WDI demographics, ESMAP
//! Multi-Tier Framework demand, IRENA 2023 solar costs). They are rounded
//! planning assumptions, not a calibrated national model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{LcepError, LcepResult};
use crate::model::{AnchorKind, Tier};

/// Complete parameter bundle for one planning run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    pub planning: PlanningParams,
    pub classification: ClassificationParams,
    pub tiers: TierTable,
    pub anchors: AnchorParams,
    pub grid: GridParams,
    pub minigrid: MiniGridParams,
    pub shs: ShsParams,
}

// =============================================================================
// Sections
// =============================================================================

/// Horizon, growth and discounting shared by every technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningParams {
    /// Years between the base year and the design year (2025 → 2040)
    pub horizon_years: u32,
    pub population_growth: f64,
    /// Per-capita consumption growth
    pub consumption_growth: f64,
    pub discount_rate: f64,
}

impl Default for PlanningParams {
    fn default() -> Self {
        Self {
            horizon_years: 15,
            population_growth: 0.027,
            consumption_growth: 0.015,
            discount_rate: 0.08,
        }
    }
}

/// How the two urban thresholds combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrbanRule {
    /// Population and building count must both exceed their thresholds
    #[default]
    Both,
    /// Either threshold is enough
    Either,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationParams {
    pub urban_rule: UrbanRule,
    pub urban_min_population: f64,
    pub urban_min_buildings: f64,
    pub household_size_urban: f64,
    pub household_size_rural: f64,
    /// RWI below `[0]` is Tier 1, below `[1]` Tier 2, otherwise Tier 3
    pub rwi_breakpoints: [f64; 2],
    /// Nightlight above this promotes a settlement by one tier
    pub nightlight_threshold: f64,
}

impl Default for ClassificationParams {
    fn default() -> Self {
        Self {
            urban_rule: UrbanRule::Both,
            urban_min_population: 5000.0,
            urban_min_buildings: 500.0,
            household_size_urban: 4.3,
            household_size_rural: 5.2,
            rwi_breakpoints: [-0.3, 0.4],
            nightlight_threshold: 0.0,
        }
    }
}

impl ClassificationParams {
    pub fn household_size(&self, urban: bool) -> f64 {
        if urban {
            self.household_size_urban
        } else {
            self.household_size_rural
        }
    }
}

/// Per-tier residential consumption and load factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    /// kWh per household per year, Tier 1..3
    pub annual_kwh: [f64; 3],
    /// Average-to-peak ratio, Tier 1..3 (lower tiers have spikier evenings)
    pub load_factor: [f64; 3],
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            annual_kwh: [35.0, 220.0, 850.0],
            load_factor: [0.18, 0.20, 0.25],
        }
    }
}

impl TierTable {
    pub fn annual_kwh(&self, tier: Tier) -> f64 {
        self.annual_kwh[tier.index()]
    }

    pub fn load_factor(&self, tier: Tier) -> f64 {
        self.load_factor[tier.index()]
    }
}

/// Condition that must hold for an anchor rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorTrigger {
    Always,
    HealthFacility,
    School,
    NearWater,
    CashewBelt,
}

/// Quantity an anchor scales with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingBasis {
    Population,
    Households,
    Buildings,
}

/// How a fractional unit count is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// `max(1, floor(basis / per))`
    #[default]
    Floor,
    /// `ceil(basis / per)`, one unit per started block
    Ceil,
}

/// `basis / per` units of the anchor, rounded, never fewer than one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorScaling {
    pub basis: ScalingBasis,
    pub per: f64,
    #[serde(default)]
    pub rounding: Rounding,
}

impl AnchorScaling {
    pub fn units(&self, basis_value: f64) -> u32 {
        let blocks = basis_value / self.per;
        let rounded = match self.rounding {
            Rounding::Floor => blocks.floor(),
            Rounding::Ceil => blocks.ceil(),
        };
        rounded.max(1.0) as u32
    }
}

/// One predicate→contribution pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRule {
    pub kind: AnchorKind,
    pub trigger: AnchorTrigger,
    /// Population must exceed this
    #[serde(default)]
    pub min_population: f64,
    #[serde(default)]
    pub rural_only: bool,
    pub kwh_per_unit: f64,
    /// Absent means a single fixed unit
    #[serde(default)]
    pub scaling: Option<AnchorScaling>,
}

impl AnchorRule {
    fn fixed(kind: AnchorKind, trigger: AnchorTrigger, kwh_per_unit: f64) -> Self {
        Self {
            kind,
            trigger,
            min_population: 0.0,
            rural_only: false,
            kwh_per_unit,
            scaling: None,
        }
    }

    fn scaled(
        kind: AnchorKind,
        trigger: AnchorTrigger,
        min_population: f64,
        kwh_per_unit: f64,
        basis: ScalingBasis,
        per: f64,
    ) -> Self {
        Self {
            kind,
            trigger,
            min_population,
            rural_only: false,
            kwh_per_unit,
            scaling: Some(AnchorScaling {
                basis,
                per,
                rounding: Rounding::Floor,
            }),
        }
    }

    fn rural(mut self) -> Self {
        self.rural_only = true;
        self
    }

    fn rounded_up(mut self) -> Self {
        if let Some(scaling) = &mut self.scaling {
            scaling.rounding = Rounding::Ceil;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorParams {
    /// A settlement closer than this to a lake or river is "near water"
    pub near_water_km: f64,
    /// Cashew belt starts north of this latitude
    pub cashew_belt_min_latitude: f64,
    pub rules: Vec<AnchorRule>,
}

impl Default for AnchorParams {
    fn default() -> Self {
        use AnchorTrigger::{Always, CashewBelt, HealthFacility, NearWater};
        use ScalingBasis::{Buildings, Households, Population};

        Self {
            near_water_km: 3.0,
            cashew_belt_min_latitude: 8.0,
            rules: vec![
                AnchorRule::fixed(AnchorKind::Health, HealthFacility, 4000.0),
                AnchorRule::fixed(AnchorKind::School, AnchorTrigger::School, 1500.0),
                AnchorRule::scaled(AnchorKind::Sme, Always, 500.0, 600.0, Buildings, 100.0),
                // One freezer per started hundred households
                AnchorRule::scaled(AnchorKind::ColdChain, NearWater, 200.0, 2500.0, Households, 100.0)
                    .rounded_up(),
                AnchorRule::scaled(AnchorKind::Irrigation, NearWater, 300.0, 3500.0, Population, 800.0),
                AnchorRule::scaled(AnchorKind::Mill, Always, 500.0, 4500.0, Population, 1500.0)
                    .rural(),
                AnchorRule::scaled(
                    AnchorKind::CashewDryer,
                    CashewBelt,
                    400.0,
                    6000.0,
                    Population,
                    2000.0,
                )
                .rural(),
            ],
        }
    }
}

/// Grid extension costs (33 kV MV, LV distribution, SBEE wholesale price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub mv_cost_per_km: f64,
    /// Shared with the mini-grid distribution network
    pub lv_cost_per_km: f64,
    /// HV step-down substation
    pub substation_cost: f64,
    /// Rating of one distribution transformer
    pub transformer_unit_kva: f64,
    pub transformer_unit_cost: f64,
    /// Share of the design peak that coincides at the transformer
    pub diversity_factor: f64,
    pub power_factor: f64,
    pub lv_km_per_household: f64,
    pub connection_cost_per_household: f64,
    pub loss_factor: f64,
    /// USD/kWh
    pub wholesale_tariff: f64,
    pub lifetime_years: u32,
    /// Fixed O&M per year as a share of capital cost
    pub om_fraction: f64,
    /// Settlements farther than this from a road pay the terrain multiplier
    pub road_access_km: f64,
    pub roadless_mv_multiplier: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            mv_cost_per_km: 14_000.0,
            lv_cost_per_km: 5_500.0,
            substation_cost: 500_000.0,
            transformer_unit_kva: 45.0,
            transformer_unit_cost: 8_000.0,
            diversity_factor: 0.6,
            // 1.0 rates transformers on the kW peak directly
            power_factor: 1.0,
            lv_km_per_household: 0.05,
            connection_cost_per_household: 150.0,
            loss_factor: 0.18,
            wholesale_tariff: 0.10,
            lifetime_years: 40,
            om_fraction: 0.02,
            road_access_km: 5.0,
            roadless_mv_multiplier: 1.3,
        }
    }
}

impl GridParams {
    /// Substation cost expressed as kilometres of MV line.
    pub fn substation_equivalent_km(&self) -> f64 {
        self.substation_cost / self.mv_cost_per_km
    }

    /// Whole transformers needed to carry `kva`; zero load needs none.
    pub fn transformer_units(&self, kva: f64) -> u32 {
        if kva <= 0.0 {
            0
        } else {
            (kva / self.transformer_unit_kva).ceil() as u32
        }
    }
}

/// PV-battery mini-grid costs (IRENA 2023, West Africa).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniGridParams {
    pub pv_cost_per_kw: f64,
    /// LFP, heat-derated
    pub battery_cost_per_kwh: f64,
    pub inverter_cost_per_kw: f64,
    /// Inverter kW per kW of design peak
    pub inverter_sizing: f64,
    pub connection_cost_per_household: f64,
    pub capacity_factor: f64,
    pub pv_oversizing: f64,
    pub depth_of_discharge: f64,
    pub autonomy_days: f64,
    /// Effective battery life at high ambient temperature
    pub battery_life_years: u32,
    pub lifetime_years: u32,
    /// Falls back to the planning discount rate
    pub discount_rate: Option<f64>,
    /// O&M per year as a share of annualized capital
    pub om_fraction: f64,
    pub lv_km_per_household: f64,
}

impl Default for MiniGridParams {
    fn default() -> Self {
        Self {
            pv_cost_per_kw: 700.0,
            battery_cost_per_kwh: 300.0,
            inverter_cost_per_kw: 180.0,
            inverter_sizing: 1.25,
            connection_cost_per_household: 100.0,
            capacity_factor: 0.18,
            pv_oversizing: 1.2,
            depth_of_discharge: 0.8,
            autonomy_days: 1.0,
            battery_life_years: 7,
            lifetime_years: 20,
            discount_rate: None,
            om_fraction: 0.03,
            lv_km_per_household: 0.1,
        }
    }
}

/// A solar home system kit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShsKit {
    pub tier: Tier,
    /// USD per household
    pub upfront_cost: f64,
    /// kWh per household per year the kit can deliver
    pub max_annual_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShsParams {
    pub kits: Vec<ShsKit>,
    pub lifetime_years: u32,
    /// O&M per year as a share of up-front cost
    pub om_fraction: f64,
    /// Highest tier an SHS may serve
    pub max_tier: Tier,
}

impl Default for ShsParams {
    fn default() -> Self {
        Self {
            kits: vec![
                ShsKit {
                    tier: Tier::One,
                    upfront_cost: 80.0,
                    max_annual_kwh: 35.0,
                },
                ShsKit {
                    tier: Tier::Two,
                    upfront_cost: 250.0,
                    max_annual_kwh: 150.0,
                },
                ShsKit {
                    tier: Tier::Three,
                    upfront_cost: 600.0,
                    max_annual_kwh: 350.0,
                },
            ],
            lifetime_years: 5,
            om_fraction: 0.05,
            max_tier: Tier::Three,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

fn ensure(condition: bool, message: impl FnOnce() -> String) -> LcepResult<()> {
    if condition {
        Ok(())
    } else {
        Err(LcepError::Config(message()))
    }
}

fn ensure_non_negative(name: &str, value: f64) -> LcepResult<()> {
    ensure(value.is_finite() && value >= 0.0, || {
        format!("{name} must be a non-negative number (got {value})")
    })
}

fn ensure_positive(name: &str, value: f64) -> LcepResult<()> {
    ensure(value.is_finite() && value > 0.0, || {
        format!("{name} must be positive (got {value})")
    })
}

fn ensure_fraction(name: &str, value: f64) -> LcepResult<()> {
    ensure(value > 0.0 && value <= 1.0, || {
        format!("{name} must be in (0, 1] (got {value})")
    })
}

fn ensure_rate(name: &str, value: f64) -> LcepResult<()> {
    ensure(value.is_finite() && value > -1.0, || {
        format!("{name} must be a finite rate above -100% (got {value})")
    })
}

fn ensure_lifetime(name: &str, value: u32) -> LcepResult<()> {
    ensure(value >= 1, || format!("{name} must be at least one year"))
}

impl PlanningConfig {
    /// Discount rate applied to the mini-grid.
    pub fn minigrid_discount_rate(&self) -> f64 {
        self.minigrid
            .discount_rate
            .unwrap_or(self.planning.discount_rate)
    }

    /// Reject missing or inconsistent tables before any settlement is planned.
    pub fn validate(&self) -> LcepResult<()> {
        let p = &self.planning;
        // Negative growth would let projected demand fall below current demand
        ensure_non_negative("planning.population_growth", p.population_growth)?;
        ensure_non_negative("planning.consumption_growth", p.consumption_growth)?;
        ensure_rate("planning.discount_rate", p.discount_rate)?;

        let c = &self.classification;
        ensure_non_negative("classification.urban_min_population", c.urban_min_population)?;
        ensure_non_negative("classification.urban_min_buildings", c.urban_min_buildings)?;
        ensure_positive("classification.household_size_urban", c.household_size_urban)?;
        ensure_positive("classification.household_size_rural", c.household_size_rural)?;
        let [low, high] = c.rwi_breakpoints;
        ensure(low.is_finite() && high.is_finite() && low < high, || {
            format!("classification.rwi_breakpoints must be strictly increasing (got [{low}, {high}])")
        })?;
        ensure(!c.nightlight_threshold.is_nan(), || {
            "classification.nightlight_threshold is NaN".to_string()
        })?;

        for (i, kwh) in self.tiers.annual_kwh.iter().enumerate() {
            ensure_positive(&format!("tiers.annual_kwh[{i}]"), *kwh)?;
        }
        ensure(
            self.tiers.annual_kwh.windows(2).all(|w| w[0] < w[1]),
            || format!("tiers.annual_kwh must increase with tier (got {:?})", self.tiers.annual_kwh),
        )?;
        for (i, lf) in self.tiers.load_factor.iter().enumerate() {
            ensure_fraction(&format!("tiers.load_factor[{i}]"), *lf)?;
        }

        self.validate_anchors()?;
        self.validate_grid()?;
        self.validate_minigrid()?;
        self.validate_shs()
    }

    fn validate_anchors(&self) -> LcepResult<()> {
        let a = &self.anchors;
        ensure_non_negative("anchors.near_water_km", a.near_water_km)?;
        ensure(a.cashew_belt_min_latitude.is_finite(), || {
            "anchors.cashew_belt_min_latitude must be finite".to_string()
        })?;
        let mut seen = HashSet::new();
        for rule in &a.rules {
            let name = rule.kind.as_str();
            ensure(seen.insert(rule.kind), || {
                format!("anchor rule '{name}' is defined more than once")
            })?;
            ensure_non_negative(&format!("anchors.{name}.kwh_per_unit"), rule.kwh_per_unit)?;
            ensure_non_negative(&format!("anchors.{name}.min_population"), rule.min_population)?;
            if let Some(scaling) = &rule.scaling {
                ensure_positive(&format!("anchors.{name}.scaling.per"), scaling.per)?;
            }
        }
        Ok(())
    }

    fn validate_grid(&self) -> LcepResult<()> {
        let g = &self.grid;
        ensure_positive("grid.mv_cost_per_km", g.mv_cost_per_km)?;
        for (name, value) in [
            ("grid.lv_cost_per_km", g.lv_cost_per_km),
            ("grid.substation_cost", g.substation_cost),
            ("grid.transformer_unit_cost", g.transformer_unit_cost),
            ("grid.lv_km_per_household", g.lv_km_per_household),
            ("grid.connection_cost_per_household", g.connection_cost_per_household),
            ("grid.loss_factor", g.loss_factor),
            ("grid.wholesale_tariff", g.wholesale_tariff),
            ("grid.om_fraction", g.om_fraction),
            ("grid.road_access_km", g.road_access_km),
        ] {
            ensure_non_negative(name, value)?;
        }
        ensure_fraction("grid.diversity_factor", g.diversity_factor)?;
        ensure_fraction("grid.power_factor", g.power_factor)?;
        ensure_positive("grid.transformer_unit_kva", g.transformer_unit_kva)?;
        ensure(g.roadless_mv_multiplier >= 1.0, || {
            format!(
                "grid.roadless_mv_multiplier must be at least 1 (got {})",
                g.roadless_mv_multiplier
            )
        })?;
        ensure_lifetime("grid.lifetime_years", g.lifetime_years)
    }

    fn validate_minigrid(&self) -> LcepResult<()> {
        let m = &self.minigrid;
        for (name, value) in [
            ("minigrid.pv_cost_per_kw", m.pv_cost_per_kw),
            ("minigrid.battery_cost_per_kwh", m.battery_cost_per_kwh),
            ("minigrid.inverter_cost_per_kw", m.inverter_cost_per_kw),
            ("minigrid.inverter_sizing", m.inverter_sizing),
            ("minigrid.connection_cost_per_household", m.connection_cost_per_household),
            ("minigrid.autonomy_days", m.autonomy_days),
            ("minigrid.om_fraction", m.om_fraction),
            ("minigrid.lv_km_per_household", m.lv_km_per_household),
        ] {
            ensure_non_negative(name, value)?;
        }
        ensure_fraction("minigrid.capacity_factor", m.capacity_factor)?;
        ensure_fraction("minigrid.depth_of_discharge", m.depth_of_discharge)?;
        ensure(m.pv_oversizing >= 1.0, || {
            format!("minigrid.pv_oversizing must be at least 1 (got {})", m.pv_oversizing)
        })?;
        if let Some(rate) = m.discount_rate {
            ensure_rate("minigrid.discount_rate", rate)?;
        }
        ensure_lifetime("minigrid.battery_life_years", m.battery_life_years)?;
        ensure_lifetime("minigrid.lifetime_years", m.lifetime_years)
    }

    fn validate_shs(&self) -> LcepResult<()> {
        let s = &self.shs;
        ensure(!s.kits.is_empty(), || "shs.kits must not be empty".to_string())?;
        let mut tiers = HashSet::new();
        for kit in &s.kits {
            ensure(tiers.insert(kit.tier), || {
                format!("shs.kits has more than one kit for {}", kit.tier)
            })?;
            ensure_non_negative("shs.kits.upfront_cost", kit.upfront_cost)?;
            ensure_positive("shs.kits.max_annual_kwh", kit.max_annual_kwh)?;
        }
        ensure_non_negative("shs.om_fraction", s.om_fraction)?;
        ensure_lifetime("shs.lifetime_years", s.lifetime_years)
    }
}
