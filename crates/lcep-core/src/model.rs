//! Records that flow through the planning pipeline.
//!
//! ```text
//! SettlementInput ──classify──▶ Classification
//!        │                          │
//!        └──────────project─────────┴──▶ DemandProfile
//!                                           │
//!              ┌───────────────┬────────────┴──┐
//!              ▼               ▼               ▼
//!         cost_grid      cost_minigrid      cost_shs     (TechnologyCostResult ×3)
//!              └───────────────┴───────┬───────┘
//!                                      ▼
//!                                   select ──▶ SettlementResult
//! ```
//!
//! Each record is produced by exactly one stage and only read afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::{KilovoltAmperes, KilowattHours, Kilowatts, Usd, UsdPerKwh};

// =============================================================================
// Classification
// =============================================================================

/// ESMAP Multi-Tier Framework service level (only tiers 1–3 are planned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Three];

    /// Zero-based position, for indexing per-tier tables.
    pub fn index(self) -> usize {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Three => 2,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// One tier up, saturating at Tier 3.
    pub fn promoted(self) -> Tier {
        match self {
            Tier::One => Tier::Two,
            Tier::Two | Tier::Three => Tier::Three,
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            3 => Ok(Tier::Three),
            other => Err(format!("tier must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.number()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.number())
    }
}

/// Output of the tier classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub urban: bool,
    pub tier: Tier,
}

// =============================================================================
// Demand
// =============================================================================

/// Rule-of-thumb loads added on top of residential demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    Health,
    School,
    Sme,
    ColdChain,
    Irrigation,
    Mill,
    CashewDryer,
}

/// Anchor grouping used by the SHS eligibility gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorCategory {
    /// Health posts, schools
    Public,
    /// SMEs, cold chain
    Commercial,
    /// Irrigation, mills, crop dryers
    Agricultural,
}

impl AnchorKind {
    pub fn category(self) -> AnchorCategory {
        match self {
            AnchorKind::Health | AnchorKind::School => AnchorCategory::Public,
            AnchorKind::Sme | AnchorKind::ColdChain => AnchorCategory::Commercial,
            AnchorKind::Irrigation | AnchorKind::Mill | AnchorKind::CashewDryer => {
                AnchorCategory::Agricultural
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorKind::Health => "health",
            AnchorKind::School => "school",
            AnchorKind::Sme => "sme",
            AnchorKind::ColdChain => "cold_chain",
            AnchorKind::Irrigation => "irrigation",
            AnchorKind::Mill => "mill",
            AnchorKind::CashewDryer => "cashew_dryer",
        }
    }
}

/// One anchor rule that fired for a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorContribution {
    pub kind: AnchorKind,
    pub units: u32,
    pub annual_kwh: KilowattHours,
}

/// Demand derived for one settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub households: u64,
    pub tier: Tier,
    pub urban: bool,
    /// Residential demand, current year
    pub annual_kwh_base: KilowattHours,
    /// Sum of anchor contributions, current year
    pub annual_kwh_anchor: KilowattHours,
    pub anchors: Vec<AnchorContribution>,
    pub annual_kwh_total_current: KilowattHours,
    /// Total demand at the planning horizon
    pub annual_kwh_total_projected: KilowattHours,
    pub design_peak_kw: Kilowatts,
    pub horizon_years: u32,
}

impl DemandProfile {
    /// The defined zero-demand profile (no households).
    pub fn zero(classification: Classification, horizon_years: u32) -> Self {
        Self {
            households: 0,
            tier: classification.tier,
            urban: classification.urban,
            annual_kwh_base: KilowattHours::ZERO,
            annual_kwh_anchor: KilowattHours::ZERO,
            anchors: Vec::new(),
            annual_kwh_total_current: KilowattHours::ZERO,
            annual_kwh_total_projected: KilowattHours::ZERO,
            design_peak_kw: Kilowatts::ZERO,
            horizon_years,
        }
    }

    pub fn is_zero_demand(&self) -> bool {
        self.households == 0 || !self.annual_kwh_total_projected.is_positive()
    }

    /// True if any public, commercial or agricultural anchor fired.
    pub fn has_productive_load(&self) -> bool {
        self.anchors.iter().any(|a| a.annual_kwh.is_positive())
    }

    /// Anchor demand of one category, current year.
    pub fn anchor_kwh(&self, category: AnchorCategory) -> KilowattHours {
        self.anchors
            .iter()
            .filter(|a| a.kind.category() == category)
            .map(|a| a.annual_kwh)
            .sum()
    }
}

// =============================================================================
// Costing
// =============================================================================

/// Supply technologies, declared in tie-break preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technology {
    Grid,
    MiniGrid,
    #[serde(rename = "SHS")]
    Shs,
}

impl Technology {
    pub const ALL: [Technology; 3] = [Technology::Grid, Technology::MiniGrid, Technology::Shs];

    pub fn as_str(self) -> &'static str {
        match self {
            Technology::Grid => "Grid",
            Technology::MiniGrid => "MiniGrid",
            Technology::Shs => "SHS",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a grid extension attaches to the existing network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPoint {
    ExistingLine,
    Substation,
}

/// Technology-specific sizing kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "technology", rename_all = "snake_case")]
pub enum CostDetail {
    Grid {
        connection: ConnectionPoint,
        effective_mv_km: f64,
        transformer_kva: KilovoltAmperes,
        /// Standard-size transformers installed to cover `transformer_kva`
        transformer_units: u32,
    },
    MiniGrid {
        pv_kw: Kilowatts,
        battery_kwh: KilowattHours,
        inverter_kw: Kilowatts,
        /// Present value of battery replacements inside the project life
        battery_replacements: Usd,
    },
    Shs {
        kit_tier: Tier,
        capped: bool,
    },
}

/// Annualized cost of one technology for one settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyCostResult {
    pub technology: Technology,
    /// Up-front investment before annualization
    pub capital_cost: Usd,
    pub annualized_cost: Usd,
    pub energy_delivered_kwh: KilowattHours,
    /// Projected demand the technology cannot serve (SHS cap)
    pub unserved_kwh: KilowattHours,
    /// Defined only when energy is delivered
    pub lcoe: Option<UsdPerKwh>,
    pub eligible: bool,
    pub detail: CostDetail,
}

impl TechnologyCostResult {
    /// Assemble a result, deriving LCOE and forcing ineligibility when no
    /// energy is delivered.
    pub fn new(
        technology: Technology,
        capital_cost: Usd,
        annualized_cost: Usd,
        energy_delivered_kwh: KilowattHours,
        eligible: bool,
        detail: CostDetail,
    ) -> Self {
        let lcoe = annualized_cost.per_kwh(energy_delivered_kwh);
        Self {
            technology,
            capital_cost,
            annualized_cost,
            energy_delivered_kwh,
            unserved_kwh: KilowattHours::ZERO,
            lcoe,
            eligible: eligible && lcoe.is_some(),
            detail,
        }
    }

    pub fn with_unserved(mut self, unserved: KilowattHours) -> Self {
        self.unserved_kwh = unserved;
        self
    }

    /// LCOE if this candidate may take part in the comparison.
    pub fn competing_lcoe(&self) -> Option<UsdPerKwh> {
        if self.eligible {
            self.lcoe
        } else {
            None
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Least-cost decision for one settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub settlement_id: String,
    pub optimal_tech: Technology,
    pub optimal_lcoe: UsdPerKwh,
    pub total_investment: Usd,
    pub lcoe_grid: Option<UsdPerKwh>,
    pub lcoe_minigrid: Option<UsdPerKwh>,
    pub lcoe_shs: Option<UsdPerKwh>,
}

impl SettlementResult {
    /// Result for a settlement with no demand: grid at zero cost.
    pub fn zero_demand(settlement_id: impl Into<String>) -> Self {
        Self {
            settlement_id: settlement_id.into(),
            optimal_tech: Technology::Grid,
            optimal_lcoe: UsdPerKwh::ZERO,
            total_investment: Usd::ZERO,
            lcoe_grid: None,
            lcoe_minigrid: None,
            lcoe_shs: None,
        }
    }

    /// LCOE of one candidate, `None` when it did not compete.
    pub fn candidate_lcoe(&self, technology: Technology) -> Option<UsdPerKwh> {
        match technology {
            Technology::Grid => self.lcoe_grid,
            Technology::MiniGrid => self.lcoe_minigrid,
            Technology::Shs => self.lcoe_shs,
        }
    }
}

/// Everything the writers need about one settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub settlement_id: String,
    pub population: f64,
    pub profile: DemandProfile,
    pub result: SettlementResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_promotion_saturates() {
        assert_eq!(Tier::One.promoted(), Tier::Two);
        assert_eq!(Tier::Two.promoted(), Tier::Three);
        assert_eq!(Tier::Three.promoted(), Tier::Three);
    }

    #[test]
    fn test_tier_serde_as_number() {
        assert_eq!(serde_json::to_string(&Tier::Two).unwrap(), "2");
        let tier: Tier = serde_json::from_str("3").unwrap();
        assert_eq!(tier, Tier::Three);
        assert!(serde_json::from_str::<Tier>("4").is_err());
    }

    #[test]
    fn test_technology_order_is_preference_order() {
        assert!(Technology::Grid < Technology::MiniGrid);
        assert!(Technology::MiniGrid < Technology::Shs);
        assert_eq!(serde_json::to_string(&Technology::Shs).unwrap(), "\"SHS\"");
    }

    #[test]
    fn test_anchor_categories() {
        assert_eq!(AnchorKind::School.category(), AnchorCategory::Public);
        assert_eq!(AnchorKind::ColdChain.category(), AnchorCategory::Commercial);
        assert_eq!(AnchorKind::Mill.category(), AnchorCategory::Agricultural);
    }

    #[test]
    fn test_zero_energy_result_is_ineligible() {
        let result = TechnologyCostResult::new(
            Technology::MiniGrid,
            Usd(100.0),
            Usd(10.0),
            KilowattHours::ZERO,
            true,
            CostDetail::Shs {
                kit_tier: Tier::One,
                capped: false,
            },
        );
        assert!(result.lcoe.is_none());
        assert!(!result.eligible);
        assert!(result.competing_lcoe().is_none());
    }

    #[test]
    fn test_zero_profile() {
        let profile = DemandProfile::zero(
            Classification {
                urban: false,
                tier: Tier::One,
            },
            15,
        );
        assert!(profile.is_zero_demand());
        assert!(!profile.has_productive_load());
        assert_eq!(profile.design_peak_kw, Kilowatts::ZERO);
    }
}
