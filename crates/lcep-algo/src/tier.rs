//! Urban/rural flag and service tier.

use lcep_core::{Classification, PlanningConfig, SettlementInput, Tier, UrbanRule};

/// Classify a settlement. Pure and total: any RWI maps to a band.
pub fn classify(settlement: &SettlementInput, config: &PlanningConfig) -> Classification {
    Classification {
        urban: is_urban(settlement, config),
        tier: assign_tier(
            settlement.relative_wealth_index,
            settlement.nightlight_intensity,
            config,
        ),
    }
}

pub fn is_urban(settlement: &SettlementInput, config: &PlanningConfig) -> bool {
    let c = &config.classification;
    let populous = settlement.population > c.urban_min_population;
    let built_up = settlement.building_count > c.urban_min_buildings;
    match c.urban_rule {
        UrbanRule::Both => populous && built_up,
        UrbanRule::Either => populous || built_up,
    }
}

/// Tier from the wealth band alone.
pub fn wealth_tier(rwi: f64, config: &PlanningConfig) -> Tier {
    let [low, high] = config.classification.rwi_breakpoints;
    if rwi < low {
        Tier::One
    } else if rwi < high {
        Tier::Two
    } else {
        Tier::Three
    }
}

/// Wealth band plus a single one-tier nightlight nudge (capped at Tier 3).
pub fn assign_tier(rwi: f64, nightlight: f64, config: &PlanningConfig) -> Tier {
    let tier = wealth_tier(rwi, config);
    if nightlight > config.classification.nightlight_threshold {
        tier.promoted()
    } else {
        tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wealth_bands() {
        let config = PlanningConfig::default();
        assert_eq!(wealth_tier(-0.8, &config), Tier::One);
        assert_eq!(wealth_tier(-0.3, &config), Tier::Two);
        assert_eq!(wealth_tier(0.39, &config), Tier::Two);
        assert_eq!(wealth_tier(0.4, &config), Tier::Three);
    }

    #[test]
    fn test_out_of_range_rwi_is_clamped_to_a_band() {
        let config = PlanningConfig::default();
        assert_eq!(wealth_tier(-1e9, &config), Tier::One);
        assert_eq!(wealth_tier(1e9, &config), Tier::Three);
        assert_eq!(wealth_tier(f64::NEG_INFINITY, &config), Tier::One);
    }

    #[test]
    fn test_tier_monotonic_in_rwi() {
        let config = PlanningConfig::default();
        let mut previous = Tier::One;
        for step in -200..=200 {
            let tier = wealth_tier(step as f64 / 100.0, &config);
            assert!(tier >= previous);
            previous = tier;
        }
    }

    #[test]
    fn test_nightlight_nudge_is_one_tier_and_capped() {
        let config = PlanningConfig::default();
        for rwi in [-1.0, 0.0, 1.0] {
            let base = assign_tier(rwi, 0.0, &config);
            let nudged = assign_tier(rwi, 5.0, &config);
            assert!(nudged >= base);
            assert!(nudged.index() <= base.index() + 1);
            assert!(nudged <= Tier::Three);
        }
        assert_eq!(assign_tier(-1.0, 5.0, &config), Tier::Two);
        assert_eq!(assign_tier(1.0, 5.0, &config), Tier::Three);
    }

    #[test]
    fn test_urban_rule_both_and_either() {
        let mut config = PlanningConfig::default();
        let town = SettlementInput::new("T", 6000.0).with_buildings(800.0);
        let sprawl = SettlementInput::new("S", 900.0).with_buildings(800.0);
        let boundary = SettlementInput::new("B", 5000.0).with_buildings(800.0);
        assert!(is_urban(&town, &config));
        assert!(!is_urban(&sprawl, &config));
        // thresholds are strict
        assert!(!is_urban(&boundary, &config));

        config.classification.urban_rule = UrbanRule::Either;
        assert!(is_urban(&sprawl, &config));
    }
}
