//! Discounting helpers shared by the technology cost models.

use lcep_core::Usd;

/// Capital Recovery Factor for annualizing investment costs
///
/// CRF = r(1+r)^n / ((1+r)^n - 1)
///
/// where r = discount rate, n = lifetime in years. A zero rate degenerates to
/// straight-line recovery (1/n); a zero lifetime recovers nothing.
pub fn capital_recovery_factor(discount_rate: f64, lifetime_years: u32) -> f64 {
    if lifetime_years == 0 {
        return 0.0;
    }
    let n = lifetime_years as f64;
    let r = discount_rate;
    if r.abs() < 1e-10 {
        1.0 / n
    } else {
        let growth = (1.0 + r).powf(n);
        r * growth / (growth - 1.0)
    }
}

/// Uniform annual cost equivalent to a one-time capital outlay.
pub fn annualize(capital: Usd, discount_rate: f64, lifetime_years: u32) -> Usd {
    capital * capital_recovery_factor(discount_rate, lifetime_years)
}

/// Value today of a payment made at the end of `year`.
pub fn present_value(amount: Usd, discount_rate: f64, year: u32) -> Usd {
    amount / (1.0 + discount_rate).powi(year as i32)
}

/// Years at which an asset with `asset_life` must be replaced inside a
/// project of `project_life` years (replacements strictly before the end).
pub fn replacement_years(asset_life: u32, project_life: u32) -> impl Iterator<Item = u32> {
    let step = asset_life.max(1) as usize;
    (asset_life..project_life).step_by(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crf_known_values() {
        // 8 % over 40 years and 20 years
        assert!((capital_recovery_factor(0.08, 40) - 0.083860).abs() < 1e-5);
        assert!((capital_recovery_factor(0.08, 20) - 0.101852).abs() < 1e-5);
        // 10 % over 10 years
        assert!((capital_recovery_factor(0.10, 10) - 0.1627).abs() < 1e-3);
    }

    #[test]
    fn test_crf_zero_rate_is_straight_line() {
        assert!((capital_recovery_factor(0.0, 5) - 0.2).abs() < 1e-12);
        assert_eq!(capital_recovery_factor(0.08, 0), 0.0);
    }

    #[test]
    fn test_annualize_recovers_capital() {
        // Discounting the annuity back over its life gives the capital.
        let capital = Usd(100_000.0);
        let annual = annualize(capital, 0.08, 20);
        let recovered: Usd = (1..=20).map(|y| present_value(annual, 0.08, y)).sum();
        assert!((recovered.value() - capital.value()).abs() < 1e-6);
    }

    #[test]
    fn test_replacement_years() {
        assert_eq!(replacement_years(7, 20).collect::<Vec<_>>(), vec![7, 14]);
        assert_eq!(replacement_years(10, 20).collect::<Vec<_>>(), vec![10]);
        assert!(replacement_years(25, 20).next().is_none());
    }

    #[test]
    fn test_present_value() {
        let pv = present_value(Usd(108.0), 0.08, 1);
        assert!((pv.value() - 100.0).abs() < 1e-9);
    }
}
