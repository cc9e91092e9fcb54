//! Compile-time unit safety for planning quantities.
//!
//! Keeps energy (kWh), power (kW), apparent power (kVA) and money (USD) from
//! being mixed by accident. A design peak in kW cannot be added to an annual
//! energy figure in kWh without an explicit conversion through hours.
//!
//! All types are `#[repr(transparent)]` over `f64` and serialize as bare
//! numbers, so CSV and JSON outputs stay flat.
//!
//! ```
//! use lcep_core::units::{KilowattHours, Usd, HOURS_PER_YEAR};
//!
//! let annual = KilowattHours(8760.0);
//! assert_eq!(annual.average_power().value(), 1.0);
//!
//! let cost = Usd(876.0);
//! let lcoe = cost.per_kwh(annual).unwrap();
//! assert!((lcoe.value() - 0.1).abs() < 1e-12);
//! # let _ = HOURS_PER_YEAR;
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Hours in a non-leap year, used for every energy/power conversion.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Days in a non-leap year.
pub const DAYS_PER_YEAR: f64 = 365.0;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$type> for f64 {
            type Output = $type;
            fn mul(self, rhs: $type) -> Self::Output {
                <$type>::new(self * rhs.0)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.2} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Zero value
            pub const ZERO: Self = Self(0.0);

            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Strictly positive (and not NaN)
            #[inline]
            pub fn is_positive(self) -> bool {
                self.0 > 0.0
            }

            /// Minimum of two values
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Maximum of two values
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

// =============================================================================
// Energy and power
// =============================================================================

/// Energy in kilowatt-hours (kWh). Annual figures unless a name says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilowattHours(pub f64);

impl_unit_ops!(KilowattHours, "kWh");

/// Active power in kilowatts (kW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_unit_ops!(Kilowatts, "kW");

/// Apparent power in kilovolt-amperes (kVA), used for transformer sizing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilovoltAmperes(pub f64);

impl_unit_ops!(KilovoltAmperes, "kVA");

impl KilowattHours {
    /// Average power of an annual energy figure: E / 8760 h.
    #[inline]
    pub fn average_power(self) -> Kilowatts {
        Kilowatts(self.0 / HOURS_PER_YEAR)
    }

    /// Peak power implied by a load factor: E / (8760 h × LF).
    ///
    /// Returns zero for a non-positive load factor instead of dividing by it.
    #[inline]
    pub fn peak_power(self, load_factor: f64) -> Kilowatts {
        if load_factor <= 0.0 {
            Kilowatts::ZERO
        } else {
            Kilowatts(self.0 / (HOURS_PER_YEAR * load_factor))
        }
    }

    /// Average daily energy of an annual figure.
    #[inline]
    pub fn daily(self) -> KilowattHours {
        KilowattHours(self.0 / DAYS_PER_YEAR)
    }
}

impl Kilowatts {
    /// Apparent power needed to carry this load: kVA = kW / pf.
    #[inline]
    pub fn apparent_power(self, power_factor: f64) -> KilovoltAmperes {
        if power_factor <= 0.0 {
            KilovoltAmperes(self.0)
        } else {
            KilovoltAmperes(self.0 / power_factor)
        }
    }
}

// =============================================================================
// Money
// =============================================================================

/// Money in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Usd(pub f64);

impl_unit_ops!(Usd, "USD");

/// Levelized cost in USD per kWh.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct UsdPerKwh(pub f64);

impl_unit_ops!(UsdPerKwh, "USD/kWh");

impl Usd {
    /// Cost per unit of energy; `None` when no energy is delivered.
    #[inline]
    pub fn per_kwh(self, energy: KilowattHours) -> Option<UsdPerKwh> {
        if energy.0 > 0.0 {
            Some(UsdPerKwh(self.0 / energy.0))
        } else {
            None
        }
    }
}

impl Mul<KilowattHours> for UsdPerKwh {
    type Output = Usd;
    fn mul(self, rhs: KilowattHours) -> Usd {
        Usd(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_power_uses_load_factor() {
        let energy = KilowattHours(8760.0 * 0.25 * 4.0);
        let peak = energy.peak_power(0.25);
        assert!((peak.value() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_peak_power_zero_load_factor() {
        assert_eq!(KilowattHours(100.0).peak_power(0.0), Kilowatts::ZERO);
    }

    #[test]
    fn test_per_kwh_undefined_without_energy() {
        assert!(Usd(10.0).per_kwh(KilowattHours::ZERO).is_none());
        let lcoe = Usd(10.0).per_kwh(KilowattHours(40.0)).unwrap();
        assert!((lcoe.value() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_apparent_power() {
        let kva = Kilowatts(9.0).apparent_power(0.9);
        assert!((kva.value() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum_and_display() {
        let total: Usd = [Usd(1.0), Usd(2.5)].iter().sum();
        assert_eq!(total, Usd(3.5));
        assert_eq!(format!("{}", KilowattHours(12.0)), "12.00 kWh");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&KilowattHours(1.5)).unwrap();
        assert_eq!(json, "1.5");
    }
}
