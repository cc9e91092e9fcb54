//! Column mapping shared by the CSV and GeoJSON readers.
//!
//! Canonical names match [`SettlementInput`]; aliases cover the column names
//! of the settlement-properties datasets the planners already have.

use std::fmt;

use lcep_core::{Diagnostics, SettlementInput};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// Distance used when a dataset has no grid, substation or water value: far
/// enough that no proximity rule fires.
pub const MISSING_DISTANCE_KM: f64 = 999.0;

/// One settlement as it appears in a file, before defaults are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettlement {
    #[serde(default, alias = "id", deserialize_with = "id_string")]
    pub settlement_id: Option<String>,
    #[serde(default, alias = "pop")]
    pub population: Option<f64>,
    #[serde(default, alias = "num_buildings")]
    pub building_count: Option<f64>,
    #[serde(default, alias = "distance_to_existing_transmission_lines")]
    pub distance_to_grid_km: Option<f64>,
    #[serde(default, alias = "dist_to_substations")]
    pub distance_to_substation_km: Option<f64>,
    #[serde(default, alias = "dist_main_road_km")]
    pub distance_to_road_km: Option<f64>,
    #[serde(default, alias = "dist_lake_river_km")]
    pub distance_to_water_km: Option<f64>,
    #[serde(default, alias = "num_health_facilities", deserialize_with = "flag")]
    pub has_health_facility: Option<bool>,
    #[serde(default, alias = "num_education_facilities", deserialize_with = "flag")]
    pub has_school: Option<bool>,
    #[serde(default, alias = "has_nightlight")]
    pub nightlight_intensity: Option<f64>,
    #[serde(default, alias = "mean_rwi")]
    pub relative_wealth_index: Option<f64>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
}

impl RawSettlement {
    /// Apply defaults, recording each one as a warning.
    ///
    /// Returns `None` (and records an error) when population is missing;
    /// a settlement without a population cannot be planned.
    pub fn resolve(self, row_label: &str, diagnostics: &mut Diagnostics) -> Option<SettlementInput> {
        let settlement_id = match self.settlement_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                diagnostics.missing_id(row_label);
                row_label.to_string()
            }
        };

        let Some(population) = self.population else {
            diagnostics.missing_population(&settlement_id);
            return None;
        };

        let mut or_default = |value: Option<f64>, column: &str, default: f64| -> f64 {
            value.unwrap_or_else(|| {
                diagnostics.defaulted(&settlement_id, column, default);
                default
            })
        };

        let building_count = or_default(self.building_count, "building_count", 0.0);
        let distance_to_grid_km =
            or_default(self.distance_to_grid_km, "distance_to_grid_km", MISSING_DISTANCE_KM);
        let distance_to_substation_km = or_default(
            self.distance_to_substation_km,
            "distance_to_substation_km",
            MISSING_DISTANCE_KM,
        );
        // No road data counts as road access, so the roadless MV multiplier
        // only applies where a dataset says the road is far
        let distance_to_road_km = or_default(self.distance_to_road_km, "distance_to_road_km", 0.0);
        let distance_to_water_km =
            or_default(self.distance_to_water_km, "distance_to_water_km", MISSING_DISTANCE_KM);
        let nightlight_intensity =
            or_default(self.nightlight_intensity, "nightlight_intensity", 0.0);
        let relative_wealth_index =
            or_default(self.relative_wealth_index, "relative_wealth_index", 0.0);

        Some(SettlementInput {
            settlement_id,
            population,
            building_count,
            distance_to_grid_km,
            distance_to_substation_km,
            distance_to_road_km,
            distance_to_water_km,
            // Facility counts are optional; absence simply means none
            has_health_facility: self.has_health_facility.unwrap_or(false),
            has_school: self.has_school.unwrap_or(false),
            nightlight_intensity,
            relative_wealth_index,
            latitude: self.latitude,
        })
    }
}

/// Accept a boolean, a facility count or the usual spellings of either.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = Option<bool>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean, a count, or empty")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v > 0))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v > 0))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v > 0.0))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            match v.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Ok(Some(true)),
                "false" | "no" | "n" => Ok(Some(false)),
                other => other
                    .parse::<f64>()
                    .map(|n| Some(n > 0.0))
                    .map_err(|_| E::custom(format!("'{v}' is not a flag or count"))),
            }
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(FlagVisitor)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Ids may be numeric in GeoJSON properties.
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => Some(s),
        Some(Id::Int(n)) => Some(n.to_string()),
        Some(Id::Float(n)) => Some(n.to_string()),
        None => None,
    })
}
