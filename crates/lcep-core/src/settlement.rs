//! The per-settlement input record.

use serde::{Deserialize, Serialize};

use crate::config::AnchorParams;
use crate::error::{LcepError, LcepResult};

/// Attributes of one settlement, as supplied by a dataset reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementInput {
    pub settlement_id: String,
    pub population: f64,
    pub building_count: f64,
    pub distance_to_grid_km: f64,
    pub distance_to_substation_km: f64,
    pub distance_to_road_km: f64,
    pub distance_to_water_km: f64,
    pub has_health_facility: bool,
    pub has_school: bool,
    pub nightlight_intensity: f64,
    pub relative_wealth_index: f64,
    /// Centroid latitude in degrees, when the dataset has geometry
    #[serde(default)]
    pub latitude: Option<f64>,
}

impl SettlementInput {
    /// A settlement with the given population and neutral attributes.
    ///
    /// Grid, substation and water distances default to 999 km, the value the
    /// dataset readers use for missing distances; the road is at 0 km.
    pub fn new(settlement_id: impl Into<String>, population: f64) -> Self {
        Self {
            settlement_id: settlement_id.into(),
            population,
            building_count: 0.0,
            distance_to_grid_km: 999.0,
            distance_to_substation_km: 999.0,
            distance_to_road_km: 0.0,
            distance_to_water_km: 999.0,
            has_health_facility: false,
            has_school: false,
            nightlight_intensity: 0.0,
            relative_wealth_index: 0.0,
            latitude: None,
        }
    }

    /// Check the record invariants: non-negative counts and distances, all
    /// values finite.
    pub fn validate(&self) -> LcepResult<()> {
        let counts = [
            ("population", self.population),
            ("building_count", self.building_count),
        ];
        let distances = [
            ("distance_to_grid_km", self.distance_to_grid_km),
            ("distance_to_substation_km", self.distance_to_substation_km),
            ("distance_to_road_km", self.distance_to_road_km),
            ("distance_to_water_km", self.distance_to_water_km),
        ];
        for (name, value) in counts.iter().chain(distances.iter()) {
            if !value.is_finite() {
                return Err(LcepError::invalid_input(
                    &self.settlement_id,
                    format!("{name} is not a finite number"),
                ));
            }
            if *value < 0.0 {
                return Err(LcepError::invalid_input(
                    &self.settlement_id,
                    format!("{name} is negative ({value})"),
                ));
            }
        }
        for (name, value) in [
            ("nightlight_intensity", self.nightlight_intensity),
            ("relative_wealth_index", self.relative_wealth_index),
        ] {
            if value.is_nan() {
                return Err(LcepError::invalid_input(
                    &self.settlement_id,
                    format!("{name} is NaN"),
                ));
            }
        }
        Ok(())
    }

    pub fn near_water(&self, anchors: &AnchorParams) -> bool {
        self.distance_to_water_km < anchors.near_water_km
    }

    /// Inside the cashew belt (north of the configured latitude). Settlements
    /// without a latitude are outside it.
    pub fn in_cashew_belt(&self, anchors: &AnchorParams) -> bool {
        self.latitude
            .is_some_and(|lat| lat > anchors.cashew_belt_min_latitude)
    }

    pub fn with_buildings(mut self, building_count: f64) -> Self {
        self.building_count = building_count;
        self
    }

    pub fn with_grid_distances(mut self, grid_km: f64, substation_km: f64) -> Self {
        self.distance_to_grid_km = grid_km;
        self.distance_to_substation_km = substation_km;
        self
    }

    pub fn with_wealth(mut self, rwi: f64, nightlight: f64) -> Self {
        self.relative_wealth_index = rwi;
        self.nightlight_intensity = nightlight;
        self
    }

    pub fn with_water_distance(mut self, km: f64) -> Self {
        self.distance_to_water_km = km;
        self
    }

    pub fn with_road_distance(mut self, km: f64) -> Self {
        self.distance_to_road_km = km;
        self
    }

    pub fn with_facilities(mut self, health: bool, school: bool) -> Self {
        self.has_health_facility = health;
        self.has_school = school;
        self
    }

    pub fn with_latitude(mut self, latitude: f64) -> Self {
        self.latitude = Some(latitude);
        self
    }
}
