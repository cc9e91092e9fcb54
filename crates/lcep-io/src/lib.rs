//! # lcep-io: settlement datasets in, electrification plans out
//!
//! Readers never stop at the first bad row: defaulted values become warnings
//! and unreadable rows become errors in the returned
//! [`lcep_core::Diagnostics`], next to the settlements that were read.
//!
//! | Format | Extensions | Reader |
//! |--------|------------|--------|
//! | CSV with header | `.csv` | [`importers::read_settlements_csv`] |
//! | GeoJSON FeatureCollection | `.geojson`, `.json` | [`importers::read_settlements_geojson`] |
//!
//! Writers produce the plan table, the demand-only table, both tables as
//! GeoJSON on the input geometries, and a JSON dump of full plans.

pub mod exporters;
pub mod importers;

pub use exporters::{
    write_demand_csv, write_demand_geojson, write_plan_csv, write_plan_geojson, write_plan_json,
    DEMAND_CSV, DEMAND_GEOJSON, PLAN_CSV, PLAN_GEOJSON, PLAN_JSON,
};
pub use importers::{load_settlements, ImportResult, SettlementFormat};
