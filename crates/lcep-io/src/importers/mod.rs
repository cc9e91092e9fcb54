//! Settlement dataset readers.

mod csv_file;
mod geojson;
mod record;

pub use csv_file::{read_settlements_csv, read_settlements_csv_from};
pub use geojson::{centroid_latitude, read_settlements_geojson, read_settlements_geojson_from};
pub use record::{RawSettlement, MISSING_DISTANCE_KM};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use lcep_core::{Diagnostics, SettlementInput};
use serde_json::Value;
use tracing::{info, warn};

/// Settlements read from one file, plus what the reader had to fix or drop.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub settlements: Vec<SettlementInput>,
    pub diagnostics: Diagnostics,
    /// GeoJSON geometry per settlement id; empty for CSV input
    pub geometries: HashMap<String, Value>,
}

/// Supported settlement file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementFormat {
    Csv,
    GeoJson,
}

impl SettlementFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(SettlementFormat::Csv),
            "geojson" | "json" => Some(SettlementFormat::GeoJson),
            _ => None,
        }
    }
}

/// Read settlements, choosing the reader by file extension.
pub fn load_settlements(path: &Path) -> Result<ImportResult> {
    let format = SettlementFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "cannot tell the format of '{}'; use .csv, .geojson or .json",
            path.display()
        )
    })?;
    let result = match format {
        SettlementFormat::Csv => read_settlements_csv(path)?,
        SettlementFormat::GeoJson => read_settlements_geojson(path)?,
    };

    info!(
        path = %path.display(),
        settlements = result.settlements.len(),
        "loaded settlements"
    );
    if !result.diagnostics.issues.is_empty() {
        warn!(
            path = %path.display(),
            "settlement import: {}",
            result.diagnostics.summary()
        );
        for (column, rows) in result.diagnostics.defaulted_columns() {
            info!(column, rows, "column defaulted");
        }
    }
    Ok(result)
}
