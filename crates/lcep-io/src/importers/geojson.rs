//! GeoJSON `FeatureCollection` of settlement polygons or points.
//!
//! Settlement fields come from `properties`. The latitude comes from
//! `properties.latitude` when present, otherwise from the mean of the
//! geometry's vertices. Geometries are kept as-is so plans can be written
//! back out on the same shapes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lcep_core::Diagnostics;
use serde::Deserialize;
use serde_json::Value;

use super::record::RawSettlement;
use super::ImportResult;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Value>,
    #[serde(default)]
    geometry: Option<Value>,
}

pub fn read_settlements_geojson(path: &Path) -> Result<ImportResult> {
    let file = File::open(path)
        .with_context(|| format!("opening settlements GeoJSON '{}'", path.display()))?;
    read_settlements_geojson_from(BufReader::new(file))
        .with_context(|| format!("reading settlements GeoJSON '{}'", path.display()))
}

pub fn read_settlements_geojson_from<R: Read>(source: R) -> Result<ImportResult> {
    let collection: FeatureCollection =
        serde_json::from_reader(source).context("parsing GeoJSON")?;
    if collection.kind != "FeatureCollection" {
        return Err(anyhow!(
            "expected a FeatureCollection, found '{}'",
            collection.kind
        ));
    }

    let mut settlements = Vec::with_capacity(collection.features.len());
    let mut diagnostics = Diagnostics::new();
    let mut geometries = HashMap::new();
    for (index, feature) in collection.features.into_iter().enumerate() {
        let label = format!("feature-{}", index + 1);
        let properties = feature.properties.unwrap_or(Value::Null);
        let mut raw: RawSettlement = if properties.is_null() {
            RawSettlement::default()
        } else {
            match serde_json::from_value(properties) {
                Ok(raw) => raw,
                Err(err) => {
                    diagnostics.unreadable(&label, None, err.to_string());
                    continue;
                }
            }
        };
        if raw.settlement_id.is_none() {
            raw.settlement_id = feature.id.as_ref().and_then(feature_id);
        }
        if raw.latitude.is_none() {
            raw.latitude = feature.geometry.as_ref().and_then(centroid_latitude);
        }
        if let Some(settlement) = raw.resolve(&label, &mut diagnostics) {
            if let Some(geometry) = feature.geometry.filter(|g| !g.is_null()) {
                geometries.insert(settlement.settlement_id.clone(), geometry);
            }
            settlements.push(settlement);
        }
    }
    Ok(ImportResult {
        settlements,
        diagnostics,
        geometries,
    })
}

fn feature_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Mean latitude over every vertex of a Point, LineString, Polygon or
/// Multi* geometry. `None` for empty or unsupported geometries.
pub fn centroid_latitude(geometry: &Value) -> Option<f64> {
    let coordinates = geometry.get("coordinates")?;
    let mut sum = 0.0;
    let mut count = 0usize;
    collect_latitudes(coordinates, &mut sum, &mut count);
    (count > 0).then(|| sum / count as f64)
}

fn collect_latitudes(value: &Value, sum: &mut f64, count: &mut usize) {
    let Some(items) = value.as_array() else {
        return;
    };
    // A position is [lon, lat, ...]
    if let (Some(_), Some(lat)) = (
        items.first().and_then(Value::as_f64),
        items.get(1).and_then(Value::as_f64),
    ) {
        *sum += lat;
        *count += 1;
        return;
    }
    for item in items {
        collect_latitudes(item, sum, count);
    }
}
