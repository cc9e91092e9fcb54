//! Plan and demand tables.
//!
//! Column names follow the electrification-plan layout planners already use
//! (`dem_res`, `lcoe_mg`, ...), so outputs can be joined back onto their
//! settlement layers. The GeoJSON writers carry the same rows as feature
//! properties on the geometries the settlements were read with.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lcep_core::{AnchorCategory, SettlementPlan, Technology};
use serde::Serialize;
use serde_json::{json, Value};

pub const PLAN_CSV: &str = "final_electrification_plan.csv";
pub const DEMAND_CSV: &str = "demand_output.csv";
pub const PLAN_JSON: &str = "final_electrification_plan.json";
pub const PLAN_GEOJSON: &str = "final_electrification_plan.geojson";
pub const DEMAND_GEOJSON: &str = "demand_output.geojson";

#[derive(Debug, Serialize)]
struct DemandRow<'a> {
    settlement_id: &'a str,
    population: f64,
    households: u64,
    tier: u8,
    urban: bool,
    dem_res: f64,
    dem_comm: f64,
    dem_agri: f64,
    dem_pub: f64,
    projected_demand: f64,
    projected_peak: f64,
}

impl<'a> DemandRow<'a> {
    fn from_plan(plan: &'a SettlementPlan) -> Self {
        let p = &plan.profile;
        DemandRow {
            settlement_id: &plan.settlement_id,
            population: plan.population,
            households: p.households,
            tier: p.tier.number(),
            urban: p.urban,
            dem_res: p.annual_kwh_base.value(),
            dem_comm: p.anchor_kwh(AnchorCategory::Commercial).value(),
            dem_agri: p.anchor_kwh(AnchorCategory::Agricultural).value(),
            dem_pub: p.anchor_kwh(AnchorCategory::Public).value(),
            projected_demand: p.annual_kwh_total_projected.value(),
            projected_peak: p.design_peak_kw.value(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    settlement_id: &'a str,
    population: f64,
    households: u64,
    tier: u8,
    urban: bool,
    dem_res: f64,
    dem_comm: f64,
    dem_agri: f64,
    dem_pub: f64,
    projected_demand: f64,
    projected_peak: f64,
    optimal_tech: &'static str,
    optimal_lcoe: f64,
    lcoe_grid: Option<f64>,
    lcoe_mg: Option<f64>,
    lcoe_shs: Option<f64>,
    total_investment: f64,
}

impl<'a> PlanRow<'a> {
    fn from_plan(plan: &'a SettlementPlan) -> Self {
        let d = DemandRow::from_plan(plan);
        let r = &plan.result;
        PlanRow {
            settlement_id: d.settlement_id,
            population: d.population,
            households: d.households,
            tier: d.tier,
            urban: d.urban,
            dem_res: d.dem_res,
            dem_comm: d.dem_comm,
            dem_agri: d.dem_agri,
            dem_pub: d.dem_pub,
            projected_demand: d.projected_demand,
            projected_peak: d.projected_peak,
            optimal_tech: r.optimal_tech.as_str(),
            optimal_lcoe: r.optimal_lcoe.value(),
            lcoe_grid: r.candidate_lcoe(Technology::Grid).map(|l| l.value()),
            lcoe_mg: r.candidate_lcoe(Technology::MiniGrid).map(|l| l.value()),
            lcoe_shs: r.candidate_lcoe(Technology::Shs).map(|l| l.value()),
            total_investment: r.total_investment.value(),
        }
    }
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    File::create(path).with_context(|| format!("creating '{}'", path.display()))
}

fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(create(path)?));
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per planned settlement: demand breakdown, decision and LCOEs.
/// Candidates that did not compete leave their LCOE cell empty.
pub fn write_plan_csv(path: &Path, plans: &[SettlementPlan]) -> Result<()> {
    write_rows(path, plans.iter().map(PlanRow::from_plan))
        .with_context(|| format!("writing plan CSV '{}'", path.display()))
}

pub fn write_demand_csv(path: &Path, plans: &[SettlementPlan]) -> Result<()> {
    write_rows(path, plans.iter().map(DemandRow::from_plan))
        .with_context(|| format!("writing demand CSV '{}'", path.display()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Full plans, including anchor breakdowns, as pretty JSON.
pub fn write_plan_json(path: &Path, plans: &[SettlementPlan]) -> Result<()> {
    write_json(path, plans).with_context(|| format!("writing plan JSON '{}'", path.display()))
}

/// Wrap rows as a `FeatureCollection`. Settlements without a known geometry
/// get a `null` geometry, which GeoJSON allows.
fn feature_collection<'a, T: Serialize>(
    rows: impl Iterator<Item = (&'a str, T)>,
    geometries: &HashMap<String, Value>,
) -> Result<Value> {
    let features = rows
        .map(|(id, row)| -> Result<Value> {
            Ok(json!({
                "type": "Feature",
                "geometry": geometries.get(id).cloned().unwrap_or(Value::Null),
                "properties": serde_json::to_value(row)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(json!({ "type": "FeatureCollection", "features": features }))
}

/// The plan table as GeoJSON, one feature per settlement on its input
/// geometry.
pub fn write_plan_geojson(
    path: &Path,
    plans: &[SettlementPlan],
    geometries: &HashMap<String, Value>,
) -> Result<()> {
    let rows = plans
        .iter()
        .map(|p| (p.settlement_id.as_str(), PlanRow::from_plan(p)));
    feature_collection(rows, geometries)
        .and_then(|collection| write_json(path, &collection))
        .with_context(|| format!("writing plan GeoJSON '{}'", path.display()))
}

pub fn write_demand_geojson(
    path: &Path,
    plans: &[SettlementPlan],
    geometries: &HashMap<String, Value>,
) -> Result<()> {
    let rows = plans
        .iter()
        .map(|p| (p.settlement_id.as_str(), DemandRow::from_plan(p)));
    feature_collection(rows, geometries)
        .and_then(|collection| write_json(path, &collection))
        .with_context(|| format!("writing demand GeoJSON '{}'", path.display()))
}
