use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SETTLEMENTS: &str = "\
settlement_id,population,num_buildings,distance_to_grid_km,dist_to_substations,dist_main_road_km,dist_lake_river_km,mean_rwi,has_nightlight,num_health_facilities,num_education_facilities
town,5000,800,2,50,0.5,30,0.8,12,0,1
village,300,60,80,120,1,1,-0.8,0,0,0
";

fn write_settlements(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("settlements.csv");
    fs::write(&path, SETTLEMENTS).unwrap();
    path
}

fn run_manifests(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("run-"))
        .count()
}

#[test]
fn config_defaults_prints_toml() {
    cargo_bin_cmd!("lcep")
        .args(["config", "defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[planning]"))
        .stdout(predicate::str::contains("discount_rate"));
}

#[test]
fn config_validate_accepts_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planning.toml");
    fs::write(&path, "[planning]\ndiscount_rate = 0.1\n").unwrap();
    cargo_bin_cmd!("lcep")
        .args(["config", "validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn config_validate_rejects_bad_rate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planning.toml");
    fs::write(&path, "[planning]\ndiscount_rate = -2.0\n").unwrap();
    cargo_bin_cmd!("lcep")
        .args(["config", "validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("discount_rate"));
}

#[test]
fn plan_writes_tables_and_summary() {
    let dir = tempdir().unwrap();
    let input = write_settlements(dir.path());
    let out = dir.path().join("out");
    cargo_bin_cmd!("lcep")
        .args([
            "plan",
            "--settlements",
            input.to_str().unwrap(),
            "--out-dir",
            out.to_str().unwrap(),
            "--threads",
            "2",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("TECHNOLOGY"))
        .stdout(predicate::str::contains("MiniGrid"));

    assert!(out.join("final_electrification_plan.csv").exists());
    assert!(out.join("demand_output.csv").exists());
    assert!(out.join("final_electrification_plan.json").exists());
    assert_eq!(run_manifests(&out), 1);

    let plan = fs::read_to_string(out.join("final_electrification_plan.csv")).unwrap();
    assert!(plan.contains("town"));
    assert!(plan.contains("village"));
}

#[test]
fn plan_writes_geojson_on_input_geometries() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("settlements.geojson");
    fs::write(
        &input,
        r#"{"type": "FeatureCollection", "features": [
  {"type": "Feature", "properties": {"settlement_id": "north", "population": 2500},
   "geometry": {"type": "Point", "coordinates": [2.5, 10.1]}}
]}"#,
    )
    .unwrap();
    let out = dir.path().join("out");
    cargo_bin_cmd!("lcep")
        .args([
            "plan",
            "--settlements",
            input.to_str().unwrap(),
            "--out-dir",
            out.to_str().unwrap(),
            "--geojson",
        ])
        .assert()
        .success();

    let plan: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.join("final_electrification_plan.geojson")).unwrap(),
    )
    .unwrap();
    let feature = &plan["features"][0];
    assert_eq!(feature["geometry"]["coordinates"][1], 10.1);
    assert_eq!(feature["properties"]["settlement_id"], "north");
    assert!(out.join("demand_output.geojson").exists());
    assert!(!out.join("final_electrification_plan.json").exists());
}

#[test]
fn plan_fails_on_missing_input() {
    let dir = tempdir().unwrap();
    cargo_bin_cmd!("lcep")
        .args([
            "plan",
            "--settlements",
            dir.path().join("absent.csv").to_str().unwrap(),
            "--out-dir",
            dir.path().join("out").to_str().unwrap(),
        ])
        .assert()
        .failure();
}

#[test]
fn batch_runs_scenarios() {
    let dir = tempdir().unwrap();
    let input = write_settlements(dir.path());
    let scenarios = dir.path().join("scenarios.yaml");
    fs::write(
        &scenarios,
        "\
version: 1
scenarios:
  - scenario_id: reference
  - scenario_id: costly-mv
    overrides:
      mv_cost_per_km: 2000000
",
    )
    .unwrap();
    let out = dir.path().join("batch");
    cargo_bin_cmd!("lcep")
        .args([
            "batch",
            "--settlements",
            input.to_str().unwrap(),
            "--scenarios",
            scenarios.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--threads",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("plan:costly-mv"));

    assert!(out.join("batch_manifest.json").exists());
    assert!(out.join("scenarios").join("scenario_manifest.json").exists());
    assert!(out
        .join("reference")
        .join("final_electrification_plan.csv")
        .exists());
    assert_eq!(run_manifests(&out), 1);
}
