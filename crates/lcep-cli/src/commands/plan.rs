use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use lcep_algo::{plan_all, PlanSummary};
use lcep_core::Technology;
use lcep_io::{
    load_settlements, write_demand_csv, write_demand_geojson, write_plan_csv, write_plan_geojson,
    write_plan_json, DEMAND_CSV, DEMAND_GEOJSON, PLAN_CSV, PLAN_GEOJSON, PLAN_JSON,
};
use lcep_cli::manifest::{record_manifest, RunInputs};
use tabwriter::TabWriter;
use tracing::{info, warn};

use crate::commands::util::{configure_threads, load_config, log_diagnostics};

pub struct PlanArgs<'a> {
    pub settlements: &'a Path,
    pub config: Option<&'a Path>,
    pub out_dir: &'a Path,
    pub threads: &'a str,
    pub json: bool,
    pub geojson: bool,
}

pub fn handle(args: &PlanArgs<'_>) -> Result<()> {
    let start = Instant::now();
    let config = load_config(args.config)?;
    let threads = configure_threads(args.threads)?;

    let imported = load_settlements(args.settlements)?;
    log_diagnostics(&imported.diagnostics);
    if imported.settlements.is_empty() {
        return Err(anyhow!(
            "no settlements could be read from '{}'",
            args.settlements.display()
        ));
    }

    let outcome = plan_all(&imported.settlements, &config).context("planning settlements")?;
    for rejection in &outcome.rejected {
        warn!(
            settlement = %rejection.settlement_id,
            "rejected: {}",
            rejection.reason
        );
    }
    info!(
        planned = outcome.plans.len(),
        rejected = outcome.rejected.len(),
        threads,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "planning finished"
    );

    let mut outputs: Vec<PathBuf> = vec![args.out_dir.join(PLAN_CSV), args.out_dir.join(DEMAND_CSV)];
    write_plan_csv(&outputs[0], &outcome.plans)?;
    write_demand_csv(&outputs[1], &outcome.plans)?;
    if args.json {
        let path = args.out_dir.join(PLAN_JSON);
        write_plan_json(&path, &outcome.plans)?;
        outputs.push(path);
    }
    if args.geojson {
        if imported.geometries.is_empty() {
            warn!("settlements carry no geometries; GeoJSON features will have null geometry");
        }
        let plan_path = args.out_dir.join(PLAN_GEOJSON);
        write_plan_geojson(&plan_path, &outcome.plans, &imported.geometries)?;
        let demand_path = args.out_dir.join(DEMAND_GEOJSON);
        write_demand_geojson(&demand_path, &outcome.plans, &imported.geometries)?;
        outputs.extend([plan_path, demand_path]);
    }

    let summary = PlanSummary::from_plans(&outcome.plans);
    print_summary(&summary, outcome.rejected.len())?;

    let manifest = record_manifest(
        args.out_dir,
        &RunInputs {
            command: "plan",
            settlements: args.settlements,
            config: args.config,
        },
        &outputs,
        &[
            ("threads", args.threads.to_string()),
            ("planned", outcome.plans.len().to_string()),
            ("rejected", outcome.rejected.len().to_string()),
        ],
    )?;
    println!("Recorded run manifest {}", manifest.display());
    Ok(())
}

fn print_summary(summary: &PlanSummary, rejected: usize) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "TECHNOLOGY\tSETTLEMENTS\tSHARE\tPOPULATION\tINVESTMENT (USD)")?;
    for tech in Technology::ALL {
        let totals = summary.totals(tech);
        writeln!(
            writer,
            "{}\t{}\t{:.1}%\t{:.0}\t{:.0}",
            tech,
            totals.settlements,
            summary.share(tech) * 100.0,
            totals.population,
            totals.investment.value()
        )?;
    }
    writeln!(
        writer,
        "TOTAL\t{}\t\t\t{:.0}",
        summary.settlements,
        summary.total_investment.value()
    )?;
    writer.flush()?;
    if rejected > 0 {
        println!("{rejected} settlement(s) rejected; see log for reasons");
    }
    Ok(())
}
