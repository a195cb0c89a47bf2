use anyhow::Context;
use clap::Parser;
use generator::scene::build_scene;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline food mass estimation driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Seed for the synthetic scene's depth noise and dropout
    #[arg(long)]
    seed: Option<u64>,
    /// Distance in cm between the reference object's surface and the plate
    #[arg(long)]
    plate_offset: Option<f64>,
    /// Reference object radius in cm
    #[arg(long)]
    reference_radius: Option<f64>,
    /// Append a JSON line per run to this file
    #[arg(long, default_value = "tools/data/mass_estimates.jsonl")]
    report: PathBuf,
}

#[derive(Serialize)]
struct ReportLine<'a> {
    seed: u64,
    report: &'a foodmasscore::EstimationReport,
    metrics: foodmasscore::telemetry::MetricsSnapshot,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = match args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    }
    .with_overrides(args.seed, args.plate_offset, args.reference_radius);

    let scene = build_scene(&workflow_config.scene).context("building synthetic scene")?;
    let runner = Runner::new(workflow_config.clone());
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the pipeline")?;
    let result = runtime.block_on(runner.execute(scene))?;

    for estimate in &result.report.estimates {
        println!("{:<16} {:>10.2} g", estimate.name, estimate.mass);
    }
    for failure in &result.report.failures {
        println!("{:<16} skipped: {}", failure.name, failure.error);
    }
    if result.report.is_degraded() {
        println!("degraded: {:?}", result.report.degradations);
    }

    let line = serde_json::to_string(&ReportLine {
        seed: workflow_config.scene.seed,
        report: &result.report,
        metrics: result.metrics,
    })
    .context("serializing run report")?;

    if let Some(parent) = args.report.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.report)
        .with_context(|| format!("opening report {}", args.report.display()))?;
    writeln!(file, "{}", line)?;

    Ok(())
}
