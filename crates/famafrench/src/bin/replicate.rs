//! Fama-French factor replication CLI.
//!
//! Reads accounting and security-month CSV files, builds the monthly SMB and
//! HML series, and optionally compares them with a published reference.
//!
//! Usage: `cargo run --features cli --bin replicate -- --accounting comp.csv --securities crsp_m.csv`

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use famafrench::{
    data::{
        comparison_to_frame, counts_to_frame, factors_to_frame, read_accounting, read_reference,
        read_securities, write_csv,
    },
    model::{FactorPipeline, PipelineConfig, PipelineInputs, PipelineOutput},
};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "replicate")]
#[command(about = "Replicate the Fama-French SMB and HML factors", long_about = None)]
#[command(version)]
struct Cli {
    /// Annual accounting records (CSV)
    #[arg(long)]
    accounting: PathBuf,

    /// Monthly security records (CSV)
    #[arg(long)]
    securities: PathBuf,

    /// Published factor series to validate against (CSV, YYYYMM dates, percent)
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Pipeline configuration overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the monthly factors (CSV)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the monthly cell counts (CSV)
    #[arg(long)]
    counts_output: Option<PathBuf>,

    /// Where to write the replicated vs reference comparison (CSV)
    #[arg(long)]
    comparison_output: Option<PathBuf>,

    /// Log per-stage record counts
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(level.into()).from_env_lossy())
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;
    let pipeline = FactorPipeline::with_config(config).context("invalid pipeline configuration")?;

    let accounting = read_accounting(&cli.accounting)
        .with_context(|| format!("failed to read accounting file {}", cli.accounting.display()))?;
    let securities = read_securities(&cli.securities)
        .with_context(|| format!("failed to read security file {}", cli.securities.display()))?;
    let reference = match &cli.reference {
        Some(path) => read_reference(path)
            .with_context(|| format!("failed to read reference file {}", path.display()))?,
        None => Vec::new(),
    };
    info!(
        accounting = accounting.len(),
        securities = securities.len(),
        reference = reference.len(),
        "inputs loaded"
    );

    let output = pipeline.run(PipelineInputs {
        accounting: &accounting,
        securities: &securities,
        reference: &reference,
    })?;

    write_outputs(&cli, &output)?;
    print_summary(&output, cli.reference.is_some());
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn write_outputs(cli: &Cli, output: &PipelineOutput) -> Result<()> {
    if let Some(path) = &cli.output {
        let mut df = factors_to_frame(&output.factors)?;
        write_csv(&mut df, path)
            .with_context(|| format!("failed to write factors to {}", path.display()))?;
        info!(path = %path.display(), rows = df.height(), "factors written");
    }
    if let Some(path) = &cli.counts_output {
        let mut df = counts_to_frame(&output.counts)?;
        write_csv(&mut df, path)
            .with_context(|| format!("failed to write counts to {}", path.display()))?;
        info!(path = %path.display(), rows = df.height(), "counts written");
    }
    if let Some(path) = &cli.comparison_output {
        let mut df = comparison_to_frame(&output.validation)?;
        write_csv(&mut df, path)
            .with_context(|| format!("failed to write comparison to {}", path.display()))?;
        info!(path = %path.display(), rows = df.height(), "comparison written");
    }
    Ok(())
}

fn print_summary(output: &PipelineOutput, validated: bool) {
    let (Some(first), Some(last)) = (output.factors.first(), output.factors.last()) else {
        println!("No factor months produced.");
        return;
    };

    println!("\n=== Fama-French Factor Replication ===");
    println!("Months:          {} ({} to {})", output.factors.len(), first.month, last.month);
    println!("Rebalance dates: {}", output.breakpoints.len());
    let assigned = output.assignments.iter().filter(|a| a.has_valid_bucket()).count();
    println!("Assignments:     {assigned} of {}", output.assignments.len());

    if !validated {
        return;
    }
    let report = &output.validation;
    let fmt = |c: Option<f64>| c.map_or_else(|| "n/a".to_string(), |c| format!("{c:.4}"));
    println!("\n--- Validation ---");
    println!("SMB correlation: {} ({} months)", fmt(report.smb_correlation), report.smb_observations);
    println!("HML correlation: {} ({} months)", fmt(report.hml_correlation), report.hml_observations);
    println!(
        "Threshold {:.2}: {}",
        report.threshold,
        if report.accepts() { "accepted" } else { "rejected" }
    );
}
