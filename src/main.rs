use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use randwalk::plot::{make_plots, plot_mean_distances};
use randwalk::report::{
    create_timestamped_run_dir, summarize, summary_text, write_endpoints_csv, write_report,
    write_summary_json,
};
use randwalk::{load_config, SimulationRunner};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Simulate configured random walks and write stats, CSV, and graphs"
)]
struct Cli {
    /// JSON configuration file mapping simulation names to walker specs
    config: PathBuf,

    /// Output base directory; each invocation writes into a timestamped
    /// subdirectory
    #[arg(long, default_value = "output-randwalk")]
    output: PathBuf,

    /// Override the seed of every configured simulation
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    anyhow::ensure!(!config.is_empty(), "no simulations configured");
    if let Some(seed) = cli.seed {
        for spec in config.values_mut() {
            spec.seed = seed;
        }
    }

    // Build every runner up front: a bad entry aborts the batch before any
    // walk takes a step.
    let mut runners = Vec::with_capacity(config.len());
    for (name, spec) in &config {
        let runner = SimulationRunner::from_spec(name, spec)
            .with_context(|| format!("invalid configuration for simulation {name:?}"))?;
        runners.push(runner);
    }

    let run_dir = create_timestamped_run_dir(&cli.output)?;

    let mut results = Vec::with_capacity(runners.len());
    let mut summaries = Vec::with_capacity(runners.len());
    for runner in &runners {
        let result = runner
            .run()
            .with_context(|| format!("simulation {:?} failed", runner.name()))?;
        let summary = summarize(&result)
            .with_context(|| format!("failed to summarize simulation {:?}", runner.name()))?;
        println!("{}", summary_text(&summary));
        results.push(result);
        summaries.push(summary);
    }

    let report_path = run_dir.join("report.txt");
    write_report(&report_path, &summaries)?;

    let summary_path = run_dir.join("summary.json");
    write_summary_json(&summary_path, &summaries)?;

    let mut plot_paths = Vec::new();
    for result in &results {
        let csv_path = run_dir.join(format!("{}_endpoints.csv", result.name));
        write_endpoints_csv(&csv_path, result)?;
        plot_paths.extend(make_plots(result, &run_dir)?);
    }
    let batch_plot = run_dir.join("mean_endpoint_distance.png");
    plot_mean_distances(&results, &batch_plot)?;
    plot_paths.push(batch_plot);

    println!("Run directory: {}", run_dir.display());
    println!("Report: {}", report_path.display());
    println!("Summary: {}", summary_path.display());
    for path in &plot_paths {
        println!("Plot: {}", path.display());
    }

    Ok(())
}
