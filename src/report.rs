//! Text, CSV, and JSON outputs for completed simulations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;

use crate::config::{SimulationSpec, WalkerKind};
use crate::error::EngineError;
use crate::runner::SimulationResult;

/// Aggregate statistics for one simulation, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateStats {
    pub times_run: usize,
    pub mean_endpoint_distance: f64,
    pub endpoint_distance_variance: f64,
    pub mean_distance_from_origin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_distance_from_axis: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_y_axis_crossings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_radius_exit_step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_steps_to_completion: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub name: String,
    pub config: SimulationSpec,
    pub stats: AggregateStats,
}

pub fn summarize(result: &SimulationResult) -> Result<SimulationSummary, EngineError> {
    let n = result.config.num_of_steps;
    let stats = AggregateStats {
        times_run: result.times_run(),
        mean_endpoint_distance: result.mean_endpoint_distance(),
        endpoint_distance_variance: result.endpoint_distance_variance(),
        mean_distance_from_origin: result.mean_distance_from_origin_after(n)?,
        mean_distance_from_axis: result.mean_distance_from_axis_after(n)?,
        mean_y_axis_crossings: result.mean_times_crossed_y_axis()?,
        mean_radius_exit_step: result.mean_radius_exit_step(),
        mean_steps_to_completion: match result.config.walker_type {
            WalkerKind::Searcher => Some(result.mean_steps_to_completion()),
            _ => None,
        },
    };
    Ok(SimulationSummary {
        name: result.name.clone(),
        config: result.config.clone(),
        stats,
    })
}

/// Human-readable stats block for one simulation.
pub fn summary_text(summary: &SimulationSummary) -> String {
    let steps = summary.config.num_of_steps;
    let mut lines = vec![
        format!(
            "Results for {}: {} steps and {} runs",
            summary.name, steps, summary.stats.times_run
        ),
        format!(
            "  Average distance from origin after {steps} steps: {:.4}",
            summary.stats.mean_distance_from_origin
        ),
        format!(
            "  Endpoint distance mean/variance: {:.4} / {:.4}",
            summary.stats.mean_endpoint_distance, summary.stats.endpoint_distance_variance
        ),
    ];
    if let (Some(axis), Some(dist)) = (&summary.config.axis, summary.stats.mean_distance_from_axis)
    {
        lines.push(format!(
            "  Average distance from axis {:?} after {steps} steps: {dist:.4}",
            axis.components()
        ));
    }
    if let Some(crossings) = summary.stats.mean_y_axis_crossings {
        lines.push(format!(
            "  Average number of y-axis crossings: {crossings:.4}"
        ));
    }
    if let (Some(radius), Some(step)) = (summary.config.radius, summary.stats.mean_radius_exit_step)
    {
        lines.push(format!(
            "  Average step at which the walker exited the {radius} radius: {step:.4}"
        ));
    }
    if let Some(steps_to_done) = summary.stats.mean_steps_to_completion {
        lines.push(format!(
            "  Average steps to reach the target: {steps_to_done:.4}"
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Write the text report for a batch of simulations.
pub fn write_report(path: &Path, summaries: &[SimulationSummary]) -> anyhow::Result<()> {
    let text: String = summaries.iter().map(summary_text).collect::<Vec<_>>().join("\n");
    fs::write(path, text)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(())
}

/// One CSV row per run: id, steps taken, endpoint components, endpoint
/// distance. Headers are built dynamically because the component count
/// depends on `n_dim`.
pub fn write_endpoints_csv(path: &Path, result: &SimulationResult) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;

    let mut header = vec!["run".to_string(), "steps_taken".to_string()];
    header.extend((0..result.n_dim()).map(|axis| format!("x{axis}")));
    header.push("endpoint_distance".to_string());
    writer.write_record(&header)?;

    for (run_id, trajectory) in result.trajectories.iter().enumerate() {
        let mut row = vec![
            run_id.to_string(),
            trajectory.steps_taken().to_string(),
        ];
        row.extend(
            trajectory
                .final_position()
                .components()
                .iter()
                .map(|c| c.to_string()),
        );
        row.push(result.endpoint_distances[run_id].to_string());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON summary for a batch of simulations.
pub fn write_summary_json(path: &Path, summaries: &[SimulationSummary]) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(summaries)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write summary {}", path.display()))?;
    Ok(())
}

/// Create a fresh `walks-<timestamp>` directory under `base_dir` for this
/// batch's outputs, suffixing a counter when two batches start within the
/// same second.
pub fn create_timestamped_run_dir(base_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(base_dir)
        .with_context(|| format!("failed to create output base directory {}", base_dir.display()))?;

    let stamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    for attempt in 0u32.. {
        let run_dir = match attempt {
            0 => base_dir.join(format!("walks-{stamp}")),
            n => base_dir.join(format!("walks-{stamp}-{n:02}")),
        };
        if !run_dir.exists() {
            fs::create_dir_all(&run_dir)?;
            return Ok(run_dir);
        }
    }
    anyhow::bail!("exhausted run directory names under {}", base_dir.display())
}
