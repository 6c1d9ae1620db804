//! Chart rendering for 2D and 3D simulations.
//!
//! Walks in higher dimensions are simulated but never rendered; `make_plots`
//! simply returns no paths for them.

use std::path::{Path, PathBuf};

use anyhow::Context;
use plotters::prelude::*;

use crate::coord::Coord;
use crate::runner::SimulationResult;

const PLOT_SIZE: (u32, u32) = (1280, 720);

/// Render every chart that applies to `result` into `dir`, returning the
/// written file paths.
pub fn make_plots(result: &SimulationResult, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    match result.n_dim() {
        2 => {
            let path = dir.join(format!("{}_avg_path.png", result.name));
            plot_average_path_2d(result, &path)?;
            written.push(path);

            let path = dir.join(format!("{}_endpoints.png", result.name));
            plot_endpoint_scatter(result, &path)?;
            written.push(path);
        }
        3 => {
            let path = dir.join(format!("{}_avg_path.png", result.name));
            plot_average_path_3d(result, &path)?;
            written.push(path);
        }
        _ => {}
    }
    Ok(written)
}

fn plot_average_path_2d(result: &SimulationResult, path: &Path) -> anyhow::Result<()> {
    let averaged = result.average_path();
    let xs: Vec<f64> = averaged.iter().map(|c| c.components()[0]).collect();
    let ys: Vec<f64> = averaged.iter().map(|c| c.components()[1]).collect();

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("failed to draw {}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Average walker path: {}", result.name),
            ("sans-serif", 34).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(padded_range(&xs), padded_range(&ys))?;

    chart
        .configure_mesh()
        .x_desc("X position")
        .y_desc("Y position")
        .draw()?;

    chart.draw_series(LineSeries::new(
        xs.iter().copied().zip(ys.iter().copied()),
        &RED,
    ))?;

    root.present()?;
    Ok(())
}

fn plot_average_path_3d(result: &SimulationResult, path: &Path) -> anyhow::Result<()> {
    let averaged = result.average_path();
    let xs: Vec<f64> = averaged.iter().map(|c| c.components()[0]).collect();
    let ys: Vec<f64> = averaged.iter().map(|c| c.components()[1]).collect();
    let zs: Vec<f64> = averaged.iter().map(|c| c.components()[2]).collect();

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("failed to draw {}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Average walker path: {}", result.name),
            ("sans-serif", 34).into_font(),
        )
        .margin(20)
        .build_cartesian_3d(padded_range(&xs), padded_range(&ys), padded_range(&zs))?;

    chart.configure_axes().draw()?;

    chart.draw_series(LineSeries::new(
        averaged
            .iter()
            .map(|c| (c.components()[0], c.components()[1], c.components()[2])),
        &RED,
    ))?;

    root.present()?;
    Ok(())
}

fn plot_endpoint_scatter(result: &SimulationResult, path: &Path) -> anyhow::Result<()> {
    let endpoints: Vec<&Coord> = result
        .trajectories
        .iter()
        .map(|t| t.final_position())
        .collect();
    let xs: Vec<f64> = endpoints.iter().map(|c| c.components()[0]).collect();
    let ys: Vec<f64> = endpoints.iter().map(|c| c.components()[1]).collect();

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("failed to draw {}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Run endpoints: {}", result.name),
            ("sans-serif", 34).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(padded_range(&xs), padded_range(&ys))?;

    chart
        .configure_mesh()
        .x_desc("X position")
        .y_desc("Y position")
        .draw()?;

    chart.draw_series(
        xs.iter()
            .copied()
            .zip(ys.iter().copied())
            .map(|point| Circle::new(point, 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Mean endpoint distance per simulation, one point per entry, across the
/// whole batch.
pub fn plot_mean_distances(results: &[SimulationResult], path: &Path) -> anyhow::Result<()> {
    let means: Vec<f64> = results.iter().map(|r| r.mean_endpoint_distance()).collect();
    if means.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("failed to draw {}", path.display()))?;

    let max_mean = means.iter().copied().fold(0.0_f64, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Mean endpoint distance by simulation",
            ("sans-serif", 34).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..means.len() as f64 - 0.5, 0.0..max_mean * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Simulation index")
        .y_desc("Mean endpoint distance")
        .draw()?;

    chart.draw_series(
        means
            .iter()
            .enumerate()
            .map(|(i, mean)| Circle::new((i as f64, *mean), 5, RED.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn padded_range(values: &[f64]) -> std::ops::Range<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return -1.0..1.0;
    }
    let span = (max - min).max(1.0);
    (min - 0.1 * span)..(max + 0.1 * span)
}
