use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::report::Report;

const CHART_SIZE: (u32, u32) = (900, 500);
const BAR_BLUE: RGBColor = RGBColor(68, 114, 196);

/// Paths of the chart images rendered by [`render_charts`].
#[derive(Debug, Clone)]
pub struct ChartSet {
    /// Line chart of per-month sales totals.
    pub monthly_trend: PathBuf,
    /// Horizontal bar chart of the top salespeople.
    pub top_salespeople: PathBuf,
}

/// Renders both report charts as PNG files under `out_dir`.
///
/// The output directory is created first, including any missing parents.
/// No aggregation happens here: the charts are a pure rendering of the
/// already-computed report, so the only failures are I/O and font loading,
/// and those are fatal for the run.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created or either
/// image cannot be drawn or written.
pub fn render_charts(report: &Report, out_dir: impl AsRef<Path>) -> Result<ChartSet> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let monthly_trend = out_dir.join("monthly_sales.png");
    draw_monthly_trend(report, &monthly_trend)
        .with_context(|| format!("{}", monthly_trend.display()))?;
    let top_salespeople = out_dir.join("top_salespeople.png");
    draw_top_salespeople(report, &top_salespeople)
        .with_context(|| format!("{}", top_salespeople.display()))?;
    Ok(ChartSet {
        monthly_trend,
        top_salespeople,
    })
}

fn draw_monthly_trend(report: &Report, path: &Path) -> Result<()> {
    let months: Vec<String> = report
        .monthly
        .keys()
        .map(|month| month.format("%Y-%m").to_string())
        .collect();
    let totals: Vec<f64> = report.monthly.values().map(|total| total.dollars()).collect();
    let y_max = totals.iter().copied().fold(1.0_f64, f64::max) * 1.1;
    let x_max = (months.len().max(2) - 1) as i32;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Sales", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0..x_max, 0.0..y_max)
        .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;
    chart
        .configure_mesh()
        .x_labels(months.len().max(1))
        .x_label_formatter(&|i| months.get(*i as usize).cloned().unwrap_or_default())
        .y_label_formatter(&|v| format!("${v:.0}"))
        .draw()
        .map_err(|e| anyhow!("failed to draw chart grid: {e}"))?;
    chart
        .draw_series(LineSeries::new(
            totals.iter().enumerate().map(|(i, total)| (i as i32, *total)),
            &BLUE,
        ))
        .map_err(|e| anyhow!("failed to draw trend line: {e}"))?;
    chart
        .draw_series(
            totals
                .iter()
                .enumerate()
                .map(|(i, total)| Circle::new((i as i32, *total), 4, BLUE.filled())),
        )
        .map_err(|e| anyhow!("failed to draw trend markers: {e}"))?;
    root.present()
        .map_err(|e| anyhow!("failed to write chart image: {e}"))?;
    Ok(())
}

fn draw_top_salespeople(report: &Report, path: &Path) -> Result<()> {
    // Bar rows run bottom to top, so reversing the descending ranking puts
    // the biggest seller at the top of the chart.
    let rows: Vec<(String, f64)> = report
        .top_salespeople
        .iter()
        .rev()
        .map(|(name, total)| (name.clone(), total.dollars()))
        .collect();
    let x_max = rows.iter().map(|(_, total)| *total).fold(1.0_f64, f64::max) * 1.1;
    let n = rows.len().max(1) as i32;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Top Salespeople", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())
        .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len().max(1))
        .y_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) => rows
                .get(*i as usize)
                .map(|(name, _)| name.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_formatter(&|v| format!("${v:.0}"))
        .draw()
        .map_err(|e| anyhow!("failed to draw chart grid: {e}"))?;
    chart
        .draw_series(rows.iter().enumerate().map(|(i, (_, total))| {
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i as i32)),
                    (*total, SegmentValue::Exact(i as i32 + 1)),
                ],
                BAR_BLUE.filled(),
            )
        }))
        .map_err(|e| anyhow!("failed to draw bars: {e}"))?;
    root.present()
        .map_err(|e| anyhow!("failed to write chart image: {e}"))?;
    Ok(())
}
