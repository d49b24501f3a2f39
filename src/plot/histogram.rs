//! Histogram with an overlaid density curve.

use std::path::Path;

use plotters::prelude::*;

use crate::analysis::Distribution;
use crate::error::StageError;
use crate::plot::{DrawResult, finish, text_backend};

const SIZE: (u32, u32) = (1000, 500);
const BAR: RGBColor = RGBColor(76, 114, 176);
const CURVE: RGBColor = RGBColor(31, 60, 120);

/// Write `<path>` as a PNG histogram titled `Distribution of <column>`.
pub fn render_distribution(path: &Path, dist: &Distribution) -> Result<(), StageError> {
    text_backend()?;
    finish(draw(path, dist))
}

fn draw(path: &Path, dist: &Distribution) -> DrawResult {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = dist.x_range();
    let y1 = (dist.y_max() * 1.05).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {}", dist.column), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x0..x1, 0.0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(dist.column.as_str())
        .y_desc("Count")
        .draw()?;

    chart.draw_series(
        dist.bins
            .iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BAR.mix(0.55).filled())),
    )?;
    chart.draw_series(
        dist.bins
            .iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BAR.stroke_width(1))),
    )?;

    if !dist.density.is_empty() {
        chart.draw_series(LineSeries::new(dist.density.iter().copied(), CURVE.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}
