//! Monthly record-count line plot.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use crate::analysis::MonthlyCounts;
use crate::error::StageError;
use crate::plot::{DrawResult, finish, text_backend};

const SIZE: (u32, u32) = (1200, 600);
const LINE: RGBColor = RGBColor(76, 114, 176);

pub fn render_time_series(path: &Path, series: &MonthlyCounts) -> Result<(), StageError> {
    if series.points.is_empty() {
        return Err(StageError::Plot(format!(
            "column `{}` has no parseable dates",
            series.column
        )));
    }
    text_backend()?;
    finish(draw(path, series))
}

/// Months since year 0, so consecutive months are one unit apart.
fn month_index(d: NaiveDate) -> f64 {
    f64::from(d.year()) * 12.0 + f64::from(d.month0())
}

fn month_label(v: f64) -> String {
    let idx = v.round() as i64;
    format!("{}-{:02}", idx.div_euclid(12), idx.rem_euclid(12) + 1)
}

fn draw(path: &Path, series: &MonthlyCounts) -> DrawResult {
    let xs: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|(d, c)| (month_index(*d), *c as f64))
        .collect();

    let (mut x0, mut x1) = (xs[0].0, xs[xs.len() - 1].0);
    if x1 <= x0 {
        x0 -= 1.0;
        x1 += 1.0;
    }
    let y1 = (series.max_count() as f64 * 1.1).max(1.0);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Time Series Analysis for {}", series.column), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x0..x1, 0.0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Count")
        .x_labels(12)
        .x_label_formatter(&|v| month_label(*v))
        .draw()?;

    chart.draw_series(LineSeries::new(xs.iter().copied(), LINE.stroke_width(2)))?;
    chart.draw_series(xs.iter().map(|&p| Circle::new(p, 3, LINE.filled())))?;

    root.present()?;
    Ok(())
}
