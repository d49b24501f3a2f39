//! Annotated correlation heatmap.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::analysis::CorrelationMatrix;
use crate::error::StageError;
use crate::plot::{DrawResult, coolwarm, finish, text_backend};

const SIZE: (u32, u32) = (1200, 1000);

pub fn render_heatmap(path: &Path, corr: &CorrelationMatrix) -> Result<(), StageError> {
    text_backend()?;
    finish(draw(path, corr))
}

/// Label for a tick at `v` when it sits on a cell centre.
fn center_label(labels: &[String], v: f64, reversed: bool) -> String {
    if (v - v.floor() - 0.5).abs() > 1e-6 {
        return String::new();
    }
    let idx = v.floor() as usize;
    let idx = if reversed { labels.len().checked_sub(idx + 1) } else { Some(idx) };
    idx.and_then(|i| labels.get(i)).cloned().unwrap_or_default()
}

fn draw(path: &Path, corr: &CorrelationMatrix) -> DrawResult {
    let n = corr.labels.len();
    let size = n as f64;
    let labels = &corr.labels;

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Heatmap", ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(160)
        .build_cartesian_2d(0.0..size, 0.0..size)?;

    // Ticks land on half-cells, so every cell centre gets one.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(2 * n + 1)
        .y_labels(2 * n + 1)
        .x_label_formatter(&|v| center_label(labels, *v, false))
        .y_label_formatter(&|v| center_label(labels, *v, true))
        .draw()?;

    // Row 0 is drawn at the top.
    let cells = (0..n).flat_map(|i| (0..n).map(move |j| (i, j)));
    chart.draw_series(cells.clone().map(|(i, j)| {
        let y = (n - 1 - i) as f64;
        let x = j as f64;
        Rectangle::new([(x, y), (x + 1.0, y + 1.0)], coolwarm(corr.get(i, j)).filled())
    }))?;

    let font_size = if n > 15 { 10 } else { 16 };
    let annotation = ("sans-serif", font_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(cells.map(|(i, j)| {
        let r = corr.get(i, j);
        let text = if r.is_finite() { format!("{r:.2}") } else { "nan".to_string() };
        Text::new(text, (j as f64 + 0.5, (n - 1 - i) as f64 + 0.5), annotation.clone())
    }))?;

    root.present()?;
    Ok(())
}
