//! PNG chart rendering with Plotters.
//!
//! Each renderer takes precomputed data from `analysis` and writes exactly one
//! file. Renderers return [`StageError::Plot`] instead of panicking so callers
//! can isolate failures per column.
//!
//! Text (titles, ticks, annotations) is drawn through the `ttf` feature (on by
//! default). Plotters has no usable text fallback, so a build without it
//! reports every chart as a plot error instead of drawing it.

use plotters::style::RGBColor;

use crate::error::StageError;

pub mod heatmap;
pub mod histogram;
pub mod timeline;

pub use heatmap::render_heatmap;
pub use histogram::render_distribution;
pub use timeline::render_time_series;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

fn finish(result: DrawResult) -> Result<(), StageError> {
    result.map_err(StageError::plot)
}

/// Fails fast when there is no font backend to draw chart text with.
fn text_backend() -> Result<(), StageError> {
    if cfg!(feature = "ttf") {
        Ok(())
    } else {
        Err(StageError::plot("built without the `ttf` feature; charts cannot draw text"))
    }
}

/// Diverging blue-white-red scale over `[-1, 1]` ("coolwarm").
pub fn coolwarm(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if !value.is_finite() {
        return NAN_CELL;
    }
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 { (MID, COLD, -v) } else { (MID, WARM, v) };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Fill for undefined correlation coefficients.
pub const NAN_CELL: RGBColor = RGBColor(160, 160, 160);
