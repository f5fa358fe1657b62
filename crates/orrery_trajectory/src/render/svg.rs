//! Static SVG rendering of 3D traces.

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use super::Viewer;
use crate::error::RenderError;
use crate::figure::Figure;

const DEFAULT_SIZE: (u32, u32) = (1024, 768);

/// Draws the figure into an SVG file with a legend.
#[derive(Debug, Clone)]
pub struct SvgViewer {
    path: PathBuf,
    size: (u32, u32),
}

impl SvgViewer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Viewer for SvgViewer {
    fn show(&mut self, figure: &Figure) -> Result<(), RenderError> {
        draw(figure, &self.path, self.size).map_err(|e| RenderError::Drawing(e.to_string()))?;
        info!(path = %self.path.display(), "wrote SVG figure");
        Ok(())
    }
}

type PlotResult = Result<(), Box<dyn std::error::Error>>;

fn draw(figure: &Figure, path: &Path, size: (u32, u32)) -> PlotResult {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let [x_range, y_range, z_range] = extents(figure);

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if let Some(title) = figure.title() {
        builder.caption(title, ("sans-serif", 24));
    }
    // The ecliptic z axis is drawn vertically.
    let mut chart = builder.build_cartesian_3d(x_range, z_range, y_range)?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.1))
        .max_light_lines(4)
        .draw()?;

    for (i, trace) in figure.traces().iter().enumerate() {
        let style = Palette99::pick(i).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                trace.points().map(|(x, y, z)| (x, z, y)),
                style,
            ))?
            .label(trace.name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Padded per-axis data ranges; `(-1, 1)` for axes with no data.
fn extents(figure: &Figure) -> [Range<f64>; 3] {
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for (x, y, z) in figure.traces().iter().flat_map(|t| t.points()) {
        for (axis, value) in [x, y, z].into_iter().enumerate() {
            if value.is_finite() {
                lo[axis] = lo[axis].min(value);
                hi[axis] = hi[axis].max(value);
            }
        }
    }
    [0, 1, 2].map(|axis| padded(lo[axis], hi[axis]))
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    if lo > hi {
        return -1.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad)..(hi + pad)
}
