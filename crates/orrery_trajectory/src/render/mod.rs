//! Figure construction and display.

mod html;
mod svg;

pub use html::HtmlViewer;
pub use svg::SvgViewer;

use tracing::info;

use crate::error::RenderError;
use crate::figure::{Figure, Trace};
use crate::sampler::Trajectory;

/// Something that can display a finished figure.
pub trait Viewer {
    fn show(&mut self, figure: &Figure) -> Result<(), RenderError>;
}

/// One line trace per `(name, trajectory)` pair, in order.
pub fn build_figure(trajectories: &[(&str, &Trajectory)]) -> Figure {
    let mut figure = Figure::new();
    for (name, trajectory) in trajectories {
        figure.add_trace(Trace::line(*name, trajectory));
    }
    figure
}

/// Build the figure, hand it to `viewer`, and return it.
pub fn render<V: Viewer + ?Sized>(
    viewer: &mut V,
    trajectories: &[(&str, &Trajectory)],
) -> Result<Figure, RenderError> {
    render_figure(viewer, build_figure(trajectories))
}

/// Display an already-built figure (e.g. one carrying a title).
pub fn render_figure<V: Viewer + ?Sized>(
    viewer: &mut V,
    figure: Figure,
) -> Result<Figure, RenderError> {
    viewer.show(&figure)?;
    info!(traces = figure.traces().len(), "figure rendered");
    Ok(figure)
}
