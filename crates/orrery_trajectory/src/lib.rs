//! Ephemeris sampling and trajectory plotting.
//!
//! [`sample_trajectory`] queries an [`EphemerisToolkit`](orrery_core::EphemerisToolkit)
//! at fixed steps over a [`TimeRange`]; [`render`] turns named trajectories
//! into a 3D line [`Figure`] and hands it to a [`Viewer`].

pub mod error;
pub mod figure;
pub mod render;
pub mod sampler;

pub use error::{RenderError, SampleError};
pub use figure::{Figure, HtmlOptions, PlotlyJs, Trace};
pub use render::{HtmlViewer, SvgViewer, Viewer, build_figure, render, render_figure};
pub use sampler::{MAX_SAMPLES, TimeRange, Trajectory, sample_trajectory, sample_with_correction};

#[cfg(test)]
mod send_sync {
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_sync() {
        assert_send_sync::<super::Figure>();
        assert_send_sync::<super::Trajectory>();
        assert_send_sync::<super::TimeRange>();
        assert_send_sync::<super::HtmlViewer>();
        assert_send_sync::<super::SvgViewer>();
    }
}
