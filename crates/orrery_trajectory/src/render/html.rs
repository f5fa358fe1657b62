use std::path::{Path, PathBuf};

use tracing::info;

use super::Viewer;
use crate::error::RenderError;
use crate::figure::{Figure, HtmlOptions};

/// Writes the figure as an interactive plotly.js page.
#[derive(Debug, Clone)]
pub struct HtmlViewer {
    path: PathBuf,
    options: HtmlOptions,
}

impl HtmlViewer {
    /// Complete HTML document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: HtmlOptions::default(),
        }
    }

    pub fn with_options(mut self, options: HtmlOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Viewer for HtmlViewer {
    fn show(&mut self, figure: &Figure) -> Result<(), RenderError> {
        figure.write_html(&self.path, &self.options)?;
        info!(path = %self.path.display(), full_html = self.options.full_html, "wrote HTML figure");
        Ok(())
    }
}
