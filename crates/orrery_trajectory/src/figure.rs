//! Plotly-compatible 3D line figures.
//!
//! A [`Figure`] serializes to the `{ data, layout }` JSON plotly.js expects,
//! and can be written out as a standalone HTML document or an embeddable
//! `<div>` fragment.

use std::path::Path;

use serde::Serialize;

use crate::error::RenderError;
use crate::sampler::Trajectory;

pub const PLOTLY_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const MATHJAX_CDN_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.5/MathJax.js?config=TeX-AMS-MML_SVG";

/// One named 3D line series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl Trace {
    /// Line-mode `scatter3d` trace of a trajectory, order preserved.
    pub fn line(name: impl Into<String>, trajectory: &Trajectory) -> Self {
        Self {
            kind: "scatter3d",
            mode: "lines",
            name: name.into(),
            x: trajectory.axis(0),
            y: trajectory.axis(1),
            z: trajectory.axis(2),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> &str {
        self.mode
    }

    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Points as `(x, y, z)` tuples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| (x, y, z))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Title {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Axis {
    title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Scene {
    xaxis: Axis,
    yaxis: Axis,
    zaxis: Axis,
    aspectmode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<Title>,
    scene: Scene,
}

impl Default for Layout {
    fn default() -> Self {
        let axis = |label: &str| Axis {
            title: Title {
                text: label.to_string(),
            },
        };
        Self {
            title: None,
            scene: Scene {
                xaxis: axis("x (km)"),
                yaxis: axis("y (km)"),
                zaxis: axis("z (km)"),
                aspectmode: "data",
            },
        }
    }
}

/// Traces plus layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Figure {
    data: Vec<Trace>,
    layout: Layout,
}

/// Whether and how plotly.js is referenced from generated HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotlyJs {
    /// `<script src>` pointing at the plotly CDN.
    #[default]
    Cdn,
    /// No script tag; the embedding page provides plotly.js.
    Omit,
}

/// HTML serialization options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    pub include_plotlyjs: PlotlyJs,
    /// Load MathJax from its CDN ahead of the plot.
    pub include_mathjax: bool,
    /// Complete document (`true`) or a `<div>` fragment (`false`).
    pub full_html: bool,
    pub div_id: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            include_plotlyjs: PlotlyJs::Cdn,
            include_mathjax: false,
            full_html: true,
            div_id: "orrery-plot".to_string(),
        }
    }
}

impl HtmlOptions {
    /// Fragment with plotly.js and MathJax from their CDNs.
    pub fn fragment() -> Self {
        Self {
            include_mathjax: true,
            full_html: false,
            ..Self::default()
        }
    }
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.layout.title = Some(Title { text: title.into() });
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.layout.title.as_ref().map(|t| t.text.as_str())
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.data.push(trace);
    }

    pub fn traces(&self) -> &[Trace] {
        &self.data
    }

    /// `{ "data": [...], "layout": {...} }`.
    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_html(&self, options: &HtmlOptions) -> Result<String, RenderError> {
        let data = script_safe(serde_json::to_string(&self.data)?);
        let layout = script_safe(serde_json::to_string(&self.layout)?);
        let id = html_escape(&options.div_id);
        let id_literal = script_safe(serde_json::to_string(&options.div_id)?);

        let mut div = String::from("<div>\n");
        if options.include_mathjax {
            div.push_str(&format!(
                "<script type=\"text/javascript\" src=\"{MATHJAX_CDN_URL}\"></script>\n"
            ));
        }
        if options.include_plotlyjs == PlotlyJs::Cdn {
            div.push_str(&format!(
                "<script type=\"text/javascript\" charset=\"utf-8\" src=\"{PLOTLY_CDN_URL}\"></script>\n"
            ));
        }
        div.push_str(&format!(
            "<div id=\"{id}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\n\
             <script type=\"text/javascript\">\n\
             Plotly.newPlot({id_literal}, {data}, {layout}, {{\"responsive\": true}});\n\
             </script>\n</div>"
        ));

        if !options.full_html {
            return Ok(div);
        }
        let title = html_escape(self.title().unwrap_or("Orbits"));
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{title}</title>\n\
             </head>\n<body>\n{div}\n</body>\n</html>\n"
        ))
    }

    pub fn write_html(&self, path: &Path, options: &HtmlOptions) -> Result<(), RenderError> {
        let html = self.to_html(options)?;
        std::fs::write(path, html).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Keep embedded JSON from closing the surrounding `<script>` element.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
