//! Subcommand implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use orrery_config::RunConfig;
use orrery_core::{Aberration, EphemerisToolkit, KernelPool, KernelSession, body_name};
use orrery_trajectory::{
    HtmlViewer, SvgViewer, TimeRange, Trajectory, Viewer, build_figure, render_figure,
    sample_with_correction,
};
use serde::Serialize;
use tracing::info;

use crate::OutputFormat;

/// Command-line values that replace those from the config file.
#[derive(Debug, Default)]
pub struct PlotOverrides {
    pub meta_kernel: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    pub title: Option<String>,
}

pub fn plot_config(path: Option<&Path>, overrides: PlotOverrides) -> Result<RunConfig> {
    let mut config = match path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(meta_kernel) = overrides.meta_kernel {
        config.meta_kernel = meta_kernel;
    }
    if overrides.svg.is_some() {
        config.output.svg = overrides.svg;
    }
    if overrides.html.is_some() {
        config.output.html = overrides.html;
    }
    if overrides.title.is_some() {
        config.output.title = overrides.title;
    }
    config.validate()?;
    Ok(config)
}

/// Load the meta-kernel, sample every configured body and write the figure.
/// The kernels are unloaded again when this returns, on error too.
pub fn plot(config: &RunConfig) -> Result<()> {
    let mut pool = KernelPool::new();
    let session = KernelSession::open(&mut pool, &config.meta_kernel)
        .with_context(|| format!("cannot load {}", config.meta_kernel.display()))?;
    info!(toolkit = session.toolkit().version(), meta_kernel = %config.meta_kernel.display(), "kernels loaded");

    let trajectories = sample_bodies(session.toolkit(), config)?;
    let named: Vec<(&str, &Trajectory)> = config
        .bodies
        .iter()
        .map(|b| b.label.as_str())
        .zip(&trajectories)
        .collect();

    let mut figure = build_figure(&named);
    if let Some(title) = &config.output.title {
        figure = figure.with_title(title.clone());
    }

    let mut viewers: Vec<Box<dyn Viewer>> = Vec::new();
    if let Some(path) = &config.output.html {
        viewers.push(Box::new(HtmlViewer::new(path)));
    }
    if let Some(path) = &config.output.svg {
        viewers.push(Box::new(SvgViewer::new(path)));
    }
    for viewer in &mut viewers {
        figure = render_figure(viewer.as_mut(), figure)?;
    }
    Ok(())
}

/// One trajectory per configured body, in configuration order.
pub fn sample_bodies<T: EphemerisToolkit + ?Sized>(
    toolkit: &T,
    config: &RunConfig,
) -> Result<Vec<Trajectory>> {
    let sampling = &config.sampling;
    let start = toolkit.str_to_et(&sampling.start)?;
    let end = toolkit.str_to_et(&sampling.end)?;
    let range = TimeRange::new(start, end, sampling.step_seconds())?;
    let correction = sampling.aberration()?;
    info!(samples = range.len(), bodies = config.bodies.len(), "sampling");

    config
        .bodies
        .iter()
        .map(|body| -> Result<Trajectory> {
            Ok(sample_with_correction(
                toolkit,
                &body.id,
                &sampling.observer,
                &sampling.frame,
                correction,
                &range,
            )?)
        })
        .collect()
}

#[derive(Debug)]
pub struct SampleRequest {
    pub body: String,
    pub observer: String,
    pub frame: String,
    pub aberration: String,
    pub start: String,
    pub end: String,
    pub step_hours: f64,
    pub meta_kernel: PathBuf,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct SampleRow {
    et: f64,
    x_km: f64,
    y_km: f64,
    z_km: f64,
}

pub fn sample(request: &SampleRequest, out: &mut dyn Write) -> Result<()> {
    let mut pool = KernelPool::new();
    let session = KernelSession::open(&mut pool, &request.meta_kernel)
        .with_context(|| format!("cannot load {}", request.meta_kernel.display()))?;
    write_samples(session.toolkit(), request, out)
}

pub fn write_samples<T: EphemerisToolkit + ?Sized>(
    toolkit: &T,
    request: &SampleRequest,
    out: &mut dyn Write,
) -> Result<()> {
    let correction: Aberration = request.aberration.parse()?;
    let start = toolkit.str_to_et(&request.start)?;
    let end = toolkit.str_to_et(&request.end)?;
    let range = TimeRange::new(start, end, request.step_hours * 3600.0)?;
    let trajectory = sample_with_correction(
        toolkit,
        &request.body,
        &request.observer,
        &request.frame,
        correction,
        &range,
    )?;

    let rows: Vec<SampleRow> = range
        .epochs()
        .zip(trajectory.points())
        .map(|(et, p)| SampleRow {
            et,
            x_km: p[0],
            y_km: p[1],
            z_km: p[2],
        })
        .collect();

    match request.format {
        OutputFormat::Csv => {
            writeln!(out, "et,x_km,y_km,z_km")?;
            for row in &rows {
                writeln!(out, "{},{},{},{}", row.et, row.x_km, row.y_km, row.z_km)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn info(meta_kernel: &Path, out: &mut dyn Write) -> Result<()> {
    let mut pool = KernelPool::new();
    let session = KernelSession::open(&mut pool, meta_kernel)
        .with_context(|| format!("cannot load {}", meta_kernel.display()))?;
    write_info(session.toolkit(), out)
}

pub fn write_info(pool: &KernelPool, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", pool.version())?;

    let kernels = pool.loaded_kernels();
    if kernels.is_empty() {
        bail!("no kernels loaded");
    }
    writeln!(out, "\nKernels:")?;
    for kernel in &kernels {
        match &kernel.loaded_by {
            Some(meta) => writeln!(
                out,
                "  {:<4} {} (via {})",
                kernel.kind,
                kernel.path.display(),
                meta.display()
            )?,
            None => writeln!(out, "  {:<4} {}", kernel.kind, kernel.path.display())?,
        }
    }

    let coverage = pool.coverage();
    if coverage.is_empty() {
        return Ok(());
    }
    let lsk = pool.leap_seconds();
    let epoch = |et: f64| match lsk {
        Some(lsk) => format!("{} UTC", lsk.tdb_to_calendar(et)),
        None => format!("ET {et:.3}"),
    };
    writeln!(out, "\nSPK coverage:")?;
    for seg in &coverage {
        let target = body_name(seg.target).map_or_else(|| seg.target.to_string(), str::to_string);
        let center = body_name(seg.center).map_or_else(|| seg.center.to_string(), str::to_string);
        writeln!(
            out,
            "  {target} wrt {center} (frame {}, type {}): {} .. {}",
            seg.frame,
            seg.data_type,
            epoch(seg.start_et),
            epoch(seg.end_et)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use orrery_config::BodySpec;
    use test_helpers::fake::FakeToolkit;

    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[output]\nhtml = \"a.html\"\ntitle = \"File\"\n").unwrap();

        let config = plot_config(
            Some(&path),
            PlotOverrides {
                meta_kernel: Some(PathBuf::from("other.tm")),
                svg: Some(PathBuf::from("b.svg")),
                ..PlotOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.meta_kernel, PathBuf::from("other.tm"));
        assert_eq!(config.output.html, Some(PathBuf::from("a.html")));
        assert_eq!(config.output.svg, Some(PathBuf::from("b.svg")));
        assert_eq!(config.output.title.as_deref(), Some("File"));
    }

    #[test]
    fn default_config_without_file() {
        let config = plot_config(None, PlotOverrides::default()).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn samples_bodies_in_config_order() {
        let mut config = RunConfig::default();
        config.sampling.start = "2021-01-01T00:00:00".into();
        config.sampling.end = "2021-01-02T00:00:00".into();
        config.bodies.push(BodySpec::new("SUN", "Sun"));
        let toolkit = FakeToolkit::new();

        let trajectories = sample_bodies(&toolkit, &config).unwrap();
        let bodies: Vec<&str> = trajectories.iter().map(|t| t.body()).collect();
        assert_eq!(bodies, ["EARTH", "MOON", "SUN"]);
        assert!(trajectories.iter().all(|t| t.len() == 6));
    }

    #[test]
    fn sampling_error_names_the_body() {
        let mut config = RunConfig::default();
        config.bodies = vec![BodySpec::new("PLUTO BARYCENTER", "Pluto")];
        let err = sample_bodies(&FakeToolkit::new(), &config).unwrap_err();
        assert!(format!("{err:#}").contains("PLUTO BARYCENTER"), "{err:#}");
    }

    fn request(format: OutputFormat) -> SampleRequest {
        SampleRequest {
            body: "EARTH".into(),
            observer: "SOLAR SYSTEM BARYCENTER".into(),
            frame: "ECLIPJ2000".into(),
            aberration: "NONE".into(),
            start: "2021-01-01T00:00:00".into(),
            end: "2021-01-01T12:00:00".into(),
            step_hours: 4.0,
            meta_kernel: PathBuf::from("unused.tm"),
            format,
        }
    }

    #[test]
    fn csv_output() {
        let mut out = Vec::new();
        write_samples(&FakeToolkit::new(), &request(OutputFormat::Csv), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "et,x_km,y_km,z_km");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("662731269.184,"));
    }

    #[test]
    fn json_output() {
        let mut out = Vec::new();
        write_samples(&FakeToolkit::new(), &request(OutputFormat::Json), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["et"].as_f64().unwrap(), 662_731_269.184 + 14_400.0);
        assert!(rows[0]["z_km"].as_f64().unwrap().abs() < 1e-6);
    }

    #[test]
    fn rejects_unknown_aberration() {
        let mut req = request(OutputFormat::Csv);
        req.aberration = "XLT".into();
        assert!(write_samples(&FakeToolkit::new(), &req, &mut Vec::new()).is_err());
    }

    #[test]
    fn plot_writes_html_and_svg() {
        let set = test_helpers::synthetic_kernel_set();
        let html = set.dir.path().join("orbits.html");
        let svg = set.dir.path().join("orbits.svg");
        let mut config = RunConfig::default();
        config.meta_kernel = set.meta.clone();
        config.sampling.end = "2021-01-10T00:00:00".into();
        config.output.html = Some(html.clone());
        config.output.svg = Some(svg.clone());
        config.output.title = Some("Synthetic".into());

        plot(&config).unwrap();

        let page = std::fs::read_to_string(&html).unwrap();
        assert!(page.contains("<title>Synthetic</title>"));
        assert!(page.contains("\"name\":\"Earth\""));
        assert!(page.contains("\"name\":\"Moon\""));
        assert!(std::fs::read_to_string(&svg).unwrap().contains("<svg"));
    }

    #[test]
    fn plot_fails_on_missing_meta_kernel() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::default();
        config.meta_kernel = dir.path().join("absent.tm");
        config.output.html = Some(dir.path().join("orbits.html"));
        assert!(plot(&config).is_err());
        assert!(!dir.path().join("orbits.html").exists());
    }

    #[test]
    fn info_lists_kernels_and_coverage() {
        let set = test_helpers::synthetic_kernel_set();
        let mut out = Vec::new();
        info(&set.meta, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("orrery-toolkit "));
        assert!(text.contains("META"));
        assert!(text.contains("synthetic.bsp (via"));
        assert!(text.contains("MOON wrt EARTH BARYCENTER"));
        assert!(text.contains(" UTC"));
    }
}
