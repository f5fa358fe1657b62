use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod run;

#[derive(Parser, Debug)]
#[command(name = "orrery", version, about = "Sample and plot Earth and Moon orbits")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample the configured bodies and write the orbit figure
    Plot {
        /// TOML run configuration (defaults to the 2021 Earth/Moon run)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Meta-kernel to load
        #[arg(long)]
        meta_kernel: Option<PathBuf>,
        /// Interactive HTML output
        #[arg(long)]
        html: Option<PathBuf>,
        /// Static SVG output
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Figure title
        #[arg(long)]
        title: Option<String>,
    },
    /// Sample one body and print the positions
    Sample {
        /// Body name or NAIF code
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "SOLAR SYSTEM BARYCENTER")]
        observer: String,
        #[arg(long, default_value = "ECLIPJ2000")]
        frame: String,
        /// Aberration correction: NONE or LT
        #[arg(long, default_value = "NONE")]
        aberration: String,
        /// Start time (UTC unless suffixed with TDB or TT)
        #[arg(long)]
        start: String,
        /// End time, exclusive
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 4.0)]
        step_hours: f64,
        #[arg(long, default_value = "getsta.tm")]
        meta_kernel: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Show the toolkit version, loaded kernels and SPK coverage
    Info {
        #[arg(long, default_value = "getsta.tm")]
        meta_kernel: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("cannot initialise logging")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Plot {
            config,
            meta_kernel,
            html,
            svg,
            title,
        } => {
            let overrides = run::PlotOverrides {
                meta_kernel,
                html,
                svg,
                title,
            };
            let config = run::plot_config(config.as_deref(), overrides)?;
            run::plot(&config)?;
        }
        Commands::Sample {
            body,
            observer,
            frame,
            aberration,
            start,
            end,
            step_hours,
            meta_kernel,
            format,
        } => {
            let request = run::SampleRequest {
                body,
                observer,
                frame,
                aberration,
                start,
                end,
                step_hours,
                meta_kernel,
                format,
            };
            let stdout = std::io::stdout();
            run::sample(&request, &mut stdout.lock())?;
        }
        Commands::Info { meta_kernel } => {
            let stdout = std::io::stdout();
            run::info(&meta_kernel, &mut stdout.lock())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_defaults() {
        let cli = Cli::try_parse_from(["orrery", "plot"]).unwrap();
        match cli.command {
            Commands::Plot {
                config,
                meta_kernel,
                html,
                svg,
                title,
            } => {
                assert!(config.is_none() && meta_kernel.is_none());
                assert!(html.is_none() && svg.is_none() && title.is_none());
            }
            other => panic!("parsed {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn sample_arguments() {
        let cli = Cli::try_parse_from([
            "orrery", "-v", "sample", "--body", "MOON", "--start", "2021-01-01",
            "--end", "2021-01-02", "--format", "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Sample {
                body,
                observer,
                step_hours,
                format,
                meta_kernel,
                ..
            } => {
                assert_eq!(body, "MOON");
                assert_eq!(observer, "SOLAR SYSTEM BARYCENTER");
                assert_eq!(step_hours, 4.0);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(meta_kernel, PathBuf::from("getsta.tm"));
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn sample_requires_range() {
        assert!(Cli::try_parse_from(["orrery", "sample", "--body", "EARTH"]).is_err());
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(
            Cli::try_parse_from([
                "orrery", "sample", "--body", "EARTH", "--start", "a", "--end", "b",
                "--format", "xml",
            ])
            .is_err()
        );
    }
}
