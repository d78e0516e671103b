use anyhow::Context;
use clap::Parser;
use source::http::HttpSource;
use std::ffi::OsString;
use std::path::PathBuf;
use workflow::config::{SourceConfig, WorkflowConfig};
use workflow::runner::Runner;

mod source;
mod workflow;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Make KML files from GPS displacement observed between two epochs",
    after_help = "Example: getdisplacement --lat 33 --lon -115 --width 2 --height 2 -t1 2010-04-07 -t2 2010-04-09 -o displacement"
)]
pub struct Args {
    /// Output basename for the KML and table files
    #[arg(short = 'o')]
    pub output: PathBuf,
    /// Center latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    /// Center longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Width in degrees
    #[arg(long)]
    pub width: f64,
    /// Height in degrees
    #[arg(long)]
    pub height: f64,
    /// Start date given as YYYY-MM-DD
    #[arg(long = "t1")]
    pub epoch1: String,
    /// Stop date given as YYYY-MM-DD
    #[arg(long = "t2")]
    pub epoch2: String,
    /// Scale for offsets in mm/deg
    #[arg(long, default_value_t = 320.0)]
    pub scale: f64,
    /// Reference site
    #[arg(long = "ref")]
    pub reference: Option<String>,
    /// Analysis center [JPL or NGL]
    #[arg(short = 'c', default_value = "JPL")]
    pub center: String,
    /// Include error ellipses
    #[arg(short = 'e', default_value_t = false)]
    pub error_ellipses: bool,
    /// Minimize marker size
    #[arg(long, default_value_t = false)]
    pub minm: bool,
    /// Averaging window for the first epoch in days
    #[arg(long, default_value_t = 10.0)]
    pub dwin1: f64,
    /// Averaging window for the second epoch in days
    #[arg(long, default_value_t = 10.0)]
    pub dwin2: f64,
    /// Display absolute verticals
    #[arg(long, default_value_t = false)]
    pub vabs: bool,
    /// Also write an interpolated grid with the given spacing in degrees
    #[arg(long, num_args = 0..=1, default_missing_value = "0.004")]
    pub grid: Option<f64>,
    /// Print the displacement rows as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
    /// Load data source endpoints from YAML
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Rewrites the single-dash epoch flags `-t1`/`-t2` into their long form.
pub(crate) fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-t1") => OsString::from("--t1"),
            Some("-t2") => OsString::from("--t2"),
            _ => arg,
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse_from(normalize_args(std::env::args_os()));

    let source_config = match &args.config {
        Some(path) => SourceConfig::load(path)?,
        None => SourceConfig::default(),
    };
    let workflow_config = WorkflowConfig::from_args(&args)?;
    let source = HttpSource::new(source_config.endpoints(workflow_config.provider))
        .context("preparing data source")?;

    let runner = Runner::new(workflow_config);
    let result = runner.execute(&source)?;
    if result.reference_gap {
        eprintln!("Reference site has missing data!");
    }

    println!(
        "Displacements -> rows {}, horizontal {}, vertical {}, table {}",
        result.report.rows.len(),
        result.paths.horizontal.display(),
        result.paths.vertical.display(),
        result.paths.table.display()
    );
    if let Some(nodes) = result.grid_nodes {
        println!("Interpolated grid -> nodes {}, {}", nodes, result.paths.grid.display());
    }
    if args.json {
        let json = result
            .report
            .rows_json()
            .context("serializing displacement rows")?;
        println!("{}", json);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn epoch_flags_accept_single_dash() {
        let args = Args::parse_from(normalize_args(os(&[
            "getdisplacement",
            "--lat",
            "33",
            "--lon",
            "-115",
            "--width",
            "2",
            "--height",
            "2",
            "-t1",
            "2010-04-07",
            "-t2",
            "2010-04-09",
            "-o",
            "displacement",
        ])));
        assert_eq!(args.epoch1, "2010-04-07");
        assert_eq!(args.epoch2, "2010-04-09");
        assert_eq!(args.lon, -115.0);
        assert_eq!(args.scale, 320.0);
        assert_eq!(args.center, "JPL");
        assert!(args.grid.is_none());
        assert!(!args.error_ellipses);
    }

    #[test]
    fn optional_flags_parse() {
        let args = Args::parse_from(normalize_args(os(&[
            "getdisplacement",
            "-o",
            "out",
            "--lat",
            "-33.5",
            "--lon",
            "150",
            "--width",
            "1",
            "--height",
            "1",
            "-t1",
            "2012-01-01",
            "-t2",
            "2013-01-01",
            "--ref",
            "P500",
            "-c",
            "NGL",
            "-e",
            "--minm",
            "--vabs",
            "--dwin1",
            "20",
            "--grid",
        ])));
        assert_eq!(args.lat, -33.5);
        assert_eq!(args.reference.as_deref(), Some("P500"));
        assert_eq!(args.center, "NGL");
        assert!(args.error_ellipses && args.minm && args.vabs);
        assert_eq!(args.dwin1, 20.0);
        assert_eq!(args.dwin2, 10.0);
        assert_eq!(args.grid, Some(0.004));
    }
}
