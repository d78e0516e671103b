use crate::source::http::Endpoints;
use crate::Args;
use anyhow::Context;
use dispcore::math::{fractional_year, EpochWindow};
use dispcore::prelude::{BoundingBox, RunSettings};
use dispcore::processing::ReportOptions;
use dispcore::records::Provider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MARKER_SCALE: f64 = 0.5;
const MIN_MARKER_SCALE: f64 = 0.2;

/// Typed run configuration, built once from the command line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub output: PathBuf,
    pub provider: Provider,
    pub bbox: BoundingBox,
    pub window1: EpochWindow,
    pub window2: EpochWindow,
    pub scale: f64,
    pub marker_scale: f64,
    pub reference: Option<String>,
    pub draw_ellipses: bool,
    pub absolute_vertical: bool,
    pub grid_spacing: Option<f64>,
}

/// Paths of every document a run writes.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputPaths {
    pub horizontal: PathBuf,
    pub vertical: PathBuf,
    pub table: PathBuf,
    pub grid: PathBuf,
}

impl WorkflowConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let provider: Provider = args.center.parse()?;
        let epoch1 = fractional_year(&args.epoch1).context("parsing first epoch")?;
        let epoch2 = fractional_year(&args.epoch2).context("parsing second epoch")?;

        Ok(Self {
            output: args.output.clone(),
            provider,
            bbox: BoundingBox::centered(args.lon, args.lat, args.width, args.height),
            window1: EpochWindow::from_days(epoch1, args.dwin1),
            window2: EpochWindow::from_days(epoch2, args.dwin2),
            scale: args.scale,
            marker_scale: if args.minm {
                MIN_MARKER_SCALE
            } else {
                MARKER_SCALE
            },
            reference: args.reference.clone(),
            draw_ellipses: args.error_ellipses,
            absolute_vertical: args.vabs,
            grid_spacing: args.grid,
        })
    }

    pub fn to_run_settings(&self) -> RunSettings {
        RunSettings {
            provider: self.provider,
            bbox: self.bbox,
            window1: self.window1,
            window2: self.window2,
            reference: self.reference.clone(),
            absolute_vertical: self.absolute_vertical,
        }
    }

    pub fn to_report_options(&self) -> ReportOptions {
        ReportOptions {
            provider: self.provider,
            scale: self.scale,
            marker_scale: self.marker_scale,
            draw_ellipses: self.draw_ellipses,
            reference: self.reference.clone(),
        }
    }

    pub fn output_paths(&self) -> OutputPaths {
        let base = self.output.to_string_lossy();
        OutputPaths {
            horizontal: PathBuf::from(format!("{}_horizontal.kml", base)),
            vertical: PathBuf::from(format!("{}_vertical.kml", base)),
            table: PathBuf::from(format!("{}_table.txt", base)),
            grid: PathBuf::from(format!("{}_grid.txt", base)),
        }
    }
}

/// Endpoint overrides for the selected analysis center.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub station_directory: Option<String>,
    /// Series URL with a `{station}` placeholder.
    pub series_template: Option<String>,
}

impl SourceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading source config {}", path_ref.display()))?;
        let config: SourceConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing source config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn endpoints(&self, provider: Provider) -> Endpoints {
        Endpoints {
            station_directory: self
                .station_directory
                .clone()
                .unwrap_or_else(|| provider.station_directory_url().to_string()),
            series_template: self
                .series_template
                .clone()
                .unwrap_or_else(|| provider.series_url_template().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize_args;
    use clap::Parser;
    use std::ffi::OsString;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(extra: &[&str]) -> Args {
        let mut argv: Vec<OsString> = [
            "getdisplacement",
            "-o",
            "out/disp",
            "--lat",
            "33",
            "--lon",
            "-115",
            "--width",
            "2",
            "--height",
            "1",
            "-t1",
            "2010-04-07",
            "-t2",
            "2010-04-09",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        argv.extend(extra.iter().map(OsString::from));
        Args::parse_from(normalize_args(argv))
    }

    #[test]
    fn config_from_args_derives_box_and_windows() {
        let cfg = WorkflowConfig::from_args(&args(&[])).unwrap();
        assert_eq!(cfg.provider, Provider::Jpl);
        assert_eq!(cfg.bbox.lon_min, -116.0);
        assert_eq!(cfg.bbox.lat_max, 33.5);
        assert!((cfg.window1.half_width - 10.0 / 365.25 / 2.0).abs() < 1e-15);
        assert!(cfg.window2.center > cfg.window1.center);
        assert_eq!(cfg.marker_scale, 0.5);

        let settings = cfg.to_run_settings();
        assert_eq!(settings.reference, None);
        assert!(!settings.absolute_vertical);
    }

    #[test]
    fn minimized_markers_and_ngl() {
        let cfg = WorkflowConfig::from_args(&args(&["--minm", "-c", "B"])).unwrap();
        assert_eq!(cfg.marker_scale, 0.2);
        assert_eq!(cfg.provider, Provider::Ngl);
        assert_eq!(cfg.to_report_options().provider, Provider::Ngl);
    }

    #[test]
    fn unsupported_provider_fails_early() {
        let err = WorkflowConfig::from_args(&args(&["-c", "GSI"])).unwrap_err();
        assert!(err.to_string().contains("only JPL, NGL are supported"));
    }

    #[test]
    fn output_paths_use_basename() {
        let paths = WorkflowConfig::from_args(&args(&[])).unwrap().output_paths();
        assert_eq!(paths.horizontal, PathBuf::from("out/disp_horizontal.kml"));
        assert_eq!(paths.vertical, PathBuf::from("out/disp_vertical.kml"));
        assert_eq!(paths.table, PathBuf::from("out/disp_table.txt"));
    }

    #[test]
    fn source_config_overrides_endpoints() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"series_template: http://mirror.local/{station}.series\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = SourceConfig::load(&path).unwrap();
        let endpoints = cfg.endpoints(Provider::Jpl);
        assert_eq!(
            endpoints.station_directory,
            Provider::Jpl.station_directory_url()
        );
        assert_eq!(endpoints.series_url("P500"), "http://mirror.local/P500.series");
    }
}
