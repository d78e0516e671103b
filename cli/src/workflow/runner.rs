use crate::workflow::config::{OutputPaths, WorkflowConfig};
use anyhow::Context;
use dispcore::prelude::SeriesSource;
use dispcore::processing::interpolate::format_grid;
use dispcore::processing::{
    interpolate_table, load_table, write_report, DisplacementRun, InverseDistance, Report,
};
use log::warn;
use std::fs;
use std::path::Path;

pub struct WorkflowResult {
    pub report: Report,
    pub reference_gap: bool,
    pub paths: OutputPaths,
    pub grid_nodes: Option<usize>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

fn write_document(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Computes displacements and writes every document, including the
    /// empty ones produced when the reference station lacks data.
    pub fn execute(&self, source: &dyn SeriesSource) -> anyhow::Result<WorkflowResult> {
        let run = DisplacementRun::new(self.config.to_run_settings());
        let outcome = run.execute(source).context("computing displacements")?;

        let report = write_report(&outcome.displacements, &self.config.to_report_options());
        let paths = self.config.output_paths();
        write_document(&paths.horizontal, &report.horizontal)?;
        write_document(&paths.vertical, &report.vertical)?;
        write_document(&paths.table, &report.table)?;

        let grid_nodes = match self.config.grid_spacing {
            Some(_) if report.rows.is_empty() => {
                warn!("no displacement rows, skipping grid interpolation");
                None
            }
            Some(spacing) => {
                let points = load_table(&report.table).context("reloading displacement table")?;
                let nodes = interpolate_table(&points, spacing, &InverseDistance::default());
                write_document(&paths.grid, &format_grid(&nodes))?;
                Some(nodes.len())
            }
            None => None,
        };

        Ok(WorkflowResult {
            report,
            reference_gap: outcome.reference_gap,
            paths,
            grid_nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispcore::math::EpochWindow;
    use dispcore::prelude::{BoundingBox, DispResult, DisplacementError};
    use dispcore::records::Provider;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct MemorySource {
        directory: Vec<String>,
        series: HashMap<String, Vec<String>>,
    }

    impl SeriesSource for MemorySource {
        fn station_directory(&self) -> DispResult<Vec<String>> {
            Ok(self.directory.clone())
        }

        fn series(&self, station: &str) -> DispResult<Vec<String>> {
            self.series
                .get(station)
                .cloned()
                .ok_or_else(|| DisplacementError::Source(format!("no series for {}", station)))
        }
    }

    fn jpl_row(year: f64, pos: f64) -> String {
        format!(
            "{:.8} {:.6} {:.6} {:.6} 0.001000 0.001000 0.002000",
            year, pos, pos, pos
        )
    }

    fn source() -> MemorySource {
        let mut series = HashMap::new();
        series.insert(
            "AAAA".to_string(),
            vec![jpl_row(2010.0, 0.0), jpl_row(2010.5, 0.010)],
        );
        series.insert(
            "BBBB".to_string(),
            vec![jpl_row(2010.0, 0.0), jpl_row(2010.5, 0.005)],
        );
        // nothing at the second epoch
        series.insert("GAPS".to_string(), vec![jpl_row(2010.0, 0.0)]);
        MemorySource {
            directory: vec![
                "AAAA POS 33.2 -115.3 0 0 0 0".to_string(),
                "BBBB POS 32.8 -114.7 0 0 0 0".to_string(),
                "GAPS POS 33.0 -115.0 0 0 0 0".to_string(),
            ],
            series,
        }
    }

    fn config(dir: &TempDir, reference: Option<&str>) -> WorkflowConfig {
        WorkflowConfig {
            output: dir.path().join("disp"),
            provider: Provider::Jpl,
            bbox: BoundingBox::centered(-115.0, 33.0, 2.0, 2.0),
            window1: EpochWindow::new(2010.0, 0.1),
            window2: EpochWindow::new(2010.5, 0.1),
            scale: 320.0,
            marker_scale: 0.5,
            reference: reference.map(str::to_string),
            draw_ellipses: true,
            absolute_vertical: false,
            grid_spacing: None,
        }
    }

    #[test]
    fn runner_writes_all_documents() {
        let dir = TempDir::new().unwrap();
        let result = Runner::new(config(&dir, None)).execute(&source()).unwrap();
        assert_eq!(result.report.rows.len(), 2);
        assert!(!result.reference_gap);

        let horizontal = fs::read_to_string(&result.paths.horizontal).unwrap();
        assert_eq!(horizontal.matches("<Placemark>").count(), 6);
        let table = fs::read_to_string(&result.paths.table).unwrap();
        assert_eq!(table.lines().count(), 3);
        assert!(table.lines().nth(1).unwrap().starts_with("AAAA"));
        assert_eq!(
            result.paths.vertical,
            PathBuf::from(format!("{}_vertical.kml", dir.path().join("disp").display()))
        );
    }

    #[test]
    fn reference_gap_still_writes_empty_documents() {
        let dir = TempDir::new().unwrap();
        let result = Runner::new(config(&dir, Some("GAPS")))
            .execute(&source())
            .unwrap();
        assert!(result.reference_gap);
        assert!(result.report.rows.is_empty());

        for path in [&result.paths.horizontal, &result.paths.vertical] {
            let doc = fs::read_to_string(path).unwrap();
            assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
            assert!(doc.contains(" <Folder>\n </Folder>\n</kml>"));
        }
        let table = fs::read_to_string(&result.paths.table).unwrap();
        assert_eq!(table.lines().count(), 1);
    }

    #[test]
    fn relative_and_absolute_verticals() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir, Some("BBBB"));
        let relative = Runner::new(cfg.clone()).execute(&source()).unwrap();
        assert!((relative.report.rows[0].delta_up - 5.0).abs() < 1e-6);

        cfg.absolute_vertical = true;
        let absolute = Runner::new(cfg).execute(&source()).unwrap();
        assert!((absolute.report.rows[0].delta_up - 10.0).abs() < 1e-6);
        assert!((absolute.report.rows[0].delta_east - 5.0).abs() < 1e-6);
    }

    #[test]
    fn grid_is_written_on_request() {
        let dir = TempDir::new().unwrap();
        let mut cfg = config(&dir, None);
        cfg.grid_spacing = Some(0.1);
        let result = Runner::new(cfg).execute(&source()).unwrap();
        let nodes = result.grid_nodes.unwrap();
        assert!(nodes > 0);
        let grid = fs::read_to_string(&result.paths.grid).unwrap();
        assert_eq!(grid.lines().count(), nodes + 1);
    }
}
